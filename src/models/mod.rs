pub mod common;
pub mod draw;
pub mod pagination;
pub mod person;
pub mod prize;

pub use common::*;
pub use draw::*;
pub use pagination::*;
pub use person::*;
pub use prize::*;
