pub mod persons;
pub mod prizes;

pub use persons as person_entity;
pub use prizes as prize_entity;
pub use prizes::{FixedWinnerItem, FixedWinners, Picture, Separate, SeparateCount};
