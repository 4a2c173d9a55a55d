pub mod batch_scheduler;
pub mod draw_engine;
pub mod fixed_winner_resolver;
pub mod lottery_service;
pub mod person_pool;
pub mod prize_registry;
pub mod result_recorder;

pub use draw_engine::{DrawEngine, DrawPolicy, DrawResult, DrawnWinner};
pub use lottery_service::{LotteryService, LotteryState};
pub use person_pool::PersonPool;
pub use prize_registry::PrizeRegistry;
