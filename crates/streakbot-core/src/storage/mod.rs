pub mod database;
pub mod migrations;

pub use database::{Database, StreakRecord};
