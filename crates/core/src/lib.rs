//! Play statistics for the game lobby.
//!
//! Game clients report finished sessions under an app token; the
//! [`StatisticsService`] persists them and derives the recent games, most
//! popular games and best users views from the stored records on every read.

pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod models;
pub mod utils;

pub use config::{InactiveUserPolicy, StatisticsConfig};
pub use db::{Database, MemoryStore, SqliteStore, StatisticsStore};
pub use domain::{StatisticsService, parse_session_report};
pub use error::{Error, Result};
