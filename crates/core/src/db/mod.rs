pub mod connection;
pub mod dao;
pub mod memory;
pub mod migrations;
pub mod store;

pub use connection::Database;
pub use dao::{AppTokensDao, SessionsDao, UsersDao};
pub use memory::MemoryStore;
pub use store::{SqliteStore, StatisticsStore};
