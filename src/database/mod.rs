pub mod brackets;
pub mod connection;
pub mod groups;
pub mod matches;
pub mod models;
pub mod setup;
mod store;

pub use connection::{DbConn, DbPool, create_memory_pool, create_pool, get_connection};
pub use models::*;
pub use store::SqliteStore;
