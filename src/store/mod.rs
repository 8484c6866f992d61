//! Persistence layer: alumni records behind the `UserStore` trait.

pub mod libsql_backend;
pub mod memory;
pub mod migrations;
pub mod traits;

pub use libsql_backend::LibSqlUserStore;
pub use memory::InMemoryUserStore;
pub use traits::{LinkEmailOutcome, UserStore};
