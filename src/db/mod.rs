//! Store access for the forum.
//!
//! - `connection` - PostgreSQL pool configuration and lifecycle
//! - `store` - `ForumStore` trait the handlers depend on
//! - `queries` - `PgStore`, the SQL implementation
//! - `memory` - `MemoryStore`, an in-process implementation

pub mod connection;
pub mod memory;
pub mod queries;
pub mod store;

// Re-exports
pub use connection::{connect_db, DatabaseConnection, DbConfig};
pub use memory::MemoryStore;
pub use queries::PgStore;
pub use store::{ForumStore, StoreError, StoreResult};
