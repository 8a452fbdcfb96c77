pub mod models;
pub mod pool;

pub use pool::{connect_pool, health_check, run_migrations, DatabaseError};
