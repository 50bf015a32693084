pub mod layouts;
pub mod manager;
pub mod models;
pub mod profiles;

pub use manager::{DatabaseManager, DatabaseError};
