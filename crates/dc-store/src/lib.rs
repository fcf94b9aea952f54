pub mod config;
pub mod error;
pub mod json_bridge;
pub mod schema;
pub mod store;

pub use config::Config;
pub use error::{Result, StoreError};
pub use store::{Store, default_base_dir};
