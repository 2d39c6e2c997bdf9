pub mod config;
pub mod db;
pub mod error;
pub mod fixtures;
pub mod handlers;
pub mod models;
pub mod schema;
pub mod store;
pub mod validation;

pub use config::Config;
pub use db::Database;
pub use handlers::{app, AppState};
