//! Campus LMS Kernel Library
//!
//! This library exposes kernel internals for integration testing.
//! The main entry point for running the server is the `campus` binary.

pub mod config;
pub mod db;
pub mod error;
pub mod menu;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
