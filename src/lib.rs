//! Library Web Client
//!
//! Client side of a small library catalog: a debounced book search with
//! pagination and checkout, and a patron profile dashboard (loans, fines,
//! reading history, settings). Both controllers talk to a REST backend and
//! fall back to substitute data when it is unavailable.

pub mod api;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod services;
pub mod view;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use services::Services;
