pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod report;
pub mod source;

pub use error::{AppError, Result};
