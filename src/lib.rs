pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod seed;

pub use catalog::Catalog;
pub use error::{AppError, AppResult};
