pub mod cadence;
pub mod cli;
pub mod db;
pub mod error;
pub mod models;
pub mod stats;

pub use db::Database;
pub use error::{Error, ErrorKind, Result};
