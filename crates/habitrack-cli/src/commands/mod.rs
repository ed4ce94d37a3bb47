pub mod config;
pub mod habit;
