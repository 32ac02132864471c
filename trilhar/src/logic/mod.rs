pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod types;
