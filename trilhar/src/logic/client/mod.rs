pub mod broker;
pub mod command;
pub mod config;
pub mod report;
pub mod send;
pub mod status;
pub mod url_utils;

#[cfg(test)]
pub mod fake_broker;
