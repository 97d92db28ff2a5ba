// Library exports for testing
// The binary (main.rs) imports these as well

pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod logger;

#[cfg(test)]
mod tests;

pub const APP_DIR_NAME: &str = "spiritual-dashboard";
pub const LOG_DIR_NAME: &str = "logs";
