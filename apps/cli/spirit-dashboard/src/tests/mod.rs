mod cli;
mod error;
mod logger;
