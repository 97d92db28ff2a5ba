mod cache;
mod classifier;
mod config;
mod registry;
