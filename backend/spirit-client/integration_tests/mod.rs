mod client;
mod helpers;
mod monitor;
