pub mod auth;
pub mod health;
pub mod readings;
pub mod urls;

use crate::cli::Command;
use crate::context::AppContext;
use crate::error::DashboardError;

use serde_json::Value;

/// Execute `command` and return its JSON output.
pub async fn run(command: Command, ctx: &AppContext) -> Result<Value, DashboardError> {
    match command {
        Command::Health { service } => health::health(ctx, service.as_deref()).await,
        Command::Monitor {
            rounds,
            interval,
            offline,
        } => health::monitor(ctx, rounds, interval, offline).await,
        Command::Models => readings::models(ctx).await,
        Command::Tarot {
            question,
            spread,
            deck,
            fallback,
        } => readings::tarot(ctx, question, spread, deck, fallback).await,
        Command::Chart {
            date,
            time,
            location,
            fallback,
        } => readings::chart(ctx, date, time, location, fallback).await,
        Command::Books { query, category } => readings::books(ctx, query, category).await,
        Command::Chat { message } => readings::chat(ctx, message).await,
        Command::Login { token } => auth::login(ctx, token),
        Command::Logout => auth::logout(ctx),
        Command::Urls => urls::urls(ctx),
    }
}
