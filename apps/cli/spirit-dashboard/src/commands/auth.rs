use crate::context::AppContext;
use crate::error::DashboardError;

use common::{ErrorLocation, RedactedToken};

use std::panic::Location;

use log::info;
use serde_json::{Value, json};

pub fn login(ctx: &AppContext, token: String) -> Result<Value, DashboardError> {
    let token = RedactedToken::new(token).map_err(|e| DashboardError::Token {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    ctx.token_store.save(&token)?;
    ctx.client.clear_cache();
    info!("Stored auth token ({} chars)", token.len());

    Ok(json!({ "logged_in": true, "token": token.to_string() }))
}

pub fn logout(ctx: &AppContext) -> Result<Value, DashboardError> {
    ctx.token_store.clear()?;
    ctx.client.clear_cache();
    Ok(json!({ "logged_in": false }))
}
