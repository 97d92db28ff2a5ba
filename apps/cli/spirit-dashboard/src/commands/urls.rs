use crate::context::AppContext;
use crate::error::DashboardError;

use spirit_client::registry::endpoints::endpoint_keys;

use serde_json::{Map, Value, json};

/// Every service with its base, health, websocket and endpoint URLs.
pub fn urls(ctx: &AppContext) -> Result<Value, DashboardError> {
    let mut services = Map::new();

    for descriptor in ctx.registry.services() {
        let key = descriptor.id.key();

        let mut endpoints = Map::new();
        for endpoint in endpoint_keys(descriptor.id) {
            let url = ctx.registry.resolve(key, endpoint, &[])?;
            endpoints.insert(endpoint.to_string(), Value::String(url.into()));
        }

        services.insert(
            key.to_string(),
            json!({
                "name": descriptor.name,
                "base_url": descriptor.base_url,
                "health_url": descriptor.health_url(),
                "websocket_url": ctx.registry.resolve_websocket(key, None)?.as_str(),
                "timeout_ms": descriptor.timeout_ms,
                "endpoints": endpoints,
            }),
        );
    }

    Ok(Value::Object(services))
}
