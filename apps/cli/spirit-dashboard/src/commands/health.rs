use crate::context::AppContext;
use crate::error::DashboardError;

use spirit_client::NetworkEvent;

use std::time::Duration;

use log::{debug, info, warn};
use serde_json::{Value, json};

/// Health of one or all services through the unified client.
pub async fn health(ctx: &AppContext, service: Option<&str>) -> Result<Value, DashboardError> {
    debug!("Checking health of {}", service.unwrap_or("all services"));

    let reports = ctx.client.check_service_health(service).await?;
    Ok(serde_json::to_value(reports)?)
}

/// Run `rounds` probe rounds through the monitor, `interval` seconds apart.
pub async fn monitor(
    ctx: &AppContext,
    rounds: u32,
    interval: u64,
    offline: bool,
) -> Result<Value, DashboardError> {
    let subscription = ctx.monitor.subscribe(|event| match event {
        NetworkEvent::Online => info!("Network online"),
        NetworkEvent::Offline => warn!("Network offline"),
        NetworkEvent::ServiceStatus { service, status } => debug!("{service}: {status}"),
        NetworkEvent::HealthCheck(summary) => info!(
            "Round complete: {}/{} healthy",
            summary.healthy, summary.total
        ),
    });

    if offline {
        ctx.monitor.set_online(false);
    }

    let mut summaries = Vec::new();
    for round in 1..=rounds.max(1) {
        if round > 1 {
            tokio::time::sleep(Duration::from_secs(interval)).await;
        }
        summaries.push(ctx.monitor.check_all().await);
    }

    subscription.unsubscribe();

    Ok(json!({
        "online": ctx.monitor.is_online(),
        "rounds": summaries,
        "services": ctx.monitor.statuses(),
    }))
}
