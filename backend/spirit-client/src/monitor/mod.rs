//! Connectivity and per-service health tracking.
//!
//! The monitor owns the latest [`ServiceHealthRecord`] for every registered
//! service and notifies subscribers on each change. Subscribers are called
//! synchronously, in subscription order, outside of any internal lock.

use crate::client::default_headers;
use crate::error::{ClientError, ConfigError};
use crate::registry::ServiceRegistry;
use crate::USER_AGENT;

use models::{HealthStatus, HealthSummary, ServiceHealthRecord, ServiceId};

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, Weak};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use futures_util::future::join_all;
use log::{debug, info, warn};
use reqwest::Client;

pub const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEvent {
    Online,
    Offline,
    ServiceStatus {
        service: ServiceId,
        status: HealthStatus,
    },
    HealthCheck(HealthSummary),
}

type Callback = Arc<dyn Fn(&NetworkEvent) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    entries: Vec<(u64, Callback)>,
}

fn lock_subscribers(subscribers: &Mutex<Subscribers>) -> MutexGuard<'_, Subscribers> {
    subscribers.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle returned by [`NetworkStatusMonitor::subscribe`].
///
/// Dropping the handle keeps the callback registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    subscribers: Weak<Mutex<Subscribers>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            lock_subscribers(&subscribers)
                .entries
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.entries.len())
            .finish()
    }
}

pub struct NetworkStatusMonitor {
    http: Client,
    registry: Arc<ServiceRegistry>,
    online: AtomicBool,
    records: RwLock<BTreeMap<ServiceId, ServiceHealthRecord>>,
    subscribers: Arc<Mutex<Subscribers>>,
    probe_timeout: Duration,
}

impl NetworkStatusMonitor {
    /// Starts online with every registered service `unknown`.
    pub fn new(registry: Arc<ServiceRegistry>) -> Result<Self, ClientError> {
        let http = Client::builder().user_agent(USER_AGENT).build()?;

        let records = registry
            .services()
            .map(|descriptor| {
                (
                    descriptor.id,
                    ServiceHealthRecord {
                        service: descriptor.id,
                        status: HealthStatus::Unknown,
                        last_checked_at: UNIX_EPOCH,
                    },
                )
            })
            .collect();

        Ok(Self {
            http,
            registry,
            online: AtomicBool::new(true),
            records: RwLock::new(records),
            subscribers: Arc::new(Mutex::new(Subscribers::default())),
            probe_timeout: HEALTH_PROBE_TIMEOUT,
        })
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    /// Record the platform connectivity signal. Going offline marks every
    /// service `offline`.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);

        if online {
            info!("Network online");
            self.broadcast(&NetworkEvent::Online);
        } else {
            warn!("Network offline");
            self.broadcast(&NetworkEvent::Offline);
            for id in self.service_ids() {
                self.set_status(id, HealthStatus::Offline);
            }
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&NetworkEvent) + Send + Sync + 'static) -> Subscription {
        let mut subscribers = lock_subscribers(&self.subscribers);
        let id = subscribers.next_id;
        subscribers.next_id += 1;
        subscribers.entries.push((id, Arc::new(callback)));

        Subscription {
            id,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        lock_subscribers(&self.subscribers).entries.len()
    }

    fn broadcast(&self, event: &NetworkEvent) {
        let callbacks: Vec<Callback> = lock_subscribers(&self.subscribers)
            .entries
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback(event);
        }
    }

    fn service_ids(&self) -> Vec<ServiceId> {
        self.registry.services().map(|d| d.id).collect()
    }

    /// Store `status` for `service` and notify subscribers.
    pub fn set_status(&self, service: ServiceId, status: HealthStatus) {
        let now = SystemTime::now();
        {
            let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
            let record = records.entry(service).or_insert(ServiceHealthRecord {
                service,
                status: HealthStatus::Unknown,
                last_checked_at: UNIX_EPOCH,
            });
            *record = record.advanced(status, now);
        }

        self.broadcast(&NetworkEvent::ServiceStatus { service, status });
    }

    pub fn status(&self, service: ServiceId) -> HealthStatus {
        self.record(service)
            .map(|record| record.status)
            .unwrap_or_default()
    }

    pub fn record(&self, service: ServiceId) -> Option<ServiceHealthRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&service)
            .cloned()
    }

    /// Snapshot of every record.
    pub fn statuses(&self) -> Vec<ServiceHealthRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Probe `service` and record the result. `true` only when healthy.
    pub async fn check_service(&self, service: ServiceId) -> bool {
        self.probe(service).await == HealthStatus::Healthy
    }

    /// [`Self::check_service`] by registry key or slug.
    pub async fn check_named(&self, service: &str) -> Result<bool, ConfigError> {
        let id = self.registry.lookup(service)?.id;
        Ok(self.check_service(id).await)
    }

    async fn probe(&self, service: ServiceId) -> HealthStatus {
        if !self.is_online() {
            self.set_status(service, HealthStatus::Offline);
            return HealthStatus::Offline;
        }

        let Some(descriptor) = self.registry.descriptor(service) else {
            self.set_status(service, HealthStatus::Unknown);
            return HealthStatus::Unknown;
        };

        let url = descriptor.health_url();
        let request = self.http.get(&url).headers(default_headers(service)).send();

        let status = match tokio::time::timeout(self.probe_timeout, request).await {
            Ok(Ok(response)) if response.status().is_success() => HealthStatus::Healthy,
            Ok(Ok(response)) => {
                debug!("{service} health returned {}", response.status());
                HealthStatus::Unhealthy
            }
            Ok(Err(e)) => {
                debug!("{service} health probe failed: {e}");
                HealthStatus::Error
            }
            Err(_) => {
                debug!(
                    "{service} health probe timed out after {} ms",
                    self.probe_timeout.as_millis()
                );
                HealthStatus::Error
            }
        };

        self.set_status(service, status);
        status
    }

    /// Probe every service concurrently and broadcast the summary.
    pub async fn check_all(&self) -> HealthSummary {
        let statuses = join_all(self.service_ids().into_iter().map(|id| self.probe(id))).await;
        let summary = HealthSummary::tally(statuses);

        info!(
            "Health check: {}/{} healthy, {} unhealthy, {} errors",
            summary.healthy, summary.total, summary.unhealthy, summary.errors
        );
        self.broadcast(&NetworkEvent::HealthCheck(summary));
        summary
    }
}
