//! Domain models for the spiritual dashboard client.
//!
//! This crate contains pure data structures: service identities and their
//! descriptors, health records, and the request payloads the backend
//! services accept. Models have no I/O - they're just data that can be
//! passed between layers.
//!
//! ## Architecture
//!
//! - **models** (this crate): Pure data structures
//! - **spirit-client**: Network resiliency logic operating on models
//! - **spirit-dashboard**: CLI wiring everything together

pub mod error;
pub mod health;
pub mod payloads;
pub mod service;

pub use common::ErrorLocation;
pub use error::model_error::ModelError;
pub use health::{HealthStatus, HealthSummary, ServiceHealthRecord};
pub use payloads::{BirthData, BookQueryRequest, ChatRequest, CompatibilityRequest, TarotReadingRequest};
pub use service::builder::ServiceDescriptorBuilder;
pub use service::descriptor::ServiceDescriptor;
pub use service::ServiceId;

#[cfg(test)]
mod tests;
