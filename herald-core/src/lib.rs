//! Herald core library — domain types, notification specs, config loading.
//!
//! - [`types`] — recipients, responders, the rendered [`Notification`]
//! - [`spec`] — notification templates as written in configuration
//! - [`config`] — YAML loaders and backend options
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod spec;
pub mod types;

pub use config::{ApiKey, OpsgenieOptions, ServiceConfig};
pub use error::ConfigError;
pub use spec::{NotificationTemplate, OpsgenieSpec, PassThrough, StructuredSpec, TemplatedSpec};
pub use types::{
    Destination, Field, Notification, OpsgenieNotification, Recipient, Responder, ResponderType,
};
