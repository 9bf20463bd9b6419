//! The alert-creation request and response exchanged with the backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use herald_core::{Notification, Recipient, Responder};

/// Value of `source` on every alert Herald creates.
pub const ALERT_SOURCE: &str = "Herald";

/// Body of an Opsgenie "create alert" call. Empty fields are omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AlertRequest {
    pub message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub responders: Vec<Responder>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub visible_to: Vec<Responder>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub entity: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub priority: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
}

impl AlertRequest {
    /// Assemble the request for `recipient` from a rendered notification.
    ///
    /// The recipient becomes the single `team` responder. A notification
    /// without an Opsgenie payload produces a message-only alert.
    pub fn from_notification(notification: &Notification, recipient: &Recipient) -> Self {
        let mut request = AlertRequest {
            message: notification.message.clone(),
            responders: vec![Responder::team(recipient.0.clone())],
            source: ALERT_SOURCE.to_string(),
            ..AlertRequest::default()
        };
        if let Some(payload) = &notification.opsgenie {
            request.alias = payload.alias.clone();
            request.description = payload.description.clone();
            request.visible_to = payload.visible_to.clone();
            request.actions = payload.actions.clone();
            request.tags = payload.tags.clone();
            request.details = payload.details.clone();
            request.entity = payload.entity.clone();
            request.priority = payload.priority.clone();
            request.user = payload.user.clone();
            request.note = payload.note.clone();
        }
        request
    }
}

/// Acknowledgement returned by the backend. Opsgenie processes alert
/// creation asynchronously; `request_id` can be used to poll its status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AlertResponse {
    #[serde(default)]
    pub result: String,
    #[serde(default)]
    pub took: f64,
    #[serde(default)]
    pub request_id: String,
}
