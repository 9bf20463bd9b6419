//! Dispatcher — credential lookup, request assembly, one backend call.

use std::collections::BTreeMap;

use tracing::{info, instrument};

use herald_core::{ApiKey, Destination, Notification, OpsgenieOptions, Recipient};

use crate::backend::{AlertBackend, OpsgenieBackend};
use crate::error::DispatchError;
use crate::request::{AlertRequest, AlertResponse};

/// Recipient key → API key. Read-only once the dispatcher is built.
pub type Credentials = BTreeMap<Recipient, ApiKey>;

/// Sends rendered notifications to an [`AlertBackend`].
///
/// Build once and share: the credential map is immutable and the backend
/// owns the pooled transport. Every [`send`](Self::send) makes at most one
/// backend call; there is no retry.
#[derive(Debug)]
pub struct Dispatcher<B = OpsgenieBackend> {
    backend: B,
    credentials: Credentials,
}

impl Dispatcher<OpsgenieBackend> {
    /// Opsgenie dispatcher for the endpoint and keys in `options`.
    pub fn from_options(options: &OpsgenieOptions) -> Self {
        Self::new(OpsgenieBackend::from_options(options), options.api_keys.clone())
    }
}

impl<B: AlertBackend> Dispatcher<B> {
    pub fn new(backend: B, credentials: Credentials) -> Self {
        Self {
            backend,
            credentials,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Recipients with a configured credential.
    pub fn recipients(&self) -> impl Iterator<Item = &Recipient> {
        self.credentials.keys()
    }

    fn credential(&self, recipient: &Recipient) -> Result<&ApiKey, DispatchError> {
        self.credentials
            .get(recipient)
            .ok_or_else(|| DispatchError::MissingCredential {
                recipient: recipient.clone(),
            })
    }

    /// The request [`send`](Self::send) would make, without making it.
    ///
    /// Fails the same way `send` does when no credential is configured.
    pub fn request_for(
        &self,
        notification: &Notification,
        destination: &Destination,
    ) -> Result<AlertRequest, DispatchError> {
        self.credential(&destination.recipient)?;
        Ok(AlertRequest::from_notification(
            notification,
            &destination.recipient,
        ))
    }

    /// Create one alert for `destination` from a rendered notification.
    ///
    /// Only call this with a notification whose render succeeded.
    #[instrument(
        skip(self, notification, destination),
        fields(recipient = %destination.recipient)
    )]
    pub fn send(
        &self,
        notification: &Notification,
        destination: &Destination,
    ) -> Result<AlertResponse, DispatchError> {
        let api_key = self.credential(&destination.recipient)?;
        let request = AlertRequest::from_notification(notification, &destination.recipient);
        let response = self.backend.create_alert(api_key, &request)?;
        info!(
            alias = %request.alias,
            request_id = %response.request_id,
            "alert dispatched"
        );
        Ok(response)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
