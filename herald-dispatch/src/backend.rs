//! Alert backends — the [`AlertBackend`] seam and its Opsgenie HTTP
//! implementation.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use herald_core::{ApiKey, OpsgenieOptions};

use crate::error::BackendError;
use crate::request::{AlertRequest, AlertResponse};

/// Capability to create one alert.
///
/// The credential is supplied per call so one backend (and its connection
/// pool) serves every recipient.
pub trait AlertBackend: Send + Sync {
    fn create_alert(
        &self,
        api_key: &ApiKey,
        request: &AlertRequest,
    ) -> Result<AlertResponse, BackendError>;
}

impl<B: AlertBackend + ?Sized> AlertBackend for Arc<B> {
    fn create_alert(
        &self,
        api_key: &ApiKey,
        request: &AlertRequest,
    ) -> Result<AlertResponse, BackendError> {
        (**self).create_alert(api_key, request)
    }
}

// ---------------------------------------------------------------------------
// Opsgenie
// ---------------------------------------------------------------------------

/// Opsgenie REST backend: `POST {api_url}/v2/alerts`.
///
/// Holds one [`ureq::Agent`], which pools connections and is cheap to clone.
#[derive(Clone)]
pub struct OpsgenieBackend {
    agent: ureq::Agent,
    api_url: String,
}

impl OpsgenieBackend {
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            api_url: api_url.into(),
        }
    }

    pub fn from_options(options: &OpsgenieOptions) -> Self {
        Self::new(options.api_url.clone(), options.timeout())
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn alerts_url(&self) -> String {
        format!("{}/v2/alerts", self.api_url.trim_end_matches('/'))
    }
}

impl fmt::Debug for OpsgenieBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpsgenieBackend")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl AlertBackend for OpsgenieBackend {
    fn create_alert(
        &self,
        api_key: &ApiKey,
        request: &AlertRequest,
    ) -> Result<AlertResponse, BackendError> {
        let url = self.alerts_url();
        let body = serde_json::to_value(request)?;
        debug!(service = "opsgenie", %url, alias = %request.alias, "POST create alert");

        let response = self
            .agent
            .post(&url)
            .set("Authorization", &format!("GenieKey {}", api_key.expose()))
            .send_json(body);

        match response {
            Ok(res) => {
                let status = res.status();
                let ack: AlertResponse = res.into_json().map_err(BackendError::Decode)?;
                debug!(
                    service = "opsgenie",
                    status,
                    request_id = %ack.request_id,
                    took = ack.took,
                    "alert accepted"
                );
                Ok(ack)
            }
            Err(ureq::Error::Status(status, res)) => {
                let body = res
                    .into_string()
                    .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
                warn!(service = "opsgenie", status, body = %body, "alert rejected");
                Err(BackendError::Status { status, body })
            }
            Err(ureq::Error::Transport(transport)) => {
                warn!(service = "opsgenie", error = %transport, "alert request failed");
                Err(BackendError::Transport(Box::new(transport)))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
