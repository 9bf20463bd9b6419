//! # herald-dispatch
//!
//! Sends rendered notifications to an alert-management backend.
//!
//! ```rust,no_run
//! use herald_core::{Destination, Notification, OpsgenieOptions};
//! use herald_dispatch::Dispatcher;
//!
//! fn page(options: &OpsgenieOptions, notification: &Notification) {
//!     let dispatcher = Dispatcher::from_options(options);
//!     if let Err(e) = dispatcher.send(notification, &Destination::new("team-x")) {
//!         eprintln!("alert not sent: {e}");
//!     }
//! }
//! ```

pub mod backend;
pub mod dispatcher;
pub mod error;
pub mod request;

pub use backend::{AlertBackend, OpsgenieBackend};
pub use dispatcher::{Credentials, Dispatcher};
pub use error::{BackendError, DispatchError};
pub use request::{AlertRequest, AlertResponse, ALERT_SOURCE};
