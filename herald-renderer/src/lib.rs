//! # herald-renderer
//!
//! Compile-once, render-many templating for alert notifications, built on
//! Tera.
//!
//! ## Usage
//!
//! ```rust
//! use herald_core::{Notification, OpsgenieSpec};
//! use herald_renderer::{compile, Templater, Vars};
//!
//! let spec: OpsgenieSpec =
//!     serde_yaml::from_str("schema: structured\nalias: \"svc-{{ name }}\"\npriority: P1\n")
//!         .expect("valid spec");
//! let plan = compile(&spec).expect("templates compile");
//!
//! let mut notification = Notification::default();
//! plan.render(&mut notification, &Vars::new().with("name", "checkout"))
//!     .expect("variables satisfy the templates");
//! assert_eq!(notification.opsgenie.unwrap().alias, "svc-checkout");
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod plan;

pub use context::Vars;
pub use engine::{FieldTemplate, TemplateFunctions};
pub use error::{CompileError, RenderError};
pub use plan::{
    compile, compile_notification, compile_with, NotificationPlan, RenderingPlan, Templater,
};
