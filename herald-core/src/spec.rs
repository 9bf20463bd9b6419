//! Notification specifications as they appear in configuration.
//!
//! Two schemas exist for the Opsgenie portion of a notification. Which one a
//! template uses is an explicit choice made with the `schema:` key; there is
//! no default.
//!
//! ```yaml
//! message: "{{ app }} is degraded"
//! opsgenie:
//!   schema: structured        # or: templated
//!   alias: "svc-{{ name }}"
//!   priority: P1
//!   tags: [prod]
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Field, Responder};

/// A complete notification template: top-level message plus backend specs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct NotificationTemplate {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opsgenie: Option<OpsgenieSpec>,
}

/// The Opsgenie portion of a notification template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "schema", rename_all = "lowercase")]
pub enum OpsgenieSpec {
    /// Text fields are templates; responders, actions, tags and details are
    /// structured values passed through unmodified.
    Structured(StructuredSpec),
    /// Every field is a template string.
    Templated(TemplatedSpec),
}

/// Structured values copied verbatim into the rendered payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PassThrough {
    pub visible_to: Vec<Responder>,
    pub actions: Vec<String>,
    pub tags: Vec<String>,
    pub details: BTreeMap<String, String>,
}

/// Text fields are templates; the rest are structured values.
///
/// Unknown keys are rejected so a misspelled field fails at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StructuredSpec {
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub entity: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub visible_to: Vec<Responder>,
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

impl StructuredSpec {
    pub fn text_fields(&self) -> [(Field, &str); 6] {
        [
            (Field::Alias, self.alias.as_str()),
            (Field::Description, self.description.as_str()),
            (Field::Entity, self.entity.as_str()),
            (Field::Priority, self.priority.as_str()),
            (Field::User, self.user.as_str()),
            (Field::Note, self.note.as_str()),
        ]
    }

    pub fn pass_through(&self) -> PassThrough {
        PassThrough {
            visible_to: self.visible_to.clone(),
            actions: self.actions.clone(),
            tags: self.tags.clone(),
            details: self.details.clone(),
        }
    }
}

/// Every field is a template string. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TemplatedSpec {
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub entity: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub visible_to: String,
    #[serde(default)]
    pub actions: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub details: String,
}

impl TemplatedSpec {
    pub fn fields(&self) -> [(Field, &str); 10] {
        [
            (Field::Alias, self.alias.as_str()),
            (Field::Description, self.description.as_str()),
            (Field::Entity, self.entity.as_str()),
            (Field::Priority, self.priority.as_str()),
            (Field::User, self.user.as_str()),
            (Field::Note, self.note.as_str()),
            (Field::VisibleTo, self.visible_to.as_str()),
            (Field::Actions, self.actions.as_str()),
            (Field::Tags, self.tags.as_str()),
            (Field::Details, self.details.as_str()),
        ]
    }
}

impl OpsgenieSpec {
    /// Schema name as written in configuration.
    pub fn schema(&self) -> &'static str {
        match self {
            OpsgenieSpec::Structured(_) => "structured",
            OpsgenieSpec::Templated(_) => "templated",
        }
    }

    /// Template text of every templated field of the active schema, in a
    /// fixed order. Empty strings are included.
    pub fn templated_fields(&self) -> Vec<(Field, &str)> {
        match self {
            OpsgenieSpec::Structured(s) => s.text_fields().to_vec(),
            OpsgenieSpec::Templated(s) => s.fields().to_vec(),
        }
    }

    /// Structured pass-through values, if the active schema has any.
    pub fn pass_through(&self) -> Option<PassThrough> {
        match self {
            OpsgenieSpec::Structured(s) => Some(s.pass_through()),
            OpsgenieSpec::Templated(_) => None,
        }
    }
}
