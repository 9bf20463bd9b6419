//! Domain types shared by the renderer and the dispatcher.
//!
//! Field names follow the Opsgenie alert API (camelCase on the wire).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Opaque key identifying the recipient (team) of a notification.
///
/// Used both to look up the API credential and as the id of the responder.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipient(pub String);

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Recipient {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Recipient {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Target of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub recipient: Recipient,
}

impl Destination {
    pub fn new(recipient: impl Into<Recipient>) -> Self {
        Self {
            recipient: recipient.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Responders
// ---------------------------------------------------------------------------

/// Kind of an Opsgenie responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResponderType {
    #[default]
    Team,
    User,
    Escalation,
    Schedule,
}

impl fmt::Display for ResponderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponderType::Team => write!(f, "team"),
            ResponderType::User => write!(f, "user"),
            ResponderType::Escalation => write!(f, "escalation"),
            ResponderType::Schedule => write!(f, "schedule"),
        }
    }
}

/// A responder (or visibility) descriptor.
///
/// Opsgenie identifies a responder by any one of `id`, `name` or `username`;
/// unset identifiers are left out of the request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Responder {
    #[serde(rename = "type")]
    pub kind: ResponderType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
}

impl Responder {
    /// A `team` responder identified by id.
    pub fn team(id: impl Into<String>) -> Self {
        Self {
            kind: ResponderType::Team,
            id: id.into(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// Every attribute of the Opsgenie payload that a template may produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Alias,
    Description,
    Entity,
    Priority,
    User,
    Note,
    VisibleTo,
    Actions,
    Tags,
    Details,
}

impl Field {
    /// Fields that are templated strings in every schema, in render order.
    pub const TEXT: &'static [Field] = &[
        Field::Alias,
        Field::Description,
        Field::Entity,
        Field::Priority,
        Field::User,
        Field::Note,
    ];

    /// Fields that are structured values in the structured schema and
    /// templated strings in the templated schema.
    pub const STRUCTURED: &'static [Field] = &[
        Field::VisibleTo,
        Field::Actions,
        Field::Tags,
        Field::Details,
    ];

    /// Config / wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Alias => "alias",
            Field::Description => "description",
            Field::Entity => "entity",
            Field::Priority => "priority",
            Field::User => "user",
            Field::Note => "note",
            Field::VisibleTo => "visibleTo",
            Field::Actions => "actions",
            Field::Tags => "tags",
            Field::Details => "details",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Rendered notification
// ---------------------------------------------------------------------------

/// The rendered, Opsgenie-specific part of a [`Notification`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OpsgenieNotification {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
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
    pub priority: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
}

impl OpsgenieNotification {
    /// Mutable slot for one of the text fields.
    ///
    /// Returns `None` for the structured fields, which are not plain strings.
    pub fn text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Alias => Some(&mut self.alias),
            Field::Description => Some(&mut self.description),
            Field::Entity => Some(&mut self.entity),
            Field::Priority => Some(&mut self.priority),
            Field::User => Some(&mut self.user),
            Field::Note => Some(&mut self.note),
            Field::VisibleTo | Field::Actions | Field::Tags | Field::Details => None,
        }
    }
}

/// Notification envelope: top-level message plus per-backend payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Notification {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opsgenie: Option<OpsgenieNotification>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
