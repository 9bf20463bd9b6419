//! Template compiler and templaters.
//!
//! [`compile`] turns an [`OpsgenieSpec`] into a [`RenderingPlan`] once, at
//! load time. The plan is then rendered for every event through the
//! [`Templater`] trait. [`compile_notification`] does the same for a whole
//! [`NotificationTemplate`], top-level message included.

use std::collections::BTreeMap;
use std::sync::Arc;

use herald_core::{
    Field, Notification, NotificationTemplate, OpsgenieNotification, OpsgenieSpec, PassThrough,
    Responder,
};

use crate::context::Vars;
use crate::engine::{FieldTemplate, TemplateFunctions};
use crate::error::{CompileError, RenderError};

/// Anything that can populate a [`Notification`] from a variable binding.
///
/// Implementations are shared read-only between threads; all per-event state
/// lives in the notification and the variables passed in.
pub trait Templater: Send + Sync {
    /// Render into `notification`, overwriting the fields this templater owns.
    ///
    /// On error the notification is left partially written and must not be
    /// dispatched.
    fn render(&self, notification: &mut Notification, vars: &Vars) -> Result<(), RenderError>;
}

// ---------------------------------------------------------------------------
// RenderingPlan
// ---------------------------------------------------------------------------

/// Compiled form of one [`OpsgenieSpec`].
///
/// Holds a [`FieldTemplate`] for each templated field with non-empty text.
/// Templated fields with empty text are tracked separately and always render
/// to the empty string.
#[derive(Debug)]
pub struct RenderingPlan {
    schema: &'static str,
    templates: Vec<(Field, FieldTemplate)>,
    blank: Vec<Field>,
    pass_through: Option<Arc<PassThrough>>,
}

/// Compile `spec` with Tera's built-in functions only.
pub fn compile(spec: &OpsgenieSpec) -> Result<RenderingPlan, CompileError> {
    compile_with(spec, &TemplateFunctions::default())
}

/// Compile `spec`, making `functions` available to every field template.
///
/// Stops at the first field that fails to parse.
pub fn compile_with(
    spec: &OpsgenieSpec,
    functions: &TemplateFunctions,
) -> Result<RenderingPlan, CompileError> {
    let mut templates = Vec::new();
    let mut blank = Vec::new();
    for (field, text) in spec.templated_fields() {
        if text.is_empty() {
            blank.push(field);
            continue;
        }
        let template = FieldTemplate::compile(field.as_str(), text, functions)?;
        templates.push((field, template));
    }

    Ok(RenderingPlan {
        schema: spec.schema(),
        templates,
        blank,
        pass_through: spec.pass_through().map(Arc::new),
    })
}

impl RenderingPlan {
    /// Schema (`structured` or `templated`) this plan was compiled from.
    pub fn schema(&self) -> &'static str {
        self.schema
    }

    /// Fields that carry a compiled template, in render order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.templates.iter().map(|(field, _)| *field)
    }

    pub fn template(&self, field: Field) -> Option<&FieldTemplate> {
        self.templates
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, t)| t)
    }

    /// Structured values copied verbatim on every render.
    pub fn pass_through(&self) -> Option<&PassThrough> {
        self.pass_through.as_deref()
    }

    /// Create the payload if needed and copy the pass-through values in.
    fn prepare<'n>(&self, notification: &'n mut Notification) -> &'n mut OpsgenieNotification {
        let payload = notification.opsgenie.get_or_insert_with(Default::default);
        if let Some(pt) = &self.pass_through {
            payload.visible_to = pt.visible_to.clone();
            payload.actions = pt.actions.clone();
            payload.tags = pt.tags.clone();
            payload.details = pt.details.clone();
        }
        payload
    }

    fn fill(
        &self,
        payload: &mut OpsgenieNotification,
        ctx: &tera::Context,
    ) -> Result<(), RenderError> {
        for field in &self.blank {
            write_field(payload, *field, String::new())?;
        }
        for (field, template) in &self.templates {
            let text = template.render_context(ctx)?;
            write_field(payload, *field, text)?;
        }
        Ok(())
    }
}

impl Templater for RenderingPlan {
    fn render(&self, notification: &mut Notification, vars: &Vars) -> Result<(), RenderError> {
        let payload = self.prepare(notification);
        let ctx = vars.to_tera_context()?;
        self.fill(payload, &ctx)
    }
}

// ---------------------------------------------------------------------------
// NotificationPlan
// ---------------------------------------------------------------------------

/// Compiled form of a whole [`NotificationTemplate`].
#[derive(Debug)]
pub struct NotificationPlan {
    message: FieldTemplate,
    opsgenie: Option<RenderingPlan>,
}

/// Compile the message template and, if present, the Opsgenie spec.
pub fn compile_notification(
    template: &NotificationTemplate,
    functions: &TemplateFunctions,
) -> Result<NotificationPlan, CompileError> {
    let message = FieldTemplate::compile("message", &template.message, functions)?;
    let opsgenie = template
        .opsgenie
        .as_ref()
        .map(|spec| compile_with(spec, functions))
        .transpose()?;
    Ok(NotificationPlan { message, opsgenie })
}

impl NotificationPlan {
    pub fn message(&self) -> &FieldTemplate {
        &self.message
    }

    pub fn opsgenie(&self) -> Option<&RenderingPlan> {
        self.opsgenie.as_ref()
    }
}

impl Templater for NotificationPlan {
    fn render(&self, notification: &mut Notification, vars: &Vars) -> Result<(), RenderError> {
        // Pass-through values land before any template runs, message included.
        if let Some(plan) = &self.opsgenie {
            plan.prepare(notification);
        }
        let ctx = vars.to_tera_context()?;
        notification.message = self.message.render_context(&ctx)?;
        if let (Some(plan), Some(payload)) = (&self.opsgenie, notification.opsgenie.as_mut()) {
            plan.fill(payload, &ctx)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Writing rendered text into the payload
// ---------------------------------------------------------------------------

fn write_field(
    payload: &mut OpsgenieNotification,
    field: Field,
    text: String,
) -> Result<(), RenderError> {
    match field {
        Field::VisibleTo => payload.visible_to = decode_responders(field, &text)?,
        Field::Actions => payload.actions = split_list(&text),
        Field::Tags => payload.tags = split_list(&text),
        Field::Details => payload.details = decode_details(field, &text)?,
        text_field => {
            if let Some(slot) = payload.text_mut(text_field) {
                *slot = text;
            }
        }
    }
    Ok(())
}

/// `"a, b,,c"` → `["a", "b", "c"]`.
fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn decode_error(field: Field, detail: impl ToString) -> RenderError {
    RenderError::Decode {
        field: field.as_str().to_string(),
        detail: detail.to_string(),
    }
}

/// YAML sequence of responder descriptors; blank text is an empty list.
fn decode_responders(field: Field, text: &str) -> Result<Vec<Responder>, RenderError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_yaml::from_str(text).map_err(|e| decode_error(field, e))
}

/// YAML mapping of scalars; values are stringified, blank text is an empty map.
fn decode_details(field: Field, text: &str) -> Result<BTreeMap<String, String>, RenderError> {
    if text.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let raw: BTreeMap<String, serde_yaml::Value> =
        serde_yaml::from_str(text).map_err(|e| decode_error(field, e))?;
    raw.into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_yaml::Value::Null => String::new(),
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Number(n) => n.to_string(),
                serde_yaml::Value::String(s) => s,
                _ => {
                    return Err(decode_error(
                        field,
                        format!("value of `{key}` must be a scalar"),
                    ))
                }
            };
            Ok((key, value))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
