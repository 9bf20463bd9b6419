//! Tera-backed field templates.
//!
//! A [`FieldTemplate`] is one templated string, parsed once and rendered any
//! number of times. Each template owns its own [`Tera`] instance holding a
//! single template named after the field, so parse and render errors always
//! point at the field that caused them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tera::{Tera, Value};

use crate::context::Vars;
use crate::error::{describe, CompileError, RenderError};

// ---------------------------------------------------------------------------
// Host functions
// ---------------------------------------------------------------------------

type FunctionFn = dyn Fn(&HashMap<String, Value>) -> tera::Result<Value> + Send + Sync;
type FilterFn = dyn Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync;

/// Extra functions and filters made available to every compiled template,
/// on top of Tera's built-ins.
///
/// ```rust
/// use herald_renderer::TemplateFunctions;
///
/// let funcs = TemplateFunctions::new()
///     .filter("shout", |v, _| Ok(v.as_str().unwrap_or_default().to_uppercase().into()));
/// ```
#[derive(Clone, Default)]
pub struct TemplateFunctions {
    functions: Vec<(String, Arc<FunctionFn>)>,
    filters: Vec<(String, Arc<FilterFn>)>,
}

impl TemplateFunctions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function callable as `{{ name(arg=...) }}`.
    pub fn function<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&HashMap<String, Value>) -> tera::Result<Value> + Send + Sync + 'static,
    {
        self.functions.push((name.into(), Arc::new(f)));
        self
    }

    /// Register a filter callable as `{{ value | name }}`.
    pub fn filter<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Value, &HashMap<String, Value>) -> tera::Result<Value> + Send + Sync + 'static,
    {
        self.filters.push((name.into(), Arc::new(f)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.filters.is_empty()
    }

    fn install(&self, tera: &mut Tera) {
        for (name, f) in &self.functions {
            let f = Arc::clone(f);
            tera.register_function(name, move |args: &HashMap<String, Value>| f(args));
        }
        for (name, f) in &self.filters {
            let f = Arc::clone(f);
            tera.register_filter(
                name,
                move |value: &Value, args: &HashMap<String, Value>| f(value, args),
            );
        }
    }
}

impl fmt::Debug for TemplateFunctions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateFunctions")
            .field("functions", &self.functions.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .field("filters", &self.filters.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// FieldTemplate
// ---------------------------------------------------------------------------

/// One compiled, reusable template for a single string field.
///
/// Rendering takes `&self` only, so one template may be rendered from many
/// threads at once with different variables.
pub struct FieldTemplate {
    name: String,
    source: String,
    /// `None` for an empty template, which always renders to `""`.
    tera: Option<Tera>,
}

impl FieldTemplate {
    /// Parse `source` as the template for field `name`.
    pub fn compile(
        name: impl Into<String>,
        source: &str,
        functions: &TemplateFunctions,
    ) -> Result<Self, CompileError> {
        let name = name.into();
        if source.is_empty() {
            return Ok(Self {
                name,
                source: String::new(),
                tera: None,
            });
        }

        let mut tera = Tera::default();
        // Alerts are plain text; never HTML-escape.
        tera.autoescape_on(vec![]);
        functions.install(&mut tera);
        if let Err(source_err) = tera.add_raw_template(&name, source) {
            return Err(CompileError {
                detail: describe(&source_err),
                field: name,
                source: source_err,
            });
        }

        Ok(Self {
            name,
            source: source.to_string(),
            tera: Some(tera),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Template text this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_empty(&self) -> bool {
        self.tera.is_none()
    }

    /// Render against `vars`. Output is all-or-nothing.
    pub fn render(&self, vars: &Vars) -> Result<String, RenderError> {
        if self.is_empty() {
            return Ok(String::new());
        }
        let ctx = vars.to_tera_context()?;
        self.render_context(&ctx)
    }

    /// Render against a context that was already built for this event.
    pub(crate) fn render_context(&self, ctx: &tera::Context) -> Result<String, RenderError> {
        let Some(tera) = &self.tera else {
            return Ok(String::new());
        };
        tera.render(&self.name, ctx).map_err(|source| RenderError::Field {
            field: self.name.clone(),
            detail: describe(&source),
            source,
        })
    }
}

impl fmt::Debug for FieldTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldTemplate")
            .field("name", &self.name)
            .field("source", &self.source)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile(source: &str) -> FieldTemplate {
        FieldTemplate::compile("alias", source, &TemplateFunctions::default())
            .expect("template should compile")
    }

    #[test]
    fn substitutes_variables() {
        let t = compile("svc-{{ name }}");
        let out = t.render(&Vars::new().with("name", "checkout")).unwrap();
        assert_eq!(out, "svc-checkout");
    }

    #[test]
    fn supports_conditionals_and_loops() {
        let t = compile("{% if critical %}P1{% else %}P3{% endif %}:{% for z in zones %}{{ z }};{% endfor %}");
        let vars = Vars::new()
            .with("critical", true)
            .with("zones", json!(["a", "b"]));
        assert_eq!(t.render(&vars).unwrap(), "P1:a;b;");
    }

    #[test]
    fn empty_template_renders_empty_without_vars() {
        let t = compile("");
        assert!(t.is_empty());
        assert_eq!(t.render(&Vars::new()).unwrap(), "");
        assert_eq!(t.render(&Vars::new().with("x", 1)).unwrap(), "");
    }

    #[test]
    fn does_not_escape_html() {
        let t = compile("{{ msg }}");
        let out = t.render(&Vars::new().with("msg", "<b>a & b</b>")).unwrap();
        assert_eq!(out, "<b>a & b</b>");
    }

    #[test]
    fn compile_error_names_field() {
        let err = FieldTemplate::compile("priority", "{{ unclosed", &TemplateFunctions::default())
            .unwrap_err();
        assert_eq!(err.field, "priority");
        assert!(err.to_string().contains("`priority`"), "got: {err}");
    }

    #[test]
    fn undefined_variable_is_render_error() {
        let t = compile("svc-{{ name }}");
        let err = t.render(&Vars::new()).unwrap_err();
        match err {
            RenderError::Field { field, detail, .. } => {
                assert_eq!(field, "alias");
                assert!(detail.contains("name"), "detail should mention the variable: {detail}");
            }
            other => panic!("expected field error, got {other}"),
        }
    }

    #[test]
    fn custom_filter_and_function_are_available() {
        let funcs = TemplateFunctions::new()
            .filter("shout", |v: &Value, _: &HashMap<String, Value>| {
                Ok(Value::String(v.as_str().unwrap_or_default().to_uppercase()))
            })
            .function("region", |_: &HashMap<String, Value>| Ok(Value::from("eu-west-1")));
        assert!(!funcs.is_empty());
        let t = FieldTemplate::compile("note", "{{ name | shout }}@{{ region() }}", &funcs)
            .expect("compile");
        let out = t.render(&Vars::new().with("name", "api")).unwrap();
        assert_eq!(out, "API@eu-west-1");
    }

    #[test]
    fn source_is_kept() {
        let t = compile("x{{ y }}");
        assert_eq!(t.source(), "x{{ y }}");
        assert_eq!(t.name(), "alias");
    }
}
