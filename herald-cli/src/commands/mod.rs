//! Subcommands and the argument groups they share.

pub mod check;
pub mod render;
pub mod send;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Args;

use herald_core::config;
use herald_renderer::{compile_notification, NotificationPlan, TemplateFunctions, Vars};

// ---------------------------------------------------------------------------
// Variables
// ---------------------------------------------------------------------------

/// `key=value` from `--set`. The value is always bound as a string.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub name: String,
    pub value: String,
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => Ok(Self {
                name: name.trim().to_string(),
                value: value.to_string(),
            }),
            _ => Err(format!("expected key=value, got '{s}'")),
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Where render variables come from.
#[derive(Args, Debug)]
pub struct VarsArgs {
    /// YAML or JSON file holding a mapping of template variables.
    #[arg(long, value_name = "FILE")]
    pub vars: Option<PathBuf>,

    /// Bind a single variable; overrides the same key from `--vars`.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<Assignment>,
}

impl VarsArgs {
    pub fn load(&self) -> Result<Vars> {
        let mut vars = match &self.vars {
            Some(path) => Vars::from(
                config::load_vars_at(path)
                    .with_context(|| format!("failed to load variables from '{}'", path.display()))?,
            ),
            None => Vars::new(),
        };
        for assignment in &self.set {
            vars.insert(assignment.name.clone(), assignment.value.clone());
        }
        Ok(vars)
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

/// Load and compile a notification template file.
pub fn load_plan(path: &Path) -> Result<NotificationPlan> {
    let template = config::load_template_at(path)
        .with_context(|| format!("failed to load template '{}'", path.display()))?;
    compile_notification(&template, &TemplateFunctions::default())
        .with_context(|| format!("template '{}' does not compile", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_parses_key_and_value() {
        let a: Assignment = "name=check=out".parse().unwrap();
        assert_eq!(a.name, "name");
        assert_eq!(a.value, "check=out");
        assert_eq!(a.to_string(), "name=check=out");
    }

    #[test]
    fn assignment_rejects_missing_key() {
        assert!("=x".parse::<Assignment>().is_err());
        assert!("novalue".parse::<Assignment>().is_err());
    }

    #[test]
    fn set_overrides_vars_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("vars.yaml");
        std::fs::write(&file, "name: from-file\nenv: prod\n").unwrap();
        let args = VarsArgs {
            vars: Some(file),
            set: vec!["name=from-flag".parse().unwrap()],
        };
        let vars = args.load().unwrap();
        assert_eq!(vars.get_str("name").unwrap(), "from-flag");
        assert_eq!(vars.get_str("env").unwrap(), "prod");
    }
}
