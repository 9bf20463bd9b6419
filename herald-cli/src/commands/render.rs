//! `herald render <template>` — render against variables and print.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use herald_core::Notification;
use herald_renderer::Templater;

use super::{load_plan, VarsArgs};

/// Arguments for `herald render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Notification template file (YAML).
    pub template: PathBuf,

    #[command(flatten)]
    pub vars: VarsArgs,

    /// Print YAML instead of JSON.
    #[arg(long)]
    pub yaml: bool,
}

impl RenderArgs {
    pub fn run(self) -> Result<()> {
        let plan = load_plan(&self.template)?;
        let vars = self.vars.load()?;

        let mut notification = Notification::default();
        plan.render(&mut notification, &vars)
            .with_context(|| format!("failed to render '{}'", self.template.display()))?;

        if self.yaml {
            print!("{}", serde_yaml::to_string(&notification)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&notification)?);
        }
        Ok(())
    }
}
