//! `herald send <template> --recipient <key>` — render and create an alert.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tracing::debug;

use herald_core::{config, Destination, Notification};
use herald_dispatch::Dispatcher;
use herald_renderer::Templater;

use super::{load_plan, VarsArgs};

/// Arguments for `herald send`.
#[derive(Args, Debug)]
pub struct SendArgs {
    /// Notification template file (YAML).
    pub template: PathBuf,

    /// Recipient key: selects the API key and becomes the team responder.
    #[arg(long, short = 'r')]
    pub recipient: String,

    #[command(flatten)]
    pub vars: VarsArgs,

    /// Service config with the Opsgenie endpoint and API keys.
    /// Defaults to ~/.herald/config.yaml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the alert request instead of sending it.
    #[arg(long)]
    pub dry_run: bool,
}

impl SendArgs {
    pub fn run(self) -> Result<()> {
        let config_path = match &self.config {
            Some(path) => path.clone(),
            None => {
                let home = dirs::home_dir().context("could not determine home directory")?;
                config::default_config_path_at(&home)
            }
        };
        let service = config::load_service_config_at(&config_path)
            .with_context(|| format!("failed to load config '{}'", config_path.display()))?;
        debug!(config = %config_path.display(), "loaded service config");

        let plan = load_plan(&self.template)?;
        let vars = self.vars.load()?;

        let mut notification = Notification::default();
        plan.render(&mut notification, &vars)
            .with_context(|| format!("failed to render '{}'", self.template.display()))?;

        let dispatcher = Dispatcher::from_options(&service.opsgenie);
        let destination = Destination::new(self.recipient.as_str());

        if self.dry_run {
            let request = dispatcher
                .request_for(&notification, &destination)
                .with_context(|| format!("cannot send to '{}'", self.recipient))?;
            println!("{}", serde_json::to_string_pretty(&request)?);
            return Ok(());
        }

        let ack = dispatcher
            .send(&notification, &destination)
            .with_context(|| format!("failed to send alert to '{}'", self.recipient))?;
        println!(
            "{} alert sent to '{}' (request id: {})",
            "✓".green(),
            self.recipient,
            ack.request_id
        );
        Ok(())
    }
}
