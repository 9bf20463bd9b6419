//! `herald check <template>` — compile a template and list its fields.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use herald_renderer::{FieldTemplate, NotificationPlan};

use super::load_plan;

/// Arguments for `herald check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Notification template file (YAML).
    pub template: PathBuf,
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "field")]
    field: String,
    #[tabled(rename = "template")]
    template: String,
}

impl CheckArgs {
    pub fn run(self) -> Result<()> {
        let plan = load_plan(&self.template)?;
        let rows = field_rows(&plan);

        let schema = plan.opsgenie().map(|p| p.schema()).unwrap_or("none");
        println!(
            "{} '{}' compiles ({} templated fields, opsgenie schema: {})",
            "✓".green(),
            self.template.display(),
            rows.len(),
            schema
        );
        if !rows.is_empty() {
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
        Ok(())
    }
}

fn field_rows(plan: &NotificationPlan) -> Vec<FieldRow> {
    let mut rows = Vec::new();
    if !plan.message().is_empty() {
        rows.push(row(plan.message()));
    }
    if let Some(opsgenie) = plan.opsgenie() {
        rows.extend(
            opsgenie
                .fields()
                .filter_map(|field| opsgenie.template(field))
                .map(row),
        );
    }
    rows
}

fn row(template: &FieldTemplate) -> FieldRow {
    FieldRow {
        field: template.name().to_string(),
        template: template.source().to_string(),
    }
}
