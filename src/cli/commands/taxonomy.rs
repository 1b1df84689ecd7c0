//! Implementation of the `mender taxonomy` command.

use std::collections::BTreeMap;

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::display::{list_table, render_list};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::error_kind::normalize_tag;
use crate::domain::models::{Config, ErrorKind};
use crate::services::taxonomy::{confidence, Taxonomy, TaxonomyEntry};

#[derive(Args, Debug, Default)]
pub struct TaxonomyArgs {}

#[derive(Debug, Serialize)]
pub struct TaxonomyOutput {
    pub kinds: Vec<TaxonomyEntry>,
    pub confidences: BTreeMap<String, f64>,
    /// Normalised alias -> resolved kind tag
    pub aliases: BTreeMap<String, String>,
}

impl TaxonomyOutput {
    pub fn from_config(config: &Config) -> Self {
        Self {
            kinds: Taxonomy::entries(),
            confidences: confidence::ALL
                .iter()
                .map(|(name, value)| ((*name).to_string(), *value))
                .collect(),
            aliases: config
                .taxonomy
                .aliases
                .iter()
                .map(|(alias, target)| {
                    (normalize_tag(alias), ErrorKind::from_tag(target).as_tag().to_string())
                })
                .collect(),
        }
    }
}

impl CommandOutput for TaxonomyOutput {
    fn to_human(&self) -> String {
        let mut kinds = list_table(&["kind", "priority", "strategy"]);
        for entry in &self.kinds {
            kinds.add_row(vec![
                entry.kind.clone(),
                entry.priority.to_string(),
                entry.strategy.to_string(),
            ]);
        }

        let mut confidences = list_table(&["fix", "confidence"]);
        for (name, value) in confidence::ALL {
            confidences.add_row(vec![(*name).to_string(), format!("{value:.2}")]);
        }

        let mut sections = vec![
            render_list("error kind", "error kinds", &kinds, self.kinds.len()),
            String::new(),
            render_list("confidence", "confidences", &confidences, confidence::ALL.len()),
        ];

        if !self.aliases.is_empty() {
            let mut aliases = list_table(&["alias", "kind"]);
            for (alias, kind) in &self.aliases {
                aliases.add_row(vec![alias.clone(), kind.clone()]);
            }
            sections.push(String::new());
            sections.push(render_list("alias", "aliases", &aliases, self.aliases.len()));
        }
        sections.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(_args: TaxonomyArgs, config: &Config, json_mode: bool) -> Result<i32> {
    output(&TaxonomyOutput::from_config(config), json_mode);
    Ok(0)
}
