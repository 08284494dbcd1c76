use std::cmp::Ordering;
use std::path::Path;

use anyhow::{bail, Context};
use ordseq_merge::MergeConfig;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Settings shared by every command. Loaded from TOML, then overridden by
/// command-line flags.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Field delimiter; `None` orders by the whole line.
    pub delimiter: Option<String>,
    /// 1-based key field within a delimited record.
    pub key_field: usize,
    pub show_unchanged: bool,
    pub check_order: bool,
    pub format: OutputFormat,
    pub merge: MergeConfig,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            key_field: 1,
            show_unchanged: false,
            check_order: false,
            format: OutputFormat::Text,
            merge: MergeConfig::default(),
        }
    }
}

impl ToolConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    /// The config file named on the command line (or defaults), with flags
    /// applied on top.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(delimiter) = &cli.delimiter {
            config.delimiter = Some(delimiter.clone());
        }
        if let Some(field) = cli.key_field {
            config.key_field = field;
        }
        if let Some(format) = cli.format {
            config.format = format;
        }
        config.check_order |= cli.check_order;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.key_field == 0 {
            bail!("key field numbers start at 1");
        }
        if self.delimiter.as_deref() == Some("") {
            bail!("delimiter must not be empty");
        }
        Ok(())
    }

    pub fn key_spec(&self) -> KeySpec {
        KeySpec {
            delimiter: self.delimiter.as_deref().map(unescape),
            field: self.key_field,
        }
    }
}

fn unescape(delimiter: &str) -> String {
    match delimiter {
        "\\t" => "\t".to_string(),
        other => other.to_string(),
    }
}

/// Extracts the ordering key from a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeySpec {
    delimiter: Option<String>,
    field: usize,
}

impl KeySpec {
    /// The key of `line`. A record without the key field has the empty key.
    pub fn key<'a>(&self, line: &'a str) -> &'a str {
        match &self.delimiter {
            None => line,
            Some(delimiter) => line
                .split(delimiter.as_str())
                .nth(self.field.saturating_sub(1))
                .unwrap_or(""),
        }
    }

    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.key(a).cmp(self.key(b))
    }
}
