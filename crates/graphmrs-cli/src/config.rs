//! Run configuration.
//!
//! An optional JSON file names the data files and the generator; command-line
//! flags override individual fields. Relative paths in the file are resolved
//! against the file's own directory.
//!
//! ```json
//! {
//!   "synopsis": "synopses.json",
//!   "lexicon": "lexicon.json",
//!   "composition_table": "composition_table.json",
//!   "generator": { "program": "ace", "args": ["-g", "erg.dat", "-e"] },
//!   "default_quantifier": "def_udef_a_q"
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub synopsis: Option<PathBuf>,
    #[serde(default)]
    pub lexicon: Option<PathBuf>,
    #[serde(default)]
    pub composition_table: Option<PathBuf>,
    #[serde(default)]
    pub generator: Option<GeneratorConfig>,
    #[serde(default)]
    pub default_quantifier: Option<String>,
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub synopsis: Option<PathBuf>,
    pub lexicon: Option<PathBuf>,
    pub composition_table: Option<PathBuf>,
    pub generator: Option<String>,
    pub default_quantifier: Option<String>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_paths(base);
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for p in [
            &mut self.synopsis,
            &mut self.lexicon,
            &mut self.composition_table,
        ]
        .into_iter()
        .flatten()
        {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
    }

    pub fn apply(mut self, overrides: Overrides) -> Self {
        if overrides.synopsis.is_some() {
            self.synopsis = overrides.synopsis;
        }
        if overrides.lexicon.is_some() {
            self.lexicon = overrides.lexicon;
        }
        if overrides.composition_table.is_some() {
            self.composition_table = overrides.composition_table;
        }
        if let Some(command) = overrides.generator {
            let mut words = command.split_whitespace().map(str::to_string);
            if let Some(program) = words.next() {
                self.generator = Some(GeneratorConfig {
                    program,
                    args: words.collect(),
                });
            }
        }
        if overrides.default_quantifier.is_some() {
            self.default_quantifier = overrides.default_quantifier;
        }
        self
    }

    pub fn synopsis_path(&self) -> Result<&Path> {
        self.synopsis
            .as_deref()
            .context("no synopsis table given (use --synopsis or the config file)")
    }

    pub fn lexicon_path(&self) -> Result<&Path> {
        self.lexicon
            .as_deref()
            .context("no lexicon given (use --lexicon or the config file)")
    }
}
