//! Persisted configuration file.
//!
//! Reads return defaults when the file does not exist yet. Updates are
//! merged into the stored document, validated as a whole, and written back
//! through a temporary file so a crash never leaves a truncated config.

use std::fs;
use std::path::{Path, PathBuf};

use eyre::WrapErr;
use toml::{Table, Value};

use crate::Config;

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and validate the stored config; defaults when the file is missing.
    pub fn load(&self) -> eyre::Result<Config> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "config file missing, using defaults");
            return Ok(Config::default());
        }
        let text = fs::read_to_string(&self.path)
            .wrap_err_with(|| format!("read config {}", self.path.display()))?;
        let cfg = crate::load_toml(&text)
            .wrap_err_with(|| format!("parse config {}", self.path.display()))?;
        cfg.validate()
            .wrap_err_with(|| format!("invalid configuration in {}", self.path.display()))?;
        Ok(cfg)
    }

    /// Validate and persist a full config.
    pub fn save(&self, cfg: &Config) -> eyre::Result<()> {
        cfg.validate().wrap_err("refusing to save invalid configuration")?;
        let text = toml::to_string_pretty(cfg).wrap_err("serialize config")?;
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)
                .wrap_err_with(|| format!("create config dir {}", dir.display()))?;
        }
        let tmp = self.path.with_extension("toml.tmp");
        fs::write(&tmp, text).wrap_err_with(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .wrap_err_with(|| format!("replace {}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), "config saved");
        Ok(())
    }

    /// Deep-merge `patch` into the stored config, validate and persist.
    /// Returns the merged config.
    pub fn merge(&self, patch: Table) -> eyre::Result<Config> {
        let current = self.load()?;
        let mut doc = match Value::try_from(&current).wrap_err("serialize current config")? {
            Value::Table(t) => t,
            other => eyre::bail!("config serialized to a non-table value: {other}"),
        };
        merge_tables(&mut doc, patch);
        let merged: Config = Value::Table(doc)
            .try_into()
            .wrap_err("merged configuration does not match the schema")?;
        self.save(&merged)?;
        Ok(merged)
    }

    /// Set one dotted key (e.g. `detection.long_timeout_ms`) and persist.
    ///
    /// `raw` is parsed as a TOML value; anything that does not parse is
    /// stored as a plain string.
    pub fn set(&self, key: &str, raw: &str) -> eyre::Result<Config> {
        let parts: Vec<&str> = key.split('.').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            eyre::bail!("invalid config key {key:?}");
        }
        let mut patch = Table::new();
        patch.insert(parts[parts.len() - 1].to_string(), parse_value(raw));
        for part in parts[..parts.len() - 1].iter().rev() {
            let mut outer = Table::new();
            outer.insert((*part).to_string(), Value::Table(patch));
            patch = outer;
        }
        self.merge(patch)
    }
}

fn parse_value(raw: &str) -> Value {
    toml::from_str::<Table>(&format!("v = {raw}"))
        .ok()
        .and_then(|mut t| t.remove("v"))
        .unwrap_or_else(|| Value::String(raw.to_string()))
}

/// Recursively merge tables; non-table values in `patch` replace `base`.
fn merge_tables(base: &mut Table, patch: Table) {
    for (k, v) in patch {
        match (base.get_mut(&k), v) {
            (Some(Value::Table(b)), Value::Table(p)) => merge_tables(b, p),
            (_, v) => {
                base.insert(k, v);
            }
        }
    }
}
