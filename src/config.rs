//! Simulator settings: built-in defaults + optional TOML config.
//!
//! - `SimConfig::default()` → stochastic noise, 1024 shots, 16-qubit cap
//! - `SimConfig::from_toml_file(path)` → load user settings
//! - `SimConfig::resolve(cli_path)` → explicit path (must load) or ~/.titan/config.toml if present

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::core::quantum_ir::RunSettings;
use crate::core::titan::noise::NoiseMode;
use crate::core::titan::types::MAX_QUBITS;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub seed: Option<u64>,
    pub shots: usize,
    pub noise_mode: NoiseMode,
    pub max_qubits: usize,
    pub optimize: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self { seed: None, shots: 1024, noise_mode: NoiseMode::Stochastic, max_qubits: 16, optimize: false }
    }
}

impl SimConfig {
    pub fn from_toml_str(txt: &str) -> Result<Self> {
        let cfg: SimConfig = toml::from_str(txt).context("parsing config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let txt = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::from_toml_str(&txt).with_context(|| format!("loading {}", path.display()))
    }

    /// An explicit `--config` must load; the implicit default only warns and falls back.
    pub fn resolve(cli_path: &Option<PathBuf>) -> Result<Self> {
        if let Some(p) = cli_path {
            return Self::from_toml_file(p);
        }
        if let Some(p) = default_config_path() {
            if p.exists() {
                match Self::from_toml_file(&p) {
                    Ok(cfg) => return Ok(cfg),
                    Err(e) => eprintln!("(warn) {e:#}; using built-in settings"),
                }
            }
        }
        Ok(Self::default())
    }

    fn validate(&self) -> Result<()> {
        if self.shots == 0 {
            bail!("shots must be positive");
        }
        if self.max_qubits == 0 || self.max_qubits > MAX_QUBITS {
            bail!("max_qubits must be in 1..={MAX_QUBITS}, got {}", self.max_qubits);
        }
        Ok(())
    }

    pub fn run_settings(&self) -> RunSettings {
        RunSettings { seed: self.seed, noise_mode: self.noise_mode, max_qubits: self.max_qubits }
    }
}

/// ~/.titan/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::home_dir().map(|h| h.join(".titan").join("config.toml"))
}
