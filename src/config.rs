use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::search::eval::EvalConfig;
use crate::search::minimax::SearchParams;

/// Everything a `MinimaxBot` needs. Missing JSON fields take the defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search: SearchParams,
    pub eval: EvalConfig,
}

impl EngineConfig {
    /// Depth 4, material x10, true-center probe, mobility off.
    pub fn reference() -> Self { Self::default() }

    /// Same search, material term only.
    pub fn material_only() -> Self {
        let mut cfg = Self::default();
        cfg.eval.center_weight = 0;
        cfg
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.search.depth = depth;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.search.validate()?;
        if self.eval.material_weight <= 0 {
            return Err(EngineError::Config("material weight must be positive".into()));
        }
        Ok(())
    }

    pub fn from_json_str(s: &str) -> Result<Self, EngineError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
