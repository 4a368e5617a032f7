//! TOML front-end configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// One generator run as described by a TOML file.
///
/// Mixing is given either as `mu` or as `xi`; exclusivity is enforced by
/// `Params::new`, so a file carrying both fails before any sampling
/// happens.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Master seed; omit for an entropy-seeded run.
    pub seed: Option<u64>,
    /// Number of vertices.
    pub n: usize,
    /// Degree power-law exponent.
    pub t1: f64,
    pub d_min: u32,
    pub d_max: u32,
    /// Attempts at an even-sum degree sequence.
    pub d_max_iter: usize,
    /// Community-size power-law exponent.
    pub t2: f64,
    pub c_min: u32,
    pub c_max: u32,
    /// Attempts at community sizes covering exactly `n`.
    pub c_max_iter: usize,
    pub mu: Option<f64>,
    pub xi: Option<f64>,
    #[serde(rename = "isCL", default)]
    pub is_cl: bool,
    #[serde(rename = "islocal", default)]
    pub is_local: bool,
    pub degreefile: PathBuf,
    pub communitysizesfile: PathBuf,
    pub communityfile: PathBuf,
    pub networkfile: PathBuf,
    pub num_threads: Option<usize>,
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(Error::ConfigInconsistent("n must be positive".into()));
        }
        if self.d_min == 0 || self.d_min > self.d_max {
            return Err(Error::ConfigInconsistent(format!(
                "degree range [{}, {}] is invalid",
                self.d_min, self.d_max
            )));
        }
        if self.c_min == 0 || self.c_min > self.c_max {
            return Err(Error::ConfigInconsistent(format!(
                "community size range [{}, {}] is invalid",
                self.c_min, self.c_max
            )));
        }
        if self.t1 <= 0.0 || self.t2 <= 0.0 {
            return Err(Error::ConfigInconsistent(
                "power-law exponents must be positive".into(),
            ));
        }
        if self.d_max_iter == 0 || self.c_max_iter == 0 {
            return Err(Error::ConfigInconsistent(
                "iteration budgets must be positive".into(),
            ));
        }
        Ok(())
    }
}
