//! Configuration loader, typed sections and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys split on `__`, e.g. `APP_PIPELINE__SEED=7`). Each section is
//! extracted into a struct with defaults and validated before use.
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(&env_name)
    }

    pub fn load_for_env(env_name: &str) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate_for_env(env_name)?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    /// Like `get`, but a missing section yields `T::default()`.
    fn section<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned + Default,
    {
        if self.figment.contains(key) { self.get(key) } else { Ok(T::default()) }
    }

    pub fn pipeline(&self) -> Result<PipelineConfig> {
        let c: PipelineConfig = self.section("pipeline")?;
        c.validate()?;
        Ok(c)
    }

    pub fn layout(&self) -> Result<LayoutConfig> {
        self.section("layout")
    }

    pub fn output(&self) -> Result<OutputConfig> {
        self.section("output")
    }

    pub fn simulation(&self) -> Result<SimulationConfig> {
        let c: SimulationConfig = self.section("simulation")?;
        c.validate()?;
        Ok(c)
    }

    pub fn group(&self) -> Result<GroupConfig> {
        let c: GroupConfig = self.section("group")?;
        c.validate()?;
        Ok(c)
    }

    pub fn ideal(&self) -> Result<IdealConfig> {
        let c: IdealConfig = self.section("ideal")?;
        c.validate()?;
        Ok(c)
    }

    fn validate_for_env(&self, env: &str) -> Result<()> {
        match env {
            "prod" | "production" => {
                // Production runs must say where they read and write.
                for key in ["pipeline.input_path", "pipeline.output_path"] {
                    if !self.figment.contains(key) {
                        return Err(Error::InvalidConfig(format!("'{}' must be set explicitly in production", key)));
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NamingStrategy {
    /// First `name_words` ranked keywords joined by `_`.
    #[default]
    Keywords,
    /// Most frequent ground-truth category among the members.
    Majority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub embedding_dim: usize,
    pub target_dim: usize,
    pub num_topics: usize,
    pub min_cluster_size: usize,
    pub members_per_topic: Option<usize>,
    pub min_x: Option<f64>,
    pub naming: NamingStrategy,
    pub name_words: usize,
    pub seed: u64,
    pub filler_words: Vec<String>,
    pub min_token_len: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/20news"),
            output_path: PathBuf::from("data/topics/topics.json"),
            embedding_dim: 300,
            target_dim: 20,
            num_topics: 20,
            min_cluster_size: 15,
            members_per_topic: None,
            min_x: None,
            naming: NamingStrategy::Keywords,
            name_words: 3,
            seed: 42,
            filler_words: ["um", "er", "oh", "ah", "em", "hm", "yeah", "yep", "ok", "okay", "huh", "hey", "ya", "lo", "da", "well", "eh"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            min_token_len: 3,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.embedding_dim == 0 { return Err(invalid("pipeline.embedding_dim must be >= 1")); }
        if self.target_dim < 2 { return Err(invalid("pipeline.target_dim must be >= 2")); }
        if self.num_topics == 0 { return Err(invalid("pipeline.num_topics must be >= 1")); }
        if self.min_cluster_size == 0 { return Err(invalid("pipeline.min_cluster_size must be >= 1")); }
        if self.name_words == 0 { return Err(invalid("pipeline.name_words must be >= 1")); }
        if self.members_per_topic == Some(0) { return Err(invalid("pipeline.members_per_topic must be >= 1 when set")); }
        if let Some(x) = self.min_x { if !x.is_finite() { return Err(invalid("pipeline.min_x must be finite")); } }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub grid_cols: Option<usize>,
    pub grid_rows: Option<usize>,
}

impl LayoutConfig {
    /// Grid dimensions when both sides are configured.
    pub fn grid(&self) -> Option<(usize, usize)> {
        self.grid_cols.zip(self.grid_rows)
    }

    pub fn validate_for(&self, topics: usize) -> Result<()> {
        match (self.grid_cols, self.grid_rows) {
            (None, None) => Ok(()),
            (Some(c), Some(r)) if c * r >= topics && c > 0 && r > 0 => Ok(()),
            (Some(c), Some(r)) => Err(invalid(format!("layout grid {}x{} cannot hold {} topics", c, r, topics))),
            _ => Err(invalid("layout.grid_cols and layout.grid_rows must be set together")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub versioned: bool,
    pub indent: usize,
}

impl Default for OutputConfig {
    fn default() -> Self { Self { versioned: false, indent: 4 } }
}

/// Closed interval `[lo, hi]`, written as a two-element array in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange(pub f64, pub f64);

impl ValueRange {
    pub fn lo(&self) -> f64 { self.0 }
    pub fn hi(&self) -> f64 { self.1 }
    pub fn midpoint(&self) -> f64 { (self.0 + self.1) / 2.0 }

    pub fn validate(&self, name: &str) -> Result<()> {
        if !(self.0.is_finite() && self.1.is_finite()) || self.0 < 0.0 || self.0 > self.1 {
            return Err(invalid(format!("{} must satisfy 0 <= lo <= hi, got [{}, {}]", name, self.0, self.1)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub dimension: usize,
    pub primary: ValueRange,
    pub secondary: ValueRange,
    pub residual: ValueRange,
    pub draws: usize,
    pub seed: u64,
    pub histogram_bins: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            dimension: 20,
            primary: ValueRange(0.45, 0.60),
            secondary: ValueRange(0.15, 0.27),
            residual: ValueRange(0.02, 0.10),
            draws: 10_000,
            seed: 42,
            histogram_bins: 50,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.dimension < 2 { return Err(invalid("simulation.dimension must be >= 2")); }
        if self.draws == 0 { return Err(invalid("simulation.draws must be >= 1")); }
        if self.histogram_bins == 0 { return Err(invalid("simulation.histogram_bins must be >= 1")); }
        self.primary.validate("simulation.primary")?;
        self.secondary.validate("simulation.secondary")?;
        self.residual.validate("simulation.residual")?;
        if self.primary.hi() + self.secondary.hi() + self.residual.hi() <= 0.0 {
            return Err(invalid("simulation ranges cannot all be zero"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdealConfig {
    pub primary: f64,
    pub secondary: f64,
    pub residual_share: f64,
}

impl Default for IdealConfig {
    fn default() -> Self { Self { primary: 0.52, secondary: 0.21, residual_share: 0.27 } }
}

impl IdealConfig {
    pub fn validate(&self) -> Result<()> {
        let parts = [self.primary, self.secondary, self.residual_share];
        if parts.iter().any(|p| !p.is_finite() || *p < 0.0) || parts.iter().sum::<f64>() <= 0.0 {
            return Err(invalid("ideal shares must be finite, non-negative and not all zero"));
        }
        Ok(())
    }
}

/// Group conversation simulation. Interests and velocities share one scale:
/// a unit match is worth `max_interest`, and moves a member at
/// `max_velocity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    pub group_size: usize,
    pub rounds: usize,
    pub seed: u64,
    pub max_interest: f64,
    pub max_velocity: f64,
    /// Members whose interest drops below this leave the group for good.
    pub left_out_threshold: f64,
    /// Lag behind the group velocity that marks a member at risk, and the
    /// interest a steering target must offer every at-risk member.
    pub recovery_threshold: f64,
    pub neighbor_threshold: f64,
    pub min_active_members: usize,
    /// Latent interest on the member's dominant dimension.
    pub primary: ValueRange,
    pub residual: ValueRange,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            group_size: 10,
            rounds: 20,
            seed: 42,
            max_interest: 10.0,
            max_velocity: 10.0,
            left_out_threshold: 1.0,
            recovery_threshold: 2.0,
            neighbor_threshold: 0.5,
            min_active_members: 3,
            primary: ValueRange(0.50, 0.70),
            residual: ValueRange(0.02, 0.10),
        }
    }
}

impl GroupConfig {
    pub fn validate(&self) -> Result<()> {
        if self.group_size == 0 { return Err(invalid("group.group_size must be >= 1")); }
        if self.rounds == 0 { return Err(invalid("group.rounds must be >= 1")); }
        for (name, v) in [("group.max_interest", self.max_interest), ("group.max_velocity", self.max_velocity)] {
            if !v.is_finite() || v <= 0.0 { return Err(invalid(format!("{} must be a positive number", name))); }
        }
        for (name, v) in [("group.left_out_threshold", self.left_out_threshold), ("group.recovery_threshold", self.recovery_threshold)] {
            if !v.is_finite() { return Err(invalid(format!("{} must be finite", name))); }
        }
        if !(-1.0..=1.0).contains(&self.neighbor_threshold) {
            return Err(invalid("group.neighbor_threshold must lie in [-1, 1]"));
        }
        self.primary.validate("group.primary")?;
        self.residual.validate("group.residual")
    }
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidConfig(msg.into())
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
