use std::fs;
use std::path::{Path, PathBuf};

use adventure_core::{CombatRules, CreationRules, GuessingRules, SimulationRng};
use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize, Default)]
pub struct AdventureConfig {
    #[serde(default)]
    pub rng: RngConfig,
    #[serde(default)]
    pub combat: CombatRules,
    #[serde(default)]
    pub character: CreationRules,
    #[serde(default)]
    pub guessing: GuessingRules,
    #[serde(default)]
    pub report: Option<ReportConfig>,
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}

impl AdventureConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&data).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(data: &str) -> Result<Self> {
        let cfg: AdventureConfig = toml::from_str(data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Loads `path` when given, otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.combat.validate()?;
        self.character.validate()?;
        self.guessing.validate()?;
        Ok(())
    }

    /// Seed precedence: explicit flag, then `ADVENTURE_SEED`, then `[rng] seed`.
    pub fn resolve_seed(&self, flag: Option<u64>) -> Option<u64> {
        flag.or_else(SimulationRng::seed_from_env).or(self.rng.seed)
    }

    /// Builds the session's dice. Without any configured seed a fresh one is
    /// drawn and logged so the run can be replayed.
    pub fn simulation_rng(&self, flag: Option<u64>) -> SimulationRng {
        match self.resolve_seed(flag) {
            Some(seed) => SimulationRng::new(seed),
            None => {
                let rng = SimulationRng::from_entropy();
                info!(target: "adventure_config", seed = rng.seed(), "no seed configured, drew a fresh one");
                rng
            }
        }
    }

    pub fn trace_filter(&self) -> Option<&str> {
        self.telemetry
            .as_ref()
            .and_then(|telemetry| telemetry.trace_filter.as_deref())
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RngConfig {
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub trace_filter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_stock_rules() {
        let cfg = AdventureConfig::parse("").unwrap();
        assert_eq!(CombatRules::default(), cfg.combat);
        assert_eq!(CreationRules::default(), cfg.character);
        assert_eq!(GuessingRules::default(), cfg.guessing);
        assert!(cfg.report.is_none());
        assert_eq!(None, cfg.trace_filter());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let cfg = AdventureConfig::parse(
            r#"
            [rng]
            seed = 9

            [combat]
            flee_chance = 0.5

            [character]
            starting_gold = [10, 20]

            [report]
            path = "reports/session.json"

            [telemetry]
            trace_filter = "adventure_core=debug"
            "#,
        )
        .unwrap();
        assert_eq!(Some(9), cfg.rng.seed);
        assert_eq!(0.5, cfg.combat.flee_chance);
        assert_eq!(10, cfg.combat.base_damage);
        assert_eq!([10, 20], cfg.character.starting_gold);
        assert_eq!(20, cfg.character.total_points);
        assert_eq!(
            Some(Path::new("reports/session.json")),
            cfg.report.as_ref().map(|r| r.path.as_path())
        );
        assert_eq!(Some("adventure_core=debug"), cfg.trace_filter());
    }

    #[test]
    fn invalid_rules_are_rejected() {
        let err = AdventureConfig::parse("[combat]\ncritical_chance = 2.0\n").unwrap_err();
        assert!(err.to_string().contains("combat.critical_chance"));
    }

    #[test]
    fn flag_seed_wins() {
        let cfg = AdventureConfig::parse("[rng]\nseed = 5\n").unwrap();
        assert_eq!(Some(77), cfg.resolve_seed(Some(77)));
        assert_eq!(77, cfg.simulation_rng(Some(77)).seed());
    }
}
