// Configuration loading and parsing (league.toml, strategy.toml).

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::bot::scoring::{NoiseConfig, NoiseDistribution, NoisePhase, ScoringWeights};
use crate::draft::player::Position;
use crate::draft::settings::{DraftConfig, RosterRules, TeamSpec};
use crate::draft::DraftError;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

impl From<DraftError> for ConfigError {
    fn from(err: DraftError) -> Self {
        match err {
            DraftError::InvalidDataset { field, message } => {
                ConfigError::ValidationError { field, message }
            }
            other => ConfigError::ValidationError {
                field: "config".into(),
                message: other.to_string(),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub strategy: StrategyConfig,
    pub data_paths: DataPaths,
    pub output: OutputPaths,
    /// Directory the relative paths above are resolved against.
    pub base_dir: PathBuf,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    pub num_teams: usize,
    pub num_rounds: usize,
    /// First-round slots (1-based) controlled by a person.
    #[serde(default)]
    pub human_slots: Vec<usize>,
    /// Team names in first-round order. Missing names fall back to "Team N".
    #[serde(default)]
    pub team_names: Vec<String>,
    /// Fixed RNG seed. When omitted the binary draws one and logs it.
    #[serde(default)]
    pub seed: Option<u64>,
    pub roster: HashMap<String, usize>,
    #[serde(default)]
    pub flex: FlexSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlexSection {
    #[serde(default)]
    pub positions: Vec<String>,
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire strategy.toml file.
#[derive(Debug, Clone, Deserialize)]
struct StrategyFile {
    weights: WeightsSection,
    #[serde(default)]
    preferences: HashMap<String, f64>,
    noise: NoiseSection,
    data_paths: DataPaths,
    #[serde(default)]
    output: OutputPaths,
}

#[derive(Debug, Clone, Deserialize)]
struct WeightsSection {
    adp: f64,
    need: f64,
    #[serde(default)]
    rookie: f64,
}

#[derive(Debug, Clone, Deserialize)]
struct NoiseSection {
    #[serde(default)]
    distribution: NoiseDistribution,
    phases: Vec<NoisePhase>,
}

/// The public strategy config assembled from the strategy.toml sections.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    pub weights: ScoringWeights,
    pub noise: NoiseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub adp: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputPaths {
    #[serde(default)]
    pub board_csv: Option<String>,
    #[serde(default)]
    pub summary_json: Option<String>,
}

impl Config {
    /// Draft settings for the engine.
    pub fn draft_config(&self) -> Result<DraftConfig, ConfigError> {
        let roster =
            RosterRules::from_config(&self.league.roster, &self.league.flex.positions)?;
        Ok(DraftConfig {
            num_teams: self.league.num_teams,
            num_rounds: self.league.num_rounds,
            roster,
            scoring: self.strategy.weights.clone(),
            noise: self.strategy.noise.clone(),
        })
    }

    /// Teams in first-round order.
    pub fn team_specs(&self) -> Vec<TeamSpec> {
        (1..=self.league.num_teams)
            .map(|slot| TeamSpec {
                name: self
                    .league
                    .team_names
                    .get(slot - 1)
                    .filter(|n| !n.trim().is_empty())
                    .cloned()
                    .unwrap_or_else(|| format!("Team {slot}")),
                human: self.league.human_slots.contains(&slot),
            })
            .collect()
    }

    /// Resolve a configured path against `base_dir`.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }

    pub fn adp_path(&self) -> PathBuf {
        self.resolve(&self.data_paths.adp)
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// `config/strategy.toml`, both relative to the given `base_dir`.
///
/// This does not copy defaults; `load_config` does.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;
    let league = league_file.league;

    // --- strategy.toml (required) ---
    let strategy_path = config_dir.join("strategy.toml");
    let strategy_text = read_file(&strategy_path)?;
    let strategy_file: StrategyFile =
        toml::from_str(&strategy_text).map_err(|e| ConfigError::ParseError {
            path: strategy_path.clone(),
            source: e,
        })?;

    let mut preferences = BTreeMap::new();
    for (key, bonus) in &strategy_file.preferences {
        let pos = Position::from_str_pos(key)
            .filter(|p| !p.is_meta_slot())
            .ok_or_else(|| ConfigError::ValidationError {
                field: format!("preferences.{key}"),
                message: "not a playing position".into(),
            })?;
        preferences.insert(pos, *bonus);
    }

    let strategy = StrategyConfig {
        weights: ScoringWeights {
            adp: strategy_file.weights.adp,
            need: strategy_file.weights.need,
            rookie: strategy_file.weights.rookie,
            preferences,
        },
        noise: NoiseConfig {
            distribution: strategy_file.noise.distribution,
            phases: strategy_file.noise.phases,
        },
    };

    let config = Config {
        league,
        strategy,
        data_paths: strategy_file.data_paths,
        output: strategy_file.output,
        base_dir: base_dir.to_path_buf(),
    };

    validate(&config)?;

    Ok(config)
}

/// Files `load_config_from` reads from `config/`.
const CONFIG_FILES: [&str; 2] = ["league.toml", "strategy.toml"];

/// Fill in `config/league.toml` and `config/strategy.toml` from `defaults/`
/// where they are missing. Files already in `config/` are left alone.
///
/// Returns the paths that were written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    let missing: Vec<&str> = CONFIG_FILES
        .into_iter()
        .filter(|name| !config_dir.join(name).exists())
        .collect();
    if missing.is_empty() {
        return Ok(Vec::new());
    }

    let copy_error = |message: String| ConfigError::DefaultsCopyError { message };
    if !defaults_dir.is_dir() {
        return Err(copy_error(format!(
            "{} is missing config/{} and has no defaults/ to copy from",
            base_dir.display(),
            missing.join(" and config/")
        )));
    }
    std::fs::create_dir_all(&config_dir)
        .map_err(|e| copy_error(format!("cannot create {}: {e}", config_dir.display())))?;

    let mut written = Vec::with_capacity(missing.len());
    for name in missing {
        let from = defaults_dir.join(name);
        let to = config_dir.join(name);
        std::fs::copy(&from, &to).map_err(|e| {
            copy_error(format!("cannot copy {} to {}: {e}", from.display(), to.display()))
        })?;
        written.push(to);
    }
    Ok(written)
}

/// Copy any missing defaults into `base_dir/config`, then load from there.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let league = &config.league;

    if league.num_teams < 2 {
        return Err(ConfigError::ValidationError {
            field: "league.num_teams".into(),
            message: format!("must be at least 2, got {}", league.num_teams),
        });
    }

    if league.num_rounds == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.num_rounds".into(),
            message: "must be greater than 0".into(),
        });
    }

    if let Some(&slot) = league
        .human_slots
        .iter()
        .find(|&&s| s == 0 || s > league.num_teams)
    {
        return Err(ConfigError::ValidationError {
            field: "league.human_slots".into(),
            message: format!("slot {slot} is outside 1..={}", league.num_teams),
        });
    }

    if league.team_names.len() > league.num_teams {
        return Err(ConfigError::ValidationError {
            field: "league.team_names".into(),
            message: format!(
                "{} names given for {} teams",
                league.team_names.len(),
                league.num_teams
            ),
        });
    }

    if config.data_paths.adp.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data_paths.adp".into(),
            message: "must not be empty".into(),
        });
    }

    // Roster shape, weights, and noise share the engine's checks.
    config.draft_config()?.validate()?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Directory holding `defaults/`, whether tests run from the crate or
    /// the workspace root.
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        [cwd.clone(), cwd.join("../.."), cwd.join("..")]
            .into_iter()
            .find(|dir| dir.join("defaults/league.toml").exists())
            .unwrap_or_else(|| panic!("Cannot locate defaults/ directory from CWD {cwd:?}"))
    }

    /// A scratch base dir with both default files copied into config/.
    fn scratch(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(format!("mockdraft_config_{name}"));
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        let root = project_root();
        for file in ["league.toml", "strategy.toml"] {
            fs::copy(root.join("defaults").join(file), tmp.join("config").join(file)).unwrap();
        }
        tmp
    }

    fn rewrite(base: &Path, file: &str, from: &str, to: &str) {
        let path = base.join("config").join(file);
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(from), "{file} does not contain `{from}`");
        fs::write(&path, text.replace(from, to)).unwrap();
    }

    fn validation_field(err: ConfigError) -> String {
        match err {
            ConfigError::ValidationError { field, .. } => field,
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn load_valid_config_from_default_files() {
        let tmp = scratch("defaults");
        let config = load_config_from(&tmp).expect("should load valid config");

        assert_eq!(config.league.name, "Sunday Mock League");
        assert_eq!(config.league.num_teams, 10);
        assert_eq!(config.league.num_rounds, 15);
        assert_eq!(config.league.human_slots, vec![4]);
        assert!(config.league.seed.is_none());
        assert_eq!(config.league.roster.get("RB"), Some(&2));
        assert_eq!(config.league.roster.get("BE"), Some(&6));
        assert_eq!(config.league.flex.positions, vec!["RB", "WR", "TE"]);

        assert!((config.strategy.weights.adp - 1.0).abs() < f64::EPSILON);
        assert!((config.strategy.weights.need - 0.6).abs() < f64::EPSILON);
        assert_eq!(config.strategy.noise.distribution, NoiseDistribution::Gaussian);
        assert_eq!(config.strategy.noise.phases.len(), 4);
        assert!(config.strategy.noise.is_non_decreasing());

        assert_eq!(config.data_paths.adp, "data/adp_sample.csv");
        assert_eq!(config.output.board_csv.as_deref(), Some("output/board.csv"));
        assert!(config.adp_path().ends_with("data/adp_sample.csv"));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn draft_config_matches_files() {
        let tmp = scratch("draft_config");
        let config = load_config_from(&tmp).unwrap();
        let draft = config.draft_config().unwrap();
        assert_eq!(draft.num_teams, 10);
        assert_eq!(draft.roster.starter_count(), 9);
        assert_eq!(draft.roster.bench_count(), 6);
        assert_eq!(
            draft.roster.flex_positions(),
            &[Position::RunningBack, Position::WideReceiver, Position::TightEnd]
        );
        assert_eq!(draft.total_picks(), 150);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn team_specs_use_names_and_human_slots() {
        let tmp = scratch("team_specs");
        rewrite(
            &tmp,
            "league.toml",
            "human_slots = [4]",
            "human_slots = [2]\nteam_names = [\"Alpha\", \"Bravo\"]",
        );
        let config = load_config_from(&tmp).unwrap();
        let teams = config.team_specs();
        assert_eq!(teams.len(), 10);
        assert_eq!(teams[0].name, "Alpha");
        assert!(!teams[0].human);
        assert_eq!(teams[1].name, "Bravo");
        assert!(teams[1].human);
        assert_eq!(teams[2].name, "Team 3");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn seed_is_read_when_present() {
        let tmp = scratch("seed");
        rewrite(&tmp, "league.toml", "human_slots = [4]", "human_slots = [4]\nseed = 42");
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.league.seed, Some(42));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn preferences_are_parsed_by_position() {
        let tmp = scratch("preferences");
        rewrite(&tmp, "strategy.toml", "[preferences]", "[preferences]\nTE = 0.25\nDST = 0.1");
        let config = load_config_from(&tmp).unwrap();
        let prefs = &config.strategy.weights.preferences;
        assert_eq!(prefs.get(&Position::TightEnd), Some(&0.25));
        assert_eq!(prefs.get(&Position::Defense), Some(&0.1));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_preference_for_meta_slot() {
        let tmp = scratch("preferences_meta");
        rewrite(&tmp, "strategy.toml", "[preferences]", "[preferences]\nFLEX = 0.5");
        let err = load_config_from(&tmp).unwrap_err();
        assert_eq!(validation_field(err), "preferences.FLEX");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_single_team() {
        let tmp = scratch("single_team");
        rewrite(&tmp, "league.toml", "num_teams = 10", "num_teams = 1");
        let err = load_config_from(&tmp).unwrap_err();
        assert_eq!(validation_field(err), "league.num_teams");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_human_slot_out_of_range() {
        let tmp = scratch("human_slot");
        rewrite(&tmp, "league.toml", "human_slots = [4]", "human_slots = [11]");
        let err = load_config_from(&tmp).unwrap_err();
        assert_eq!(validation_field(err), "league.human_slots");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_roster_key() {
        let tmp = scratch("roster_key");
        rewrite(&tmp, "league.toml", "K    = 1", "P    = 1");
        let err = load_config_from(&tmp).unwrap_err();
        assert_eq!(validation_field(err), "roster.P");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_rounds_the_roster_cannot_hold() {
        let tmp = scratch("rounds");
        rewrite(&tmp, "league.toml", "num_rounds = 15", "num_rounds = 18");
        let err = load_config_from(&tmp).unwrap_err();
        assert_eq!(validation_field(err), "roster");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_negative_weight() {
        let tmp = scratch("weight");
        rewrite(&tmp, "strategy.toml", "need   = 0.6", "need   = -0.6");
        let err = load_config_from(&tmp).unwrap_err();
        assert_eq!(validation_field(err), "weights.need");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_noise_schedule_not_starting_at_round_one() {
        let tmp = scratch("noise");
        rewrite(&tmp, "strategy.toml", "from_round = 1\n", "from_round = 2\n");
        let err = load_config_from(&tmp).unwrap_err();
        assert_eq!(validation_field(err), "noise.phases");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn uniform_noise_distribution_parses() {
        let tmp = scratch("uniform");
        rewrite(
            &tmp,
            "strategy.toml",
            "distribution = \"gaussian\"",
            "distribution = \"uniform\"",
        );
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.strategy.noise.distribution, NoiseDistribution::Uniform);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_league_toml() {
        let tmp = scratch("missing_league");
        fs::remove_file(tmp.join("config/league.toml")).unwrap();
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("league.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_strategy_toml() {
        let tmp = scratch("missing_strategy");
        fs::remove_file(tmp.join("config/strategy.toml")).unwrap();
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("strategy.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = scratch("invalid_toml");
        fs::write(tmp.join("config/league.toml"), "this is not valid [[[ toml").unwrap();
        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("league.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("mockdraft_config_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();

        let root = project_root();
        fs::copy(root.join("defaults/league.toml"), defaults_dir.join("league.toml")).unwrap();
        fs::copy(root.join("defaults/strategy.toml"), defaults_dir.join("strategy.toml")).unwrap();
        fs::write(defaults_dir.join("league.toml.example"), "# sample\n").unwrap();

        assert!(!tmp.join("config").exists());
        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 2);
        assert!(tmp.join("config/league.toml").exists());
        assert!(tmp.join("config/strategy.toml").exists());
        assert!(!tmp.join("config/league.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = std::env::temp_dir().join("mockdraft_config_ensure_skips");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        let config_dir = tmp.join("config");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::create_dir_all(&config_dir).unwrap();

        let root = project_root();
        fs::copy(root.join("defaults/league.toml"), defaults_dir.join("league.toml")).unwrap();
        fs::copy(root.join("defaults/strategy.toml"), defaults_dir.join("strategy.toml")).unwrap();
        fs::write(config_dir.join("league.toml"), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);
        assert!(copied[0].ends_with("strategy.toml"));
        let content = fs::read_to_string(config_dir.join("league.toml")).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("mockdraft_config_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        match ensure_config_files(&tmp).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("no defaults/"), "{message}");
                assert!(message.contains("config/league.toml"), "{message}");
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_needs_no_defaults_once_config_is_complete() {
        let tmp = std::env::temp_dir().join("mockdraft_config_complete");
        let _ = fs::remove_dir_all(&tmp);
        let config_dir = tmp.join("config");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("league.toml"), "# mine\n").unwrap();
        fs::write(config_dir.join("strategy.toml"), "# mine\n").unwrap();

        assert!(ensure_config_files(&tmp).unwrap().is_empty());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_reports_a_missing_default() {
        let tmp = std::env::temp_dir().join("mockdraft_config_missing_default");
        let _ = fs::remove_dir_all(&tmp);
        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::copy(project_root().join("defaults/league.toml"), defaults_dir.join("league.toml"))
            .unwrap();

        match ensure_config_files(&tmp).unwrap_err() {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("strategy.toml"), "{message}");
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
