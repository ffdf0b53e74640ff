// Candidate scoring for bot-controlled teams.
//
// A candidate's score is a weighted sum of four signals: how far behind the
// best available player it sits by ADP, how badly the team still needs its
// position, a rookie bonus, and a noise draw whose spread widens as the draft
// moves into later rounds.

use std::collections::BTreeMap;

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::draft::player::{Player, Position};
use crate::draft::roster::Roster;
use crate::draft::DraftError;

/// Need term used when the only open slot for a player is the bench.
pub const BENCH_NEED_PENALTY: f64 = -1.0;

/// A FLEX opening is worth this fraction of a dedicated opening.
pub const FLEX_NEED_FACTOR: f64 = 0.5;

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Coefficients for the deterministic part of the score.
///
/// All weights are non-negative and need not sum to 1. `preferences` adds a
/// flat per-position bonus (e.g. a bot that leans toward running backs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub adp: f64,
    pub need: f64,
    pub rookie: f64,
    #[serde(default)]
    pub preferences: BTreeMap<Position, f64>,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            adp: 1.0,
            need: 0.6,
            rookie: 0.0,
            preferences: BTreeMap::new(),
        }
    }
}

impl ScoringWeights {
    pub(crate) fn validate(&self) -> Result<(), DraftError> {
        let fields: &[(&str, f64)] = &[
            ("weights.adp", self.adp),
            ("weights.need", self.need),
            ("weights.rookie", self.rookie),
        ];
        for (name, val) in fields {
            if !val.is_finite() || *val < 0.0 {
                return Err(DraftError::invalid(
                    *name,
                    format!("must be a finite value >= 0, got {val}"),
                ));
            }
        }
        for (pos, bonus) in &self.preferences {
            if !bonus.is_finite() || *bonus < 0.0 {
                return Err(DraftError::invalid(
                    format!("preferences.{pos}"),
                    format!("must be a finite value >= 0, got {bonus}"),
                ));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Noise
// ---------------------------------------------------------------------------

/// Shape of the noise added to every candidate score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseDistribution {
    /// Normal with mean 0 and standard deviation equal to the magnitude.
    #[default]
    Gaussian,
    /// Uniform over `[-magnitude, magnitude]`.
    Uniform,
}

/// Noise magnitude in effect from `from_round` until the next phase starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoisePhase {
    pub from_round: usize,
    pub magnitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    pub distribution: NoiseDistribution,
    pub phases: Vec<NoisePhase>,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        let phase = |from_round, magnitude| NoisePhase {
            from_round,
            magnitude,
        };
        NoiseConfig {
            distribution: NoiseDistribution::Gaussian,
            phases: vec![phase(1, 0.15), phase(3, 0.35), phase(6, 0.6), phase(10, 0.9)],
        }
    }
}

impl NoiseConfig {
    /// No noise at all: every bot takes its best-scoring candidate.
    pub fn silent() -> Self {
        NoiseConfig {
            distribution: NoiseDistribution::Gaussian,
            phases: vec![NoisePhase {
                from_round: 1,
                magnitude: 0.0,
            }],
        }
    }

    /// Magnitude of the phase covering `round` (1-based).
    pub fn magnitude_for_round(&self, round: usize) -> f64 {
        self.phases
            .iter()
            .take_while(|p| p.from_round <= round)
            .last()
            .map_or(0.0, |p| p.magnitude)
    }

    /// Whether magnitudes never shrink from one phase to the next.
    pub fn is_non_decreasing(&self) -> bool {
        self.phases
            .windows(2)
            .all(|w| w[1].magnitude >= w[0].magnitude)
    }

    /// Draw one noise value for a pick in `round`.
    ///
    /// A zero magnitude draws nothing from the generator.
    pub fn sample<R: Rng>(&self, round: usize, rng: &mut R) -> f64 {
        let magnitude = self.magnitude_for_round(round);
        if magnitude <= 0.0 {
            return 0.0;
        }
        match self.distribution {
            NoiseDistribution::Gaussian => Normal::new(0.0, magnitude)
                .map(|normal| normal.sample(rng))
                .unwrap_or(0.0),
            NoiseDistribution::Uniform => rng.random_range(-magnitude..=magnitude),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), DraftError> {
        let Some(first) = self.phases.first() else {
            return Err(DraftError::invalid("noise.phases", "at least one phase is required"));
        };
        if first.from_round != 1 {
            return Err(DraftError::invalid(
                "noise.phases",
                format!("first phase must start at round 1, got {}", first.from_round),
            ));
        }
        for w in self.phases.windows(2) {
            if w[1].from_round <= w[0].from_round {
                return Err(DraftError::invalid(
                    "noise.phases",
                    format!(
                        "from_round must be strictly increasing ({} then {})",
                        w[0].from_round, w[1].from_round
                    ),
                ));
            }
        }
        for p in &self.phases {
            if !p.magnitude.is_finite() || p.magnitude < 0.0 {
                return Err(DraftError::invalid(
                    "noise.phases",
                    format!(
                        "magnitude for round {} must be a finite value >= 0, got {}",
                        p.from_round, p.magnitude
                    ),
                ));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Where in the draft a candidate is being evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickContext {
    /// Overall pick number (1-based).
    pub overall: usize,
    /// Round number (1-based).
    pub round: usize,
    pub num_teams: usize,
    /// ADP of the best player still in the pool.
    pub best_adp: f64,
}

/// Every term that went into a bot's score, kept on the pick for auditing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub adp: f64,
    pub need: f64,
    pub rookie: f64,
    pub preference: f64,
    pub noise: f64,
    pub total: f64,
}

/// Scores candidates using the configured weights and noise schedule.
///
/// Pure apart from the random source handed to [`Scorer::score`].
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'a> {
    weights: &'a ScoringWeights,
    noise: &'a NoiseConfig,
}

impl<'a> Scorer<'a> {
    pub fn new(weights: &'a ScoringWeights, noise: &'a NoiseConfig) -> Self {
        Scorer { weights, noise }
    }

    /// Rounds behind the best available player, negated: 0 for the top of the
    /// board, -1 for a player one full round of picks deeper.
    pub fn adp_term(player: &Player, ctx: &PickContext) -> f64 {
        let teams = ctx.num_teams.max(1) as f64;
        -(player.adp - ctx.best_adp) / teams
    }

    /// How much the team still needs the player's position.
    ///
    /// - dedicated slot open: fraction of that position's slots still open
    /// - only FLEX open: half the fraction of FLEX slots still open
    /// - only bench open (or nothing): [`BENCH_NEED_PENALTY`]
    pub fn need_term(player: &Player, roster: &Roster) -> f64 {
        let pos = player.position;
        let open = roster.open_at(pos);
        if open > 0 {
            return open as f64 / roster.required(pos) as f64;
        }
        if roster.is_flex_eligible(pos) {
            let open_flex = roster.open_at(Position::Flex);
            if open_flex > 0 {
                return FLEX_NEED_FACTOR * open_flex as f64 / roster.required(Position::Flex) as f64;
            }
        }
        BENCH_NEED_PENALTY
    }

    pub fn rookie_term(player: &Player) -> f64 {
        if player.rookie {
            1.0
        } else {
            0.0
        }
    }

    pub fn preference(&self, player: &Player) -> f64 {
        self.weights
            .preferences
            .get(&player.position)
            .copied()
            .unwrap_or(0.0)
    }

    /// The deterministic part of the score (everything except noise).
    pub fn base_score(&self, player: &Player, roster: &Roster, ctx: &PickContext) -> ScoreBreakdown {
        let adp = Self::adp_term(player, ctx);
        let need = Self::need_term(player, roster);
        let rookie = Self::rookie_term(player);
        let preference = self.preference(player);
        let total = self.weights.adp * adp
            + self.weights.need * need
            + self.weights.rookie * rookie
            + preference;
        ScoreBreakdown {
            adp,
            need,
            rookie,
            preference,
            noise: 0.0,
            total,
        }
    }

    /// Full score for one candidate, drawing one noise value from `rng`.
    pub fn score<R: Rng>(
        &self,
        player: &Player,
        roster: &Roster,
        ctx: &PickContext,
        rng: &mut R,
    ) -> ScoreBreakdown {
        let mut breakdown = self.base_score(player, roster, ctx);
        let noise = self.noise.sample(ctx.round, rng);
        breakdown.noise = noise;
        breakdown.total += noise;
        breakdown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::settings::RosterRules;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn ctx(round: usize, best_adp: f64) -> PickContext {
        PickContext {
            overall: (round - 1) * 10 + 1,
            round,
            num_teams: 10,
            best_adp,
        }
    }

    #[test]
    fn adp_term_is_decreasing_in_adp() {
        let c = ctx(1, 1.0);
        let early = Player::new(1, "Early", Position::RunningBack, 1.0);
        let mid = Player::new(2, "Mid", Position::RunningBack, 11.0);
        let late = Player::new(3, "Late", Position::RunningBack, 21.0);
        assert_eq!(Scorer::adp_term(&early, &c), 0.0);
        assert!((Scorer::adp_term(&mid, &c) + 1.0).abs() < 1e-12);
        assert!(Scorer::adp_term(&mid, &c) > Scorer::adp_term(&late, &c));
    }

    #[test]
    fn need_term_penalises_filled_position() {
        let mut roster = Roster::new(&RosterRules::default());
        roster
            .add(Player::new(1, "Starter QB", Position::Quarterback, 30.0))
            .unwrap();

        let qb = Player::new(2, "Backup QB", Position::Quarterback, 40.0);
        let te = Player::new(3, "Tight End", Position::TightEnd, 40.0);
        let qb_need = Scorer::need_term(&qb, &roster);
        let te_need = Scorer::need_term(&te, &roster);
        assert_eq!(qb_need, BENCH_NEED_PENALTY);
        assert_eq!(te_need, 1.0);
        assert!(qb_need < te_need);
    }

    #[test]
    fn need_term_uses_flex_after_dedicated_slots_fill() {
        let mut roster = Roster::new(&RosterRules::default());
        roster.add(Player::new(1, "RB1", Position::RunningBack, 1.0)).unwrap();
        let rb = Player::new(3, "RB3", Position::RunningBack, 20.0);
        assert_eq!(Scorer::need_term(&rb, &roster), 0.5);

        roster.add(Player::new(2, "RB2", Position::RunningBack, 2.0)).unwrap();
        assert_eq!(Scorer::need_term(&rb, &roster), FLEX_NEED_FACTOR);

        roster.add(Player::new(4, "RB4", Position::RunningBack, 3.0)).unwrap();
        assert_eq!(Scorer::need_term(&rb, &roster), BENCH_NEED_PENALTY);
    }

    #[test]
    fn rookie_bonus_applies_only_to_rookies() {
        let weights = ScoringWeights {
            rookie: 0.5,
            ..ScoringWeights::default()
        };
        let noise = NoiseConfig::silent();
        let scorer = Scorer::new(&weights, &noise);
        let roster = Roster::new(&RosterRules::default());
        let c = ctx(1, 10.0);

        let vet = Player::new(1, "Veteran", Position::WideReceiver, 10.0);
        let rookie = Player::new(2, "Rookie", Position::WideReceiver, 10.0).as_rookie();
        let vet_score = scorer.base_score(&vet, &roster, &c);
        let rookie_score = scorer.base_score(&rookie, &roster, &c);
        assert!((rookie_score.total - vet_score.total - 0.5).abs() < 1e-12);
    }

    #[test]
    fn preference_adds_flat_bonus() {
        let mut weights = ScoringWeights::default();
        weights.preferences.insert(Position::Quarterback, 2.0);
        let noise = NoiseConfig::silent();
        let scorer = Scorer::new(&weights, &noise);
        let qb = Player::new(1, "QB", Position::Quarterback, 10.0);
        let wr = Player::new(2, "WR", Position::WideReceiver, 10.0);
        assert_eq!(scorer.preference(&qb), 2.0);
        assert_eq!(scorer.preference(&wr), 0.0);
    }

    #[test]
    fn silent_noise_draws_zero() {
        let noise = NoiseConfig::silent();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for round in 1..=15 {
            assert_eq!(noise.sample(round, &mut rng), 0.0);
        }
    }

    #[test]
    fn default_noise_grows_in_later_rounds() {
        let noise = NoiseConfig::default();
        assert!(noise.is_non_decreasing());
        assert!(noise.magnitude_for_round(1) < noise.magnitude_for_round(15));
        let mut prev = 0.0;
        for round in 1..=20 {
            let m = noise.magnitude_for_round(round);
            assert!(m >= prev, "round {round} magnitude {m} dropped below {prev}");
            prev = m;
        }
    }

    #[test]
    fn magnitude_for_round_picks_covering_phase() {
        let noise = NoiseConfig::default();
        assert_eq!(noise.magnitude_for_round(1), 0.15);
        assert_eq!(noise.magnitude_for_round(2), 0.15);
        assert_eq!(noise.magnitude_for_round(3), 0.35);
        assert_eq!(noise.magnitude_for_round(9), 0.6);
        assert_eq!(noise.magnitude_for_round(40), 0.9);
    }

    #[test]
    fn uniform_noise_stays_in_bounds() {
        let noise = NoiseConfig {
            distribution: NoiseDistribution::Uniform,
            phases: vec![NoisePhase {
                from_round: 1,
                magnitude: 0.25,
            }],
        };
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..1000 {
            let v = noise.sample(1, &mut rng);
            assert!((-0.25..=0.25).contains(&v));
        }
    }

    #[test]
    fn same_seed_same_noise() {
        let noise = NoiseConfig::default();
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        for round in 1..=15 {
            assert_eq!(noise.sample(round, &mut a), noise.sample(round, &mut b));
        }
    }

    #[test]
    fn validate_rejects_bad_schedules() {
        let mut noise = NoiseConfig::default();
        noise.phases[0].from_round = 2;
        assert!(noise.validate().is_err());

        let mut noise = NoiseConfig::default();
        noise.phases[2].from_round = 3;
        assert!(noise.validate().is_err());

        let mut noise = NoiseConfig::default();
        noise.phases[1].magnitude = -0.1;
        assert!(noise.validate().is_err());

        let noise = NoiseConfig {
            distribution: NoiseDistribution::Gaussian,
            phases: vec![],
        };
        assert!(noise.validate().is_err());

        assert!(NoiseConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_negative_weights() {
        let weights = ScoringWeights {
            need: -1.0,
            ..ScoringWeights::default()
        };
        match weights.validate() {
            Err(DraftError::InvalidDataset { field, .. }) => assert_eq!(field, "weights.need"),
            other => panic!("expected InvalidDataset, got {other:?}"),
        }

        let mut weights = ScoringWeights::default();
        weights.preferences.insert(Position::RunningBack, f64::NAN);
        assert!(weights.validate().is_err());
    }
}
