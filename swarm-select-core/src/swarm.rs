//! Shared particle swarm update loop
//!
//! Every search mode runs the same synchronous loop. Each iteration makes two
//! passes over the swarm:
//!
//! 1. evaluate every particle and update personal/global bests;
//! 2. move every particle using the bests captured at the end of pass 1.
//!
//! Bests are never updated during pass 2, so the order particles are moved in
//! does not matter. What a position *means* (binary mask, blend weights,
//! bounded parameters) is supplied by a [`SearchStrategy`].

use rand::Rng;

use crate::config::SwarmConfig;
use crate::fitness::Evaluation;
use crate::telemetry;
use crate::{Error, Result};

/// Velocity update coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    /// Inertia weight `w`
    pub inertia: f64,
    /// Cognitive coefficient `c1`
    pub cognitive: f64,
    /// Social coefficient `c2`
    pub social: f64,
}

/// Standard PSO velocity update for a single dimension.
///
/// `v' = w·v + c1·r1·(pbest − x) + c2·r2·(gbest − x)`
#[inline]
pub fn update_velocity(
    coefficients: Coefficients,
    r1: f64,
    r2: f64,
    position: f64,
    velocity: f64,
    personal_best: f64,
    global_best: f64,
) -> f64 {
    coefficients.inertia * velocity
        + coefficients.cognitive * r1 * (personal_best - position)
        + coefficients.social * r2 * (global_best - position)
}

/// How a search mode interprets and moves particles.
pub trait SearchStrategy {
    /// Short mode name used in telemetry
    const MODE: &'static str;

    /// Problem dimensionality
    fn dimension(&self) -> usize;

    /// Draw an initial `(position, velocity)` pair
    fn initialize<R: Rng + ?Sized>(&self, rng: &mut R) -> (Vec<f64>, Vec<f64>);

    /// Score a raw particle position
    fn evaluate(&self, position: &[f64]) -> Evaluation;

    /// Apply an already-updated velocity to a position
    fn reposition<R: Rng + ?Sized>(&self, position: &mut [f64], velocity: &[f64], rng: &mut R);

    /// Convert a raw position into the reported solution
    fn decode(&self, position: &[f64]) -> Vec<f64> {
        position.to_vec()
    }

    /// Score given to failed evaluations
    fn failure_score(&self) -> f64 {
        crate::fitness::FAILURE_SCORE
    }

    /// Number of iterations actually run for `config`
    fn iteration_budget(&self, config: &SwarmConfig) -> usize {
        config.iteration_count
    }
}

/// Particle state
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Current raw position
    pub position: Vec<f64>,
    /// Current velocity
    pub velocity: Vec<f64>,
    /// Personal best position
    pub best_position: Vec<f64>,
    /// Personal best score
    pub best_score: f64,
}

impl Particle {
    /// Create a particle whose personal best is its starting position
    pub fn new(position: Vec<f64>, velocity: Vec<f64>) -> Self {
        Self {
            best_position: position.clone(),
            position,
            velocity,
            best_score: f64::NEG_INFINITY,
        }
    }

    /// Record a score; ties keep the incumbent.
    fn record(&mut self, score: f64) -> bool {
        if score > self.best_score {
            self.best_score = score;
            self.best_position.clone_from(&self.position);
            true
        } else {
            false
        }
    }
}

/// Search lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    /// `completed` full iterations have run so far
    Running { completed: usize },
    /// The iteration budget is exhausted
    Done,
}

impl SearchPhase {
    fn start(budget: usize) -> Self {
        if budget == 0 {
            SearchPhase::Done
        } else {
            SearchPhase::Running { completed: 0 }
        }
    }

    fn advance(self, budget: usize) -> Self {
        match self {
            SearchPhase::Running { completed } if completed + 1 < budget => {
                SearchPhase::Running {
                    completed: completed + 1,
                }
            }
            _ => SearchPhase::Done,
        }
    }
}

/// Full swarm state for a single search call
#[derive(Debug, Clone)]
pub struct SwarmState {
    particles: Vec<Particle>,
    global_best_position: Vec<f64>,
    global_best_score: f64,
    failed_evaluations: usize,
}

impl SwarmState {
    /// Initialize `particle_count` particles from the strategy
    pub fn initialize<S, R>(particle_count: usize, strategy: &S, rng: &mut R) -> Self
    where
        S: SearchStrategy,
        R: Rng + ?Sized,
    {
        let particles: Vec<Particle> = (0..particle_count)
            .map(|_| {
                let (position, velocity) = strategy.initialize(rng);
                Particle::new(position, velocity)
            })
            .collect();
        let global_best_position = particles
            .first()
            .map(|p| p.position.clone())
            .unwrap_or_default();
        Self {
            particles,
            global_best_position,
            global_best_score: f64::NEG_INFINITY,
            failed_evaluations: 0,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn global_best_position(&self) -> &[f64] {
        &self.global_best_position
    }

    pub fn global_best_score(&self) -> f64 {
        self.global_best_score
    }

    /// Pass 1: score every particle and update personal/global bests.
    pub fn evaluate<S: SearchStrategy>(&mut self, strategy: &S) {
        for particle in &mut self.particles {
            let score = match strategy.evaluate(&particle.position) {
                Evaluation::Scored(score) => score,
                Evaluation::Failed(reason) => {
                    self.failed_evaluations += 1;
                    telemetry::evaluation_failed(S::MODE, &reason);
                    strategy.failure_score()
                }
            };

            if particle.record(score) && score > self.global_best_score {
                self.global_best_score = score;
                self.global_best_position.clone_from(&particle.position);
            }
        }
    }

    /// Pass 2: move every particle toward its personal best and the global best.
    pub fn advance<S, R>(&mut self, strategy: &S, coefficients: Coefficients, rng: &mut R)
    where
        S: SearchStrategy,
        R: Rng + ?Sized,
    {
        let global_best = &self.global_best_position;
        for particle in &mut self.particles {
            for (i, v) in particle.velocity.iter_mut().enumerate() {
                let r1: f64 = rng.gen();
                let r2: f64 = rng.gen();
                *v = update_velocity(
                    coefficients,
                    r1,
                    r2,
                    particle.position[i],
                    *v,
                    particle.best_position[i],
                    global_best[i],
                );
            }
            strategy.reposition(&mut particle.position, &particle.velocity, rng);
        }
    }
}

/// Result of a completed search
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchOutcome {
    /// Decoded global best position
    pub best_position: Vec<f64>,
    /// Global best score
    pub best_score: f64,
    /// Iterations run
    pub iterations: usize,
    /// Global best score after each iteration
    pub history: Vec<f64>,
    /// Evaluations that failed and were scored with the failure score
    pub failed_evaluations: usize,
}

/// Run a full search to completion.
///
/// Validates `config` and the strategy dimension before any iteration runs.
pub fn run<S, R>(config: &SwarmConfig, strategy: &S, rng: &mut R) -> Result<SearchOutcome>
where
    S: SearchStrategy,
    R: Rng + ?Sized,
{
    config.validate()?;
    let dimension = strategy.dimension();
    if dimension == 0 {
        return Err(Error::EmptyInput("search space has no dimensions"));
    }

    let budget = strategy.iteration_budget(config);
    telemetry::search_started(S::MODE, config.particle_count, budget, dimension);

    let coefficients = config.coefficients();
    let mut state = SwarmState::initialize(config.particle_count, strategy, rng);
    let mut history = Vec::with_capacity(budget);

    let mut phase = SearchPhase::start(budget);
    while let SearchPhase::Running { completed } = phase {
        state.evaluate(strategy);
        state.advance(strategy, coefficients, rng);
        history.push(state.global_best_score);
        telemetry::iteration_completed(S::MODE, completed + 1, state.global_best_score);
        phase = phase.advance(budget);
    }

    telemetry::search_completed(S::MODE, state.global_best_score, state.failed_evaluations);

    Ok(SearchOutcome {
        best_position: strategy.decode(&state.global_best_position),
        best_score: state.global_best_score,
        iterations: history.len(),
        history,
        failed_evaluations: state.failed_evaluations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Maximize `-(x - 3)^2` on an unbounded line.
    struct Parabola;

    impl SearchStrategy for Parabola {
        const MODE: &'static str = "parabola";

        fn dimension(&self) -> usize {
            1
        }

        fn initialize<R: Rng + ?Sized>(&self, rng: &mut R) -> (Vec<f64>, Vec<f64>) {
            (vec![rng.gen_range(-10.0..10.0)], vec![rng.gen_range(-1.0..1.0)])
        }

        fn evaluate(&self, position: &[f64]) -> Evaluation {
            Evaluation::Scored(-(position[0] - 3.0).powi(2))
        }

        fn reposition<R: Rng + ?Sized>(&self, position: &mut [f64], velocity: &[f64], _rng: &mut R) {
            position[0] += velocity[0];
        }
    }

    /// Every particle scores the same.
    struct Flat;

    impl SearchStrategy for Flat {
        const MODE: &'static str = "flat";

        fn dimension(&self) -> usize {
            2
        }

        fn initialize<R: Rng + ?Sized>(&self, rng: &mut R) -> (Vec<f64>, Vec<f64>) {
            (vec![rng.gen(), rng.gen()], vec![0.0, 0.0])
        }

        fn evaluate(&self, _position: &[f64]) -> Evaluation {
            Evaluation::Scored(1.0)
        }

        fn reposition<R: Rng + ?Sized>(&self, position: &mut [f64], velocity: &[f64], _rng: &mut R) {
            for (p, v) in position.iter_mut().zip(velocity) {
                *p += v;
            }
        }
    }

    #[test]
    fn velocity_update_matches_formula() {
        let c = Coefficients {
            inertia: 0.5,
            cognitive: 1.5,
            social: 2.0,
        };
        // 0.5*2 + 1.5*0.5*(3-1) + 2.0*0.25*(5-1) = 1 + 1.5 + 2
        let v = update_velocity(c, 0.5, 0.25, 1.0, 2.0, 3.0, 5.0);
        assert!((v - 4.5).abs() < 1e-12);
    }

    #[test]
    fn velocity_update_at_both_bests_keeps_momentum() {
        let c = SwarmConfig::default().coefficients();
        assert_eq!(update_velocity(c, 0.9, 0.9, 2.0, 1.0, 2.0, 2.0), 0.5);
    }

    #[test]
    fn phase_runs_exactly_budget_iterations() {
        let mut phase = SearchPhase::start(3);
        let mut seen = Vec::new();
        while let SearchPhase::Running { completed } = phase {
            seen.push(completed);
            phase = phase.advance(3);
        }
        assert_eq!(seen, vec![0, 1, 2]);
        assert_eq!(SearchPhase::start(0), SearchPhase::Done);
    }

    #[test]
    fn global_best_history_is_monotonic() {
        for seed in 0..20 {
            let config = SwarmConfig::builder()
                .particles(8)
                .iterations(25)
                .build()
                .unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = run(&config, &Parabola, &mut rng).unwrap();
            assert_eq!(outcome.history.len(), 25);
            assert!(outcome
                .history
                .windows(2)
                .all(|w| w[1] >= w[0]));
            assert_eq!(outcome.best_score, *outcome.history.last().unwrap());
        }
    }

    #[test]
    fn personal_best_scores_never_decrease() {
        let config = SwarmConfig::builder().particles(6).build().unwrap();
        let coefficients = config.coefficients();
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut state = SwarmState::initialize(config.particle_count, &Parabola, &mut rng);
            let mut previous = vec![f64::NEG_INFINITY; config.particle_count];
            for _ in 0..30 {
                state.evaluate(&Parabola);
                for (particle, prev) in state.particles().iter().zip(&mut previous) {
                    assert!(particle.best_score >= *prev);
                    assert!(particle.best_score <= state.global_best_score());
                    *prev = particle.best_score;
                }
                state.advance(&Parabola, coefficients, &mut rng);
            }
        }
    }

    #[test]
    fn converges_on_parabola_peak() {
        let config = SwarmConfig::builder()
            .particles(20)
            .iterations(60)
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let outcome = run(&config, &Parabola, &mut rng).unwrap();
        assert!((outcome.best_position[0] - 3.0).abs() < 0.1);
    }

    #[test]
    fn ties_keep_first_found_best() {
        let config = SwarmConfig::builder()
            .particles(5)
            .iterations(10)
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = SwarmState::initialize(config.particle_count, &Flat, &mut rng);
        let first = state.particles()[0].position.clone();

        state.evaluate(&Flat);
        assert_eq!(state.global_best_position(), first.as_slice());
        state.advance(&Flat, config.coefficients(), &mut rng);
        state.evaluate(&Flat);
        assert_eq!(state.global_best_position(), first.as_slice());
        assert_eq!(state.global_best_score(), 1.0);
    }

    #[test]
    fn run_rejects_invalid_config_before_iterating() {
        let config = SwarmConfig {
            particle_count: 0,
            ..SwarmConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            run(&config, &Parabola, &mut rng),
            Err(Error::InvalidConfig(_))
        ));
    }
}
