use rand::Rng;

use crate::graph::{playable_actions, Graph, SquareMatrix};
use crate::learn::q_table::QTable;
use crate::prelude::{Action, QlError, Result, State};
use crate::util::format::format_count;

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    /// Discount factor for future rewards
    pub gamma: f32,
    /// Learning rate
    pub alpha: f32,
    /// Number of Bellman updates per training run
    pub training_iterations: usize,
    /// Reward of the goal's self-loop. Must dominate all other rewards.
    pub goal_bonus: f32,
    /// How often a state without playable actions may be re-drawn within one iteration
    pub max_state_draws: usize,
    /// Path extraction gives up after `hop_limit_factor * N` hops
    pub hop_limit_factor: usize,
    /// Debug log cadence (0 = off)
    pub stats_after_iterations: usize,
}

impl Parameter {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(QlError::Configuration(format!("gamma {} out of range [0, 1]", self.gamma)));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(QlError::Configuration(format!("alpha {} out of range (0, 1]", self.alpha)));
        }
        if !(self.goal_bonus.is_finite() && self.goal_bonus > 0.0) {
            return Err(QlError::Configuration(format!(
                "goal_bonus {} must be positive",
                self.goal_bonus
            )));
        }
        if self.max_state_draws == 0 {
            return Err(QlError::config("max_state_draws must be at least 1"));
        }
        if self.hop_limit_factor == 0 {
            return Err(QlError::config("hop_limit_factor must be at least 1"));
        }
        Ok(())
    }

    pub fn max_hops(&self, num_states: usize) -> usize {
        self.hop_limit_factor * num_states
    }
}

impl Default for Parameter {
    fn default() -> Self {
        Self {
            gamma: 0.75,
            alpha: 0.9,
            training_iterations: 1000,
            goal_bonus: 1000.0,
            max_state_draws: 1000,
            hop_limit_factor: 4,
            stats_after_iterations: 250,
        }
    }
}

/**
    Tabular Q-learning on a [Graph].

    Each training run starts from an all-zero table and performs `training_iterations` updates:
    ```text
    for each iteration:
        current := uniformly random state (having at least one playable action)
        next    := uniformly random playable action of current
        TD      := R'[current][next] + gamma * max_a Q[next][a] - Q[current][next]
        Q[current][next] += alpha * TD
    ```
    where `R'` is the reward matrix with the goal's self-loop set to `goal_bonus`.

    The random source is injected, so a seeded [rand::rngs::StdRng] makes training reproducible.
 */
pub struct QTableTrainer<'g, R: Rng> {
    graph: &'g Graph,
    param: Parameter,
    rng: R,
}

impl<'g, R: Rng> QTableTrainer<'g, R> {
    pub fn new(graph: &'g Graph, param: Parameter, rng: R) -> Result<Self> {
        param.validate()?;
        Ok(Self { graph, param, rng })
    }

    pub fn param(&self) -> &Parameter {
        &self.param
    }

    pub fn train(&mut self, goal: &str) -> Result<QTable> {
        let goal = self.graph.state(goal)?;
        self.train_state(goal)
    }

    pub fn train_state(&mut self, goal: State) -> Result<QTable> {
        let num_states = self.graph.len();
        if goal >= num_states {
            return Err(QlError::InvalidLocation(goal.to_string()));
        }

        let rewards = self.graph.goal_augmented_rewards(goal, self.param.goal_bonus);
        let playable: Vec<Vec<Action>> = (0..num_states).map(|s| playable_actions(&rewards, s)).collect();

        let isolated = playable
            .iter()
            .enumerate()
            .filter(|(_, actions)| actions.is_empty())
            .map(|(s, _)| self.graph.location(s))
            .collect::<Vec<_>>();
        if !isolated.is_empty() {
            log::warn!("states without playable actions will be re-drawn during training: {:?}", isolated);
        }

        log::info!(
            "training q-table for goal {} with {} iterations",
            self.graph.location(goal),
            format_count(self.param.training_iterations)
        );

        let mut q = SquareMatrix::<f32>::zeros(num_states);
        for i in 0..self.param.training_iterations {
            let current = self.draw_playable_state(&playable)?;
            let actions = &playable[current];
            let next = actions[self.rng.gen_range(0..actions.len())];

            let future = q.row(next).iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let td = rewards.get(current, next) + self.param.gamma * future - q.get(current, next);
            q.set(current, next, q.get(current, next) + self.param.alpha * td);

            if self.param.stats_after_iterations > 0 && (i + 1) % self.param.stats_after_iterations == 0 {
                log::debug!(
                    "iteration: {}, max q-value: {:.1}",
                    format_count(i + 1),
                    q.values().iter().copied().fold(0.0, f32::max)
                );
            }
        }

        Ok(QTable::new(goal, q, self.graph.locations().to_vec()))
    }

    /// Draws random states until one has a playable action (bounded by `max_state_draws`).
    fn draw_playable_state(&mut self, playable: &[Vec<Action>]) -> Result<State> {
        for _ in 0..self.param.max_state_draws {
            let state = self.rng.gen_range(0..playable.len());
            if !playable[state].is_empty() {
                return Ok(state);
            }
        }
        Err(QlError::NoPlayableAction {
            draws: self.param.max_state_draws,
        })
    }
}
