//! Static world model of the learning agent: a fixed set of named locations and the immediate
//! reward for moving from one location to another.
//!
//! A reward `R[s][a] > 0` means there is an edge from state `s` to state `a`. Zero (or any
//! non-positive value) means there is no move between them.

use itertools::Itertools;
use rustc_hash::FxHashMap;

pub use matrix::SquareMatrix;

use crate::prelude::{Action, QlError, Result, State};

mod matrix;

pub const WAREHOUSE_LOCATIONS: [&str; 12] = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L"];

/// Warehouse floor with 12 locations
/// ```text
///   A - B - C   D
///       |   |   |
///   E   F   G - H
///   |   |       |
///   I - J - K - L
/// ```
/// G additionally carries a self-loop.
#[rustfmt::skip]
pub const WAREHOUSE_REWARDS: [[f32; 12]; 12] = [
    //A   B    C    D    E    F    G    H    I    J    K    L
    [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], // A
    [1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0], // B
    [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0], // C
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0], // D
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0], // E
    [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0], // F
    [0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0], // G
    [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0], // H
    [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0], // I
    [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0], // J
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0], // K
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0], // L
];

/// Immutable location graph.
///
/// Holds the bijection between location symbols and [State] indices and the reward matrix `R`.
/// Nothing here changes after construction; derived variants (see [Graph::with_reward]) are new
/// instances.
#[derive(Clone, Debug)]
pub struct Graph {
    locations: Vec<String>,
    index: FxHashMap<String, State>,
    rewards: SquareMatrix<f32>,
}

impl Graph {
    pub fn new<S: Into<String>>(locations: impl IntoIterator<Item = S>, rewards: Vec<Vec<f32>>) -> Result<Self> {
        let locations: Vec<String> = locations.into_iter().map(Into::into).collect();
        if locations.is_empty() {
            return Err(QlError::config("graph needs at least one location"));
        }

        let mut index = FxHashMap::default();
        for (state, symbol) in locations.iter().enumerate() {
            if index.insert(symbol.clone(), state).is_some() {
                return Err(QlError::Configuration(format!("duplicate location '{}'", symbol)));
            }
        }

        let rewards = SquareMatrix::from_rows(rewards)?;
        if rewards.dim() != locations.len() {
            return Err(QlError::Configuration(format!(
                "reward matrix is {0}x{0}, but there are {1} locations",
                rewards.dim(),
                locations.len()
            )));
        }
        if rewards.values().iter().any(|r| !r.is_finite()) {
            return Err(QlError::config("rewards must be finite"));
        }

        Ok(Self {
            locations,
            index,
            rewards,
        })
    }

    pub fn warehouse() -> Self {
        Graph::new(WAREHOUSE_LOCATIONS, WAREHOUSE_REWARDS.iter().map(|row| row.to_vec()).collect())
            .expect("warehouse definition should be valid")
    }

    /// Number of locations (= number of states = number of actions)
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn state(&self, location: &str) -> Result<State> {
        self.index
            .get(location)
            .copied()
            .ok_or_else(|| QlError::InvalidLocation(location.to_string()))
    }

    pub fn location(&self, state: State) -> &str {
        &self.locations[state]
    }

    pub fn rewards(&self) -> &SquareMatrix<f32> {
        &self.rewards
    }

    pub fn reward(&self, state: State, action: Action) -> f32 {
        self.rewards.get(state, action)
    }

    pub fn playable_actions(&self, state: State) -> Vec<Action> {
        playable_actions(&self.rewards, state)
    }

    /// States without any outgoing edge
    pub fn isolated_states(&self) -> Vec<State> {
        (0..self.len())
            .filter(|&s| self.rewards.row(s).iter().all(|&r| r <= 0.0))
            .collect()
    }

    /// Copy of `R` with the goal's self-reward set to `goal_bonus`.
    ///
    /// The dominating self-loop makes the goal absorbing for value estimation.
    pub fn goal_augmented_rewards(&self, goal: State, goal_bonus: f32) -> SquareMatrix<f32> {
        let mut rewards = self.rewards.clone();
        rewards.set(goal, goal, goal_bonus);
        rewards
    }

    /// Derives a new graph with the reward of edge `from -> to` replaced.
    ///
    /// A reward above the usual edge reward turns `to` into a preferred checkpoint on the way;
    /// a non-positive one removes the edge.
    pub fn with_reward(&self, from: &str, to: &str, reward: f32) -> Result<Graph> {
        let (from, to) = (self.state(from)?, self.state(to)?);
        if !reward.is_finite() {
            return Err(QlError::config("rewards must be finite"));
        }
        let mut graph = self.clone();
        graph.rewards.set(from, to, reward);
        Ok(graph)
    }

    /// true, if each consecutive pair of `path` is connected by an edge
    pub fn is_walkable(&self, path: &[State]) -> bool {
        !path.is_empty()
            && path.iter().all(|&s| s < self.len())
            && path.iter().tuple_windows().all(|(&s, &a)| self.reward(s, a) > 0.0)
    }
}

pub(crate) fn playable_actions(rewards: &SquareMatrix<f32>, state: State) -> Vec<Action> {
    rewards
        .row(state)
        .iter()
        .enumerate()
        .filter(|(_, r)| **r > 0.0)
        .map(|(a, _)| a)
        .collect()
}
