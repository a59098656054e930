//! Route planning on top of the trained Q-table: single routes and routes through a waypoint.

use std::fmt::{Display, Formatter};

use itertools::Itertools;
use rand::rngs::ThreadRng;
use rand::{thread_rng, Rng};

use crate::graph::Graph;
use crate::learn::q_table::QTable;
use crate::learn::trainer::{Parameter, QTableTrainer};
use crate::prelude::{Result, State};

pub use extract::PathExtractor;

mod extract;

/// Ordered sequence of location symbols from a start to a goal
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route(Vec<String>);

impl Route {
    pub fn locations(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn position(&self, location: &str) -> Option<usize> {
        self.0.iter().position(|l| l == location)
    }

    /// Appends `tail`, skipping its first element (the shared waypoint).
    fn splice(mut self, tail: Route) -> Route {
        debug_assert_eq!(self.last(), tail.first());
        self.0.extend(tail.0.into_iter().skip(1));
        self
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.iter().join(" -> "))
    }
}

/// Finds routes on a [Graph], training a fresh Q-table for every requested goal.
pub struct Router<'g, R: Rng> {
    graph: &'g Graph,
    trainer: QTableTrainer<'g, R>,
    extractor: PathExtractor<'g>,
}

impl<'g> Router<'g, ThreadRng> {
    pub fn new(graph: &'g Graph, param: Parameter) -> Result<Self> {
        Self::with_rng(graph, param, thread_rng())
    }
}

impl<'g, R: Rng> Router<'g, R> {
    pub fn with_rng(graph: &'g Graph, param: Parameter, rng: R) -> Result<Self> {
        let extractor = PathExtractor::new(graph, param.max_hops(graph.len()));
        let trainer = QTableTrainer::new(graph, param, rng)?;
        Ok(Self {
            graph,
            trainer,
            extractor,
        })
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Trains a Q-table for `goal` without extracting a route
    pub fn q_table(&mut self, goal: &str) -> Result<QTable> {
        self.trainer.train(goal)
    }

    /// Best route from `start` to `goal`, following the greedy policy of a freshly trained Q-table
    pub fn route(&mut self, start: &str, goal: &str) -> Result<Route> {
        let start_state = self.graph.state(start)?;
        let goal_state = self.graph.state(goal)?;
        if start_state == goal_state {
            return Ok(self.to_route(&[start_state]));
        }

        let q = self.trainer.train_state(goal_state)?;
        let path = self.extractor.extract(&q, start_state, goal_state)?;
        let route = self.to_route(&path);
        log::debug!("route {} -> {}: {}", start, goal, route);
        Ok(route)
    }

    /// Route from `start` to `goal` passing through `via`.
    ///
    /// Both legs are optimized separately; the full route is not necessarily the shortest one
    /// between `start` and `goal`.
    pub fn best_route(&mut self, start: &str, via: &str, goal: &str) -> Result<Route> {
        self.graph.state(goal)?;
        let head = self.route(start, via)?;
        let tail = self.route(via, goal)?;
        Ok(head.splice(tail))
    }

    fn to_route(&self, path: &[State]) -> Route {
        Route(path.iter().map(|&s| self.graph.location(s).to_string()).collect())
    }
}
