use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ql::graph::Graph;
use ql::learn::trainer::Parameter;
use ql::prelude::DebugVisualizer;
use ql::route::Router;

#[derive(Parser, Debug)]
#[command(author, version, about = "Warehouse routing with tabular Q-learning", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    /// Discount factor
    #[arg(long, global = true)]
    pub gamma: Option<f32>,
    /// Learning rate
    #[arg(long, global = true)]
    pub alpha: Option<f32>,
    /// Training iterations per goal
    #[arg(long, global = true)]
    pub iterations: Option<usize>,
    /// Reward of the goal's self-loop
    #[arg(long, global = true)]
    pub goal_bonus: Option<f32>,
    /// Seed for reproducible training
    #[arg(long, global = true)]
    pub seed: Option<u64>,
    /// Replace an edge reward, e.g. `J:K=500` (repeatable)
    #[arg(long = "reward", global = true, value_name = "FROM:TO=VALUE")]
    pub rewards: Vec<RewardOverride>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    #[command(about = "Find the best route between two locations")]
    Route {
        #[arg(required = true)]
        start: String,
        #[arg(required = true)]
        goal: String,
    },
    #[command(about = "Find the best route passing a waypoint", alias = "via")]
    BestRoute {
        #[arg(required = true)]
        start: String,
        #[arg(required = true)]
        via: String,
        #[arg(required = true)]
        goal: String,
    },
    #[command(about = "Print the Q-table trained for a goal", alias = "q")]
    QTable {
        #[arg(required = true)]
        goal: String,
        /// Also show the greedy next hop of every location
        #[arg(long)]
        render: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct RewardOverride {
    pub from: String,
    pub to: String,
    pub reward: f32,
}

impl FromStr for RewardOverride {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("'{}' should look like FROM:TO=VALUE", s);
        let (edge, reward) = s.split_once('=').ok_or_else(invalid)?;
        let (from, to) = edge.split_once(':').ok_or_else(invalid)?;
        if from.is_empty() || to.is_empty() {
            return Err(invalid());
        }
        let reward = reward.trim().parse::<f32>().map_err(|e| format!("{}: {}", invalid(), e))?;
        Ok(Self {
            from: from.trim().to_string(),
            to: to.trim().to_string(),
            reward,
        })
    }
}

impl Cli {
    pub fn parameter(&self) -> Parameter {
        let default = Parameter::default();
        Parameter {
            gamma: self.gamma.unwrap_or(default.gamma),
            alpha: self.alpha.unwrap_or(default.alpha),
            training_iterations: self.iterations.unwrap_or(default.training_iterations),
            goal_bonus: self.goal_bonus.unwrap_or(default.goal_bonus),
            ..default
        }
    }

    pub fn graph(&self) -> Result<Graph> {
        let mut graph = Graph::warehouse();
        for o in &self.rewards {
            graph = graph.with_reward(&o.from, &o.to, o.reward)?;
            log::info!("reward {} -> {} set to {}", o.from, o.to, o.reward);
        }
        Ok(graph)
    }

    /// Executes the command and returns the text to print
    pub fn run(&self) -> Result<String> {
        let graph = self.graph()?;
        match self.seed {
            Some(seed) => execute(
                &mut Router::with_rng(&graph, self.parameter(), StdRng::seed_from_u64(seed))?,
                &self.command,
            ),
            None => execute(&mut Router::new(&graph, self.parameter())?, &self.command),
        }
    }
}

fn execute<R: Rng>(router: &mut Router<R>, command: &Command) -> Result<String> {
    match command {
        Command::Route { start, goal } => {
            let route = router.route(start, goal)?;
            Ok(format!("Route: {}", route))
        }
        Command::BestRoute { start, via, goal } => {
            let route = router.best_route(start, via, goal)?;
            Ok(format!("Route: {}", route))
        }
        Command::QTable { goal, render } => {
            let q = router.q_table(goal)?;
            let mut output = format!("{}\n{}", q.one_line_info(), q);
            if *render {
                output.push_str("\n\n");
                output.push_str(&q.render_to_text());
            }
            Ok(output)
        }
    }
}
