use crate::graph::Graph;
use crate::learn::q_table::QTable;
use crate::prelude::{QlError, Result, State};

/// Walks the greedy policy of a trained [QTable] from a start state to the goal.
pub struct PathExtractor<'g> {
    graph: &'g Graph,
    max_hops: usize,
}

impl<'g> PathExtractor<'g> {
    pub fn new(graph: &'g Graph, max_hops: usize) -> Self {
        Self { graph, max_hops }
    }

    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    /// Returns the states visited from `start` to `goal` (both included).
    ///
    /// Fails with [QlError::InvalidLocation] when `start` or `goal` is not a state of the graph,
    /// and with [QlError::NoPathFound] when
    /// - the walk exceeds `max_hops`
    /// - a visited state has no learned (positive) value, so the policy has no preference
    /// - the policy leaves the edges of the graph
    pub fn extract(&self, q: &QTable, start: State, goal: State) -> Result<Vec<State>> {
        if q.dim() != self.graph.len() {
            return Err(QlError::Configuration(format!(
                "q-table has {} states, graph has {}",
                q.dim(),
                self.graph.len()
            )));
        }
        if let Some(&unknown) = [start, goal].iter().find(|&&s| s >= self.graph.len()) {
            return Err(QlError::InvalidLocation(unknown.to_string()));
        }

        let mut path = vec![start];
        let mut current = start;
        while current != goal {
            if path.len() > self.max_hops || q.max_value(current) <= 0.0 {
                return Err(self.no_path(start, goal));
            }
            let next = q.best_action(current);
            if self.graph.reward(current, next) <= 0.0 {
                return Err(self.no_path(start, goal));
            }
            path.push(next);
            current = next;
        }
        Ok(path)
    }

    fn no_path(&self, start: State, goal: State) -> QlError {
        QlError::NoPathFound {
            start: self.graph.location(start).to_string(),
            goal: self.graph.location(goal).to_string(),
            max_hops: self.max_hops,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    use crate::graph::SquareMatrix;
    use crate::learn::trainer::{Parameter, QTableTrainer};

    use super::*;

    fn zero_table(graph: &Graph, goal: State) -> QTable {
        QTable::new(goal, SquareMatrix::zeros(graph.len()), graph.locations().to_vec())
    }

    #[test]
    fn test_start_equals_goal() {
        let graph = Graph::warehouse();
        let extractor = PathExtractor::new(&graph, 0);
        assert_eq!(extractor.extract(&zero_table(&graph, 3), 3, 3), Ok(vec![3]));
    }

    #[rstest]
    #[case(99, 6, "99")]
    #[case(4, 99, "99")]
    #[case(99, 99, "99")]
    #[case(12, 0, "12")]
    fn test_states_out_of_range(#[case] start: State, #[case] goal: State, #[case] unknown: &str) {
        let graph = Graph::warehouse();
        let mut trainer = QTableTrainer::new(&graph, Parameter::default(), StdRng::seed_from_u64(3)).unwrap();
        let q = trainer.train("G").unwrap();
        let extractor = PathExtractor::new(&graph, 48);
        assert_eq!(
            extractor.extract(&q, start, goal),
            Err(QlError::InvalidLocation(unknown.to_string()))
        );
    }

    #[test]
    fn test_zero_table_fails_immediately() {
        let graph = Graph::warehouse();
        let extractor = PathExtractor::new(&graph, 48);
        let result = extractor.extract(&zero_table(&graph, 6), 4, 6);
        assert_eq!(
            result,
            Err(QlError::NoPathFound {
                start: "E".to_string(),
                goal: "G".to_string(),
                max_hops: 48
            })
        );
    }

    #[test]
    fn test_cycle_hits_hop_limit() {
        // A <-> B learned as a two-cycle, C never reached
        let graph = Graph::new(
            ["A", "B", "C"],
            vec![vec![0.0, 1.0, 0.0], vec![1.0, 0.0, 1.0], vec![0.0, 1.0, 0.0]],
        )
        .unwrap();
        let mut values = SquareMatrix::<f32>::zeros(3);
        values.set(0, 1, 5.0);
        values.set(1, 0, 5.0);
        values.set(1, 2, 1.0);
        let q = QTable::new(2, values, graph.locations().to_vec());

        let extractor = PathExtractor::new(&graph, 6);
        assert!(matches!(extractor.extract(&q, 0, 2), Err(QlError::NoPathFound { max_hops: 6, .. })));
    }

    #[test]
    fn test_policy_leaving_the_graph() {
        let graph = Graph::new(["A", "B"], vec![vec![0.0, 0.0], vec![0.0, 0.0]]).unwrap();
        let mut values = SquareMatrix::<f32>::zeros(2);
        values.set(0, 1, 1.0);
        let q = QTable::new(1, values, graph.locations().to_vec());
        assert!(matches!(
            PathExtractor::new(&graph, 8).extract(&q, 0, 1),
            Err(QlError::NoPathFound { .. })
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let graph = Graph::warehouse();
        let small = Graph::new(["A"], vec![vec![1.0]]).unwrap();
        let q = zero_table(&small, 0);
        assert!(matches!(
            PathExtractor::new(&graph, 8).extract(&q, 0, 0),
            Err(QlError::Configuration(_))
        ));
    }

    #[test]
    fn test_extract_trained_path() {
        let graph = Graph::warehouse();
        let param = Parameter::default();
        let mut trainer = QTableTrainer::new(&graph, param.clone(), StdRng::seed_from_u64(21)).unwrap();
        let (e, f) = (graph.state("E").unwrap(), graph.state("F").unwrap());
        let q = trainer.train_state(f).unwrap();

        let path = PathExtractor::new(&graph, param.max_hops(graph.len())).extract(&q, e, f).unwrap();
        let symbols = path.iter().map(|&s| graph.location(s)).collect::<Vec<_>>();
        assert_eq!(symbols, ["E", "I", "J", "F"]);
    }
}
