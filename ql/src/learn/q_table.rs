use std::fmt::{Display, Formatter};

use console_engine::screen::Screen;

use crate::graph::SquareMatrix;
use crate::prelude::{Action, DebugVisualizer, State};

/// Learned value of taking an action from a state, trained towards one goal.
///
/// Rows are states, columns are actions (= destination states).
#[derive(Clone, Debug)]
pub struct QTable {
    goal: State,
    values: SquareMatrix<f32>,
    locations: Vec<String>,
}

impl QTable {
    pub(crate) fn new(goal: State, values: SquareMatrix<f32>, locations: Vec<String>) -> Self {
        debug_assert_eq!(values.dim(), locations.len());
        Self {
            goal,
            values,
            locations,
        }
    }

    pub fn goal(&self) -> State {
        self.goal
    }

    pub fn dim(&self) -> usize {
        self.values.dim()
    }

    pub fn value(&self, state: State, action: Action) -> f32 {
        self.values.get(state, action)
    }

    pub fn values(&self) -> &SquareMatrix<f32> {
        &self.values
    }

    pub fn max_value(&self, state: State) -> f32 {
        self.values.row(state).iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Greedy policy: the action with the highest value. Ties go to the lowest action index.
    pub fn best_action(&self, state: State) -> Action {
        let row = self.values.row(state);
        row.iter()
            .enumerate()
            .fold(0, |best, (action, &value)| if value > row[best] { action } else { best })
    }

    /// Number of (state, action) entries having a learned (positive) value
    pub fn learned_entries(&self) -> usize {
        self.values.values().iter().filter(|&&v| v > 0.0).count()
    }
}

/// Integer-rounded table with location symbols as row and column headers
impl Display for QTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let label_width = self.locations.iter().map(|l| l.len()).max().unwrap_or(1);
        let width = self
            .values
            .values()
            .iter()
            .map(|v| format!("{:.0}", v).len())
            .chain(std::iter::once(label_width))
            .max()
            .unwrap_or(1);

        write!(f, "{:label_width$}", "")?;
        for l in &self.locations {
            write!(f, " {:>width$}", l)?;
        }
        for (state, l) in self.locations.iter().enumerate() {
            writeln!(f)?;
            write!(f, "{:label_width$}", l)?;
            for v in self.values.row(state) {
                write!(f, " {:>width$.0}", v)?;
            }
        }
        Ok(())
    }
}

impl DebugVisualizer for QTable {
    fn one_line_info(&self) -> String {
        let max = (0..self.dim()).map(|s| self.max_value(s)).fold(0.0, f32::max);
        format!(
            "QTable: goal: {}, learned entries: {}, max value: {:.1}",
            self.locations[self.goal],
            self.learned_entries(),
            max
        )
    }

    /// One line per state: `<state>><greedy next state>`, `.` when nothing is learned yet
    fn render_to_console(&self) -> Screen {
        let label_width = self.locations.iter().map(|l| l.len()).max().unwrap_or(1);
        let mut screen = Screen::new_empty((2 * label_width + 1) as u32, self.dim() as u32);
        screen.clear();

        for (state, l) in self.locations.iter().enumerate() {
            let next = match self.max_value(state) {
                v if v > 0.0 => self.locations[self.best_action(state)].as_str(),
                _ => ".",
            };
            screen.print(0, state as i32, &format!("{}>{}", l, next));
        }
        screen
    }
}
