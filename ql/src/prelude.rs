use console_engine::screen::Screen;
use thiserror::Error;

/// Index of a location in a [Graph](crate::graph::Graph), in range `0..N`.
pub type State = usize;

/// An action is the destination state of a move.
///
/// Action space and state space are the same set of indices: taking action `a` from any state
/// means moving to state `a`. Reward matrix and Q-table are therefore both `N x N`.
pub type Action = State;

pub type Result<T, E = QlError> = std::result::Result<T, E>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum QlError {
    #[error("unknown location '{0}'")]
    InvalidLocation(String),
    #[error("no state with a playable action found within {draws} draws")]
    NoPlayableAction { draws: usize },
    #[error("no path found from {start} to {goal} within {max_hops} hops")]
    NoPathFound {
        start: String,
        goal: String,
        max_hops: usize,
    },
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl QlError {
    pub fn config(msg: &str) -> Self {
        QlError::Configuration(msg.to_string())
    }
}

pub trait DebugVisualizer {
    fn one_line_info(&self) -> String;
    fn render_to_console(&self) -> Screen;

    /// [Self::render_to_console] as plain text, one line per screen row
    fn render_to_text(&self) -> String {
        let screen = self.render_to_console();
        (0..screen.get_height() as i32)
            .map(|y| {
                (0..screen.get_width() as i32)
                    .map(|x| screen.get_pxl(x, y).map(|p| p.chr).unwrap_or(' '))
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
