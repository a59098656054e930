pub mod graph;
pub mod learn;
pub mod log;
pub mod prelude;
pub mod route;
pub mod util;
