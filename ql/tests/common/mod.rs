use lazy_static::lazy_static;
use log::LevelFilter;
use rand::rngs::StdRng;
use rand::SeedableRng;

use ql::graph::Graph;
use ql::learn::trainer::Parameter;
use ql::route::{Route, Router};

lazy_static! {
    pub static ref WAREHOUSE: Graph = Graph::warehouse();
}

#[ctor::ctor]
fn init() {
    env_logger::builder()
        .format_timestamp_secs()
        .filter_level(LevelFilter::Debug)
        .parse_default_env()
        .is_test(true)
        .init()
}

pub fn seeded_router(param: Parameter, seed: u64) -> Router<'static, StdRng> {
    Router::with_rng(&WAREHOUSE, param, StdRng::seed_from_u64(seed)).expect("parameter should be valid")
}

/// Every consecutive pair of `route` must be connected by an edge of `graph`.
pub fn assert_walkable(graph: &Graph, route: &Route) {
    let path = route
        .locations()
        .iter()
        .map(|l| graph.state(l).expect("route should only contain known locations"))
        .collect::<Vec<_>>();
    assert!(graph.is_walkable(&path), "not walkable: {}", route);
}
