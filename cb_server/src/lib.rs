//! HTTP and event-stream front end for the `card_brawl` game core.
//!
//! - [`api`]: router, handlers and middleware
//! - [`cards`]: card list loading from the assets directory
//! - [`config`]: CLI/environment configuration
//! - [`logging`]: tracing subscriber setup
//! - [`metrics`]: Prometheus counters and gauges

pub mod api;
pub mod cards;
pub mod config;
pub mod logging;
pub mod metrics;
