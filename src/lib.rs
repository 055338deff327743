#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod atomics;
mod config;
mod constants;
mod error;
mod gate;
mod stats;
mod stress;
mod suite;
mod worker;

pub use config::RunConfig;
pub use constants::{DEFAULT_CAPACITY_PER_WORKER, DEFAULT_DURATION, DEFAULT_WORKERS};
pub use error::Error;
pub use stats::StressResult;
pub use stress::StressTest;
pub use suite::StressSuite;
