pub mod periodic;
pub mod runner;

pub use periodic::{run_tick, Periodic};
pub use runner::{check_once, Runner};
