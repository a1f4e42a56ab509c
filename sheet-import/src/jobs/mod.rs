//! Background execution of import jobs

pub mod limiter;
pub mod runner;

pub use runner::{JobOutcome, JobRunner};
