//! In-memory procfs for tests and for running sources off Linux.

mod filesystem;
mod scenarios;

pub use filesystem::MockFs;
