//! Energy-potential estimation engine.
//!
//! Pure, synchronous computations. Nothing in here performs I/O; climate data
//! and advisor verdicts are handed in by the caller.

pub mod consumption;
pub mod impact;
pub mod potential;
pub mod recommendation;
pub mod simulator;

pub use consumption::estimate_consumption;
pub use recommendation::{compute_advised_recommendation, compute_recommendation, optimal_mix};
pub use simulator::{simulate_installation, SimulationError};
