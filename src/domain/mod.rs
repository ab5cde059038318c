pub mod advice;
pub mod climate;
pub mod parameters;
pub mod potential;
pub mod profile;
pub mod recommendation;
pub mod simulation;
pub mod technology;

pub use advice::*;
pub use climate::*;
pub use parameters::*;
pub use potential::*;
pub use profile::*;
pub use recommendation::*;
pub use simulation::*;
pub use technology::*;
