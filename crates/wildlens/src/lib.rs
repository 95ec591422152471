//! Headless Wildlens simulation
//!
//! Spawns a mixed population in the reference world, walks a photographer
//! through it and rates the photos it takes.

pub mod config;
pub mod report;
pub mod simulation;

pub use config::SimConfig;
pub use report::RunReport;
pub use simulation::Simulation;
