pub mod policy;

pub use policy::{PolicyModel, PolicySimulator, SimulationParams, SimulationResult};
