//! Foundation types and math shared by every layer.

pub mod aabb;
pub mod agent;
pub mod math;

pub use aabb::Aabb;
pub use agent::{AgentState, ControlInput, FlightTelemetry};
