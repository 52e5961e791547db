pub mod executor;
pub mod planner;
pub mod registry;

pub use executor::{ToolError, ToolExecutor};
pub use planner::{plan_for, PlanError};
pub use registry::ToolRegistry;
