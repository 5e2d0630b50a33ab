//! Tool registry and execution for courtside
//!
//! Tools are the typed data-fetchers a language model (or an agent's
//! deterministic shortcut) calls to reach the booking site. This crate holds
//! the registry, argument validation, the invocation protocol, and the
//! built-in tools over the external collaborators in [`sources`].

pub mod builtin;
pub mod invocation;
pub mod registry;
pub mod router;
pub mod schema;
pub mod sources;
pub mod tool;

pub use invocation::{invoke_tool_calls, InvocationConfig, ToolInvocation, ToolOutcome};
pub use registry::{RegistryStats, ToolDefinition, ToolRegistry};
pub use schema::{ParamKind, ParamSpec, ParamValue, ParameterSchema, Parameters};
pub use sources::{
    AvailabilitySource, BookingGateway, BoxLeagueSource, DryRunBookingGateway, Fixture,
    HttpBookingSite, StaticAvailabilitySource, StaticBoxLeague,
};
pub use tool::{BoxedTool, SimpleTool, Tool};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::registry::ToolRegistry;
    pub use crate::schema::{ParamKind, ParameterSchema, Parameters};
    pub use crate::tool::{BoxedTool, Tool};
}
