//! Command model.
//!
//! - `ParameterDefinition` / `Args` - declared arguments and validated values
//! - `CommandDefinition` - a named command, its parent scope and its handler
//! - `CommandRegistry` - every known command plus the parent/child scope table
//! - `Context` - per-evaluation store, canvas handle and visible commands
//! - `CommandPack` / `RegistryBuilder` - declarative registry composition

mod context;
mod definition;
mod pack;
pub mod param;
mod registry;

pub use context::{CanvasHandle, Context};
pub use definition::{
    CanvasFn, CommandDefinition, DeferredFn, Handler, Invocation, ResolvedFn,
};
pub use pack::{CommandPack, RegistryBuilder};
pub use param::{Args, ParamType, ParameterDefinition, Value};
pub use registry::CommandRegistry;
