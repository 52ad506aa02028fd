// ABOUTME: Tool module - definitions, registry, argument validation,
// ABOUTME: and execution results.

mod definition;
mod registry;
mod result;
pub mod schema;

pub use definition::*;
pub use registry::*;
pub use result::*;

#[cfg(test)]
mod schema_test;
