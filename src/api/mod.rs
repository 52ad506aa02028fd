// ABOUTME: Integration adapter for the marketing-platform REST API.
// ABOUTME: Stateless request/response translation, invoked only by executors.

mod client;
mod types;

pub use client::*;
pub use types::*;
