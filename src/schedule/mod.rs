// ABOUTME: Schedule module - descriptors, the durable store, and the
// ABOUTME: dispatcher that fires one-shot, delayed, and cron schedules.

mod descriptor;
mod dispatcher;
mod store;

pub use descriptor::*;
pub use dispatcher::*;
pub use store::*;

#[cfg(test)]
mod store_test;
