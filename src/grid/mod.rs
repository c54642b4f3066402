//! Grid module orchestrator.
//!
//! The occupancy model lives in the private `core` module; downstream code
//! imports it from here.

mod core;

pub use core::{GridError, GridModel};
