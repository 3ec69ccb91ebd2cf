#![doc = include_str!("../README.md")]

mod client;
mod pool;

pub use client::*;
pub use pool::*;
// Public re-export so downstream crates can access the wire contract
// via `relay_tonic_client::relay_tonic_core`
pub use relay_tonic_core;
