//! Rust bindings for the `relay.RunnerProtocol` wire contract.
//!
//! `relay.rs` is generated from `proto/relay.proto` with
//! `tonic-prost-build` and committed so that building the workspace
//! does not require `protoc`. Regenerate and commit when the proto
//! changes; hand edits will be lost.

#[allow(clippy::all)]
mod relay;

pub use relay::*;
