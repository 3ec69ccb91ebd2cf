#![doc = include_str!("../README.md")]

mod common;
pub mod proto;

pub use common::*;
