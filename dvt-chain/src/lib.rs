//! Core DeVault data structures.
//!
//! This crate provides definitions of the chain data types the cold rewards
//! consensus rule operates on, along with the per-network cold reward
//! parameters and the reward formula.

#![doc(html_root_url = "https://docs.rs/dvt_chain")]
// Standard lints
#![warn(missing_docs)]
#![allow(clippy::try_err)]
#![deny(clippy::await_holding_lock)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate serde;

mod sha256d_writer;

pub mod amount;
pub mod block;
pub mod parameters;
pub mod serialization;
pub mod shutdown;
pub mod transaction;
pub mod transparent;

#[cfg(any(test, feature = "proptest-impl"))]
pub mod arbitrary;

pub use shutdown::ShutdownSignal;
