//! Recipe Box Core - Shared types library.
//!
//! This crate provides the types shared by every Recipe Box component:
//! - `server` - HTTP API over the recipe store
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure algorithms - no I/O,
//! no database access, no HTTP. The reconciliation planner lives here so it
//! can be tested without a store; the server applies its plans inside a
//! transaction.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and the child records carried in recipe payloads
//! - [`reconcile`] - Natural-key diffing of a recipe's child collections

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod reconcile;
pub mod types;

pub use reconcile::{NaturalKey, ReconcilePlan, plan_reconciliation};
pub use types::*;
