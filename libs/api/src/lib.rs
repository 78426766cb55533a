//! # kombiner-api
//!
//! API type definitions for the kombiner placement request controller.
//!
//! A PlacementRequest is a declarative record created by a scheduler asking
//! that one or more pods be bound to nominated nodes. The controller admits
//! requests into per-scheduler queues, draws from the queues under a fairness
//! policy, performs the bindings, and records the outcome on the request
//! status.
//!
//! This crate carries:
//! - The `PlacementRequest` custom resource and its spec/status types
//! - The controller configuration schema (queues, weights, fairness, plugins)
//! - Status helpers shared by the controller and its tests
//! - The contract constants observed by the binder-side scheduler plugin

mod config;
mod contract;
mod error;
pub mod helpers;
mod types;

pub use config::*;
pub use contract::*;
pub use error::ValidationError;
pub use types::*;
