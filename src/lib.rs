//! Plan Compass - Conversational Project Planning Service
//!
//! This crate implements a five-stage guided planning conversation that
//! incrementally elicits a structured project plan from a user and compiles
//! it into a typed, renderable document.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
