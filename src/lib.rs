//! AC policy simulator
//!
//! HTTP service estimating the cost, carbon and comfort impact of an
//! air-conditioning policy, using the live outdoor temperature as context.

pub mod api;
pub mod config;
pub mod forecast;
pub mod simulation;
pub mod state;
pub mod telemetry;
