//! # API Shared
//!
//! Shared definitions for the sharebox HTTP API.
//!
//! Contains:
//! - JSON request/response bodies (`wire` module), with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Field names are camelCase on the wire to match what browser clients already send and expect.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
