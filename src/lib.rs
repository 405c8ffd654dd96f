//! Projectflow: task board reconciliation against an AI recommendation
//! service.
//!
//! A board caches one project's tasks and reconciles their status with AI
//! recommendations and source-control commits.
//!
//! # Architecture
//!
//! Projectflow follows hexagonal architecture principles:
//!
//! - **Domain**: Task lifecycle, recommendations, and commits
//! - **Ports**: Abstract trait interfaces for the remote task and AI services
//! - **Adapters**: An HTTP client and an in-memory remote for tests
//! - **Services**: The board facade and the workflows it coordinates
//!
//! # Modules
//!
//! - [`board`]: Board domain, ports, adapters, and services
//! - [`config`]: File and environment configuration
//! - [`telemetry`]: Tracing subscriber setup

pub mod board;
pub mod config;
pub mod telemetry;
