//! Task board reconciliation for ProjectFlow.
//!
//! The board keeps a read-through cache of a project's tasks and reconciles
//! it against two external signal sources: AI status recommendations and a
//! source-control commit feed. The module follows hexagonal architecture:
//!
//! - Domain values in [`domain`]
//! - Port contracts for the remote collaborator in [`ports`]
//! - In-memory and HTTP implementations in [`adapters`]
//! - Coordination services and the [`services::Board`] facade in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
