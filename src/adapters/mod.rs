//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (here, the local file system).
//!
//! Adapter categories:
//! - `persistence`: File-backed and in-memory key/value stores

pub mod persistence;
