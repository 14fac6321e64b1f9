//! Shared test utilities for the linksync workspace.
//!
//! This crate provides standardised fixtures for engine tests. It is a
//! dev-dependency only; it is never published.
//!
//! # Modules
//!
//! - [`module`]: [`MemoryModule`], an in-memory synchronizable with call counters
//! - [`fixtures`]: [`PairConfig`] builders and linked subjects

pub mod fixtures;
pub mod module;

pub use fixtures::{PairConfig, linked_pair, temp_audit_dir};
pub use module::MemoryModule;
