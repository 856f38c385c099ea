//! Shared types, errors, and configuration for Caterbook.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - The caller-facing error taxonomy
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LifecycleConfig, LoggingConfig, LostReasonConfig, StoreConfig};
pub use error::{AppError, AppResult};
