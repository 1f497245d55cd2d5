//! Configuration module for spendscan
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence (auto-save policy, OCR command)

pub mod paths;
pub mod settings;

pub use paths::SpendscanPaths;
pub use settings::Settings;
