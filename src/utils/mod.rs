//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Short code generation and custom code validation
//! - [`url_validation`] - Destination URL checks

pub mod code_generator;
pub mod url_validation;
