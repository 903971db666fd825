//! Unit tests for configuration loading and resolution.
//!
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `credentials`: Password, password file, and token resolution
//! - `overlay`: Remote wiki overlay parsing and merge rules
//! - `paths`: Home expansion and required-key accessors

mod helpers;
