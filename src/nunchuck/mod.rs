//! Wii Nunchuck support
//!
//! This module provides the complete Nunchuck integration:
//! - Wire protocol constants and sample decoding
//! - Calibration and stick/button/orientation types
//! - The polling driver

pub mod constants;
pub mod types;
pub mod protocol;
pub mod driver;

// Re-export commonly used items
pub use constants::*;
pub use types::*;
pub use protocol::*;
pub use driver::*;
