//! Nunchuck protocol constants
//!
//! This module contains all the constants needed for Nunchuck communication:
//! - Bus address and wire commands
//! - Sample layout and decode key
//! - Default calibration values

// ============================================================================
// Bus Constants
// ============================================================================

/// Fixed 7-bit bus address of the Nunchuck
pub const NUNCHUCK_ADDRESS: u8 = 0x52;

/// Handshake written once at startup: register 0x40 = 0x00.
/// Turns off the output obfuscation of the device.
pub const HANDSHAKE: [u8; 2] = [0x40, 0x00];

/// Written after each consumed sample so the next one is ready
pub const SAMPLE_REQUEST: [u8; 1] = [0x00];

// ============================================================================
// Sample Layout
// ============================================================================

/// Size of one sample block in bytes
pub const SAMPLE_LEN: usize = 6;

/// Key used by the decode transform
pub const DECODE_KEY: u8 = 0x17;

/// Index of the status byte (accel low bits + buttons)
pub const STATUS_INDEX: usize = 5;

/// Z button bit in the status byte (active-low)
pub const BUTTON_Z_MASK: u8 = 0b0000_0001;

/// C button bit in the status byte (active-low)
pub const BUTTON_C_MASK: u8 = 0b0000_0010;

// ============================================================================
// Calibration Defaults
// ============================================================================
// These may need adjusting for each physical unit.

/// Accelerometer X reading at rest
pub const ZERO_ACCEL_X: i32 = 510;

/// Accelerometer Y reading at rest
pub const ZERO_ACCEL_Y: i32 = 490;

/// Accelerometer Z reading at rest
pub const ZERO_ACCEL_Z: i32 = 460;

/// Magnitude of 1G in accelerometer units
pub const RADIUS: f32 = 210.0;

/// Joystick X centre before any calibration
pub const DEFAULT_ZERO_JOY_X: u8 = 124;

/// Joystick Y centre before any calibration
pub const DEFAULT_ZERO_JOY_Y: u8 = 132;

/// Deflection needed before the stick counts as a direction
pub const DEFAULT_JOY_THRESHOLD: i32 = 60;
