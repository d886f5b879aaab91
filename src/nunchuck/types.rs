//! Nunchuck type definitions
//!
//! This module defines the basic data types used throughout the nunchuck
//! module, including axes, stick positions, calibration and reading snapshots.

use serde::{Deserialize, Serialize};

use crate::nunchuck::constants::*;

/// Accelerometer axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Position of the axis in the angle array
    pub fn index(self) -> usize {
        self as usize
    }

    /// Shift of this axis' 2-bit low field inside the status byte
    pub fn low_bits_shift(self) -> u8 {
        (self.index() as u8 + 1) * 2
    }
}

/// Horizontal stick position.
///
/// Shares its sign values with [`JoyPosUD`]: left and up are both `+1`,
/// right and down are both `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoyPosLR {
    Left = 1,
    Neutral = 0,
    Right = -1,
}

impl JoyPosLR {
    /// Signed value (+1 left, 0 neutral, -1 right)
    pub fn value(self) -> i8 {
        self as i8
    }
}

/// Vertical stick position (+1 up, 0 neutral, -1 down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoyPosUD {
    Up = 1,
    Neutral = 0,
    Down = -1,
}

impl JoyPosUD {
    pub fn value(self) -> i8 {
        self as i8
    }
}

/// Per-device calibration values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Accelerometer X reading at rest
    #[serde(default = "default_accel_zero_x")]
    pub accel_zero_x: i32,

    /// Accelerometer Y reading at rest
    #[serde(default = "default_accel_zero_y")]
    pub accel_zero_y: i32,

    /// Accelerometer Z reading at rest
    #[serde(default = "default_accel_zero_z")]
    pub accel_zero_z: i32,

    /// Magnitude of 1G, used to derive pitch
    #[serde(default = "default_radius")]
    pub radius: f32,

    /// Joystick X centre applied at initialization
    #[serde(default = "default_joy_zero_x")]
    pub joy_zero_x: u8,

    /// Joystick Y centre applied at initialization
    #[serde(default = "default_joy_zero_y")]
    pub joy_zero_y: u8,

    /// Default directional threshold
    #[serde(default = "default_joy_threshold")]
    pub joy_threshold: i32,

    /// Clamp the pitch ratio into [-1, 1] instead of yielding NaN
    #[serde(default)]
    pub clamp_pitch: bool,
}

impl Calibration {
    /// Rest reading of the given axis
    pub fn accel_zero(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.accel_zero_x,
            Axis::Y => self.accel_zero_y,
            Axis::Z => self.accel_zero_z,
        }
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            accel_zero_x: ZERO_ACCEL_X,
            accel_zero_y: ZERO_ACCEL_Y,
            accel_zero_z: ZERO_ACCEL_Z,
            radius: RADIUS,
            joy_zero_x: DEFAULT_ZERO_JOY_X,
            joy_zero_y: DEFAULT_ZERO_JOY_Y,
            joy_threshold: DEFAULT_JOY_THRESHOLD,
            clamp_pitch: false,
        }
    }
}

fn default_accel_zero_x() -> i32 { ZERO_ACCEL_X }
fn default_accel_zero_y() -> i32 { ZERO_ACCEL_Y }
fn default_accel_zero_z() -> i32 { ZERO_ACCEL_Z }
fn default_radius() -> f32 { RADIUS }
fn default_joy_zero_x() -> u8 { DEFAULT_ZERO_JOY_X }
fn default_joy_zero_y() -> u8 { DEFAULT_ZERO_JOY_Y }
fn default_joy_threshold() -> i32 { DEFAULT_JOY_THRESHOLD }

/// Snapshot of all derived values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Calibrated joystick X
    pub joy_x: i32,

    /// Calibrated joystick Y
    pub joy_y: i32,

    /// Acceleration relative to rest (X, Y, Z)
    pub accel: [f32; 3],

    /// Roll in degrees (-180 to 180)
    pub roll: f32,

    /// Pitch in degrees (0 to 180, NaN when out of range and unclamped)
    pub pitch: f32,

    pub button_z: bool,
    pub button_c: bool,
}
