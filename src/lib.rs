//! nunchuck-rs: Wii Nunchuck driver
//!
//! This library polls a Nunchuck over a two-wire bus, decodes its samples
//! and exposes calibrated joystick, accelerometer, orientation and button
//! readings.

pub mod bus;
pub mod config;
pub mod nunchuck;

// Re-export commonly used items
pub use bus::{BusError, BusTransport, I2cBus, MockBus};
pub use config::Config;
pub use nunchuck::{
    Axis, Calibration, DeviceState, DriverError, DriverState, JoyPosLR, JoyPosUD,
    NunchuckDriver, RawSample, Reading, DEFAULT_JOY_THRESHOLD,
};
