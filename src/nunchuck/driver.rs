//! Nunchuck driver
//!
//! This module handles communication with one Nunchuck and the state
//! derived from its samples: joystick, accelerometer and buttons.
//!
//! Sampling is a request/response pipeline with one cycle of latency:
//! every committed sample is followed by a request for the next one, so
//! each `poll` surfaces the sample asked for on the previous call.

use log::{debug, info};
use thiserror::Error;

use crate::bus::{BusError, BusTransport};
use crate::nunchuck::constants::*;
use crate::nunchuck::protocol::{RawSample, SampleBuffer};
use crate::nunchuck::types::{Axis, Calibration, JoyPosLR, JoyPosUD, Reading};

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("Bus error: {0}")]
    Bus(#[from] BusError),

    #[error("Driver not initialized")]
    NotInitialized,

    #[error("Driver already initialized")]
    AlreadyInitialized,

    /// The sample was committed but asking for the next one failed
    #[error("Sample committed, but requesting the next one failed: {0}")]
    RequestAfterCommit(#[source] BusError),
}

/// Driver lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Uninitialized,
    Active,
}

/// Decoded device state
#[derive(Debug, Clone)]
pub struct DeviceState {
    joy_x: u8,
    joy_y: u8,
    button_z: bool,
    button_c: bool,
    last_button_z: bool,
    last_button_c: bool,

    /// 10-bit accelerometer readings (X, Y, Z)
    angles: [u16; 3],

    zero_joy_x: u8,
    zero_joy_y: u8,

    /// Calibrated joystick readings of the previous commit
    last_joy_x: i32,
    last_joy_y: i32,

    calibration: Calibration,
}

impl DeviceState {
    pub fn new(calibration: Calibration) -> Self {
        Self {
            joy_x: 0,
            joy_y: 0,
            button_z: false,
            button_c: false,
            last_button_z: false,
            last_button_c: false,
            angles: [0; 3],
            zero_joy_x: calibration.joy_zero_x,
            zero_joy_y: calibration.joy_zero_y,
            last_joy_x: 0,
            last_joy_y: 0,
            calibration,
        }
    }

    /// Commit a full sample. All fields change together.
    fn apply(&mut self, sample: &RawSample) {
        self.last_button_z = self.button_z;
        self.last_button_c = self.button_c;
        self.last_joy_x = self.read_joy_x();
        self.last_joy_y = self.read_joy_y();

        self.joy_x = sample.joy_x();
        self.joy_y = sample.joy_y();
        self.angles = sample.accels();
        self.button_z = sample.button_z();
        self.button_c = sample.button_c();
    }

    /// Zero the accelerometer readings and restore the default stick centre
    fn reset_baseline(&mut self) {
        self.angles = [0; 3];
        self.zero_joy_x = self.calibration.joy_zero_x;
        self.zero_joy_y = self.calibration.joy_zero_y;
    }

    /// Use the current stick position as its centre.
    /// Only meaningful while the stick is at rest.
    pub fn calibrate_joy(&mut self) {
        self.zero_joy_x = self.joy_x;
        self.zero_joy_y = self.joy_y;
        debug!("Joystick centre set to ({}, {})", self.zero_joy_x, self.zero_joy_y);
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn joy_zero(&self) -> (u8, u8) {
        (self.zero_joy_x, self.zero_joy_y)
    }

    /// Raw joystick bytes
    pub fn joy_raw(&self) -> (u8, u8) {
        (self.joy_x, self.joy_y)
    }

    /// Raw 10-bit accelerometer readings
    pub fn angles(&self) -> [u16; 3] {
        self.angles
    }

    // ------------------------------------------------------------------------
    // Accelerometer
    // ------------------------------------------------------------------------

    pub fn accel(&self, axis: Axis) -> f32 {
        (self.angles[axis.index()] as i32 - self.calibration.accel_zero(axis)) as f32
    }

    pub fn read_accel_x(&self) -> f32 {
        self.accel(Axis::X)
    }

    pub fn read_accel_y(&self) -> f32 {
        self.accel(Axis::Y)
    }

    pub fn read_accel_z(&self) -> f32 {
        self.accel(Axis::Z)
    }

    /// Roll in degrees (-180 to 180), from the X and Z axes.
    ///
    /// Fractional; see [`Self::read_roll_whole`] for whole degrees.
    pub fn read_roll(&self) -> f32 {
        self.read_accel_x().atan2(self.read_accel_z()).to_degrees()
    }

    /// Roll truncated toward zero to whole degrees
    pub fn read_roll_whole(&self) -> i32 {
        self.read_roll() as i32
    }

    /// Pitch in degrees (0 to 180).
    ///
    /// NaN when |accel_y| exceeds the radius, unless the calibration
    /// asks for clamping. Fractional; see [`Self::read_pitch_whole`] for
    /// whole degrees.
    pub fn read_pitch(&self) -> f32 {
        let mut ratio = self.read_accel_y() / self.calibration.radius;
        if self.calibration.clamp_pitch {
            ratio = ratio.clamp(-1.0, 1.0);
        }
        ratio.acos().to_degrees()
    }

    /// Pitch truncated toward zero to whole degrees. NaN maps to 0.
    pub fn read_pitch_whole(&self) -> i32 {
        self.read_pitch() as i32
    }

    // ------------------------------------------------------------------------
    // Buttons
    // ------------------------------------------------------------------------

    pub fn is_z_button_pressed(&self) -> bool {
        self.button_z
    }

    pub fn is_c_button_pressed(&self) -> bool {
        self.button_c
    }

    /// True only on the poll where Z went down
    pub fn z_pressed(&self) -> bool {
        self.button_z && !self.last_button_z
    }

    /// True only on the poll where C went down
    pub fn c_pressed(&self) -> bool {
        self.button_c && !self.last_button_c
    }

    pub fn z_released(&self) -> bool {
        !self.button_z && self.last_button_z
    }

    pub fn c_released(&self) -> bool {
        !self.button_c && self.last_button_c
    }

    // ------------------------------------------------------------------------
    // Joystick
    // ------------------------------------------------------------------------

    pub fn read_joy_x(&self) -> i32 {
        self.joy_x as i32 - self.zero_joy_x as i32
    }

    pub fn read_joy_y(&self) -> i32 {
        self.joy_y as i32 - self.zero_joy_y as i32
    }

    pub fn last_joy_x(&self) -> i32 {
        self.last_joy_x
    }

    pub fn last_joy_y(&self) -> i32 {
        self.last_joy_y
    }

    pub fn joy_delta_x(&self) -> i32 {
        self.read_joy_x() - self.last_joy_x
    }

    pub fn joy_delta_y(&self) -> i32 {
        self.read_joy_y() - self.last_joy_y
    }

    pub fn is_joy_stick_right(&self, threshold: i32) -> bool {
        self.read_joy_x() > threshold
    }

    pub fn is_joy_stick_left(&self, threshold: i32) -> bool {
        self.read_joy_x() < -threshold
    }

    pub fn is_joy_stick_up(&self, threshold: i32) -> bool {
        self.read_joy_y() > threshold
    }

    pub fn is_joy_stick_down(&self, threshold: i32) -> bool {
        self.read_joy_y() < -threshold
    }

    /// Stick deflected past the threshold in any direction
    pub fn is_joy_pressed(&self, threshold: i32) -> bool {
        self.is_joy_stick_up(threshold)
            || self.is_joy_stick_down(threshold)
            || self.is_joy_stick_left(threshold)
            || self.is_joy_stick_right(threshold)
    }

    pub fn joy_pos_lr(&self, threshold: i32) -> JoyPosLR {
        if self.is_joy_stick_left(threshold) {
            JoyPosLR::Left
        } else if self.is_joy_stick_right(threshold) {
            JoyPosLR::Right
        } else {
            JoyPosLR::Neutral
        }
    }

    pub fn joy_pos_ud(&self, threshold: i32) -> JoyPosUD {
        if self.is_joy_stick_up(threshold) {
            JoyPosUD::Up
        } else if self.is_joy_stick_down(threshold) {
            JoyPosUD::Down
        } else {
            JoyPosUD::Neutral
        }
    }

    /// Snapshot of the derived values
    pub fn reading(&self) -> Reading {
        Reading {
            joy_x: self.read_joy_x(),
            joy_y: self.read_joy_y(),
            accel: Axis::ALL.map(|axis| self.accel(axis)),
            roll: self.read_roll(),
            pitch: self.read_pitch(),
            button_z: self.button_z,
            button_c: self.button_c,
        }
    }
}

/// Driver for one Nunchuck on a bus
pub struct NunchuckDriver<B> {
    bus: B,
    address: u8,
    calibration: Calibration,
    buffer: SampleBuffer,
    state: Option<DeviceState>,
}

impl<B: BusTransport> NunchuckDriver<B> {
    /// Create a driver for the default address and calibration
    pub fn new(bus: B) -> Self {
        Self::with_calibration(bus, NUNCHUCK_ADDRESS, Calibration::default())
    }

    pub fn with_calibration(bus: B, address: u8, calibration: Calibration) -> Self {
        Self {
            bus,
            address,
            calibration,
            buffer: SampleBuffer::new(),
            state: None,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn driver_state(&self) -> DriverState {
        if self.state.is_some() {
            DriverState::Active
        } else {
            DriverState::Uninitialized
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Join the bus, disable output obfuscation and prime the state.
    pub fn initialize(&mut self) -> Result<(), DriverError> {
        if self.state.is_some() {
            return Err(DriverError::AlreadyInitialized);
        }

        info!("Initializing Nunchuck at 0x{:02X}...", self.address);
        self.bus.join()?;
        self.bus.write_bytes(self.address, &HANDSHAKE)?;

        self.buffer.clear();
        self.state = Some(DeviceState::new(self.calibration));
        if let Err(e) = self.poll() {
            self.state = None;
            return Err(e);
        }

        if let Some(state) = self.state.as_mut() {
            state.reset_baseline();
        }

        info!("✓ Nunchuck ready");
        Ok(())
    }

    /// Run one sampling cycle. Returns `true` if a new sample was committed.
    ///
    /// If the sample is committed but the follow-up request fails, the
    /// error is `DriverError::RequestAfterCommit` and the state already
    /// holds the new sample.
    pub fn poll(&mut self) -> Result<bool, DriverError> {
        let sample = match self.try_consume()? {
            Some(sample) => sample,
            None => return Ok(false),
        };

        self.commit(&sample)?;

        match self.request_next() {
            Ok(()) => Ok(true),
            Err(DriverError::Bus(e)) => Err(DriverError::RequestAfterCommit(e)),
            Err(e) => Err(e),
        }
    }

    /// Apply a sample returned by [`Self::try_consume`] to the state.
    /// Joystick, accelerometer and buttons change together.
    pub fn commit(&mut self, sample: &RawSample) -> Result<(), DriverError> {
        let state = self.state.as_mut().ok_or(DriverError::NotInitialized)?;
        state.apply(sample);
        debug!(
            "Sample committed: joy=({}, {}) accel={:?} z={} c={}",
            state.joy_x, state.joy_y, state.angles, state.button_z, state.button_c
        );
        Ok(())
    }

    /// Ask the device to prepare the next sample
    pub fn request_next(&mut self) -> Result<(), DriverError> {
        self.ensure_active()?;
        self.bus.write_bytes(self.address, &SAMPLE_REQUEST)?;
        Ok(())
    }

    /// Request a block and drain whatever the bus has buffered.
    ///
    /// Returns the sample once six bytes have accumulated, possibly over
    /// several calls. Bytes past the sixth in one burst are discarded.
    pub fn try_consume(&mut self) -> Result<Option<RawSample>, DriverError> {
        self.ensure_active()?;
        self.bus.request_bytes(self.address, SAMPLE_LEN)?;

        let mut dropped = 0usize;
        while self.bus.bytes_available() > 0 {
            let Some(raw) = self.bus.read_byte() else {
                break;
            };
            if !self.buffer.push(raw) {
                dropped += 1;
            }
        }
        if dropped > 0 {
            debug!("Discarded {} bytes past a full sample", dropped);
        }

        Ok(self.buffer.take())
    }

    /// Use the current stick position as its centre
    pub fn calibrate_joy(&mut self) -> Result<(), DriverError> {
        self.state
            .as_mut()
            .ok_or(DriverError::NotInitialized)?
            .calibrate_joy();
        Ok(())
    }

    /// Current decoded state
    pub fn state(&self) -> Result<&DeviceState, DriverError> {
        self.state.as_ref().ok_or(DriverError::NotInitialized)
    }

    pub fn bus(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Give back the bus
    pub fn release(self) -> B {
        self.bus
    }

    fn ensure_active(&self) -> Result<(), DriverError> {
        if self.state.is_some() {
            Ok(())
        } else {
            Err(DriverError::NotInitialized)
        }
    }
}
