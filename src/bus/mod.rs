//! Bus abstraction for the two-wire transport
//!
//! This module provides a unified byte-level interface to the bus the
//! Nunchuck hangs off. The driver only talks to this trait.

pub mod i2c;
pub mod mock_bus;

pub use i2c::I2cBus;
pub use mock_bus::MockBus;

use embedded_hal::i2c::ErrorKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BusError {
    #[error("Bus not joined")]
    NotJoined,

    #[error("A transfer is already in progress")]
    TransferInProgress,

    #[error("No transfer in progress")]
    NoTransfer,

    #[error("I2C transfer failed: {0:?}")]
    I2c(ErrorKind),

    #[error("Bus operation failed: {0}")]
    Operation(String),
}

/// Unified transport interface, modelled on a controller-side two-wire API
pub trait BusTransport {
    /// Join the bus as controller
    fn join(&mut self) -> Result<(), BusError>;

    /// Start a write transfer to a 7-bit address
    fn begin_transfer(&mut self, address: u8) -> Result<(), BusError>;

    /// Queue one byte into the current transfer
    fn write_byte(&mut self, byte: u8) -> Result<(), BusError>;

    /// Send the queued bytes and close the transfer
    fn end_transfer(&mut self) -> Result<(), BusError>;

    /// Request up to `count` bytes from `address`. Returns how many arrived.
    fn request_bytes(&mut self, address: u8, count: usize) -> Result<usize, BusError>;

    /// Bytes waiting in the receive buffer
    fn bytes_available(&self) -> usize;

    /// Pop one byte from the receive buffer
    fn read_byte(&mut self) -> Option<u8>;

    /// Write a complete message in one transfer
    fn write_bytes(&mut self, address: u8, bytes: &[u8]) -> Result<(), BusError> {
        self.begin_transfer(address)?;
        for &b in bytes {
            self.write_byte(b)?;
        }
        self.end_transfer()
    }
}
