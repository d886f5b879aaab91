//! `embedded-hal` I2C adapter
//!
//! Wraps any `embedded_hal::i2c::I2c` peripheral so it can serve as the
//! Nunchuck transport. Writes are staged until `end_transfer`, reads land
//! in a receive buffer that the driver drains byte by byte.

use std::collections::VecDeque;

use embedded_hal::i2c::{Error as _, I2c};
use log::trace;

use super::{BusError, BusTransport};

struct PendingTransfer {
    address: u8,
    bytes: Vec<u8>,
}

pub struct I2cBus<I2C> {
    i2c: I2C,
    joined: bool,
    tx: Option<PendingTransfer>,
    rx: VecDeque<u8>,
}

impl<I2C> I2cBus<I2C> {
    pub fn i2c(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Give back the wrapped peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> I2cBus<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            joined: false,
            tx: None,
            rx: VecDeque::new(),
        }
    }

    fn ensure_joined(&self) -> Result<(), BusError> {
        if self.joined {
            Ok(())
        } else {
            Err(BusError::NotJoined)
        }
    }
}

impl<I2C: I2c> BusTransport for I2cBus<I2C> {
    fn join(&mut self) -> Result<(), BusError> {
        self.joined = true;
        Ok(())
    }

    fn begin_transfer(&mut self, address: u8) -> Result<(), BusError> {
        self.ensure_joined()?;
        if self.tx.is_some() {
            return Err(BusError::TransferInProgress);
        }
        self.tx = Some(PendingTransfer { address, bytes: Vec::new() });
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), BusError> {
        match self.tx.as_mut() {
            Some(transfer) => {
                transfer.bytes.push(byte);
                Ok(())
            }
            None => Err(BusError::NoTransfer),
        }
    }

    fn end_transfer(&mut self) -> Result<(), BusError> {
        let transfer = self.tx.take().ok_or(BusError::NoTransfer)?;
        trace!("i2c write 0x{:02X}: {:02X?}", transfer.address, transfer.bytes);
        self.i2c
            .write(transfer.address, &transfer.bytes)
            .map_err(|e| BusError::I2c(e.kind()))
    }

    fn request_bytes(&mut self, address: u8, count: usize) -> Result<usize, BusError> {
        self.ensure_joined()?;
        self.rx.clear();

        let mut buf = vec![0u8; count];
        self.i2c
            .read(address, &mut buf)
            .map_err(|e| BusError::I2c(e.kind()))?;
        trace!("i2c read 0x{:02X}: {:02X?}", address, buf);

        self.rx.extend(buf);
        Ok(count)
    }

    fn bytes_available(&self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}
