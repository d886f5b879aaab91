//! Mock bus for testing.
//!
//! This transport logs bus operations instead of touching hardware and
//! plays the part of the Nunchuck: response chunks are scripted up front
//! and handed out one per `request_bytes`. Clones share the same state,
//! so a test can keep a handle after moving the bus into a driver.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info};

use super::{BusError, BusTransport};
use crate::nunchuck::protocol::RawSample;

#[derive(Debug, Default)]
struct MockBusState {
    joined: bool,
    current: Option<(u8, Vec<u8>)>,
    writes: Vec<(u8, Vec<u8>)>,
    requests: Vec<(u8, usize)>,
    responses: VecDeque<Vec<u8>>,
    rx: VecDeque<u8>,
    fail_writes: bool,
    fail_reads: bool,
}

/// Mock bus that logs and records traffic.
#[derive(Clone, Debug, Default)]
pub struct MockBus {
    state: Arc<Mutex<MockBusState>>,
}

impl MockBus {
    /// Create a new mock bus.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockBusState> {
        // A poisoned lock only means another test thread panicked
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue raw wire bytes to be returned by the next unanswered request.
    pub fn queue_response(&self, bytes: &[u8]) {
        self.lock().responses.push_back(bytes.to_vec());
    }

    /// Queue a decoded sample; it is encoded the way the device does it.
    pub fn queue_sample(&self, sample: RawSample) {
        self.queue_response(&sample.to_wire());
    }

    /// Make every following end_transfer fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.lock().fail_writes = fail;
    }

    /// Make every following request_bytes fail.
    pub fn set_fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    pub fn is_joined(&self) -> bool {
        self.lock().joined
    }

    /// All completed write transfers as (address, bytes)
    pub fn writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.lock().writes.clone()
    }

    /// All read requests as (address, count)
    pub fn requests(&self) -> Vec<(u8, usize)> {
        self.lock().requests.clone()
    }

    /// Scripted responses not yet handed out
    pub fn pending_responses(&self) -> usize {
        self.lock().responses.len()
    }

    pub fn clear_log(&self) {
        let mut state = self.lock();
        state.writes.clear();
        state.requests.clear();
    }
}

impl BusTransport for MockBus {
    fn join(&mut self) -> Result<(), BusError> {
        info!("[MOCK BUS] Join as controller");
        self.lock().joined = true;
        Ok(())
    }

    fn begin_transfer(&mut self, address: u8) -> Result<(), BusError> {
        let mut state = self.lock();
        if !state.joined {
            return Err(BusError::NotJoined);
        }
        if state.current.is_some() {
            return Err(BusError::TransferInProgress);
        }
        state.current = Some((address, Vec::new()));
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), BusError> {
        match self.lock().current.as_mut() {
            Some((_, bytes)) => {
                bytes.push(byte);
                Ok(())
            }
            None => Err(BusError::NoTransfer),
        }
    }

    fn end_transfer(&mut self) -> Result<(), BusError> {
        let mut state = self.lock();
        let (address, bytes) = state.current.take().ok_or(BusError::NoTransfer)?;
        if state.fail_writes {
            return Err(BusError::Operation(format!("write to 0x{:02X} failed", address)));
        }
        info!("[MOCK BUS] Write 0x{:02X}: {:02X?}", address, bytes);
        state.writes.push((address, bytes));
        Ok(())
    }

    fn request_bytes(&mut self, address: u8, count: usize) -> Result<usize, BusError> {
        let mut state = self.lock();
        if !state.joined {
            return Err(BusError::NotJoined);
        }
        if state.fail_reads {
            return Err(BusError::Operation(format!("read from 0x{:02X} failed", address)));
        }
        state.requests.push((address, count));

        let chunk = state.responses.pop_front().unwrap_or_default();
        debug!("[MOCK BUS] Request {} bytes from 0x{:02X}, got {}", count, address, chunk.len());
        state.rx = chunk.into();
        Ok(state.rx.len())
    }

    fn bytes_available(&self) -> usize {
        self.lock().rx.len()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.lock().rx.pop_front()
    }
}
