//! Nunchuck Monitor - Main Application
//!
//! Drives the Nunchuck driver against a simulated device on the mock bus
//! and prints every decoded reading. Useful to check calibration settings
//! without hardware.
//!
//! Usage: nunchuck-rs [config.toml]

use anyhow::Result;
use log::{info, warn};
use nunchuck_rs::config::Config;
use nunchuck_rs::nunchuck::{RawSample, SAMPLE_LEN};
use nunchuck_rs::{MockBus, NunchuckDriver};
use std::thread;
use std::time::Duration;

/// Number of sampling cycles to run
const CYCLES: usize = 40;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => Config::load_default().unwrap_or_else(|e| {
            warn!("Using built-in defaults: {}", e);
            Config::default()
        }),
    };

    println!("=== Nunchuck Monitor (simulated device) ===");
    println!();

    let bus = MockBus::new();
    let device = bus.clone();

    // Priming sample consumed by initialize
    device.queue_sample(simulated_sample(0, &config));

    let mut driver = NunchuckDriver::with_calibration(bus, config.device.address, config.calibration);
    driver.initialize()?;

    let threshold = config.calibration.joy_threshold;
    for tick in 1..=CYCLES {
        let sample = simulated_sample(tick, &config);

        // Every fifth sample arrives in two halves
        if tick % 5 == 0 {
            let wire = sample.to_wire();
            device.queue_response(&wire[..SAMPLE_LEN / 2]);
            device.queue_response(&wire[SAMPLE_LEN / 2..]);
            driver.poll()?;
        } else {
            device.queue_sample(sample);
        }

        if !driver.poll()? {
            continue;
        }

        let state = driver.state()?;
        let reading = state.reading();
        println!(
            "{:>3}  {}  lr={:?} ud={:?}{}",
            tick,
            serde_json::to_string(&reading)?,
            state.joy_pos_lr(threshold),
            state.joy_pos_ud(threshold),
            if state.z_pressed() { "  [Z pressed]" } else { "" },
        );

        thread::sleep(Duration::from_millis(config.device.poll_interval_ms));
    }

    info!("Requests issued: {}", device.requests().len());
    Ok(())
}

/// A sample for a device being rolled slowly while the stick sweeps a
/// circle. Z is held for a few ticks out of every ten.
fn simulated_sample(tick: usize, config: &Config) -> RawSample {
    let cal = &config.calibration;
    let phase = tick as f32 * std::f32::consts::TAU / CYCLES as f32;

    let joy_x = (cal.joy_zero_x as f32 + 100.0 * phase.cos()).clamp(0.0, 255.0) as u8;
    let joy_y = (cal.joy_zero_y as f32 + 100.0 * phase.sin()).clamp(0.0, 255.0) as u8;

    let accel = [
        cal.accel_zero_x as f32 + cal.radius * phase.sin(),
        cal.accel_zero_y as f32,
        cal.accel_zero_z as f32 + cal.radius * phase.cos(),
    ]
    .map(|v| v.clamp(0.0, 1023.0) as u16);

    let mut status = 0u8;
    for (i, value) in accel.iter().enumerate() {
        status |= ((value & 0b11) as u8) << ((i + 1) * 2);
    }
    let z_held = tick % 10 >= 7;
    if !z_held {
        status |= 0b01;
    }
    // C never pressed
    status |= 0b10;

    RawSample([
        joy_x,
        joy_y,
        (accel[0] >> 2) as u8,
        (accel[1] >> 2) as u8,
        (accel[2] >> 2) as u8,
        status,
    ])
}
