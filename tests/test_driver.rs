//! Integration tests for the Nunchuck driver on the mock bus

use nunchuck_rs::nunchuck::{HANDSHAKE, NUNCHUCK_ADDRESS, SAMPLE_LEN, SAMPLE_REQUEST};
use nunchuck_rs::{
    Calibration, DriverError, DriverState, JoyPosLR, JoyPosUD, MockBus, NunchuckDriver, RawSample,
    DEFAULT_JOY_THRESHOLD,
};

/// Status byte with both buttons released and no accel low bits
const RELEASED: u8 = 0b11;

fn sample(joy_x: u8, joy_y: u8, status: u8) -> RawSample {
    RawSample([joy_x, joy_y, 0x7F, 0x7A, 0x73, status])
}

/// Driver initialized with a priming sample, plus a handle on its bus
fn active_driver() -> (NunchuckDriver<MockBus>, MockBus) {
    let bus = MockBus::new();
    let handle = bus.clone();
    handle.queue_sample(sample(124, 132, RELEASED));

    let mut driver = NunchuckDriver::new(bus);
    driver.initialize().unwrap();
    handle.clear_log();
    (driver, handle)
}

#[test]
fn test_initialize_handshake_and_baseline() {
    let bus = MockBus::new();
    let handle = bus.clone();
    handle.queue_sample(sample(200, 50, RELEASED));

    let mut driver = NunchuckDriver::new(bus);
    assert_eq!(driver.driver_state(), DriverState::Uninitialized);
    driver.initialize().unwrap();
    assert_eq!(driver.driver_state(), DriverState::Active);
    assert!(handle.is_joined());

    // Handshake, then the priming read, then the next sample request
    assert_eq!(
        handle.writes(),
        vec![
            (NUNCHUCK_ADDRESS, HANDSHAKE.to_vec()),
            (NUNCHUCK_ADDRESS, SAMPLE_REQUEST.to_vec()),
        ]
    );
    assert_eq!(handle.requests(), vec![(NUNCHUCK_ADDRESS, SAMPLE_LEN)]);

    let state = driver.state().unwrap();
    assert_eq!(state.angles(), [0, 0, 0]);
    assert_eq!(state.joy_zero(), (124, 132));
    // The priming joystick value is kept
    assert_eq!(state.joy_raw(), (200, 50));
}

#[test]
fn test_initialize_without_data_still_activates() {
    let bus = MockBus::new();
    let handle = bus.clone();
    let mut driver = NunchuckDriver::new(bus);

    driver.initialize().unwrap();
    assert!(driver.is_initialized());
    // No sample arrived, so no request for the next one
    assert_eq!(handle.writes(), vec![(NUNCHUCK_ADDRESS, HANDSHAKE.to_vec())]);
}

#[test]
fn test_initialize_twice_is_rejected() {
    let (mut driver, _) = active_driver();
    assert!(matches!(driver.initialize(), Err(DriverError::AlreadyInitialized)));
}

#[test]
fn test_handshake_failure_propagates() {
    let bus = MockBus::new();
    bus.set_fail_writes(true);
    let mut driver = NunchuckDriver::new(bus);

    assert!(matches!(driver.initialize(), Err(DriverError::Bus(_))));
    assert!(!driver.is_initialized());
}

#[test]
fn test_priming_read_failure_leaves_driver_uninitialized() {
    let bus = MockBus::new();
    bus.set_fail_reads(true);
    let mut driver = NunchuckDriver::new(bus);

    assert!(matches!(driver.initialize(), Err(DriverError::Bus(_))));
    assert_eq!(driver.driver_state(), DriverState::Uninitialized);
}

#[test]
fn test_poll_commits_joystick_bytes() {
    let (mut driver, bus) = active_driver();

    for (x, y) in [(0u8, 255u8), (17, 42), (124, 132), (255, 0)] {
        bus.queue_sample(sample(x, y, RELEASED));
        assert!(driver.poll().unwrap());
        assert_eq!(driver.state().unwrap().joy_raw(), (x, y));
    }
}

#[test]
fn test_poll_decodes_accelerometer() {
    let (mut driver, bus) = active_driver();

    // High bits 0x7F/0x7A/0x73, low bits X=1 Y=2 Z=3, buttons released
    let status = (3 << 6) | (2 << 4) | (1 << 2) | RELEASED;
    bus.queue_sample(RawSample([124, 132, 0x7F, 0x7A, 0x73, status]));
    assert!(driver.poll().unwrap());

    let state = driver.state().unwrap();
    assert_eq!(state.angles(), [(0x7F << 2) | 1, (0x7A << 2) | 2, (0x73 << 2) | 3]);
    assert_eq!(state.read_accel_x(), ((0x7F << 2) + 1 - 510) as f32);
    assert!(!state.is_z_button_pressed());
    assert!(!state.is_c_button_pressed());
}

#[test]
fn test_each_commit_requests_next_sample() {
    let (mut driver, bus) = active_driver();

    bus.queue_sample(sample(124, 132, RELEASED));
    assert!(driver.poll().unwrap());
    assert_eq!(bus.writes(), vec![(NUNCHUCK_ADDRESS, SAMPLE_REQUEST.to_vec())]);

    // Empty poll: no commit, no request
    assert!(!driver.poll().unwrap());
    assert_eq!(bus.writes().len(), 1);
    assert_eq!(bus.requests().len(), 2);
}

#[test]
fn test_split_block_commits_on_completion() {
    let (mut driver, bus) = active_driver();
    let before = driver.state().unwrap().clone();

    let wire = RawSample([10, 20, 0x40, 0x41, 0x42, RELEASED]).to_wire();
    bus.queue_response(&wire[..3]);
    bus.queue_response(&wire[3..]);

    assert!(!driver.poll().unwrap());
    let state = driver.state().unwrap();
    assert_eq!(state.joy_raw(), before.joy_raw());
    assert_eq!(state.angles(), before.angles());
    assert!(bus.writes().is_empty());

    assert!(driver.poll().unwrap());
    let state = driver.state().unwrap();
    assert_eq!(state.joy_raw(), (10, 20));
    assert_eq!(state.angles(), [0x40 << 2, 0x41 << 2, 0x42 << 2]);
}

#[test]
fn test_oversized_burst_is_truncated() {
    let (mut driver, bus) = active_driver();

    let mut wire = RawSample([1, 2, 3, 4, 5, RELEASED]).to_wire().to_vec();
    wire.extend_from_slice(&[0xAA, 0xBB, 0xCC]);
    bus.queue_response(&wire);

    assert!(driver.poll().unwrap());
    assert_eq!(driver.state().unwrap().joy_raw(), (1, 2));

    // Extra bytes did not leak into the next block
    bus.queue_sample(sample(9, 8, RELEASED));
    assert!(driver.poll().unwrap());
    assert_eq!(driver.state().unwrap().joy_raw(), (9, 8));
}

#[test]
fn test_z_pressed_is_edge_triggered() {
    let (mut driver, bus) = active_driver();
    let z_down = 0b10;

    let script = [
        (RELEASED, false),
        (z_down, true),
        (z_down, false),
        (z_down, false),
        (RELEASED, false),
        (z_down, true),
    ];

    for (status, expected) in script {
        bus.queue_sample(sample(124, 132, status));
        assert!(driver.poll().unwrap());
        assert_eq!(driver.state().unwrap().z_pressed(), expected);
    }
}

#[test]
fn test_z_pressed_holds_across_empty_polls() {
    let (mut driver, bus) = active_driver();

    bus.queue_sample(sample(124, 132, 0b10));
    assert!(driver.poll().unwrap());
    assert!(driver.state().unwrap().z_pressed());

    // No new sample: the edge still belongs to the last committed cycle
    assert!(!driver.poll().unwrap());
    assert!(driver.state().unwrap().z_pressed());
}

#[test]
fn test_c_button_edges() {
    let (mut driver, bus) = active_driver();
    let c_down = 0b01;

    bus.queue_sample(sample(124, 132, c_down));
    driver.poll().unwrap();
    let state = driver.state().unwrap();
    assert!(state.is_c_button_pressed());
    assert!(state.c_pressed());
    assert!(!state.is_z_button_pressed());

    bus.queue_sample(sample(124, 132, RELEASED));
    driver.poll().unwrap();
    assert!(driver.state().unwrap().c_released());
}

#[test]
fn test_calibrate_joy_zeroes_reading() {
    let (mut driver, bus) = active_driver();

    bus.queue_sample(sample(131, 127, RELEASED));
    driver.poll().unwrap();
    assert_eq!(driver.state().unwrap().read_joy_x(), 7);
    assert_eq!(driver.state().unwrap().read_joy_y(), -5);

    driver.calibrate_joy().unwrap();
    assert_eq!(driver.state().unwrap().read_joy_x(), 0);
    assert_eq!(driver.state().unwrap().read_joy_y(), 0);

    // Offsets persist across polls
    bus.queue_sample(sample(141, 127, RELEASED));
    driver.poll().unwrap();
    assert_eq!(driver.state().unwrap().read_joy_x(), 10);
    assert_eq!(driver.state().unwrap().joy_zero(), (131, 127));
}

#[test]
fn test_joy_pos_lr_thresholds() {
    let (mut driver, bus) = active_driver();
    let t = DEFAULT_JOY_THRESHOLD;

    let cases = [
        (124 - 60, JoyPosLR::Neutral),
        (124 + 60, JoyPosLR::Neutral),
        (124 - 61, JoyPosLR::Left),
        (124 + 61, JoyPosLR::Right),
        (0, JoyPosLR::Left),
        (255, JoyPosLR::Right),
    ];

    for (x, expected) in cases {
        bus.queue_sample(sample(x, 132, RELEASED));
        driver.poll().unwrap();
        assert_eq!(driver.state().unwrap().joy_pos_lr(t), expected, "joy_x = {}", x);
    }
}

#[test]
fn test_joy_pos_ud_and_custom_threshold() {
    let (mut driver, bus) = active_driver();

    bus.queue_sample(sample(124, 132 + 30, RELEASED));
    driver.poll().unwrap();
    let state = driver.state().unwrap();

    assert_eq!(state.joy_pos_ud(DEFAULT_JOY_THRESHOLD), JoyPosUD::Neutral);
    assert!(!state.is_joy_pressed(DEFAULT_JOY_THRESHOLD));
    assert_eq!(state.joy_pos_ud(20), JoyPosUD::Up);
    assert!(state.is_joy_pressed(20));
}

#[test]
fn test_rest_orientation() {
    let (mut driver, bus) = active_driver();

    // 510 = 0x7F << 2 | 2, 490 = 0x7A << 2 | 2, 460 = 0x73 << 2 | 0
    let status = (0 << 6) | (2 << 4) | (2 << 2) | RELEASED;
    bus.queue_sample(RawSample([124, 132, 0x7F, 0x7A, 0x73, status]));
    driver.poll().unwrap();

    let state = driver.state().unwrap();
    assert_eq!(state.angles(), [510, 490, 460]);
    assert_eq!(state.read_accel_x(), 0.0);
    assert_eq!(state.read_accel_y(), 0.0);
    assert_eq!(state.read_accel_z(), 0.0);
    assert_eq!(state.read_roll(), 0.0);
    assert!((state.read_pitch() - 90.0).abs() < 1e-4);
}

#[test]
fn test_custom_calibration_and_address() {
    let bus = MockBus::new();
    let handle = bus.clone();
    let calibration = Calibration {
        accel_zero_z: 720,
        joy_zero_x: 128,
        joy_zero_y: 128,
        ..Calibration::default()
    };

    let mut driver = NunchuckDriver::with_calibration(bus, 0x53, calibration);
    driver.initialize().unwrap();
    assert_eq!(handle.writes()[0], (0x53, HANDSHAKE.to_vec()));

    handle.queue_sample(RawSample([128, 128, 0, 0, 0xB4, RELEASED]));
    driver.poll().unwrap();
    let state = driver.state().unwrap();
    assert_eq!(state.read_joy_x(), 0);
    assert_eq!(state.read_accel_z(), 0.0);
}

#[test]
fn test_two_phase_protocol() {
    let (mut driver, bus) = active_driver();

    assert_eq!(driver.try_consume().unwrap(), None);

    bus.queue_sample(sample(1, 2, RELEASED));
    let raw = driver.try_consume().unwrap();
    assert_eq!(raw, Some(sample(1, 2, RELEASED)));
    // try_consume alone neither commits nor requests
    assert_eq!(driver.state().unwrap().joy_raw(), (124, 132));
    assert!(bus.writes().is_empty());

    driver.commit(&raw.unwrap()).unwrap();
    assert_eq!(driver.state().unwrap().joy_raw(), (1, 2));

    driver.request_next().unwrap();
    assert_eq!(bus.writes(), vec![(NUNCHUCK_ADDRESS, SAMPLE_REQUEST.to_vec())]);

    // Nothing left behind in the accumulator
    assert!(!driver.poll().unwrap());
    assert_eq!(driver.state().unwrap().joy_raw(), (1, 2));
}

#[test]
fn test_request_failure_after_commit_is_distinguished() {
    let (mut driver, bus) = active_driver();

    bus.queue_sample(sample(10, 20, 0b10));
    bus.set_fail_writes(true);
    assert!(matches!(driver.poll(), Err(DriverError::RequestAfterCommit(_))));

    // The sample is in the state even though the request failed
    let state = driver.state().unwrap();
    assert_eq!(state.joy_raw(), (10, 20));
    assert!(state.z_pressed());
}

#[test]
fn test_poll_read_error_propagates() {
    let (mut driver, bus) = active_driver();
    bus.set_fail_reads(true);
    assert!(matches!(driver.poll(), Err(DriverError::Bus(_))));

    bus.set_fail_reads(false);
    bus.queue_sample(sample(5, 6, RELEASED));
    assert!(driver.poll().unwrap());
}
