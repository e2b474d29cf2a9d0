//! Shared test doubles
//!
//! A scripted I2C bus, a recording reset pin and a simulated timeline that
//! only moves when the driver sleeps.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use elite_tuner::config::{EliteConfig, MODE4_READ_LEN};
use elite_tuner::hal::timer::Clock;
use elite_tuner::tables::{ChipTables, FeRegisterTable};
use elite_tuner::Elite;
use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

pub type TestTuner = Elite<'static, MockBus, MockPin, SimTime, SimTime>;

// ============================================================================
// Simulated time
// ============================================================================

/// Timeline shared by the clock and delay roles
#[derive(Clone, Default)]
pub struct SimTime {
    now_ns: Rc<Cell<u64>>,
}

impl SimTime {
    pub fn now_ns(&self) -> u64 {
        self.now_ns.get()
    }
}

impl Clock for SimTime {
    fn now_ms(&self) -> u64 {
        self.now_ns.get() / 1_000_000
    }
}

impl embedded_hal_async::delay::DelayNs for SimTime {
    async fn delay_ns(&mut self, ns: u32) {
        self.now_ns.set(self.now_ns.get() + u64::from(ns));
    }
}

// ============================================================================
// Reset pin
// ============================================================================

/// Records every level driven together with the simulated time
#[derive(Clone)]
pub struct MockPin {
    pub levels: Rc<RefCell<Vec<(bool, u64)>>>,
    time: SimTime,
}

impl embedded_hal::digital::ErrorType for MockPin {
    type Error = Infallible;
}

impl embedded_hal::digital::OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.levels.borrow_mut().push((false, self.time.now_ns()));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.levels.borrow_mut().push((true, self.time.now_ns()));
        Ok(())
    }
}

// ============================================================================
// I2C bus
// ============================================================================

/// One completed bus operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Txn {
    Write(Vec<u8>),
    Read(usize),
}

#[derive(Default)]
pub struct BusState {
    pub log: Vec<Txn>,
    pub addresses: Vec<u8>,
    pub responses: VecDeque<Vec<u8>>,
    pub default_response: Vec<u8>,
    pub fail_write_at: Option<usize>,
    pub fail_read: bool,
    writes_attempted: usize,
}

/// Scripted bus; reads pop queued responses, then fall back to the default
#[derive(Clone)]
pub struct MockBus {
    pub state: Rc<RefCell<BusState>>,
}

impl MockBus {
    pub fn new() -> Self {
        let state = BusState {
            default_response: tds(false, false, false),
            ..BusState::default()
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Queue a raw read response
    pub fn respond(&self, bytes: Vec<u8>) {
        self.state.borrow_mut().responses.push_back(bytes);
    }

    /// Response used once the queue is empty
    pub fn set_default_response(&self, bytes: Vec<u8>) {
        self.state.borrow_mut().default_response = bytes;
    }

    /// Fail the `n`th write attempt (0-based) with a NACK
    pub fn fail_write_at(&self, n: usize) {
        self.state.borrow_mut().fail_write_at = Some(n);
    }

    /// Fail every read with a NACK
    pub fn fail_reads(&self) {
        self.state.borrow_mut().fail_read = true;
    }

    pub fn log(&self) -> Vec<Txn> {
        self.state.borrow().log.clone()
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.log()
            .into_iter()
            .filter_map(|t| match t {
                Txn::Write(bytes) => Some(bytes),
                Txn::Read(_) => None,
            })
            .collect()
    }

    pub fn reads(&self) -> Vec<usize> {
        self.log()
            .into_iter()
            .filter_map(|t| match t {
                Txn::Read(len) => Some(len),
                Txn::Write(_) => None,
            })
            .collect()
    }

    /// Decoded command frames, in order
    pub fn commands(&self) -> Vec<SentCommand> {
        self.writes()
            .iter()
            .filter_map(|w| SentCommand::parse(w))
            .collect()
    }

    pub fn clear_log(&self) {
        self.state.borrow_mut().log.clear();
    }
}

impl ErrorType for MockBus {
    type Error = ErrorKind;
}

impl embedded_hal_async::i2c::I2c for MockBus {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), ErrorKind> {
        let mut state = self.state.borrow_mut();
        state.addresses.push(address);

        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    let attempt = state.writes_attempted;
                    state.writes_attempted += 1;
                    if state.fail_write_at == Some(attempt) {
                        return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
                    }
                    state.log.push(Txn::Write(bytes.to_vec()));
                }
                Operation::Read(buf) => {
                    if state.fail_read {
                        return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
                    }
                    let response = match state.responses.pop_front() {
                        Some(r) => r,
                        None => state.default_response.clone(),
                    };
                    buf.fill(0);
                    let n = response.len().min(buf.len());
                    buf[..n].copy_from_slice(&response[..n]);
                    state.log.push(Txn::Read(buf.len()));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Frames
// ============================================================================

/// Command frame as seen on the bus
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentCommand {
    pub code: u8,
    pub count: u8,
    pub params: Vec<[u8; 3]>,
}

impl SentCommand {
    /// Parse a Mode4 write to the command address, checksum verified
    pub fn parse(frame: &[u8]) -> Option<Self> {
        if frame.len() < 9 || frame[..3] != [0xF1, 0x90, 0x00] {
            return None;
        }
        let body = &frame[3..frame.len() - 3];
        let trailer = &frame[frame.len() - 3..];
        let sum = body
            .chunks(3)
            .map(|u| (u32::from(u[0]) << 16) | (u32::from(u[1]) << 8) | u32::from(u[2]))
            .fold(0u32, |acc, v| (acc + v) & 0x00FF_FFFF);
        assert_eq!(
            trailer,
            &sum.to_be_bytes()[1..],
            "bad checksum on command frame {frame:02x?}"
        );

        Some(Self {
            code: (body[0] << 4) | (body[1] >> 4),
            count: body[2],
            params: body[3..].chunks(3).map(|u| [u[0], u[1], u[2]]).collect(),
        })
    }
}

/// Mode4 response carrying `units` after the header
pub fn response(units: &[[u8; 3]]) -> Vec<u8> {
    let mut bytes = vec![0x00, 0x00, units.len() as u8];
    for unit in units {
        bytes.extend_from_slice(unit);
    }
    bytes.resize(MODE4_READ_LEN, 0);
    bytes
}

/// Tuner driver status response
pub fn tds(busy: bool, collision: bool, sequence_changing: bool) -> Vec<u8> {
    response(&[[
        u8::from(sequence_changing),
        u8::from(collision),
        if busy { 0x40 } else { 0x00 },
    ]])
}

// ============================================================================
// Rig
// ============================================================================

/// Handles kept by the test after the mocks move into the driver
pub struct Rig {
    pub bus: MockBus,
    pub pin: MockPin,
    pub time: SimTime,
}

impl Rig {
    pub fn now_ms(&self) -> u64 {
        self.time.now_ms()
    }
}

/// Front-end table with registers `[band, i, i]` for `i` in `0..16`
pub const FE_FM: [u8; 48] = fe_table(1);
pub const FE_AM: [u8; 48] = fe_table(2);
pub const FE_WB: [u8; 48] = fe_table(4);

const fn fe_table(band: u8) -> [u8; 48] {
    let mut table = [0u8; 48];
    let mut i = 0;
    while i < 16 {
        table[i * 3] = band;
        table[i * 3 + 1] = i as u8;
        table[i * 3 + 2] = i as u8;
        i += 1;
    }
    table
}

pub fn tables(boot_image: &'static [u8]) -> ChipTables<'static> {
    ChipTables {
        boot_image,
        fe_fm: FeRegisterTable::new(&FE_FM),
        fe_am: FeRegisterTable::new(&FE_AM),
        fe_wb: FeRegisterTable::new(&FE_WB),
    }
}

pub fn rig_with(tables: ChipTables<'static>, config: EliteConfig) -> (TestTuner, Rig) {
    let time = SimTime::default();
    let bus = MockBus::new();
    let pin = MockPin {
        levels: Rc::new(RefCell::new(Vec::new())),
        time: time.clone(),
    };
    let tuner = Elite::with_tables(
        bus.clone(),
        pin.clone(),
        time.clone(),
        time.clone(),
        config,
        tables,
    );
    (tuner, Rig { bus, pin, time })
}

pub fn rig() -> (TestTuner, Rig) {
    rig_with(tables(&[]), EliteConfig::default())
}
