//! In-memory stand-ins for the bus, delay and pins used by the unit tests.
//!
//! `FakeBus` models the chip as a flat 16-bit register space. Writes land in
//! memory, reads come back out of it, and reads of the status register can be
//! scripted to walk through a sequence of values.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embedded_hal::digital::{self, ErrorType as PinErrorType, OutputPin};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation, SevenBitAddress};

use crate::{Address, FlexPin, Gt911, InterruptFlag, InterruptPin, NoPin, Pins};

const STATUS: u16 = 0x814E;
const CONFIG: u16 = 0x8047;
const CHECKSUM: u16 = 0x80FF;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transfer {
  Write(Vec<u8>),
  WriteRead(Vec<u8>, usize),
}

struct Chip {
  address: u8,
  memory: Vec<u8>,
  log: Vec<Transfer>,
  status_script: VecDeque<u8>,
  nack: bool,
  present: bool,
  fail_reads: bool,
  failed_reads_left: usize,
  failed_writes_left: usize,
}

#[derive(Clone)]
pub struct FakeBus(Rc<RefCell<Chip>>);

impl FakeBus {
  pub fn new(address: Address) -> Self {
    Self(Rc::new(RefCell::new(Chip {
      address: address.into(),
      memory: vec![0; 0x1_0000],
      log: Vec::new(),
      status_script: VecDeque::new(),
      nack: false,
      present: true,
      fail_reads: false,
      failed_reads_left: 0,
      failed_writes_left: 0,
    })))
  }

  pub fn transfers(&self) -> Vec<Transfer> {
    self.0.borrow().log.clone()
  }

  /// Payloads of plain writes, register address included.
  pub fn writes(&self) -> Vec<Vec<u8>> {
    self
      .0
      .borrow()
      .log
      .iter()
      .filter_map(|t| match t {
        Transfer::Write(w) => Some(w.clone()),
        Transfer::WriteRead(..) => None,
      })
      .collect()
  }

  pub fn clear_transfers(&self) {
    self.0.borrow_mut().log.clear();
  }

  pub fn set_nack(&self, nack: bool) {
    self.0.borrow_mut().nack = nack;
  }

  pub fn set_present(&self, present: bool) {
    self.0.borrow_mut().present = present;
  }

  pub fn fail_reads(&self, fail: bool) {
    self.0.borrow_mut().fail_reads = fail;
  }

  /// Fail only the next `n` register reads with a bus error.
  pub fn fail_next_reads(&self, n: usize) {
    self.0.borrow_mut().failed_reads_left = n;
  }

  /// Fail the next `n` register writes with a bus error; nothing is stored.
  pub fn fail_next_writes(&self, n: usize) {
    self.0.borrow_mut().failed_writes_left = n;
  }

  pub fn poke(&self, addr: u16, bytes: &[u8]) {
    let start = usize::from(addr);
    self.0.borrow_mut().memory[start..start + bytes.len()].copy_from_slice(bytes);
  }

  pub fn peek(&self, addr: u16) -> u8 {
    self.0.borrow().memory[usize::from(addr)]
  }

  /// Values returned by the next reads of the status register, before falling
  /// back to memory.
  pub fn script_status(&self, values: &[u8]) {
    self.0.borrow_mut().status_script.extend(values.iter().copied());
  }

  pub fn load_config(&self, block: &[u8], checksum: u8) {
    self.poke(CONFIG, block);
    self.poke(CHECKSUM, &[checksum]);
  }
}

impl ErrorType for FakeBus {
  type Error = ErrorKind;
}

impl I2c<SevenBitAddress> for FakeBus {
  async fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
    let mut chip = self.0.borrow_mut();
    if chip.nack || !chip.present || address != chip.address {
      return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
    }

    match operations {
      [Operation::Write(w)] => {
        chip.log.push(Transfer::Write(w.to_vec()));
        if chip.failed_writes_left > 0 {
          chip.failed_writes_left -= 1;
          return Err(ErrorKind::Bus);
        }
        if let [hi, lo, payload @ ..] = *w {
          let start = usize::from(u16::from_be_bytes([*hi, *lo]));
          chip.memory[start..start + payload.len()].copy_from_slice(payload);
        }
        Ok(())
      }
      [Operation::Write(w), Operation::Read(r)] => {
        chip.log.push(Transfer::WriteRead(w.to_vec(), r.len()));
        if chip.fail_reads {
          return Err(ErrorKind::Bus);
        }
        if chip.failed_reads_left > 0 {
          chip.failed_reads_left -= 1;
          return Err(ErrorKind::Bus);
        }
        let reg = u16::from_be_bytes([w[0], w[1]]);
        let start = usize::from(reg);
        r.copy_from_slice(&chip.memory[start..start + r.len()]);
        if reg == STATUS {
          if let Some(status) = chip.status_script.pop_front() {
            r[0] = status;
          }
        }
        Ok(())
      }
      _ => Err(ErrorKind::Other),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
  Int,
  Rst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinOp {
  Output,
  Input,
  Low,
  High,
  Listen,
  Unlisten,
}

/// Everything the driver did to the pins and the clock, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
  Pin(Line, PinOp),
  Delay(u32),
}

type Log = Rc<RefCell<Vec<Event>>>;

#[derive(Clone, Default)]
pub struct FakeDelay {
  log: Log,
  elapsed: Rc<Cell<u64>>,
}

impl FakeDelay {
  pub fn elapsed_ms(&self) -> u64 {
    self.elapsed.get() / 1_000_000
  }

  pub fn reset(&self) {
    self.elapsed.set(0);
  }

  fn record(&self, ns: u32) {
    self.log.borrow_mut().push(Event::Delay(ns));
    self.elapsed.set(self.elapsed.get() + u64::from(ns));
  }
}

impl DelayNs for FakeDelay {
  async fn delay_ns(&mut self, ns: u32) {
    self.record(ns);
  }

  async fn delay_us(&mut self, us: u32) {
    self.record(us * 1_000);
  }

  async fn delay_ms(&mut self, ms: u32) {
    self.record(ms * 1_000_000);
  }
}

pub struct FakePin {
  line: Line,
  log: Log,
  fail: Rc<Cell<Option<(Line, PinOp)>>>,
}

impl FakePin {
  fn op(&mut self, op: PinOp) -> Result<(), digital::ErrorKind> {
    if self.fail.get() == Some((self.line, op)) {
      return Err(digital::ErrorKind::Other);
    }
    self.log.borrow_mut().push(Event::Pin(self.line, op));
    Ok(())
  }
}

impl PinErrorType for FakePin {
  type Error = digital::ErrorKind;
}

impl OutputPin for FakePin {
  fn set_low(&mut self) -> Result<(), Self::Error> {
    self.op(PinOp::Low)
  }

  fn set_high(&mut self) -> Result<(), Self::Error> {
    self.op(PinOp::High)
  }
}

impl FlexPin for FakePin {
  fn set_as_output(&mut self) -> Result<(), Self::Error> {
    self.op(PinOp::Output)
  }

  fn set_as_input(&mut self) -> Result<(), Self::Error> {
    self.op(PinOp::Input)
  }
}

impl InterruptPin for FakePin {
  fn listen(&mut self) -> Result<(), Self::Error> {
    self.op(PinOp::Listen)
  }

  fn unlisten(&mut self) -> Result<(), Self::Error> {
    self.op(PinOp::Unlisten)
  }
}

fn leak_flag() -> &'static InterruptFlag {
  Box::leak(Box::new(InterruptFlag::new()))
}

/// Driver at the primary address with neither INT nor RST wired.
pub fn driver() -> (Gt911<'static, FakeBus, FakeDelay, NoPin, NoPin>, FakeBus, FakeDelay) {
  let bus = FakeBus::new(Address::Primary);
  let delay = FakeDelay::default();
  let dev = Gt911::new(bus.clone(), delay.clone(), Address::Primary, Pins::none(), leak_flag());
  (dev, bus, delay)
}

/// Like [`driver`], already through `begin` with the log and clock cleared.
pub fn ready_driver() -> (Gt911<'static, FakeBus, FakeDelay, NoPin, NoPin>, FakeBus, FakeDelay) {
  let (mut dev, bus, delay) = driver();
  embassy_futures::block_on(dev.begin()).unwrap();
  bus.clear_transfers();
  delay.reset();
  (dev, bus, delay)
}

/// Bus, clock and both pins sharing one event log.
pub struct Rig {
  pub bus: FakeBus,
  address: Address,
  delay: FakeDelay,
  log: Log,
  fail: Rc<Cell<Option<(Line, PinOp)>>>,
}

impl Rig {
  pub fn new(address: Address) -> Self {
    let log = Log::default();
    Self {
      bus: FakeBus::new(address),
      address,
      delay: FakeDelay { log: log.clone(), elapsed: Rc::default() },
      log,
      fail: Rc::default(),
    }
  }

  pub fn driver(&self) -> Gt911<'static, FakeBus, FakeDelay, FakePin, FakePin> {
    let pin = |line| FakePin { line, log: self.log.clone(), fail: self.fail.clone() };
    let pins = Pins::new(pin(Line::Int), pin(Line::Rst));
    Gt911::new(self.bus.clone(), self.delay.clone(), self.address, pins, leak_flag())
  }

  pub fn events(&self) -> Vec<Event> {
    self.log.borrow().clone()
  }

  pub fn clear_events(&self) {
    self.log.borrow_mut().clear();
  }

  /// Make the next and every later `op` on `line` fail.
  pub fn fail_pin_op(&self, line: Line, op: PinOp) {
    self.fail.set(Some((line, op)));
  }
}
