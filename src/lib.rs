#![cfg_attr(not(test), no_std)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Async, `no_std` driver for the Goodix GT911 capacitive touch controller.
//!
//! The GT911 is a five-point capacitive touch controller found on many small
//! TFT modules and ESP32 development boards. This crate wraps its I²C register
//! protocol behind a typed API, with helpers for:
//!
//! - The reset/address-select sequence that latches one of the two I²C
//!   addresses through the INT line
//! - Reading and writing the checksummed configuration block
//! - Interrupt-gated or polled touch sampling with half-turn rotation
//! - Turning samples into pressed/released pointer events in display
//!   coordinates, ready for a GUI input device
//! - Using `embedded-hal` / `embedded-hal-async` 1.0 traits so the driver works
//!   across MCU families
//!
//! ```no_run
//! use embedded_hal_async::{delay::DelayNs, i2c::{I2c, SevenBitAddress}};
//! use gt911::{Address, Gt911, InterruptFlag, InterruptPin, FlexPin, Mode, Pins};
//!
//! static TOUCH_IRQ: InterruptFlag = InterruptFlag::new();
//!
//! async fn example<I2C, D, INT, RST, E>(i2c: I2C, delay: D, int: INT, rst: RST) -> Result<(), gt911::Error<E>>
//! where
//!   I2C: I2c<SevenBitAddress, Error = E>,
//!   D: DelayNs,
//!   INT: InterruptPin,
//!   RST: FlexPin,
//! {
//!   let mut touch = Gt911::new(i2c, delay, Address::Primary, Pins::new(int, rst), &TOUCH_IRQ);
//!   touch.begin().await?;
//!
//!   if touch.touched(Mode::Interrupt).await? > 0 {
//!     let _first = touch.point(0);
//!   }
//!   Ok(())
//! }
//! ```

#[macro_use]
mod fmt;

mod config;
mod info;
mod init;
mod pins;
mod pointer;
mod reg;
mod rw;
mod touch;

#[cfg(test)]
mod mock;

pub use config::*;
pub use info::*;
pub use pins::*;
pub use pointer::*;
pub use reg::{CONFIG_LEN, DEFAULT_RESOLUTION, MAX_CONTACTS};
pub use touch::*;

/// Errors that can occur while interacting with the controller.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
  /// I²C bus transaction failed with the underlying driver error.
  I2c(E),
  /// Reconfiguring or driving the INT or RST line failed.
  Pin,
  /// The driver has not been brought up with [`Gt911::begin`].
  NotReady,
  /// The configuration block did not match the checksum register.
  ChecksumMismatch { expected: u8, actual: u8 },
  /// A caller-supplied buffer is too small for the requested data.
  BufferTooSmall,
  /// An operation attempted to write a buffer larger than the protocol allows.
  BufferOverflow,
  /// The requested rotation is not implemented.
  UnsupportedRotation(Rotation),
}

/// 7-bit I²C address, latched by the level on INT while RST is released.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Address {
  /// 0x5D (0xBA/0xBB on the wire). INT held low during reset.
  #[default]
  Primary,
  /// 0x14 (0x28/0x29 on the wire). INT held high during reset.
  Secondary,
}

impl From<Address> for u8 {
  fn from(a: Address) -> Self {
    match a {
      Address::Primary => 0x5D,
      Address::Secondary => 0x14,
    }
  }
}

/// Not one of the two addresses the GT911 can latch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidAddress(pub u8);

impl TryFrom<u8> for Address {
  type Error = InvalidAddress;

  fn try_from(addr: u8) -> Result<Self, Self::Error> {
    match addr {
      0x5D => Ok(Self::Primary),
      0x14 => Ok(Self::Secondary),
      other => Err(InvalidAddress(other)),
    }
  }
}

/// Driver state for one GT911.
///
/// Owns the I²C bus, a delay provider and the optional INT/RST lines. Create an
/// instance with [`Gt911::new`], bring the chip up with [`Gt911::begin`], then
/// sample with [`Gt911::touched`]. [`Gt911::deinit`] releases the lines and
/// hands the peripherals back.
pub struct Gt911<'a, I, D, INT, RST> {
  i2c: I,
  delay: D,
  pins: Pins<INT, RST>,
  address: Address,
  irq: &'a InterruptFlag,
  ready: bool,
  rotation: Rotation,
  config: Config,
  config_loaded: bool,
  info: DeviceInfo,
  points: [TouchPoint; MAX_CONTACTS],
}

impl<'a, I, D, INT, RST> Gt911<'a, I, D, INT, RST> {
  /// Create a driver instance. Nothing is sent to the chip until
  /// [`Gt911::begin`].
  ///
  /// `irq` is the flag the host's INT interrupt handler signals; it is only
  /// consulted by [`Mode::Interrupt`] sampling.
  pub fn new(i2c: I, delay: D, address: Address, pins: Pins<INT, RST>, irq: &'a InterruptFlag) -> Self {
    Self {
      i2c,
      delay,
      pins,
      address,
      irq,
      ready: false,
      rotation: Rotation::Deg0,
      config: Config::new(),
      config_loaded: false,
      info: DeviceInfo::default(),
      points: [TouchPoint::default(); MAX_CONTACTS],
    }
  }

  pub fn address(&self) -> Address {
    self.address
  }

  /// Whether [`Gt911::begin`] completed successfully.
  pub fn is_ready(&self) -> bool {
    self.ready
  }

  fn ensure_ready<E>(&self) -> Result<(), Error<E>> {
    if self.ready {
      Ok(())
    } else {
      Err(Error::NotReady)
    }
  }
}
