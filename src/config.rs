use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::reg::{Reg, CONFIG_LEN};
use crate::{Error, Gt911};

/// GT911 configuration checksum: two's complement of the byte sum.
///
/// Appending the result to `buf` makes the whole sequence sum to zero.
pub fn checksum(buf: &[u8]) -> u8 {
  let sum = buf.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
  (!sum).wrapping_add(1)
}

impl<I, E, D, INT, RST> Gt911<'_, I, D, INT, RST>
where
  I: I2c<SevenBitAddress, Error = E>,
{
  /// Read the whole configuration block and verify it against the chip's checksum.
  ///
  /// The cached block is only marked as loaded when the checksums agree. Any
  /// failure leaves it unloaded, which turns [`Gt911::write_config`] into a no-op.
  pub async fn read_config(&mut self) -> Result<&Config, Error<E>> {
    self.ensure_ready()?;
    self.config_loaded = false;

    let mut block = [0u8; CONFIG_LEN];
    self.read_bytes(Reg::Config, &mut block).await?;
    self.config = Config::from(block);

    let expected = self.read_byte(Reg::Checksum).await?;
    let actual = self.config.checksum();
    if expected != actual {
      warn!("GT911: config checksum mismatch, chip {:#x} vs computed {:#x}", expected, actual);
      return Err(Error::ChecksumMismatch { expected, actual });
    }

    self.config_loaded = true;
    debug!("GT911: config version {:#x} loaded", self.config.version());
    Ok(&self.config)
  }

  /// Push the cached configuration back to the chip if it was modified.
  ///
  /// Returns `Ok(false)` without touching the chip when no configuration was
  /// loaded or when the chip already holds a block with the same checksum.
  /// Otherwise writes the block followed by the checksum and the apply flag and
  /// returns `Ok(true)`.
  pub async fn write_config(&mut self) -> Result<bool, Error<E>> {
    self.ensure_ready()?;
    if !self.config_loaded {
      return Ok(false);
    }

    let checksum = self.config.checksum();
    if self.read_byte(Reg::Checksum).await? == checksum {
      return Ok(false);
    }

    let block = self.config.0;
    self.write_bytes(Reg::Config, &block).await?;
    self.write_bytes(Reg::Checksum, &[checksum, 1]).await?;

    info!("GT911: config written, checksum {:#x}", checksum);
    Ok(true)
  }

  /// The cached configuration block, as last read or modified.
  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Mutable access to the cached block, for tuning before [`Gt911::write_config`].
  pub fn config_mut(&mut self) -> &mut Config {
    &mut self.config
  }

  /// Whether the cached block came from a checksum-verified read.
  pub fn is_config_loaded(&self) -> bool {
    self.config_loaded
  }
}

/// Raw image of the configuration registers 0x8047..=0x80FE.
///
/// Only the leading, commonly tuned fields have typed accessors; everything
/// else is reachable through [`Config::as_bytes`] / [`Config::as_bytes_mut`].
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config([u8; CONFIG_LEN]);

// Offsets from 0x8047
const VERSION: usize = 0;
const X_OUTPUT_MAX: usize = 1;
const Y_OUTPUT_MAX: usize = 3;
const TOUCH_NUMBER: usize = 5;
const MODULE_SWITCH_1: usize = 6;
const SHAKE_COUNT: usize = 8;
const SCREEN_TOUCH_LEVEL: usize = 12;
const SCREEN_LEAVE_LEVEL: usize = 13;
const REFRESH_RATE: usize = 15;

const TRIGGER_MASK: u8 = 0b0000_0011;
const X2Y_SWAP: u8 = 0b0000_1000;

impl Config {
  pub const fn new() -> Self {
    Self([0; CONFIG_LEN])
  }

  pub fn as_bytes(&self) -> &[u8; CONFIG_LEN] {
    &self.0
  }

  pub fn as_bytes_mut(&mut self) -> &mut [u8; CONFIG_LEN] {
    &mut self.0
  }

  /// Checksum the chip expects at 0x80FF for this block.
  pub fn checksum(&self) -> u8 {
    checksum(&self.0)
  }

  pub fn version(&self) -> u8 {
    self.0[VERSION]
  }

  pub fn set_version(&mut self, version: u8) {
    self.0[VERSION] = version;
  }

  /// Output resolution the chip scales its coordinates to.
  pub fn resolution(&self) -> (u16, u16) {
    (self.u16_at(X_OUTPUT_MAX), self.u16_at(Y_OUTPUT_MAX))
  }

  pub fn set_resolution(&mut self, x: u16, y: u16) {
    self.set_u16_at(X_OUTPUT_MAX, x);
    self.set_u16_at(Y_OUTPUT_MAX, y);
  }

  /// Number of contacts the chip tracks (1..=5).
  pub fn touch_number(&self) -> u8 {
    self.0[TOUCH_NUMBER] & 0x0F
  }

  pub fn set_touch_number(&mut self, n: u8) {
    let n = n.clamp(1, crate::MAX_CONTACTS as u8);
    self.0[TOUCH_NUMBER] = (self.0[TOUCH_NUMBER] & 0xF0) | n;
  }

  pub fn interrupt_trigger(&self) -> Trigger {
    Trigger::from_bits(self.0[MODULE_SWITCH_1] & TRIGGER_MASK)
  }

  pub fn set_interrupt_trigger(&mut self, trigger: Trigger) {
    self.0[MODULE_SWITCH_1] = (self.0[MODULE_SWITCH_1] & !TRIGGER_MASK) | trigger as u8;
  }

  /// Whether the chip swaps X and Y before reporting.
  pub fn axes_swapped(&self) -> bool {
    self.0[MODULE_SWITCH_1] & X2Y_SWAP != 0
  }

  pub fn set_axes_swapped(&mut self, swap: bool) {
    if swap {
      self.0[MODULE_SWITCH_1] |= X2Y_SWAP;
    } else {
      self.0[MODULE_SWITCH_1] &= !X2Y_SWAP;
    }
  }

  /// Debounce count for finger down/up (upper nibble) and noise (lower nibble).
  pub fn shake_count(&self) -> u8 {
    self.0[SHAKE_COUNT]
  }

  pub fn set_shake_count(&mut self, count: u8) {
    self.0[SHAKE_COUNT] = count;
  }

  /// Touch (press) and leave (release) thresholds.
  pub fn touch_levels(&self) -> (u8, u8) {
    (self.0[SCREEN_TOUCH_LEVEL], self.0[SCREEN_LEAVE_LEVEL])
  }

  pub fn set_touch_levels(&mut self, touch: u8, leave: u8) {
    self.0[SCREEN_TOUCH_LEVEL] = touch;
    self.0[SCREEN_LEAVE_LEVEL] = leave;
  }

  /// Report period in milliseconds (5 + N, N in 0..=15).
  pub fn report_period_ms(&self) -> u8 {
    5 + (self.0[REFRESH_RATE] & 0x0F)
  }

  pub fn set_report_period_ms(&mut self, ms: u8) {
    let n = ms.clamp(5, 20) - 5;
    self.0[REFRESH_RATE] = (self.0[REFRESH_RATE] & 0xF0) | n;
  }

  fn u16_at(&self, at: usize) -> u16 {
    u16::from_le_bytes([self.0[at], self.0[at + 1]])
  }

  fn set_u16_at(&mut self, at: usize, v: u16) {
    self.0[at..at + 2].copy_from_slice(&v.to_le_bytes());
  }
}

impl Default for Config {
  fn default() -> Self {
    Self::new()
  }
}

impl From<[u8; CONFIG_LEN]> for Config {
  fn from(b: [u8; CONFIG_LEN]) -> Self {
    Self(b)
  }
}

impl From<Config> for [u8; CONFIG_LEN] {
  fn from(c: Config) -> Self {
    c.0
  }
}

impl core::fmt::Debug for Config {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    let (x, y) = self.resolution();
    f.debug_struct("Config")
      .field("version", &self.version())
      .field("resolution", &(x, y))
      .field("touch_number", &self.touch_number())
      .field("trigger", &self.interrupt_trigger())
      .field("checksum", &self.checksum())
      .finish_non_exhaustive()
  }
}

/// INT output polarity selected in module switch 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Trigger {
  RisingEdge = 0b00,
  FallingEdge = 0b01,
  LowLevel = 0b10,
  HighLevel = 0b11,
}

impl Trigger {
  const fn from_bits(bits: u8) -> Self {
    match bits & TRIGGER_MASK {
      0b00 => Self::RisingEdge,
      0b01 => Self::FallingEdge,
      0b10 => Self::LowLevel,
      _ => Self::HighLevel,
    }
  }
}
