/******************************************************************************
 * Refer to the GT911 programming guide for more information.                 *
 * ========================================================================== *
 *                         GT911 - Registers & Memory Map                     *
*******************************************************************************/

/// Maximum number of simultaneous contacts reported by the chip.
pub const MAX_CONTACTS: usize = 5;

/// Size of the configuration window 0x8047..=0x80FE.
pub const CONFIG_LEN: usize = 184;

/// Size of the device information window 0x8140..=0x814A.
pub(crate) const INFO_LEN: usize = 11;

/// Size of a single contact record.
pub(crate) const POINT_LEN: usize = 8;

/// Denominator used for coordinate scaling while the resolution is unknown.
pub const DEFAULT_RESOLUTION: u16 = 1024;

// Largest payload ever sent in one transaction: the config block. The
// checksum and apply flag follow in a separate write.
pub(crate) const MAX_WRITE: usize = CONFIG_LEN;

// Status byte (0x814E)
pub(crate) const STATUS_READY: u8 = 0b1000_0000;
pub(crate) const STATUS_COUNT: u8 = 0b0000_1111;

// Status polling window
pub(crate) const TOUCH_POLL_ATTEMPTS: u32 = 20;
pub(crate) const TOUCH_POLL_INTERVAL_MS: u32 = 1;

// Reset timing
pub(crate) const POWER_ON_DELAY_MS: u32 = 300;
pub(crate) const RESET_HOLD_MS: u32 = 11;
pub(crate) const ADDRESS_SELECT_US: u32 = 110;
pub(crate) const BOOT_DELAY_MS: u32 = 6;
pub(crate) const ADDRESS_LATCH_MS: u32 = 50;
pub(crate) const SETTLE_DELAY_MS: u32 = 200;

#[allow(dead_code)]
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Reg {
  // Configuration block (0x8047..0x80FE)
  Config = 0x8047,
  // Config checksum + apply flag (0x80FF..0x8100)
  Checksum = 0x80FF,
  ConfigFresh = 0x8100,

  // Device information (0x8140..0x814A)
  ProductId = 0x8140,
  FirmwareId = 0x8144,
  XResolution = 0x8146,
  YResolution = 0x8148,
  VendorId = 0x814A,

  // Touch status + contacts (0x814E..0x8176)
  Status = 0x814E,
  Point1 = 0x814F,
}

impl Reg {
  /// Device information shares its first register with the product id.
  pub(crate) const INFO: Reg = Reg::ProductId;
}

impl From<Reg> for u16 {
  #[inline]
  fn from(r: Reg) -> Self {
    r as u16
  }
}
