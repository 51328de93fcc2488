use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::reg::{Reg, DEFAULT_RESOLUTION, INFO_LEN};
use crate::{Error, Gt911};

impl<I, E, D, INT, RST> Gt911<'_, I, D, INT, RST>
where
  I: I2c<SevenBitAddress, Error = E>,
{
  /// Read the product id (ASCII, e.g. `b"911\0"`) into the front of `buf`.
  ///
  /// `buf` must hold at least 4 bytes; shorter buffers are rejected before any
  /// bus traffic.
  pub async fn product_id(&mut self, buf: &mut [u8]) -> Result<(), Error<E>> {
    let Some(id) = buf.get_mut(..4) else {
      return Err(Error::BufferTooSmall);
    };
    self.ensure_ready()?;
    id.fill(0);
    self.read_bytes(Reg::ProductId, id).await
  }

  /// Read the device information block and cache it.
  ///
  /// The cached copy supplies the resolution used by rotation and by the
  /// pointer adapter.
  pub async fn read_info(&mut self) -> Result<DeviceInfo, Error<E>> {
    self.ensure_ready()?;
    self.fetch_info().await
  }

  pub(crate) async fn fetch_info(&mut self) -> Result<DeviceInfo, Error<E>> {
    let buf: [u8; INFO_LEN] = self.read(Reg::INFO).await?;
    self.info = DeviceInfo::from(buf);
    Ok(self.info)
  }

  /// Last device information read from the chip. All zero until the first read.
  pub fn info(&self) -> &DeviceInfo {
    &self.info
  }
}

/// Static device descriptor at 0x8140..=0x814A.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceInfo {
  /// ASCII product id, not NUL-terminated.
  pub product_id: [u8; 4],
  pub firmware_id: u16,
  pub x_resolution: u16,
  pub y_resolution: u16,
  pub vendor_id: u8,
}

impl DeviceInfo {
  /// Product id as text, trimmed at the first NUL. `None` if it is not ASCII.
  pub fn product_id_str(&self) -> Option<&str> {
    let end = self.product_id.iter().position(|b| *b == 0).unwrap_or(4);
    let id = &self.product_id[..end];
    if id.is_ascii() {
      core::str::from_utf8(id).ok()
    } else {
      None
    }
  }

  /// Native resolution, with [`DEFAULT_RESOLUTION`] substituted for a zero axis.
  ///
  /// A zero axis means the block has not been read yet, or the read failed.
  pub fn resolution_or_default(&self) -> (u16, u16) {
    let or_default = |v: u16| if v == 0 { DEFAULT_RESOLUTION } else { v };
    (or_default(self.x_resolution), or_default(self.y_resolution))
  }
}

impl From<[u8; INFO_LEN]> for DeviceInfo {
  fn from(b: [u8; INFO_LEN]) -> Self {
    Self {
      product_id: [b[0], b[1], b[2], b[3]],
      firmware_id: u16::from_le_bytes([b[4], b[5]]),
      x_resolution: u16::from_le_bytes([b[6], b[7]]),
      y_resolution: u16::from_le_bytes([b[8], b[9]]),
      vendor_id: b[10],
    }
  }
}
