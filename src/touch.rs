use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::reg::*;
use crate::{Error, Gt911};

impl<I, E, D, INT, RST> Gt911<'_, I, D, INT, RST>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Sample the controller and return the number of active contacts.
  ///
  /// In [`Mode::Interrupt`] the latched interrupt flag is consumed first; with
  /// no edge since the last call this returns `Ok(0)` without any bus traffic.
  /// [`Mode::Polling`] always samples.
  ///
  /// The point buffer is refreshed only when the count is non-zero. It is never
  /// cleared, so after a zero count [`Gt911::points`] still holds the previous
  /// contacts: check the returned count, not the buffer.
  pub async fn touched(&mut self, mode: Mode) -> Result<u8, Error<E>> {
    self.ensure_ready()?;

    let sample = match mode {
      Mode::Interrupt => self.irq.take(),
      Mode::Polling => true,
    };
    if !sample {
      return Ok(0);
    }

    let contacts = self.read_touch_count().await;
    if contacts > 0 {
      self.read_touch_points().await?;
    }
    Ok(contacts)
  }

  /// Select how reported coordinates are reoriented.
  ///
  /// Only [`Rotation::Deg0`] and [`Rotation::Deg180`] are supported. Quarter
  /// turns need an axis swap plus an aspect adjustment and are rejected; the
  /// previous rotation stays in effect.
  pub fn set_rotation(&mut self, rotation: Rotation) -> Result<(), Error<E>> {
    match rotation {
      Rotation::Deg0 | Rotation::Deg180 => {
        self.rotation = rotation;
        Ok(())
      }
      Rotation::Deg90 | Rotation::Deg270 => Err(Error::UnsupportedRotation(rotation)),
    }
  }

  /// Wait up to ~20 ms for the status byte to report fresh data.
  ///
  /// A ready status with a valid count (< 5) is acknowledged by writing 0 back
  /// to the status register. Anything else, a failed read included, is polled
  /// again 1 ms later. Returns 0 if the window expires.
  pub(crate) async fn read_touch_count(&mut self) -> u8 {
    for _ in 0..TOUCH_POLL_ATTEMPTS {
      match self.read_byte(Reg::Status).await {
        Ok(status) => {
          let count = status & STATUS_COUNT;
          if status & STATUS_READY != 0 && (count as usize) < MAX_CONTACTS {
            // a lost ack only makes the chip report the same count again
            if self.write_byte(Reg::Status, 0).await.is_err() {
              warn!("GT911: failed to acknowledge touch status");
            }
            return count;
          }
        }
        Err(_) => debug!("GT911: status read failed, polling again"),
      }
      self.delay.delay_ms(TOUCH_POLL_INTERVAL_MS).await;
    }
    0
  }

  /// Bulk-read all contact records and apply the configured rotation.
  pub(crate) async fn read_touch_points(&mut self) -> Result<(), Error<E>> {
    let raw: [u8; POINT_LEN * MAX_CONTACTS] = self.read(Reg::Point1).await?;
    let (x_res, y_res) = self.info.resolution_or_default();

    for (point, record) in self.points.iter_mut().zip(raw.chunks_exact(POINT_LEN)) {
      let mut p = TouchPoint::from_record(record);
      (p.x, p.y) = self.rotation.apply(p.x, p.y, x_res, y_res);
      *point = p;
    }
    Ok(())
  }
}

impl<I, D, INT, RST> Gt911<'_, I, D, INT, RST> {
  /// Contact in slot `index`, as of the last non-zero sample.
  pub fn point(&self, index: usize) -> Option<TouchPoint> {
    self.points.get(index).copied()
  }

  /// All contact slots, as of the last non-zero sample.
  pub fn points(&self) -> &[TouchPoint; MAX_CONTACTS] {
    &self.points
  }

  pub fn rotation(&self) -> Rotation {
    self.rotation
  }
}

/// Sampling discipline for [`Gt911::touched`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
  /// Sample only after the INT line fired.
  Interrupt,
  /// Sample on every call.
  Polling,
}

/// Logical reorientation of reported coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
  #[default]
  Deg0,
  Deg90,
  Deg180,
  Deg270,
}

impl Rotation {
  /// Map native coordinates through this rotation.
  ///
  /// Half turn reflects both axes against the resolution. Unsupported quarter
  /// turns are never stored on the driver and pass through unchanged here.
  pub fn apply(self, x: u16, y: u16, x_res: u16, y_res: u16) -> (u16, u16) {
    match self {
      Rotation::Deg180 => (x_res.saturating_sub(x), y_res.saturating_sub(y)),
      _ => (x, y),
    }
  }
}

/// One contact as reported by the chip.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchPoint {
  /// Chip-assigned id that tells simultaneous contacts apart.
  pub track_id: u8,
  pub x: u16,
  pub y: u16,
  /// Contact size, a rough pressure proxy.
  pub area: u16,
  pub reserved: u8,
}

impl TouchPoint {
  pub const fn new(track_id: u8, x: u16, y: u16, area: u16) -> Self {
    Self { track_id, x, y, area, reserved: 0 }
  }

  // track id, x, y, area (LE), reserved
  fn from_record(r: &[u8]) -> Self {
    Self {
      track_id: r[0],
      x: u16::from_le_bytes([r[1], r[2]]),
      y: u16::from_le_bytes([r[3], r[4]]),
      area: u16::from_le_bytes([r[5], r[6]]),
      reserved: r[7],
    }
  }
}

impl From<[u8; POINT_LEN]> for TouchPoint {
  fn from(b: [u8; POINT_LEN]) -> Self {
    Self::from_record(&b)
  }
}
