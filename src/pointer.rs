use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::reg::DEFAULT_RESOLUTION;
use crate::{Error, Gt911, Mode, TouchPoint};

impl<I, E, D, INT, RST> Gt911<'_, I, D, INT, RST>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  /// Sample once and translate the result into a single-pointer event.
  ///
  /// This is the shape GUI input devices (LVGL's pointer indev, Slint's
  /// `WindowEvent::Pointer*`) expect from a read callback. Only slot 0 is used.
  ///
  /// In [`Mode::Interrupt`] without a new edge nothing is read and the previous
  /// event is repeated: a finger held between two INT pulses stays pressed.
  pub async fn read_pointer(&mut self, pointer: &mut Pointer, mode: Mode) -> Result<PointerEvent, Error<E>> {
    self.ensure_ready()?;
    if mode == Mode::Interrupt && !self.irq.take() {
      return Ok(pointer.current());
    }

    let contacts = self.touched(Mode::Polling).await?;
    let event = pointer.update(contacts, self.points[0], self.info.resolution_or_default());
    if event.state == PointerState::Pressed {
      debug!("GT911: pressed at {}x{}", event.x, event.y);
    }
    Ok(event)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PointerState {
  Pressed,
  Released,
}

/// Pointer position in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PointerEvent {
  pub x: u16,
  pub y: u16,
  pub state: PointerState,
}

/// Maps chip coordinates onto a display and tracks press/release.
///
/// A release is reported at the position of the last press, so widgets see the
/// finger leave where it was. With no previous press the release lands on the
/// display centre.
#[derive(Debug, Clone, Copy)]
pub struct Pointer {
  width: u16,
  height: u16,
  last: Option<TouchPoint>,
  event: PointerEvent,
}

impl Pointer {
  pub const fn new(width: u16, height: u16) -> Self {
    let centre = PointerEvent { x: width / 2, y: height / 2, state: PointerState::Released };
    Self { width, height, last: None, event: centre }
  }

  /// Event produced by the last [`Pointer::update`]; released at the centre before the first.
  pub fn current(&self) -> PointerEvent {
    self.event
  }

  /// Fold one sample into an event.
  ///
  /// `resolution` is the chip's native resolution; a zero axis is treated as
  /// [`DEFAULT_RESOLUTION`].
  pub fn update(&mut self, contacts: u8, first: TouchPoint, resolution: (u16, u16)) -> PointerEvent {
    self.event = if contacts > 0 {
      self.last = Some(first);
      let (x, y) = self.scale(first, resolution);
      PointerEvent { x, y, state: PointerState::Pressed }
    } else {
      let (x, y) = match self.last.take() {
        Some(last) => self.scale(last, resolution),
        None => (self.width / 2, self.height / 2),
      };
      PointerEvent { x, y, state: PointerState::Released }
    };
    self.event
  }

  pub fn is_pressed(&self) -> bool {
    self.last.is_some()
  }

  fn scale(&self, p: TouchPoint, (x_res, y_res): (u16, u16)) -> (u16, u16) {
    (axis(p.x, x_res, self.width), axis(p.y, y_res, self.height))
  }
}

fn axis(v: u16, native: u16, display: u16) -> u16 {
  let native = if native == 0 { DEFAULT_RESOLUTION } else { native };
  let scaled = u32::from(v) * u32::from(display) / u32::from(native);
  scaled.min(u32::from(display.saturating_sub(1))) as u16
}
