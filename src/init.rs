use embedded_hal::digital::PinState;
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::reg::*;
use crate::{Address, Error, FlexPin, Gt911, InterruptPin, Pins};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum ResetState {
  Unpowered,
  Resetting,
  AddressSelect,
  Released,
  Ready,
}

/// Pin configuration changes made so far, undone in reverse on failure.
#[derive(Debug, Default, Clone, Copy)]
struct Acquired {
  rst_driven: bool,
  int_driven: bool,
  int_listening: bool,
}

impl<'a, I, E, D, INT, RST> Gt911<'a, I, D, INT, RST>
where
  I: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  INT: InterruptPin,
  RST: FlexPin,
{
  /// Bring the controller up.
  ///
  /// Runs the reset/address-select sequence when a RST line is wired, arms the
  /// INT interrupt when an INT line is wired, probes the chip and makes a
  /// best-effort read of the device information. On failure every pin change
  /// made so far is rolled back before the error is returned.
  pub async fn begin(&mut self) -> Result<(), Error<E>> {
    info!("GT911: initializing at address {:#x}", u8::from(self.address));
    self.ready = false;

    let mut acquired = Acquired::default();
    if let Err(e) = self.bring_up(&mut acquired).await {
      error!("GT911: bring-up failed, releasing pins");
      self.roll_back(acquired);
      return Err(e);
    }

    self.ready = true;
    info!("GT911: initialized");
    Ok(())
  }

  /// Stop listening on INT, release both lines and hand the peripherals back.
  pub fn deinit(mut self) -> (I, D, Pins<INT, RST>) {
    self.roll_back(Acquired { rst_driven: true, int_driven: true, int_listening: true });
    self.irq.clear();
    info!("GT911: deinitialized");
    (self.i2c, self.delay, self.pins)
  }

  async fn bring_up(&mut self, acquired: &mut Acquired) -> Result<(), Error<E>> {
    if self.pins.rst.is_some() {
      self.delay.delay_ms(POWER_ON_DELAY_MS).await;
      self.reset(acquired).await?;
      self.delay.delay_ms(SETTLE_DELAY_MS).await;
    }

    if self.pins.int.is_some() {
      self.with_int(|int| int.listen())?;
      acquired.int_driven = false;
      acquired.int_listening = true;
    }
    self.irq.clear();

    self.probe().await?;

    match self.fetch_info().await {
      Ok(info) => {
        info!(
          "GT911: product {:?}, firmware {:#x}, resolution {}x{}",
          info.product_id,
          info.firmware_id,
          info.x_resolution,
          info.y_resolution
        );
      }
      Err(_) => warn!("GT911: device info unavailable, using default resolution"),
    }
    Ok(())
  }

  /// Reset pulse with the INT level that selects our I²C address.
  ///
  /// The order and the hold times are dictated by the chip: shortening or
  /// reordering them latches the wrong address or leaves it in reset.
  async fn reset(&mut self, acquired: &mut Acquired) -> Result<(), Error<E>> {
    let mut state = ResetState::Unpowered;

    loop {
      debug!("GT911: reset {:?}", state);

      match state {
        ResetState::Unpowered => {
          self.with_int(|int| int.set_as_output())?;
          acquired.int_driven = self.pins.int.is_some();
          self.with_rst(|rst| rst.set_as_output())?;
          acquired.rst_driven = true;
          state = ResetState::Resetting;
        }

        ResetState::Resetting => {
          self.with_int(|int| int.set_low())?;
          self.with_rst(|rst| rst.set_low())?;
          self.delay.delay_ms(RESET_HOLD_MS).await;
          state = ResetState::AddressSelect;
        }

        ResetState::AddressSelect => {
          let level = PinState::from(self.address == Address::Secondary);
          self.with_int(|int| int.set_state(level))?;
          self.delay.delay_us(ADDRESS_SELECT_US).await;
          state = ResetState::Released;
        }

        ResetState::Released => {
          self.with_rst(|rst| rst.set_as_input())?;
          acquired.rst_driven = false;
          self.delay.delay_ms(BOOT_DELAY_MS).await;
          state = ResetState::Ready;
        }

        ResetState::Ready => {
          self.with_int(|int| int.set_low())?;
          self.delay.delay_ms(ADDRESS_LATCH_MS).await;
          return Ok(());
        }
      }
    }
  }

  fn roll_back(&mut self, acquired: Acquired) {
    if let Some(int) = self.pins.int.as_mut() {
      if acquired.int_listening && int.unlisten().is_err() {
        warn!("GT911: failed to disable INT interrupt");
      }
      if acquired.int_driven && int.set_as_input().is_err() {
        warn!("GT911: failed to release INT");
      }
    }
    if let Some(rst) = self.pins.rst.as_mut() {
      if acquired.rst_driven && rst.set_as_input().is_err() {
        warn!("GT911: failed to release RST");
      }
    }
  }

  fn with_int(&mut self, f: impl FnOnce(&mut INT) -> Result<(), INT::Error>) -> Result<(), Error<E>> {
    match self.pins.int.as_mut() {
      Some(int) => f(int).map_err(|_| Error::Pin),
      None => Ok(()),
    }
  }

  fn with_rst(&mut self, f: impl FnOnce(&mut RST) -> Result<(), RST::Error>) -> Result<(), Error<E>> {
    match self.pins.rst.as_mut() {
      Some(rst) => f(rst).map_err(|_| Error::Pin),
      None => Ok(()),
    }
  }
}
