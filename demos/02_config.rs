//! Read the configuration block, change the output resolution and write it back.
#![allow(unused)]
use embedded_hal_async::{
  delay::DelayNs,
  i2c::{I2c, SevenBitAddress},
};
use gt911::{Address, Gt911, InterruptFlag, Pins, Trigger};

#[allow(dead_code)]
async fn main_async<I2C, D, E>(i2c: I2C, delay: D) -> Result<(), gt911::Error<E>>
where
  I2C: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
{
  let irq = InterruptFlag::new();
  let mut touch = Gt911::new(i2c, delay, Address::Secondary, Pins::none(), &irq);
  touch.begin().await?;

  touch.read_config().await?;
  touch.config_mut().set_resolution(800, 480);
  touch.config_mut().set_interrupt_trigger(Trigger::FallingEdge);

  // Ok(false) when the chip already holds this block
  let _written = touch.write_config().await?;

  let (_touch_i2c, _delay, _pins) = touch.deinit();
  Ok(())
}

fn main() {}
