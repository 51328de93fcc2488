//! Bring the controller up and poll for contacts.
#![allow(unused)]
use embedded_hal_async::{
  delay::DelayNs,
  i2c::{I2c, SevenBitAddress},
};
use gt911::{Address, FlexPin, Gt911, InterruptFlag, InterruptPin, Mode, Pins};

static TOUCH_IRQ: InterruptFlag = InterruptFlag::new();

#[allow(dead_code)]
async fn main_async<I2C, D, INT, RST, E>(i2c: I2C, delay: D, int: INT, rst: RST) -> Result<(), gt911::Error<E>>
where
  I2C: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  INT: InterruptPin,
  RST: FlexPin,
{
  let mut touch = Gt911::new(i2c, delay, Address::Primary, Pins::new(int, rst), &TOUCH_IRQ);
  touch.begin().await?;

  let mut id = [0u8; 4];
  touch.product_id(&mut id).await?;

  loop {
    let contacts = touch.touched(Mode::Polling).await?;
    for p in touch.points().iter().take(contacts as usize) {
      let _ = (p.track_id, p.x, p.y);
    }
  }
}

fn main() {}
