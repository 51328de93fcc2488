//! Feed a GUI pointer input from interrupt-gated samples.
#![allow(unused)]
use embedded_hal_async::{
  delay::DelayNs,
  i2c::{I2c, SevenBitAddress},
};
use gt911::{Address, FlexPin, Gt911, InterruptFlag, InterruptPin, Mode, Pins, Pointer, PointerState, Rotation};

static TOUCH_IRQ: InterruptFlag = InterruptFlag::new();

// Call `TOUCH_IRQ.signal()` from the GPIO interrupt handler wired to INT.

#[allow(dead_code)]
async fn main_async<I2C, D, F, INT, RST, E>(
  i2c: I2C,
  delay: D,
  mut frame: F,
  int: INT,
  rst: RST,
) -> Result<(), gt911::Error<E>>
where
  I2C: I2c<SevenBitAddress, Error = E>,
  D: DelayNs,
  F: DelayNs,
  INT: InterruptPin,
  RST: FlexPin,
{
  let mut touch = Gt911::new(i2c, delay, Address::Primary, Pins::new(int, rst), &TOUCH_IRQ);
  touch.begin().await?;
  touch.set_rotation(Rotation::Deg180)?;

  let mut pointer = Pointer::new(320, 240);
  loop {
    // without a new edge this repeats the previous event, so a held finger stays pressed
    let ev = touch.read_pointer(&mut pointer, Mode::Interrupt).await?;
    match ev.state {
      PointerState::Pressed => { /* hand (ev.x, ev.y) to the GUI */ }
      PointerState::Released => {}
    }
    frame.delay_ms(16).await;
  }
}

fn main() {}
