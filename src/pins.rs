use core::convert::Infallible;
use core::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::{ErrorType, OutputPin};

/// A GPIO that can switch between driving the line and floating as an input.
///
/// The GT911 reset sequence needs both the RST and INT lines driven for a few
/// milliseconds and then handed back: RST is left to the external pull-up and
/// INT becomes the chip's interrupt output. Most HALs expose this as a
/// flexible pin (`esp_hal::gpio::Flex`, for example); wrap it in this trait.
pub trait FlexPin: OutputPin {
  /// Reconfigure the pin as a push-pull output.
  fn set_as_output(&mut self) -> Result<(), Self::Error>;

  /// Stop driving the line and reconfigure the pin as an input.
  fn set_as_input(&mut self) -> Result<(), Self::Error>;
}

/// The INT line: a [`FlexPin`] that can also raise a falling-edge interrupt.
///
/// The driver only enables and disables the interrupt. The host's interrupt
/// handler is expected to call [`InterruptFlag::signal`] on the flag passed to
/// [`crate::Gt911::new`].
pub trait InterruptPin: FlexPin {
  /// Reconfigure as an input and enable the falling-edge interrupt.
  fn listen(&mut self) -> Result<(), Self::Error>;

  /// Disable the interrupt.
  fn unlisten(&mut self) -> Result<(), Self::Error>;
}

/// Placeholder for an unconnected INT or RST line.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPin;

impl ErrorType for NoPin {
  type Error = Infallible;
}

impl OutputPin for NoPin {
  fn set_low(&mut self) -> Result<(), Self::Error> {
    Ok(())
  }

  fn set_high(&mut self) -> Result<(), Self::Error> {
    Ok(())
  }
}

impl FlexPin for NoPin {
  fn set_as_output(&mut self) -> Result<(), Self::Error> {
    Ok(())
  }

  fn set_as_input(&mut self) -> Result<(), Self::Error> {
    Ok(())
  }
}

impl InterruptPin for NoPin {
  fn listen(&mut self) -> Result<(), Self::Error> {
    Ok(())
  }

  fn unlisten(&mut self) -> Result<(), Self::Error> {
    Ok(())
  }
}

/// INT and RST lines handed to the driver. Either may be absent.
#[derive(Debug)]
pub struct Pins<INT, RST> {
  pub int: Option<INT>,
  pub rst: Option<RST>,
}

impl<INT, RST> Pins<INT, RST> {
  pub const fn new(int: INT, rst: RST) -> Self {
    Self { int: Some(int), rst: Some(rst) }
  }

  pub const fn interrupt_only(int: INT) -> Self {
    Self { int: Some(int), rst: None }
  }

  pub const fn reset_only(rst: RST) -> Self {
    Self { int: None, rst: Some(rst) }
  }
}

impl Pins<NoPin, NoPin> {
  /// Neither line is wired; no reset is performed and only polling mode is useful.
  pub const fn none() -> Self {
    Self { int: None, rst: None }
  }
}

/// Latched "the chip pulled INT low" flag shared between an ISR and the driver.
///
/// Meant to live in a `static`:
///
/// ```ignore
/// static TOUCH_IRQ: InterruptFlag = InterruptFlag::new();
///
/// #[handler]
/// fn gpio_handler() {
///   TOUCH_IRQ.signal();
/// }
/// ```
#[derive(Debug)]
pub struct InterruptFlag(AtomicBool);

impl InterruptFlag {
  pub const fn new() -> Self {
    Self(AtomicBool::new(false))
  }

  /// Latch the flag. Safe to call from interrupt context, on any core.
  pub fn signal(&self) {
    #[cfg(target_has_atomic = "8")]
    self.0.store(true, Ordering::Release);

    #[cfg(not(target_has_atomic = "8"))]
    critical_section::with(|_| self.0.store(true, Ordering::Release));
  }

  /// Whether an edge has been latched since the last [`InterruptFlag::take`].
  pub fn is_set(&self) -> bool {
    self.0.load(Ordering::Acquire)
  }

  /// Read and clear the flag in one step. An edge signalled concurrently is
  /// either returned now or left latched for the next call.
  #[cfg(target_has_atomic = "8")]
  pub fn take(&self) -> bool {
    self.0.swap(false, Ordering::AcqRel)
  }

  /// Read and clear the flag in one step. An edge signalled concurrently is
  /// either returned now or left latched for the next call.
  #[cfg(not(target_has_atomic = "8"))]
  pub fn take(&self) -> bool {
    // no swap here; `signal` takes the same critical section
    critical_section::with(|_| {
      let set = self.0.load(Ordering::Acquire);
      self.0.store(false, Ordering::Release);
      set
    })
  }

  pub(crate) fn clear(&self) {
    self.0.store(false, Ordering::Release);
  }
}

impl Default for InterruptFlag {
  fn default() -> Self {
    Self::new()
  }
}
