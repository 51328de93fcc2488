use embedded_hal_async::i2c::{I2c, SevenBitAddress};

use crate::reg::{Reg, MAX_WRITE};
use crate::{Error, Gt911};

impl<I, E, D, INT, RST> Gt911<'_, I, D, INT, RST>
where
  I: I2c<SevenBitAddress, Error = E>,
{
  /// Address the device with an empty write. Succeeds only if the chip ACKs.
  pub(crate) async fn probe(&mut self) -> Result<(), Error<E>> {
    self.i2c.write(self.address.into(), &[]).await.map_err(Error::I2c)
  }

  // Typed helpers
  pub(crate) async fn read<const N: usize>(&mut self, reg: Reg) -> Result<[u8; N], Error<E>> {
    let mut b = [0u8; N];
    self.read_bytes(reg, &mut b).await?;
    Ok(b)
  }

  pub(crate) async fn read_byte(&mut self, reg: Reg) -> Result<u8, Error<E>> {
    let [b] = self.read::<1>(reg).await?;
    Ok(b)
  }

  pub(crate) async fn write_byte(&mut self, reg: Reg, data: u8) -> Result<(), Error<E>> {
    self.write_bytes(reg, &[data]).await
  }

  /// Register address goes out big-endian, then a repeated start reads `buf.len()` bytes.
  pub(crate) async fn read_bytes(&mut self, reg: Reg, buf: &mut [u8]) -> Result<(), Error<E>> {
    let addr = u16::from(reg).to_be_bytes();
    self.i2c.write_read(self.address.into(), &addr, buf).await.map_err(Error::I2c)
  }

  pub(crate) async fn write_bytes(&mut self, reg: Reg, data: &[u8]) -> Result<(), Error<E>> {
    let len = data.len();
    if len > MAX_WRITE {
      return Err(Error::BufferOverflow);
    }
    let mut buf = [0u8; MAX_WRITE + 2];
    buf[..2].copy_from_slice(&u16::from(reg).to_be_bytes());
    buf[2..len + 2].copy_from_slice(data);
    self.i2c.write(self.address.into(), &buf[..len + 2]).await.map_err(Error::I2c)
  }
}
