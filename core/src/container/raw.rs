//! Raw pixel dumps: the bitmap bytes exactly as stored, no header.

use embedded_io::{Read, ReadExactError, Write};
use log::info;

use crate::bitmap::{self, Bitmap, BitmapError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawError {
    IoError(embedded_io::ErrorKind),
    UnexpectedEof,
    BufferTooSmall,
    Bitmap(BitmapError),
}

impl RawError {
    pub(crate) fn from_io_error(err: impl embedded_io::Error) -> Self {
        Self::IoError(err.kind())
    }

    fn from_read_exact_error<E: embedded_io::Error>(err: ReadExactError<E>) -> Self {
        match err {
            ReadExactError::UnexpectedEof => RawError::UnexpectedEof,
            ReadExactError::Other(e) => RawError::from_io_error(e),
        }
    }
}

impl From<BitmapError> for RawError {
    fn from(err: BitmapError) -> Self {
        RawError::Bitmap(err)
    }
}

type Result<T> = core::result::Result<T, RawError>;

pub fn expected_size(width: usize, height: usize, pixel_size: usize) -> Option<usize> {
    bitmap::byte_len(width, height, pixel_size)
}

pub fn write(file: &mut impl Write, bitmap: &Bitmap) -> Result<()> {
    file.write_all(bitmap.as_bytes()).map_err(RawError::from_io_error)?;
    file.flush().map_err(RawError::from_io_error)?;
    info!(
        "Wrote raw bitmap: width={}, height={}, bytes={}",
        bitmap.width(),
        bitmap.height(),
        bitmap.len()
    );
    Ok(())
}

pub fn read<'a>(
    file: &mut impl Read,
    width: usize,
    height: usize,
    pixel_size: usize,
    buffer: &'a mut [u8],
) -> Result<Bitmap<'a>> {
    if pixel_size == 0 {
        return Err(BitmapError::InvalidPixelSize.into());
    }
    let size = expected_size(width, height, pixel_size).ok_or(BitmapError::Overflow)?;
    let Some(buffer) = buffer.get_mut(..size) else {
        return Err(RawError::BufferTooSmall);
    };
    file.read_exact(buffer).map_err(RawError::from_read_exact_error)?;
    info!("Parsed raw bitmap: width={}, height={}", width, height);
    Ok(Bitmap::from_bytes(buffer, width, height, pixel_size)?)
}
