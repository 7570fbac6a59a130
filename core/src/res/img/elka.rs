// Image dimensions: 16x24
// Grayscale encoding: 8-bit, 1 byte per pixel
// Layout: row-major, top row first, left to right, no header or padding
// Byte values: 0x00=Black, 0xff=White

use crate::bitmap::Bitmap;

pub const WIDTH: usize = 16;
pub const HEIGHT: usize = 24;
pub const PIXEL_SIZE: usize = 1;
pub const LENGTH: usize = WIDTH * HEIGHT * PIXEL_SIZE;

pub static ELKA: &[u8; LENGTH] = include_bytes!("./elka.bin");

pub static ELKA_BITMAP: Bitmap<'static> = Bitmap::new(ELKA, WIDTH, HEIGHT, PIXEL_SIZE);
