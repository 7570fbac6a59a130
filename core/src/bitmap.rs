use embedded_graphics::{
    Pixel,
    image::ImageDrawable,
    pixelcolor::Gray8,
    prelude::{Dimensions, DrawTarget, OriginDimensions, Size},
    primitives::{PointsIter, Rectangle},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapError {
    LengthMismatch { expected: usize, actual: usize },
    InvalidPixelSize,
    Overflow,
}

type Result<T> = core::result::Result<T, BitmapError>;

/// Read-only view over a raw row-major bitmap.
///
/// Pixels are stored top to bottom, left to right, `pixel_size` bytes each,
/// without header or padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitmap<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    pixel_size: usize,
}

impl<'a> Bitmap<'a> {
    /// Wraps `data`, panicking if its length does not match the dimensions.
    ///
    /// Meant for `const`/`static` initializers where the panic turns into a
    /// build error. Use [`Bitmap::from_bytes`] for data read at runtime.
    pub const fn new(data: &'a [u8], width: usize, height: usize, pixel_size: usize) -> Self {
        assert!(pixel_size > 0, "pixel size must be non-zero");
        assert!(fits_u32(width) && fits_u32(height), "bitmap dimensions must fit in u32");
        assert!(
            matches!(byte_len(width, height, pixel_size), Some(len) if len == data.len()),
            "bitmap data length does not match width * height * pixel_size"
        );
        Self {
            data,
            width,
            height,
            pixel_size,
        }
    }

    pub fn from_bytes(
        data: &'a [u8],
        width: usize,
        height: usize,
        pixel_size: usize,
    ) -> Result<Self> {
        if pixel_size == 0 {
            return Err(BitmapError::InvalidPixelSize);
        }
        if !fits_u32(width) || !fits_u32(height) {
            return Err(BitmapError::Overflow);
        }
        let expected = byte_len(width, height, pixel_size).ok_or(BitmapError::Overflow)?;
        if data.len() != expected {
            return Err(BitmapError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            pixel_size,
        })
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    pub const fn pixel_size(&self) -> usize {
        self.pixel_size
    }

    pub const fn len(&self) -> usize {
        self.data.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub const fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    /// Bytes per row.
    pub const fn row_stride(&self) -> usize {
        self.width * self.pixel_size
    }

    /// Byte offset of the pixel at `(row, col)`.
    pub fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.height || col >= self.width {
            return None;
        }
        Some((row * self.width + col) * self.pixel_size)
    }

    pub fn pixel(&self, row: usize, col: usize) -> Option<&'a [u8]> {
        let start = self.index(row, col)?;
        self.data.get(start..start + self.pixel_size)
    }

    /// First channel of the pixel at `(row, col)`.
    pub fn luma(&self, row: usize, col: usize) -> Option<u8> {
        self.index(row, col).map(|index| self.data[index])
    }

    pub fn row(&self, row: usize) -> Option<&'a [u8]> {
        if row >= self.height {
            return None;
        }
        let stride = self.row_stride();
        self.data.get(row * stride..(row + 1) * stride)
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &'a [u8]> + 'a {
        let data = self.data;
        let stride = self.row_stride();
        (0..self.height).map(move |row| &data[row * stride..(row + 1) * stride])
    }
}

pub(crate) const fn byte_len(width: usize, height: usize, pixel_size: usize) -> Option<usize> {
    match width.checked_mul(height) {
        Some(pixels) => pixels.checked_mul(pixel_size),
        None => None,
    }
}

// Dimensions are reported to embedded-graphics as u32.
const fn fits_u32(value: usize) -> bool {
    value as u64 <= u32::MAX as u64
}

impl OriginDimensions for Bitmap<'_> {
    fn size(&self) -> Size {
        Size::new(
            u32::try_from(self.width).unwrap_or(u32::MAX),
            u32::try_from(self.height).unwrap_or(u32::MAX),
        )
    }
}

// Only the first channel of each pixel is drawn.
impl ImageDrawable for Bitmap<'_> {
    type Color = Gray8;

    fn draw<D>(&self, target: &mut D) -> core::result::Result<(), D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        let colors = self
            .data
            .chunks_exact(self.pixel_size)
            .map(|pixel| Gray8::new(pixel[0]));
        target.fill_contiguous(&self.bounding_box(), colors)
    }

    fn draw_sub_image<D>(
        &self,
        target: &mut D,
        area: &Rectangle,
    ) -> core::result::Result<(), D::Error>
    where
        D: DrawTarget<Color = Self::Color>,
    {
        let area = area.intersection(&self.bounding_box());
        let pixels = area.points().filter_map(|point| {
            let luma = self.luma(point.y as usize, point.x as usize)?;
            Some(Pixel(point - area.top_left, Gray8::new(luma)))
        });
        target.draw_iter(pixels)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use embedded_graphics::{
        Drawable,
        image::{Image, ImageDrawableExt},
        mock_display::MockDisplay,
        prelude::Point,
    };
    use std::vec::Vec;

    use super::*;

    // 3x2, two bytes per pixel
    #[rustfmt::skip]
    const DATA: [u8; 12] = [
        0x10, 0x11, 0x20, 0x21, 0x30, 0x31,
        0x40, 0x41, 0x50, 0x51, 0x60, 0x61,
    ];

    #[test]
    fn test_from_bytes_checks_length() {
        assert_eq!(
            Bitmap::from_bytes(&DATA[..11], 3, 2, 2),
            Err(BitmapError::LengthMismatch {
                expected: 12,
                actual: 11,
            })
        );
        assert_eq!(Bitmap::from_bytes(&DATA, 3, 2, 0), Err(BitmapError::InvalidPixelSize));
        assert_eq!(Bitmap::from_bytes(&DATA, usize::MAX, 2, 2), Err(BitmapError::Overflow));
        assert!(Bitmap::from_bytes(&DATA, 3, 2, 2).is_ok());
    }

    #[test]
    #[should_panic]
    fn test_new_panics_on_mismatch() {
        Bitmap::new(&DATA, 4, 2, 2);
    }

    #[test]
    #[should_panic]
    fn test_new_panics_on_overflow() {
        // product overflows usize
        Bitmap::new(&[], u32::MAX as usize, u32::MAX as usize, 2);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_from_bytes_rejects_wide_dimensions() {
        let wide = u32::MAX as usize + 1;
        assert_eq!(Bitmap::from_bytes(&[], wide, 0, 1), Err(BitmapError::Overflow));
        assert_eq!(Bitmap::from_bytes(&[], 0, wide, 1), Err(BitmapError::Overflow));
    }

    #[test]
    fn test_addressing() {
        let bitmap = Bitmap::new(&DATA, 3, 2, 2);
        assert_eq!(bitmap.row_stride(), 6);
        assert_eq!(bitmap.index(0, 0), Some(0));
        assert_eq!(bitmap.index(1, 2), Some(10));
        assert_eq!(bitmap.index(2, 0), None);
        assert_eq!(bitmap.index(0, 3), None);
        assert_eq!(bitmap.pixel(1, 1), Some(&[0x50, 0x51][..]));
        assert_eq!(bitmap.luma(0, 2), Some(0x30));
        assert_eq!(bitmap.luma(5, 5), None);
        assert_eq!(bitmap.row(1), Some(&DATA[6..]));
        assert_eq!(bitmap.row(2), None);
    }

    #[test]
    fn test_rows() {
        let bitmap = Bitmap::new(&DATA, 3, 2, 2);
        let rows = bitmap.rows();
        assert_eq!(rows.len(), 2);
        let joined: Vec<u8> = rows.flatten().copied().collect();
        assert_eq!(joined, DATA);
    }

    #[test]
    fn test_draw() {
        let bitmap = Bitmap::new(&DATA, 3, 2, 2);
        let mut display = MockDisplay::<Gray8>::new();
        Image::new(&bitmap, Point::zero()).draw(&mut display).unwrap();
        assert_eq!(display.get_pixel(Point::new(0, 0)), Some(Gray8::new(0x10)));
        assert_eq!(display.get_pixel(Point::new(2, 1)), Some(Gray8::new(0x60)));
        assert_eq!(display.get_pixel(Point::new(3, 0)), None);
    }

    #[test]
    fn test_draw_sub_image() {
        let bitmap = Bitmap::new(&DATA, 3, 2, 2);
        let area = Rectangle::new(Point::new(1, 1), Size::new(5, 5));
        let sub = bitmap.sub_image(&area);
        let mut display = MockDisplay::<Gray8>::new();
        Image::new(&sub, Point::zero()).draw(&mut display).unwrap();
        assert_eq!(display.get_pixel(Point::new(0, 0)), Some(Gray8::new(0x50)));
        assert_eq!(display.get_pixel(Point::new(1, 0)), Some(Gray8::new(0x60)));
        assert_eq!(display.get_pixel(Point::new(0, 1)), None);
    }
}
