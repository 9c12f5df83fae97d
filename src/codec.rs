//! Conversion of 8-bit-per-channel pixels into the big-endian RGB565 stream written by
//! `RAMWR`. Channels are truncated by masking, not rounded, so the output is bit-for-bit what
//! the panels have always been fed.

use core::iter::FusedIterator;
use core::slice;

use itertools::{Itertools, Tuples};

pub const BLACK: u16 = 0x0000;
pub const BLUE: u16 = 0x001F;
pub const GREEN: u16 = 0x07E0;
pub const RED: u16 = 0xF800;
pub const CYAN: u16 = 0x07FF;
pub const MAGENTA: u16 = 0xF81F;
pub const YELLOW: u16 = 0xFFE0;
pub const WHITE: u16 = 0xFFFF;

/// Pack one pixel into RGB565: 5 bits red, 6 bits green, 5 bits blue, high to low.
pub fn rgb565(r: u8, g: u8, b: u8) -> u16 {
    let red = (r as u16 & 0xF8) << 8;
    let green = (g as u16 & 0xFC) << 3;
    let blue = (b as u16 & 0xF8) >> 3;
    red | green | blue
}

/// Pixel data handed to the driver.
///
/// All raw variants are row-major. Anything that is not already RGB is normalized to three
/// channels before encoding.
#[derive(Clone, Copy, Debug)]
pub enum PixelSource<'a> {
    /// Packed `R, G, B` bytes, three per pixel.
    Rgb888(&'a [u8]),
    /// One `[R, G, B]` array per pixel.
    Pixels(&'a [[u8; 3]]),
    /// Packed `R, G, B, A` bytes. Alpha is ignored.
    Rgba8888(&'a [u8]),
    /// One gray level byte per pixel.
    Luma8(&'a [u8]),
    /// Bytes already in big-endian RGB565, written unchanged.
    Encoded(&'a [u8]),
}

impl<'a> PixelSource<'a> {
    /// Number of bytes this source puts on the bus. Trailing partial pixels are dropped.
    pub fn byte_len(&self) -> usize {
        match self {
            PixelSource::Rgb888(buf) => buf.len() / 3 * 2,
            PixelSource::Pixels(px) => px.len() * 2,
            PixelSource::Rgba8888(buf) => buf.len() / 4 * 2,
            PixelSource::Luma8(buf) => buf.len() * 2,
            PixelSource::Encoded(buf) => buf.len(),
        }
    }

    /// The pre-encoded bytes, if this source needs no conversion.
    pub fn encoded(&self) -> Option<&'a [u8]> {
        match *self {
            PixelSource::Encoded(buf) => Some(buf),
            _ => None,
        }
    }

    /// Iterate the RGB565 bytes of this source.
    pub fn bytes(&self) -> Rgb565Bytes<Channels<'a>> {
        Rgb565Bytes::new(self.channels())
    }

    fn channels(&self) -> Channels<'a> {
        match *self {
            PixelSource::Rgb888(buf) => Channels::Rgb(buf.iter().copied().tuples()),
            PixelSource::Pixels(px) => Channels::Pixels(px.iter()),
            PixelSource::Rgba8888(buf) => Channels::Rgba(buf.chunks_exact(4)),
            PixelSource::Luma8(buf) => Channels::Luma(buf.iter()),
            PixelSource::Encoded(_) => Channels::Empty,
        }
    }
}

/// RGB triples normalized from any `PixelSource` layout.
pub enum Channels<'a> {
    Rgb(Tuples<core::iter::Copied<slice::Iter<'a, u8>>, (u8, u8, u8)>),
    Pixels(slice::Iter<'a, [u8; 3]>),
    Rgba(slice::ChunksExact<'a, u8>),
    Luma(slice::Iter<'a, u8>),
    Empty,
}

impl<'a> Iterator for Channels<'a> {
    type Item = (u8, u8, u8);

    fn next(&mut self) -> Option<(u8, u8, u8)> {
        match self {
            Channels::Rgb(it) => it.next(),
            Channels::Pixels(it) => it.next().map(|&[r, g, b]| (r, g, b)),
            Channels::Rgba(it) => it.next().map(|px| (px[0], px[1], px[2])),
            Channels::Luma(it) => it.next().map(|&l| (l, l, l)),
            Channels::Empty => None,
        }
    }
}

/// Iterator adaptor turning RGB triples into the RGB565 byte stream, high byte first.
#[derive(Clone, Debug)]
pub struct Rgb565Bytes<I> {
    pixels: I,
    low: Option<u8>,
}

impl<I> Rgb565Bytes<I>
where
    I: Iterator<Item = (u8, u8, u8)>,
{
    pub fn new(pixels: I) -> Self {
        Rgb565Bytes { pixels, low: None }
    }
}

impl<I> Iterator for Rgb565Bytes<I>
where
    I: Iterator<Item = (u8, u8, u8)>,
{
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if let Some(low) = self.low.take() {
            return Some(low);
        }
        let (r, g, b) = self.pixels.next()?;
        let [high, low] = rgb565(r, g, b).to_be_bytes();
        self.low = Some(low);
        Some(high)
    }
}

impl<I> FusedIterator for Rgb565Bytes<I> where I: FusedIterator<Item = (u8, u8, u8)> {}
