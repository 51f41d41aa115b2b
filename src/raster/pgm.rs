//! Binary grayscale rasters (PGM, `P5` variant).
//!
//! # Layout
//! ```text
//! line 1:  P5\n             (magic, exact bytes)
//! line 2:  <width> <height>\n
//! line 3:  <maxval>\n       (must be <= 255)
//! then:    width * height bytes, row-major, top row first
//! ```
//!
//! Header comments (`#`) are not accepted. Sample bytes are kept verbatim;
//! nothing is rescaled against `maxval`.
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

use crate::error::{Error, FormatError};

const MAGIC: &[u8] = b"P5\n";

/// Upper bound on the sample buffer reserved before any body byte is read.
const MAX_PREALLOC: usize = 1 << 16;

/// A `width x height` grid of 8-bit samples stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: usize,
    pub height: usize,
    data: Vec<u8>,
}

impl RasterImage {
    /// Wraps row-major samples; `None` if the length is not `width * height`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<RasterImage> {
        if width.checked_mul(height)? != data.len() {
            return None;
        }
        Some(RasterImage { width, height, data })
    }

    /// A raster with every sample set to `value`.
    pub fn filled(width: usize, height: usize, value: u8) -> RasterImage {
        RasterImage { width, height, data: vec![value; width * height] }
    }

    /// Decodes one raster from a buffered byte stream.
    pub fn decode<R: BufRead>(reader: &mut R) -> Result<RasterImage, FormatError> {
        let magic = read_header_line(reader)?;
        if magic != MAGIC {
            return Err(FormatError::BadMagic);
        }

        let dims_line = read_header_line(reader)?;
        let (width, height) = parse_dimensions(&dims_line)?;

        let maxval_line = read_header_line(reader)?;
        let maxval = parse_maxval(&maxval_line)?;
        if maxval > 255 {
            return Err(FormatError::MaxvalTooLarge(maxval));
        }

        let expected = width
            .checked_mul(height)
            .ok_or_else(|| FormatError::BadDimensions(lossy(&dims_line)))?;

        let mut data = Vec::with_capacity(expected.min(MAX_PREALLOC));
        reader.take(expected as u64).read_to_end(&mut data)?;
        if data.len() < expected {
            return Err(FormatError::Truncated { expected, actual: data.len() });
        }

        Ok(RasterImage { width, height, data })
    }

    /// Decodes an in-memory raster.
    pub fn from_bytes(bytes: &[u8]) -> Result<RasterImage, FormatError> {
        let mut cursor = bytes;
        RasterImage::decode(&mut cursor)
    }

    /// Opens and decodes a raster file. The file is closed before returning.
    pub fn open(path: &Path) -> Result<RasterImage, Error> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let mut reader = BufReader::new(file);
        RasterImage::decode(&mut reader).map_err(|e| Error::format(path, e))
    }

    /// Writes the raster as `P5` with a max value of 255.
    pub fn encode<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write!(writer, "P5\n{} {}\n255\n", self.width, self.height)?;
        writer.write_all(&self.data)
    }

    /// Encodes into a fresh byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() + 16);
        // Writing into a Vec cannot fail.
        let _ = self.encode(&mut out);
        out
    }

    /// Sample at `[row][col]`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// One row of samples.
    pub fn row(&self, row: usize) -> Option<&[u8]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        self.data.get(start..start + self.width)
    }

    /// Iterates rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks_exact panics on 0; a zero-width image has no samples anyway.
        self.data.chunks_exact(self.width.max(1))
    }

    /// Samples in row-major order.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Converts to an `image` grayscale buffer for PNG export.
    pub fn to_gray_image(&self) -> Option<image::GrayImage> {
        let width = u32::try_from(self.width).ok()?;
        let height = u32::try_from(self.height).ok()?;
        image::GrayImage::from_raw(width, height, self.data.clone())
    }
}

// ---------------------------------------------------------------------------
// Header parsing
// ---------------------------------------------------------------------------

/// Reads up to and including the next `\n`. EOF before any byte is a
/// truncated header.
fn read_header_line<R: BufRead>(reader: &mut R) -> Result<Vec<u8>, FormatError> {
    let mut line = Vec::new();
    reader.read_until(b'\n', &mut line)?;
    Ok(line)
}

fn parse_dimensions(line: &[u8]) -> Result<(usize, usize), FormatError> {
    let text = std::str::from_utf8(line).map_err(|_| FormatError::BadDimensions(lossy(line)))?;
    let fields: Vec<&str> = text.split_whitespace().collect();
    match fields.as_slice() {
        [w, h] => {
            let width = w.parse().map_err(|_| FormatError::BadDimensions(lossy(line)))?;
            let height = h.parse().map_err(|_| FormatError::BadDimensions(lossy(line)))?;
            Ok((width, height))
        }
        _ => Err(FormatError::BadDimensions(lossy(line))),
    }
}

fn parse_maxval(line: &[u8]) -> Result<u32, FormatError> {
    std::str::from_utf8(line)
        .ok()
        .and_then(|text| text.trim().parse().ok())
        .ok_or_else(|| FormatError::BadMaxval(lossy(line)))
}

fn lossy(line: &[u8]) -> String {
    String::from_utf8_lossy(line).trim_end().to_owned()
}
