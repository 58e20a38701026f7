//! Storage layout derived from a PGX header

use std::fmt;

use crate::image_pipeline::pgx::header::{ByteOrder, HeaderInfo};
use crate::image_pipeline::pgx::types::GridSamples;

/// Concrete element type of a decoded grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
}

impl ElementKind {
    /// Picks the narrowest storage type holding `bit_depth` bits.
    ///
    /// Depths up to 8 use one byte, up to 16 two bytes, anything wider four.
    pub fn select(bit_depth: u32, signed: bool) -> Self {
        match (bit_depth, signed) {
            (0..=8, false) => ElementKind::U8,
            (0..=8, true) => ElementKind::I8,
            (9..=16, false) => ElementKind::U16,
            (9..=16, true) => ElementKind::I16,
            (_, false) => ElementKind::U32,
            (_, true) => ElementKind::I32,
        }
    }

    /// Bytes per stored element.
    pub const fn bytes(self) -> usize {
        match self {
            ElementKind::U8 | ElementKind::I8 => 1,
            ElementKind::U16 | ElementKind::I16 => 2,
            ElementKind::U32 | ElementKind::I32 => 4,
        }
    }

    pub const fn is_signed(self) -> bool {
        matches!(self, ElementKind::I8 | ElementKind::I16 | ElementKind::I32)
    }

    pub const fn label(self) -> &'static str {
        match self {
            ElementKind::U8 => "uint8",
            ElementKind::I8 => "int8",
            ElementKind::U16 => "uint16",
            ElementKind::I16 => "int16",
            ElementKind::U32 => "uint32",
            ElementKind::I32 => "int32",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How samples are laid out in the raw plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleLayout {
    pub element_bytes: usize,
    pub kind: ElementKind,
    pub byte_order: ByteOrder,
}

impl SampleLayout {
    pub fn from_header(header: &HeaderInfo) -> Self {
        let kind = ElementKind::select(header.bit_depth, header.signed);
        Self {
            element_bytes: kind.bytes(),
            kind,
            byte_order: header.byte_order,
        }
    }

    /// Whole samples contained in a plane of `plane_len` bytes.
    pub fn sample_count(&self, plane_len: usize) -> usize {
        plane_len / self.element_bytes
    }

    /// Bytes left over after the last whole sample.
    pub fn trailing_bytes(&self, plane_len: usize) -> usize {
        plane_len % self.element_bytes
    }

    /// Reinterprets the plane as samples of this layout, taking ownership of the buffer.
    ///
    /// Trailing bytes that do not form a whole sample are dropped.
    pub fn reinterpret(&self, raw: Vec<u8>) -> GridSamples {
        use ByteOrder::{BigEndian, LittleEndian};

        match (self.kind, self.byte_order) {
            (ElementKind::U8, _) => GridSamples::U8(raw),
            (ElementKind::I8, _) => GridSamples::I8(raw.into_iter().map(|b| b as i8).collect()),
            (ElementKind::U16, BigEndian) => GridSamples::U16(convert::<2, _>(&raw, u16::from_be_bytes)),
            (ElementKind::U16, LittleEndian) => GridSamples::U16(convert::<2, _>(&raw, u16::from_le_bytes)),
            (ElementKind::I16, BigEndian) => GridSamples::I16(convert::<2, _>(&raw, i16::from_be_bytes)),
            (ElementKind::I16, LittleEndian) => GridSamples::I16(convert::<2, _>(&raw, i16::from_le_bytes)),
            (ElementKind::U32, BigEndian) => GridSamples::U32(convert::<4, _>(&raw, u32::from_be_bytes)),
            (ElementKind::U32, LittleEndian) => GridSamples::U32(convert::<4, _>(&raw, u32::from_le_bytes)),
            (ElementKind::I32, BigEndian) => GridSamples::I32(convert::<4, _>(&raw, i32::from_be_bytes)),
            (ElementKind::I32, LittleEndian) => GridSamples::I32(convert::<4, _>(&raw, i32::from_le_bytes)),
        }
    }
}

fn convert<const N: usize, T>(raw: &[u8], from_bytes: fn([u8; N]) -> T) -> Vec<T> {
    raw.chunks_exact(N)
        .map(|chunk| {
            let mut bytes = [0u8; N];
            bytes.copy_from_slice(chunk);
            from_bytes(bytes)
        })
        .collect()
}
