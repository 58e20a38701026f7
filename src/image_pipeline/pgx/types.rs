//! Decoded PGX data types and decoding configuration

use std::ops::Range;

use crate::image_pipeline::pgx::header::{ByteOrder, HeaderInfo};
use crate::image_pipeline::pgx::layout::ElementKind;

macro_rules! with_values {
    ($samples:expr, $values:ident => $body:expr) => {
        match $samples {
            $crate::image_pipeline::pgx::types::GridSamples::U8($values) => $body,
            $crate::image_pipeline::pgx::types::GridSamples::I8($values) => $body,
            $crate::image_pipeline::pgx::types::GridSamples::U16($values) => $body,
            $crate::image_pipeline::pgx::types::GridSamples::I16($values) => $body,
            $crate::image_pipeline::pgx::types::GridSamples::U32($values) => $body,
            $crate::image_pipeline::pgx::types::GridSamples::I32($values) => $body,
        }
    };
}

pub(crate) use with_values;

/// Row-major sample storage, one variant per element kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridSamples {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
    U32(Vec<u32>),
    I32(Vec<i32>),
}

impl GridSamples {
    pub fn element_kind(&self) -> ElementKind {
        match self {
            GridSamples::U8(_) => ElementKind::U8,
            GridSamples::I8(_) => ElementKind::I8,
            GridSamples::U16(_) => ElementKind::U16,
            GridSamples::I16(_) => ElementKind::I16,
            GridSamples::U32(_) => ElementKind::U32,
            GridSamples::I32(_) => ElementKind::I32,
        }
    }

    pub fn len(&self) -> usize {
        with_values!(self, values => values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sample at a flat index, widened to `i64`.
    pub fn get(&self, index: usize) -> Option<i64> {
        with_values!(self, values => values.get(index).map(|&v| i64::from(v)))
    }

    /// Samples in `range` widened to `i64`, or `None` if the range is out of bounds.
    pub fn widened(&self, range: Range<usize>) -> Option<Vec<i64>> {
        with_values!(self, values => values
            .get(range)
            .map(|slice| slice.iter().map(|&v| i64::from(v)).collect()))
    }
}

/// A decoded PGX image: a `height x width` grid of samples plus header metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedGrid {
    width: usize,
    height: usize,
    bit_depth: u32,
    max_value: i64,
    byte_order: ByteOrder,
    samples: GridSamples,
}

impl DecodedGrid {
    pub(crate) fn new(header: &HeaderInfo, samples: GridSamples) -> Self {
        debug_assert_eq!(samples.len(), header.sample_count());
        Self {
            width: header.width,
            height: header.height,
            bit_depth: header.bit_depth,
            max_value: header.max_value,
            byte_order: header.byte_order,
            samples,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(height, width)`, rows first.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn element_kind(&self) -> ElementKind {
        self.samples.element_kind()
    }

    pub fn bit_depth(&self) -> u32 {
        self.bit_depth
    }

    pub fn max_value(&self) -> i64 {
        self.max_value
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn samples(&self) -> &GridSamples {
        &self.samples
    }

    pub fn into_samples(self) -> GridSamples {
        self.samples
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.samples.get(row * self.width + col)
    }

    pub fn row(&self, row: usize) -> Option<Vec<i64>> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        self.samples.widened(start..start + self.width)
    }

    pub fn to_rows(&self) -> Vec<Vec<i64>> {
        (0..self.height).filter_map(|row| self.row(row)).collect()
    }
}

/// Configuration for PGX decoding
///
/// The defaults reproduce the lenient behavior of common PGX readers.
#[derive(Debug, Clone, Default)]
pub struct DecodeConfig {
    /// Reject order codes other than `ML`/`LM` instead of treating them as big-endian
    pub strict_byte_order: bool,
    /// Reject a raw plane whose length is not a multiple of the element size
    /// instead of dropping the trailing bytes
    pub reject_partial_samples: bool,
}

impl DecodeConfig {
    pub fn builder() -> DecodeConfigBuilder {
        DecodeConfigBuilder::default()
    }

    /// Both strict checks enabled.
    pub fn strict() -> Self {
        Self {
            strict_byte_order: true,
            reject_partial_samples: true,
        }
    }
}

/// Builder for DecodeConfig
#[derive(Default)]
pub struct DecodeConfigBuilder {
    strict_byte_order: Option<bool>,
    reject_partial_samples: Option<bool>,
}

impl DecodeConfigBuilder {
    pub fn strict_byte_order(mut self, strict: bool) -> Self {
        self.strict_byte_order = Some(strict);
        self
    }

    pub fn reject_partial_samples(mut self, reject: bool) -> Self {
        self.reject_partial_samples = Some(reject);
        self
    }

    pub fn build(self) -> DecodeConfig {
        let default = DecodeConfig::default();
        DecodeConfig {
            strict_byte_order: self.strict_byte_order.unwrap_or(default.strict_byte_order),
            reject_partial_samples: self
                .reject_partial_samples
                .unwrap_or(default.reject_partial_samples),
        }
    }
}
