//! PGX decoding module
//!
//! PGX is the single-component raster format used by JPEG 2000 conformance
//! suites: three ASCII header lines followed by a raw row-major sample plane.
//! This module parses the header, derives the storage layout and turns the
//! plane into a typed [`DecodedGrid`].

mod decoder;
mod header;
mod layout;
mod reader;
pub mod types;

#[cfg(test)]
mod tests;

pub use decoder::{PgxDecoder, decode_file};
pub use header::{ByteOrder, HeaderInfo, PGX_MAGIC};
pub use layout::{ElementKind, SampleLayout};
pub use reader::PgxReader;
pub use types::{DecodeConfig, DecodeConfigBuilder, DecodedGrid, GridSamples};
