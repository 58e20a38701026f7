//! Image processing pipeline module
//!
//! This module provides PGX decoding into typed sample grids, summary
//! statistics over decoded grids, and the orchestration that ties both
//! together for single files and batches.

pub mod pgx;
pub mod stats;
pub mod conversions;
pub mod common;

pub use common::{
    PgxError,
    Result,
};

pub use pgx::{
    ByteOrder,
    DecodeConfig,
    DecodeConfigBuilder,
    DecodedGrid,
    ElementKind,
    GridSamples,
    HeaderInfo,
    PgxDecoder,
    PgxReader,
    SampleLayout,
    decode_file,
};

pub use stats::{
    GridStats,
    ImageSummary,
};

pub use conversions::{
    PgxStatsPipeline,
};
