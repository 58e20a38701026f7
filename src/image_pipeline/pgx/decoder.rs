//! PGX decoder implementation.
//!
//! Reads the three header lines, derives the sample layout, then consumes the
//! rest of the input as the raw sample plane. The plane length is the only
//! integrity check the format offers: it must hold exactly `width * height`
//! samples of the derived element size.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use tracing::{debug, instrument, warn};

use crate::image_pipeline::common::error::{PgxError, Result};
use crate::image_pipeline::pgx::header::HeaderInfo;
use crate::image_pipeline::pgx::layout::SampleLayout;
use crate::image_pipeline::pgx::reader::PgxReader;
use crate::image_pipeline::pgx::types::{DecodeConfig, DecodedGrid};

const HEADER_LINES: usize = 3;

/// Decoder for PGX images.
///
/// Holds no state besides its configuration, so one decoder can be shared
/// across threads and reused for any number of inputs.
#[derive(Debug, Clone, Default)]
pub struct PgxDecoder {
    config: DecodeConfig,
}

impl PgxDecoder {
    pub fn new(config: DecodeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decodes a PGX image from `input`.
    ///
    /// `source_name` identifies the input in errors and logs.
    ///
    /// # Returns
    ///
    /// * `Ok(DecodedGrid)` - the full grid, never a partial one
    /// * `Err(PgxError::FormatError)` - malformed header
    /// * `Err(PgxError::ValidationError)` - sample count differs from `width * height`
    /// * `Err(PgxError::IoError)` - the input could not be read
    ///
    /// # Examples
    ///
    /// ```
    /// use pgx_stats_rs::image_pipeline::{ElementKind, PgxDecoder};
    ///
    /// let bytes = b"PG ML + 8\n2 2\n255\n\x0a\x14\x1e\x28";
    /// let grid = PgxDecoder::default().decode("inline", &bytes[..]).unwrap();
    /// assert_eq!(grid.shape(), (2, 2));
    /// assert_eq!(grid.element_kind(), ElementKind::U8);
    /// assert_eq!(grid.to_rows(), vec![vec![10, 20], vec![30, 40]]);
    /// ```
    #[instrument(skip(self, input))]
    pub fn decode<R: BufRead>(&self, source_name: &str, mut input: R) -> Result<DecodedGrid> {
        let lines = read_header_lines(source_name, &mut input)?;
        let header = HeaderInfo::parse(
            source_name,
            [lines[0].as_str(), lines[1].as_str(), lines[2].as_str()],
            &self.config,
        )?;
        let layout = SampleLayout::from_header(&header);

        debug!(
            width = header.width,
            height = header.height,
            bit_depth = header.bit_depth,
            max_value = header.max_value,
            kind = %layout.kind,
            byte_order = ?layout.byte_order,
            "Parsed PGX header"
        );

        let mut raw = Vec::new();
        input
            .read_to_end(&mut raw)
            .map_err(|e| PgxError::io(source_name, e))?;

        let trailing = layout.trailing_bytes(raw.len());
        if trailing != 0 {
            if self.config.reject_partial_samples {
                return Err(PgxError::format(
                    source_name,
                    format!(
                        "sample plane of {} bytes is not a multiple of {}-byte samples",
                        raw.len(),
                        layout.element_bytes
                    ),
                ));
            }
            warn!(
                source = source_name,
                trailing, "Dropping trailing bytes that do not form a whole sample"
            );
            raw.truncate(raw.len() - trailing);
        }

        let expected = header.sample_count();
        let actual = layout.sample_count(raw.len());
        if actual != expected {
            return Err(PgxError::ValidationError {
                source_name: source_name.to_string(),
                expected,
                actual,
            });
        }

        let samples = layout.reinterpret(raw);
        debug!(samples = samples.len(), "Decoded sample plane");

        Ok(DecodedGrid::new(&header, samples))
    }

    /// Opens `path` and decodes it. The file is closed before returning, on
    /// success and on every error.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn decode_path<P: AsRef<Path>>(&self, path: P) -> Result<DecodedGrid> {
        let path = path.as_ref();
        let source_name = path.display().to_string();

        let file = File::open(path).map_err(|e| PgxError::io(&source_name, e))?;
        self.decode(&source_name, BufReader::new(file))
    }
}

impl PgxReader for PgxDecoder {
    fn read_pgx(&self, source_name: &str, input: &mut dyn BufRead) -> Result<DecodedGrid> {
        self.decode(source_name, input)
    }
}

/// Decodes the PGX file at `path` with the default configuration.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<DecodedGrid> {
    PgxDecoder::default().decode_path(path)
}

/// Reads the header lines, ASCII-decoded and trimmed.
///
/// The last line may end at EOF without a newline; a line with no bytes at
/// all means the header is incomplete.
fn read_header_lines<R: BufRead>(source_name: &str, input: &mut R) -> Result<Vec<String>> {
    let mut lines = Vec::with_capacity(HEADER_LINES);
    for index in 0..HEADER_LINES {
        let mut buf = Vec::new();
        let read = input
            .read_until(b'\n', &mut buf)
            .map_err(|e| PgxError::io(source_name, e))?;
        if read == 0 {
            return Err(PgxError::format(
                source_name,
                format!("expected {HEADER_LINES} header lines, found {index}"),
            ));
        }
        if !buf.is_ascii() {
            return Err(PgxError::format(
                source_name,
                format!("header line {} is not ASCII", index + 1),
            ));
        }
        let line = String::from_utf8(buf).map_err(|_| {
            PgxError::format(source_name, format!("header line {} is not ASCII", index + 1))
        })?;
        lines.push(line.trim().to_string());
    }
    Ok(lines)
}
