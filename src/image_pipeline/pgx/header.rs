//! PGX header parsing

use crate::image_pipeline::common::error::{PgxError, Result};
use crate::image_pipeline::pgx::types::DecodeConfig;

/// Magic token opening the first header line.
pub const PGX_MAGIC: &str = "PG";

/// Byte order of multi-byte samples in the raw plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Most significant byte first, order code `ML`
    BigEndian,
    /// Least significant byte first, order code `LM`
    LittleEndian,
}

impl ByteOrder {
    /// `LM` selects little-endian. Every other code, `ML` included, is big-endian.
    pub fn from_code(code: &str) -> Self {
        if code == "LM" {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        }
    }

    /// Accepts only `ML` and `LM`.
    pub fn from_code_strict(code: &str) -> Option<Self> {
        match code {
            "ML" => Some(ByteOrder::BigEndian),
            "LM" => Some(ByteOrder::LittleEndian),
            _ => None,
        }
    }
}

/// Parsed contents of the three PGX header lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub byte_order: ByteOrder,
    pub signed: bool,
    /// Bits per sample as declared by the file
    pub bit_depth: u32,
    pub width: usize,
    pub height: usize,
    /// Declared dynamic range. Informational, never checked against `bit_depth`.
    pub max_value: i64,
}

impl HeaderInfo {
    /// Parses the trimmed header lines.
    ///
    /// `width * height` is guaranteed to fit in `usize` on success.
    pub fn parse(source_name: &str, lines: [&str; 3], config: &DecodeConfig) -> Result<Self> {
        let [mode_line, dims_line, max_line] = lines;

        let tokens: Vec<&str> = mode_line.split_whitespace().collect();
        if tokens.len() < 4 {
            return Err(PgxError::format(
                source_name,
                format!("expected `PG <order> <sign> <depth>`, found {mode_line:?}"),
            ));
        }
        if tokens[0] != PGX_MAGIC {
            return Err(PgxError::format(
                source_name,
                format!("bad magic {:?} in {mode_line:?}", tokens[0]),
            ));
        }

        let byte_order = if config.strict_byte_order {
            ByteOrder::from_code_strict(tokens[1]).ok_or_else(|| {
                PgxError::format(
                    source_name,
                    format!("unknown byte order code {:?}", tokens[1]),
                )
            })?
        } else {
            ByteOrder::from_code(tokens[1])
        };

        let signed = tokens[2] == "-";

        let bit_depth: u32 = tokens[3].parse().map_err(|_| {
            PgxError::format(source_name, format!("bit depth {:?} is not an integer", tokens[3]))
        })?;
        if bit_depth == 0 {
            return Err(PgxError::format(source_name, "bit depth must be positive"));
        }

        let (width, height) = parse_dimensions(source_name, dims_line)?;

        let max_value: i64 = max_line.parse().map_err(|_| {
            PgxError::format(source_name, format!("max value {max_line:?} is not an integer"))
        })?;

        Ok(HeaderInfo {
            byte_order,
            signed,
            bit_depth,
            width,
            height,
            max_value,
        })
    }

    /// Number of samples the raw plane must hold.
    pub fn sample_count(&self) -> usize {
        self.width * self.height
    }
}

fn parse_dimensions(source_name: &str, line: &str) -> Result<(usize, usize)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let [width, height] = tokens[..] else {
        return Err(PgxError::format(
            source_name,
            format!("expected `<width> <height>`, found {line:?}"),
        ));
    };

    let parse = |token: &str, what: &str| -> Result<usize> {
        match token.parse::<usize>() {
            Ok(0) => Err(PgxError::format(source_name, format!("{what} must be positive"))),
            Ok(value) => Ok(value),
            Err(_) => Err(PgxError::format(
                source_name,
                format!("{what} {token:?} is not an integer"),
            )),
        }
    };
    let width = parse(width, "width")?;
    let height = parse(height, "height")?;

    if width.checked_mul(height).is_none() {
        return Err(PgxError::format(
            source_name,
            format!("dimensions {width}x{height} overflow the sample count"),
        ));
    }

    Ok((width, height))
}
