use std::io::{Cursor, Write};

use crate::image_pipeline::common::error::{PgxError, Result};
use crate::image_pipeline::pgx::{
    ByteOrder, DecodeConfig, DecodedGrid, ElementKind, GridSamples, HeaderInfo, PgxDecoder,
    PgxReader, SampleLayout, decode_file,
};

fn pgx_bytes(mode: &str, dims: &str, max_value: &str, plane: &[u8]) -> Vec<u8> {
    let mut data = format!("{mode}\n{dims}\n{max_value}\n").into_bytes();
    data.extend_from_slice(plane);
    data
}

fn decode(data: &[u8]) -> Result<DecodedGrid> {
    PgxDecoder::default().decode("test.pgx", Cursor::new(data))
}

fn decode_strict(data: &[u8]) -> Result<DecodedGrid> {
    PgxDecoder::new(DecodeConfig::strict()).decode("test.pgx", Cursor::new(data))
}

#[test]
fn test_decodes_small_unsigned_image() {
    let data = pgx_bytes("PG ML + 8", "2 2", "255", &[10, 20, 30, 40]);
    let grid = decode(&data).unwrap();

    assert_eq!(grid.shape(), (2, 2));
    assert_eq!(grid.element_kind(), ElementKind::U8);
    assert_eq!(grid.to_rows(), vec![vec![10, 20], vec![30, 40]]);
    assert_eq!(grid.max_value(), 255);
    assert_eq!(grid.bit_depth(), 8);
    assert_eq!(grid.byte_order(), ByteOrder::BigEndian);
}

#[test]
fn test_shape_is_height_by_width() {
    let plane: Vec<u8> = (0..6).collect();
    let grid = decode(&pgx_bytes("PG ML - 5", "3 2", "15", &plane)).unwrap();

    assert_eq!(grid.width(), 3);
    assert_eq!(grid.height(), 2);
    assert_eq!(grid.shape(), (2, 3));
    assert_eq!(grid.element_kind(), ElementKind::I8);
    assert_eq!(grid.row(1), Some(vec![3, 4, 5]));
    assert_eq!(grid.get(1, 2), Some(5));
    assert_eq!(grid.get(2, 0), None);
    assert_eq!(grid.get(0, 3), None);
    assert_eq!(grid.row(2), None);
}

#[test]
fn test_byte_order_big_endian() {
    let grid = decode(&pgx_bytes("PG ML + 16", "1 1", "65535", &[0x01, 0x00])).unwrap();
    assert_eq!(grid.element_kind(), ElementKind::U16);
    assert_eq!(grid.get(0, 0), Some(256));
}

#[test]
fn test_byte_order_little_endian() {
    let grid = decode(&pgx_bytes("PG LM + 16", "1 1", "65535", &[0x01, 0x00])).unwrap();
    assert_eq!(grid.byte_order(), ByteOrder::LittleEndian);
    assert_eq!(grid.get(0, 0), Some(1));
}

#[test]
fn test_unknown_order_code_falls_back_to_big_endian() {
    let grid = decode(&pgx_bytes("PG XY + 16", "1 1", "65535", &[0x01, 0x00])).unwrap();
    assert_eq!(grid.byte_order(), ByteOrder::BigEndian);
    assert_eq!(grid.get(0, 0), Some(256));
}

#[test]
fn test_unknown_order_code_rejected_when_strict() {
    let result = decode_strict(&pgx_bytes("PG XY + 16", "1 1", "65535", &[0x01, 0x00]));
    assert!(matches!(result.unwrap_err(), PgxError::FormatError { .. }));
}

#[test]
fn test_sign_code() {
    let signed = decode(&pgx_bytes("PG ML - 8", "1 1", "127", &[0xFF])).unwrap();
    assert_eq!(signed.element_kind(), ElementKind::I8);
    assert_eq!(signed.get(0, 0), Some(-1));

    let unsigned = decode(&pgx_bytes("PG ML + 8", "1 1", "255", &[0xFF])).unwrap();
    assert_eq!(unsigned.element_kind(), ElementKind::U8);
    assert_eq!(unsigned.get(0, 0), Some(255));

    // anything but "-" is unsigned
    let other = decode(&pgx_bytes("PG ML * 8", "1 1", "255", &[0xFF])).unwrap();
    assert_eq!(other.get(0, 0), Some(255));
}

#[test]
fn test_signed_wide_samples() {
    let grid = decode(&pgx_bytes("PG ML - 12", "2 1", "2047", &[0xFF, 0xFE, 0x00, 0x05])).unwrap();
    assert_eq!(grid.element_kind(), ElementKind::I16);
    assert_eq!(grid.to_rows(), vec![vec![-2, 5]]);

    let grid = decode(&pgx_bytes("PG LM - 24", "1 1", "0", &[0xFF, 0xFF, 0xFF, 0xFF])).unwrap();
    assert_eq!(grid.element_kind(), ElementKind::I32);
    assert_eq!(grid.get(0, 0), Some(-1));

    let grid = decode(&pgx_bytes("PG ML + 32", "1 1", "0", &[0x80, 0x00, 0x00, 0x00])).unwrap();
    assert_eq!(grid.element_kind(), ElementKind::U32);
    assert_eq!(grid.get(0, 0), Some(2_147_483_648));
}

#[test]
fn test_element_width_thresholds() {
    let cases = [
        (8, ElementKind::U8, 1),
        (9, ElementKind::U16, 2),
        (16, ElementKind::U16, 2),
        (17, ElementKind::U32, 4),
    ];

    for (bit_depth, kind, bytes) in cases {
        assert_eq!(ElementKind::select(bit_depth, false), kind);
        assert_eq!(kind.bytes(), bytes);

        let plane = vec![0u8; 4 * bytes];
        let mode = format!("PG ML + {bit_depth}");
        let grid = decode(&pgx_bytes(&mode, "2 2", "1", &plane)).unwrap();
        assert_eq!(grid.element_kind(), kind, "bit depth {bit_depth}");
        assert_eq!(grid.samples().len(), 4);
    }

    assert_eq!(ElementKind::select(8, true), ElementKind::I8);
    assert_eq!(ElementKind::select(9, true), ElementKind::I16);
    assert_eq!(ElementKind::select(16, true), ElementKind::I16);
    assert_eq!(ElementKind::select(17, true), ElementKind::I32);
}

#[test]
fn test_wrong_depth_assumption_fails_validation() {
    // 16 bytes are 16 one-byte samples but only 8 two-byte ones
    let plane = vec![0u8; 16];
    let result = decode(&pgx_bytes("PG ML + 9", "4 4", "511", &plane));
    match result.unwrap_err() {
        PgxError::ValidationError { expected, actual, .. } => {
            assert_eq!(expected, 16);
            assert_eq!(actual, 8);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_truncated_plane_fails_validation() {
    let plane = vec![7u8; 15];
    let result = decode(&pgx_bytes("PG ML + 8", "4 4", "255", &plane));
    match result.unwrap_err() {
        PgxError::ValidationError { source_name, expected, actual } => {
            assert_eq!(source_name, "test.pgx");
            assert_eq!(expected, 16);
            assert_eq!(actual, 15);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_oversized_plane_fails_validation() {
    let plane = vec![7u8; 17];
    let result = decode(&pgx_bytes("PG ML + 8", "4 4", "255", &plane));
    assert!(matches!(
        result.unwrap_err(),
        PgxError::ValidationError { expected: 16, actual: 17, .. }
    ));
}

#[test]
fn test_partial_trailing_sample_is_dropped() {
    let grid = decode(&pgx_bytes("PG ML + 16", "2 1", "65535", &[0, 1, 0, 2, 9])).unwrap();
    assert_eq!(grid.to_rows(), vec![vec![1, 2]]);
}

#[test]
fn test_partial_trailing_sample_rejected_when_strict() {
    let result = decode_strict(&pgx_bytes("PG ML + 16", "2 1", "65535", &[0, 1, 0, 2, 9]));
    assert!(matches!(result.unwrap_err(), PgxError::FormatError { .. }));
}

#[test]
fn test_bad_magic() {
    let result = decode(&pgx_bytes("XX ML + 8", "2 2", "255", &[1, 2, 3, 4]));
    let err = result.unwrap_err();
    assert!(matches!(err, PgxError::FormatError { .. }));
    assert!(err.to_string().contains("test.pgx"));
}

#[test]
fn test_too_few_mode_tokens() {
    let result = decode(&pgx_bytes("PG ML +", "2 2", "255", &[1, 2, 3, 4]));
    assert!(matches!(result.unwrap_err(), PgxError::FormatError { .. }));
}

#[test]
fn test_extra_mode_tokens_ignored() {
    let grid = decode(&pgx_bytes("PG ML + 8 extra", "2 2", "255", &[1, 2, 3, 4])).unwrap();
    assert_eq!(grid.to_rows(), vec![vec![1, 2], vec![3, 4]]);
}

#[test]
fn test_non_numeric_fields() {
    let inputs = [
        pgx_bytes("PG ML + eight", "2 2", "255", &[1, 2, 3, 4]),
        pgx_bytes("PG ML + 8", "2 two", "255", &[1, 2, 3, 4]),
        pgx_bytes("PG ML + 8", "2 2", "max", &[1, 2, 3, 4]),
        pgx_bytes("PG ML + 8", "-2 2", "255", &[1, 2, 3, 4]),
    ];
    for data in inputs {
        assert!(matches!(decode(&data).unwrap_err(), PgxError::FormatError { .. }));
    }
}

#[test]
fn test_dimension_line_needs_exactly_two_values() {
    for dims in ["4", "2 2 1", ""] {
        let result = decode(&pgx_bytes("PG ML + 8", dims, "255", &[1, 2, 3, 4]));
        assert!(
            matches!(result.unwrap_err(), PgxError::FormatError { .. }),
            "dims {dims:?}"
        );
    }
}

#[test]
fn test_zero_dimensions_and_depth_rejected() {
    let zero_width = decode(&pgx_bytes("PG ML + 8", "0 2", "255", &[]));
    assert!(matches!(zero_width.unwrap_err(), PgxError::FormatError { .. }));

    let zero_depth = decode(&pgx_bytes("PG ML + 0", "1 1", "0", &[0]));
    assert!(matches!(zero_depth.unwrap_err(), PgxError::FormatError { .. }));
}

#[test]
fn test_overflowing_dimensions_rejected() {
    let dims = format!("{} 2", usize::MAX);
    let result = decode(&pgx_bytes("PG ML + 8", &dims, "255", &[]));
    assert!(matches!(result.unwrap_err(), PgxError::FormatError { .. }));
}

#[test]
fn test_max_value_not_checked_against_depth() {
    let grid = decode(&pgx_bytes("PG ML + 8", "1 1", "70000", &[3])).unwrap();
    assert_eq!(grid.max_value(), 70000);
}

#[test]
fn test_missing_header_lines() {
    let result = decode(b"PG ML + 8\n2 2\n");
    assert!(matches!(result.unwrap_err(), PgxError::FormatError { .. }));

    let result = decode(b"");
    assert!(matches!(result.unwrap_err(), PgxError::FormatError { .. }));
}

#[test]
fn test_header_whitespace_and_crlf() {
    let mut data = b"  PG  LM  +  16 \r\n 1   2 \r\n 4095 \r\n".to_vec();
    data.extend_from_slice(&[0x02, 0x00, 0x03, 0x00]);
    let grid = decode(&data).unwrap();
    assert_eq!(grid.to_rows(), vec![vec![2], vec![3]]);
}

#[test]
fn test_non_ascii_header_rejected() {
    let mut data = "PG ML + 8\n2 2\n255\u{e9}\n".as_bytes().to_vec();
    data.extend_from_slice(&[1, 2, 3, 4]);
    assert!(matches!(decode(&data).unwrap_err(), PgxError::FormatError { .. }));
}

#[test]
fn test_plane_may_contain_newlines() {
    let grid = decode(&pgx_bytes("PG ML + 8", "3 1", "255", b"\n\r\n")).unwrap();
    assert_eq!(grid.to_rows(), vec![vec![10, 13, 10]]);
}

#[test]
fn test_header_parse_directly() {
    let header = HeaderInfo::parse(
        "direct",
        ["PG LM - 12", "640 480", "2047"],
        &DecodeConfig::default(),
    )
    .unwrap();

    assert_eq!(
        header,
        HeaderInfo {
            byte_order: ByteOrder::LittleEndian,
            signed: true,
            bit_depth: 12,
            width: 640,
            height: 480,
            max_value: 2047,
        }
    );
    assert_eq!(header.sample_count(), 640 * 480);

    let layout = SampleLayout::from_header(&header);
    assert_eq!(layout.element_bytes, 2);
    assert_eq!(layout.kind, ElementKind::I16);
    assert_eq!(layout.sample_count(7), 3);
    assert_eq!(layout.trailing_bytes(7), 1);
}

#[test]
fn test_layout_reinterpret_owns_single_byte_plane() {
    let layout = SampleLayout {
        element_bytes: 1,
        kind: ElementKind::U8,
        byte_order: ByteOrder::LittleEndian,
    };
    assert_eq!(layout.reinterpret(vec![1, 2, 3]), GridSamples::U8(vec![1, 2, 3]));
}

#[test]
fn test_config_builder() {
    let config = DecodeConfig::builder()
        .strict_byte_order(true)
        .build();

    assert!(config.strict_byte_order);
    assert!(!config.reject_partial_samples);

    let default = DecodeConfig::default();
    assert!(!default.strict_byte_order);
    assert!(!default.reject_partial_samples);
}

#[test]
fn test_read_pgx_through_trait_object() {
    let reader: &dyn PgxReader = &PgxDecoder::default();
    let data = pgx_bytes("PG ML + 8", "2 1", "255", &[5, 6]);
    let mut input = Cursor::new(data);

    let grid = reader.read_pgx("trait", &mut input).unwrap();
    assert_eq!(grid.to_rows(), vec![vec![5, 6]]);
}

#[test]
fn test_decode_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&pgx_bytes("PG ML + 10", "2 2", "1023", &[0, 1, 0, 2, 0, 3, 3, 255]))
        .unwrap();
    file.flush().unwrap();

    let grid = decode_file(file.path()).unwrap();
    assert_eq!(grid.element_kind(), ElementKind::U16);
    assert_eq!(grid.to_rows(), vec![vec![1, 2], vec![3, 1023]]);
}

#[test]
fn test_decode_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.pgx");

    let err = decode_file(&path).unwrap_err();
    assert!(matches!(err, PgxError::IoError { .. }));
    assert_eq!(err.source_name(), path.display().to_string());
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_parallel_decodes_are_independent() {
    let decoder = &PgxDecoder::default();
    let inputs: Vec<Vec<u8>> = (0..4u8)
        .map(|i| pgx_bytes("PG ML + 8", "2 1", "255", &[i, i + 1]))
        .collect();

    let grids: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|data| scope.spawn(move || decoder.decode("thread", Cursor::new(data))))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect()
    });

    for (i, grid) in grids.iter().enumerate() {
        let i = i as i64;
        assert_eq!(grid.to_rows(), vec![vec![i, i + 1]]);
    }
}
