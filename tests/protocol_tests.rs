//! Frame Codec Tests
//!
//! Tests for the four addressing modes, checksum trailers and the
//! variable-length Mode4 response decode.

use elite_tuner::protocol::{
    checksum, decode_read, encode_read, encode_write, read_len, AddressTriplet, FrameMode,
};
use elite_tuner::Error;

const ADDR: AddressTriplet = AddressTriplet::new([0x01, 0x90, 0xEB]);

// ============================================================================
// Write Frame Layout Tests
// ============================================================================

#[test]
fn test_mode1_write_layout() {
    let frame = encode_write(FrameMode::Mode1, ADDR, &[0x11, 0x22, 0x33, 0x44], 1, false).unwrap();
    assert_eq!(&frame[..], &[0x81, 0x90, 0xEB, 0x11, 0x22, 0x33, 0x44]);
}

#[test]
fn test_mode2_write_layout() {
    let frame = encode_write(FrameMode::Mode2, ADDR, &[0xAA, 0xBB, 0xCC], 1, false).unwrap();
    assert_eq!(&frame[..], &[0x91, 0x90, 0xEB, 0xAA, 0xBB, 0xCC]);
}

#[test]
fn test_mode1_and_mode2_ignore_count_and_checksum() {
    let data = [1, 2, 3, 4, 5, 6, 7, 8];
    let m1 = encode_write(FrameMode::Mode1, ADDR, &data, 2, true).unwrap();
    assert_eq!(m1.len(), 3 + 4);
    let m2 = encode_write(FrameMode::Mode2, ADDR, &data, 2, true).unwrap();
    assert_eq!(m2.len(), 3 + 3);
}

#[test]
fn test_mode3_write_with_checksum() {
    let data = [0x00, 0x00, 0x00, 0x01, 0x10, 0x00, 0x00, 0x02];
    let frame = encode_write(FrameMode::Mode3, ADDR, &data, 2, true).unwrap();
    assert_eq!(frame[0], 0xE1);
    assert_eq!(&frame[3..11], &data);
    assert_eq!(&frame[11..], &[0x10, 0x00, 0x00, 0x03]);
}

#[test]
fn test_mode3_write_without_checksum() {
    let data = [0xDE, 0xAD, 0xBE, 0xEF];
    let frame = encode_write(FrameMode::Mode3, ADDR, &data, 1, false).unwrap();
    assert_eq!(&frame[..], &[0xE1, 0x90, 0xEB, 0xDE, 0xAD, 0xBE, 0xEF]);
}

#[test]
fn test_mode4_write_with_checksum() {
    let data = [0x02, 0x30, 0x02, 0x00, 0x00, 0x01];
    let frame = encode_write(FrameMode::Mode4, ADDR, &data, 2, true).unwrap();
    assert_eq!(frame[0], 0xF1);
    assert_eq!(&frame[9..], &[0x02, 0x30, 0x03]);
}

#[test]
fn test_write_header_clears_upper_address_bits() {
    let addr = AddressTriplet::new([0xFE, 0x12, 0x34]);
    let frame = encode_write(FrameMode::Mode4, addr, &[0, 0, 0], 1, false).unwrap();
    assert_eq!(&frame[..3], &[0xF0, 0x12, 0x34]);
}

#[test]
fn test_write_rejects_short_payload() {
    let result = encode_write(FrameMode::Mode3, ADDR, &[0; 7], 2, true);
    assert_eq!(
        result,
        Err(Error::PayloadTooShort {
            expected: 8,
            actual: 7
        })
    );
}

#[test]
fn test_write_only_uses_requested_units() {
    let data = [0, 0, 1, 0, 0, 2, 0, 0, 3];
    let frame = encode_write(FrameMode::Mode4, ADDR, &data, 2, true).unwrap();
    assert_eq!(frame.len(), 3 + 6 + 3);
    assert_eq!(&frame[9..], &[0, 0, 3]);
}

// ============================================================================
// Checksum Tests
// ============================================================================

#[test]
fn test_checksum_matches_trailer() {
    let data = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x0F, 0x0F, 0x0F, 0x0F];
    let frame = encode_write(FrameMode::Mode3, ADDR, &data, 3, true).unwrap();
    let sum = checksum(FrameMode::Mode3, &data, 3);
    assert_eq!(&frame[15..], &sum.to_be_bytes());
}

#[test]
fn test_mode3_checksum_wraps() {
    let data = [0xFF; 8];
    // 0xFFFFFFFF + 0xFFFFFFFF mod 2^32
    assert_eq!(checksum(FrameMode::Mode3, &data, 2), 0xFFFF_FFFE);
}

#[test]
fn test_mode4_checksum_wraps() {
    let data = [0xFF; 9];
    // 3 * 0xFFFFFF mod 2^24
    assert_eq!(checksum(FrameMode::Mode4, &data, 3), 0x00FF_FFFD);
}

#[test]
fn test_checksum_detects_mutation() {
    let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
    let frame = encode_write(FrameMode::Mode4, ADDR, &data, 2, true).unwrap();
    let trailer = &frame[9..];

    for i in 0..data.len() {
        let mut mutated = data;
        mutated[i] ^= 0x01;
        let sum = checksum(FrameMode::Mode4, &mutated, 2);
        assert_ne!(&sum.to_be_bytes()[1..], trailer, "mutation at byte {i} undetected");
    }
}

#[test]
fn test_checksum_zero_for_plain_modes() {
    assert_eq!(checksum(FrameMode::Mode1, &[1, 2, 3, 4], 1), 0);
    assert_eq!(checksum(FrameMode::Mode2, &[1, 2, 3], 1), 0);
}

// ============================================================================
// Read Header Tests
// ============================================================================

#[test]
fn test_read_headers() {
    assert_eq!(encode_read(FrameMode::Mode1, ADDR), [0x01, 0x90, 0xEB]);
    assert_eq!(encode_read(FrameMode::Mode2, ADDR), [0x11, 0x90, 0xEB]);
    assert_eq!(encode_read(FrameMode::Mode3, ADDR), [0x61, 0x90, 0xEB]);
    assert_eq!(encode_read(FrameMode::Mode4, ADDR), [0x71, 0x90, 0xEB]);
}

#[test]
fn test_read_and_write_headers_differ() {
    for mode in [FrameMode::Mode1, FrameMode::Mode2, FrameMode::Mode3, FrameMode::Mode4] {
        assert_ne!(mode.read_bits(), mode.write_bits());
    }
}

#[test]
fn test_read_lengths() {
    assert_eq!(read_len(FrameMode::Mode1, 7), Ok(4));
    assert_eq!(read_len(FrameMode::Mode2, 7), Ok(3));
    assert_eq!(read_len(FrameMode::Mode3, 3), Ok(12));
    assert_eq!(read_len(FrameMode::Mode4, 2), Ok(40));
}

#[test]
fn test_read_length_overflow() {
    assert_eq!(
        read_len(FrameMode::Mode3, usize::MAX),
        Err(Error::FrameOverflow { len: usize::MAX })
    );
}

// ============================================================================
// Decode Tests
// ============================================================================

#[test]
fn test_payload_survives_fixed_modes() {
    let cases: [(FrameMode, &[u8], usize); 3] = [
        (FrameMode::Mode1, &[0xAF, 0xFE, 0x42, 0x00], 1),
        (FrameMode::Mode2, &[0x01, 0x02, 0x03], 1),
        (FrameMode::Mode3, &[1, 2, 3, 4, 5, 6, 7, 8], 2),
    ];

    for (mode, data, units) in cases {
        let frame = encode_write(mode, ADDR, data, units, false).unwrap();
        let decoded = decode_read(mode, &frame[3..]).unwrap();
        assert_eq!(&decoded[..], data, "{mode:?}");
    }
}

#[test]
fn test_mode1_decode_takes_four_bytes() {
    let decoded = decode_read(FrameMode::Mode1, &[1, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(&decoded[..], &[1, 2, 3, 4]);
}

#[test]
fn test_mode4_decode_includes_header() {
    let mut raw = [0u8; 40];
    raw[..9].copy_from_slice(&[0xA0, 0xB0, 0x02, 1, 2, 3, 4, 5, 6]);
    let decoded = decode_read(FrameMode::Mode4, &raw).unwrap();
    assert_eq!(&decoded[..], &[0xA0, 0xB0, 0x02, 1, 2, 3, 4, 5, 6]);
}

#[test]
fn test_mode4_decode_length_follows_count() {
    let mut raw = [0u8; 40];
    for k in 0..=12u8 {
        raw[2] = k;
        let decoded = decode_read(FrameMode::Mode4, &raw).unwrap();
        assert_eq!(decoded.len(), 3 * (usize::from(k) + 1));
    }
}

#[test]
fn test_mode4_read_window_holds_twelve_units() {
    let mut raw = [0u8; 40];
    raw[2] = 12;
    assert_eq!(decode_read(FrameMode::Mode4, &raw).unwrap().len(), 39);

    raw[2] = 13;
    assert_eq!(
        decode_read(FrameMode::Mode4, &raw),
        Err(Error::ShortResponse {
            expected: 42,
            actual: 40
        })
    );
}

#[test]
fn test_mode4_decode_masks_count_to_five_bits() {
    let mut raw = [0u8; 40];
    raw[2] = 0xE1;
    let decoded = decode_read(FrameMode::Mode4, &raw).unwrap();
    assert_eq!(decoded.len(), 6);
}

#[test]
fn test_mode4_decode_short_response() {
    let mut raw = [0u8; 40];
    raw[2] = 0x1F;
    assert_eq!(
        decode_read(FrameMode::Mode4, &raw),
        Err(Error::ShortResponse {
            expected: 96,
            actual: 40
        })
    );
    assert!(matches!(
        decode_read(FrameMode::Mode4, &[0, 0]),
        Err(Error::ShortResponse { .. })
    ));
}

// ============================================================================
// Mode Selector Tests
// ============================================================================

#[test]
fn test_mode_from_raw() {
    assert_eq!(FrameMode::try_from(0u8), Ok(FrameMode::Mode1));
    assert_eq!(FrameMode::try_from(3u8), Ok(FrameMode::Mode4));
    assert_eq!(FrameMode::try_from(4u8), Err(Error::UnsupportedMode(4)));
}

#[test]
fn test_address_numeric_round_trip() {
    let addr = AddressTriplet::from_u32(0x01_A0_10);
    assert_eq!(addr.bytes(), [0x01, 0xA0, 0x10]);
    assert_eq!(addr.as_u32(), 0x01_A0_10);
}
