//! Variable-length integer encoding and decoding utilities.
//!
//! This module implements the vint encoding used throughout the sequence
//! container format (string lengths, metadata, serialized long values). It is
//! a first-byte length coding, not a continuation-bit varint:
//! - Values in `-112..=127` are stored as that single byte (two's complement)
//! - Otherwise the first byte encodes sign and payload length:
//!   `-113..=-120` introduces a positive value with 1..=8 big-endian payload
//!   bytes; `-121..=-128` introduces a negative value whose payload bytes
//!   encode the one's complement of the value
//!
//! Decoders are generic over `io::Read` so they work on both byte slices and
//! the buffered input stream. Encoders return the raw bytes and exist for
//! test fixtures that build container files by hand.

use std::io::Read;

use byteorder::ReadBytesExt;

use crate::error::DecodeError;

// ============================================================================
// Decoding Functions
// ============================================================================

/// Decode a variable-length long.
///
/// # Arguments
/// * `reader` - The input to read from (advanced past the vint)
///
/// # Returns
/// The decoded signed 64-bit integer
///
/// # Errors
/// - `DecodeError::UnexpectedEof` if the input is truncated
#[inline]
pub fn read_vlong<R: Read>(reader: &mut R) -> Result<i64, DecodeError> {
    let first = reader.read_i8()?;
    if first >= -112 {
        return Ok(i64::from(first));
    }

    let negative = first < -120;
    let payload_len = if negative {
        (-120 - i32::from(first)) as u32
    } else {
        (-112 - i32::from(first)) as u32
    };

    let mut value: i64 = 0;
    for _ in 0..payload_len {
        let byte = reader.read_u8()?;
        value = (value << 8) | i64::from(byte);
    }

    Ok(if negative { !value } else { value })
}

/// Decode a variable-length int.
///
/// Same wire form as [`read_vlong`], range-checked into 32 bits.
///
/// # Errors
/// - `DecodeError::UnexpectedEof` if the input is truncated
/// - `DecodeError::InvalidVint` if the decoded value does not fit in an `i32`
#[inline]
pub fn read_vint<R: Read>(reader: &mut R) -> Result<i32, DecodeError> {
    let value = read_vlong(reader)?;
    i32::try_from(value)
        .map_err(|_| DecodeError::InvalidVint(format!("value {} does not fit in 32 bits", value)))
}

// ============================================================================
// Encoding Functions
// ============================================================================

/// Encode a long as a variable-length integer.
///
/// # Arguments
/// * `value` - The signed 64-bit integer to encode
///
/// # Returns
/// A vector containing the encoded bytes
#[inline]
pub fn encode_vlong(value: i64) -> Vec<u8> {
    if (-112..=127).contains(&value) {
        return vec![value as u8];
    }

    let (base, magnitude) = if value < 0 {
        (-120i32, !value)
    } else {
        (-112i32, value)
    };

    let mut payload_len = 0u32;
    let mut tmp = magnitude;
    while tmp != 0 {
        tmp >>= 8;
        payload_len += 1;
    }

    let mut result = Vec::with_capacity(1 + payload_len as usize);
    result.push((base - payload_len as i32) as i8 as u8);
    for shift in (0..payload_len).rev() {
        result.push(((magnitude >> (shift * 8)) & 0xFF) as u8);
    }
    result
}

/// Encode an int as a variable-length integer.
#[inline]
pub fn encode_vint(value: i32) -> Vec<u8> {
    encode_vlong(i64::from(value))
}
