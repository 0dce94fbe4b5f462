//! Native value union for the sequence container format.
//!
//! Container headers name their key and value types as writable class names.
//! This module resolves those names to a closed set of decodable kinds, holds
//! decoded values, and maps both halves into the generic data model:
//! - `WritableKind`: the per-file type tag, resolved once from the header.
//!   Unrecognized class names resolve to `Opaque` - never an error.
//! - `Writable`: a mutable holder, created empty per file and refilled in
//!   place by every record decode. The record adapter copies values out, so
//!   holder reuse never leaks across records.
//!
//! Kind-to-schema-type and value-to-value mappings are exhaustive matches;
//! adding a kind without extending them will not compile. Only the class-name
//! resolution has a fallback arm.

use std::io::Read;

use byteorder::{BigEndian, ByteOrder};

use crate::data::{SchemaType, Value};
use crate::error::DecodeError;

use super::vint;

/// Natively decodable value kinds of the sequence container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritableKind {
    /// 8-bit signed integer.
    Byte,
    /// 16-bit signed integer, big-endian.
    Short,
    /// 32-bit signed integer, big-endian.
    Int,
    /// 64-bit signed integer, big-endian.
    Long,
    /// 32-bit IEEE 754 float, big-endian.
    Float,
    /// 64-bit IEEE 754 float, big-endian.
    Double,
    /// Single-byte boolean.
    Boolean,
    /// Length-prefixed raw bytes.
    Bytes,
    /// Vint-length-prefixed UTF-8 text.
    Text,
    /// Any writable class without a native decoder here.
    Opaque,
}

impl WritableKind {
    /// Resolve a header class name to a decodable kind.
    ///
    /// Unrecognized names - other writable classes, user classes, anything -
    /// resolve to [`WritableKind::Opaque`].
    pub fn from_class(class: &str) -> WritableKind {
        match class {
            "org.apache.hadoop.io.ByteWritable" => WritableKind::Byte,
            "org.apache.hadoop.io.ShortWritable" => WritableKind::Short,
            "org.apache.hadoop.io.IntWritable" => WritableKind::Int,
            "org.apache.hadoop.io.LongWritable" => WritableKind::Long,
            "org.apache.hadoop.io.FloatWritable" => WritableKind::Float,
            "org.apache.hadoop.io.DoubleWritable" => WritableKind::Double,
            "org.apache.hadoop.io.BooleanWritable" => WritableKind::Boolean,
            "org.apache.hadoop.io.BytesWritable" => WritableKind::Bytes,
            "org.apache.hadoop.io.Text" => WritableKind::Text,
            _ => WritableKind::Opaque,
        }
    }

    /// The generic schema type this kind maps to.
    ///
    /// `Opaque` maps to `String`: unknown types flow through as their textual
    /// rendering rather than failing the file.
    pub fn schema_type(self) -> SchemaType {
        match self {
            WritableKind::Byte => SchemaType::Int8,
            WritableKind::Short => SchemaType::Int16,
            WritableKind::Int => SchemaType::Int32,
            WritableKind::Long => SchemaType::Int64,
            WritableKind::Float => SchemaType::Float32,
            WritableKind::Double => SchemaType::Float64,
            WritableKind::Boolean => SchemaType::Boolean,
            WritableKind::Bytes => SchemaType::Bytes,
            WritableKind::Text => SchemaType::String,
            WritableKind::Opaque => SchemaType::String,
        }
    }
}

/// A decoded native value, refilled in place for every record.
#[derive(Debug, Clone, PartialEq)]
pub enum Writable {
    /// 8-bit signed integer.
    Byte(i8),
    /// 16-bit signed integer.
    Short(i16),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Boolean.
    Boolean(bool),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    Text(String),
    /// Raw slot bytes of an unrecognized class.
    Opaque(Vec<u8>),
}

impl Writable {
    /// An empty holder of the given kind.
    pub fn empty(kind: WritableKind) -> Writable {
        match kind {
            WritableKind::Byte => Writable::Byte(0),
            WritableKind::Short => Writable::Short(0),
            WritableKind::Int => Writable::Int(0),
            WritableKind::Long => Writable::Long(0),
            WritableKind::Float => Writable::Float(0.0),
            WritableKind::Double => Writable::Double(0.0),
            WritableKind::Boolean => Writable::Boolean(false),
            WritableKind::Bytes => Writable::Bytes(Vec::new()),
            WritableKind::Text => Writable::Text(String::new()),
            WritableKind::Opaque => Writable::Opaque(Vec::new()),
        }
    }

    /// The kind of this holder.
    pub fn kind(&self) -> WritableKind {
        match self {
            Writable::Byte(_) => WritableKind::Byte,
            Writable::Short(_) => WritableKind::Short,
            Writable::Int(_) => WritableKind::Int,
            Writable::Long(_) => WritableKind::Long,
            Writable::Float(_) => WritableKind::Float,
            Writable::Double(_) => WritableKind::Double,
            Writable::Boolean(_) => WritableKind::Boolean,
            Writable::Bytes(_) => WritableKind::Bytes,
            Writable::Text(_) => WritableKind::Text,
            Writable::Opaque(_) => WritableKind::Opaque,
        }
    }

    /// Decode this holder's serialized form from a record slot, replacing the
    /// held value. `slot` is exactly the slot's bytes as delimited by the
    /// record framing.
    ///
    /// # Errors
    /// `DecodeError::InvalidData` when the slot length or an internal length
    /// prefix contradicts the kind; `DecodeError::InvalidUtf8` for malformed
    /// text.
    pub fn read_from(&mut self, slot: &[u8]) -> Result<(), DecodeError> {
        match self {
            Writable::Byte(v) => {
                expect_len(slot, 1, "byte")?;
                *v = slot[0] as i8;
            }
            Writable::Short(v) => {
                expect_len(slot, 2, "short")?;
                *v = BigEndian::read_i16(slot);
            }
            Writable::Int(v) => {
                expect_len(slot, 4, "int")?;
                *v = BigEndian::read_i32(slot);
            }
            Writable::Long(v) => {
                expect_len(slot, 8, "long")?;
                *v = BigEndian::read_i64(slot);
            }
            Writable::Float(v) => {
                expect_len(slot, 4, "float")?;
                *v = BigEndian::read_f32(slot);
            }
            Writable::Double(v) => {
                expect_len(slot, 8, "double")?;
                *v = BigEndian::read_f64(slot);
            }
            Writable::Boolean(v) => {
                expect_len(slot, 1, "boolean")?;
                *v = slot[0] != 0;
            }
            Writable::Bytes(v) => {
                if slot.len() < 4 {
                    return Err(DecodeError::InvalidData(format!(
                        "bytes value needs a 4-byte length prefix, slot has {}",
                        slot.len()
                    )));
                }
                let declared = BigEndian::read_i32(&slot[..4]);
                if declared < 0 || declared as usize != slot.len() - 4 {
                    return Err(DecodeError::InvalidData(format!(
                        "bytes length {} does not match slot payload {}",
                        declared,
                        slot.len() - 4
                    )));
                }
                v.clear();
                v.extend_from_slice(&slot[4..]);
            }
            Writable::Text(v) => {
                let mut cursor = slot;
                let len = vint::read_vint(&mut cursor)?;
                if len < 0 {
                    return Err(DecodeError::InvalidData(format!(
                        "negative text length {}",
                        len
                    )));
                }
                if cursor.len() != len as usize {
                    return Err(DecodeError::InvalidData(format!(
                        "text length {} does not match slot remainder {}",
                        len,
                        cursor.len()
                    )));
                }
                let text = std::str::from_utf8(cursor)?;
                v.clear();
                v.push_str(text);
            }
            Writable::Opaque(v) => {
                v.clear();
                v.extend_from_slice(slot);
            }
        }
        Ok(())
    }

    /// Map the held value into the generic data model, copying it out of the
    /// holder. An `Opaque` value renders as lossy UTF-8 text.
    pub fn to_value(&self) -> Value {
        match self {
            Writable::Byte(v) => Value::Int8(*v),
            Writable::Short(v) => Value::Int16(*v),
            Writable::Int(v) => Value::Int32(*v),
            Writable::Long(v) => Value::Int64(*v),
            Writable::Float(v) => Value::Float32(*v),
            Writable::Double(v) => Value::Float64(*v),
            Writable::Boolean(v) => Value::Boolean(*v),
            Writable::Bytes(v) => Value::Bytes(v.clone()),
            Writable::Text(v) => Value::String(v.clone()),
            Writable::Opaque(v) => Value::String(String::from_utf8_lossy(v).into_owned()),
        }
    }
}

/// Read a vint-length-prefixed UTF-8 string, the container's wire form for
/// class names and metadata strings.
pub(crate) fn read_text<R: Read>(reader: &mut R) -> Result<String, DecodeError> {
    let len = vint::read_vint(reader)?;
    if len < 0 {
        return Err(DecodeError::InvalidData(format!(
            "negative string length {}",
            len
        )));
    }
    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| DecodeError::InvalidUtf8(e.utf8_error()))
}

fn expect_len(slot: &[u8], expected: usize, kind: &str) -> Result<(), DecodeError> {
    if slot.len() != expected {
        return Err(DecodeError::InvalidData(format!(
            "{} value needs exactly {} bytes, slot has {}",
            kind,
            expected,
            slot.len()
        )));
    }
    Ok(())
}
