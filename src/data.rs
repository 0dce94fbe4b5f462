//! Generic schema and record representations.
//!
//! This module defines the format-independent shape of everything a reader
//! produces: a small closed set of schema types, named fields, ordered
//! schemas, values, and the structured records handed to the caller. Format
//! readers map their native types into this model; downstream code never
//! sees format-specific types.

use std::sync::Arc;

/// Generic type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit IEEE 754 floating-point.
    Float32,
    /// 64-bit IEEE 754 floating-point.
    Float64,
    /// Boolean.
    Boolean,
    /// Sequence of bytes.
    Bytes,
    /// Unicode string.
    String,
}

impl SchemaType {
    /// Short lowercase name of the type, for messages and logs.
    pub fn name(&self) -> &'static str {
        match self {
            SchemaType::Int8 => "int8",
            SchemaType::Int16 => "int16",
            SchemaType::Int32 => "int32",
            SchemaType::Int64 => "int64",
            SchemaType::Float32 => "float32",
            SchemaType::Float64 => "float64",
            SchemaType::Boolean => "boolean",
            SchemaType::Bytes => "bytes",
            SchemaType::String => "string",
        }
    }
}

/// A named, typed field of a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    schema: SchemaType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, schema: SchemaType) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field type.
    pub fn schema_type(&self) -> SchemaType {
        self.schema
    }
}

/// An ordered list of named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Start building a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder { fields: Vec::new() }
    }

    /// The fields, in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Position of a field by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<Field>,
}

impl SchemaBuilder {
    /// Append a field.
    pub fn field(mut self, name: impl Into<String>, schema: SchemaType) -> Self {
        self.fields.push(Field::new(name, schema));
        self
    }

    /// Finish the schema.
    pub fn build(self) -> Schema {
        Schema {
            fields: self.fields,
        }
    }
}

/// A single generic datum.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 8-bit signed integer.
    Int8(i8),
    /// 16-bit signed integer.
    Int16(i16),
    /// 32-bit signed integer.
    Int32(i32),
    /// 64-bit signed integer.
    Int64(i64),
    /// 32-bit IEEE 754 floating-point.
    Float32(f32),
    /// 64-bit IEEE 754 floating-point.
    Float64(f64),
    /// Boolean.
    Boolean(bool),
    /// Sequence of bytes.
    Bytes(Vec<u8>),
    /// Unicode string.
    String(String),
}

impl Value {
    /// The schema type this value inhabits.
    pub fn schema_type(&self) -> SchemaType {
        match self {
            Value::Int8(_) => SchemaType::Int8,
            Value::Int16(_) => SchemaType::Int16,
            Value::Int32(_) => SchemaType::Int32,
            Value::Int64(_) => SchemaType::Int64,
            Value::Float32(_) => SchemaType::Float32,
            Value::Float64(_) => SchemaType::Float64,
            Value::Boolean(_) => SchemaType::Boolean,
            Value::Bytes(_) => SchemaType::Bytes,
            Value::String(_) => SchemaType::String,
        }
    }

    /// As an `i8`, if this is an `Int8`.
    pub fn as_i8(&self) -> Option<i8> {
        match self {
            Value::Int8(v) => Some(*v),
            _ => None,
        }
    }

    /// As an `i16`, if this is an `Int16`.
    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Value::Int16(v) => Some(*v),
            _ => None,
        }
    }

    /// As an `i32`, if this is an `Int32`.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// As an `i64`, if this is an `Int64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    /// As an `f32`, if this is a `Float32`.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float32(v) => Some(*v),
            _ => None,
        }
    }

    /// As an `f64`, if this is a `Float64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// As a `bool`, if this is a `Boolean`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// As a byte slice, if this is `Bytes`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) => Some(v),
            _ => None,
        }
    }

    /// As a string slice, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }
}

/// A record paired with its schema.
///
/// Values are stored in schema field order; the value count always equals the
/// schema's field count. Records share their schema through an `Arc`, so
/// cloning a record does not copy the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct StructRecord {
    schema: Arc<Schema>,
    values: Vec<Value>,
}

impl StructRecord {
    /// Pair `values` with `schema`. Callers guarantee one value per field,
    /// in field order.
    pub(crate) fn new(schema: Arc<Schema>, values: Vec<Value>) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self { schema, values }
    }

    /// The record's schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The values, in schema field order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Look up a value by field name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schema.field_index(name).map(|i| &self.values[i])
    }
}
