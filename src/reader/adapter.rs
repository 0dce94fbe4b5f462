//! Adapter from decoded key/value pairs to structured records

use std::sync::Arc;

use crate::data::{Schema, StructRecord};

use super::writable::Writable;

/// Wraps decoded native pairs into two-field structured records.
///
/// The schema (key field first, value field second) is fixed at reader
/// construction. `adapt` copies both values out of the holders, so the
/// reader is free to refill them on the next advance.
#[derive(Debug)]
pub struct StructAdapter {
    schema: Arc<Schema>,
}

impl StructAdapter {
    /// Create an adapter producing records with the given two-field schema.
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    /// The output schema.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Build the record for one decoded pair.
    pub fn adapt(&self, key: &Writable, value: &Writable) -> StructRecord {
        StructRecord::new(
            Arc::clone(&self.schema),
            vec![key.to_value(), value.to_value()],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SchemaType, Value};
    use crate::reader::writable::WritableKind;

    fn two_field_schema() -> Arc<Schema> {
        Arc::new(
            Schema::builder()
                .field("key", SchemaType::Int32)
                .field("value", SchemaType::String)
                .build(),
        )
    }

    #[test]
    fn test_adapt_produces_two_fields_in_order() {
        let adapter = StructAdapter::new(two_field_schema());
        let record = adapter.adapt(
            &Writable::Int(7),
            &Writable::Text("seven".to_string()),
        );

        assert_eq!(record.values().len(), 2);
        assert_eq!(record.values()[0], Value::Int32(7));
        assert_eq!(record.values()[1], Value::String("seven".to_string()));
        assert_eq!(record.get("key"), Some(&Value::Int32(7)));
        assert_eq!(record.get("value"), Some(&Value::String("seven".to_string())));
    }

    #[test]
    fn test_adapt_copies_out_of_holders() {
        let adapter = StructAdapter::new(two_field_schema());

        let mut key = Writable::empty(WritableKind::Int);
        let mut value = Writable::empty(WritableKind::Text);
        key.read_from(&7i32.to_be_bytes()).unwrap();
        let mut slot = crate::reader::vint::encode_vint(1);
        slot.push(b'a');
        value.read_from(&slot).unwrap();

        let first = adapter.adapt(&key, &value);

        // Refilling the holders must not disturb the adapted record
        key.read_from(&8i32.to_be_bytes()).unwrap();
        let mut slot = crate::reader::vint::encode_vint(1);
        slot.push(b'b');
        value.read_from(&slot).unwrap();

        assert_eq!(first.get("key"), Some(&Value::Int32(7)));
        assert_eq!(first.get("value"), Some(&Value::String("a".to_string())));
    }

    #[test]
    fn test_adapted_records_share_schema() {
        let schema = two_field_schema();
        let adapter = StructAdapter::new(Arc::clone(&schema));
        let record = adapter.adapt(&Writable::Int(1), &Writable::Text("x".to_string()));

        assert_eq!(record.schema(), schema.as_ref());
    }
}
