//! MessagePack codec helpers.
//!
//! Records are encoded with named fields so a store on the other side of the
//! boundary can address them by field name.

use engine_component::ForeignRecord;

use crate::error::StoreError;

/// Encode a record to MessagePack bytes.
///
/// # Errors
///
/// Returns [`StoreError::Encode`] if serialisation fails.
pub fn encode(record: &ForeignRecord) -> Result<Vec<u8>, StoreError> {
    rmp_serde::to_vec_named(record).map_err(StoreError::Encode)
}

/// Decode a record from MessagePack bytes.
///
/// # Errors
///
/// Returns [`StoreError::Decode`] if deserialisation fails.
pub fn decode(bytes: &[u8]) -> Result<ForeignRecord, StoreError> {
    rmp_serde::from_slice(bytes).map_err(StoreError::Decode)
}

#[cfg(test)]
mod tests {
    use engine_component::Value;
    use engine_math::{Quat, Vec3};

    use super::*;

    #[test]
    fn test_encode_decode_roundtrip() {
        let record = ForeignRecord::new("Transform")
            .with_field("translation", Vec3::new(1.0, 2.0, 3.0))
            .with_field("rotation", Quat::IDENTITY)
            .with_field("tags", Value::List(vec!["a".into(), Value::Nil]));
        let bytes = encode(&record).unwrap();
        assert_eq!(decode(&bytes).unwrap(), record);
    }

    #[test]
    fn test_decode_invalid_bytes() {
        let err = decode(&[0xFF, 0xFF]).unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
        assert!(!err.is_not_found());
    }
}
