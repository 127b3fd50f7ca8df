//! Descriptor formats exchanged with external collaborators.
//!
//! A [`ParserDescriptor`] tells a record parser how to decode one column of a
//! serialized record. A [`PlaceholderDescriptor`] tells a placeholder factory
//! which batched input to create for one column. Neither format is decoded or
//! materialized by this crate.

use serde::{Deserialize, Serialize};

use crate::dtype::DType;
use crate::shape::TensorShape;
use crate::types::Scalar;

/// Per-column parsing configuration understood by the record parser.
///
/// Serialized with an internal `"type"` tag in `snake_case`, e.g.
/// `{"type": "ragged", "dtype": "int64"}`. Any other tag deserializes to
/// [`ParserDescriptor::Other`] so that schema construction, not decoding,
/// reports the unsupported kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DescriptorRepr", into = "DescriptorRepr")]
pub enum ParserDescriptor {
    /// Fixed-size dense values. A missing value without a default is an error
    /// at parse time.
    Dense {
        shape: Vec<u64>,
        dtype: DType,
        default_value: Option<Scalar>,
    },
    /// Variable-length list of values.
    Ragged { dtype: DType },
    /// One-dimensional index/value pair stored in two record fields.
    Sparse {
        index_field: String,
        value_field: String,
        dtype: DType,
        size: u64,
        already_sorted: bool,
    },
    /// Sequence of fixed-size values. Reserved; schemas cannot hold it yet.
    FixedLenSequence {
        shape: Vec<u64>,
        dtype: DType,
        allow_missing: bool,
        default_value: Option<Scalar>,
    },
    /// A descriptor kind produced by a collaborator with no mapping here.
    Other { kind: String },
}

impl ParserDescriptor {
    /// Stable name of this descriptor's kind, as used in error messages and
    /// as the serialized `"type"` tag.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            ParserDescriptor::Dense { .. } => "dense",
            ParserDescriptor::Ragged { .. } => "ragged",
            ParserDescriptor::Sparse { .. } => "sparse",
            ParserDescriptor::FixedLenSequence { .. } => "fixed_len_sequence",
            ParserDescriptor::Other { kind } => kind,
        }
    }
}

/// Wire form of [`ParserDescriptor`]: a known tagged descriptor, or any other
/// object carrying just its `"type"`.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum DescriptorRepr {
    Known(KnownDescriptor),
    Unknown {
        #[serde(rename = "type")]
        kind: String,
    },
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum KnownDescriptor {
    Dense {
        shape: Vec<u64>,
        dtype: DType,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        default_value: Option<Scalar>,
    },
    Ragged {
        dtype: DType,
    },
    Sparse {
        index_field: String,
        value_field: String,
        dtype: DType,
        size: u64,
        already_sorted: bool,
    },
    FixedLenSequence {
        shape: Vec<u64>,
        dtype: DType,
        allow_missing: bool,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        default_value: Option<Scalar>,
    },
}

const KNOWN_KINDS: [&str; 4] = ["dense", "ragged", "sparse", "fixed_len_sequence"];

impl TryFrom<DescriptorRepr> for ParserDescriptor {
    type Error = String;

    fn try_from(repr: DescriptorRepr) -> Result<Self, Self::Error> {
        let known = match repr {
            DescriptorRepr::Known(known) => known,
            // A known tag whose body did not match falls through to here.
            DescriptorRepr::Unknown { kind } if KNOWN_KINDS.contains(&kind.as_str()) => {
                return Err(format!("malformed `{kind}` parser descriptor"));
            }
            DescriptorRepr::Unknown { kind } => return Ok(ParserDescriptor::Other { kind }),
        };
        Ok(match known {
            KnownDescriptor::Dense {
                shape,
                dtype,
                default_value,
            } => ParserDescriptor::Dense {
                shape,
                dtype,
                default_value,
            },
            KnownDescriptor::Ragged { dtype } => ParserDescriptor::Ragged { dtype },
            KnownDescriptor::Sparse {
                index_field,
                value_field,
                dtype,
                size,
                already_sorted,
            } => ParserDescriptor::Sparse {
                index_field,
                value_field,
                dtype,
                size,
                already_sorted,
            },
            KnownDescriptor::FixedLenSequence {
                shape,
                dtype,
                allow_missing,
                default_value,
            } => ParserDescriptor::FixedLenSequence {
                shape,
                dtype,
                allow_missing,
                default_value,
            },
        })
    }
}

impl From<ParserDescriptor> for DescriptorRepr {
    fn from(descriptor: ParserDescriptor) -> Self {
        let known = match descriptor {
            ParserDescriptor::Dense {
                shape,
                dtype,
                default_value,
            } => KnownDescriptor::Dense {
                shape,
                dtype,
                default_value,
            },
            ParserDescriptor::Ragged { dtype } => KnownDescriptor::Ragged { dtype },
            ParserDescriptor::Sparse {
                index_field,
                value_field,
                dtype,
                size,
                already_sorted,
            } => KnownDescriptor::Sparse {
                index_field,
                value_field,
                dtype,
                size,
                already_sorted,
            },
            ParserDescriptor::FixedLenSequence {
                shape,
                dtype,
                allow_missing,
                default_value,
            } => KnownDescriptor::FixedLenSequence {
                shape,
                dtype,
                allow_missing,
                default_value,
            },
            ParserDescriptor::Other { kind } => return DescriptorRepr::Unknown { kind },
        };
        DescriptorRepr::Known(known)
    }
}

/// Batched placeholder requested from the placeholder factory. The shape
/// already includes the leading unbound batch axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaceholderDescriptor {
    Dense { dtype: DType, shape: TensorShape },
    Sparse { dtype: DType, shape: TensorShape },
}

impl PlaceholderDescriptor {
    #[must_use]
    pub fn dtype(&self) -> DType {
        match self {
            PlaceholderDescriptor::Dense { dtype, .. }
            | PlaceholderDescriptor::Sparse { dtype, .. } => *dtype,
        }
    }

    #[must_use]
    pub fn shape(&self) -> &TensorShape {
        match self {
            PlaceholderDescriptor::Dense { shape, .. }
            | PlaceholderDescriptor::Sparse { shape, .. } => shape,
        }
    }

    #[must_use]
    pub fn is_sparse(&self) -> bool {
        matches!(self, PlaceholderDescriptor::Sparse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names_every_variant() {
        let ragged = ParserDescriptor::Ragged { dtype: DType::Int64 };
        assert_eq!(ragged.kind(), "ragged");

        let other = ParserDescriptor::Other {
            kind: "ragged_partition".to_string(),
        };
        assert_eq!(other.kind(), "ragged_partition");
    }

    #[test]
    fn parser_descriptor_json_uses_type_tag() {
        let descriptor = ParserDescriptor::Dense {
            shape: vec![3],
            dtype: DType::Float32,
            default_value: None,
        };
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "dense", "shape": [3], "dtype": "float32"})
        );
    }

    #[test]
    fn parser_descriptor_parses_from_json() {
        let json = r#"{
            "type": "sparse",
            "index_field": "idx",
            "value_field": "val",
            "dtype": "int64",
            "size": 100,
            "already_sorted": true
        }"#;
        let descriptor: ParserDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(
            descriptor,
            ParserDescriptor::Sparse {
                index_field: "idx".to_string(),
                value_field: "val".to_string(),
                dtype: DType::Int64,
                size: 100,
                already_sorted: true,
            }
        );
    }

    #[test]
    fn unknown_type_tag_deserializes_to_other() {
        let descriptor: ParserDescriptor =
            serde_json::from_str(r#"{"type": "var_len_sequence", "dtype": "int64"}"#).unwrap();
        assert_eq!(
            descriptor,
            ParserDescriptor::Other {
                kind: "var_len_sequence".to_string()
            }
        );
    }

    #[test]
    fn other_serializes_as_its_own_type_tag() {
        let descriptor = ParserDescriptor::Other {
            kind: "ragged_partition".to_string(),
        };
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json, serde_json::json!({"type": "ragged_partition"}));
        let decoded: ParserDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, descriptor);
    }

    #[test]
    fn malformed_known_kind_is_a_decode_error() {
        let err = serde_json::from_str::<ParserDescriptor>(r#"{"type": "dense", "shape": [2]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("malformed `dense`"), "{err}");
    }

    #[test]
    fn type_tag_matches_kind_for_every_known_variant() {
        let descriptors = [
            ParserDescriptor::Dense {
                shape: vec![1],
                dtype: DType::Int64,
                default_value: Some(Scalar::Int(0)),
            },
            ParserDescriptor::Ragged { dtype: DType::Bool },
            ParserDescriptor::Sparse {
                index_field: "i".to_string(),
                value_field: "v".to_string(),
                dtype: DType::Float32,
                size: 4,
                already_sorted: false,
            },
            ParserDescriptor::FixedLenSequence {
                shape: vec![],
                dtype: DType::String,
                allow_missing: true,
                default_value: None,
            },
        ];
        for descriptor in descriptors {
            let json = serde_json::to_value(&descriptor).unwrap();
            assert_eq!(json["type"], descriptor.kind());
            assert!(KNOWN_KINDS.contains(&descriptor.kind()));

            let bytes = rmp_serde::to_vec_named(&descriptor).expect("serialize");
            let decoded: ParserDescriptor = rmp_serde::from_slice(&bytes).expect("deserialize");
            assert_eq!(decoded, descriptor);
        }
    }

    #[test]
    fn placeholder_accessors() {
        let descriptor = PlaceholderDescriptor::Sparse {
            dtype: DType::String,
            shape: TensorShape::new(vec![None, None]),
        };
        assert_eq!(descriptor.dtype(), DType::String);
        assert_eq!(descriptor.shape().rank(), Some(2));
        assert!(descriptor.is_sparse());
    }
}
