//! Scalar element type tags of the numeric runtime.
//!
//! A [`DType`] is a stable, serializable identifier (`"int32"`, `"float64"`,
//! ...), never a live handle into the runtime's type registry. Tags serialize
//! as their lowercase names so that schemas can be rebuilt without the
//! runtime being reachable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Scalar element type tag.
///
/// Variant names serialize in lowercase to match the runtime's tag strings
/// exactly (`UInt8` -> `"uint8"`, `BFloat16` -> `"bfloat16"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    BFloat16,
    Float16,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
}

impl DType {
    /// Every tag known to the runtime, in declaration order.
    pub const ALL: [DType; 16] = [
        DType::Bool,
        DType::Int8,
        DType::Int16,
        DType::Int32,
        DType::Int64,
        DType::UInt8,
        DType::UInt16,
        DType::UInt32,
        DType::UInt64,
        DType::BFloat16,
        DType::Float16,
        DType::Float32,
        DType::Float64,
        DType::Complex64,
        DType::Complex128,
        DType::String,
    ];

    /// The wire tag for this type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
            DType::BFloat16 => "bfloat16",
            DType::Float16 => "float16",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Complex64 => "complex64",
            DType::Complex128 => "complex128",
            DType::String => "string",
        }
    }

    /// Signed or unsigned integer of any width.
    #[must_use]
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            DType::Int8
                | DType::Int16
                | DType::Int32
                | DType::Int64
                | DType::UInt8
                | DType::UInt16
                | DType::UInt32
                | DType::UInt64
        )
    }

    /// Real floating point of any width. Complex types are not floating.
    #[must_use]
    pub fn is_floating(self) -> bool {
        matches!(
            self,
            DType::BFloat16 | DType::Float16 | DType::Float32 | DType::Float64
        )
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DType::ALL
            .into_iter()
            .find(|dtype| dtype.as_str() == s)
            .ok_or_else(|| SchemaError::UnsupportedType {
                type_tag: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_matches_as_str_for_every_tag() {
        for dtype in DType::ALL {
            assert_eq!(dtype.as_str().parse::<DType>().unwrap(), dtype);
        }
    }

    #[test]
    fn parse_unknown_tag_fails_with_unsupported_type() {
        let err = "qint8".parse::<DType>().unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnsupportedType {
                type_tag: "qint8".to_string()
            }
        );
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert!("Int32".parse::<DType>().is_err());
    }

    #[test]
    fn serde_uses_tag_string() {
        for dtype in DType::ALL {
            let json = serde_json::to_string(&dtype).unwrap();
            assert_eq!(json, format!("\"{}\"", dtype.as_str()));
        }
    }

    #[test]
    fn integer_and_floating_families_are_disjoint() {
        for dtype in DType::ALL {
            assert!(!(dtype.is_integer() && dtype.is_floating()), "{dtype}");
        }
        assert!(DType::UInt64.is_integer());
        assert!(DType::BFloat16.is_floating());
        assert!(!DType::Complex64.is_floating());
        assert!(!DType::Bool.is_integer());
    }
}
