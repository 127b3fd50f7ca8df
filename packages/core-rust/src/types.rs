use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar value used as the default for missing data in fixed-size columns.
///
/// Mirrors the scalar domains a column can take. String columns may carry
/// either UTF-8 text or raw bytes, since the runtime's string type is a byte
/// string.
///
/// Equality is by value: floats compare by bit pattern, so a `NaN` default
/// equals itself and columns carrying it stay structurally comparable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Scalar {
    /// Boolean default.
    Bool(bool),
    /// Integer default, widened to signed 64-bit.
    Int(i64),
    /// Floating-point default, widened to 64-bit IEEE 754.
    Float(#[serde(with = "float_repr")] f64),
    /// UTF-8 string default.
    String(String),
    /// Raw byte-string default.
    Bytes(#[serde(with = "serde_bytes")] Vec<u8>),
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            (Scalar::Int(a), Scalar::Int(b)) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => a.to_bits() == b.to_bits(),
            (Scalar::String(a), Scalar::String(b)) => a == b,
            (Scalar::Bytes(a), Scalar::Bytes(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Scalar {}

/// Serde adapter for float defaults. Non-finite values are written as the
/// strings `"NaN"`, `"inf"` and `"-inf"` so formats without them (JSON) can
/// carry them back.
mod float_repr {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    const NAN: &str = "NaN";
    const INFINITY: &str = "inf";
    const NEG_INFINITY: &str = "-inf";

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str(NAN)
        } else if value.is_infinite() {
            let tag = if value.is_sign_positive() { INFINITY } else { NEG_INFINITY };
            serializer.serialize_str(tag)
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(FloatVisitor)
    }

    struct FloatVisitor;

    impl Visitor<'_> for FloatVisitor {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a number or one of \"NaN\", \"inf\", \"-inf\"")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        #[allow(clippy::cast_precision_loss)]
        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        #[allow(clippy::cast_precision_loss)]
        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            match v {
                NAN => Ok(f64::NAN),
                INFINITY => Ok(f64::INFINITY),
                NEG_INFINITY => Ok(f64::NEG_INFINITY),
                other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
            }
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{v}"),
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::Float(v) => write!(f, "{v}"),
            Scalar::String(v) => write!(f, "{v:?}"),
            Scalar::Bytes(v) => write!(f, "b{:?}", String::from_utf8_lossy(v)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_pick_matching_variant() {
        assert_eq!(Scalar::from(true), Scalar::Bool(true));
        assert_eq!(Scalar::from(-3_i64), Scalar::Int(-3));
        assert_eq!(Scalar::from(0.5), Scalar::Float(0.5));
        assert_eq!(Scalar::from("n/a"), Scalar::String("n/a".to_string()));
    }

    #[test]
    fn bytes_serialize_as_msgpack_bin() {
        let value = Scalar::Bytes(vec![0xde, 0xad]);
        let bytes = rmp_serde::to_vec(&value).expect("serialize");
        let decoded: Scalar = rmp_serde::from_slice(&bytes).expect("deserialize");
        assert_eq!(decoded, value);
        // bin8 marker followed by the length
        assert!(bytes.windows(2).any(|w| w == [0xc4, 0x02]));
    }

    #[test]
    fn nan_default_equals_itself() {
        assert_eq!(Scalar::Float(f64::NAN), Scalar::Float(f64::NAN));
        assert_ne!(Scalar::Float(f64::NAN), Scalar::Float(0.0));
        assert_ne!(Scalar::Float(1.0), Scalar::Int(1));
    }

    #[test]
    fn non_finite_floats_survive_json() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let scalar = Scalar::Float(value);
            let json = serde_json::to_string(&scalar).expect("serialize");
            let decoded: Scalar = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(decoded, scalar, "{json}");
        }
        assert_eq!(
            serde_json::to_string(&Scalar::Float(f64::NAN)).unwrap(),
            r#"{"Float":"NaN"}"#
        );
    }

    #[test]
    fn finite_floats_stay_numbers() {
        assert_eq!(
            serde_json::to_string(&Scalar::Float(1.5)).unwrap(),
            r#"{"Float":1.5}"#
        );
        let decoded: Scalar = serde_json::from_str(r#"{"Float":2}"#).unwrap();
        assert_eq!(decoded, Scalar::Float(2.0));
        assert!(serde_json::from_str::<Scalar>(r#"{"Float":"nan"}"#).is_err());
    }

    #[test]
    fn nan_survives_msgpack() {
        let scalar = Scalar::Float(f64::NAN);
        let bytes = rmp_serde::to_vec(&scalar).expect("serialize");
        let decoded: Scalar = rmp_serde::from_slice(&bytes).expect("deserialize");
        assert_eq!(decoded, scalar);
    }

    #[test]
    fn display_quotes_strings() {
        assert_eq!(Scalar::from("x").to_string(), "\"x\"");
        assert_eq!(Scalar::Int(7).to_string(), "7");
    }
}
