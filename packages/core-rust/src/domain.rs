//! Value domains: the set of legal scalar values for a column.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dtype::DType;
use crate::error::{Result, SchemaError};

/// Integer element types accepted by [`Domain::Int`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntType {
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
}

/// Floating element types accepted by [`Domain::Float`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatType {
    BFloat16,
    Float16,
    Float32,
    Float64,
}

impl From<IntType> for DType {
    fn from(value: IntType) -> Self {
        match value {
            IntType::Int8 => DType::Int8,
            IntType::Int16 => DType::Int16,
            IntType::Int32 => DType::Int32,
            IntType::Int64 => DType::Int64,
            IntType::UInt8 => DType::UInt8,
            IntType::UInt16 => DType::UInt16,
            IntType::UInt32 => DType::UInt32,
            IntType::UInt64 => DType::UInt64,
        }
    }
}

impl From<FloatType> for DType {
    fn from(value: FloatType) -> Self {
        match value {
            FloatType::BFloat16 => DType::BFloat16,
            FloatType::Float16 => DType::Float16,
            FloatType::Float32 => DType::Float32,
            FloatType::Float64 => DType::Float64,
        }
    }
}

/// The set of legal scalar values for a column, independent of shape and layout.
///
/// Integer and floating domains keep the specific width they were built from,
/// so `Int(Int32)` and `Int(Int64)` are different domains. Serializes as the
/// bare type tag (`"int32"`), which is all that is needed to rebuild it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "DType", try_from = "DType")]
pub enum Domain {
    Bool,
    Int(IntType),
    Float(FloatType),
    String,
}

impl Domain {
    /// The element type tag carried by this domain.
    #[must_use]
    pub fn dtype(self) -> DType {
        match self {
            Domain::Bool => DType::Bool,
            Domain::Int(int) => int.into(),
            Domain::Float(float) => float.into(),
            Domain::String => DType::String,
        }
    }

    /// Resolves a type tag string such as `"float32"` to its domain.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnsupportedType`] if the tag is unknown or names a
    /// type no domain accommodates.
    pub fn from_type_tag(type_tag: &str) -> Result<Self> {
        dtype_to_domain(type_tag.parse()?)
    }
}

/// Maps an element type to the domain that accommodates it.
///
/// # Errors
///
/// Returns [`SchemaError::UnsupportedType`] for types outside the bool,
/// integer, floating, and string families (e.g. `complex64`).
pub fn dtype_to_domain(dtype: DType) -> Result<Domain> {
    let domain = match dtype {
        DType::Bool => Domain::Bool,
        DType::Int8 => Domain::Int(IntType::Int8),
        DType::Int16 => Domain::Int(IntType::Int16),
        DType::Int32 => Domain::Int(IntType::Int32),
        DType::Int64 => Domain::Int(IntType::Int64),
        DType::UInt8 => Domain::Int(IntType::UInt8),
        DType::UInt16 => Domain::Int(IntType::UInt16),
        DType::UInt32 => Domain::Int(IntType::UInt32),
        DType::UInt64 => Domain::Int(IntType::UInt64),
        DType::BFloat16 => Domain::Float(FloatType::BFloat16),
        DType::Float16 => Domain::Float(FloatType::Float16),
        DType::Float32 => Domain::Float(FloatType::Float32),
        DType::Float64 => Domain::Float(FloatType::Float64),
        DType::String => Domain::String,
        DType::Complex64 | DType::Complex128 => {
            return Err(SchemaError::UnsupportedType {
                type_tag: dtype.to_string(),
            })
        }
    };
    Ok(domain)
}

impl From<Domain> for DType {
    fn from(domain: Domain) -> Self {
        domain.dtype()
    }
}

impl TryFrom<DType> for Domain {
    type Error = SchemaError;

    fn try_from(dtype: DType) -> Result<Self> {
        dtype_to_domain(dtype)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let family = match self {
            Domain::Bool => "Bool",
            Domain::Int(_) => "Int",
            Domain::Float(_) => "Float",
            Domain::String => "String",
        };
        write!(f, "{family}({})", self.dtype())
    }
}
