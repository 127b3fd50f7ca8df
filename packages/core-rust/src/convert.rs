//! Conversions into [`Schema`]: from parser descriptors and from runtime values.
//!
//! # Inference of sparse values
//!
//! [`infer_column_schema`] maps every sparse runtime value to a
//! [`ColumnRepresentation::List`] column with a single ragged axis. A sparse
//! value alone cannot tell a genuinely variable-length column apart from a
//! logically fixed-size column that happens to be sparsely encoded, and the
//! list reading is by far the more common one. Callers that need the
//! [`ColumnRepresentation::Sparse`] reading must supply an explicit schema
//! (e.g. via [`schema_from_parser_descriptors`]) instead of relying on
//! inference.

use std::collections::BTreeMap;

use tracing::debug;

use crate::descriptor::ParserDescriptor;
use crate::domain::dtype_to_domain;
use crate::error::{Result, SchemaError};
use crate::representation::{ColumnRepresentation, SparseIndexField};
use crate::schema::{ColumnSchema, Schema};
use crate::shape::{shape_from_runtime, Axis, LogicalShape};
use crate::traits::RuntimeValue;

/// Builds a schema from per-column parser descriptors.
///
/// # Errors
///
/// Fails on the first descriptor that cannot be expressed as a column schema;
/// the error names the column. See [`column_from_parser_descriptor`].
pub fn schema_from_parser_descriptors(
    descriptors: &BTreeMap<String, ParserDescriptor>,
) -> Result<Schema> {
    let schema = descriptors
        .iter()
        .map(|(name, descriptor)| {
            column_from_parser_descriptor(descriptor)
                .map(|column| (name.clone(), column))
                .map_err(|e| e.in_column(name))
        })
        .collect::<Result<Schema>>()?;
    debug!(columns = schema.len(), "built schema from parser descriptors");
    Ok(schema)
}

/// Converts a single parser descriptor into a column schema.
///
/// # Errors
///
/// - [`SchemaError::NotYetSupported`] for fixed-length sequence descriptors.
/// - [`SchemaError::UnsupportedDescriptor`] for descriptor kinds with no
///   mapping.
/// - [`SchemaError::UnsupportedType`] if the descriptor's type has no domain.
pub fn column_from_parser_descriptor(descriptor: &ParserDescriptor) -> Result<ColumnSchema> {
    match descriptor {
        ParserDescriptor::Dense {
            shape,
            dtype,
            default_value,
        } => Ok(ColumnSchema::new(
            dtype_to_domain(*dtype)?,
            LogicalShape::fixed(shape),
            ColumnRepresentation::Fixed {
                default_value: default_value.clone(),
            },
        )),
        ParserDescriptor::Ragged { dtype } => Ok(ColumnSchema::new(
            dtype_to_domain(*dtype)?,
            LogicalShape::ragged(),
            ColumnRepresentation::List,
        )),
        ParserDescriptor::Sparse {
            index_field,
            value_field,
            dtype,
            size,
            already_sorted,
        } => Ok(ColumnSchema::new(
            dtype_to_domain(*dtype)?,
            LogicalShape::new(vec![Axis::fixed(*size)]),
            ColumnRepresentation::Sparse {
                value_field: value_field.clone(),
                index_fields: vec![SparseIndexField::new(index_field.clone(), *already_sorted)],
            },
        )),
        ParserDescriptor::FixedLenSequence { .. } => Err(SchemaError::NotYetSupported {
            kind: descriptor.kind().to_string(),
        }),
        ParserDescriptor::Other { kind } => Err(SchemaError::UnsupportedDescriptor {
            kind: kind.clone(),
        }),
    }
}

/// Infers a column schema from a concrete runtime value.
///
/// Dense values become [`ColumnRepresentation::Fixed`] columns whose shape is
/// the value's shape without its batch axis. Sparse values always become
/// [`ColumnRepresentation::List`] columns; see the module docs.
///
/// # Errors
///
/// - [`SchemaError::UnsupportedType`] if the value's type has no domain.
/// - [`SchemaError::Rank`] if a dense value has rank 0 or unknown rank, so
///   there is no batch axis to remove.
pub fn infer_column_schema<V: RuntimeValue + ?Sized>(value: &V) -> Result<ColumnSchema> {
    let domain = dtype_to_domain(value.dtype())?;
    if value.is_sparse() {
        debug!(
            dtype = %value.dtype(),
            "inferred list representation for sparse value"
        );
        return Ok(ColumnSchema::new(
            domain,
            LogicalShape::ragged(),
            ColumnRepresentation::List,
        ));
    }
    let shape = shape_from_runtime(&value.shape(), true)?;
    Ok(ColumnSchema::new(domain, shape, ColumnRepresentation::fixed()))
}

/// Infers a schema from named runtime values, one column per value.
///
/// # Errors
///
/// Fails on the first value whose schema cannot be inferred; the error names
/// the column.
pub fn infer_schema<'a, V, I>(values: I) -> Result<Schema>
where
    V: RuntimeValue + ?Sized + 'a,
    I: IntoIterator<Item = (&'a str, &'a V)>,
{
    values
        .into_iter()
        .map(|(name, value)| {
            infer_column_schema(value)
                .map(|column| (name.to_string(), column))
                .map_err(|e| e.in_column(name))
        })
        .collect()
}
