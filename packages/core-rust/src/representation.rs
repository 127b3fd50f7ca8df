//! Physical layouts of a column's values.
//!
//! The set of layouts is closed: every conversion is an exhaustive match over
//! [`ColumnRepresentation`], so adding a layout means the compiler points at
//! every conversion that must learn about it.

use serde::{Deserialize, Serialize};

use crate::descriptor::{ParserDescriptor, PlaceholderDescriptor};
use crate::error::{Result, SchemaError};
use crate::schema::LogicalColumnSchema;
use crate::shape::LogicalShape;
use crate::types::Scalar;

/// One index field of a sparse representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SparseIndexField {
    /// Record field holding the indices along one axis.
    pub name: String,
    /// Whether indices are already sorted in the record.
    pub is_sorted: bool,
}

impl SparseIndexField {
    #[must_use]
    pub fn new(name: impl Into<String>, is_sorted: bool) -> Self {
        Self {
            name: name.into(),
            is_sorted,
        }
    }
}

/// How a column's values are laid out in memory or on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnRepresentation {
    /// Dense values of a fixed size. Without a default, missing data is an
    /// error when parsing.
    Fixed {
        #[serde(skip_serializing_if = "Option::is_none", default)]
        default_value: Option<Scalar>,
    },
    /// Variable number of values along one ragged axis.
    List,
    /// Sparse layout of a logically fixed-size column: one value field plus
    /// one index field per axis.
    Sparse {
        value_field: String,
        index_fields: Vec<SparseIndexField>,
    },
}

impl ColumnRepresentation {
    /// Fixed representation with no default value.
    #[must_use]
    pub fn fixed() -> Self {
        ColumnRepresentation::Fixed {
            default_value: None,
        }
    }

    /// Describes how the record parser should decode a column with this
    /// layout.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::UnknownSize`] for a fixed layout whose shape is not
    ///   fully known, or a sparse layout whose single axis has unknown size.
    /// - [`SchemaError::UnsupportedRank`] for a sparse layout without exactly
    ///   one index field and exactly one axis.
    pub fn to_parser_descriptor(&self, logical: &LogicalColumnSchema) -> Result<ParserDescriptor> {
        let dtype = logical.domain.dtype();
        match self {
            ColumnRepresentation::Fixed { default_value } => Ok(ParserDescriptor::Dense {
                shape: fixed_sizes(&logical.shape)?,
                dtype,
                default_value: default_value.clone(),
            }),
            ColumnRepresentation::List => Ok(ParserDescriptor::Ragged { dtype }),
            ColumnRepresentation::Sparse {
                value_field,
                index_fields,
            } => {
                let (index, axis) = match (index_fields.as_slice(), logical.shape.axes.as_deref()) {
                    ([index], Some([axis])) => (index, axis),
                    _ => {
                        return Err(SchemaError::UnsupportedRank {
                            index_fields: index_fields.len(),
                            axes: logical.shape.rank(),
                        })
                    }
                };
                let size = axis.size.ok_or_else(|| SchemaError::UnknownSize {
                    shape: logical.shape.clone(),
                })?;
                Ok(ParserDescriptor::Sparse {
                    index_field: index.name.clone(),
                    value_field: value_field.clone(),
                    dtype,
                    size,
                    already_sorted: index.is_sorted,
                })
            }
        }
    }

    /// Describes the batched placeholder that holds a column with this layout.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownSize`] for a fixed layout whose shape is
    /// not fully known.
    pub fn to_placeholder_descriptor(
        &self,
        logical: &LogicalColumnSchema,
    ) -> Result<PlaceholderDescriptor> {
        let dtype = logical.domain.dtype();
        let batched = logical.shape.tf_shape().prepend_unbound();
        match self {
            ColumnRepresentation::Fixed { .. } => {
                require_fixed_size(&logical.shape)?;
                Ok(PlaceholderDescriptor::Dense {
                    dtype,
                    shape: batched,
                })
            }
            ColumnRepresentation::List | ColumnRepresentation::Sparse { .. } => {
                Ok(PlaceholderDescriptor::Sparse {
                    dtype,
                    shape: batched,
                })
            }
        }
    }
}

fn require_fixed_size(shape: &LogicalShape) -> Result<()> {
    if shape.is_fixed_size() {
        Ok(())
    } else {
        Err(SchemaError::UnknownSize {
            shape: shape.clone(),
        })
    }
}

fn fixed_sizes(shape: &LogicalShape) -> Result<Vec<u64>> {
    require_fixed_size(shape)?;
    Ok(shape
        .axes
        .iter()
        .flatten()
        .filter_map(|axis| axis.size)
        .collect())
}
