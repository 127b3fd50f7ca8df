//! Error type shared by every conversion in the crate.
//!
//! Column-level failures are raised without knowledge of the column they
//! belong to; schema-level operations wrap them in [`SchemaError::Column`]
//! so callers always receive the offending column name.

use crate::shape::{LogicalShape, TensorShape};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors produced while building, converting, or merging schemas.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    /// A type tag matches no domain (or no known tag at all).
    #[error("schema cannot accommodate type: {type_tag}")]
    UnsupportedType { type_tag: String },

    /// Batch axis removal was requested on a rank-0 or unknown-rank shape.
    #[error("expected shape {shape} to have rank >= 1 to drop its leading axis")]
    Rank { shape: TensorShape },

    /// A fixed-size conversion was attempted on a shape with unknown axes.
    #[error("a column of unknown size cannot be represented as fixed-size: {shape}")]
    UnknownSize { shape: LogicalShape },

    /// A sparse representation does not fit the single-axis parser descriptor.
    #[error(
        "record parser supports only 1-d sparse columns: got {index_fields} index field(s) \
         and {} axis/axes",
        render_axes(.axes)
    )]
    UnsupportedRank {
        index_fields: usize,
        axes: Option<usize>,
    },

    /// A parser descriptor kind with no schema mapping.
    #[error("cannot interpret parser descriptor of kind `{kind}`")]
    UnsupportedDescriptor { kind: String },

    /// A descriptor kind that is reserved but not implemented.
    #[error("parser descriptor kind `{kind}` is not supported yet")]
    NotYetSupported { kind: String },

    /// Two column schemas disagree and the merge policy does not allow it.
    #[error("merge conflict on {field}: existing {existing}, incoming {incoming}")]
    MergeConflict {
        field: &'static str,
        existing: String,
        incoming: String,
    },

    /// Wraps a column-level error with the name of the column it concerns.
    /// The cause is reported through [`std::error::Error::source`].
    #[error("column `{column}`")]
    Column {
        column: String,
        #[source]
        source: Box<SchemaError>,
    },
}

#[allow(clippy::ref_option)]
fn render_axes(axes: &Option<usize>) -> String {
    axes.map_or_else(|| "unknown".to_string(), |n| n.to_string())
}

impl SchemaError {
    /// Attaches a column name to this error. Already-wrapped errors keep their
    /// original column.
    #[must_use]
    pub fn in_column(self, column: &str) -> Self {
        match self {
            Self::Column { .. } => self,
            other => Self::Column {
                column: column.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The column this error concerns, if known.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Column { column, .. } => Some(column),
            _ => None,
        }
    }

    /// The underlying error kind, with any column wrapper removed.
    #[must_use]
    pub fn root(&self) -> &SchemaError {
        match self {
            Self::Column { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_column_wraps_once() {
        let err = SchemaError::UnsupportedType {
            type_tag: "complex64".to_string(),
        }
        .in_column("a")
        .in_column("b");

        assert_eq!(err.column(), Some("a"));
        assert!(matches!(err.root(), SchemaError::UnsupportedType { .. }));
    }

    #[test]
    fn column_wrapper_reports_cause_once() {
        use std::error::Error;

        let err = SchemaError::NotYetSupported {
            kind: "fixed_len_sequence".to_string(),
        }
        .in_column("tokens");
        assert_eq!(err.to_string(), "column `tokens`");
        assert_eq!(
            err.source().map(ToString::to_string).as_deref(),
            Some("parser descriptor kind `fixed_len_sequence` is not supported yet")
        );

        let report = format!("{:#}", anyhow::Error::new(err));
        assert_eq!(report.matches("not supported yet").count(), 1, "{report}");
        assert_eq!(
            report,
            "column `tokens`: parser descriptor kind `fixed_len_sequence` is not supported yet"
        );
    }

    #[test]
    fn unsupported_rank_renders_unknown_axes() {
        let err = SchemaError::UnsupportedRank {
            index_fields: 1,
            axes: None,
        };
        assert!(err.to_string().contains("unknown axis/axes"));
    }

    #[test]
    fn root_of_unwrapped_error_is_itself() {
        let err = SchemaError::UnsupportedDescriptor {
            kind: "ragged".to_string(),
        };
        assert_eq!(err.root(), &err);
        assert!(err.column().is_none());
    }
}
