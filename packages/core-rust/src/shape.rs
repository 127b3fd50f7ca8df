//! Logical shapes of columns and the runtime shapes they are derived from.
//!
//! A [`LogicalShape`] describes the intrinsic dimensionality of a column's
//! data, irrespective of whether it is stored dense or sparse. A
//! [`TensorShape`] is what the numeric runtime reports for a concrete value
//! (and what placeholder construction consumes): an ordered list of optional
//! axis sizes, or no list at all when even the rank is unknown.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// One dimension of a logical shape. `size == None` means unknown (ragged).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Axis {
    pub size: Option<u64>,
}

impl Axis {
    #[must_use]
    pub fn fixed(size: u64) -> Self {
        Self { size: Some(size) }
    }

    #[must_use]
    pub fn unknown() -> Self {
        Self { size: None }
    }
}

/// Intrinsic shape of a column. `axes == None` means the rank itself is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalShape {
    pub axes: Option<Vec<Axis>>,
}

impl LogicalShape {
    #[must_use]
    pub fn new(axes: Vec<Axis>) -> Self {
        Self { axes: Some(axes) }
    }

    /// Shape of completely unknown rank.
    #[must_use]
    pub fn unknown_rank() -> Self {
        Self { axes: None }
    }

    /// Rank-0 shape of a single value per row.
    #[must_use]
    pub fn scalar() -> Self {
        Self::new(Vec::new())
    }

    /// Single axis of unknown length, the shape of a variable-length list.
    #[must_use]
    pub fn ragged() -> Self {
        Self::new(vec![Axis::unknown()])
    }

    /// Builds a shape whose every axis has a known size.
    #[must_use]
    pub fn fixed(sizes: &[u64]) -> Self {
        Self::new(sizes.iter().copied().map(Axis::fixed).collect())
    }

    /// Number of axes, or `None` for unknown rank.
    #[must_use]
    pub fn rank(&self) -> Option<usize> {
        self.axes.as_ref().map(Vec::len)
    }

    /// True iff the rank is known and every axis has a known size.
    #[must_use]
    pub fn is_fixed_size(&self) -> bool {
        self.axes
            .as_ref()
            .is_some_and(|axes| axes.iter().all(|axis| axis.size.is_some()))
    }

    /// This shape as the runtime's shape type.
    #[must_use]
    pub fn tf_shape(&self) -> TensorShape {
        TensorShape {
            dims: self
                .axes
                .as_ref()
                .map(|axes| axes.iter().map(|axis| axis.size).collect()),
        }
    }
}

impl fmt::Display for LogicalShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.tf_shape(), f)
    }
}

/// Shape as reported by the numeric runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TensorShape {
    pub dims: Option<Vec<Option<u64>>>,
}

impl TensorShape {
    #[must_use]
    pub fn new(dims: Vec<Option<u64>>) -> Self {
        Self { dims: Some(dims) }
    }

    #[must_use]
    pub fn unknown_rank() -> Self {
        Self { dims: None }
    }

    #[must_use]
    pub fn rank(&self) -> Option<usize> {
        self.dims.as_ref().map(Vec::len)
    }

    /// Prepends an axis of unbound size, the batch dimension of a placeholder.
    /// An unknown rank stays unknown.
    #[must_use]
    pub fn prepend_unbound(&self) -> Self {
        Self {
            dims: self.dims.as_ref().map(|dims| {
                let mut batched = Vec::with_capacity(dims.len() + 1);
                batched.push(None);
                batched.extend_from_slice(dims);
                batched
            }),
        }
    }
}

impl fmt::Display for TensorShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(dims) = &self.dims else {
            return f.write_str("<unknown>");
        };
        f.write_str("[")?;
        for (i, dim) in dims.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match dim {
                Some(size) => write!(f, "{size}")?,
                None => f.write_str("?")?,
            }
        }
        f.write_str("]")
    }
}

/// Builds a logical shape from a runtime shape, optionally removing the
/// leading (batch) axis.
///
/// # Errors
///
/// Returns [`SchemaError::Rank`] when `drop_leading_axis` is set and the shape
/// has rank 0 or unknown rank.
pub fn shape_from_runtime(shape: &TensorShape, drop_leading_axis: bool) -> Result<LogicalShape> {
    let Some(dims) = &shape.dims else {
        if drop_leading_axis {
            return Err(SchemaError::Rank {
                shape: shape.clone(),
            });
        }
        return Ok(LogicalShape::unknown_rank());
    };

    let dims = if drop_leading_axis {
        match dims.split_first() {
            Some((_batch, rest)) => rest,
            None => {
                return Err(SchemaError::Rank {
                    shape: shape.clone(),
                })
            }
        }
    } else {
        dims.as_slice()
    };

    Ok(LogicalShape::new(
        dims.iter().map(|&size| Axis { size }).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn unknown_rank_is_not_fixed_size() {
        assert!(!LogicalShape::unknown_rank().is_fixed_size());
    }

    #[test]
    fn scalar_shape_is_fixed_size() {
        assert!(LogicalShape::scalar().is_fixed_size());
    }

    #[test]
    fn any_unknown_axis_breaks_fixed_size() {
        let shape = LogicalShape::new(vec![Axis::fixed(2), Axis::unknown(), Axis::fixed(4)]);
        assert!(!shape.is_fixed_size());
    }

    #[test]
    fn tf_shape_preserves_axis_order_and_unknowns() {
        let shape = LogicalShape::new(vec![Axis::fixed(2), Axis::unknown()]);
        assert_eq!(shape.tf_shape(), TensorShape::new(vec![Some(2), None]));
        assert_eq!(LogicalShape::unknown_rank().tf_shape(), TensorShape::unknown_rank());
    }

    #[test]
    fn prepend_unbound_adds_batch_axis() {
        let shape = TensorShape::new(vec![Some(3)]);
        assert_eq!(shape.prepend_unbound(), TensorShape::new(vec![None, Some(3)]));
        assert_eq!(
            TensorShape::new(vec![]).prepend_unbound(),
            TensorShape::new(vec![None])
        );
        assert_eq!(
            TensorShape::unknown_rank().prepend_unbound(),
            TensorShape::unknown_rank()
        );
    }

    #[test]
    fn shape_from_runtime_drops_batch_axis() {
        let runtime = TensorShape::new(vec![None, Some(3)]);
        let logical = shape_from_runtime(&runtime, true).unwrap();
        assert_eq!(logical, LogicalShape::fixed(&[3]));
    }

    #[test]
    fn shape_from_runtime_keeps_all_axes_without_drop() {
        let runtime = TensorShape::new(vec![Some(8), None]);
        let logical = shape_from_runtime(&runtime, false).unwrap();
        assert_eq!(logical, LogicalShape::new(vec![Axis::fixed(8), Axis::unknown()]));
    }

    #[test]
    fn shape_from_runtime_rank_zero_drop_fails() {
        let runtime = TensorShape::new(vec![]);
        let err = shape_from_runtime(&runtime, true).unwrap_err();
        assert_eq!(err, SchemaError::Rank { shape: runtime });
    }

    #[test]
    fn shape_from_runtime_unknown_rank() {
        let runtime = TensorShape::unknown_rank();
        assert_eq!(
            shape_from_runtime(&runtime, false).unwrap(),
            LogicalShape::unknown_rank()
        );
        assert!(matches!(
            shape_from_runtime(&runtime, true),
            Err(SchemaError::Rank { .. })
        ));
    }

    #[test]
    fn display_renders_unknown_sizes() {
        assert_eq!(TensorShape::new(vec![None, Some(3)]).to_string(), "[?, 3]");
        assert_eq!(TensorShape::unknown_rank().to_string(), "<unknown>");
        assert_eq!(LogicalShape::scalar().to_string(), "[]");
    }

    fn arb_shape() -> impl Strategy<Value = LogicalShape> {
        proptest::option::of(proptest::collection::vec(
            proptest::option::of(0u64..64),
            0..5,
        ))
        .prop_map(|axes| LogicalShape {
            axes: axes.map(|sizes| sizes.into_iter().map(|size| Axis { size }).collect()),
        })
    }

    proptest! {
        #[test]
        fn prop_fixed_size_iff_all_axes_known(shape in arb_shape()) {
            let expected = match &shape.axes {
                None => false,
                Some(axes) => axes.iter().all(|a| a.size.is_some()),
            };
            prop_assert_eq!(shape.is_fixed_size(), expected);
        }

        #[test]
        fn prop_runtime_shape_roundtrip_without_drop(shape in arb_shape()) {
            let back = shape_from_runtime(&shape.tf_shape(), false).unwrap();
            prop_assert_eq!(back, shape);
        }
    }
}
