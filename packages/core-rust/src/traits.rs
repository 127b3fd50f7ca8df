use crate::descriptor::PlaceholderDescriptor;
use crate::dtype::DType;
use crate::shape::TensorShape;

/// Shape and type query over a concrete value of the numeric runtime.
/// Schema inference reads nothing else from a value.
pub trait RuntimeValue {
    /// Element type tag of the value.
    fn dtype(&self) -> DType;

    /// Shape of the value, including its leading batch axis.
    fn shape(&self) -> TensorShape;

    /// Whether the value is an index/value sparse encoding rather than dense.
    fn is_sparse(&self) -> bool;
}

/// Dense or sparse encoding of a runtime value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueEncoding {
    Dense,
    Sparse,
}

/// Runtime value metadata for callers that already hold it outside the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorInfo {
    /// Element type tag.
    pub dtype: DType,
    /// Shape including the batch axis.
    pub shape: TensorShape,
    /// Dense or sparse encoding.
    pub encoding: ValueEncoding,
}

impl TensorInfo {
    #[must_use]
    pub fn dense(dtype: DType, shape: TensorShape) -> Self {
        Self {
            dtype,
            shape,
            encoding: ValueEncoding::Dense,
        }
    }

    #[must_use]
    pub fn sparse(dtype: DType, shape: TensorShape) -> Self {
        Self {
            dtype,
            shape,
            encoding: ValueEncoding::Sparse,
        }
    }
}

impl RuntimeValue for TensorInfo {
    fn dtype(&self) -> DType {
        self.dtype
    }

    fn shape(&self) -> TensorShape {
        self.shape.clone()
    }

    fn is_sparse(&self) -> bool {
        self.encoding == ValueEncoding::Sparse
    }
}

/// Builds batched placeholders in the numeric runtime.
/// Implementations own the runtime handle; this crate only describes what to build.
pub trait PlaceholderFactory {
    /// Runtime-side placeholder handle.
    type Placeholder;

    /// Create the placeholder for one column.
    ///
    /// # Errors
    ///
    /// Any runtime failure while creating the placeholder.
    fn placeholder(
        &self,
        name: &str,
        descriptor: &PlaceholderDescriptor,
    ) -> anyhow::Result<Self::Placeholder>;
}
