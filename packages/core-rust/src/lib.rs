//! Dataset schema — column domains, logical shapes, and physical representations.

pub mod config;
pub mod convert;
pub mod descriptor;
pub mod domain;
pub mod dtype;
pub mod error;
pub mod representation;
pub mod schema;
pub mod shape;
pub mod traits;
pub mod types;

pub use config::{MergeConfig, MergePolicy};
pub use convert::{
    column_from_parser_descriptor, infer_column_schema, infer_schema,
    schema_from_parser_descriptors,
};
pub use descriptor::{ParserDescriptor, PlaceholderDescriptor};
pub use domain::{dtype_to_domain, Domain, FloatType, IntType};
pub use dtype::DType;
pub use error::{Result, SchemaError};
pub use representation::{ColumnRepresentation, SparseIndexField};
pub use schema::{ColumnSchema, LogicalColumnSchema, Schema};
pub use shape::{shape_from_runtime, Axis, LogicalShape, TensorShape};
pub use traits::{PlaceholderFactory, RuntimeValue, TensorInfo, ValueEncoding};
pub use types::Scalar;
