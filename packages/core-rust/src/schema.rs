//! Column schemas and the dataset-level [`Schema`].

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{MergeConfig, MergePolicy};
use crate::descriptor::{ParserDescriptor, PlaceholderDescriptor};
use crate::domain::Domain;
use crate::error::{Result, SchemaError};
use crate::representation::ColumnRepresentation;
use crate::shape::LogicalShape;
use crate::traits::PlaceholderFactory;

/// The kind of data held by a column: its value domain and intrinsic shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicalColumnSchema {
    /// Legal scalar values.
    pub domain: Domain,
    /// Intrinsic shape, irrespective of dense or sparse storage.
    pub shape: LogicalShape,
}

/// Per-column metadata: what the data is and how it is laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Logical description of the column's data.
    pub logical: LogicalColumnSchema,
    /// Physical layout of the column's data.
    pub representation: ColumnRepresentation,
}

impl ColumnSchema {
    #[must_use]
    pub fn new(domain: Domain, shape: LogicalShape, representation: ColumnRepresentation) -> Self {
        Self {
            logical: LogicalColumnSchema { domain, shape },
            representation,
        }
    }

    #[must_use]
    pub fn domain(&self) -> Domain {
        self.logical.domain
    }

    #[must_use]
    pub fn shape(&self) -> &LogicalShape {
        &self.logical.shape
    }

    /// # Errors
    ///
    /// See [`ColumnRepresentation::to_parser_descriptor`].
    pub fn to_parser_descriptor(&self) -> Result<ParserDescriptor> {
        self.representation.to_parser_descriptor(&self.logical)
    }

    /// # Errors
    ///
    /// See [`ColumnRepresentation::to_placeholder_descriptor`].
    pub fn to_placeholder_descriptor(&self) -> Result<PlaceholderDescriptor> {
        self.representation.to_placeholder_descriptor(&self.logical)
    }

    /// The first field in which `other` differs from `self`, as a strict-merge
    /// conflict.
    fn conflict_with(&self, other: &ColumnSchema) -> Option<SchemaError> {
        let (field, existing, incoming) = if self.logical.domain != other.logical.domain {
            (
                "domain",
                self.logical.domain.to_string(),
                other.logical.domain.to_string(),
            )
        } else if self.logical.shape != other.logical.shape {
            (
                "shape",
                self.logical.shape.to_string(),
                other.logical.shape.to_string(),
            )
        } else if self.representation != other.representation {
            (
                "representation",
                format!("{:?}", self.representation),
                format!("{:?}", other.representation),
            )
        } else {
            return None;
        };
        Some(SchemaError::MergeConflict {
            field,
            existing,
            incoming,
        })
    }

    /// Merges `other` into this column schema.
    ///
    /// Identical schemas merge as a no-op under every policy. Otherwise the
    /// policy decides: `Strict` fails, the `Prefer*` policies pick one side
    /// and log a warning.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MergeConflict`] under [`MergePolicy::Strict`]
    /// when any field differs.
    pub fn merge(&mut self, other: ColumnSchema, policy: MergePolicy) -> Result<()> {
        let Some(conflict) = self.conflict_with(&other) else {
            return Ok(());
        };
        match policy {
            MergePolicy::Strict => Err(conflict),
            MergePolicy::PreferExisting => {
                warn!(%conflict, "keeping existing column schema");
                Ok(())
            }
            MergePolicy::PreferIncoming => {
                warn!(%conflict, "replacing column schema with incoming one");
                *self = other;
                Ok(())
            }
        }
    }
}

/// Schema of a dataset: column name to [`ColumnSchema`].
///
/// Columns are kept sorted by name so descriptor maps and placeholder
/// construction are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub columns: BTreeMap<String, ColumnSchema>,
}

impl Schema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_columns(columns: BTreeMap<String, ColumnSchema>) -> Self {
        Self { columns }
    }

    /// Inserts a column, returning the schema it replaced.
    pub fn insert(&mut self, name: impl Into<String>, column: ColumnSchema) -> Option<ColumnSchema> {
        self.columns.insert(name.into(), column)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Merges `other` into this schema under the default (strict) policy.
    ///
    /// # Errors
    ///
    /// See [`Schema::merge_with`].
    pub fn merge(&mut self, other: Schema) -> Result<()> {
        self.merge_with(other, &MergeConfig::default())
    }

    /// Merges `other` into this schema. Columns only in `other` are inserted;
    /// columns in both are merged according to `config.policy`.
    ///
    /// The merge is atomic: every overlapping column is checked before the
    /// receiver is touched, so a conflict leaves `self` unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MergeConflict`], wrapped with the column name,
    /// for the first conflicting column under [`MergePolicy::Strict`].
    pub fn merge_with(&mut self, other: Schema, config: &MergeConfig) -> Result<()> {
        if config.policy == MergePolicy::Strict {
            for (name, incoming) in &other.columns {
                if let Some(conflict) = self
                    .columns
                    .get(name)
                    .and_then(|existing| existing.conflict_with(incoming))
                {
                    return Err(conflict.in_column(name));
                }
            }
        }

        for (name, incoming) in other.columns {
            match self.columns.entry(name) {
                Entry::Vacant(slot) => {
                    slot.insert(incoming);
                }
                Entry::Occupied(mut slot) => {
                    let span = tracing::debug_span!("merge_column", column = %slot.key());
                    let _guard = span.enter();
                    let column = slot.key().clone();
                    slot.get_mut()
                        .merge(incoming, config.policy)
                        .map_err(|e| e.in_column(&column))?;
                }
            }
        }
        Ok(())
    }

    /// Parser descriptors for every column.
    ///
    /// # Errors
    ///
    /// Fails on the first column whose layout cannot be expressed as a parser
    /// descriptor; the error names that column.
    pub fn to_parser_descriptors(&self) -> Result<BTreeMap<String, ParserDescriptor>> {
        let descriptors = self
            .columns
            .iter()
            .map(|(name, column)| {
                column
                    .to_parser_descriptor()
                    .map(|descriptor| (name.clone(), descriptor))
                    .map_err(|e| e.in_column(name))
            })
            .collect::<Result<BTreeMap<_, _>>>()?;
        debug!(columns = descriptors.len(), "built parser descriptors");
        Ok(descriptors)
    }

    /// Placeholder descriptors for every column.
    ///
    /// # Errors
    ///
    /// Fails on the first fixed-layout column of unknown size; the error names
    /// that column.
    pub fn to_placeholder_descriptors(&self) -> Result<BTreeMap<String, PlaceholderDescriptor>> {
        self.columns
            .iter()
            .map(|(name, column)| {
                column
                    .to_placeholder_descriptor()
                    .map(|descriptor| (name.clone(), descriptor))
                    .map_err(|e| e.in_column(name))
            })
            .collect()
    }

    /// Asks `factory` for a batched placeholder per column, in column-name
    /// order.
    ///
    /// # Errors
    ///
    /// Fails if a descriptor cannot be built or the factory rejects one.
    pub fn build_placeholders<F: PlaceholderFactory>(
        &self,
        factory: &F,
    ) -> anyhow::Result<BTreeMap<String, F::Placeholder>> {
        let mut placeholders = BTreeMap::new();
        for (name, column) in &self.columns {
            let descriptor = column
                .to_placeholder_descriptor()
                .map_err(|e| e.in_column(name))?;
            let placeholder = factory
                .placeholder(name, &descriptor)
                .with_context(|| format!("placeholder factory failed for column `{name}`"))?;
            placeholders.insert(name.clone(), placeholder);
        }
        Ok(placeholders)
    }
}

impl FromIterator<(String, ColumnSchema)> for Schema {
    fn from_iter<I: IntoIterator<Item = (String, ColumnSchema)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
