//! Seam to the external data layer. The composition core never talks
//! to a database; it sees opaque entries with a few capabilities, and
//! a data source that executes opaque queries.

use std::{any::Any, sync::Arc};

use anyhow::{bail, Result};
use kstring::KString;
use serde_json::{Map, Value};

/// Accessor probe kinds, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Is,
    Has,
    Get,
}

pub const ACCESSOR_PROBE_ORDER: [AccessorKind; 3] =
    [AccessorKind::Is, AccessorKind::Has, AccessorKind::Get];

/// What a resolution step can yield: a scalar, another entry, or a
/// collection of entries (relations always come back as collections).
#[derive(Clone)]
pub enum ColumnValue {
    Scalar(Value),
    Entry(Arc<dyn Entry>),
    Entries(Vec<Arc<dyn Entry>>),
}

/// An opaque data entry. All capabilities are optional; the resolver
/// walks them as an ordered strategy chain.
pub trait Entry {
    /// Stable key identifying the entry's type, for formatter lookup.
    fn type_key(&self) -> &str;

    /// The `is`/`has`/`get` accessor convention. `None` when the
    /// accessor does not exist or yields nothing.
    fn call_accessor(&self, _kind: AccessorKind, _name: &str) -> Option<ColumnValue> {
        None
    }

    /// Raw-field introspection, when the entry exposes one.
    fn raw_fields(&self) -> Option<&Map<String, Value>> {
        None
    }

    /// A zero-argument relation accessor. The returned handle is a
    /// validated relation, fetched through the data source; arbitrary
    /// method results don't qualify.
    fn relation(&self, _name: &str) -> Option<Box<dyn Query>> {
        None
    }

    /// Default text form, used when no formatter matches.
    fn default_text(&self) -> KString;
}

/// Self-describing table configuration an entry type may carry.
pub trait Presentable {
    fn columns(&self) -> Vec<KString>;

    /// `(column, label)` pairs for the head/foot rows.
    fn headers(&self) -> Vec<(KString, KString)>;

    fn show_head(&self) -> bool {
        true
    }

    fn show_foot(&self) -> bool {
        true
    }

    /// Columns and headers are the minimum a presentable type has to
    /// bring along.
    fn require_minimal_configuration(&self) -> Result<()> {
        if self.columns().is_empty() {
            bail!("presentable configuration is missing its columns");
        }
        if self.headers().is_empty() {
            bail!("presentable configuration is missing its headers");
        }
        Ok(())
    }
}

/// An opaque query handle. The core only ever configures it and hands
/// it to the data source.
pub trait Query: Any {
    /// Applies a named scope to the query.
    fn apply_scope(&mut self, name: &str) -> Result<()>;

    /// Self-describing configuration carried by the queried type, when
    /// there is one.
    fn presentable(&self) -> Option<&dyn Presentable> {
        None
    }

    /// Runs the self-describing configuration's query-modifier hook.
    fn apply_query_modifier(&mut self) -> Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any;
}

/// Executes queries. May block, may fail; the core treats the call as
/// an opaque synchronous operation.
pub trait DataSource {
    fn fetch(&self, query: &dyn Query) -> Result<Vec<Arc<dyn Entry>>>;
}
