//! Column value resolution: walking dot-delimited accessor paths over
//! opaque entries.

use std::{collections::HashMap, sync::Arc};

use anyhow::{bail, Result};
use kstring::KString;
use serde_json::Value;

use domtag::nowarn as warn;

use crate::model::{ColumnValue, DataSource, Entry, ACCESSOR_PROBE_ORDER};

#[derive(Debug, thiserror::Error)]
pub enum ColumnError {
    #[error("required column {0:?} did not resolve")]
    UnresolvedRequiredColumn(KString),
}

pub type Formatter = Arc<dyn Fn(&dyn Entry) -> KString + Send + Sync>;

/// Formatters for related entries, keyed by related type, owner type
/// and (optionally) scope. Registered at composition time; the lookup
/// falls back from the scoped key to the unscoped one.
#[derive(Default, Clone)]
pub struct FormatterTable {
    formatters: HashMap<(KString, KString, Option<KString>), Formatter>,
}

impl FormatterTable {
    pub fn new() -> FormatterTable {
        FormatterTable::default()
    }

    pub fn register(
        &mut self,
        related_type: &str,
        owner_type: &str,
        scope: Option<&str>,
        formatter: Formatter,
    ) -> &mut FormatterTable {
        self.formatters.insert(
            (
                KString::from_ref(related_type),
                KString::from_ref(owner_type),
                scope.map(KString::from_ref),
            ),
            formatter,
        );
        self
    }

    pub fn lookup(
        &self,
        related_type: &str,
        owner_type: &str,
        scope: Option<&str>,
    ) -> Option<&Formatter> {
        if let Some(scope) = scope {
            let key = (
                KString::from_ref(related_type),
                KString::from_ref(owner_type),
                Some(KString::from_ref(scope)),
            );
            if let Some(f) = self.formatters.get(&key) {
                return Some(f);
            }
        }
        let key = (
            KString::from_ref(related_type),
            KString::from_ref(owner_type),
            None,
        );
        self.formatters.get(&key)
    }
}

/// Resolves column paths for one render pass.
pub struct ColumnResolver<'a> {
    source: Option<&'a dyn DataSource>,
    formatters: &'a FormatterTable,
    scope: Option<&'a str>,
}

impl<'a> ColumnResolver<'a> {
    pub fn new(source: Option<&'a dyn DataSource>, formatters: &'a FormatterTable) -> Self {
        ColumnResolver { source, formatters, scope: None }
    }

    pub fn with_scope(mut self, scope: Option<&'a str>) -> Self {
        self.scope = scope;
        self
    }

    /// Resolves `path` against `entry`. `Ok(None)` means absent; the
    /// caller decides between placeholder and failure.
    pub fn resolve(&self, entry: &Arc<dyn Entry>, path: &str) -> Result<Option<KString>> {
        let owner_type = KString::from_ref(entry.type_key());
        let mut cursor = ColumnValue::Entry(entry.clone());
        for segment in path.split('.') {
            // A one-element collection collapses to its element before
            // the next segment runs.
            if let ColumnValue::Entries(entries) = &cursor {
                if entries.len() == 1 {
                    let only = entries[0].clone();
                    cursor = ColumnValue::Entry(only);
                }
            }
            let entry = match &cursor {
                ColumnValue::Entry(entry) => entry.clone(),
                // Scalars and zero-or-many collections can't take
                // further segments; such collections are only valid at
                // the terminal step.
                _ => return Ok(None),
            };
            match self.resolve_segment(&entry, segment)? {
                Some(value) => cursor = value,
                None => return Ok(None),
            }
        }
        self.finish(cursor, &owner_type)
    }

    /// The ordered strategy chain, first success wins: accessor probe,
    /// raw-field lookup, relation traversal.
    fn resolve_segment(
        &self,
        entry: &Arc<dyn Entry>,
        segment: &str,
    ) -> Result<Option<ColumnValue>> {
        for kind in ACCESSOR_PROBE_ORDER {
            if let Some(value) = entry.call_accessor(kind, segment) {
                return Ok(Some(value));
            }
        }
        if let Some(fields) = entry.raw_fields() {
            if let Some(value) = fields.get(segment) {
                return Ok(Some(ColumnValue::Scalar(value.clone())));
            }
        }
        if let Some(relation) = entry.relation(segment) {
            let source = match self.source {
                Some(source) => source,
                None => bail!("relation {:?} needs a data source to fetch through", segment),
            };
            let related = source.fetch(&*relation)?;
            return Ok(Some(ColumnValue::Entries(related)));
        }
        warn!("segment {segment:?} absent on {:?}", entry.type_key());
        Ok(None)
    }

    fn finish(&self, value: ColumnValue, owner_type: &str) -> Result<Option<KString>> {
        match value {
            ColumnValue::Scalar(Value::Null) => Ok(None),
            ColumnValue::Scalar(value) => Ok(Some(scalar_text(&value))),
            ColumnValue::Entry(entry) => Ok(Some(entry.default_text())),
            ColumnValue::Entries(entries) => {
                let mut out = String::new();
                for related in &entries {
                    out.push_str(&self.related_text(&**related, owner_type));
                }
                Ok(Some(KString::from_string(out)))
            }
        }
    }

    /// Formatter lookup for one related entry, falling back to its
    /// default text form.
    fn related_text(&self, related: &dyn Entry, owner_type: &str) -> KString {
        match self
            .formatters
            .lookup(related.type_key(), owner_type, self.scope)
        {
            Some(formatter) => formatter(related),
            None => {
                warn!("no formatter for {:?} of {owner_type:?}", related.type_key());
                related.default_text()
            }
        }
    }
}

fn scalar_text(value: &Value) -> KString {
    match value {
        Value::String(s) => KString::from_ref(s),
        other => KString::from_string(other.to_string()),
    }
}
