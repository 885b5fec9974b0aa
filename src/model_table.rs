//! A table that (re)populates itself from a data source at render
//! time.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use kstring::KString;

use domtag::{indexed::IndexedMap, DomTag};

use crate::{column::{ColumnError, ColumnResolver, FormatterTable},
            model::{DataSource, Entry, Query},
            registry::Component,
            table::{Cell, Row, Section, Table}};

/// Data-bound table: holds a query (or a pre-fetched collection),
/// column/header configuration and rendering policy. Every render
/// re-fetches and rebuilds the row tree, so the output follows the
/// external source.
pub struct ModelTable {
    table: Table,
    source: Option<Arc<dyn DataSource>>,
    query: Option<Box<dyn Query>>,
    /// The collection to work with; refreshed from the query when one
    /// is set.
    collection: Vec<Arc<dyn Entry>>,
    formatters: FormatterTable,
    columns: Vec<KString>,
    // column -> label
    headers: IndexedMap<KString>,
    show_head: bool,
    show_foot: bool,
    scope: Option<KString>,
    /// Shown in place of values that did not resolve.
    empty_placeholder: KString,
    /// When set, an unresolved column is fatal instead.
    strict_columns: bool,
}

impl ModelTable {
    pub fn new() -> ModelTable {
        ModelTable {
            table: Table::new(),
            source: None,
            query: None,
            collection: Vec::new(),
            formatters: FormatterTable::new(),
            columns: Vec::new(),
            headers: IndexedMap::new(),
            show_head: false,
            show_foot: false,
            scope: None,
            empty_placeholder: KString::from_static("-"),
            strict_columns: false,
        }
    }

    pub fn set_source(&mut self, source: Arc<dyn DataSource>) -> &mut ModelTable {
        self.source = Some(source);
        self
    }

    pub fn set_query(&mut self, query: Box<dyn Query>) -> &mut ModelTable {
        self.query = Some(query);
        self
    }

    /// Working directly from an already-fetched collection.
    pub fn set_collection(&mut self, collection: Vec<Arc<dyn Entry>>) -> &mut ModelTable {
        self.collection = collection;
        self
    }

    /// Ad-hoc query adjustment by the caller.
    pub fn modify_query(
        &mut self,
        modify: impl FnOnce(&mut dyn Query) -> Result<()>,
    ) -> Result<&mut ModelTable> {
        let query = self.query.as_mut().context("no query to modify")?;
        modify(query.as_mut())?;
        Ok(self)
    }

    /// Applies a named scope to the query and remembers it for
    /// formatter lookup.
    pub fn set_scope(&mut self, name: &str) -> Result<&mut ModelTable> {
        let query = self.query.as_mut().context("no query to scope")?;
        query.apply_scope(name)?;
        self.scope = Some(KString::from_ref(name));
        Ok(self)
    }

    pub fn set_columns(&mut self, columns: Vec<KString>) -> &mut ModelTable {
        self.columns = columns;
        self
    }

    pub fn set_headers(
        &mut self,
        headers: impl IntoIterator<Item = (KString, KString)>,
    ) -> &mut ModelTable {
        for (column, label) in headers {
            self.headers.set(column, label);
        }
        self
    }

    pub fn set_show_head(&mut self, show: bool) -> &mut ModelTable {
        self.show_head = show;
        self
    }

    pub fn set_show_foot(&mut self, show: bool) -> &mut ModelTable {
        self.show_foot = show;
        self
    }

    pub fn set_empty_placeholder(&mut self, placeholder: impl Into<KString>) -> &mut ModelTable {
        self.empty_placeholder = placeholder.into();
        self
    }

    pub fn set_strict_columns(&mut self, strict: bool) -> &mut ModelTable {
        self.strict_columns = strict;
        self
    }

    pub fn formatters_mut(&mut self) -> &mut FormatterTable {
        &mut self.formatters
    }

    /// The underlying table, for attribute access.
    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    /// Adopts the query's self-describing configuration when the
    /// caller supplied none.
    fn adopt_configuration(&mut self) -> Result<()> {
        let query = match &mut self.query {
            Some(query) if self.columns.is_empty() => query,
            _ => return Ok(()),
        };
        let (columns, headers, show_head, show_foot) = match query.presentable() {
            Some(config) => {
                config.require_minimal_configuration()?;
                (
                    config.columns(),
                    config.headers(),
                    config.show_head(),
                    config.show_foot(),
                )
            }
            None => return Ok(()),
        };
        self.columns = columns;
        for (column, label) in headers {
            self.headers.set(column, label);
        }
        self.show_head = show_head;
        self.show_foot = show_foot;
        query.apply_query_modifier()?;
        Ok(())
    }

    fn header_row_spec(&self) -> Result<Vec<(KString, String)>> {
        let mut cells = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let label = self
                .headers
                .get(column)
                .with_context(|| format!("no label specified for column {column:?}"))?;
            cells.push((column.clone(), label.to_string()));
        }
        Ok(cells)
    }

    /// Re-fetches and rebuilds head, foot and body from the current
    /// state of the data source.
    pub fn build_contents(&mut self) -> Result<()> {
        self.adopt_configuration()?;
        if self.columns.is_empty() {
            bail!("no columns configured and the query is not self-describing");
        }

        if let Some(query) = &self.query {
            let source = self
                .source
                .as_ref()
                .context("a query needs a data source to run against")?;
            self.collection = source.fetch(query.as_ref())?;
        }

        let mut head = Section::head();
        if self.show_head {
            head.build_content_from_array([(KString::from_static("0"), self.header_row_spec()?)]);
        }
        self.table.set_head(head);

        let mut foot = Section::foot();
        if self.show_foot {
            foot.build_content_from_array([(KString::from_static("0"), self.header_row_spec()?)]);
        }
        self.table.set_foot(foot);

        let resolver = ColumnResolver::new(
            self.source.as_ref().map(|s| s.as_ref() as &dyn DataSource),
            &self.formatters,
        )
        .with_scope(self.scope.as_deref());

        let mut body = Section::body();
        for (index, entry) in self.collection.iter().enumerate() {
            let mut row = Row::new();
            for column in &self.columns {
                let content = match resolver.resolve(entry, column)? {
                    Some(text) => text.to_string(),
                    None if self.strict_columns => {
                        return Err(ColumnError::UnresolvedRequiredColumn(column.clone()).into())
                    }
                    None => self.empty_placeholder.to_string(),
                };
                row.set_cell(column.clone(), Cell::with_content(content));
            }
            body.set_row(KString::from_string(index.to_string()), row);
        }
        self.table.set_body(body);

        Ok(())
    }

    pub fn render(&mut self) -> Result<String> {
        self.build_contents()?;
        self.table.printable()
    }
}

impl Default for ModelTable {
    fn default() -> Self {
        ModelTable::new()
    }
}

impl Component for ModelTable {
    fn render(&mut self) -> Result<String> {
        ModelTable::render(self)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
