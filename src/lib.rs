//! Markup composition components built on `domtag`: an alias registry
//! with on-demand construction, the tabular composition tree, a
//! data-bound table with column path resolution over opaque entries,
//! and the form-item tag set.

pub mod bootstrap;
pub mod column;
pub mod form;
pub mod form_item;
pub mod model;
pub mod model_table;
pub mod registry;
pub mod table;

pub use domtag;
pub use domtag::{AttValue, DomTag, Tag, TagError};

pub use crate::{bootstrap::{form_item_registry, form_registry, table_registry},
                column::{ColumnError, ColumnResolver, FormatterTable},
                model::{AccessorKind, ColumnValue, DataSource, Entry, Presentable, Query},
                model_table::ModelTable,
                registry::{Component, ComponentRegistry, RegistryError},
                table::{Cell, Row, Section, Table}};
