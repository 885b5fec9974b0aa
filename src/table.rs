//! The tabular composition tree: Table -> Section -> Row -> Cell.

use anyhow::Result;
use itertools::Itertools;
use kstring::KString;

use domtag::{indexed::IndexedMap, DomTag, Tag};

use crate::registry::Component;

/// Kind of cell a section materializes when rows are built from data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Plain,
    Header,
}

impl CellKind {
    fn tag_name(self) -> &'static str {
        match self {
            CellKind::Plain => "td",
            CellKind::Header => "th",
        }
    }
}

pub struct Cell {
    tag: Tag,
    content: String,
}

impl Cell {
    pub fn new() -> Cell {
        Cell::of_kind(CellKind::Plain)
    }

    pub fn header() -> Cell {
        Cell::of_kind(CellKind::Header)
    }

    pub fn of_kind(kind: CellKind) -> Cell {
        Cell {
            tag: Tag::new(kind.tag_name(), true),
            content: String::new(),
        }
    }

    pub fn with_content(content: impl Into<String>) -> Cell {
        let mut cell = Cell::new();
        cell.set_content(content);
        cell
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> &mut Cell {
        self.content = content.into();
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::new()
    }
}

impl DomTag for Cell {
    fn tag(&self) -> &Tag {
        &self.tag
    }
    fn tag_mut(&mut self) -> &mut Tag {
        &mut self.tag
    }
    fn content_markup(&self) -> Result<String> {
        Ok(self.content.clone())
    }
}

pub struct Row {
    tag: Tag,
    cells: IndexedMap<Cell>,
}

impl Row {
    pub fn new() -> Row {
        let mut tag = Tag::new("tr", true);
        // a row without cells contributes nothing
        tag.set_print_if_empty(false);
        Row { tag, cells: IndexedMap::new() }
    }

    pub fn append_cell(&mut self, cell: Cell) -> &mut Row {
        self.cells.append(cell);
        self
    }

    pub fn prepend_cell(&mut self, cell: Cell) -> &mut Row {
        self.cells.prepend(cell);
        self
    }

    /// Stores `cell` at `index`, overriding an existing one.
    pub fn set_cell(&mut self, index: impl Into<KString>, cell: Cell) -> &mut Row {
        self.cells.set(index, cell);
        self
    }

    pub fn cell(&self, index: &str) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// One plain cell per entry, indexed by the entry's own key.
    pub fn set_content_from_array(
        &mut self,
        data: impl IntoIterator<Item = (KString, String)>,
    ) -> &mut Row {
        for (index, content) in data {
            self.set_cell(index, Cell::with_content(content));
        }
        self
    }

    fn stringify_cells(&self) -> Result<String> {
        let cells: Vec<String> = self
            .cells
            .values()
            .map(|cell| cell.printable())
            .collect::<Result<_>>()?;
        Ok(cells.iter().join("\n"))
    }
}

impl Default for Row {
    fn default() -> Self {
        Row::new()
    }
}

impl DomTag for Row {
    fn tag(&self) -> &Tag {
        &self.tag
    }
    fn tag_mut(&mut self) -> &mut Tag {
        &mut self.tag
    }
    fn content_markup(&self) -> Result<String> {
        self.stringify_cells()
    }
}

/// A `thead`/`tbody`/`tfoot` grouping of rows.
pub struct Section {
    tag: Tag,
    rows: IndexedMap<Row>,
    cell_kind: CellKind,
}

impl Section {
    fn new(tag_name: &'static str, cell_kind: CellKind) -> Section {
        let mut tag = Tag::new(tag_name, true);
        tag.set_print_if_empty(false);
        Section { tag, rows: IndexedMap::new(), cell_kind }
    }

    pub fn head() -> Section {
        Section::new("thead", CellKind::Header)
    }

    pub fn body() -> Section {
        Section::new("tbody", CellKind::Plain)
    }

    pub fn foot() -> Section {
        Section::new("tfoot", CellKind::Plain)
    }

    pub fn cell_kind(&self) -> CellKind {
        self.cell_kind
    }

    pub fn append_row(&mut self, row: Row) -> &mut Section {
        self.rows.append(row);
        self
    }

    pub fn prepend_row(&mut self, row: Row) -> &mut Section {
        self.rows.prepend(row);
        self
    }

    /// Stores `row` at `index`, overriding an existing one.
    pub fn set_row(&mut self, index: impl Into<KString>, row: Row) -> &mut Section {
        self.rows.set(index, row);
        self
    }

    pub fn row(&self, index: &str) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn clear_rows(&mut self) -> &mut Section {
        self.rows.clear();
        self
    }

    /// One row per row-spec, indexed by the row-spec's own key; one
    /// cell of the section's kind per cell entry.
    pub fn build_content_from_array(
        &mut self,
        row_specs: impl IntoIterator<Item = (KString, Vec<(KString, String)>)>,
    ) -> &mut Section {
        for (row_index, cells) in row_specs {
            let mut row = Row::new();
            for (cell_index, content) in cells {
                let mut cell = Cell::of_kind(self.cell_kind);
                cell.set_content(content);
                row.set_cell(cell_index, cell);
            }
            self.set_row(row_index, row);
        }
        self
    }

    fn stringify_rows(&self) -> Result<String> {
        let rows: Vec<String> = self
            .rows
            .values()
            .map(|row| row.printable())
            .collect::<Result<_>>()?;
        Ok(rows.iter().join("\n"))
    }
}

impl DomTag for Section {
    fn tag(&self) -> &Tag {
        &self.tag
    }
    fn tag_mut(&mut self) -> &mut Tag {
        &mut self.tag
    }
    fn content_markup(&self) -> Result<String> {
        self.stringify_rows()
    }
}

/// The table owns exactly one head, body and foot section, each
/// replaceable as a whole.
pub struct Table {
    tag: Tag,
    head: Section,
    body: Section,
    foot: Section,
}

impl Table {
    pub fn new() -> Table {
        Table {
            tag: Tag::new("table", true),
            head: Section::head(),
            body: Section::body(),
            foot: Section::foot(),
        }
    }

    pub fn set_head(&mut self, head: Section) -> &mut Table {
        self.head = head;
        self
    }

    pub fn set_body(&mut self, body: Section) -> &mut Table {
        self.body = body;
        self
    }

    pub fn set_foot(&mut self, foot: Section) -> &mut Table {
        self.foot = foot;
        self
    }

    pub fn head_mut(&mut self) -> &mut Section {
        &mut self.head
    }

    pub fn body_mut(&mut self) -> &mut Section {
        &mut self.body
    }

    pub fn foot_mut(&mut self) -> &mut Section {
        &mut self.foot
    }

    pub fn append_head_row(&mut self, row: Row) -> &mut Table {
        self.head.append_row(row);
        self
    }

    pub fn prepend_head_row(&mut self, row: Row) -> &mut Table {
        self.head.prepend_row(row);
        self
    }

    pub fn append_body_row(&mut self, row: Row) -> &mut Table {
        self.body.append_row(row);
        self
    }

    pub fn prepend_body_row(&mut self, row: Row) -> &mut Table {
        self.body.prepend_row(row);
        self
    }

    pub fn append_foot_row(&mut self, row: Row) -> &mut Table {
        self.foot.append_row(row);
        self
    }

    pub fn prepend_foot_row(&mut self, row: Row) -> &mut Table {
        self.foot.prepend_row(row);
        self
    }

    /// Shortcut: head rows from cell values only.
    pub fn head_rows(
        &mut self,
        data: impl IntoIterator<Item = (KString, Vec<(KString, String)>)>,
    ) -> &mut Table {
        self.head.build_content_from_array(data);
        self
    }

    /// Shortcut: body rows from cell values only.
    pub fn body_rows(
        &mut self,
        data: impl IntoIterator<Item = (KString, Vec<(KString, String)>)>,
    ) -> &mut Table {
        self.body.build_content_from_array(data);
        self
    }

    /// Shortcut: foot rows from cell values only.
    pub fn foot_rows(
        &mut self,
        data: impl IntoIterator<Item = (KString, Vec<(KString, String)>)>,
    ) -> &mut Table {
        self.foot.build_content_from_array(data);
        self
    }

    fn stringify_table_contents(&self) -> Result<String> {
        Ok(format!(
            "{}{}{}",
            self.head.printable()?,
            self.body.printable()?,
            self.foot.printable()?
        ))
    }
}

impl Default for Table {
    fn default() -> Self {
        Table::new()
    }
}

impl DomTag for Table {
    fn tag(&self) -> &Tag {
        &self.tag
    }
    fn tag_mut(&mut self) -> &mut Tag {
        &mut self.tag
    }
    fn content_markup(&self) -> Result<String> {
        self.stringify_table_contents()
    }
}

impl Component for Table {
    fn render(&mut self) -> Result<String> {
        self.printable()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ks(s: &str) -> KString {
        KString::from_ref(s)
    }

    #[test]
    fn t_build_content_from_array_order() {
        let mut body = Section::body();
        body.build_content_from_array([
            (ks("r1"), vec![(ks("c1"), "a".to_string())]),
            (ks("r2"), vec![(ks("c1"), "b".to_string())]),
        ]);
        let markup = body.printable().unwrap();
        let r1 = markup.find("<tr><td>a</td></tr>").unwrap();
        let r2 = markup.find("<tr><td>b</td></tr>").unwrap();
        assert!(r1 < r2);
    }

    #[test]
    fn t_rows_newline_separated() {
        let mut body = Section::body();
        body.build_content_from_array([
            (ks("r1"), vec![(ks("c"), "a".to_string())]),
            (ks("r2"), vec![(ks("c"), "b".to_string())]),
        ]);
        assert_eq!(
            body.printable().unwrap(),
            "<tbody><tr><td>a</td></tr>\n<tr><td>b</td></tr></tbody>"
        );
    }

    #[test]
    fn t_empty_section_renders_nothing() {
        let body = Section::body();
        assert_eq!(body.printable().unwrap(), "");
    }

    #[test]
    fn t_row_without_cells_renders_nothing() {
        let row = Row::new();
        assert_eq!(row.printable().unwrap(), "");
    }

    #[test]
    fn t_head_cells_are_th() {
        let mut head = Section::head();
        head.build_content_from_array([(ks("0"), vec![(ks("name"), "Name".to_string())])]);
        assert_eq!(
            head.printable().unwrap(),
            "<thead><tr><th>Name</th></tr></thead>"
        );
    }

    #[test]
    fn t_table_concatenates_sections() {
        let mut table = Table::new();
        table.head_rows([(ks("0"), vec![(ks("c"), "H".to_string())])]);
        table.body_rows([(ks("0"), vec![(ks("c"), "B".to_string())])]);
        table.foot_rows([(ks("0"), vec![(ks("c"), "F".to_string())])]);
        assert_eq!(
            table.printable().unwrap(),
            "<table><thead><tr><th>H</th></tr></thead>\
             <tbody><tr><td>B</td></tr></tbody>\
             <tfoot><tr><td>F</td></tr></tfoot></table>"
        );
    }

    #[test]
    fn t_empty_table_prints_shell() {
        let table = Table::new();
        assert_eq!(table.printable().unwrap(), "<table></table>");
    }

    #[test]
    fn t_indexed_row_overwrite() {
        let mut body = Section::body();
        let mut row = Row::new();
        row.set_cell("c", Cell::with_content("old"));
        body.set_row("r", row);
        let mut row = Row::new();
        row.set_cell("c", Cell::with_content("new"));
        body.set_row("r", row);
        assert_eq!(body.row_count(), 1);
        assert_eq!(
            body.printable().unwrap(),
            "<tbody><tr><td>new</td></tr></tbody>"
        );
    }

    #[test]
    fn t_append_prepend_rows() {
        let mut body = Section::body();
        let mut row = Row::new();
        row.append_cell(Cell::with_content("middle"));
        body.append_row(row);
        let mut row = Row::new();
        row.append_cell(Cell::with_content("first"));
        body.prepend_row(row);
        let mut row = Row::new();
        row.append_cell(Cell::with_content("last"));
        body.append_row(row);
        assert_eq!(
            body.printable().unwrap(),
            "<tbody><tr><td>first</td></tr>\n<tr><td>middle</td></tr>\n<tr><td>last</td></tr></tbody>"
        );
    }

    #[test]
    fn t_cells_newline_separated_within_row() {
        let mut row = Row::new();
        row.append_cell(Cell::with_content("a"));
        row.append_cell(Cell::with_content("b"));
        assert_eq!(row.printable().unwrap(), "<tr><td>a</td>\n<td>b</td></tr>");
    }
}
