//! Selection state for multi-select tables such as the project selector.
//!
//! The selection is a list of row keys kept apart from the row data. "Select
//! all" applies only to the rows handed to [`RowSelection::on_row_selected_all`],
//! which callers take from [`RowSelection::visible_page`]. Rows filtered out
//! by search or sitting on other pages are not touched.

use serde::Serialize;

use warden_domain::SelectableRow;

/// Page size used when a caller asks for zero rows per page.
const MIN_PAGE_SIZE: usize = 1;

/// One page of search-filtered, key-sorted rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, R> {
    /// Rows shown on this page.
    pub rows: Vec<&'a R>,
    /// Zero-based page index after clamping.
    pub page: usize,
    /// Number of pages for the current filter, at least one.
    pub page_count: usize,
    /// Number of rows matching the current filter.
    pub total_rows: usize,
}

/// Snapshot of selection state returned to the view.
///
/// The current page is reported by [`Page::page`], which is clamped to the
/// rows actually shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSnapshot {
    /// Selected row keys in selection order.
    pub selected: Vec<String>,
    /// Suppresses selection changes when true.
    pub read_only: bool,
    /// Whether the picker table is shown.
    pub picker_open: bool,
    /// Current search text.
    pub search: String,
    /// Rows per page.
    pub page_size: usize,
}

/// Row selection state with search and pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowSelection {
    selected: Vec<String>,
    read_only: bool,
    picker_open: bool,
    search: String,
    page: usize,
    page_size: usize,
}

impl RowSelection {
    /// Creates an editable, empty selection.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            selected: Vec::new(),
            read_only: false,
            picker_open: false,
            search: String::new(),
            page: 0,
            page_size: page_size.max(MIN_PAGE_SIZE),
        }
    }

    /// Creates a read-only selection that only displays already selected rows.
    #[must_use]
    pub fn read_only(page_size: usize) -> Self {
        Self {
            read_only: true,
            ..Self::new(page_size)
        }
    }

    /// Returns the selected row keys.
    #[must_use]
    pub fn selected(&self) -> &[String] {
        self.selected.as_slice()
    }

    /// Returns true when the key is selected.
    #[must_use]
    pub fn is_selected(&self, key: &str) -> bool {
        self.selected.iter().any(|selected| selected == key)
    }

    /// Returns a snapshot of the whole selection state.
    #[must_use]
    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            selected: self.selected.clone(),
            read_only: self.read_only,
            picker_open: self.picker_open,
            search: self.search.clone(),
            page_size: self.page_size,
        }
    }

    /// Adds or removes one row.
    pub fn on_row_selected<R: SelectableRow>(&mut self, row: &R, is_selected: bool) -> Vec<String> {
        if !self.read_only {
            self.apply(row.row_key(), is_selected);
        }
        self.selected.clone()
    }

    /// Applies one decision to every supplied row.
    ///
    /// `None` clears the whole selection, including rows on other pages.
    pub fn on_row_selected_all<R: SelectableRow>(
        &mut self,
        is_selected: bool,
        rows: Option<&[R]>,
    ) -> Vec<String> {
        if self.read_only {
            return self.selected.clone();
        }

        match rows {
            Some(rows) => {
                for row in rows {
                    self.apply(row.row_key(), is_selected);
                }
            }
            None => self.selected.clear(),
        }
        self.selected.clone()
    }

    /// Returns the rows the table shows.
    ///
    /// Read-only selections show only rows whose key is in `already_selected`.
    #[must_use]
    pub fn display_rows<'a, R: SelectableRow>(
        &self,
        rows: &'a [R],
        already_selected: &[String],
    ) -> Vec<&'a R> {
        rows.iter()
            .filter(|row| {
                !self.read_only || already_selected.iter().any(|key| key == row.row_key())
            })
            .collect()
    }

    /// Shows the picker table.
    pub fn open_picker(&mut self) {
        self.picker_open = true;
    }

    /// Hides the picker table, keeping the selection.
    pub fn close_picker(&mut self) {
        self.picker_open = false;
    }

    /// Returns true when the picker table is shown.
    #[must_use]
    pub fn is_picker_open(&self) -> bool {
        self.picker_open
    }

    /// Sets the search text and returns to the first page.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.page = 0;
    }

    /// Requests a zero-based page.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(MIN_PAGE_SIZE);
        self.page = 0;
    }

    /// Returns the current page of display rows after search and sorting.
    #[must_use]
    pub fn visible_page<'a, R: SelectableRow>(
        &self,
        rows: &'a [R],
        already_selected: &[String],
    ) -> Page<'a, R> {
        let needle = self.search.trim().to_lowercase();
        let mut matching: Vec<&'a R> = self
            .display_rows(rows, already_selected)
            .into_iter()
            .filter(|row| needle.is_empty() || row.matches_search(needle.as_str()))
            .collect();
        matching.sort_by(|left, right| left.row_key().cmp(right.row_key()));

        let total_rows = matching.len();
        let page_count = total_rows.div_ceil(self.page_size).max(1);
        let page = self.page.min(page_count - 1);
        let rows = matching
            .into_iter()
            .skip(page * self.page_size)
            .take(self.page_size)
            .collect();

        Page {
            rows,
            page,
            page_count,
            total_rows,
        }
    }

    fn apply(&mut self, key: &str, is_selected: bool) {
        if is_selected {
            if !self.is_selected(key) {
                self.selected.push(key.to_owned());
            }
        } else if let Some(index) = self.selected.iter().position(|selected| selected == key) {
            self.selected.remove(index);
        }
    }
}
