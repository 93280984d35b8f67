// Player table view state as explicit transitions.
//
// `TableState::update` is the only way the sort, filter, or page changes.
// It takes the current state and an action and returns the next state, so
// the dataset operations stay pure and the view can be tested without a
// terminal.

use std::borrow::Borrow;

use crate::dataset::{filter_by_field, paginate, sort_by, total_pages, FieldFilter, PageSize};
use crate::record::{Field, PlayerRecord, SortDirection};

#[derive(Debug, Clone, PartialEq)]
pub enum TableAction {
    /// Header click: same field toggles direction, a new field starts
    /// descending.
    SortBy(Field),
    ToggleDirection,
    SetFilter(FieldFilter),
    NextPage,
    PrevPage,
    GoToPage(usize),
    SetPageSize(PageSize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableState {
    pub sort_field: Field,
    pub direction: SortDirection,
    pub filter: FieldFilter,
    /// 1-based.
    pub page: usize,
    pub page_size: PageSize,
}

impl Default for TableState {
    fn default() -> Self {
        TableState::new(PageSize::default())
    }
}

impl TableState {
    pub fn new(page_size: PageSize) -> Self {
        TableState {
            sort_field: Field::RasScore,
            direction: SortDirection::Descending,
            filter: FieldFilter::All,
            page: 1,
            page_size,
        }
    }

    /// Apply `action` against `records` (the unfiltered dataset) and return
    /// the next state. Page moves are clamped to the filtered page range.
    pub fn update<R: Borrow<PlayerRecord>>(&self, action: TableAction, records: &[R]) -> Self {
        let mut next = self.clone();
        match action {
            TableAction::SortBy(field) => {
                if field == self.sort_field {
                    next.direction = self.direction.toggle();
                } else {
                    next.sort_field = field;
                    next.direction = SortDirection::Descending;
                }
                next.page = 1;
            }
            TableAction::ToggleDirection => {
                next.direction = self.direction.toggle();
                next.page = 1;
            }
            TableAction::SetFilter(filter) => {
                next.filter = filter;
                next.page = 1;
            }
            TableAction::NextPage => {
                next.page = (self.page + 1).min(self.page_count(records));
            }
            TableAction::PrevPage => {
                next.page = self.page.saturating_sub(1).max(1);
            }
            TableAction::GoToPage(page) => {
                next.page = page.clamp(1, self.page_count(records));
            }
            TableAction::SetPageSize(size) => {
                next.page_size = size;
                next.page = 1;
            }
        }
        next
    }

    fn filtered_len<R: Borrow<PlayerRecord>>(&self, records: &[R]) -> usize {
        records
            .iter()
            .filter(|r| self.filter.matches((*r).borrow()))
            .count()
    }

    /// Pages under the current filter.
    pub fn page_count<R: Borrow<PlayerRecord>>(&self, records: &[R]) -> usize {
        total_pages(self.filtered_len(records), self.page_size)
    }

    /// Filter, sort, and slice `records` for display.
    pub fn project<'a>(&self, records: &'a [PlayerRecord]) -> TablePage<'a> {
        let borrowed: Vec<&PlayerRecord> = records.iter().collect();
        let filtered = filter_by_field(&borrowed, &self.filter);
        let sorted = sort_by(&filtered, self.sort_field, self.direction);
        let rows = paginate(&sorted, self.page_size, self.page);
        let first_index = if rows.is_empty() {
            0
        } else {
            (self.page - 1) * self.page_size.get() + 1
        };
        TablePage {
            last_index: first_index + rows.len().saturating_sub(1),
            rows,
            page: self.page,
            total_pages: total_pages(sorted.len(), self.page_size),
            total: sorted.len(),
            first_index,
        }
    }
}

/// One rendered page of the player table.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage<'a> {
    pub rows: Vec<&'a PlayerRecord>,
    pub page: usize,
    pub total_pages: usize,
    /// Matching records across all pages.
    pub total: usize,
    /// 1-based index of the first row shown; 0 when the page is empty.
    pub first_index: usize,
    pub last_index: usize,
}

impl TablePage<'_> {
    /// Footer text, e.g. `Showing 1-20 of 57 players`.
    pub fn summary(&self) -> String {
        if self.rows.is_empty() {
            format!("Showing 0 of {} players", self.total)
        } else {
            format!(
                "Showing {}-{} of {} players",
                self.first_index, self.last_index, self.total
            )
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
