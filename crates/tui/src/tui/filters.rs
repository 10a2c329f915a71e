use taskdeck_core::filter::{FilterState, SortDirection, SortField, SortState, StatusFilter};
use taskdeck_core::model::{Priority, Tag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FilterColumn {
    Priority,
    Tags,
    Status,
    Sort,
}

impl FilterColumn {
    pub(crate) const ALL: [Self; 4] = [
        FilterColumn::Priority,
        FilterColumn::Tags,
        FilterColumn::Status,
        FilterColumn::Sort,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            FilterColumn::Priority => 0,
            FilterColumn::Tags => 1,
            FilterColumn::Status => 2,
            FilterColumn::Sort => 3,
        }
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            FilterColumn::Priority => "Priority",
            FilterColumn::Tags => "Tags",
            FilterColumn::Status => "Status",
            FilterColumn::Sort => "Sort",
        }
    }
}

/// Modal editor for the filter and sort state. Edits accumulate on a
/// working copy; nothing reaches the view until `commit`.
#[derive(Debug)]
pub(crate) struct FilterOverlay {
    tags: Vec<Tag>,
    pub(crate) working_filters: FilterState,
    pub(crate) working_sort: SortState,
    pub(crate) column: FilterColumn,
    row_positions: [usize; 4],
}

impl FilterOverlay {
    pub(crate) fn new(tags: &[Tag], filters: &FilterState, sort: &SortState) -> Self {
        Self {
            tags: tags.to_vec(),
            working_filters: filters.clone(),
            working_sort: *sort,
            column: FilterColumn::Priority,
            row_positions: [0, 0, 0, 0],
        }
    }

    pub(crate) fn next_column(&mut self) {
        let idx = self.column.index();
        self.column = FilterColumn::ALL[(idx + 1) % FilterColumn::ALL.len()];
        self.clamp_rows();
    }

    pub(crate) fn prev_column(&mut self) {
        let idx = self.column.index();
        let prev = if idx == 0 {
            FilterColumn::ALL.len() - 1
        } else {
            idx - 1
        };
        self.column = FilterColumn::ALL[prev];
        self.clamp_rows();
    }

    pub(crate) fn next_row(&mut self) {
        let max = self.current_len().saturating_sub(1);
        let row = &mut self.row_positions[self.column.index()];
        if *row >= max {
            *row = 0;
        } else {
            *row += 1;
        }
    }

    pub(crate) fn prev_row(&mut self) {
        let max = self.current_len().saturating_sub(1);
        let row = &mut self.row_positions[self.column.index()];
        if *row == 0 {
            *row = max;
        } else {
            *row -= 1;
        }
    }

    pub(crate) fn toggle_current(&mut self) {
        let row = self.row_positions[self.column.index()];
        match self.column {
            FilterColumn::Priority => {
                if row == 0 {
                    self.working_filters.priority = None;
                } else if let Some(priority) = Priority::ALL.get(row - 1) {
                    if self.working_filters.priority == Some(*priority) {
                        self.working_filters.priority = None;
                    } else {
                        self.working_filters.priority = Some(*priority);
                    }
                }
            }
            FilterColumn::Tags => {
                if row == 0 {
                    self.working_filters.tags.clear();
                } else if let Some(tag) = self.tags.get(row - 1) {
                    if self.working_filters.tags.contains(&tag.id) {
                        self.working_filters.tags.retain(|id| *id != tag.id);
                    } else {
                        self.working_filters.tags.push(tag.id);
                    }
                }
            }
            FilterColumn::Status => {
                if let Some(status) = StatusFilter::ALL.get(row) {
                    self.working_filters.status = *status;
                }
            }
            FilterColumn::Sort => {
                if row == 0 {
                    self.working_sort = SortState::default();
                } else if let Some(field) = SortField::ALL.get(row - 1) {
                    if self.working_sort.field == *field {
                        self.working_sort.direction = self.working_sort.direction.toggled();
                    } else {
                        self.working_sort.field = *field;
                        self.working_sort.direction = SortDirection::default();
                    }
                }
            }
        }
    }

    pub(crate) fn clear_all(&mut self) {
        self.working_filters = FilterState::default();
        self.working_sort = SortState::default();
        self.row_positions = [0, 0, 0, 0];
    }

    pub(crate) fn commit(self) -> (FilterState, SortState) {
        (self.working_filters, self.working_sort)
    }

    pub(crate) fn current_row(&self) -> usize {
        self.row_positions[self.column.index()]
    }

    pub(crate) fn current_len(&self) -> usize {
        self.len_for(self.column)
    }

    fn len_for(&self, column: FilterColumn) -> usize {
        match column {
            FilterColumn::Priority => 1 + Priority::ALL.len(),
            FilterColumn::Tags => 1 + self.tags.len(),
            FilterColumn::Status => StatusFilter::ALL.len(),
            FilterColumn::Sort => 1 + SortField::ALL.len(),
        }
    }

    /// Row labels and selection marks for one column, in display order.
    pub(crate) fn rows(&self, column: FilterColumn) -> Vec<(String, bool)> {
        match column {
            FilterColumn::Priority => {
                let mut rows = vec![(
                    "All priorities".to_string(),
                    self.working_filters.priority.is_none(),
                )];
                for priority in Priority::ALL {
                    rows.push((
                        format!("{} ({})", priority.as_str(), priority.label()),
                        self.working_filters.priority == Some(priority),
                    ));
                }
                rows
            }
            FilterColumn::Tags => {
                let mut rows = vec![(
                    "Clear tags".to_string(),
                    self.working_filters.tags.is_empty(),
                )];
                for tag in &self.tags {
                    rows.push((
                        format!("#{}", tag.name),
                        self.working_filters.tags.contains(&tag.id),
                    ));
                }
                rows
            }
            FilterColumn::Status => StatusFilter::ALL
                .iter()
                .map(|status| {
                    (
                        status.as_str().to_string(),
                        self.working_filters.status == *status,
                    )
                })
                .collect(),
            FilterColumn::Sort => {
                let mut rows = vec![(
                    "Default (Created ↓)".to_string(),
                    self.working_sort.is_default(),
                )];
                for field in SortField::ALL {
                    let selected = self.working_sort.field == field;
                    let label = if selected {
                        format!("{} {}", field.label(), self.working_sort.direction.arrow())
                    } else {
                        field.label().to_string()
                    };
                    rows.push((label, selected));
                }
                rows
            }
        }
    }

    fn clamp_rows(&mut self) {
        let len = self.current_len();
        let row = &mut self.row_positions[self.column.index()];
        if *row >= len {
            *row = len.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;

    fn tag(id: i64, name: &str) -> Tag {
        Tag {
            id,
            name: name.into(),
            color: "#6366f1".into(),
            created_at: Utc::now(),
        }
    }

    fn overlay() -> FilterOverlay {
        FilterOverlay::new(
            &[tag(2, "home"), tag(5, "errands")],
            &FilterState::default(),
            &SortState::default(),
        )
    }

    #[test]
    fn priority_rows_behave_like_a_toggle() {
        let mut overlay = overlay();
        overlay.next_row();
        overlay.toggle_current();
        assert_eq!(overlay.working_filters.priority, Some(Priority::P1));
        overlay.toggle_current();
        assert_eq!(overlay.working_filters.priority, None);
    }

    #[test]
    fn tag_rows_accumulate_and_clear() {
        let mut overlay = overlay();
        overlay.next_column();
        overlay.next_row();
        overlay.toggle_current();
        overlay.next_row();
        overlay.toggle_current();
        assert_eq!(overlay.working_filters.tags, vec![2, 5]);

        // Row 0 clears the whole set.
        overlay.prev_row();
        overlay.prev_row();
        overlay.toggle_current();
        assert!(overlay.working_filters.tags.is_empty());
    }

    #[test]
    fn sort_reselection_flips_direction() {
        let mut overlay = overlay();
        overlay.prev_column();
        let priority_row = 1 + SortField::ALL
            .iter()
            .position(|f| *f == SortField::Priority)
            .unwrap();
        for _ in 0..priority_row {
            overlay.next_row();
        }
        overlay.toggle_current();
        assert_eq!(overlay.working_sort.field, SortField::Priority);
        assert_eq!(overlay.working_sort.direction, SortDirection::Desc);

        overlay.toggle_current();
        assert_eq!(overlay.working_sort.direction, SortDirection::Asc);
    }

    #[test]
    fn clear_all_restores_defaults() {
        let mut overlay = overlay();
        overlay.next_row();
        overlay.toggle_current();
        overlay.clear_all();
        assert_eq!(overlay.working_filters, FilterState::default());
        assert!(overlay.working_sort.is_default());
    }

    #[test]
    fn row_navigation_wraps() {
        let mut overlay = overlay();
        assert_eq!(overlay.current_len(), 4);
        overlay.prev_row();
        assert_eq!(overlay.current_row(), 3);
        overlay.next_row();
        assert_eq!(overlay.current_row(), 0);
    }
}
