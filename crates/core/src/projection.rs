//! Pure derivation of the displayed task list from the raw collection.

use std::cmp::Ordering;

use crate::filter::{FilterState, SortDirection, SortField, SortState, StatusFilter};
use crate::model::Task;

/// Filter then stable-sort a snapshot of the raw collection. The input is
/// never mutated; equal sort keys keep their incoming relative order.
pub fn project(tasks: &[Task], filters: &FilterState, sort: &SortState) -> Vec<Task> {
    let mut visible: Vec<Task> = tasks
        .iter()
        .filter(|task| matches(task, filters))
        .cloned()
        .collect();

    visible.sort_by(|a, b| {
        let ordering = compare(a, b, sort.field);
        match sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    visible
}

fn matches(task: &Task, filters: &FilterState) -> bool {
    matches_search(task, &filters.search)
        && filters
            .priority
            .map(|wanted| task.priority == wanted)
            .unwrap_or(true)
        && task.has_all_tags(&filters.tags)
        && matches_status(task, filters.status)
}

fn matches_search(task: &Task, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    if task.title.to_lowercase().contains(&needle) {
        return true;
    }
    task.description
        .as_deref()
        .map(|description| description.to_lowercase().contains(&needle))
        .unwrap_or(false)
}

fn matches_status(task: &Task, status: StatusFilter) -> bool {
    match status {
        StatusFilter::All => true,
        StatusFilter::Active => !task.completed,
        StatusFilter::Completed => task.completed,
    }
}

fn compare(a: &Task, b: &Task, field: SortField) -> Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::Priority => a.priority.rank().cmp(&b.priority.rank()),
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, Tag};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn tag(id: i64) -> Tag {
        Tag {
            id,
            name: format!("tag-{id}"),
            color: "#336699".into(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn task(id: i64, title: &str, priority: Priority, completed: bool) -> Task {
        let created = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
            + chrono::Duration::minutes(id);
        Task {
            id,
            title: title.into(),
            description: None,
            completed,
            priority,
            tags: Vec::new(),
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn active_filter_composes_with_priority_sort() {
        let tasks = vec![
            task(1, "Buy milk", Priority::P3, false),
            task(2, "File taxes", Priority::P1, true),
        ];
        let filters = FilterState {
            status: StatusFilter::Active,
            ..FilterState::default()
        };
        let sort = SortState {
            field: SortField::Priority,
            direction: SortDirection::Asc,
        };

        let visible = project(&tasks, &filters, &sort);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
    }

    #[test]
    fn title_sort_ascending_orders_alphabetically() {
        let tasks = vec![
            task(1, "Buy milk", Priority::P3, false),
            task(2, "File taxes", Priority::P1, true),
        ];
        let sort = SortState {
            field: SortField::Title,
            direction: SortDirection::Asc,
        };

        let visible = project(&tasks, &FilterState::default(), &sort);
        let titles: Vec<&str> = visible.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Buy milk", "File taxes"]);
    }

    #[test]
    fn default_state_only_applies_created_desc_sort() {
        let tasks = vec![
            task(1, "older", Priority::P3, false),
            task(2, "newer", Priority::P3, false),
        ];
        let visible = project(&tasks, &FilterState::default(), &SortState::default());
        let ids: Vec<i64> = visible.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn projection_does_not_mutate_input() {
        let tasks = vec![
            task(5, "b task", Priority::P1, true),
            task(6, "a task", Priority::P2, false),
        ];
        let before = tasks.clone();
        let filters = FilterState {
            status: StatusFilter::Active,
            ..FilterState::default()
        };
        let sort = SortState {
            field: SortField::Title,
            direction: SortDirection::Asc,
        };

        let first = project(&tasks, &filters, &sort);
        let second = project(&tasks, &filters, &sort);

        assert_eq!(tasks, before);
        assert_eq!(first, second);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let mut with_description = task(1, "Plan trip", Priority::P3, false);
        with_description.description = Some("Book FLIGHTS early".into());
        let tasks = vec![with_description, task(2, "Groceries", Priority::P3, false)];

        let filters = FilterState {
            search: "flights".into(),
            ..FilterState::default()
        };
        let visible = project(&tasks, &filters, &SortState::default());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
    }

    #[test]
    fn tag_filter_requires_every_selected_tag() {
        let mut both = task(1, "both", Priority::P3, false);
        both.tags = vec![tag(1), tag(2)];
        let mut only_one = task(2, "one", Priority::P3, false);
        only_one.tags = vec![tag(1)];

        let tasks = vec![both, only_one];
        let filters = FilterState {
            tags: vec![1, 2],
            ..FilterState::default()
        };

        let visible = project(&tasks, &filters, &SortState::default());
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
    }

    #[test]
    fn priority_ascending_places_p1_first() {
        let tasks = vec![
            task(1, "medium", Priority::P3, false),
            task(2, "critical", Priority::P1, false),
            task(3, "high", Priority::P2, false),
        ];
        let sort = SortState {
            field: SortField::Priority,
            direction: SortDirection::Asc,
        };

        let visible = project(&tasks, &FilterState::default(), &sort);
        let ranks: Vec<u8> = visible.iter().map(|t| t.priority.rank()).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
    }

    #[test]
    fn equal_sort_keys_keep_input_order_both_directions() {
        let tasks = vec![
            task(10, "first", Priority::P2, false),
            task(11, "second", Priority::P2, false),
            task(12, "third", Priority::P2, false),
        ];

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let sort = SortState {
                field: SortField::Priority,
                direction,
            };
            let visible = project(&tasks, &FilterState::default(), &sort);
            let ids: Vec<i64> = visible.iter().map(|t| t.id).collect();
            assert_eq!(ids, vec![10, 11, 12], "direction {direction:?}");
        }
    }

    #[test]
    fn empty_input_yields_empty_projection() {
        assert!(project(&[], &FilterState::default(), &SortState::default()).is_empty());
    }
}
