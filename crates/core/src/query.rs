//! Query-string codec for filter/sort state.
//!
//! Encoding elides every field that still holds its default, so "no filters
//! active" round-trips through the empty string and shared URLs stay clean.
//! Decoding is total: unknown keys are ignored and unrecognized values fall
//! back to the defaults instead of erroring.

use url::form_urlencoded;

use crate::filter::{FilterState, SortDirection, SortField, SortState, StatusFilter};
use crate::model::Priority;

pub fn encode(filters: &FilterState, sort: &SortState) -> String {
    let mut pairs = form_urlencoded::Serializer::new(String::new());

    if !filters.search.is_empty() {
        pairs.append_pair("search", &filters.search);
    }
    if let Some(priority) = filters.priority {
        pairs.append_pair("priority", priority.as_str());
    }
    if !filters.tags.is_empty() {
        let joined = filters
            .tags
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        pairs.append_pair("tags", &joined);
    }
    if filters.status != StatusFilter::All {
        pairs.append_pair("status", filters.status.as_str());
    }
    if sort.field != SortField::CreatedAt {
        pairs.append_pair("sortBy", sort.field.as_str());
    }
    if sort.direction != SortDirection::Desc {
        pairs.append_pair("sortDir", sort.direction.as_str());
    }

    pairs.finish()
}

pub fn decode(query: &str) -> (FilterState, SortState) {
    let mut filters = FilterState::default();
    let mut sort = SortState::default();

    let raw = query.strip_prefix('?').unwrap_or(query);
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        match key.as_ref() {
            "search" => filters.search = value.into_owned(),
            "priority" => filters.priority = value.parse::<Priority>().ok(),
            "tags" => filters.tags = parse_tag_ids(&value),
            "status" => filters.status = value.parse().unwrap_or_default(),
            "sortBy" => sort.field = value.parse().unwrap_or_default(),
            "sortDir" => sort.direction = value.parse().unwrap_or_default(),
            _ => {}
        }
    }

    (filters, sort)
}

// Malformed fragments are dropped, not errored; only positive integers
// can be real tag ids.
fn parse_tag_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|part| part.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_encode_to_empty_string() {
        assert_eq!(encode(&FilterState::default(), &SortState::default()), "");
    }

    #[test]
    fn empty_string_decodes_to_defaults() {
        let (filters, sort) = decode("");
        assert_eq!(filters, FilterState::default());
        assert_eq!(sort, SortState::default());
    }

    #[test]
    fn lone_search_term_round_trips() {
        let filters = FilterState {
            search: "milk".into(),
            ..FilterState::default()
        };
        let sort = SortState::default();

        assert_eq!(encode(&filters, &sort), "search=milk");
        assert_eq!(decode("search=milk"), (filters, sort));
    }

    #[test]
    fn round_trips_every_field() {
        let filters = FilterState {
            search: "weekly report".into(),
            priority: Some(Priority::P2),
            tags: vec![3, 7, 11],
            status: StatusFilter::Completed,
        };
        let sort = SortState {
            field: SortField::Title,
            direction: SortDirection::Asc,
        };

        let encoded = encode(&filters, &sort);
        assert_eq!(decode(&encoded), (filters, sort));
    }

    #[test]
    fn round_trips_default_sort_field_with_custom_direction() {
        let sort = SortState {
            field: SortField::CreatedAt,
            direction: SortDirection::Asc,
        };
        let encoded = encode(&FilterState::default(), &sort);
        assert_eq!(encoded, "sortDir=asc");
        assert_eq!(decode(&encoded), (FilterState::default(), sort));
    }

    #[test]
    fn malformed_tag_fragments_are_dropped() {
        let (filters, _) = decode("tags=1%2Cx%2C%2C0%2C-4%2C3");
        assert_eq!(filters.tags, vec![1, 3]);
    }

    #[test]
    fn unrecognized_values_fall_back_to_defaults() {
        let (filters, sort) = decode("priority=P9&status=archived&sortBy=due&sortDir=sideways");
        assert_eq!(filters.priority, None);
        assert_eq!(filters.status, StatusFilter::All);
        assert_eq!(sort, SortState::default());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let (filters, sort) = decode("utm_source=mail&search=a");
        assert_eq!(filters.search, "a");
        assert_eq!(sort, SortState::default());
    }

    #[test]
    fn leading_question_mark_is_tolerated() {
        let (filters, _) = decode("?status=active");
        assert_eq!(filters.status, StatusFilter::Active);
    }
}
