use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Task urgency as the backend models it: P1 is critical, P3 is medium.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum Priority {
    P1,
    P2,
    #[default]
    P3,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::P1, Priority::P2, Priority::P3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
        }
    }

    /// Sort rank; lower means more urgent.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::P1 => 1,
            Priority::P2 => 2,
            Priority::P3 => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::P1 => "Critical",
            Priority::P2 => "High",
            Priority::P3 => "Medium",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Priority {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "P1" => Ok(Priority::P1),
            "P2" => Ok(Priority::P2),
            "P3" => Ok(Priority::P3),
            other => Err(anyhow!("Unknown priority '{}': expected P1|P2|P3", other)),
        }
    }
}

impl ValueEnum for Priority {
    fn value_variants<'a>() -> &'a [Self] {
        &Priority::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

/// A task as cached from the server. The server owns the canonical copy;
/// `id` is assigned on create and stable for the task's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn tag_ids(&self) -> Vec<i64> {
        self.tags.iter().map(|tag| tag.id).collect()
    }

    /// Subset containment: true iff the task carries every id in `wanted`.
    pub fn has_all_tags(&self, wanted: &[i64]) -> bool {
        wanted.iter().all(|id| self.tags.iter().any(|tag| tag.id == *id))
    }
}

/// Read-only tag catalog entry used by the filter UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

/// Aggregate counters served by `GET /api/tasks/stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total: u64,
    pub completed: u64,
    pub incomplete: u64,
    pub completion_percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub by_priority: Option<BTreeMap<Priority, u64>>,
}

/// JSON body for task create/update requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskPayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    pub tag_ids: Vec<i64>,
}

/// Form input for the create/edit flows. Validation runs client-side so
/// malformed drafts never reach the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub tag_ids: Vec<i64>,
}

impl TaskDraft {
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            priority: task.priority,
            tag_ids: task.tag_ids(),
        }
    }

    pub fn validate(&self) -> Result<TaskPayload, DraftError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        let title_chars = title.chars().count();
        if title_chars > TITLE_MAX_CHARS {
            return Err(DraftError::TitleTooLong(title_chars));
        }
        let description_chars = self.description.chars().count();
        if description_chars > DESCRIPTION_MAX_CHARS {
            return Err(DraftError::DescriptionTooLong(description_chars));
        }

        let description = if self.description.trim().is_empty() {
            None
        } else {
            Some(self.description.clone())
        };

        Ok(TaskPayload {
            title: title.to_string(),
            description,
            priority: self.priority,
            tag_ids: self.tag_ids.clone(),
        })
    }

    pub fn toggle_tag(&mut self, id: i64) {
        if let Some(pos) = self.tag_ids.iter().position(|existing| *existing == id) {
            self.tag_ids.remove(pos);
        } else {
            self.tag_ids.push(id);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Title cannot be empty or whitespace")]
    EmptyTitle,
    #[error("Title is {0} characters; the limit is {TITLE_MAX_CHARS}")]
    TitleTooLong(usize),
    #[error("Description is {0} characters; the limit is {DESCRIPTION_MAX_CHARS}")]
    DescriptionTooLong(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn sample_tag(id: i64, name: &str) -> Tag {
        Tag {
            id,
            name: name.to_string(),
            color: "#808080".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn priority_rank_orders_urgency() {
        assert!(Priority::P1.rank() < Priority::P2.rank());
        assert!(Priority::P2.rank() < Priority::P3.rank());
    }

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!("p1".parse::<Priority>().unwrap(), Priority::P1);
        assert!("P9".parse::<Priority>().is_err());
    }

    #[test]
    fn has_all_tags_is_subset_containment() {
        let task = Task {
            id: 1,
            title: "Plan sprint".into(),
            description: None,
            completed: false,
            priority: Priority::P2,
            tags: vec![sample_tag(1, "work"), sample_tag(2, "urgent")],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(task.has_all_tags(&[]));
        assert!(task.has_all_tags(&[1]));
        assert!(task.has_all_tags(&[1, 2]));
        assert!(!task.has_all_tags(&[1, 3]));
    }

    #[test]
    fn draft_rejects_whitespace_title() {
        let draft = TaskDraft {
            title: "   ".into(),
            ..TaskDraft::default()
        };
        assert_eq!(draft.validate(), Err(DraftError::EmptyTitle));
    }

    #[test]
    fn draft_enforces_length_limits() {
        let long_title = TaskDraft {
            title: "x".repeat(TITLE_MAX_CHARS + 1),
            ..TaskDraft::default()
        };
        assert!(matches!(
            long_title.validate(),
            Err(DraftError::TitleTooLong(_))
        ));

        let long_description = TaskDraft {
            title: "ok".into(),
            description: "y".repeat(DESCRIPTION_MAX_CHARS + 1),
            ..TaskDraft::default()
        };
        assert!(matches!(
            long_description.validate(),
            Err(DraftError::DescriptionTooLong(_))
        ));
    }

    #[test]
    fn draft_trims_title_and_drops_blank_description() {
        let draft = TaskDraft {
            title: "  Buy milk  ".into(),
            description: "   ".into(),
            priority: Priority::P1,
            tag_ids: vec![3],
        };

        let payload = draft.validate().unwrap();
        assert_eq!(payload.title, "Buy milk");
        assert_eq!(payload.description, None);
        assert_eq!(payload.priority, Priority::P1);
        assert_eq!(payload.tag_ids, vec![3]);
    }

    #[test]
    fn toggle_tag_adds_and_removes() {
        let mut draft = TaskDraft::default();
        draft.toggle_tag(4);
        assert_eq!(draft.tag_ids, vec![4]);
        draft.toggle_tag(4);
        assert!(draft.tag_ids.is_empty());
    }
}
