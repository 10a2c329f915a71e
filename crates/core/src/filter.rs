use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use clap::ValueEnum;

use crate::model::Priority;

/// Completion-status filter applied to the raw collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] =
        [StatusFilter::All, StatusFilter::Active, StatusFilter::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" | "done" => Ok(StatusFilter::Completed),
            other => Err(anyhow!(
                "Unknown status filter '{}': expected all|active|completed",
                other
            )),
        }
    }
}

impl ValueEnum for StatusFilter {
    fn value_variants<'a>() -> &'a [Self] {
        &StatusFilter::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    CreatedAt,
    Priority,
    Title,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::CreatedAt, SortField::Priority, SortField::Title];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::Priority => "priority",
            SortField::Title => "title",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "Created",
            SortField::Priority => "Priority",
            SortField::Title => "Title",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "created_at" | "created" | "created-at" => Ok(SortField::CreatedAt),
            "priority" => Ok(SortField::Priority),
            "title" => Ok(SortField::Title),
            other => Err(anyhow!(
                "Unknown sort field '{}': expected created_at|priority|title",
                other
            )),
        }
    }
}

impl ValueEnum for SortField {
    fn value_variants<'a>() -> &'a [Self] {
        &SortField::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(anyhow!(
                "Unknown sort direction '{}': expected asc|desc",
                other
            )),
        }
    }
}

impl ValueEnum for SortDirection {
    fn value_variants<'a>() -> &'a [Self] {
        const VARIANTS: [SortDirection; 2] = [SortDirection::Asc, SortDirection::Desc];
        &VARIANTS
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

/// The user-selected view constraints. Defaults exclude nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub priority: Option<Priority>,
    pub tags: Vec<i64>,
    pub status: StatusFilter,
}

impl FilterState {
    /// True when at least one predicate can exclude a task.
    pub fn is_active(&self) -> bool {
        !self.search.is_empty()
            || self.priority.is_some()
            || !self.tags.is_empty()
            || self.status != StatusFilter::All
    }

    pub fn is_default(&self) -> bool {
        !self.is_active()
    }

    pub fn summary(&self) -> Option<String> {
        if !self.is_active() {
            return None;
        }

        let mut parts = Vec::new();
        if !self.search.is_empty() {
            parts.push(format!("search:\"{}\"", self.search));
        }
        if let Some(priority) = self.priority {
            parts.push(format!("priority:{priority}"));
        }
        if !self.tags.is_empty() {
            let joined = self
                .tags
                .iter()
                .map(|id| format!("#{id}"))
                .collect::<Vec<_>>()
                .join(",");
            parts.push(format!("tags:{joined}"));
        }
        if self.status != StatusFilter::All {
            parts.push(format!("status:{}", self.status));
        }

        Some(parts.join(" | "))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    pub fn is_default(&self) -> bool {
        *self == SortState::default()
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.field.label(), self.direction.arrow())
    }
}
