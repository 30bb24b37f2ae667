use crate::error::AppError;
use serde::{Deserialize, Serialize};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Canonical due date layout. Zero-padded ISO dates compare bytewise in
/// chronological order; the store's sort relies on this.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub due_date: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: String,
}

impl Task {
    pub fn matches(&self, mode: FilterMode) -> bool {
        match mode {
            FilterMode::All => true,
            FilterMode::Pending => !self.completed,
            FilterMode::Completed => self.completed,
        }
    }
}

/// Transient view selector. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    All,
    Pending,
    Completed,
}

impl FilterMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

pub fn parse_due_date(raw: &str) -> Result<Date, AppError> {
    Date::parse(raw, DATE_FORMAT)
        .map_err(|_| AppError::invalid_date(format!("due date must be YYYY-MM-DD, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use super::{FilterMode, Task, parse_due_date};

    #[test]
    fn filter_mode_parse_accepts_known_modes() {
        assert_eq!(FilterMode::parse("all"), Some(FilterMode::All));
        assert_eq!(FilterMode::parse(" Pending "), Some(FilterMode::Pending));
        assert_eq!(FilterMode::parse("COMPLETED"), Some(FilterMode::Completed));
        assert_eq!(FilterMode::parse("overdue"), None);
        assert_eq!(FilterMode::parse(""), None);
    }

    #[test]
    fn filter_mode_label_round_trips() {
        for mode in [FilterMode::All, FilterMode::Pending, FilterMode::Completed] {
            assert_eq!(FilterMode::parse(mode.label()), Some(mode));
        }
    }

    #[test]
    fn task_matches_filter_modes() {
        let task = Task {
            id: "task-1".to_string(),
            text: "demo".to_string(),
            due_date: "2026-08-20".to_string(),
            completed: false,
            created_at: "2026-08-06T00:00:00Z".to_string(),
        };

        assert!(task.matches(FilterMode::All));
        assert!(task.matches(FilterMode::Pending));
        assert!(!task.matches(FilterMode::Completed));

        let done = Task {
            completed: true,
            ..task
        };
        assert!(done.matches(FilterMode::All));
        assert!(!done.matches(FilterMode::Pending));
        assert!(done.matches(FilterMode::Completed));
    }

    #[test]
    fn parse_due_date_requires_zero_padded_iso() {
        assert!(parse_due_date("2026-08-06").is_ok());
        assert_eq!(parse_due_date("2026-8-6").unwrap_err().code(), "invalid_date");
        assert_eq!(parse_due_date("06-08-2026").unwrap_err().code(), "invalid_date");
        assert_eq!(parse_due_date("2026-02-30").unwrap_err().code(), "invalid_date");
        assert_eq!(parse_due_date("not-a-date").unwrap_err().code(), "invalid_date");
    }
}
