use crate::error::AppError;
use crate::model::{FilterMode, Task, parse_due_date};
use crate::storage::StorageAdapter;
use log::warn;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, UtcOffset};

/// Result of a mutation: the task as committed to memory, plus the
/// persistence failure if the follow-up save did not stick. A failed save
/// does not roll the in-memory change back.
#[derive(Debug)]
pub struct MutationOutcome {
    pub task: Task,
    pub persist_error: Option<AppError>,
}

#[derive(Debug)]
pub struct DeleteOutcome {
    pub removed: Option<Task>,
    pub persist_error: Option<AppError>,
}

/// The authoritative task collection plus its transient view state.
pub struct TaskStore {
    adapter: Box<dyn StorageAdapter>,
    tasks: Vec<Task>,
    filter: FilterMode,
    next_seq: u64,
}

impl TaskStore {
    /// Load the collection once from the adapter. An absent or malformed
    /// payload yields an empty store.
    pub fn open(adapter: Box<dyn StorageAdapter>) -> Self {
        let tasks = adapter.load();
        let next_seq = next_sequence(&tasks);
        Self {
            adapter,
            tasks,
            filter: FilterMode::All,
            next_seq,
        }
    }

    pub fn add(&mut self, text: &str, due_date: Option<&str>) -> Result<MutationOutcome, AppError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AppError::EmptyText);
        }

        let due = match due_date {
            Some(value) if !value.trim().is_empty() => value.trim(),
            _ => return Err(AppError::MissingDate),
        };
        let parsed = parse_due_date(due)?;
        if parsed < today_local() {
            return Err(AppError::PastDate);
        }

        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;

        let task = Task {
            id: self.next_id(),
            text: trimmed.to_string(),
            due_date: due.to_string(),
            completed: false,
            created_at,
        };
        self.tasks.push(task.clone());

        Ok(MutationOutcome {
            task,
            persist_error: self.persist(),
        })
    }

    pub fn toggle(&mut self, id: &str) -> Result<MutationOutcome, AppError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::not_found(id))?;

        task.completed = !task.completed;
        let task = task.clone();

        Ok(MutationOutcome {
            task,
            persist_error: self.persist(),
        })
    }

    /// Remove the task with `id` if present. Safe to call twice: a missing
    /// id is a no-op, and a no-op skips the storage write.
    pub fn delete(&mut self, id: &str) -> DeleteOutcome {
        let index = self.tasks.iter().position(|task| task.id == id);
        let removed = index.map(|index| self.tasks.remove(index));
        let persist_error = if removed.is_some() {
            self.persist()
        } else {
            None
        };

        DeleteOutcome {
            removed,
            persist_error,
        }
    }

    pub fn set_filter(&mut self, filter: FilterMode) {
        self.filter = filter;
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    /// Tasks matching the current filter, ascending by due date. Equal dates
    /// keep insertion order (stable sort over bytewise-ordered ISO dates).
    pub fn list_filtered(&self) -> Vec<Task> {
        let mut filtered: Vec<Task> = self
            .tasks
            .iter()
            .filter(|task| task.matches(self.filter))
            .cloned()
            .collect();
        filtered.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        filtered
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.iter().filter(|task| !task.completed).count()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn next_id(&mut self) -> String {
        loop {
            let id = format!("task-{}", self.next_seq);
            self.next_seq += 1;
            if !self.tasks.iter().any(|task| task.id == id) {
                return id;
            }
        }
    }

    fn persist(&self) -> Option<AppError> {
        match self.adapter.save(&self.tasks) {
            Ok(()) => None,
            Err(err) => {
                warn!("task store save failed: {err}");
                Some(err)
            }
        }
    }
}

fn next_sequence(tasks: &[Task]) -> u64 {
    tasks
        .iter()
        .filter_map(|task| task.id.strip_prefix("task-"))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .map_or(1, |max| max + 1)
}

fn today_local() -> Date {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc().to_offset(offset).date()
}
