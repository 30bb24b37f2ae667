mod task;

pub use task::{DATE_FORMAT, FilterMode, Task, parse_due_date};
