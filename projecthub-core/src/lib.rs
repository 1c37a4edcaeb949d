//! projecthub-core: task model and reminder engine for ProjectHub

pub mod deadlines;
pub mod error;
pub mod reminders;
pub mod stats;
pub mod store;
pub mod task;
pub mod time;

pub use deadlines::{DEFAULT_DEADLINE_WINDOW_DAYS, DeadlineAlert, approaching_deadlines};
pub use error::ReminderError;
pub use reminders::{
    DEFAULT_TOP_LIMIT, ReminderGroup, ReminderItem, ReminderOptions, ReminderReport, ScoredTask,
    compose_message, generate_for_request, generate_reminders, group_reminders, rank_tasks,
    score_task,
};
pub use stats::{MemberStats, ProjectStats, StatusBreakdown, project_stats};
pub use store::{JsonFileStore, ReminderRequest, TaskStore, resolve_tasks};
pub use task::{Assignee, Priority, Task, TaskStatus};
