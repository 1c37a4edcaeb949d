//! Approaching-deadline sweep.
//!
//! Picks open tasks (pending or in progress) whose due date falls inside
//! `[now, now + window]`. Overdue and undated tasks are not reported here;
//! the reminder engine covers those.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::task::{Task, TaskStatus};

pub const DEFAULT_DEADLINE_WINDOW_DAYS: i64 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineAlert {
    pub task_id: String,
    pub name: String,
    pub status: TaskStatus,
    pub due_date: DateTime<Utc>,
    pub assignee: String,
}

pub fn approaching_deadlines(
    tasks: &[Task],
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<DeadlineAlert> {
    let horizon = now.checked_add_signed(window).unwrap_or(if window < Duration::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    });

    let alerts: Vec<DeadlineAlert> = tasks
        .iter()
        .filter(|t| matches!(t.status, TaskStatus::Pending | TaskStatus::InProgress))
        .filter_map(|t| {
            let due = t.due_date?;
            (now..=horizon).contains(&due).then(|| DeadlineAlert {
                task_id: t.id.clone(),
                name: t.name.clone(),
                status: t.status,
                due_date: due,
                assignee: t.assignee_label().to_string(),
            })
        })
        .collect();

    tracing::debug!(
        scanned = tasks.len(),
        hits = alerts.len(),
        window_hours = window.num_hours(),
        "deadline sweep"
    );
    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Assignee;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 20, 2, 0, 0).unwrap()
    }

    #[test]
    fn picks_open_tasks_inside_window() {
        let tasks = vec![
            Task::new("soon", "Write docs").with_due(now() + Duration::days(1)),
            Task::new("edge", "Edge").with_due(now() + Duration::days(3)),
            Task::new("late", "Later").with_due(now() + Duration::days(3) + Duration::seconds(1)),
            Task::new("past", "Past").with_due(now() - Duration::minutes(1)),
            Task::new("undated", "No date"),
            Task::new("wip", "In flight")
                .with_status(TaskStatus::InProgress)
                .with_due(now() + Duration::hours(5)),
        ];

        let hits = approaching_deadlines(&tasks, now(), Duration::days(DEFAULT_DEADLINE_WINDOW_DAYS));
        let ids: Vec<&str> = hits.iter().map(|a| a.task_id.as_str()).collect();
        assert_eq!(ids, ["soon", "edge", "wip"]);
    }

    #[test]
    fn skips_closed_statuses() {
        let due = now() + Duration::hours(2);
        let tasks = vec![
            Task::new("done", "x").with_status(TaskStatus::Completed).with_due(due),
            Task::new("blocked", "y").with_status(TaskStatus::Blocked).with_due(due),
        ];
        assert!(approaching_deadlines(&tasks, now(), Duration::days(3)).is_empty());
    }

    #[test]
    fn huge_window_saturates_instead_of_overflowing() {
        let tasks = vec![
            Task::new("soon", "x").with_due(now() + Duration::days(1)),
            Task::new("past", "y").with_due(now() - Duration::days(1)),
        ];
        let hits = approaching_deadlines(&tasks, now(), Duration::days(1_000_000_000));
        let ids: Vec<&str> = hits.iter().map(|a| a.task_id.as_str()).collect();
        assert_eq!(ids, ["soon"]);
        assert_eq!(approaching_deadlines(&tasks, now(), Duration::MAX).len(), 1);
        assert!(approaching_deadlines(&tasks, now(), Duration::MIN).is_empty());
    }

    #[test]
    fn alert_carries_assignee_label() {
        let t = Task::new("a", "x")
            .with_due(now() + Duration::hours(1))
            .with_assignee(Assignee::User {
                id: Some("u1".into()),
                username: None,
                email: Some("kim@uni.edu".into()),
            });
        let hits = approaching_deadlines(&[t], now(), Duration::days(3));
        assert_eq!(hits[0].assignee, "kim@uni.edu");
    }
}
