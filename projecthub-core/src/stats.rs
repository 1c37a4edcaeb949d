//! Project productivity stats: status breakdown, completion rate and a
//! per-assignee completion ranking.

use std::collections::HashMap;

use serde::Serialize;

use crate::task::{Task, TaskStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
    pub completed: usize,
    pub in_progress: usize,
    pub pending: usize,
    pub blocked: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberStats {
    pub assignee: String,
    pub total: usize,
    pub completed: usize,
}

impl MemberStats {
    pub fn completion_ratio(&self) -> f64 {
        self.completed as f64 / self.total.max(1) as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub breakdown: StatusBreakdown,
    pub total: usize,
    /// Percent, two decimals; 0 for an empty project.
    pub completion_rate: f64,
    /// Best completion ratio first.
    pub members: Vec<MemberStats>,
    pub top_performer: Option<String>,
    pub needs_attention: Option<String>,
}

pub fn project_stats(tasks: &[Task]) -> ProjectStats {
    let mut breakdown = StatusBreakdown::default();
    let mut members: Vec<MemberStats> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for t in tasks {
        match t.status {
            TaskStatus::Completed => breakdown.completed += 1,
            TaskStatus::InProgress => breakdown.in_progress += 1,
            TaskStatus::Pending => breakdown.pending += 1,
            TaskStatus::Blocked => breakdown.blocked += 1,
        }

        let label = t.assignee_label();
        let slot = *index.entry(label.to_string()).or_insert_with(|| {
            members.push(MemberStats {
                assignee: label.to_string(),
                total: 0,
                completed: 0,
            });
            members.len() - 1
        });
        members[slot].total += 1;
        if t.is_completed() {
            members[slot].completed += 1;
        }
    }

    let total = tasks.len();
    let completion_rate = if total == 0 {
        0.0
    } else {
        (breakdown.completed as f64 / total as f64 * 10_000.0).round() / 100.0
    };

    members.sort_by(|a, b| b.completion_ratio().total_cmp(&a.completion_ratio()));
    let top_performer = members.first().map(|m| m.assignee.clone());
    // Earliest-seen member among those tied for the lowest ratio.
    let needs_attention = members
        .iter()
        .min_by(|a, b| a.completion_ratio().total_cmp(&b.completion_ratio()))
        .map(|m| m.assignee.clone());

    ProjectStats {
        breakdown,
        total,
        completion_rate,
        members,
        top_performer,
        needs_attention,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Assignee;

    fn assigned(id: &str, who: &str, status: TaskStatus) -> Task {
        Task::new(id, id)
            .with_status(status)
            .with_assignee(Assignee::Id(who.to_string()))
    }

    #[test]
    fn empty_project() {
        let s = project_stats(&[]);
        assert_eq!(s.total, 0);
        assert_eq!(s.completion_rate, 0.0);
        assert!(s.top_performer.is_none());
    }

    #[test]
    fn breakdown_and_rate() {
        let tasks = vec![
            assigned("1", "ana", TaskStatus::Completed),
            assigned("2", "ana", TaskStatus::Completed),
            assigned("3", "ben", TaskStatus::InProgress),
            assigned("4", "ben", TaskStatus::Completed),
            assigned("5", "cai", TaskStatus::Blocked),
            Task::new("6", "loose"),
        ];
        let s = project_stats(&tasks);
        assert_eq!(
            s.breakdown,
            StatusBreakdown {
                completed: 3,
                in_progress: 1,
                pending: 1,
                blocked: 1,
            }
        );
        assert_eq!(s.total, 6);
        assert_eq!(s.completion_rate, 50.0);

        let order: Vec<&str> = s.members.iter().map(|m| m.assignee.as_str()).collect();
        assert_eq!(order, ["ana", "ben", "cai", "Unassigned"]);
        assert_eq!(s.top_performer.as_deref(), Some("ana"));
        assert_eq!(s.needs_attention.as_deref(), Some("cai"));
    }

    #[test]
    fn needs_attention_breaks_ties_by_first_seen() {
        let tasks = vec![
            assigned("1", "dev", TaskStatus::Pending),
            assigned("2", "eli", TaskStatus::Completed),
            assigned("3", "fay", TaskStatus::Pending),
        ];
        let s = project_stats(&tasks);
        assert_eq!(s.top_performer.as_deref(), Some("eli"));
        assert_eq!(s.needs_attention.as_deref(), Some("dev"));
    }

    #[test]
    fn rate_rounds_to_two_decimals() {
        let tasks = vec![
            Task::new("1", "a").with_status(TaskStatus::Completed),
            Task::new("2", "b"),
            Task::new("3", "c"),
        ];
        assert_eq!(project_stats(&tasks).completion_rate, 33.33);
    }
}
