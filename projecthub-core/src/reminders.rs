//! Reminder prioritization and grouping.
//!
//! Pipeline: drop completed tasks, score each remaining task against `now`,
//! rank, cluster related tasks by shared keywords, and render one message per
//! task. Everything here is a pure function of the task list and `now`.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use regex::Regex;
use serde::Serialize;

use crate::error::ReminderError;
use crate::store::{ReminderRequest, TaskStore, resolve_tasks};
use crate::task::{Priority, Task};
use crate::time::{ceil_days, format_local_date};

/// Sort key standing in for "no deadline".
pub const NO_DUE_DATE_DAYS: i64 = 9999;

pub const DEFAULT_TOP_LIMIT: usize = 5;

// Grouping heuristics. Changing either changes which tasks merge.
const MIN_KEYWORD_LEN: usize = 3;
const MIN_SHARED_KEYWORDS: usize = 2;

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex"));

#[derive(Debug, Clone, Copy)]
pub struct ReminderOptions {
    /// Zone used to render due dates in messages.
    pub timezone: Tz,
    pub top_limit: usize,
}

impl Default for ReminderOptions {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            top_limit: DEFAULT_TOP_LIMIT,
        }
    }
}

/// A task with its urgency for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTask<'a> {
    pub task: &'a Task,
    pub score: i64,
    /// `None` when the task has no due date.
    pub days_until_due: Option<i64>,
}

impl ScoredTask<'_> {
    fn due_sort_key(&self) -> i64 {
        self.days_until_due.unwrap_or(NO_DUE_DATE_DAYS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderItem {
    pub task_id: String,
    pub name: String,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub message: String,
    pub score: i64,
}

impl ReminderItem {
    fn from_scored(scored: &ScoredTask<'_>, tz: Tz) -> Self {
        let task = scored.task;
        Self {
            task_id: task.id.clone(),
            name: task.name.clone(),
            priority: task.priority,
            due_date: task.due_date,
            message: compose_message(task, scored.days_until_due, tz),
            score: scored.score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderGroup {
    pub title: String,
    pub priority: Priority,
    pub items: Vec<ReminderItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderReport {
    pub top: Vec<ReminderItem>,
    pub groups: Vec<ReminderGroup>,
    pub generated_at: DateTime<Utc>,
}

/// Urgency of one task at `now`: deadline proximity tier plus priority weight.
pub fn score_task(task: &Task, now: DateTime<Utc>) -> ScoredTask<'_> {
    let until_due = task.due_date.map(|due| due - now);
    let days_until_due = until_due.map(ceil_days);

    let proximity = match (until_due, days_until_due) {
        (Some(until), _) if until < TimeDelta::zero() => 1000,
        (Some(_), Some(days)) if days <= 1 => 800,
        (Some(_), Some(days)) if days <= 3 => 600,
        (Some(_), Some(days)) if days <= 7 => 400,
        (Some(_), _) => 200,
        (None, _) => 0,
    };

    let mut score = proximity + task.priority.weight();
    if task.is_completed() {
        score -= 1000;
    }

    ScoredTask {
        task,
        score,
        days_until_due,
    }
}

/// Score desc, then sooner deadline, then higher priority. Stable for full ties.
pub fn rank_tasks(mut scored: Vec<ScoredTask<'_>>) -> Vec<ScoredTask<'_>> {
    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.due_sort_key().cmp(&b.due_sort_key()))
            .then_with(|| a.task.priority.cmp(&b.task.priority))
    });
    scored
}

/// Lower-cased alphanumeric tokens of name + description longer than two chars.
pub fn keywords(task: &Task) -> HashSet<String> {
    let text = format!(
        "{} {}",
        task.name,
        task.description.as_deref().unwrap_or_default()
    )
    .to_lowercase();

    NON_ALNUM
        .split(&text)
        .filter(|w| w.len() >= MIN_KEYWORD_LEN)
        .map(str::to_owned)
        .collect()
}

/// Greedy single pass over the ranked list.
///
/// Each unassigned task leads a new cluster and pulls in every later
/// unassigned task sharing at least two keywords with the lead itself.
/// Membership is never chained through non-lead members.
pub fn cluster_related(ranked: &[ScoredTask<'_>]) -> Vec<Vec<usize>> {
    let words: Vec<HashSet<String>> = ranked.iter().map(|s| keywords(s.task)).collect();
    let mut used = vec![false; ranked.len()];
    let mut clusters = Vec::new();

    for i in 0..ranked.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        let mut members = vec![i];

        for j in (i + 1)..ranked.len() {
            if used[j] {
                continue;
            }
            let overlap = words[j].intersection(&words[i]).count();
            if overlap >= MIN_SHARED_KEYWORDS {
                used[j] = true;
                members.push(j);
            }
        }

        clusters.push(members);
    }

    clusters
}

/// One reminder group per cluster, titled after its lead task.
pub fn group_reminders(ranked: &[ScoredTask<'_>], tz: Tz) -> Vec<ReminderGroup> {
    cluster_related(ranked)
        .into_iter()
        .map(|members| {
            let items: Vec<ReminderItem> = members
                .iter()
                .map(|&i| ReminderItem::from_scored(&ranked[i], tz))
                .collect();
            let priority = items
                .iter()
                .map(|item| item.priority)
                .min()
                .unwrap_or(Priority::Low);
            ReminderGroup {
                title: format!("Focus: {}", ranked[members[0]].task.name),
                priority,
                items,
            }
        })
        .collect()
}

/// Human-readable reminder for one task.
pub fn compose_message(task: &Task, days_until_due: Option<i64>, tz: Tz) -> String {
    let name = if task.name.is_empty() {
        "Task"
    } else {
        task.name.as_str()
    };
    let due = task
        .due_date
        .map(|d| format_local_date(d, tz))
        .unwrap_or_else(|| "no due date".to_string());

    let tip = match task.due_date.and(days_until_due) {
        Some(days) if days < 0 => "This is overdue. Start immediately.",
        Some(days) if days <= 1 => "Due within 24 hours. Block focused time now.",
        Some(days) if days <= 3 => "High urgency. Plan concrete steps today.",
        Some(days) if days <= 7 => "Break into daily sub-tasks to stay on track.",
        Some(_) => "Schedule initial work to avoid last-minute rush.",
        None => "No deadline set. Consider adding one for better tracking.",
    };

    let hint = match task.priority {
        Priority::High => "This typically needs 2-3 focused sessions.",
        Priority::Medium => "Allocate at least one focused session.",
        Priority::Low => "You can slot this between bigger tasks.",
    };

    format!(
        "{name} (Priority: {}, Due: {due}). {tip} {hint}",
        task.priority.label()
    )
}

/// Full pipeline over an already-resolved task list.
pub fn generate_reminders(
    tasks: &[Task],
    now: DateTime<Utc>,
    options: &ReminderOptions,
) -> ReminderReport {
    let scored: Vec<ScoredTask<'_>> = tasks
        .iter()
        .filter(|t| !t.is_completed())
        .map(|t| score_task(t, now))
        .collect();
    let skipped = tasks.len() - scored.len();

    let ranked = rank_tasks(scored);
    let groups = group_reminders(&ranked, options.timezone);
    let top = ranked
        .iter()
        .take(options.top_limit)
        .map(|s| ReminderItem::from_scored(s, options.timezone))
        .collect();

    tracing::debug!(
        tasks = tasks.len(),
        skipped_completed = skipped,
        groups = groups.len(),
        "generated reminders"
    );

    ReminderReport {
        top,
        groups,
        generated_at: now,
    }
}

/// Resolve the request's tasks (inline list or project lookup) and run the pipeline.
pub async fn generate_for_request<S: TaskStore>(
    request: ReminderRequest,
    store: &S,
    now: DateTime<Utc>,
    options: &ReminderOptions,
) -> Result<ReminderReport, ReminderError> {
    let tasks = resolve_tasks(request, store).await?;
    Ok(generate_reminders(&tasks, now, options))
}
