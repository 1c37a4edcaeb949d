use anyhow::Result;
use chrono::Duration;
use clap::Subcommand;
use projecthub_core::time::format_local_date;
use projecthub_core::{
    DeadlineAlert, ReminderItem, ReminderReport, approaching_deadlines, generate_for_request,
};

use crate::config::Config;
use crate::source::{TaskSourceArgs, resolve_now};
use crate::task_store::ConfiguredStore;

#[derive(Subcommand, Debug)]
pub enum RemindersCommand {
    /// Rank open tasks and group related ones into reminder messages
    Generate {
        #[command(flatten)]
        source: TaskSourceArgs,

        /// Evaluate as of this time instead of now
        #[arg(long)]
        now: Option<String>,

        /// Size of the top list (default from config.reminders.top_limit)
        #[arg(long)]
        top: Option<usize>,

        /// Print the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List open tasks whose deadline falls within the next N days
    Deadlines {
        #[command(flatten)]
        source: TaskSourceArgs,

        #[arg(long)]
        now: Option<String>,

        /// Window in days (default from config.reminders.deadline_window_days)
        #[arg(long)]
        within_days: Option<i64>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

pub async fn run(cmd: RemindersCommand, cfg: &Config) -> Result<()> {
    match cmd {
        RemindersCommand::Generate {
            source,
            now,
            top,
            json,
        } => generate(&source, now.as_deref(), top, json, cfg).await,
        RemindersCommand::Deadlines {
            source,
            now,
            within_days,
            json,
        } => deadlines(&source, now.as_deref(), within_days, json, cfg).await,
    }
}

async fn generate(
    source: &TaskSourceArgs,
    now: Option<&str>,
    top: Option<usize>,
    json: bool,
    cfg: &Config,
) -> Result<()> {
    let mut opts = cfg.reminder_options()?;
    if let Some(n) = top {
        opts.top_limit = n;
    }
    let now = resolve_now(now, cfg)?;
    let store = ConfiguredStore::from_config(cfg)?;

    let report = generate_for_request(source.to_request()?, &store, now, &opts).await?;
    tracing::info!(
        top = report.top.len(),
        groups = report.groups.len(),
        "reminders generated"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &ReminderReport) {
    println!("# Reminders ({})\n", report.generated_at.to_rfc3339());

    if report.top.is_empty() {
        println!("Nothing open. No reminders to send.");
        return;
    }

    println!("## Top {}\n", report.top.len());
    for (i, item) in report.top.iter().enumerate() {
        println!("{}. {}", i + 1, headline(item));
        println!("   {}", item.message);
    }

    println!("\n## Groups\n");
    for g in &report.groups {
        println!("### {} [{}]", g.title, g.priority.as_str());
        for item in &g.items {
            println!("- {}", headline(item));
        }
        println!();
    }
}

fn headline(item: &ReminderItem) -> String {
    format!(
        "[{}] score={} | {}",
        item.priority.label(),
        item.score,
        if item.name.is_empty() { "Task" } else { item.name.as_str() }
    )
}

async fn deadlines(
    source: &TaskSourceArgs,
    now: Option<&str>,
    within_days: Option<i64>,
    json: bool,
    cfg: &Config,
) -> Result<()> {
    let tz = cfg.reminder_options()?.timezone;
    let now = resolve_now(now, cfg)?;
    let days = within_days.unwrap_or(cfg.reminders.deadline_window_days).max(0);

    let tasks = source.load(cfg).await?;
    let alerts = approaching_deadlines(&tasks, now, window_days(days));
    tracing::info!(scanned = tasks.len(), hits = alerts.len(), days, "deadline check");

    if json {
        println!("{}", serde_json::to_string_pretty(&alerts)?);
        return Ok(());
    }

    if alerts.is_empty() {
        println!("No tasks with approaching deadlines found.");
        return Ok(());
    }

    println!("Found {} tasks with approaching deadlines:", alerts.len());
    for a in &alerts {
        println!("{}", alert_line(a, tz));
    }
    Ok(())
}

/// Day count as a window, saturating for counts past chrono's range.
fn window_days(days: i64) -> Duration {
    Duration::try_days(days).unwrap_or(Duration::MAX)
}

fn alert_line(a: &DeadlineAlert, tz: chrono_tz::Tz) -> String {
    format!(
        "- {} (due {}, {}) -> {}",
        a.name,
        format_local_date(a.due_date, tz),
        a.status.as_str(),
        a.assignee
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use projecthub_core::{Priority, TaskStatus};

    #[test]
    fn headline_falls_back_for_unnamed_tasks() {
        let item = ReminderItem {
            task_id: "a".into(),
            name: String::new(),
            priority: Priority::High,
            due_date: None,
            message: String::new(),
            score: 200,
        };
        assert_eq!(headline(&item), "[HIGH] score=200 | Task");
    }

    #[test]
    fn oversized_window_saturates() {
        assert_eq!(window_days(3), Duration::days(3));
        assert_eq!(window_days(i64::MAX), Duration::MAX);
        assert_eq!(window_days(1_000_000_000_000), Duration::MAX);
    }

    #[test]
    fn alert_line_uses_local_date() {
        let a = DeadlineAlert {
            task_id: "a".into(),
            name: "Write docs".into(),
            status: TaskStatus::InProgress,
            due_date: Utc.with_ymd_and_hms(2025, 10, 1, 3, 0, 0).unwrap(),
            assignee: "Unassigned".into(),
        };
        assert_eq!(
            alert_line(&a, chrono_tz::America::Chicago),
            "- Write docs (due 9/30/2025, in-progress) -> Unassigned"
        );
    }
}
