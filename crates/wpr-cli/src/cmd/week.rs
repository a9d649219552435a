//! Read-only week reports: `weekly`, `summary`, `today`, `daily`.

use std::io::{self, Write};

use serde::Serialize;
use wpr_core::{CalendarDate, WeeklyStore};

use crate::cmd::{Session, TaskView, task_views};
use crate::output::{pretty_section, render_mode};

/// Identity of the reported week.
#[derive(Debug, Serialize)]
pub struct WeekHeader {
    pub week_number: u32,
    pub week_start: CalendarDate,
    pub week_end: CalendarDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub editable: bool,
}

impl WeekHeader {
    pub fn of(store: &WeeklyStore) -> Self {
        Self {
            week_number: store.week_number(),
            week_start: store.week_start(),
            week_end: store.week_end(),
            group: store.group().map(str::to_string),
            editable: store.is_editable(),
        }
    }

    /// `Week <n> - <monday> .. <sunday>`, with the group when there is one.
    pub fn title(&self) -> String {
        let mut title = format!(
            "Week {} - {} .. {}",
            self.week_number, self.week_start, self.week_end
        );
        if let Some(group) = &self.group {
            title.push_str(&format!(" [{group}]"));
        }
        title
    }
}

#[derive(Debug, Serialize)]
pub struct TaskReport {
    #[serde(flatten)]
    pub header: WeekHeader,
    pub tasks: Vec<TaskView>,
}

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    #[serde(flatten)]
    pub header: WeekHeader,
    pub open: Vec<TaskView>,
    pub completed: Vec<TaskView>,
}

fn write_text_rows(w: &mut dyn Write, tasks: &[TaskView]) -> io::Result<()> {
    for task in tasks {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            task.id,
            task.originated,
            task.status(),
            task.description
        )?;
    }
    Ok(())
}

fn write_pretty_rows(w: &mut dyn Write, tasks: &[TaskView]) -> io::Result<()> {
    if tasks.is_empty() {
        return writeln!(w, "  (none)");
    }
    for task in tasks {
        writeln!(
            w,
            "{:>3}. {} {}  {}",
            task.id,
            task.checkbox(),
            task.originated,
            task.description
        )?;
    }
    Ok(())
}

fn render_tasks(session: &Session, report: &TaskReport, heading: &str) -> anyhow::Result<()> {
    render_mode(
        session.output,
        report,
        |r, w| write_text_rows(w, &r.tasks),
        |r, w| {
            pretty_section(w, &format!("{} - {heading}", r.header.title()))?;
            write_pretty_rows(w, &r.tasks)
        },
    )
}

/// `wpr weekly`: every task of the week.
pub fn run_weekly(session: &Session) -> anyhow::Result<()> {
    let store = session.open()?;
    let report = TaskReport {
        header: WeekHeader::of(&store),
        tasks: task_views(&store, |_| true),
    };
    render_tasks(session, &report, "all tasks")
}

/// `wpr today`: open tasks created on the reference day.
pub fn run_today(session: &Session) -> anyhow::Result<()> {
    let store = session.open()?;
    let today = session.reference_day;
    let report = TaskReport {
        header: WeekHeader::of(&store),
        tasks: task_views(&store, |task| {
            !task.is_completed() && task.originated_on() == today
        }),
    };
    render_tasks(session, &report, "created today")
}

/// `wpr daily`: open tasks created on or before the reference day.
pub fn run_daily(session: &Session) -> anyhow::Result<()> {
    let store = session.open()?;
    let today = session.reference_day;
    let report = TaskReport {
        header: WeekHeader::of(&store),
        tasks: task_views(&store, |task| task.is_open_on(today)),
    };
    render_tasks(session, &report, "open as of today")
}

/// `wpr summary`: header, open tasks, then completed tasks.
pub fn run_summary(session: &Session) -> anyhow::Result<()> {
    let store = session.open()?;
    let report = SummaryReport {
        header: WeekHeader::of(&store),
        open: task_views(&store, |task| !task.is_completed()),
        completed: task_views(&store, |task| task.is_completed()),
    };

    render_mode(
        session.output,
        &report,
        |r, w| {
            writeln!(w, "{}", r.header.title())?;
            write_text_rows(w, &r.open)?;
            write_text_rows(w, &r.completed)
        },
        |r, w| {
            pretty_section(w, &r.header.title())?;
            writeln!(w, "Open ({})", r.open.len())?;
            write_pretty_rows(w, &r.open)?;
            writeln!(w)?;
            writeln!(w, "Completed ({})", r.completed.len())?;
            write_pretty_rows(w, &r.completed)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(group: Option<&str>) -> WeekHeader {
        let monday = CalendarDate::parse("2024-03-18").expect("valid date");
        WeekHeader {
            week_number: monday.week_number(),
            week_start: monday,
            week_end: monday.shift(6),
            group: group.map(str::to_string),
            editable: false,
        }
    }

    #[test]
    fn title_names_week_number_and_range() {
        assert_eq!(header(None).title(), "Week 12 - 2024-03-18 .. 2024-03-24");
        assert_eq!(
            header(Some("work")).title(),
            "Week 12 - 2024-03-18 .. 2024-03-24 [work]"
        );
    }

    #[test]
    fn text_rows_are_tab_separated() {
        let task = "2024-03-18:A:water plants".parse().expect("parse");
        let mut buf = Vec::new();
        write_text_rows(&mut buf, &[TaskView::new(1, &task)]).expect("write");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "1\t2024-03-18\tA\twater plants\n"
        );
    }

    #[test]
    fn pretty_rows_mark_empty_lists() {
        let mut buf = Vec::new();
        write_pretty_rows(&mut buf, &[]).expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "  (none)\n");
    }

    #[test]
    fn report_json_flattens_the_header() {
        let report = TaskReport {
            header: header(None),
            tasks: Vec::new(),
        };
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["week_start"], "2024-03-18");
        assert_eq!(json["week_end"], "2024-03-24");
        assert_eq!(json["week_number"], 12);
        assert!(json.get("group").is_none());
        assert_eq!(json["tasks"], serde_json::json!([]));
    }
}
