// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::fmt::Write;

use chrono::{DateTime, Datelike, Utc};
use common::Task;

use crate::api::Backend;
use crate::page::TasksPage;

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Long calendar date, e.g. "October 20th, 2026".
pub fn format_due_date(date: DateTime<Utc>) -> String {
    let day = date.day();
    format!(
        "{} {}{}, {}",
        date.format("%B"),
        day,
        ordinal_suffix(day),
        date.year()
    )
}

/// One block per task, or "No tasks found" for an empty list.
pub fn render_task_list<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> String {
    let mut out = String::new();
    for task in tasks {
        let _ = writeln!(out, "{}  [{}]  ({})", task.title, task.status, task.id);
        if !task.description.is_empty() {
            let _ = writeln!(out, "    {}", task.description);
        }
        let _ = writeln!(out, "    Due: {}", format_due_date(task.due_date));
    }
    if out.is_empty() {
        out.push_str("No tasks found\n");
    }
    out
}

pub fn render_page<B: Backend>(page: &TasksPage<B>, now: DateTime<Utc>) -> String {
    if page.is_loading() {
        return "Loading...\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "Task Overview");
    if !page.user_name().is_empty() {
        let _ = writeln!(out, "Welcome, {}", page.user_name());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Tasks Due in 2 Days");
    out.push_str(&render_task_list(page.due_soon(now)));
    let _ = writeln!(out);
    let _ = writeln!(out, "All Tasks");
    out.push_str(&render_task_list(page.tasks()));
    out
}
