// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use common::TaskStatus;

/// Terminal client for the task backend
#[derive(Parser, Debug)]
#[command(name = "tasks", about, version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Backend origin (overrides TASKS_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Session file (overrides TASKS_SESSION_FILE)
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Log requests and outcomes to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account
    Signup {
        #[arg(long, value_parser = non_blank)]
        name: String,
        #[arg(long, value_parser = non_blank)]
        email: String,
        #[arg(long, value_parser = non_blank)]
        password: String,
    },
    /// Sign in and remember the session
    Signin {
        #[arg(long, value_parser = non_blank)]
        email: String,
        #[arg(long, value_parser = non_blank)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show tasks due in the next two days and all tasks
    List,
    /// Create a pending task
    Create {
        #[arg(long, value_parser = non_blank)]
        title: String,
        #[arg(long)]
        description: String,
        /// YYYY-MM-DD or an RFC 3339 date-time
        #[arg(long, value_parser = parse_due)]
        due: DateTime<Utc>,
    },
    /// Set a task's status
    Status {
        id: String,
        /// pending or completed
        status: TaskStatus,
    },
    /// Flip a task between pending and completed
    Toggle { id: String },
}

fn non_blank(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("must not be empty".to_string())
    } else {
        Ok(value.to_string())
    }
}

fn parse_due(value: &str) -> Result<DateTime<Utc>, String> {
    common::parse_datetime(value)
        .ok_or_else(|| format!("'{}' is not a date (expected YYYY-MM-DD)", value))
}
