// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
mod cli;

use std::process::ExitCode;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use client::auth::{self, SignInPage};
use client::notify::NotificationLog;
use client::render;
use client::{ApiClient, ClientConfig, Entry, SessionContext, TasksPage};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url {
        config = config.api_base_url(url);
    }
    if let Some(path) = cli.session_file {
        config = config.session_file(path);
    }
    tracing::debug!(
        "Using backend {} and session file {}",
        config.api_base_url,
        config.session_file.display()
    );

    let session = SessionContext::file(&config.session_file);
    let api = ApiClient::new(config.api_base_url.clone(), session.clone());
    let log = NotificationLog::new();

    let ok = run(cli.command, api, session, &log).await;

    for notification in log.entries() {
        println!("{}", notification);
    }
    if ok && !log.has_errors() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Executes one command. Returns false when the user has to act (sign in)
/// or a step failed in a way that did not raise a notification.
async fn run(
    command: Command,
    api: ApiClient,
    session: SessionContext,
    log: &NotificationLog,
) -> bool {
    let notifier = Arc::new(log.clone());

    match command {
        Command::Signup {
            name,
            email,
            password,
        } => {
            let page = SignInPage::new(api, session, notifier);
            page.sign_up(name, email, password).await.is_ok()
        }
        Command::Signin { email, password } => {
            let page = SignInPage::new(api, session, notifier);
            page.sign_in(email, password).await.is_ok()
        }
        Command::Logout => {
            auth::logout(&session);
            println!("Signed out.");
            true
        }
        command => {
            let mut page = match TasksPage::enter(api, session, notifier).await {
                Entry::Ready(page) => page,
                Entry::Redirect(route) => {
                    tracing::debug!("Redirected to {:?}", route);
                    println!("Not signed in. Run `tasks signin` first.");
                    return false;
                }
            };

            let ok = match command {
                Command::Create {
                    title,
                    description,
                    due,
                } => page.create_task(title, description, due).await.is_ok(),
                Command::Status { id, status } => page.update_status(&id, status).await.is_ok(),
                Command::Toggle { id } => page.toggle_status(&id).await.is_ok(),
                _ => true,
            };

            print!("{}", render::render_page(&page, Utc::now()));
            ok
        }
    }
}
