// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{Task, TaskStatus};
use tracing::debug;

use crate::api::Backend;
use crate::auth;
use crate::error::TaskError;
use crate::gate::{self, GateOutcome, Route};
use crate::notify::Notifier;
use crate::session::SessionContext;
use crate::tasks::TaskBoard;

/// What entering the tasks page led to.
pub enum Entry<B> {
    Redirect(Route),
    Ready(TasksPage<B>),
}

/// The signed-in tasks view: greeting, due-soon list, full list.
pub struct TasksPage<B> {
    board: TaskBoard<B>,
    session: SessionContext,
    user_name: String,
}

impl<B: Backend> TasksPage<B> {
    /// Runs the session gate and, when it lets us through, the initial load.
    ///
    /// A failed load does not prevent entry; the page shows an empty list and
    /// the failure has been notified.
    pub async fn enter(
        backend: B,
        session: SessionContext,
        notifier: Arc<dyn Notifier>,
    ) -> Entry<B> {
        let profile = match gate::check_session(&backend, &session).await {
            GateOutcome::Redirect(route) => return Entry::Redirect(route),
            GateOutcome::Proceed { profile } => profile,
        };

        let mut board = TaskBoard::new(backend, notifier);
        if let Err(e) = board.load().await {
            // Already notified; the page opens with an empty list.
            debug!("Entering tasks page without tasks: {}", e);
        }

        Entry::Ready(Self {
            board,
            session,
            user_name: profile.map(|p| p.name).unwrap_or_default(),
        })
    }

    /// Name from the cached profile; empty if none was cached.
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn tasks(&self) -> &[Task] {
        self.board.tasks()
    }

    pub fn due_soon(&self, now: DateTime<Utc>) -> Vec<&Task> {
        self.board.due_soon(now)
    }

    pub fn is_loading(&self) -> bool {
        self.board.is_loading()
    }

    pub fn board(&self) -> &TaskBoard<B> {
        &self.board
    }

    pub async fn reload(&mut self) -> Result<usize, TaskError> {
        self.board.load().await
    }

    pub async fn create_task(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: DateTime<Utc>,
    ) -> Result<&Task, TaskError> {
        self.board.create(title, description, due_date).await
    }

    pub async fn update_status(&mut self, id: &str, status: TaskStatus) -> Result<(), TaskError> {
        self.board.update_status(id, status).await
    }

    pub async fn toggle_status(&mut self, id: &str) -> Result<TaskStatus, TaskError> {
        self.board.toggle_status(id).await
    }

    pub fn logout(self) -> Route {
        auth::logout(&self.session)
    }
}
