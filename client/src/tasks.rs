// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use common::{NewTask, Task, TaskStatus};
use tracing::{debug, info, warn};

use crate::api::Backend;
use crate::error::TaskError;
use crate::notify::{Notification, Notifier};

/// Width of the due-soon window, counted from "now".
pub const DUE_SOON_DAYS: i64 = 2;

/// A task is due soon when it is still pending and its due date lies in
/// `[now, now + 2 days]`, both ends included.
pub fn is_due_soon(task: &Task, now: DateTime<Utc>) -> bool {
    let horizon = now + Duration::days(DUE_SOON_DAYS);
    task.status == TaskStatus::Pending && task.due_date >= now && task.due_date <= horizon
}

/// In-memory task list for the current page visit.
///
/// The list is only ever changed after the backend confirmed a call: a load
/// replaces it wholesale, a create appends the returned task, a status update
/// patches the matching task in place. Every outcome is reported through the
/// notifier.
pub struct TaskBoard<B> {
    backend: B,
    notifier: Arc<dyn Notifier>,
    tasks: Vec<Task>,
    loading: bool,
}

impl<B: Backend> TaskBoard<B> {
    pub fn new(backend: B, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            notifier,
            tasks: Vec::new(),
            loading: true,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// True until the first load attempt settles.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Pending tasks due within the next two days, in list order.
    pub fn due_soon(&self, now: DateTime<Utc>) -> Vec<&Task> {
        self.tasks.iter().filter(|t| is_due_soon(t, now)).collect()
    }

    /// Replaces the local list with the backend's. On failure the previous
    /// list is kept.
    pub async fn load(&mut self) -> Result<usize, TaskError> {
        let result = self.backend.fetch_tasks().await;
        self.loading = false;
        match result {
            Ok(tasks) => {
                self.tasks = tasks;
                info!("Loaded {} tasks.", self.tasks.len());
                Ok(self.tasks.len())
            }
            Err(e) => {
                self.notifier.notify(Notification::error("Failed to load tasks"));
                Err(e.into())
            }
        }
    }

    /// Submits a new pending task and appends what the backend returns.
    pub async fn create(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: DateTime<Utc>,
    ) -> Result<&Task, TaskError> {
        let new_task = NewTask::new(title, description, due_date);
        match self.backend.create_task(&new_task).await {
            Ok(created) => {
                debug!("Appending task {}", created.id);
                self.tasks.push(created);
                self.notifier
                    .notify(Notification::success("Task created successfully"));
                Ok(&self.tasks[self.tasks.len() - 1])
            }
            Err(e) => {
                self.notifier.notify(Notification::error("Failed to create task"));
                Err(e.into())
            }
        }
    }

    /// Sets a task's status on the backend, then patches only the status of
    /// the local copy.
    pub async fn update_status(&mut self, id: &str, status: TaskStatus) -> Result<(), TaskError> {
        if let Err(e) = self.backend.update_task_status(id, status).await {
            self.notifier
                .notify(Notification::error("Failed to update task status"));
            return Err(e.into());
        }

        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => task.status = status,
            None => warn!("Updated task {} is not in the local list.", id),
        }
        self.notifier.notify(Notification::success("Task status updated"));
        Ok(())
    }

    /// Flips a locally known task between pending and completed.
    pub async fn toggle_status(&mut self, id: &str) -> Result<TaskStatus, TaskError> {
        let Some(current) = self.get(id).map(|t| t.status) else {
            self.notifier
                .notify(Notification::error("Failed to update task status"));
            return Err(TaskError::NotFound(id.to_string()));
        };
        let target = current.toggled();
        self.update_status(id, target).await?;
        Ok(target)
    }
}
