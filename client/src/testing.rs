// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
//! In-process backend double shared by the unit tests.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Credentials, NewTask, NewUser, SignInResponse, Task, TaskStatus, UserProfile};
use parking_lot::Mutex;

use crate::api::Backend;
use crate::error::{ApiError, Operation};
use crate::session::SessionContext;

pub const VALID_TOKEN: &str = "valid-token";
pub const PASSWORD: &str = "correct-horse";

pub fn task(id: &str, status: TaskStatus, due_date: DateTime<Utc>) -> Task {
    Task {
        id: id.to_string(),
        title: format!("Task {}", id),
        description: format!("Description of {}", id),
        due_date,
        status,
        created_at: None,
        updated_at: None,
    }
}

pub fn profile(name: &str) -> UserProfile {
    UserProfile {
        id: Some(format!("user-{}", name.to_lowercase())),
        name: name.to_string(),
        email: Some(format!("{}@example.com", name.to_lowercase())),
        created_at: None,
    }
}

/// Mirrors the HTTP client's contract without a network: validation reads
/// the token from `session` and clears it when it does not match
/// [`VALID_TOKEN`].
pub struct FakeBackend {
    session: SessionContext,
    tasks: Mutex<Vec<Task>>,
    failing: Mutex<Vec<Operation>>,
    calls: Mutex<Vec<Operation>>,
    next_id: Mutex<u32>,
    last_created: Mutex<Option<String>>,
}

impl FakeBackend {
    pub fn new(session: SessionContext, tasks: Vec<Task>) -> Self {
        Self {
            session,
            tasks: Mutex::new(tasks),
            failing: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            next_id: Mutex::new(100),
            last_created: Mutex::new(None),
        }
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self::new(SessionContext::in_memory(), tasks)
    }

    /// Makes every later call of `op` answer with a 500.
    pub fn fail(&self, op: Operation) {
        self.failing.lock().push(op);
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.calls.lock().clone()
    }

    pub fn last_created_id(&self) -> Option<String> {
        self.last_created.lock().clone()
    }

    fn enter(&self, op: Operation) -> Result<(), ApiError> {
        self.calls.lock().push(op);
        if self.failing.lock().contains(&op) {
            return Err(ApiError::Status { op, status: 500 });
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.enter(Operation::FetchTasks)?;
        Ok(self.tasks.lock().clone())
    }

    async fn create_task(&self, new_task: &NewTask) -> Result<Task, ApiError> {
        self.enter(Operation::CreateTask)?;
        let id = {
            let mut next = self.next_id.lock();
            *next += 1;
            format!("srv-{}", *next)
        };
        let created = Task {
            id: id.clone(),
            title: new_task.title.clone(),
            description: new_task.description.clone(),
            due_date: new_task.due_date,
            status: TaskStatus::Pending,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        };
        self.tasks.lock().push(created.clone());
        *self.last_created.lock() = Some(id);
        Ok(created)
    }

    async fn update_task_status(&self, id: &str, status: TaskStatus) -> Result<Task, ApiError> {
        self.enter(Operation::UpdateTask)?;
        let mut tasks = self.tasks.lock();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(ApiError::Status {
                op: Operation::UpdateTask,
                status: 404,
            })?;
        task.status = status;
        // The real backend bumps this; the board must not copy it over.
        task.updated_at = Some(Utc::now());
        Ok(task.clone())
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserProfile, ApiError> {
        self.enter(Operation::CreateUser)?;
        let mut created = profile(&user.name);
        created.email = Some(user.email.clone());
        Ok(created)
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<SignInResponse, ApiError> {
        self.enter(Operation::SignIn)?;
        if credentials.password != PASSWORD {
            return Err(ApiError::Status {
                op: Operation::SignIn,
                status: 401,
            });
        }
        Ok(SignInResponse {
            token: VALID_TOKEN.to_string(),
            user: profile("Ada"),
        })
    }

    async fn validate_session(&self) -> Result<Option<UserProfile>, ApiError> {
        let Some(token) = self.session.token() else {
            return Ok(None);
        };
        self.enter(Operation::ValidateSession)?;
        if token != VALID_TOKEN {
            let _ = self.session.clear();
            return Ok(None);
        }
        Ok(Some(profile("Ada")))
    }
}
