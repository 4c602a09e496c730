// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use async_trait::async_trait;
use common::{
    Credentials, NewTask, NewUser, SignInResponse, StatusUpdate, Task, TaskStatus, UserProfile,
};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use crate::error::{ApiError, Operation};
use crate::session::SessionContext;

/// The six calls the client makes against the task backend.
///
/// Each call is a single request/response exchange. Any failure, whatever
/// its cause, comes back as an [`ApiError`] naming the operation.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `GET /tasks`
    async fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError>;

    /// `POST /tasks`, returns the task with its server-assigned id.
    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError>;

    /// `PATCH /tasks/{id}`
    async fn update_task_status(&self, id: &str, status: TaskStatus) -> Result<Task, ApiError>;

    /// `POST /users`
    async fn create_user(&self, user: &NewUser) -> Result<UserProfile, ApiError>;

    /// `POST /auth/signin`. Does not persist anything.
    async fn sign_in(&self, credentials: &Credentials) -> Result<SignInResponse, ApiError>;

    /// `GET /auth/validate` with the stored bearer token.
    ///
    /// Resolves to `Ok(None)` without touching the network when no token is
    /// stored, and to `Ok(None)` after clearing the stored session when the
    /// backend rejects the token.
    async fn validate_session(&self) -> Result<Option<UserProfile>, ApiError>;
}

/// HTTP implementation of [`Backend`].
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: SessionContext,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionContext) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    // Task routes are scoped to the signed-in user on the backend.
    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        op: Operation,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|source| {
            error!("{}: request failed: {}", op, source);
            ApiError::Request { op, source }
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("{}: backend answered {}", op, status);
            return Err(ApiError::Status {
                op,
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|source| {
            error!("{}: unexpected response body: {}", op, source);
            ApiError::Decode { op, source }
        })
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError> {
        debug!("Fetching tasks from {}", self.base_url);
        let request = self.authorized(self.http.get(self.url("/tasks")));
        let tasks: Vec<Task> = self.send(Operation::FetchTasks, request).await?;
        info!("Successfully retrieved {} tasks.", tasks.len());
        Ok(tasks)
    }

    async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        debug!("Creating task: {}", task.title);
        let request = self.authorized(self.http.post(self.url("/tasks")).json(task));
        let created: Task = self.send(Operation::CreateTask, request).await?;
        info!("Task created successfully with ID: {}", created.id);
        Ok(created)
    }

    async fn update_task_status(&self, id: &str, status: TaskStatus) -> Result<Task, ApiError> {
        debug!("Setting task {} to {}", id, status);
        let request = self.authorized(
            self.http
                .patch(self.url(&format!("/tasks/{}", id)))
                .json(&StatusUpdate { status }),
        );
        let updated: Task = self.send(Operation::UpdateTask, request).await?;
        info!("Task {} is now {}", updated.id, updated.status);
        Ok(updated)
    }

    async fn create_user(&self, user: &NewUser) -> Result<UserProfile, ApiError> {
        debug!("Creating user {}", user.email);
        let request = self.http.post(self.url("/users")).json(user);
        let created: UserProfile = self.send(Operation::CreateUser, request).await?;
        info!("User {} created.", created.name);
        Ok(created)
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<SignInResponse, ApiError> {
        debug!("Signing in as {}", credentials.email);
        let request = self.http.post(self.url("/auth/signin")).json(credentials);
        let response: SignInResponse = self.send(Operation::SignIn, request).await?;
        info!("Signed in as {}", response.user.name);
        Ok(response)
    }

    async fn validate_session(&self) -> Result<Option<UserProfile>, ApiError> {
        let op = Operation::ValidateSession;
        let Some(token) = self.session.token() else {
            debug!("No session token stored; skipping validation.");
            return Ok(None);
        };

        let response = self
            .http
            .get(self.url("/auth/validate"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|source| {
                error!("{}: request failed: {}", op, source);
                ApiError::Request { op, source }
            })?;

        if !response.status().is_success() {
            warn!("Session rejected by backend ({}).", response.status());
            if let Err(e) = self.session.clear() {
                error!("Failed to clear rejected session: {:?}", e);
            }
            return Ok(None);
        }

        let user = response.json::<UserProfile>().await.map_err(|source| {
            error!("{}: unexpected response body: {}", op, source);
            ApiError::Decode { op, source }
        })?;
        debug!("Session valid for {}", user.name);
        Ok(Some(user))
    }
}
