// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::fmt;

use thiserror::Error;

/// The backend call an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchTasks,
    CreateTask,
    UpdateTask,
    CreateUser,
    SignIn,
    ValidateSession,
}

impl Operation {
    /// The generic message surfaced when this call fails, whatever the cause.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::FetchTasks => "Failed to fetch tasks",
            Operation::CreateTask => "Failed to create task",
            Operation::UpdateTask => "Failed to update task",
            Operation::CreateUser => "Failed to create user",
            Operation::SignIn => "Invalid credentials",
            Operation::ValidateSession => "Failed to validate session",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.failure_message())
    }
}

/// Failure of a single backend call.
///
/// Transport errors and non-success statuses are kept apart for logging, but
/// all variants display the same operation-specific message.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused connection, ...)
    #[error("{op}")]
    Request {
        op: Operation,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-2xx status
    #[error("{op}")]
    Status { op: Operation, status: u16 },

    /// The response body did not match the expected shape
    #[error("{op}")]
    Decode {
        op: Operation,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    pub fn operation(&self) -> Operation {
        match self {
            ApiError::Request { op, .. }
            | ApiError::Status { op, .. }
            | ApiError::Decode { op, .. } => *op,
        }
    }
}

/// Errors surfaced by the task board on top of backend failures.
#[derive(Error, Debug)]
pub enum TaskError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The id is not part of the locally loaded list
    #[error("Task {0} not found")]
    NotFound(String),
}

/// Sign-in failures: the backend refused, or the session it issued could not
/// be stored.
#[derive(Error, Debug)]
pub enum SignInError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Failed to save session")]
    Session(anyhow::Error),
}
