// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
//! Client for the task backend.
//!
//! The tasks page is entered through a one-shot session check
//! ([`gate::check_session`]); when the backend accepts the stored token the
//! task list is loaded and kept in a [`tasks::TaskBoard`], which is patched
//! locally after each confirmed create or status change. The session token
//! and cached profile live in an injected [`session::SessionContext`].
pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod notify;
pub mod page;
pub mod render;
pub mod session;
pub mod tasks;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, Backend};
pub use config::ClientConfig;
pub use error::{ApiError, Operation, SignInError, TaskError};
pub use page::{Entry, TasksPage};
pub use session::{Session, SessionContext};
