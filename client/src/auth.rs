// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::sync::Arc;

use common::{Credentials, NewUser, UserProfile};
use tracing::{error, info};

use crate::api::Backend;
use crate::error::{ApiError, SignInError};
use crate::gate::Route;
use crate::notify::{Notification, Notifier};
use crate::session::{Session, SessionContext};

/// The unauthenticated landing view: sign-up and sign-in.
pub struct SignInPage<B> {
    backend: B,
    session: SessionContext,
    notifier: Arc<dyn Notifier>,
}

impl<B: Backend> SignInPage<B> {
    pub fn new(backend: B, session: SessionContext, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            session,
            notifier,
        }
    }

    /// Creates an account. The new user still has to sign in.
    pub async fn sign_up(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<UserProfile, ApiError> {
        let user = NewUser {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        };
        match self.backend.create_user(&user).await {
            Ok(created) => {
                self.notifier
                    .notify(Notification::success("Account created, please sign in"));
                Ok(created)
            }
            Err(e) => {
                self.notifier.notify(Notification::error(e.to_string()));
                Err(e)
            }
        }
    }

    /// Exchanges credentials for a session and persists it. On success the
    /// caller should move on to [`Route::Tasks`]. A session that cannot be
    /// stored is a failed sign-in.
    pub async fn sign_in(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Route, SignInError> {
        let credentials = Credentials {
            email: email.into(),
            password: password.into(),
        };
        let response = match self.backend.sign_in(&credentials).await {
            Ok(response) => response,
            Err(e) => {
                self.notifier.notify(Notification::error(e.to_string()));
                return Err(e.into());
            }
        };

        let session = Session {
            token: response.token,
            user: response.user,
        };
        if let Err(e) = self.session.write(&session) {
            error!("Failed to persist session: {:?}", e);
            let err = SignInError::Session(e);
            self.notifier.notify(Notification::error(err.to_string()));
            return Err(err);
        }
        info!("Signed in as {}", session.user.name);
        self.notifier.notify(Notification::success(format!(
            "Welcome back, {}",
            session.user.name
        )));
        Ok(Route::Tasks)
    }
}

/// Drops the local session without contacting the backend.
pub fn logout(session: &SessionContext) -> Route {
    if let Err(e) = session.clear() {
        error!("Failed to clear session on logout: {:?}", e);
    }
    info!("Logged out.");
    Route::SignIn
}
