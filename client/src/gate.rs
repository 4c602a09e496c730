// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use common::UserProfile;
use tracing::{debug, error, info};

use crate::api::Backend;
use crate::session::SessionContext;

/// Views the client can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Unauthenticated landing view with the sign-in form
    SignIn,
    Tasks,
}

/// Result of the one-shot session check performed on page entry.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// No usable session; local session data has been cleared.
    Redirect(Route),
    /// The backend accepted the token. `profile` is the locally cached user,
    /// read for display only.
    Proceed { profile: Option<UserProfile> },
}

/// Validates the stored session against the backend.
///
/// Anything short of an accepted token sends the caller to the sign-in view.
/// Only a rejected token is dropped from the store, and that happens in
/// [`Backend::validate_session`]. A failed call leaves the session in place
/// for the next attempt. There is no retry.
pub async fn check_session<B: Backend + ?Sized>(
    backend: &B,
    session: &SessionContext,
) -> GateOutcome {
    match backend.validate_session().await {
        Ok(Some(_)) => {}
        Ok(None) => {
            debug!("No valid session, redirecting to sign-in.");
            return GateOutcome::Redirect(Route::SignIn);
        }
        Err(e) => {
            error!("Session validation failed: {:?}", e);
            return GateOutcome::Redirect(Route::SignIn);
        }
    }

    let profile = session.profile();
    info!(
        "Session valid, proceeding as {}",
        profile.as_ref().map(|p| p.name.as_str()).unwrap_or("<unknown>")
    );
    GateOutcome::Proceed { profile }
}
