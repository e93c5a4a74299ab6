//! Sign-up, sign-in and logout against the identity endpoints.

use std::sync::Arc;

use serde_json::Value;

use stockpad_auth::{Route, Session, SessionStore};

use crate::dto::{Credentials, SignInResponse, SignUpForm};
use crate::error::ClientResult;
use crate::events::{EventBus, NotificationLevel};
use crate::http::{decode, ApiClient};
use crate::status::{OperationStatus, StatusSlot};

const SIGN_UP_PATH: &str = "entity/signup";
const SIGN_IN_PATH: &str = "individual/signin";

pub struct IdentityClient {
    api: ApiClient,
    session: Arc<SessionStore>,
    events: EventBus,
    status: StatusSlot,
}

impl IdentityClient {
    pub fn new(api: ApiClient, session: Arc<SessionStore>, events: EventBus) -> Self {
        Self {
            api,
            session,
            events,
            status: StatusSlot::new(),
        }
    }

    pub async fn status(&self) -> OperationStatus {
        self.status.current().await
    }

    /// Register a new entity. On success the UI is sent to sign-in.
    ///
    /// A rejected sign-up records the server's `message` when it sends one,
    /// like every other operation, and `Signup failed` only otherwise.
    pub async fn sign_up(&self, form: &SignUpForm) -> ClientResult<Value> {
        self.status
            .track("sign_up", "Signup failed", async {
                tracing::debug!(email = %form.email, "signing up");
                let body = self.api.post(SIGN_UP_PATH, None, form).await?;
                self.events.navigate(Route::SignIn);
                Ok(body)
            })
            .await
    }

    /// Authenticate and commit the session (memory and storage together).
    /// On success the UI is sent to the dashboard.
    pub async fn sign_in(&self, credentials: &Credentials) -> ClientResult<Session> {
        self.status
            .track("sign_in", "Signin failed", async {
                tracing::debug!(email = %credentials.email, "signing in");
                let body = self.api.post(SIGN_IN_PATH, None, credentials).await?;
                let signed_in = decode::<SignInResponse>(body)?.into_signed_in()?;

                self.session.establish(signed_in).await?;
                self.events.navigate(Route::Dashboard);
                Ok(self.session.snapshot().await)
            })
            .await
    }

    /// Purely local: no server call is made.
    pub async fn logout(&self) -> ClientResult<()> {
        self.session.clear().await?;
        self.events
            .notify(NotificationLevel::Success, "Logged Out Successful");
        Ok(())
    }
}
