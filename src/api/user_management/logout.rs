use std::sync::Arc;

use crate::api::user_management::provider::IdentityProvider;
use crate::api::user_management::sessions::{KnownSession, SessionStore};
use crate::error::ErrorResponse;
use log::{info, warn};
use rocket::http::Status;
use rocket::State;

fn not_connected() -> ErrorResponse {
    ErrorResponse::new(
        Status { code: 401 },
        "Current user not connected.".to_string(),
    )
}

#[get("/logout")]
pub(crate) async fn logout(
    session: KnownSession,
    sessions: &State<SessionStore>,
    provider: &State<Arc<dyn IdentityProvider>>,
) -> Result<&'static str, ErrorResponse> {
    let key = session.key.ok_or_else(not_connected)?;
    let credentials = sessions
        .get(&key)?
        .and_then(|s| s.credentials)
        .ok_or_else(not_connected)?;

    if let Err(err) = provider.revoke(&credentials.access_token).await {
        warn!("Couldn't revoke access token: {}", err);
        return Err(ErrorResponse::new(
            Status { code: 400 },
            "Failed to revoke token for given user! Please try to login with another Google Account"
                .to_string(),
        ));
    }

    let user_id = sessions.remove(&key)?.and_then(|s| s.user_id);

    info!("User {:?} logged out", user_id);

    Ok("Successfully disconnected.")
}

#[get("/logout/")]
pub(crate) async fn logout_slash(
    session: KnownSession,
    sessions: &State<SessionStore>,
    provider: &State<Arc<dyn IdentityProvider>>,
) -> Result<&'static str, ErrorResponse> {
    logout(session, sessions, provider).await
}
