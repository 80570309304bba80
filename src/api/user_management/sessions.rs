use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use crate::api::user_management::models::{User, UserLoggedIn};
use crate::api::user_management::provider::Credentials;
use crate::db::DbConn;
use crate::error::{ApiError, ErrorResponse};
use crate::schema;
use diesel::prelude::*;
use log::{debug, error};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use rocket::http::{Cookie, Status};
use rocket::request::{self, FromRequest, Outcome};
use rocket::Request;
use serde::{Deserialize, Serialize};

const SESSION_COOKIE: &str = "session";

/// Server-side state of one browser session.
#[derive(Debug, Default, Clone)]
pub(crate) struct LoginSession {
    pub(crate) state: Option<String>,
    pub(crate) user_id: Option<i32>,
    pub(crate) email: Option<String>,
    pub(crate) username: Option<String>,
    pub(crate) picture: Option<String>,
    pub(crate) provider: Option<String>,
    pub(crate) provider_subject: Option<String>,
    pub(crate) credentials: Option<Credentials>,
}

#[derive(Serialize, Deserialize)]
struct SessionCookie {
    session_key: String,
    creation_time: SystemTime,
}

struct StoredSession {
    created: SystemTime,
    session: LoginSession,
}

impl StoredSession {
    fn new() -> StoredSession {
        StoredSession {
            created: SystemTime::now(),
            session: LoginSession::default(),
        }
    }
}

pub(crate) struct SessionStore {
    sessions: Mutex<HashMap<String, StoredSession>>,
    max_age: Duration,
}

impl SessionStore {
    pub(crate) fn new(max_age: Duration) -> SessionStore {
        SessionStore {
            sessions: Mutex::new(HashMap::<String, StoredSession>::new()),
            max_age,
        }
    }

    pub(crate) fn get(&self, key: &str) -> Result<Option<LoginSession>, ErrorResponse> {
        Ok(self
            .lock()?
            .get(key)
            .filter(|stored| !self.expired(stored))
            .map(|stored| stored.session.clone()))
    }

    /// Applies `f` to the session stored under `key`, starting from an empty
    /// session if there is none.
    pub(crate) fn update<T>(
        &self,
        key: &str,
        f: impl FnOnce(&mut LoginSession) -> T,
    ) -> Result<T, ErrorResponse> {
        let mut sessions = self.lock()?;
        let stored = sessions
            .entry(key.to_string())
            .or_insert_with(StoredSession::new);
        Ok(f(&mut stored.session))
    }

    /// Registers a new empty session and returns its key. Expired sessions are
    /// dropped on the way.
    pub(crate) fn start(&self) -> Result<String, ErrorResponse> {
        let mut sessions = self.lock()?;

        let before = sessions.len();
        sessions.retain(|_, stored| !self.expired(stored));
        if sessions.len() < before {
            debug!("Pruned {} expired sessions", before - sessions.len());
        }

        let key = generate_token();
        sessions.insert(key.clone(), StoredSession::new());
        Ok(key)
    }

    pub(crate) fn remove(&self, key: &str) -> Result<Option<LoginSession>, ErrorResponse> {
        Ok(self.lock()?.remove(key).map(|stored| stored.session))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.sessions.lock().map(|sessions| sessions.len()).unwrap_or(0)
    }

    fn expired(&self, stored: &StoredSession) -> bool {
        stored
            .created
            .elapsed()
            .map_or(false, |age| age > self.max_age)
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, StoredSession>>, ErrorResponse> {
        self.sessions.lock().map_err(|_| {
            ErrorResponse::new(
                Status { code: 500 },
                "Couldn't get user sessions".to_string(),
            )
        })
    }
}

/// Key of the browser's session. Obtaining it starts a new session when the
/// browser has none yet.
pub(crate) struct BrowserSession {
    pub(crate) key: String,
}

/// Key of the browser's session if the server still knows it. Never starts one.
pub(crate) struct KnownSession {
    pub(crate) key: Option<String>,
}

/// The visitor's user, `None` for anonymous visitors. A failure while loading
/// the user is kept as an error instead of reading as "not logged in".
pub(crate) struct CurrentUser(Result<Option<UserLoggedIn>, ErrorResponse>);

impl CurrentUser {
    pub(crate) fn resolve(self) -> Result<Option<UserLoggedIn>, ErrorResponse> {
        self.0
    }
}

pub(crate) fn generate_token() -> String {
    const LEN: usize = 32;

    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(LEN)
        .map(char::from)
        .collect()
}

/// Reads the session key from the private cookie, ignoring expired cookies.
fn session_key(req: &Request<'_>, max_age: Duration) -> Option<String> {
    let cookie = req.cookies().get_private(SESSION_COOKIE)?;
    let value = serde_json::from_str::<SessionCookie>(cookie.value()).ok()?;
    let age = value.creation_time.elapsed().ok()?;

    if age > max_age {
        return None;
    }

    Some(value.session_key)
}

fn session_store<'r>(req: &'r Request<'_>) -> Result<&'r SessionStore, (Status, ApiError)> {
    req.rocket().state::<SessionStore>().ok_or_else(|| {
        (
            Status { code: 500 },
            ApiError::new("Couldn't get session state".to_string()),
        )
    })
}

/// The cookie's session key, provided the store still holds that session.
fn known_key(req: &Request<'_>, sessions: &SessionStore) -> Option<String> {
    let key = session_key(req, sessions.max_age)?;

    match sessions.get(&key) {
        Ok(Some(_)) => Some(key),
        _ => None,
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BrowserSession {
    type Error = ApiError;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let sessions = match session_store(req) {
            Ok(sessions) => sessions,
            Err(err) => return Outcome::Error(err),
        };

        if let Some(key) = known_key(req, sessions) {
            return Outcome::Success(BrowserSession { key });
        }

        let key = match sessions.start() {
            Ok(key) => key,
            Err(_) => {
                return Outcome::Error((
                    Status { code: 500 },
                    ApiError::new("Couldn't update user session".to_string()),
                ))
            }
        };

        let cookie = SessionCookie {
            session_key: key.clone(),
            creation_time: SystemTime::now(),
        };
        let cookie_string = match serde_json::to_string(&cookie) {
            Ok(cookie_string) => cookie_string,
            Err(err) => {
                return Outcome::Error((
                    Status { code: 500 },
                    ApiError::new(format!("Couldn't create session cookie {}", err)),
                ))
            }
        };

        req.cookies()
            .add_private(Cookie::new(SESSION_COOKIE, cookie_string));

        Outcome::Success(BrowserSession { key })
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for KnownSession {
    type Error = ApiError;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match session_store(req) {
            Ok(sessions) => Outcome::Success(KnownSession {
                key: known_key(req, sessions),
            }),
            Err(err) => Outcome::Error(err),
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for UserLoggedIn {
    type Error = ApiError;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let sessions = match session_store(req) {
            Ok(sessions) => sessions,
            Err(err) => return Outcome::Error(err),
        };

        let key = match session_key(req, sessions.max_age) {
            Some(key) => key,
            None => return Outcome::Forward(Status { code: 401 }),
        };

        let uid = match sessions.get(&key) {
            Ok(Some(LoginSession {
                user_id: Some(uid), ..
            })) => uid,
            _ => return Outcome::Forward(Status { code: 401 }),
        };

        let conn = match req.guard::<DbConn>().await {
            Outcome::Success(conn) => conn,
            _ => {
                return Outcome::Error((
                    Status { code: 500 },
                    ApiError::new("Couldn't get database connection".to_string()),
                ))
            }
        };

        let user = conn
            .run(move |c| {
                use schema::users::dsl::*;
                users.find(uid).first::<User>(c).optional()
            })
            .await;

        match user {
            Ok(Some(user)) => Outcome::Success(UserLoggedIn(user)),
            Ok(None) => Outcome::Forward(Status { code: 401 }),
            Err(err) => {
                error!("Couldn't load user {} from database: {}", uid, err);
                Outcome::Error((
                    Status { code: 500 },
                    ApiError::new("Couldn't load user from database".to_string()),
                ))
            }
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CurrentUser {
    type Error = Infallible;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let user = match req.guard::<UserLoggedIn>().await {
            Outcome::Success(user) => Ok(Some(user)),
            Outcome::Forward(_) => Ok(None),
            Outcome::Error(err) => Err(ErrorResponse::from(err)),
        };

        Outcome::Success(CurrentUser(user))
    }
}
