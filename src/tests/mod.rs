use std::path::PathBuf;
use std::sync::Arc;

use crate::api::user_management::provider::{
    Credentials, IdentityProvider, ProviderError, TokenInfo, UserInfo,
};
use crate::api::user_management::sessions::SessionStore;
use crate::settings::Settings;
use diesel::prelude::*;
use rocket::http::{ContentType, Status};
use rocket::local::blocking::{Client, LocalResponse};
use serde_json::Value;
use tempfile::TempDir;

mod items;

pub(crate) const CLIENT_ID: &str = "test-client.apps.googleusercontent.com";

/// Stand-in for Google. The authorization code is the account name, and a few
/// reserved names make a step of the handshake fail: "expired", "revoked",
/// "impostor", "foreign", "private" and, on logout, "sticky".
struct FakeProvider;

#[rocket::async_trait]
impl IdentityProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    async fn exchange_code(&self, code: &str) -> Result<Credentials, ProviderError> {
        if code == "expired" {
            return Err(ProviderError::Rejected(400));
        }

        Ok(Credentials {
            access_token: format!("token-{}", code),
            subject: format!("sub-{}", code),
        })
    }

    async fn token_info(&self, access_token: &str) -> Result<TokenInfo, ProviderError> {
        let account = access_token.trim_start_matches("token-");

        let user_id = match account {
            "impostor" => "sub-someone-else".to_string(),
            _ => format!("sub-{}", account),
        };
        let issued_to = match account {
            "foreign" => "another-app.apps.googleusercontent.com",
            _ => CLIENT_ID,
        };

        let error = match account {
            "revoked" => Some("invalid_token".to_string()),
            _ => None,
        };

        Ok(TokenInfo {
            user_id: Some(user_id),
            issued_to: Some(issued_to.to_string()),
            error,
        })
    }

    async fn user_info(&self, access_token: &str) -> Result<UserInfo, ProviderError> {
        let account = access_token.trim_start_matches("token-");
        if account == "private" {
            return Err(ProviderError::Rejected(403));
        }

        Ok(UserInfo {
            name: account.to_string(),
            email: format!("{}@example.com", account),
            picture: Some(format!("https://example.com/{}.png", account)),
        })
    }

    async fn revoke(&self, access_token: &str) -> Result<(), ProviderError> {
        if access_token == "token-sticky" {
            return Err(ProviderError::Rejected(400));
        }

        Ok(())
    }
}

pub(crate) struct TestApp {
    pub(crate) client: Client,
    db_path: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    pub(crate) fn new() -> TestApp {
        TestApp::with_session_max_age(60 * 60)
    }

    pub(crate) fn with_session_max_age(session_max_age: u64) -> TestApp {
        let dir = tempfile::tempdir().expect("temporary directory");
        let db_path = dir.path().join("room_item_user.db");

        let figment = rocket::Config::figment()
            .merge((
                "databases.room_item_user.url",
                db_path.to_string_lossy().to_string(),
            ))
            .merge(("databases.room_item_user.pool_size", 4))
            .merge(("secret_key", "hPRYyVRiMyxpw5sBB1XeCMN1kFsDCqKvBi2QJxBVHQk="))
            .merge(("log_level", "off"));

        let settings = Settings {
            google_client_id: CLIENT_ID.to_string(),
            google_client_secret: "test-secret".to_string(),
            session_max_age,
        };

        let rocket = crate::build(figment, settings, Arc::new(FakeProvider));
        let client = Client::tracked(rocket).expect("valid rocket instance");

        TestApp {
            client,
            db_path,
            _dir: dir,
        }
    }

    /// Runs the whole handshake for `account` and returns the callback response.
    pub(crate) fn login(&self, account: &str) -> LocalResponse<'_> {
        let page: Value = self
            .client
            .get("/login")
            .dispatch()
            .into_json()
            .expect("login page");
        let state = page["state"].as_str().expect("state token").to_string();

        self.client
            .post(format!("/gconnect?state={}", state))
            .body(account)
            .dispatch()
    }

    pub(crate) fn login_as(&self, account: &str) {
        assert_eq!(self.login(account).status(), Status::Ok);
    }

    pub(crate) fn logout(&self) {
        assert_eq!(self.client.get("/logout").dispatch().status(), Status::Ok);
    }

    pub(crate) fn post_form(&self, uri: &str, body: &str) -> LocalResponse<'_> {
        self.client
            .post(uri.to_string())
            .header(ContentType::Form)
            .body(body)
            .dispatch()
    }

    pub(crate) fn get_json(&self, uri: &str) -> Value {
        let response = self.client.get(uri.to_string()).dispatch();
        assert_eq!(response.status(), Status::Ok, "GET {}", uri);
        response.into_json().expect("json body")
    }

    pub(crate) fn add_room(&self, name: &str) -> i64 {
        let response = self.post_form("/room/add", &format!("name={}", name));
        assert_eq!(response.status(), Status::SeeOther);

        self.get_json("/rooms")
            .as_array()
            .expect("room list")
            .iter()
            .find(|room| room["name"] == name)
            .and_then(|room| room["id"].as_i64())
            .expect("created room")
    }

    pub(crate) fn add_item(&self, room_id: i64, name: &str) -> i64 {
        let response = self.post_form(
            &format!("/room/{}/items/add", room_id),
            &format!("name={}&description=new&price=%24%2010", name),
        );
        assert_eq!(response.status(), Status::SeeOther);

        self.get_json(&format!("/room/{}/items", room_id))["items"]
            .as_array()
            .expect("item list")
            .iter()
            .find(|item| item["name"] == name)
            .and_then(|item| item["id"].as_i64())
            .expect("created item")
    }

    pub(crate) fn sessions(&self) -> &SessionStore {
        self.client
            .rocket()
            .state::<SessionStore>()
            .expect("managed session store")
    }

    pub(crate) fn db(&self) -> SqliteConnection {
        SqliteConnection::establish(&self.db_path.to_string_lossy()).expect("test database")
    }
}

pub(crate) fn location(response: &LocalResponse<'_>) -> Option<String> {
    response.headers().get_one("Location").map(str::to_string)
}
