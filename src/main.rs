mod api;
mod db;
mod error;
mod schema;
mod settings;
#[cfg(test)]
mod tests;

#[macro_use]
extern crate rocket;
#[macro_use]
extern crate diesel;
extern crate dotenv;

use std::sync::Arc;
use std::time::Duration;

use api::user_management::provider::{GoogleProvider, IdentityProvider};
use api::user_management::sessions::SessionStore;
use db::DbConn;
use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::{Build, Rocket};
use settings::Settings;

pub(crate) fn build(
    figment: Figment,
    settings: Settings,
    provider: Arc<dyn IdentityProvider>,
) -> Rocket<Build> {
    let session_max_age = Duration::from_secs(settings.session_max_age);

    rocket::custom(figment)
        .attach(DbConn::fairing())
        .attach(AdHoc::on_ignite("Database migrations", db::run_db_migrations))
        .manage(SessionStore::new(session_max_age))
        .manage(settings)
        .manage(provider)
        .mount("/", api::routes())
}

#[launch]
fn rocket() -> _ {
    dotenv::dotenv().ok();

    let settings = Settings::new().expect("GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET must be set");
    let provider = GoogleProvider::new(&settings).expect("http client");

    build(rocket::Config::figment(), settings, Arc::new(provider))
}
