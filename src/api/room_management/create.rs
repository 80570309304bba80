use crate::api::access::{require_login, required_name, submitted};
use crate::api::room_management::models::{FormRoom, NewRoom};
use crate::api::user_management::sessions::CurrentUser;
use crate::db::DbConn;
use crate::error::{ErrorResponse, RouteError};
use crate::schema;
use diesel::prelude::*;
use log::info;
use rocket::form::{Contextual, Form};
use rocket::http::Status;
use rocket::response::Redirect;

#[post("/room/add", data = "<form_room>")]
pub(crate) async fn create_room(
    form_room: Form<Contextual<'_, FormRoom>>,
    user: CurrentUser,
    conn: DbConn,
) -> Result<Redirect, RouteError> {
    let user = require_login(user)?;
    let form_room = submitted(form_room)?;

    let new_room = NewRoom {
        name: required_name(&form_room.name, "room")?,
        user_id: user.0.id,
    };

    conn.run(move |c| {
        use schema::rooms::dsl::*;
        diesel::insert_into(rooms)
            .values(&new_room)
            .execute(c)
            .map_err(|err| {
                ErrorResponse::new(
                    Status { code: 500 },
                    format!("Couldn't create room: {}", err),
                )
            })
    })
    .await?;

    info!("User {} added a room", user.0.id);

    Ok(Redirect::to(uri!(super::list::list_rooms)))
}
