use crate::api::access::{owned_room, required_name, submitted};
use crate::api::room_management::models::FormRoom;
use crate::api::user_management::sessions::CurrentUser;
use crate::db::DbConn;
use crate::error::{ErrorResponse, RouteError};
use crate::schema;
use diesel::prelude::*;
use rocket::form::{Contextual, Form};
use rocket::http::Status;
use rocket::response::Redirect;

#[post("/room/<room_id>/edit", data = "<form_room>")]
pub(crate) async fn edit_room(
    form_room: Form<Contextual<'_, FormRoom>>,
    room_id: i32,
    user: CurrentUser,
    conn: DbConn,
) -> Result<Redirect, RouteError> {
    let (room, _) = owned_room(&conn, room_id, user, "edit this room").await?;
    let form_room = submitted(form_room)?;
    let new_name = required_name(&form_room.name, "room")?;

    conn.run(move |c| {
        use schema::rooms::dsl::*;
        diesel::update(rooms.find(room.id))
            .set(name.eq(new_name))
            .execute(c)
    })
    .await
    .map_err(|err| {
        ErrorResponse::new(
            Status { code: 500 },
            format!("Couldn't update data: {}", err),
        )
    })?;

    Ok(Redirect::to(uri!(super::get_items::get_items(room_id))))
}
