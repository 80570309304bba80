use crate::api::access::{owned_room, required_name, submitted};
use crate::api::item_management::models::{FormItem, NewItem};
use crate::api::user_management::sessions::CurrentUser;
use crate::db::DbConn;
use crate::error::{ErrorResponse, RouteError};
use crate::schema;
use diesel::prelude::*;
use rocket::form::{Contextual, Form};
use rocket::http::Status;
use rocket::response::Redirect;

#[post("/room/<room_id>/items/add", data = "<form_item>")]
pub(crate) async fn create_item(
    form_item: Form<Contextual<'_, FormItem>>,
    room_id: i32,
    user: CurrentUser,
    conn: DbConn,
) -> Result<Redirect, RouteError> {
    let (room, user) = owned_room(&conn, room_id, user, "add items to this room").await?;
    let form_item = submitted(form_item)?;

    let new_item = NewItem {
        name: required_name(&form_item.name, "item")?,
        description: form_item.description,
        price: form_item.price,
        room_id: room.id,
        user_id: user.0.id,
    };

    conn.run(move |c| {
        use schema::items::dsl::*;
        diesel::insert_into(items).values(&new_item).execute(c)
    })
    .await
    .map_err(|err| {
        ErrorResponse::new(
            Status { code: 500 },
            format!("Couldn't create item: {}", err),
        )
    })?;

    Ok(Redirect::to(uri!(
        crate::api::room_management::get_items::get_items(room_id)
    )))
}
