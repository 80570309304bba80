use crate::api::access::{owned_item, required_name, submitted};
use crate::api::item_management::models::FormItem;
use crate::api::user_management::sessions::CurrentUser;
use crate::db::DbConn;
use crate::error::{ErrorResponse, RouteError};
use crate::schema;
use diesel::prelude::*;
use rocket::form::{Contextual, Form};
use rocket::http::Status;
use rocket::response::Redirect;

/// Replaces name, description and price of an item.
#[post("/room/<room_id>/items/<item_id>/edit", data = "<form_item>")]
pub(crate) async fn edit_item(
    form_item: Form<Contextual<'_, FormItem>>,
    room_id: i32,
    item_id: i32,
    user: CurrentUser,
    conn: DbConn,
) -> Result<Redirect, RouteError> {
    let (_, item, _) = owned_item(&conn, room_id, item_id, user, "edit item in this room").await?;
    let form_item = submitted(form_item)?;
    let new_name = required_name(&form_item.name, "item")?;

    conn.run(move |c| {
        use schema::items::dsl::*;
        diesel::update(items.find(item.id))
            .set((
                name.eq(new_name),
                description.eq(form_item.description),
                price.eq(form_item.price),
            ))
            .execute(c)
    })
    .await
    .map_err(|err| {
        ErrorResponse::new(
            Status { code: 500 },
            format!("Couldn't update data: {}", err),
        )
    })?;

    Ok(Redirect::to(uri!(
        crate::api::room_management::get_items::get_items(room_id)
    )))
}
