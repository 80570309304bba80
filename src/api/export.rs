use std::collections::HashMap;

use crate::api::item_management::models::Item;
use crate::api::room_management::models::Room;
use crate::api::user_management::sessions::CurrentUser;
use crate::db::DbConn;
use crate::error::ErrorResponse;
use crate::schema;
use diesel::prelude::*;
use log::error;
use rocket::http::Status;
use rocket::serde::json::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct ItemExport {
    pub id: i32,
    pub name: String,
    pub owner: String,
    pub room: String,
    pub description: Option<String>,
    pub price: Option<String>,
}

#[derive(Serialize)]
pub struct RoomExport {
    pub id: i32,
    pub name: String,
    pub owner: String,
    pub items: Vec<ItemExport>,
}

#[derive(Serialize)]
pub struct Export {
    #[serde(rename = "Rooms")]
    pub rooms: Vec<RoomExport>,
}

/// All rooms of the logged in user with their items nested inside.
#[get("/JSON")]
pub(crate) async fn export(
    user: CurrentUser,
    conn: DbConn,
) -> Result<Json<Export>, ErrorResponse> {
    let user = user.resolve()?.ok_or_else(|| {
        ErrorResponse::new(
            Status { code: 401 },
            format!(
                "Please log in at {} to get access to the API",
                uri!(crate::api::user_management::login::login)
            ),
        )
    })?;

    let uid = user.0.id;
    let (room_list, item_list) = conn
        .run(move |c| {
            let room_list = {
                use schema::rooms::dsl::*;
                rooms
                    .filter(user_id.eq(uid))
                    .order(id.asc())
                    .load::<Room>(c)?
            };
            let item_list = {
                use schema::items::dsl::*;
                items
                    .filter(user_id.eq(uid))
                    .order(id.asc())
                    .load::<Item>(c)?
            };

            Ok::<_, diesel::result::Error>((room_list, item_list))
        })
        .await
        .map_err(|err| {
            error!("Couldn't export rooms of user {}: {}", uid, err);
            ErrorResponse::new(Status { code: 500 }, "Couldn't load rooms".to_string())
        })?;

    let mut by_room = HashMap::<i32, Vec<Item>>::new();
    for item in item_list {
        by_room.entry(item.room_id).or_default().push(item);
    }

    let owner = user.0.name;
    let rooms = room_list
        .into_iter()
        .map(|room| RoomExport {
            id: room.id,
            owner: owner.clone(),
            items: by_room
                .remove(&room.id)
                .unwrap_or_default()
                .into_iter()
                .map(|item| ItemExport {
                    id: item.id,
                    name: item.name,
                    owner: owner.clone(),
                    room: room.name.clone(),
                    description: item.description,
                    price: item.price,
                })
                .collect(),
            name: room.name,
        })
        .collect();

    Ok(Json(Export { rooms }))
}
