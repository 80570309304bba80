use crate::api::access::within_chars;
use crate::schema::rooms;
use serde::Serialize;
use std::fmt::Debug;

#[derive(Queryable, Debug, Identifiable, Serialize)]
#[diesel(table_name = rooms)]
pub struct Room {
    pub id: i32,
    pub name: String,
    pub user_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = rooms)]
pub(super) struct NewRoom {
    pub(super) name: String,
    pub(super) user_id: i32,
}

#[derive(FromForm)]
pub struct FormRoom {
    #[field(validate = within_chars(250))]
    pub(super) name: String,
}
