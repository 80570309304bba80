use crate::api::access::{max_chars, within_chars};
use crate::schema::items;
use serde::Serialize;
use std::fmt::Debug;

#[derive(Queryable, Debug, Identifiable, Serialize)]
#[diesel(table_name = items)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Free-form text such as "$ 1000", not a number.
    pub price: Option<String>,
    pub room_id: i32,
    pub user_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = items)]
pub(super) struct NewItem {
    pub(super) name: String,
    pub(super) description: Option<String>,
    pub(super) price: Option<String>,
    pub(super) room_id: i32,
    pub(super) user_id: i32,
}

#[derive(FromForm)]
pub struct FormItem {
    #[field(validate = within_chars(80))]
    pub(super) name: String,
    #[field(validate = max_chars(250))]
    pub(super) description: Option<String>,
    #[field(validate = max_chars(8))]
    pub(super) price: Option<String>,
}
