use crate::schema::users;
use diesel::prelude::*;
use serde::Serialize;
use std::fmt::Debug;

#[derive(Queryable, Identifiable, Debug, Clone, Serialize)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub picture: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUser<'a> {
    pub(crate) name: &'a str,
    pub(crate) email: &'a str,
    pub(crate) picture: Option<&'a str>,
}

/// The user behind the current session, resolved from the database.
#[derive(Debug)]
pub struct UserLoggedIn(pub User);

impl NewUser<'_> {
    /// Returns the user registered under this email, creating it on first login.
    pub(crate) fn find_or_create(&self, c: &mut SqliteConnection) -> QueryResult<User> {
        c.transaction(|c| {
            let existing = users::table
                .filter(users::email.eq(self.email))
                .first::<User>(c)
                .optional()?;

            if let Some(user) = existing {
                return Ok(user);
            }

            diesel::insert_into(users::table).values(self).execute(c)?;

            users::table
                .filter(users::email.eq(self.email))
                .first::<User>(c)
        })
    }
}
