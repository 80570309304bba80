pub(crate) mod check_login;
pub(crate) mod login;
pub(crate) mod logout;
pub(crate) mod models;
pub(crate) mod provider;
pub(crate) mod sessions;
