pub mod activities;
pub mod admins;
pub mod auth;
pub mod export;
pub mod mdas;
pub mod profile;
pub mod route;
pub mod users;
