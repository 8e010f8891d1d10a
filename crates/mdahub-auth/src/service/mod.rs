pub mod admin;
pub mod password;
pub mod token;
pub mod user;
