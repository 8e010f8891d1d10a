pub mod activity_log;
pub mod admins;
pub mod mdas;
pub mod users;
