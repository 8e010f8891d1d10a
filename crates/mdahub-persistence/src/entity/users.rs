//! Portal user entity
//!
//! A user belongs to exactly one MDA and signs in through the user
//! login endpoint.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// UUID string assigned at creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name
    pub name: String,
    /// Login name, unique across the table
    pub username: String,
    /// Contact address, unique across the table
    pub contact_email: String,
    /// Bcrypt password hash
    #[serde(skip_serializing)]
    pub password: String,
    /// Owning MDA identifier
    pub mda_id: String,
    pub enabled: bool,
    /// Last successful login, if any
    pub last_login: Option<DateTime>,
    pub gmt_create: DateTime,
    pub gmt_modified: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
