//! Portal administrator entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    /// UUID string assigned at creation
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Display name
    pub name: String,
    /// Login address, unique across the table
    pub email: String,
    /// Bcrypt password hash
    #[serde(skip_serializing)]
    pub password: String,
    /// Role: `admin` or `superadmin`
    pub role: String,
    /// Seeded superadmin rows are created with this set to false
    pub can_be_deleted: bool,
    /// Id of the admin that created this account, if any
    #[sea_orm(column_type = "Text", nullable)]
    pub created_by: Option<String>,
    pub enabled: bool,
    /// Last successful login, if any
    pub last_login: Option<DateTime>,
    pub gmt_create: DateTime,
    pub gmt_modified: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
