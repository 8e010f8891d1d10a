//! Activity log entity for the administrative audit trail
//!
//! One row per successful mutating admin request.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: u64,
    /// Admin account that performed the action
    pub admin_id: String,
    /// Admin display name captured at the time of the action
    pub admin_name: String,
    /// Action: CREATE, UPDATE, DELETE, LOGIN, LOGOUT, RESET_PASSWORD, EXPORT
    pub action: String,
    /// Resource type: USER, MDA, ADMIN, EXPORT
    pub resource_type: String,
    /// Identifier of the affected resource
    #[sea_orm(column_type = "Text", nullable)]
    pub resource_id: Option<String>,
    /// Human-readable name of the affected resource
    #[sea_orm(column_type = "Text", nullable)]
    pub resource_name: Option<String>,
    /// Additional details in JSON format
    #[sea_orm(column_type = "Text", nullable)]
    pub details: Option<String>,
    /// Source IP address
    #[sea_orm(column_type = "Text", nullable)]
    pub source_ip: Option<String>,
    /// User agent header of the originating request
    #[sea_orm(column_type = "Text", nullable)]
    pub user_agent: Option<String>,
    /// When the action occurred
    pub gmt_create: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
