//! Admin account service
//!
//! Administrators sign in by email. The seeded superadmin row is
//! protected from deletion, and admins can never delete themselves or
//! a superadmin.

use mdahub_api::Page;
use mdahub_common::PortalError;
use mdahub_persistence::entity::admins;
use mdahub_persistence::sea_orm::sea_query::Asterisk;
use mdahub_persistence::sea_orm::*;
use serde::Deserialize;

use crate::model::{AdminInfo, ROLE_ADMIN, ROLE_SUPERADMIN};
use crate::service::password;

/// Fields accepted when creating an admin account
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminParams {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Fields accepted when updating an admin account, all optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminParams {
    pub name: Option<String>,
    pub email: Option<String>,
    pub enabled: Option<bool>,
}

fn default_enabled() -> bool {
    true
}

pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> anyhow::Result<admins::Model> {
    admins::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| PortalError::NotFound(format!("admin {}", id)).into())
}

pub async fn find_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> anyhow::Result<Option<admins::Model>> {
    let admin = admins::Entity::find()
        .filter(admins::Column::Email.eq(email))
        .one(db)
        .await?;

    Ok(admin)
}

/// Verify credentials for the admin login endpoint. Disabled accounts
/// and unknown emails fail the same way as a bad password.
pub async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    plain_password: &str,
) -> anyhow::Result<admins::Model> {
    let admin = find_by_email(db, email)
        .await?
        .filter(|a| a.enabled)
        .ok_or_else(|| PortalError::Auth("invalid email or password".to_string()))?;

    if !password::verify_password(plain_password, &admin.password) {
        return Err(PortalError::Auth("invalid email or password".to_string()).into());
    }

    touch_last_login(db, &admin.id).await?;

    Ok(admin)
}

async fn touch_last_login(db: &DatabaseConnection, id: &str) -> anyhow::Result<()> {
    let now = chrono::Utc::now().naive_utc();
    admins::Entity::update_many()
        .col_expr(admins::Column::LastLogin, prelude::Expr::value(now))
        .filter(admins::Column::Id.eq(id))
        .exec(db)
        .await?;

    Ok(())
}

pub async fn search_page(
    db: &DatabaseConnection,
    keyword: &str,
    page_no: u64,
    page_size: u64,
) -> anyhow::Result<Page<AdminInfo>> {
    let mut count_select = admins::Entity::find();
    let mut query_select = admins::Entity::find().order_by_asc(admins::Column::Name);

    if !keyword.is_empty() {
        let filter = admins::Column::Name
            .contains(keyword)
            .or(admins::Column::Email.contains(keyword));
        count_select = count_select.filter(filter.clone());
        query_select = query_select.filter(filter);
    }

    let total_count = count_select
        .select_only()
        .column_as(prelude::Expr::col(Asterisk).count(), "count")
        .into_tuple::<i64>()
        .one(db)
        .await?
        .unwrap_or_default() as u64;

    if total_count > 0 {
        let offset = (page_no - 1) * page_size;
        let page_items = query_select
            .offset(offset)
            .limit(page_size)
            .all(db)
            .await?
            .into_iter()
            .map(AdminInfo::from)
            .collect();

        return Ok(Page::<AdminInfo>::new(
            total_count,
            page_no,
            page_size,
            page_items,
        ));
    }

    Ok(Page::<AdminInfo>::default())
}

/// Create an admin account. New accounts always get the `admin` role;
/// the superadmin row only ever comes from the initial seed.
pub async fn create(
    db: &DatabaseConnection,
    params: CreateAdminParams,
    created_by: &str,
) -> anyhow::Result<admins::Model> {
    password::validate_password(&params.password)?;

    if find_by_email(db, &params.email).await?.is_some() {
        return Err(PortalError::Conflict(format!("email {}", params.email)).into());
    }

    let hashed_password = password::hash_password(&params.password)?;
    let now = chrono::Utc::now().naive_utc();
    let entity = admins::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(params.name),
        email: Set(params.email),
        password: Set(hashed_password),
        role: Set(ROLE_ADMIN.to_string()),
        can_be_deleted: Set(true),
        created_by: Set(Some(created_by.to_string())),
        enabled: Set(params.enabled),
        last_login: Set(None),
        gmt_create: Set(now),
        gmt_modified: Set(now),
    };

    let model = entity.insert(db).await?;

    Ok(model)
}

pub async fn update(
    db: &DatabaseConnection,
    id: &str,
    params: UpdateAdminParams,
) -> anyhow::Result<admins::Model> {
    let existing = find_by_id(db, id).await?;

    if let Some(email) = &params.email
        && email != &existing.email
        && find_by_email(db, email).await?.is_some()
    {
        return Err(PortalError::Conflict(format!("email {}", email)).into());
    }

    let mut admin: admins::ActiveModel = existing.into();
    if let Some(name) = params.name {
        admin.name = Set(name);
    }
    if let Some(email) = params.email {
        admin.email = Set(email);
    }
    if let Some(enabled) = params.enabled {
        admin.enabled = Set(enabled);
    }
    admin.gmt_modified = Set(chrono::Utc::now().naive_utc());

    let model = admin.update(db).await?;

    Ok(model)
}

pub async fn reset_password(
    db: &DatabaseConnection,
    id: &str,
    new_password: &str,
) -> anyhow::Result<()> {
    password::validate_password(new_password)?;

    let existing = find_by_id(db, id).await?;
    let mut admin: admins::ActiveModel = existing.into();
    admin.password = Set(password::hash_password(new_password)?);
    admin.gmt_modified = Set(chrono::Utc::now().naive_utc());

    admin.update(db).await?;

    Ok(())
}

/// Delete an admin account, enforcing the deletion guards.
pub async fn delete(
    db: &DatabaseConnection,
    id: &str,
    actor_id: &str,
) -> anyhow::Result<admins::Model> {
    if id == actor_id {
        return Err(
            PortalError::Validation("an admin cannot delete their own account".to_string()).into(),
        );
    }

    let existing = find_by_id(db, id).await?;
    if !existing.can_be_deleted || existing.role == ROLE_SUPERADMIN {
        return Err(PortalError::Forbidden(format!(
            "admin {} cannot be deleted",
            existing.email
        ))
        .into());
    }

    existing.clone().delete(db).await?;

    Ok(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdahub_persistence::sea_orm::{DatabaseBackend, MockDatabase};

    fn sample_admin(id: &str, role: &str, can_be_deleted: bool) -> admins::Model {
        let now = chrono::Utc::now().naive_utc();
        admins::Model {
            id: id.to_string(),
            name: "Root".to_string(),
            email: "root@portal.example".to_string(),
            password: "hash".to_string(),
            role: role.to_string(),
            can_be_deleted,
            created_by: None,
            enabled: true,
            last_login: None,
            gmt_create: now,
            gmt_modified: now,
        }
    }

    #[tokio::test]
    async fn test_delete_rejects_self() {
        // The self-delete guard fires before any query
        let db = MockDatabase::new(DatabaseBackend::MySql).into_connection();

        let err = delete(&db, "a-1", "a-1").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PortalError>(),
            Some(PortalError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_protects_superadmin() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![sample_admin("a-1", ROLE_SUPERADMIN, false)]])
            .into_connection();

        let err = delete(&db, "a-1", "a-9").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PortalError>(),
            Some(PortalError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_honours_protection_flag() {
        let db = MockDatabase::new(DatabaseBackend::MySql)
            .append_query_results([vec![sample_admin("a-2", ROLE_ADMIN, false)]])
            .into_connection();

        let err = delete(&db, "a-2", "a-9").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PortalError>(),
            Some(PortalError::Forbidden(_))
        ));
    }
}
