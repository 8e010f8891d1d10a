//! User account service

use mdahub_api::Page;
use mdahub_common::PortalError;
use mdahub_persistence::entity::users;
use mdahub_persistence::sea_orm::sea_query::Asterisk;
use mdahub_persistence::sea_orm::*;
use serde::Deserialize;

use crate::model::UserInfo;
use crate::service::password;

/// Fields accepted when creating a user account
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserParams {
    pub name: String,
    pub username: String,
    pub contact_email: String,
    pub password: String,
    pub mda_id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// Fields accepted when updating a user account, all optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserParams {
    pub name: Option<String>,
    pub username: Option<String>,
    pub contact_email: Option<String>,
    pub mda_id: Option<String>,
    pub enabled: Option<bool>,
}

fn default_enabled() -> bool {
    true
}

pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> anyhow::Result<users::Model> {
    users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| PortalError::NotFound(format!("user {}", id)).into())
}

pub async fn find_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> anyhow::Result<Option<users::Model>> {
    let user = users::Entity::find()
        .filter(users::Column::Username.eq(username))
        .one(db)
        .await?;

    Ok(user)
}

/// Verify credentials for the user login endpoint. The identifier may
/// be a username or a contact email. Disabled accounts and unknown
/// identifiers fail the same way as a bad password.
pub async fn authenticate(
    db: &DatabaseConnection,
    identifier: &str,
    plain_password: &str,
) -> anyhow::Result<users::Model> {
    let user = users::Entity::find()
        .filter(
            users::Column::Username
                .eq(identifier)
                .or(users::Column::ContactEmail.eq(identifier)),
        )
        .one(db)
        .await?
        .filter(|u| u.enabled)
        .ok_or_else(|| PortalError::Auth("invalid username or password".to_string()))?;

    if !password::verify_password(plain_password, &user.password) {
        return Err(PortalError::Auth("invalid username or password".to_string()).into());
    }

    touch_last_login(db, &user.id).await?;

    Ok(user)
}

async fn touch_last_login(db: &DatabaseConnection, id: &str) -> anyhow::Result<()> {
    let now = chrono::Utc::now().naive_utc();
    users::Entity::update_many()
        .col_expr(users::Column::LastLogin, prelude::Expr::value(now))
        .filter(users::Column::Id.eq(id))
        .exec(db)
        .await?;

    Ok(())
}

pub async fn search_page(
    db: &DatabaseConnection,
    keyword: &str,
    mda_id: &str,
    page_no: u64,
    page_size: u64,
) -> anyhow::Result<Page<UserInfo>> {
    let mut count_select = users::Entity::find();
    let mut query_select = users::Entity::find().order_by_asc(users::Column::Name);

    if !keyword.is_empty() {
        let filter = users::Column::Name
            .contains(keyword)
            .or(users::Column::Username.contains(keyword))
            .or(users::Column::ContactEmail.contains(keyword));
        count_select = count_select.filter(filter.clone());
        query_select = query_select.filter(filter);
    }
    if !mda_id.is_empty() {
        count_select = count_select.filter(users::Column::MdaId.eq(mda_id));
        query_select = query_select.filter(users::Column::MdaId.eq(mda_id));
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
            .map(UserInfo::from)
            .collect();

        return Ok(Page::<UserInfo>::new(
            total_count,
            page_no,
            page_size,
            page_items,
        ));
    }

    Ok(Page::<UserInfo>::default())
}

pub async fn find_all(db: &DatabaseConnection) -> anyhow::Result<Vec<users::Model>> {
    let items = users::Entity::find()
        .order_by_asc(users::Column::Name)
        .all(db)
        .await?;

    Ok(items)
}

pub async fn count_by_mda(db: &DatabaseConnection, mda_id: &str) -> anyhow::Result<u64> {
    let count = users::Entity::find()
        .filter(users::Column::MdaId.eq(mda_id))
        .select_only()
        .column_as(prelude::Expr::col(Asterisk).count(), "count")
        .into_tuple::<i64>()
        .one(db)
        .await?
        .unwrap_or_default() as u64;

    Ok(count)
}

/// Create a user account. Uniqueness is pre-checked for a friendly
/// conflict message; the unique indexes remain authoritative.
pub async fn create(
    db: &DatabaseConnection,
    params: CreateUserParams,
) -> anyhow::Result<users::Model> {
    password::validate_password(&params.password)?;

    if find_by_username(db, &params.username).await?.is_some() {
        return Err(PortalError::Conflict(format!("username {}", params.username)).into());
    }
    let email_taken = users::Entity::find()
        .filter(users::Column::ContactEmail.eq(params.contact_email.as_str()))
        .one(db)
        .await?
        .is_some();
    if email_taken {
        return Err(PortalError::Conflict(format!("email {}", params.contact_email)).into());
    }

    let hashed_password = password::hash_password(&params.password)?;
    let now = chrono::Utc::now().naive_utc();
    let entity = users::ActiveModel {
        id: Set(uuid::Uuid::new_v4().to_string()),
        name: Set(params.name),
        username: Set(params.username),
        contact_email: Set(params.contact_email),
        password: Set(hashed_password),
        mda_id: Set(params.mda_id),
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
    params: UpdateUserParams,
) -> anyhow::Result<users::Model> {
    let existing = find_by_id(db, id).await?;

    if let Some(username) = &params.username
        && username != &existing.username
        && find_by_username(db, username).await?.is_some()
    {
        return Err(PortalError::Conflict(format!("username {}", username)).into());
    }
    if let Some(email) = &params.contact_email
        && email != &existing.contact_email
    {
        let taken = users::Entity::find()
            .filter(users::Column::ContactEmail.eq(email.as_str()))
            .one(db)
            .await?
            .is_some();
        if taken {
            return Err(PortalError::Conflict(format!("email {}", email)).into());
        }
    }

    let mut user: users::ActiveModel = existing.into();
    if let Some(name) = params.name {
        user.name = Set(name);
    }
    if let Some(username) = params.username {
        user.username = Set(username);
    }
    if let Some(email) = params.contact_email {
        user.contact_email = Set(email);
    }
    if let Some(mda_id) = params.mda_id {
        user.mda_id = Set(mda_id);
    }
    if let Some(enabled) = params.enabled {
        user.enabled = Set(enabled);
    }
    user.gmt_modified = Set(chrono::Utc::now().naive_utc());

    let model = user.update(db).await?;

    Ok(model)
}

pub async fn reset_password(
    db: &DatabaseConnection,
    id: &str,
    new_password: &str,
) -> anyhow::Result<()> {
    password::validate_password(new_password)?;

    let existing = find_by_id(db, id).await?;
    let mut user: users::ActiveModel = existing.into();
    user.password = Set(password::hash_password(new_password)?);
    user.gmt_modified = Set(chrono::Utc::now().naive_utc());

    user.update(db).await?;

    Ok(())
}

/// Change a user's own password, verifying the current one first.
pub async fn change_password(
    db: &DatabaseConnection,
    id: &str,
    current_password: &str,
    new_password: &str,
) -> anyhow::Result<()> {
    password::validate_password(new_password)?;

    let existing = find_by_id(db, id).await?;
    if !password::verify_password(current_password, &existing.password) {
        return Err(PortalError::Auth("current password is incorrect".to_string()).into());
    }

    let mut user: users::ActiveModel = existing.into();
    user.password = Set(password::hash_password(new_password)?);
    user.gmt_modified = Set(chrono::Utc::now().naive_utc());

    user.update(db).await?;

    Ok(())
}

pub async fn delete(db: &DatabaseConnection, id: &str) -> anyhow::Result<users::Model> {
    let existing = find_by_id(db, id).await?;
    existing.clone().delete(db).await?;

    Ok(existing)
}
