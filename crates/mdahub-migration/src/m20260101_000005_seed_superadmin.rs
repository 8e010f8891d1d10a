use sea_orm_migration::prelude::*;

use crate::m20260101_000003_create_admins::Admins;

/// Environment variables consulted when seeding the first superadmin
const SUPERADMIN_EMAIL_ENV: &str = "MDAHUB_SUPERADMIN_EMAIL";
const SUPERADMIN_PASSWORD_ENV: &str = "MDAHUB_SUPERADMIN_PASSWORD";

const DEFAULT_SUPERADMIN_EMAIL: &str = "superadmin@mdahub.local";
const DEFAULT_SUPERADMIN_PASSWORD: &str = "ChangeMeNow!";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let email = std::env::var(SUPERADMIN_EMAIL_ENV)
            .unwrap_or_else(|_| DEFAULT_SUPERADMIN_EMAIL.to_string());
        let password = std::env::var(SUPERADMIN_PASSWORD_ENV)
            .unwrap_or_else(|_| DEFAULT_SUPERADMIN_PASSWORD.to_string());

        let hashed = bcrypt::hash(&password, 10u32)
            .map_err(|e| DbErr::Custom(format!("failed to hash superadmin password: {}", e)))?;
        let now = chrono::Utc::now().naive_utc();

        // The seeded row is the only superadmin and can never be deleted
        let insert = Query::insert()
            .into_table(Admins::Table)
            .columns([
                Admins::Id,
                Admins::Name,
                Admins::Email,
                Admins::Password,
                Admins::Role,
                Admins::CanBeDeleted,
                Admins::CreatedBy,
                Admins::Enabled,
                Admins::GmtCreate,
                Admins::GmtModified,
            ])
            .values_panic([
                uuid::Uuid::new_v4().to_string().into(),
                "Super Administrator".into(),
                email.into(),
                hashed.into(),
                "superadmin".into(),
                false.into(),
                Option::<String>::None.into(),
                true.into(),
                now.into(),
                now.into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(Admins::Table)
            .and_where(Expr::col(Admins::Role).eq("superadmin"))
            .to_owned();

        manager.exec_stmt(delete).await?;

        Ok(())
    }
}
