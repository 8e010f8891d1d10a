use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Admins::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Admins::Id).string_len(36).not_null().primary_key())
                    .col(ColumnDef::new(Admins::Name).string().not_null())
                    .col(ColumnDef::new(Admins::Email).string().not_null())
                    .col(ColumnDef::new(Admins::Password).string().not_null())
                    .col(ColumnDef::new(Admins::Role).string().not_null())
                    .col(
                        ColumnDef::new(Admins::CanBeDeleted)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Admins::CreatedBy).text())
                    .col(ColumnDef::new(Admins::Enabled).boolean().not_null().default(true))
                    .col(ColumnDef::new(Admins::LastLogin).date_time())
                    .col(ColumnDef::new(Admins::GmtCreate).date_time().not_null())
                    .col(ColumnDef::new(Admins::GmtModified).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uk_admins_email")
                    .table(Admins::Table)
                    .col(Admins::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Admins {
    Table,
    Id,
    Name,
    Email,
    Password,
    Role,
    CanBeDeleted,
    CreatedBy,
    Enabled,
    LastLogin,
    GmtCreate,
    GmtModified,
}
