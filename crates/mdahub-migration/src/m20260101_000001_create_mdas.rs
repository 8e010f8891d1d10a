use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Mdas::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Mdas::Id).string_len(36).not_null().primary_key())
                    .col(ColumnDef::new(Mdas::Name).string().not_null())
                    .col(ColumnDef::new(Mdas::Reports).json().not_null())
                    .col(ColumnDef::new(Mdas::Enabled).boolean().not_null().default(true))
                    .col(ColumnDef::new(Mdas::GmtCreate).date_time().not_null())
                    .col(ColumnDef::new(Mdas::GmtModified).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uk_mdas_name")
                    .table(Mdas::Table)
                    .col(Mdas::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Mdas::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Mdas {
    Table,
    Id,
    Name,
    Reports,
    Enabled,
    GmtCreate,
    GmtModified,
}
