use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ActivityLog::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ActivityLog::Id)
                            .big_unsigned()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ActivityLog::AdminId).string_len(36).not_null())
                    .col(ColumnDef::new(ActivityLog::AdminName).string().not_null())
                    .col(ColumnDef::new(ActivityLog::Action).string().not_null())
                    .col(ColumnDef::new(ActivityLog::ResourceType).string().not_null())
                    .col(ColumnDef::new(ActivityLog::ResourceId).text())
                    .col(ColumnDef::new(ActivityLog::ResourceName).text())
                    .col(ColumnDef::new(ActivityLog::Details).text())
                    .col(ColumnDef::new(ActivityLog::SourceIp).text())
                    .col(ColumnDef::new(ActivityLog::UserAgent).text())
                    .col(ColumnDef::new(ActivityLog::GmtCreate).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_log_admin_id")
                    .table(ActivityLog::Table)
                    .col(ActivityLog::AdminId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_log_action")
                    .table(ActivityLog::Table)
                    .col(ActivityLog::Action)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_activity_log_gmt_create")
                    .table(ActivityLog::Table)
                    .col(ActivityLog::GmtCreate)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ActivityLog::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum ActivityLog {
    Table,
    Id,
    AdminId,
    AdminName,
    Action,
    ResourceType,
    ResourceId,
    ResourceName,
    Details,
    SourceIp,
    UserAgent,
    GmtCreate,
}
