//! Create request_fifo table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RequestFifo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RequestFifo::Sequence)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RequestFifo::ConnectorId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RequestFifo::Action).string().not_null())
                    .col(ColumnDef::new(RequestFifo::Payload).text().not_null())
                    .col(
                        ColumnDef::new(RequestFifo::EnqueuedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_request_fifo_connector")
                    .table(RequestFifo::Table)
                    .col(RequestFifo::ConnectorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RequestFifo::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum RequestFifo {
    Table,
    Sequence,
    ConnectorId,
    Action,
    Payload,
    EnqueuedAt,
}
