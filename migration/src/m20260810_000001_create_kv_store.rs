use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create kv_store table: generic jsonb persistence for projects,
        // purchases, portfolios, platform stats, registrations and
        // document ownership records.
        manager
            .create_table(
                Table::create()
                    .table(KvStore::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(KvStore::Key)
                            .string_len(255)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(KvStore::Value)
                            .json_binary()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Prefix scans (`key LIKE 'project:%'`) hit this index
        manager
            .create_index(
                Index::create()
                    .name("idx_kv_store_key_prefix")
                    .table(KvStore::Table)
                    .col(KvStore::Key)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(KvStore::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum KvStore {
    Table,
    Key,
    Value,
}
