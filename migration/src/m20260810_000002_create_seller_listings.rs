use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SellerListings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SellerListings::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SellerListings::UserId)
                            .string_len(64)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SellerListings::ProjectName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SellerListings::Type)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SellerListings::Location)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SellerListings::PricePerCredit)
                            .decimal_len(20, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SellerListings::Quantity)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SellerListings::Description)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SellerListings::Certification)
                            .string_len(255)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SellerListings::CoBenefits)
                            .json_binary()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SellerListings::Status)
                            .string_len(20)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(SellerListings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Owner-scoped queries and the public active-listings feed
        manager
            .create_index(
                Index::create()
                    .name("idx_seller_listings_user_id")
                    .table(SellerListings::Table)
                    .col(SellerListings::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_seller_listings_status")
                    .table(SellerListings::Table)
                    .col(SellerListings::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SellerListings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SellerListings {
    Table,
    Id,
    UserId,
    ProjectName,
    Type,
    Location,
    PricePerCredit,
    Quantity,
    Description,
    Certification,
    CoBenefits,
    Status,
    CreatedAt,
}
