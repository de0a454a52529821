//! Migration: Create products table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Products::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Products::Name).string().not_null())
                    .col(ColumnDef::new(Products::Description).text().not_null())
                    .col(ColumnDef::new(Products::Price).decimal_len(16, 2).not_null())
                    .col(ColumnDef::new(Products::PictureUrl).string().not_null())
                    .col(ColumnDef::new(Products::Type).string().not_null())
                    .col(ColumnDef::new(Products::Brand).string().not_null())
                    .col(ColumnDef::new(Products::QuantityInStock).integer().not_null())
                    .to_owned(),
            )
            .await?;

        // Brand and type lists are read with SELECT DISTINCT
        manager
            .create_index(
                Index::create()
                    .name("idx_products_brand")
                    .table(Products::Table)
                    .col(Products::Brand)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_type")
                    .table(Products::Table)
                    .col(Products::Type)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    Description,
    Price,
    PictureUrl,
    Type,
    Brand,
    QuantityInStock,
}
