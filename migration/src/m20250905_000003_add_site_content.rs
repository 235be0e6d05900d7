use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum SiteContents {
    Table,
    Id,
    Slogan,
    Description,
    Advantage1Title,
    Advantage1Text,
    Advantage2Title,
    Advantage2Text,
    Advantage3Title,
    Advantage3Text,
    Advantage4Title,
    Advantage4Text,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Singleton row (id = 1); the application seeds it at startup.
        manager
            .create_table(
                Table::create()
                    .table(SiteContents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SiteContents::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SiteContents::Slogan).string_len(255).not_null())
                    .col(ColumnDef::new(SiteContents::Description).text().not_null())
                    .col(ColumnDef::new(SiteContents::Advantage1Title).string_len(255).not_null())
                    .col(ColumnDef::new(SiteContents::Advantage1Text).text().not_null())
                    .col(ColumnDef::new(SiteContents::Advantage2Title).string_len(255).not_null())
                    .col(ColumnDef::new(SiteContents::Advantage2Text).text().not_null())
                    .col(ColumnDef::new(SiteContents::Advantage3Title).string_len(255).not_null())
                    .col(ColumnDef::new(SiteContents::Advantage3Text).text().not_null())
                    .col(ColumnDef::new(SiteContents::Advantage4Title).string_len(255).not_null())
                    .col(ColumnDef::new(SiteContents::Advantage4Text).text().not_null())
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SiteContents::Table).to_owned())
            .await?;
        Ok(())
    }
}
