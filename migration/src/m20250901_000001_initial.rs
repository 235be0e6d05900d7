use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    Role,
    FirstName,
    LastName,
    Email,
    Phone,
    BirthDate,
    Gender,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Cities {
    Table,
    Id,
    Name,
    Country,
}

#[derive(DeriveIden)]
enum Hotels {
    Table,
    Id,
    Name,
    Stars,
    Address,
    CityId,
}

#[derive(DeriveIden)]
enum Clients {
    Table,
    Id,
    Name,
    Email,
    Phone,
}

#[derive(DeriveIden)]
pub(crate) enum Tours {
    Table,
    Id,
    Name,
    Description,
    PriceCents,
    Duration,
    Image,
    TourType,
    MealType,
    FlightIncluded,
    VisaRequired,
    Rating,
    CityId,
    HotelId,
    ClientId,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Username).string_len(64).not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(16)
                            .not_null()
                            .default("client"),
                    )
                    .col(ColumnDef::new(Users::FirstName).string_len(100).null())
                    .col(ColumnDef::new(Users::LastName).string_len(100).null())
                    .col(ColumnDef::new(Users::Email).string_len(255).null())
                    .col(ColumnDef::new(Users::Phone).string_len(32).null())
                    .col(ColumnDef::new(Users::BirthDate).date().null())
                    .col(ColumnDef::new(Users::Gender).string_len(16).null())
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Users::UpdatedAt)
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
                    .name("idx_users_username")
                    .table(Users::Table)
                    .col(Users::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Cities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cities::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cities::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Cities::Country).string_len(255).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Hotels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Hotels::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Hotels::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Hotels::Stars).integer().not_null())
                    .col(ColumnDef::new(Hotels::Address).string_len(255).null())
                    .col(ColumnDef::new(Hotels::CityId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hotels_city")
                            .from(Hotels::Table, Hotels::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Clients::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clients::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clients::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Clients::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Clients::Phone).string_len(32).null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tours::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tours::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tours::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Tours::Description).text().null())
                    .col(ColumnDef::new(Tours::PriceCents).big_integer().not_null())
                    .col(ColumnDef::new(Tours::Duration).integer().not_null())
                    .col(ColumnDef::new(Tours::Image).string_len(255).null())
                    .col(ColumnDef::new(Tours::TourType).string_len(64).null())
                    .col(ColumnDef::new(Tours::MealType).string_len(64).null())
                    .col(ColumnDef::new(Tours::FlightIncluded).boolean().null())
                    .col(ColumnDef::new(Tours::VisaRequired).boolean().null())
                    .col(ColumnDef::new(Tours::Rating).integer().null())
                    .col(ColumnDef::new(Tours::CityId).integer().not_null())
                    .col(ColumnDef::new(Tours::HotelId).integer().not_null())
                    .col(ColumnDef::new(Tours::ClientId).integer().null())
                    .col(
                        ColumnDef::new(Tours::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tours_city")
                            .from(Tours::Table, Tours::CityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tours_hotel")
                            .from(Tours::Table, Tours::HotelId)
                            .to(Hotels::Table, Hotels::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tours_client")
                            .from(Tours::Table, Tours::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tours_city")
                    .table(Tours::Table)
                    .col(Tours::CityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_tours_hotel")
                    .table(Tours::Table)
                    .col(Tours::HotelId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tours::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Hotels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Cities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
