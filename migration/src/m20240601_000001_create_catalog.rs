use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Films::Table)
                    .if_not_exists()
                    .col(pk_auto(Films::FilmId))
                    .col(string(Films::Title))
                    .col(integer_null(Films::ReleaseYear))
                    .col(integer_null(Films::Runtime))
                    .col(text_null(Films::Synopsis))
                    .col(string_null(Films::AvAnnotateLink))
                    .col(big_integer(Films::CreatedAt))
                    .col(big_integer(Films::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(pk_auto(Locations::LocationId))
                    .col(string_null(Locations::Name))
                    .col(string_null(Locations::Address))
                    .col(string_null(Locations::City))
                    .col(string_null(Locations::State))
                    .col(string_null(Locations::Country))
                    .col(double_null(Locations::Latitude))
                    .col(double_null(Locations::Longitude))
                    .col(text_null(Locations::Comment))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmProductionDetails::Table)
                    .if_not_exists()
                    .col(pk_auto(FilmProductionDetails::ProductionDetailId))
                    .col(integer(FilmProductionDetails::FilmId))
                    .col(string_null(FilmProductionDetails::ProductionTimeframe))
                    .col(integer_null(FilmProductionDetails::ShootingLocationId))
                    .col(string_null(FilmProductionDetails::PostProductionStudio))
                    .col(text_null(FilmProductionDetails::ProductionComments))
                    .foreign_key(&mut film_fk(
                        "fk_film_production_details_film_id",
                        FilmProductionDetails::Table,
                        FilmProductionDetails::FilmId,
                    ))
                    .foreign_key(&mut location_fk(
                        "fk_film_production_details_shooting_location_id",
                        FilmProductionDetails::Table,
                        FilmProductionDetails::ShootingLocationId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmAuthors::Table)
                    .if_not_exists()
                    .col(pk_auto(FilmAuthors::AuthorId))
                    .col(integer(FilmAuthors::FilmId))
                    .col(string_null(FilmAuthors::Role))
                    .col(string(FilmAuthors::Name))
                    .col(text_null(FilmAuthors::Comment))
                    .foreign_key(&mut film_fk(
                        "fk_film_authors_film_id",
                        FilmAuthors::Table,
                        FilmAuthors::FilmId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmProductionTeam::Table)
                    .if_not_exists()
                    .col(pk_auto(FilmProductionTeam::TeamMemberId))
                    .col(integer(FilmProductionTeam::FilmId))
                    .col(string_null(FilmProductionTeam::Department))
                    .col(string(FilmProductionTeam::Name))
                    .col(string_null(FilmProductionTeam::Role))
                    .col(text_null(FilmProductionTeam::Comment))
                    .foreign_key(&mut film_fk(
                        "fk_film_production_team_film_id",
                        FilmProductionTeam::Table,
                        FilmProductionTeam::FilmId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmActors::Table)
                    .if_not_exists()
                    .col(pk_auto(FilmActors::ActorId))
                    .col(integer(FilmActors::FilmId))
                    .col(string(FilmActors::ActorName))
                    .col(string_null(FilmActors::CharacterName))
                    .col(text_null(FilmActors::Comment))
                    .foreign_key(&mut film_fk(
                        "fk_film_actors_film_id",
                        FilmActors::Table,
                        FilmActors::FilmId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmEquipment::Table)
                    .if_not_exists()
                    .col(pk_auto(FilmEquipment::EquipmentId))
                    .col(integer(FilmEquipment::FilmId))
                    .col(string(FilmEquipment::EquipmentName))
                    .col(text_null(FilmEquipment::Description))
                    .col(text_null(FilmEquipment::Comment))
                    .foreign_key(&mut film_fk(
                        "fk_film_equipment_film_id",
                        FilmEquipment::Table,
                        FilmEquipment::FilmId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmDocuments::Table)
                    .if_not_exists()
                    .col(pk_auto(FilmDocuments::DocumentId))
                    .col(integer(FilmDocuments::FilmId))
                    .col(string_null(FilmDocuments::DocumentType))
                    .col(string_null(FilmDocuments::FileUrl))
                    .col(text_null(FilmDocuments::Comment))
                    .foreign_key(&mut film_fk(
                        "fk_film_documents_film_id",
                        FilmDocuments::Table,
                        FilmDocuments::FilmId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmInstitutionalInfo::Table)
                    .if_not_exists()
                    .col(pk_auto(FilmInstitutionalInfo::InfoId))
                    .col(integer(FilmInstitutionalInfo::FilmId))
                    .col(string_null(FilmInstitutionalInfo::ProductionCompany))
                    .col(string_null(FilmInstitutionalInfo::FundingCompany))
                    .col(text_null(FilmInstitutionalInfo::FundingComment))
                    .col(text_null(FilmInstitutionalInfo::Source))
                    .col(integer_null(FilmInstitutionalInfo::FundingLocationId))
                    .foreign_key(&mut film_fk(
                        "fk_film_institutional_info_film_id",
                        FilmInstitutionalInfo::Table,
                        FilmInstitutionalInfo::FilmId,
                    ))
                    .foreign_key(&mut location_fk(
                        "fk_film_institutional_info_funding_location_id",
                        FilmInstitutionalInfo::Table,
                        FilmInstitutionalInfo::FundingLocationId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FilmScreenings::Table)
                    .if_not_exists()
                    .col(pk_auto(FilmScreenings::ScreeningId))
                    .col(integer(FilmScreenings::FilmId))
                    .col(string_null(FilmScreenings::ScreeningDate))
                    .col(integer_null(FilmScreenings::LocationId))
                    .col(text_null(FilmScreenings::Organizers))
                    .col(string_null(FilmScreenings::Format))
                    .col(text_null(FilmScreenings::Audience))
                    .col(text_null(FilmScreenings::FilmRights))
                    .col(text_null(FilmScreenings::Comment))
                    .col(text_null(FilmScreenings::Source))
                    .foreign_key(&mut film_fk(
                        "fk_film_screenings_film_id",
                        FilmScreenings::Table,
                        FilmScreenings::FilmId,
                    ))
                    .foreign_key(&mut location_fk(
                        "fk_film_screenings_location_id",
                        FilmScreenings::Table,
                        FilmScreenings::LocationId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(film_index(
                "idx_film_production_details_film_id",
                FilmProductionDetails::Table,
                FilmProductionDetails::FilmId,
            ))
            .await?;
        manager
            .create_index(film_index(
                "idx_film_authors_film_id",
                FilmAuthors::Table,
                FilmAuthors::FilmId,
            ))
            .await?;
        manager
            .create_index(film_index(
                "idx_film_production_team_film_id",
                FilmProductionTeam::Table,
                FilmProductionTeam::FilmId,
            ))
            .await?;
        manager
            .create_index(film_index(
                "idx_film_actors_film_id",
                FilmActors::Table,
                FilmActors::FilmId,
            ))
            .await?;
        manager
            .create_index(film_index(
                "idx_film_equipment_film_id",
                FilmEquipment::Table,
                FilmEquipment::FilmId,
            ))
            .await?;
        manager
            .create_index(film_index(
                "idx_film_documents_film_id",
                FilmDocuments::Table,
                FilmDocuments::FilmId,
            ))
            .await?;
        manager
            .create_index(film_index(
                "idx_film_institutional_info_film_id",
                FilmInstitutionalInfo::Table,
                FilmInstitutionalInfo::FilmId,
            ))
            .await?;
        manager
            .create_index(film_index(
                "idx_film_screenings_film_id",
                FilmScreenings::Table,
                FilmScreenings::FilmId,
            ))
            .await?;
        manager
            .create_index(film_index(
                "idx_film_production_details_shooting_location_id",
                FilmProductionDetails::Table,
                FilmProductionDetails::ShootingLocationId,
            ))
            .await?;
        manager
            .create_index(film_index(
                "idx_film_institutional_info_funding_location_id",
                FilmInstitutionalInfo::Table,
                FilmInstitutionalInfo::FundingLocationId,
            ))
            .await?;
        manager
            .create_index(film_index(
                "idx_film_screenings_location_id",
                FilmScreenings::Table,
                FilmScreenings::LocationId,
            ))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(FilmScreenings::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(FilmInstitutionalInfo::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(FilmDocuments::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(FilmEquipment::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(FilmActors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(FilmProductionTeam::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(FilmAuthors::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(FilmProductionDetails::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Locations::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Films::Table).to_owned()).await?;
        Ok(())
    }
}

fn film_index<T, C>(name: &str, table: T, column: C) -> IndexCreateStatement
where
    T: IntoIden + 'static,
    C: IntoIden + 'static,
{
    Index::create().name(name).table(table).col(column).if_not_exists().to_owned()
}

/// Film-scoped rows go away with their film.
fn film_fk<T, C>(name: &str, table: T, column: C) -> ForeignKeyCreateStatement
where
    T: IntoIden + 'static,
    C: IntoIden + 'static,
{
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(Films::Table, Films::FilmId)
        .on_delete(ForeignKeyAction::Cascade)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

/// Location references are cleared, never cascaded.
fn location_fk<T, C>(name: &str, table: T, column: C) -> ForeignKeyCreateStatement
where
    T: IntoIden + 'static,
    C: IntoIden + 'static,
{
    ForeignKey::create()
        .name(name)
        .from(table, column)
        .to(Locations::Table, Locations::LocationId)
        .on_delete(ForeignKeyAction::SetNull)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

#[derive(DeriveIden)]
enum Films {
    Table,
    FilmId,
    Title,
    ReleaseYear,
    Runtime,
    Synopsis,
    AvAnnotateLink,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Locations {
    Table,
    LocationId,
    Name,
    Address,
    City,
    State,
    Country,
    Latitude,
    Longitude,
    Comment,
}

#[derive(DeriveIden)]
enum FilmProductionDetails {
    Table,
    ProductionDetailId,
    FilmId,
    ProductionTimeframe,
    ShootingLocationId,
    PostProductionStudio,
    ProductionComments,
}

#[derive(DeriveIden)]
enum FilmAuthors {
    Table,
    AuthorId,
    FilmId,
    Role,
    Name,
    Comment,
}

#[derive(DeriveIden)]
enum FilmProductionTeam {
    Table,
    TeamMemberId,
    FilmId,
    Department,
    Name,
    Role,
    Comment,
}

#[derive(DeriveIden)]
enum FilmActors {
    Table,
    ActorId,
    FilmId,
    ActorName,
    CharacterName,
    Comment,
}

#[derive(DeriveIden)]
enum FilmEquipment {
    Table,
    EquipmentId,
    FilmId,
    EquipmentName,
    Description,
    Comment,
}

#[derive(DeriveIden)]
enum FilmDocuments {
    Table,
    DocumentId,
    FilmId,
    DocumentType,
    FileUrl,
    Comment,
}

#[derive(DeriveIden)]
enum FilmInstitutionalInfo {
    Table,
    InfoId,
    FilmId,
    ProductionCompany,
    FundingCompany,
    FundingComment,
    Source,
    FundingLocationId,
}

#[derive(DeriveIden)]
enum FilmScreenings {
    Table,
    ScreeningId,
    FilmId,
    ScreeningDate,
    LocationId,
    Organizers,
    Format,
    Audience,
    FilmRights,
    Comment,
    Source,
}
