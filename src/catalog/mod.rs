mod dossier;
mod film_record;
mod records;
mod snapshot;
mod users;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
    sea_query::{Expr, SimpleExpr},
};
use tracing::{debug, info};

use crate::{
    entities::{
        actor, author, document, equipment, film, institutional_info, location, production_detail,
        production_team_member, screening,
    },
    error::{AppError, AppResult},
    models::{FilmCounts, FilmInput, LocationInput},
};

/// Data-access layer over the catalog tables.
#[derive(Clone)]
pub struct Catalog {
    db: DatabaseConnection,
}

impl Catalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn create_film(&self, input: FilmInput) -> AppResult<film::Model> {
        input.validate()?;
        let mut am = <film::ActiveModel as Default>::default();
        input.write_to(&mut am);
        let film = am.insert(&self.db).await?;
        debug!(film_id = film.film_id, title = %film.title, "film created");
        Ok(film)
    }

    pub async fn get_film(&self, film_id: i32) -> AppResult<film::Model> {
        film::Entity::find_by_id(film_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("film", film_id))
    }

    pub async fn find_film_by_title(&self, title: &str) -> AppResult<Option<film::Model>> {
        Ok(film::Entity::find()
            .filter(film::Column::Title.eq(title))
            .order_by_asc(film::Column::FilmId)
            .one(&self.db)
            .await?)
    }

    pub async fn list_films(&self) -> AppResult<Vec<film::Model>> {
        Ok(film::Entity::find().order_by_asc(film::Column::FilmId).all(&self.db).await?)
    }

    pub async fn update_film(&self, film_id: i32, input: FilmInput) -> AppResult<film::Model> {
        input.validate()?;
        let mut am = self.get_film(film_id).await?.into_active_model();
        input.write_to(&mut am);
        Ok(am.update(&self.db).await?)
    }

    /// Deletes a film and every row scoped to it. Returns how many dependent
    /// rows went with it.
    pub async fn delete_film(&self, film_id: i32) -> AppResult<u64> {
        let txn = self.db.begin().await?;

        ensure_film(&txn, film_id).await?;

        let removed = delete_dependents(&txn, film_id).await?;

        film::Entity::delete_by_id(film_id).exec(&txn).await?;
        txn.commit().await?;

        info!(film_id, dependents = removed, "film deleted");
        Ok(removed)
    }

    pub async fn create_location(&self, input: LocationInput) -> AppResult<location::Model> {
        input.validate()?;
        let mut am = <location::ActiveModel as Default>::default();
        input.write_to(&mut am);
        let location = am.insert(&self.db).await?;
        debug!(location_id = location.location_id, name = ?location.name, "location created");
        Ok(location)
    }

    pub async fn get_location(&self, location_id: i32) -> AppResult<location::Model> {
        location::Entity::find_by_id(location_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("location", location_id))
    }

    pub async fn find_location_by_name(&self, name: &str) -> AppResult<Option<location::Model>> {
        Ok(location::Entity::find()
            .filter(location::Column::Name.eq(name))
            .order_by_asc(location::Column::LocationId)
            .one(&self.db)
            .await?)
    }

    pub async fn list_locations(&self) -> AppResult<Vec<location::Model>> {
        Ok(location::Entity::find().order_by_asc(location::Column::LocationId).all(&self.db).await?)
    }

    pub async fn update_location(
        &self,
        location_id: i32,
        input: LocationInput,
    ) -> AppResult<location::Model> {
        input.validate()?;
        let mut am = self.get_location(location_id).await?.into_active_model();
        input.write_to(&mut am);
        Ok(am.update(&self.db).await?)
    }

    /// Deletes a location, clearing every reference to it. Referencing rows
    /// survive. Returns how many references were cleared.
    pub async fn delete_location(&self, location_id: i32) -> AppResult<u64> {
        let txn = self.db.begin().await?;

        ensure_location(&txn, Some(location_id)).await?;

        let mut cleared = 0;
        cleared += production_detail::Entity::update_many()
            .col_expr(production_detail::Column::ShootingLocationId, null_ref())
            .filter(production_detail::Column::ShootingLocationId.eq(location_id))
            .exec(&txn)
            .await?
            .rows_affected;
        cleared += institutional_info::Entity::update_many()
            .col_expr(institutional_info::Column::FundingLocationId, null_ref())
            .filter(institutional_info::Column::FundingLocationId.eq(location_id))
            .exec(&txn)
            .await?
            .rows_affected;
        cleared += screening::Entity::update_many()
            .col_expr(screening::Column::LocationId, null_ref())
            .filter(screening::Column::LocationId.eq(location_id))
            .exec(&txn)
            .await?
            .rows_affected;

        location::Entity::delete_by_id(location_id).exec(&txn).await?;
        txn.commit().await?;

        info!(location_id, references = cleared, "location deleted");
        Ok(cleared)
    }

    pub async fn counts_for_film(&self, film_id: i32) -> AppResult<FilmCounts> {
        Ok(FilmCounts {
            production_details: production_detail::Entity::find()
                .filter(production_detail::Column::FilmId.eq(film_id))
                .count(&self.db)
                .await?,
            authors: author::Entity::find()
                .filter(author::Column::FilmId.eq(film_id))
                .count(&self.db)
                .await?,
            production_team: production_team_member::Entity::find()
                .filter(production_team_member::Column::FilmId.eq(film_id))
                .count(&self.db)
                .await?,
            actors: actor::Entity::find()
                .filter(actor::Column::FilmId.eq(film_id))
                .count(&self.db)
                .await?,
            equipment: equipment::Entity::find()
                .filter(equipment::Column::FilmId.eq(film_id))
                .count(&self.db)
                .await?,
            documents: document::Entity::find()
                .filter(document::Column::FilmId.eq(film_id))
                .count(&self.db)
                .await?,
            institutional_info: institutional_info::Entity::find()
                .filter(institutional_info::Column::FilmId.eq(film_id))
                .count(&self.db)
                .await?,
            screenings: screening::Entity::find()
                .filter(screening::Column::FilmId.eq(film_id))
                .count(&self.db)
                .await?,
        })
    }
}

/// Maps a foreign-key rejection on a `label` row to a validation error. Hit
/// when the film or location vanished after the existence check.
fn dangling_ref(label: &'static str) -> impl FnOnce(DbErr) -> AppError {
    move |err| {
        let err = AppError::from(err);
        if err.is_foreign_key_violation() {
            AppError::invalid(label, "references a missing film or location")
        } else {
            err
        }
    }
}

fn null_ref() -> SimpleExpr {
    Expr::value(Option::<i32>::None)
}

/// Removes every film-scoped row of `film_id`, leaving the film itself.
async fn delete_dependents<C: ConnectionTrait>(conn: &C, film_id: i32) -> AppResult<u64> {
    let mut removed = 0;
    removed += production_detail::Entity::delete_many()
        .filter(production_detail::Column::FilmId.eq(film_id))
        .exec(conn)
        .await?
        .rows_affected;
    removed += author::Entity::delete_many()
        .filter(author::Column::FilmId.eq(film_id))
        .exec(conn)
        .await?
        .rows_affected;
    removed += production_team_member::Entity::delete_many()
        .filter(production_team_member::Column::FilmId.eq(film_id))
        .exec(conn)
        .await?
        .rows_affected;
    removed += actor::Entity::delete_many()
        .filter(actor::Column::FilmId.eq(film_id))
        .exec(conn)
        .await?
        .rows_affected;
    removed += equipment::Entity::delete_many()
        .filter(equipment::Column::FilmId.eq(film_id))
        .exec(conn)
        .await?
        .rows_affected;
    removed += document::Entity::delete_many()
        .filter(document::Column::FilmId.eq(film_id))
        .exec(conn)
        .await?
        .rows_affected;
    removed += institutional_info::Entity::delete_many()
        .filter(institutional_info::Column::FilmId.eq(film_id))
        .exec(conn)
        .await?
        .rows_affected;
    removed += screening::Entity::delete_many()
        .filter(screening::Column::FilmId.eq(film_id))
        .exec(conn)
        .await?
        .rows_affected;
    Ok(removed)
}

async fn ensure_film<C: ConnectionTrait>(conn: &C, film_id: i32) -> AppResult<()> {
    match film::Entity::find_by_id(film_id).one(conn).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found("film", film_id)),
    }
}

async fn ensure_location<C: ConnectionTrait>(conn: &C, location_id: Option<i32>) -> AppResult<()> {
    let Some(location_id) = location_id else {
        return Ok(());
    };
    match location::Entity::find_by_id(location_id).one(conn).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found("location", location_id)),
    }
}


#[cfg(test)]
mod tests {
    use sea_orm::{ConnectionTrait, EntityTrait};

    use super::{test_support::catalog, *};
    use crate::models::{AuthorInput, ScreeningInput};

    fn borom() -> FilmInput {
        FilmInput { title: "Borom Sarret".into(), release_year: Some(1963), ..Default::default() }
    }

    fn dakar() -> LocationInput {
        LocationInput {
            name: Some("Dakar".into()),
            country: Some("Senegal".into()),
            ..Default::default()
        }
    }

    fn sembene() -> AuthorInput {
        AuthorInput { name: "Ousmane Sembène".into(), ..Default::default() }
    }

    #[tokio::test]
    async fn delete_film_removes_all_dependents() {
        let catalog = catalog().await;
        let film = catalog.create_film(borom()).await.unwrap();
        let other = catalog
            .create_film(FilmInput { title: "La Noire de...".into(), ..Default::default() })
            .await
            .unwrap();
        let loc = catalog.create_location(dakar()).await.unwrap();

        catalog
            .add_author(film.film_id, sembene())
            .await
            .unwrap();
        catalog
            .add_screening(
                film.film_id,
                ScreeningInput { location_id: Some(loc.location_id), ..Default::default() },
            )
            .await
            .unwrap();
        catalog
            .add_author(other.film_id, sembene())
            .await
            .unwrap();

        let removed = catalog.delete_film(film.film_id).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(catalog.counts_for_film(film.film_id).await.unwrap().total(), 0);
        assert_eq!(catalog.counts_for_film(other.film_id).await.unwrap().authors, 1);
        // the location outlives the film
        assert!(catalog.get_location(loc.location_id).await.is_ok());
    }

    #[tokio::test]
    async fn engine_cascades_raw_film_delete() {
        let catalog = catalog().await;
        let film = catalog.create_film(borom()).await.unwrap();
        catalog
            .add_author(film.film_id, sembene())
            .await
            .unwrap();

        catalog
            .db()
            .execute_unprepared(&format!("DELETE FROM films WHERE film_id = {}", film.film_id))
            .await
            .unwrap();

        assert_eq!(catalog.counts_for_film(film.film_id).await.unwrap().total(), 0);
    }

    #[tokio::test]
    async fn delete_location_clears_references() {
        let catalog = catalog().await;
        let film = catalog.create_film(borom()).await.unwrap();
        let loc = catalog.create_location(dakar()).await.unwrap();

        let screening = catalog
            .add_screening(
                film.film_id,
                ScreeningInput { location_id: Some(loc.location_id), ..Default::default() },
            )
            .await
            .unwrap();

        let cleared = catalog.delete_location(loc.location_id).await.unwrap();
        assert_eq!(cleared, 1);

        let screening = catalog.get_screening(screening.screening_id).await.unwrap();
        assert_eq!(screening.location_id, None);
        assert!(matches!(
            catalog.get_location(loc.location_id).await,
            Err(AppError::NotFound { entity: "location", .. })
        ));
    }

    #[tokio::test]
    async fn engine_sets_null_on_raw_location_delete() {
        let catalog = catalog().await;
        let film = catalog.create_film(borom()).await.unwrap();
        let loc = catalog.create_location(dakar()).await.unwrap();
        let screening = catalog
            .add_screening(
                film.film_id,
                ScreeningInput { location_id: Some(loc.location_id), ..Default::default() },
            )
            .await
            .unwrap();

        catalog
            .db()
            .execute_unprepared(&format!(
                "DELETE FROM locations WHERE location_id = {}",
                loc.location_id
            ))
            .await
            .unwrap();

        let row = screening::Entity::find_by_id(screening.screening_id)
            .one(catalog.db())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.location_id, None);
    }

    #[tokio::test]
    async fn engine_rejects_orphan_rows() {
        use sea_orm::{ActiveModelTrait, ActiveValue::Set};

        let catalog = catalog().await;
        let orphan = author::ActiveModel {
            film_id: Set(404),
            name: Set("Nobody".into()),
            ..Default::default()
        };
        let err = orphan.clone().insert(catalog.db()).await.unwrap_err();
        assert!(AppError::from(err).is_foreign_key_violation());

        let err = orphan.insert(catalog.db()).await.unwrap_err();
        assert!(matches!(dangling_ref("author")(err), AppError::Invalid { field: "author", .. }));
    }

    #[tokio::test]
    async fn delete_missing_film_is_not_found() {
        let catalog = catalog().await;
        assert!(matches!(
            catalog.delete_film(42).await,
            Err(AppError::NotFound { entity: "film", id: 42 })
        ));
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let catalog = catalog().await;
        let err = catalog
            .create_film(FilmInput { title: "  ".into(), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Invalid { field: "title", .. }));
    }

    #[tokio::test]
    async fn update_film_keeps_created_at() {
        let catalog = catalog().await;
        let film = catalog.create_film(borom()).await.unwrap();
        let updated = catalog
            .update_film(film.film_id, FilmInput { runtime: Some(20), ..borom() })
            .await
            .unwrap();
        assert_eq!(updated.runtime, Some(20));
        assert_eq!(updated.created_at, film.created_at);
        assert!(updated.updated_at >= film.updated_at);
    }
}
