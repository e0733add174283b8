use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseTransaction, EntityTrait, IntoActiveModel,
    TransactionTrait,
};
use tracing::info;

use super::{Catalog, dangling_ref, delete_dependents, ensure_location};
use crate::{
    entities::{
        actor, author, document, equipment, film, institutional_info, production_detail,
        production_team_member, screening,
    },
    error::{AppError, AppResult},
    models::{FilmRecordInput, FilmScoped},
};

/// Inserts each input as a row of `$entity` under `$film_id`.
macro_rules! insert_rows {
    ($txn:expr, $film_id:expr, $rows:expr, $entity:ident) => {
        for input in $rows {
            ensure_location($txn, input.location_ref()).await?;
            let mut am = $entity::ActiveModel { film_id: Set($film_id), ..Default::default() };
            input.write_to(&mut am);
            am.insert($txn).await.map_err(dangling_ref(stringify!($entity)))?;
        }
    };
}

impl Catalog {
    /// Creates a film and all of its dependent rows in one transaction.
    /// Nothing is written unless every row is.
    pub async fn save_film_record(&self, record: FilmRecordInput) -> AppResult<film::Model> {
        record.validate()?;
        let txn = self.db.begin().await?;

        let mut am = <film::ActiveModel as Default>::default();
        record.film.clone().write_to(&mut am);
        let film = am.insert(&txn).await?;

        let rows = insert_dependents(&txn, film.film_id, record).await?;
        txn.commit().await?;

        info!(film_id = film.film_id, title = %film.title, rows, "film record saved");
        Ok(film)
    }

    /// Overwrites a film's fields and swaps its dependent rows for the given
    /// ones. On failure the previous record is left untouched.
    pub async fn replace_film_record(
        &self,
        film_id: i32,
        record: FilmRecordInput,
    ) -> AppResult<film::Model> {
        record.validate()?;
        let txn = self.db.begin().await?;

        let existing = film::Entity::find_by_id(film_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::not_found("film", film_id))?;
        let mut am = existing.into_active_model();
        record.film.clone().write_to(&mut am);
        let film = am.update(&txn).await?;

        let removed = delete_dependents(&txn, film_id).await?;
        let rows = insert_dependents(&txn, film_id, record).await?;
        txn.commit().await?;

        info!(film_id, removed, rows, "film record replaced");
        Ok(film)
    }
}

async fn insert_dependents(
    txn: &DatabaseTransaction,
    film_id: i32,
    record: FilmRecordInput,
) -> AppResult<usize> {
    let rows = record.production_details.len()
        + record.authors.len()
        + record.production_team.len()
        + record.actors.len()
        + record.equipment.len()
        + record.documents.len()
        + record.institutional_info.len()
        + record.screenings.len();

    insert_rows!(txn, film_id, record.production_details, production_detail);
    insert_rows!(txn, film_id, record.authors, author);
    insert_rows!(txn, film_id, record.production_team, production_team_member);
    insert_rows!(txn, film_id, record.actors, actor);
    insert_rows!(txn, film_id, record.equipment, equipment);
    insert_rows!(txn, film_id, record.documents, document);
    insert_rows!(txn, film_id, record.institutional_info, institutional_info);
    insert_rows!(txn, film_id, record.screenings, screening);

    Ok(rows)
}
