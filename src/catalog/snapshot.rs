use std::{collections::HashMap, path::Path};

use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set},
    EntityTrait, IntoActiveModel, QueryOrder, TransactionTrait,
};
use tracing::info;

use super::Catalog;
use crate::{
    entities::{
        actor, author, document, equipment, film, institutional_info, location, production_detail,
        production_team_member, screening, user,
    },
    error::{AppError, AppResult},
    models::CatalogSnapshot,
};

/// Old key to freshly assigned key, per table.
struct KeyMap {
    label: &'static str,
    keys: HashMap<i32, i32>,
}

impl KeyMap {
    fn new(label: &'static str) -> Self {
        Self { label, keys: HashMap::new() }
    }

    fn get(&self, old: i32) -> AppResult<i32> {
        self.keys
            .get(&old)
            .copied()
            .ok_or_else(|| AppError::invalid("snapshot", format!("unknown {} {old}", self.label)))
    }

    fn get_opt(&self, old: Option<i32>) -> AppResult<Option<i32>> {
        old.map(|id| self.get(id)).transpose()
    }
}

impl Catalog {
    /// Reads every row of every table, ordered by key.
    pub async fn export(&self) -> AppResult<CatalogSnapshot> {
        let db = &self.db;
        let (films, locations, production_details, authors, production_team) = futures::try_join!(
            film::Entity::find().order_by_asc(film::Column::FilmId).all(db),
            location::Entity::find().order_by_asc(location::Column::LocationId).all(db),
            production_detail::Entity::find()
                .order_by_asc(production_detail::Column::ProductionDetailId)
                .all(db),
            author::Entity::find().order_by_asc(author::Column::AuthorId).all(db),
            production_team_member::Entity::find()
                .order_by_asc(production_team_member::Column::TeamMemberId)
                .all(db),
        )?;
        let (actors, equipment, documents, institutional_info, screenings, users) =
            futures::try_join!(
                actor::Entity::find().order_by_asc(actor::Column::ActorId).all(db),
                equipment::Entity::find().order_by_asc(equipment::Column::EquipmentId).all(db),
                document::Entity::find().order_by_asc(document::Column::DocumentId).all(db),
                institutional_info::Entity::find()
                    .order_by_asc(institutional_info::Column::InfoId)
                    .all(db),
                screening::Entity::find().order_by_asc(screening::Column::ScreeningId).all(db),
                user::Entity::find().order_by_asc(user::Column::UserId).all(db),
            )?;

        Ok(CatalogSnapshot {
            films,
            locations,
            production_details,
            authors,
            production_team,
            actors,
            equipment,
            documents,
            institutional_info,
            screenings,
            users,
        })
    }

    /// Inserts a snapshot in one transaction. Keys are reassigned by the
    /// database; every film and location reference is remapped to match.
    pub async fn import(&self, snapshot: CatalogSnapshot) -> AppResult<()> {
        let txn = self.db.begin().await?;

        let mut films = KeyMap::new("film");
        for row in snapshot.films {
            let old = row.film_id;
            let mut am = row.into_active_model();
            am.film_id = NotSet;
            films.keys.insert(old, am.insert(&txn).await?.film_id);
        }

        let mut locations = KeyMap::new("location");
        for row in snapshot.locations {
            let old = row.location_id;
            let mut am = row.into_active_model();
            am.location_id = NotSet;
            locations.keys.insert(old, am.insert(&txn).await?.location_id);
        }

        for row in snapshot.production_details {
            let film_id = films.get(row.film_id)?;
            let shooting_location_id = locations.get_opt(row.shooting_location_id)?;
            let mut am = row.into_active_model();
            am.production_detail_id = NotSet;
            am.film_id = Set(film_id);
            am.shooting_location_id = Set(shooting_location_id);
            am.insert(&txn).await?;
        }

        for row in snapshot.authors {
            let film_id = films.get(row.film_id)?;
            let mut am = row.into_active_model();
            am.author_id = NotSet;
            am.film_id = Set(film_id);
            am.insert(&txn).await?;
        }

        for row in snapshot.production_team {
            let film_id = films.get(row.film_id)?;
            let mut am = row.into_active_model();
            am.team_member_id = NotSet;
            am.film_id = Set(film_id);
            am.insert(&txn).await?;
        }

        for row in snapshot.actors {
            let film_id = films.get(row.film_id)?;
            let mut am = row.into_active_model();
            am.actor_id = NotSet;
            am.film_id = Set(film_id);
            am.insert(&txn).await?;
        }

        for row in snapshot.equipment {
            let film_id = films.get(row.film_id)?;
            let mut am = row.into_active_model();
            am.equipment_id = NotSet;
            am.film_id = Set(film_id);
            am.insert(&txn).await?;
        }

        for row in snapshot.documents {
            let film_id = films.get(row.film_id)?;
            let mut am = row.into_active_model();
            am.document_id = NotSet;
            am.film_id = Set(film_id);
            am.insert(&txn).await?;
        }

        for row in snapshot.institutional_info {
            let film_id = films.get(row.film_id)?;
            let funding_location_id = locations.get_opt(row.funding_location_id)?;
            let mut am = row.into_active_model();
            am.info_id = NotSet;
            am.film_id = Set(film_id);
            am.funding_location_id = Set(funding_location_id);
            am.insert(&txn).await?;
        }

        for row in snapshot.screenings {
            let film_id = films.get(row.film_id)?;
            let location_id = locations.get_opt(row.location_id)?;
            let mut am = row.into_active_model();
            am.screening_id = NotSet;
            am.film_id = Set(film_id);
            am.location_id = Set(location_id);
            am.insert(&txn).await?;
        }

        let user_count = snapshot.users.len();
        for row in snapshot.users {
            let username = row.username.clone();
            let mut am = row.into_active_model();
            am.user_id = NotSet;
            am.insert(&txn).await.map_err(|err| {
                let err = AppError::from(err);
                if err.is_unique_violation() { AppError::UsernameTaken(username) } else { err }
            })?;
        }

        txn.commit().await?;
        info!(
            films = films.keys.len(),
            locations = locations.keys.len(),
            users = user_count,
            "snapshot imported"
        );
        Ok(())
    }

    pub async fn export_to_file(&self, path: &Path) -> AppResult<()> {
        let snapshot = self.export().await?;
        let json = serde_json::to_vec_pretty(&snapshot)?;
        tokio::fs::write(path, json).await?;
        info!(path = %path.display(), films = snapshot.films.len(), "snapshot written");
        Ok(())
    }

    pub async fn import_from_file(&self, path: &Path) -> AppResult<()> {
        let bytes = tokio::fs::read(path).await?;
        let snapshot: CatalogSnapshot = serde_json::from_slice(&bytes)?;
        self.import(snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::test_support::catalog, seed};

    /// Drops surrogate keys, replacing references with positions.
    fn normalise(mut s: CatalogSnapshot) -> CatalogSnapshot {
        let film_pos: HashMap<i32, i32> =
            s.films.iter().enumerate().map(|(i, f)| (f.film_id, i as i32)).collect();
        let loc_pos: HashMap<i32, i32> =
            s.locations.iter().enumerate().map(|(i, l)| (l.location_id, i as i32)).collect();
        let loc = |id: Option<i32>| id.map(|id| loc_pos[&id]);

        s.films.iter_mut().for_each(|f| f.film_id = film_pos[&f.film_id]);
        s.locations.iter_mut().for_each(|l| l.location_id = loc_pos[&l.location_id]);
        for d in &mut s.production_details {
            d.production_detail_id = 0;
            d.film_id = film_pos[&d.film_id];
            d.shooting_location_id = loc(d.shooting_location_id);
        }
        for a in &mut s.authors {
            a.author_id = 0;
            a.film_id = film_pos[&a.film_id];
        }
        for t in &mut s.production_team {
            t.team_member_id = 0;
            t.film_id = film_pos[&t.film_id];
        }
        for a in &mut s.actors {
            a.actor_id = 0;
            a.film_id = film_pos[&a.film_id];
        }
        for e in &mut s.equipment {
            e.equipment_id = 0;
            e.film_id = film_pos[&e.film_id];
        }
        for d in &mut s.documents {
            d.document_id = 0;
            d.film_id = film_pos[&d.film_id];
        }
        for i in &mut s.institutional_info {
            i.info_id = 0;
            i.film_id = film_pos[&i.film_id];
            i.funding_location_id = loc(i.funding_location_id);
        }
        for sc in &mut s.screenings {
            sc.screening_id = 0;
            sc.film_id = film_pos[&sc.film_id];
            sc.location_id = loc(sc.location_id);
        }
        s.users.iter_mut().for_each(|u| u.user_id = 0);
        s
    }

    #[tokio::test]
    async fn export_import_round_trip() {
        let source = catalog().await;
        seed::load(&source).await.unwrap();
        source
            .create_user(crate::models::UserInput {
                username: "archivist".into(),
                password: "pw".into(),
                role: Some("admin".into()),
            })
            .await
            .unwrap();

        let exported = source.export().await.unwrap();

        let target = catalog().await;
        // shift keys so the round trip cannot pass by accident
        let spare = target
            .create_location(crate::models::LocationInput::default())
            .await
            .unwrap();
        target.delete_location(spare.location_id).await.unwrap();

        target.import(exported.clone()).await.unwrap();
        let reimported = target.export().await.unwrap();

        assert_eq!(normalise(reimported), normalise(exported));
    }

    #[tokio::test]
    async fn dangling_reference_aborts_import() {
        let source = catalog().await;
        seed::load(&source).await.unwrap();
        let mut snapshot = source.export().await.unwrap();
        snapshot.locations.clear();

        let target = catalog().await;
        let err = target.import(snapshot).await.unwrap_err();
        assert!(matches!(err, AppError::Invalid { field: "snapshot", .. }));
        // nothing from the failed import survives
        assert!(target.list_films().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn snapshot_file_round_trip() {
        let source = catalog().await;
        seed::load(&source).await.unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        source.export_to_file(&path).await.unwrap();

        let target = catalog().await;
        target.import_from_file(&path).await.unwrap();

        let film = target.find_film_by_title("Borom Sarret").await.unwrap().unwrap();
        assert_eq!(target.counts_for_film(film.film_id).await.unwrap().screenings, 6);
    }
}
