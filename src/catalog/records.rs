use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder,
};
use tracing::debug;

use super::{Catalog, dangling_ref, ensure_film, ensure_location};
use crate::{
    entities::{
        actor, author, document, equipment, institutional_info, production_detail,
        production_team_member, screening,
    },
    error::{AppError, AppResult},
    models::{
        ActorInput, AuthorInput, DocumentInput, EquipmentInput, FilmScoped, InstitutionalInfoInput,
        ProductionDetailInput, ScreeningInput, TeamMemberInput,
    },
};

/// Create/read/update/delete accessors for one film-scoped table.
macro_rules! film_records {
    (
        $label:literal, $entity:ident, $input:ty, $pk:ident / $pk_col:ident,
        add: $add:ident,
        for_film: $for_film:ident,
        get: $get:ident,
        update: $update:ident,
        delete: $delete:ident $(,)?
    ) => {
        impl Catalog {
            pub async fn $add(&self, film_id: i32, input: $input) -> AppResult<$entity::Model> {
                input.validate()?;
                ensure_film(&self.db, film_id).await?;
                ensure_location(&self.db, input.location_ref()).await?;

                let mut am = $entity::ActiveModel { film_id: Set(film_id), ..Default::default() };
                input.write_to(&mut am);
                let model = am.insert(&self.db).await.map_err(dangling_ref($label))?;
                debug!(film_id, id = model.$pk, record = $label, "record added");
                Ok(model)
            }

            pub async fn $for_film(&self, film_id: i32) -> AppResult<Vec<$entity::Model>> {
                Ok($entity::Entity::find()
                    .filter($entity::Column::FilmId.eq(film_id))
                    .order_by_asc($entity::Column::$pk_col)
                    .all(&self.db)
                    .await?)
            }

            pub async fn $get(&self, id: i32) -> AppResult<$entity::Model> {
                $entity::Entity::find_by_id(id)
                    .one(&self.db)
                    .await?
                    .ok_or_else(|| AppError::not_found($label, id))
            }

            pub async fn $update(&self, id: i32, input: $input) -> AppResult<$entity::Model> {
                input.validate()?;
                ensure_location(&self.db, input.location_ref()).await?;

                let mut am = self.$get(id).await?.into_active_model();
                input.write_to(&mut am);
                Ok(am.update(&self.db).await.map_err(dangling_ref($label))?)
            }

            pub async fn $delete(&self, id: i32) -> AppResult<()> {
                let res = $entity::Entity::delete_by_id(id).exec(&self.db).await?;
                if res.rows_affected == 0 {
                    return Err(AppError::not_found($label, id));
                }
                debug!(id, record = $label, "record deleted");
                Ok(())
            }
        }
    };
}

film_records!(
    "production detail", production_detail, ProductionDetailInput,
    production_detail_id / ProductionDetailId,
    add: add_production_detail,
    for_film: production_details_for_film,
    get: get_production_detail,
    update: update_production_detail,
    delete: delete_production_detail,
);

film_records!(
    "author", author, AuthorInput, author_id / AuthorId,
    add: add_author,
    for_film: authors_for_film,
    get: get_author,
    update: update_author,
    delete: delete_author,
);

film_records!(
    "team member", production_team_member, TeamMemberInput, team_member_id / TeamMemberId,
    add: add_team_member,
    for_film: team_for_film,
    get: get_team_member,
    update: update_team_member,
    delete: delete_team_member,
);

film_records!(
    "actor", actor, ActorInput, actor_id / ActorId,
    add: add_actor,
    for_film: actors_for_film,
    get: get_actor,
    update: update_actor,
    delete: delete_actor,
);

film_records!(
    "equipment", equipment, EquipmentInput, equipment_id / EquipmentId,
    add: add_equipment,
    for_film: equipment_for_film,
    get: get_equipment,
    update: update_equipment,
    delete: delete_equipment,
);

film_records!(
    "document", document, DocumentInput, document_id / DocumentId,
    add: add_document,
    for_film: documents_for_film,
    get: get_document,
    update: update_document,
    delete: delete_document,
);

film_records!(
    "institutional info", institutional_info, InstitutionalInfoInput, info_id / InfoId,
    add: add_institutional_info,
    for_film: institutional_info_for_film,
    get: get_institutional_info,
    update: update_institutional_info,
    delete: delete_institutional_info,
);

film_records!(
    "screening", screening, ScreeningInput, screening_id / ScreeningId,
    add: add_screening,
    for_film: screenings_for_film,
    get: get_screening,
    update: update_screening,
    delete: delete_screening,
);

impl Catalog {
    pub async fn screenings_at_location(
        &self,
        location_id: i32,
    ) -> AppResult<Vec<screening::Model>> {
        Ok(screening::Entity::find()
            .filter(screening::Column::LocationId.eq(location_id))
            .order_by_asc(screening::Column::ScreeningDate)
            .order_by_asc(screening::Column::ScreeningId)
            .all(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;

    use super::*;
    use crate::{
        catalog::test_support::catalog,
        models::{FilmInput, LocationInput},
    };

    async fn film(catalog: &Catalog) -> i32 {
        catalog
            .create_film(FilmInput { title: "Borom Sarret".into(), ..Default::default() })
            .await
            .unwrap()
            .film_id
    }

    #[tokio::test]
    async fn same_person_under_two_roles_is_kept() {
        let catalog = catalog().await;
        let film_id = film(&catalog).await;

        for role in ["Screenwriter", "Filmmaker"] {
            catalog
                .add_author(
                    film_id,
                    AuthorInput {
                        role: Some(role.into()),
                        name: "Ousmane Sembène".into(),
                        comment: None,
                    },
                )
                .await
                .unwrap();
        }

        let authors = catalog.authors_for_film(film_id).await.unwrap();
        assert_eq!(authors.len(), 2);
        assert!(authors.iter().all(|a| a.name == "Ousmane Sembène"));
    }

    #[tokio::test]
    async fn add_to_missing_film_is_not_found() {
        let catalog = catalog().await;
        let err = catalog
            .add_actor(7, ActorInput { actor_name: "Ly Abdoulaye".into(), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: "film", id: 7 }));
    }

    #[tokio::test]
    async fn add_with_missing_location_is_not_found() {
        let catalog = catalog().await;
        let film_id = film(&catalog).await;
        let err = catalog
            .add_screening(film_id, ScreeningInput { location_id: Some(99), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: "location", id: 99 }));
    }

    #[tokio::test]
    async fn blank_required_names_are_rejected() {
        let catalog = catalog().await;
        let film_id = film(&catalog).await;

        let err = catalog
            .add_equipment(
                film_id,
                EquipmentInput { equipment_name: "".into(), ..Default::default() },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Invalid { field: "equipment name", .. }));

        let err = catalog
            .add_team_member(film_id, TeamMemberInput { name: " ".into(), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Invalid { field: "team member name", .. }));
    }

    #[tokio::test]
    async fn screening_dates_are_stored_as_iso_dates() {
        let catalog = catalog().await;
        let film_id = film(&catalog).await;

        let row = catalog
            .add_screening(
                film_id,
                ScreeningInput {
                    screening_date: Some(date(1964, 8, 1)),
                    format: Some("35mm".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(row.screening_date.as_deref(), Some("1964-08-01"));
    }

    #[tokio::test]
    async fn update_then_delete_production_detail() {
        let catalog = catalog().await;
        let film_id = film(&catalog).await;
        let loc = catalog
            .create_location(LocationInput { name: Some("Dakar".into()), ..Default::default() })
            .await
            .unwrap();

        let detail = catalog
            .add_production_detail(
                film_id,
                ProductionDetailInput {
                    production_timeframe: Some("1962".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(detail.shooting_location_id, None);

        let detail = catalog
            .update_production_detail(
                detail.production_detail_id,
                ProductionDetailInput {
                    production_timeframe: Some("1962".into()),
                    shooting_location_id: Some(loc.location_id),
                    post_production_studio: Some("Paris".into()),
                    production_comments: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(detail.shooting_location_id, Some(loc.location_id));

        catalog.delete_production_detail(detail.production_detail_id).await.unwrap();
        assert!(matches!(
            catalog.delete_production_detail(detail.production_detail_id).await,
            Err(AppError::NotFound { entity: "production detail", .. })
        ));
        assert!(catalog.production_details_for_film(film_id).await.unwrap().is_empty());
    }
}
