use std::collections::HashMap;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use super::Catalog;
use crate::{
    entities::location,
    error::AppResult,
    models::{FilmDossier, ScreeningDetail, parse_screening_date},
};

impl Catalog {
    /// Loads a film together with every record scoped to it, with location
    /// references resolved.
    pub async fn film_dossier(&self, film_id: i32) -> AppResult<FilmDossier> {
        let film = self.get_film(film_id).await?;

        let (
            production_details,
            authors,
            production_team,
            actors,
            equipment,
            documents,
            institutional_info,
            screenings,
        ) = futures::try_join!(
            self.production_details_for_film(film_id),
            self.authors_for_film(film_id),
            self.team_for_film(film_id),
            self.actors_for_film(film_id),
            self.equipment_for_film(film_id),
            self.documents_for_film(film_id),
            self.institutional_info_for_film(film_id),
            self.screenings_for_film(film_id),
        )?;

        let mut wanted: Vec<i32> = production_details
            .iter()
            .filter_map(|d| d.shooting_location_id)
            .chain(institutional_info.iter().filter_map(|i| i.funding_location_id))
            .chain(screenings.iter().filter_map(|s| s.location_id))
            .collect();
        wanted.sort_unstable();
        wanted.dedup();

        let locations: HashMap<i32, location::Model> = if wanted.is_empty() {
            HashMap::new()
        } else {
            location::Entity::find()
                .filter(location::Column::LocationId.is_in(wanted))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|l| (l.location_id, l))
                .collect()
        };
        let resolve = |id: Option<i32>| id.and_then(|id| locations.get(&id).cloned());

        Ok(FilmDossier {
            film,
            production_details: production_details
                .into_iter()
                .map(|d| {
                    let loc = resolve(d.shooting_location_id);
                    (d, loc)
                })
                .collect(),
            authors,
            production_team,
            actors,
            equipment,
            documents,
            institutional_info: institutional_info
                .into_iter()
                .map(|i| {
                    let loc = resolve(i.funding_location_id);
                    (i, loc)
                })
                .collect(),
            screenings: screenings
                .into_iter()
                .map(|s| {
                    Ok(ScreeningDetail {
                        date: parse_screening_date(s.screening_date.as_deref())?,
                        location: resolve(s.location_id),
                        screening: s,
                    })
                })
                .collect::<AppResult<_>>()?,
        })
    }
}
