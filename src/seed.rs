//! Fixture data: the catalog record for Ousmane Sembène's "Borom Sarret".
//!
//! Rows go in dependency order (film, locations, film-scoped records,
//! screenings) inside one transaction, so a failure leaves nothing behind.

use jiff::civil::date;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseTransaction, TransactionTrait};
use tracing::info;

use crate::{
    catalog::Catalog,
    entities::{
        actor, author, document, equipment, film, institutional_info, location, production_detail,
        production_team_member, screening,
    },
    error::AppResult,
    models::{
        ActorInput, AuthorInput, DocumentInput, EquipmentInput, FilmInput, InstitutionalInfoInput,
        LocationInput, ProductionDetailInput, ScreeningInput, TeamMemberInput,
    },
};

pub const FILM_TITLE: &str = "Borom Sarret";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedOutcome {
    Loaded { film_id: i32 },
    AlreadyPresent { film_id: i32 },
}

pub async fn load(catalog: &Catalog) -> AppResult<SeedOutcome> {
    if let Some(existing) = catalog.find_film_by_title(FILM_TITLE).await? {
        info!(film_id = existing.film_id, "fixture already loaded");
        return Ok(SeedOutcome::AlreadyPresent { film_id: existing.film_id });
    }

    let txn = catalog.db().begin().await?;
    let film_id = insert_fixture(&txn).await?;
    txn.commit().await?;

    info!(film_id, title = FILM_TITLE, "fixture loaded");
    Ok(SeedOutcome::Loaded { film_id })
}

async fn insert_fixture(txn: &DatabaseTransaction) -> AppResult<i32> {
    let mut am = <film::ActiveModel as Default>::default();
    FilmInput {
        title: FILM_TITLE.into(),
        release_year: Some(1963),
        runtime: Some(20),
        synopsis: Some(
            "A day in the life of a cart driver in Dakar. He carries passengers and goods \
             through the city's poor quarters, takes a fare into the forbidden Plateau \
             district, and loses his cart to a policeman."
                .into(),
        ),
        av_annotate_link: None,
    }
    .write_to(&mut am);
    let film_id = am.insert(txn).await?.film_id;

    let dakar = insert_location(txn, place("Dakar", None, "Senegal", 14.6928, -17.4467)).await?;
    let paris =
        insert_location(txn, place("Paris", Some("Île-de-France"), "France", 48.8566, 2.3522))
            .await?;
    let tours = insert_location(
        txn,
        LocationInput {
            comment: Some("Festival international du court métrage".into()),
            ..place("Tours", Some("Centre-Val de Loire"), "France", 47.3941, 0.6848)
        },
    )
    .await?;
    let karlovy_vary = insert_location(
        txn,
        LocationInput {
            comment: Some("Karlovy Vary International Film Festival".into()),
            ..place("Karlovy Vary", Some("Karlovy Vary Region"), "Czech Republic", 50.2310, 12.8710)
        },
    )
    .await?;
    let carthage = insert_location(
        txn,
        LocationInput {
            comment: Some("Journées cinématographiques de Carthage".into()),
            ..place("Carthage", Some("Tunis"), "Tunisia", 36.8528, 10.3233)
        },
    )
    .await?;

    let mut am = production_detail::ActiveModel { film_id: Set(film_id), ..Default::default() };
    ProductionDetailInput {
        production_timeframe: Some("1962".into()),
        shooting_location_id: Some(dakar),
        post_production_studio: Some("Actualités Françaises, Paris".into()),
        production_comments: Some(
            "Shot on location in Dakar with non-professional actors; sound post-synchronised."
                .into(),
        ),
    }
    .write_to(&mut am);
    am.insert(txn).await?;

    for (role, name, comment) in [
        ("Screenwriter", "Ousmane Sembène", None),
        (
            "Filmmaker",
            "Ousmane Sembène",
            Some("First film after training at the Gorky Studio, Moscow"),
        ),
        (
            "Executive Producer",
            "Paulin Soumanou Vieyra",
            Some("Credited for production supervision"),
        ),
    ] {
        let mut am = author::ActiveModel { film_id: Set(film_id), ..Default::default() };
        AuthorInput { role: Some(role.into()), name: name.into(), comment: comment.map(Into::into) }
            .write_to(&mut am);
        am.insert(txn).await?;
    }

    for (department, name, role) in [
        ("Camera", "Christian Lacoste", "Director of photography"),
        ("Editing", "André Gaudier", "Editor"),
        ("Production", "Paulin Soumanou Vieyra", "Production manager"),
        ("Production", "Ousmane Sembène", "Producer"),
        ("Sound", "Actualités Françaises", "Sound post-synchronisation"),
        ("Music", "Traditional", "Xalam music"),
    ] {
        let mut am =
            production_team_member::ActiveModel { film_id: Set(film_id), ..Default::default() };
        TeamMemberInput {
            department: Some(department.into()),
            name: name.into(),
            role: Some(role.into()),
            comment: None,
        }
        .write_to(&mut am);
        am.insert(txn).await?;
    }

    let mut am = actor::ActiveModel { film_id: Set(film_id), ..Default::default() };
    ActorInput {
        actor_name: "Ly Abdoulaye".into(),
        character_name: Some("The cart driver".into()),
        comment: Some("Non-professional actor".into()),
    }
    .write_to(&mut am);
    am.insert(txn).await?;

    for (name, description) in [
        ("16mm camera", "Portable camera used for the street shooting in Dakar"),
        ("Horse-drawn cart", "The driver's cart, the film's central prop"),
    ] {
        let mut am = equipment::ActiveModel { film_id: Set(film_id), ..Default::default() };
        EquipmentInput {
            equipment_name: name.into(),
            description: Some(description.into()),
            comment: None,
        }
        .write_to(&mut am);
        am.insert(txn).await?;
    }

    let mut am = document::ActiveModel { film_id: Set(film_id), ..Default::default() };
    DocumentInput {
        document_type: Some("Festival programme".into()),
        file_url: Some("documents/borom_sarret/tours_1963_programme.pdf".into()),
        comment: Some("Scanned programme listing the Tours prize".into()),
    }
    .write_to(&mut am);
    am.insert(txn).await?;

    let mut am = institutional_info::ActiveModel { film_id: Set(film_id), ..Default::default() };
    InstitutionalInfoInput {
        production_company: Some("Filmi Domirev".into()),
        funding_company: Some("Actualités Françaises".into()),
        funding_comment: Some("Post-production financed and carried out in Paris".into()),
        source: Some("Vieyra, P. S., Le cinéma africain, 1975".into()),
        funding_location_id: Some(paris),
    }
    .write_to(&mut am);
    am.insert(txn).await?;

    let screenings = [
        (date(1963, 1, 10), dakar, "Private screening for the crew and friends", "16mm"),
        (date(1963, 12, 20), tours, "Festival international du court métrage", "35mm"),
        (date(1964, 8, 1), karlovy_vary, "Karlovy Vary International Film Festival", "35mm"),
        (date(1965, 3, 15), paris, "Cinémathèque française", "35mm"),
        (date(1966, 4, 10), dakar, "Festival mondial des arts nègres", "35mm"),
        (date(1966, 12, 11), carthage, "Journées cinématographiques de Carthage", "35mm"),
    ];
    for (day, location_id, organizers, format) in screenings {
        let mut am = screening::ActiveModel { film_id: Set(film_id), ..Default::default() };
        ScreeningInput {
            screening_date: Some(day),
            location_id: Some(location_id),
            organizers: Some(organizers.into()),
            format: Some(format.into()),
            audience: Some("Festival audience".into()),
            film_rights: Some("Filmi Domirev".into()),
            comment: None,
            source: Some("Festival archives".into()),
        }
        .write_to(&mut am);
        am.insert(txn).await?;
    }

    Ok(film_id)
}

fn place(name: &str, state: Option<&str>, country: &str, lat: f64, lon: f64) -> LocationInput {
    LocationInput {
        name: Some(name.into()),
        address: None,
        city: Some(name.into()),
        state: state.map(Into::into),
        country: Some(country.into()),
        latitude: Some(lat),
        longitude: Some(lon),
        comment: None,
    }
}

async fn insert_location(txn: &DatabaseTransaction, input: LocationInput) -> AppResult<i32> {
    let mut am = <location::ActiveModel as Default>::default();
    input.write_to(&mut am);
    Ok(am.insert(txn).await?.location_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::catalog;

    #[tokio::test]
    async fn fixture_counts() {
        let catalog = catalog().await;
        let SeedOutcome::Loaded { film_id } = load(&catalog).await.unwrap() else {
            panic!("fresh database should load the fixture");
        };

        let film = catalog.find_film_by_title(FILM_TITLE).await.unwrap().unwrap();
        assert_eq!(film.film_id, film_id);

        let counts = catalog.counts_for_film(film_id).await.unwrap();
        assert_eq!(counts.authors, 3);
        assert_eq!(counts.production_team, 6);
        assert_eq!(counts.actors, 1);
        assert_eq!(counts.equipment, 2);
        assert_eq!(counts.documents, 1);
        assert_eq!(counts.institutional_info, 1);
        assert_eq!(counts.screenings, 6);
    }

    #[tokio::test]
    async fn karlovy_vary_screening() {
        let catalog = catalog().await;
        load(&catalog).await.unwrap();

        let kv = catalog.find_location_by_name("Karlovy Vary").await.unwrap().unwrap();
        assert_eq!(kv.country.as_deref(), Some("Czech Republic"));

        let screenings = catalog.screenings_at_location(kv.location_id).await.unwrap();
        assert_eq!(screenings.len(), 1);
        assert_eq!(screenings[0].screening_date.as_deref(), Some("1964-08-01"));
    }

    #[tokio::test]
    async fn screenwriter_and_filmmaker_are_the_same_person() {
        let catalog = catalog().await;
        let SeedOutcome::Loaded { film_id } = load(&catalog).await.unwrap() else {
            panic!("fresh database should load the fixture");
        };

        let authors = catalog.authors_for_film(film_id).await.unwrap();
        let sembene: Vec<_> = authors.iter().filter(|a| a.name == "Ousmane Sembène").collect();
        assert_eq!(sembene.len(), 2);
    }

    #[tokio::test]
    async fn loading_twice_is_a_no_op() {
        let catalog = catalog().await;
        let first = load(&catalog).await.unwrap();
        let second = load(&catalog).await.unwrap();

        let SeedOutcome::Loaded { film_id } = first else {
            panic!("fresh database should load the fixture");
        };
        assert_eq!(second, SeedOutcome::AlreadyPresent { film_id });
        assert_eq!(catalog.list_films().await.unwrap().len(), 1);
        assert_eq!(catalog.list_locations().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn deleting_the_seeded_film_empties_every_table() {
        let catalog = catalog().await;
        let SeedOutcome::Loaded { film_id } = load(&catalog).await.unwrap() else {
            panic!("fresh database should load the fixture");
        };

        let removed = catalog.delete_film(film_id).await.unwrap();
        assert_eq!(removed, 21);
        assert_eq!(catalog.counts_for_film(film_id).await.unwrap(), Default::default());
        // locations are independent of films
        assert_eq!(catalog.list_locations().await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn deleting_dakar_keeps_its_screenings() {
        let catalog = catalog().await;
        let SeedOutcome::Loaded { film_id } = load(&catalog).await.unwrap() else {
            panic!("fresh database should load the fixture");
        };
        let dakar = catalog.find_location_by_name("Dakar").await.unwrap().unwrap();

        // two screenings and the shooting location
        assert_eq!(catalog.delete_location(dakar.location_id).await.unwrap(), 3);

        let screenings = catalog.screenings_for_film(film_id).await.unwrap();
        assert_eq!(screenings.len(), 6);
        assert_eq!(screenings.iter().filter(|s| s.location_id.is_none()).count(), 2);

        let details = catalog.production_details_for_film(film_id).await.unwrap();
        assert_eq!(details[0].shooting_location_id, None);
        assert_eq!(
            details[0].post_production_studio.as_deref(),
            Some("Actualités Françaises, Paris")
        );
    }

    #[tokio::test]
    async fn deleting_paris_clears_the_funding_location() {
        let catalog = catalog().await;
        let SeedOutcome::Loaded { film_id } = load(&catalog).await.unwrap() else {
            panic!("fresh database should load the fixture");
        };
        let paris = catalog.find_location_by_name("Paris").await.unwrap().unwrap();

        // the funding location and the Cinémathèque screening
        assert_eq!(catalog.delete_location(paris.location_id).await.unwrap(), 2);

        let info = catalog.institutional_info_for_film(film_id).await.unwrap();
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].funding_location_id, None);
        assert_eq!(info[0].production_company.as_deref(), Some("Filmi Domirev"));
    }

    #[tokio::test]
    async fn engine_clears_funding_location_on_raw_delete() {
        use sea_orm::ConnectionTrait;

        let catalog = catalog().await;
        let SeedOutcome::Loaded { film_id } = load(&catalog).await.unwrap() else {
            panic!("fresh database should load the fixture");
        };
        let paris = catalog.find_location_by_name("Paris").await.unwrap().unwrap();

        catalog
            .db()
            .execute_unprepared(&format!(
                "DELETE FROM locations WHERE location_id = {}",
                paris.location_id
            ))
            .await
            .unwrap();

        let info = catalog.institutional_info_for_film(film_id).await.unwrap();
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].funding_location_id, None);
        assert_eq!(catalog.counts_for_film(film_id).await.unwrap().institutional_info, 1);
    }
}
