use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::debug;

use crate::error::AppResult;

/// Opens the catalog database and brings the schema up to date.
pub async fn connect_and_migrate(database_url: &str) -> AppResult<DatabaseConnection> {
    let in_memory = database_url.contains(":memory:");

    let mut opt = ConnectOptions::new(database_url.to_string());
    opt.sqlx_logging(false);
    if in_memory {
        // Every pooled connection would otherwise see its own empty database.
        opt.max_connections(1).min_connections(1);
    }

    let db = Database::connect(opt).await?;

    db.execute_unprepared("PRAGMA foreign_keys=ON").await?;
    if !in_memory {
        db.execute_unprepared("PRAGMA journal_mode=WAL").await?;
        db.execute_unprepared("PRAGMA synchronous=NORMAL").await?;
    }

    Migrator::up(&db, None).await?;
    debug!(url = %database_url, "database ready");

    Ok(db)
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, Statement};

    use super::*;

    #[tokio::test]
    async fn every_reference_column_is_indexed() {
        let db = connect_and_migrate("sqlite::memory:").await.unwrap();
        let rows = db
            .query_all(Statement::from_string(
                DbBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type = 'index'",
            ))
            .await
            .unwrap();
        let names: Vec<String> =
            rows.iter().map(|row| row.try_get::<String>("", "name").unwrap()).collect();

        for index in [
            "idx_film_production_details_film_id",
            "idx_film_authors_film_id",
            "idx_film_production_team_film_id",
            "idx_film_actors_film_id",
            "idx_film_equipment_film_id",
            "idx_film_documents_film_id",
            "idx_film_institutional_info_film_id",
            "idx_film_screenings_film_id",
            "idx_film_production_details_shooting_location_id",
            "idx_film_institutional_info_funding_location_id",
            "idx_film_screenings_location_id",
        ] {
            assert!(names.iter().any(|n| n == index), "missing {index}");
        }
    }
}
