use std::path::PathBuf;

use clap::{Parser, Subcommand};
use filmcatalog::{Catalog, config::Config, db, models::{FilmRecordInput, UserInput}, seed};

#[derive(Parser)]
#[command(name = "filmcatalog", about = "Archival film research catalog", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create or upgrade the schema
    Migrate,
    /// Load the Borom Sarret fixture
    Seed,
    /// List films
    Films,
    /// Print everything recorded about one film as JSON
    Show { film_id: i32 },
    /// Save a film with all of its records from a JSON file; with --film-id,
    /// replace that film's record instead
    SaveFilm {
        path: PathBuf,
        #[arg(long)]
        film_id: Option<i32>,
    },
    /// Delete a film and every record scoped to it
    DeleteFilm { film_id: i32 },
    /// Delete a location, clearing references to it
    DeleteLocation { location_id: i32 },
    /// Write the whole catalog to a JSON file
    Export { path: PathBuf },
    /// Load a JSON export into this database
    Import { path: PathBuf },
    /// Add a user
    AddUser {
        username: String,
        #[arg(long, env = "FILMCATALOG_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        role: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt().with_env_filter(config.log_filter.as_str()).init();

    let cli = Cli::parse();
    let catalog = Catalog::new(db::connect_and_migrate(&config.database_url).await?);

    match cli.command {
        Command::Migrate => {
            tracing::info!(url = %config.database_url, "schema up to date");
        },
        Command::Seed => {
            let outcome = seed::load(&catalog).await?;
            println!("{outcome:?}");
        },
        Command::Films => {
            for film in catalog.list_films().await? {
                let year = film.release_year.map(|y| y.to_string()).unwrap_or_default();
                println!("{:>5}  {:<40} {}", film.film_id, film.title, year);
            }
        },
        Command::Show { film_id } => {
            let dossier = catalog.film_dossier(film_id).await?;
            let today = jiff::Zoned::now().date();
            println!("{}", serde_json::to_string_pretty(&dossier)?);
            println!("{}", dossier.citation(today));
        },
        Command::SaveFilm { path, film_id } => {
            let bytes = tokio::fs::read(&path).await?;
            let record: FilmRecordInput = serde_json::from_slice(&bytes)?;
            let film = match film_id {
                Some(film_id) => catalog.replace_film_record(film_id, record).await?,
                None => catalog.save_film_record(record).await?,
            };
            println!("saved film {} ({})", film.film_id, film.title);
        },
        Command::DeleteFilm { film_id } => {
            let removed = catalog.delete_film(film_id).await?;
            println!("deleted film {film_id} and {removed} dependent rows");
        },
        Command::DeleteLocation { location_id } => {
            let cleared = catalog.delete_location(location_id).await?;
            println!("deleted location {location_id}, cleared {cleared} references");
        },
        Command::Export { path } => {
            catalog.export_to_file(&path).await?;
        },
        Command::Import { path } => {
            catalog.import_from_file(&path).await?;
        },
        Command::AddUser { username, password, role } => {
            let user = catalog.create_user(UserInput { username, password, role }).await?;
            println!("created user {} ({}) with role {}", user.user_id, user.username, user.role);
        },
    }

    Ok(())
}
