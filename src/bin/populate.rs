//! Seed a user's item listings from a JSON file, replacing whatever that
//! user currently has. Intended for local development and demos.

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Deserialize;
use uuid::Uuid;

use lostfound_api::config;
use lostfound_api::database;
use lostfound_api::database::models::item::ItemLocation;

#[derive(Parser)]
#[command(name = "populate", about = "Seed mock items for a user")]
struct Args {
    /// JSON file with the items to insert
    #[arg(long, default_value = "data/mock_items.json")]
    file: std::path::PathBuf,

    /// Username the seeded items will belong to
    #[arg(long)]
    username: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MockItem {
    name: String,
    description: String,
    category: String,
    last_seen_location: Option<String>,
    found_location: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let config = config::config();
    let pool = database::connect_pool(&config.database)
        .await
        .context("failed to connect to database")?;
    database::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let user_id: Uuid = sqlx::query_scalar("SELECT id FROM \"users\" WHERE username = $1")
        .bind(&args.username)
        .fetch_optional(&pool)
        .await?
        .with_context(|| format!("user '{}' not found", args.username))?;

    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let mock_items: Vec<MockItem> = serde_json::from_str(&raw).context("invalid items file")?;

    sqlx::query("DELETE FROM \"items\" WHERE created_by = $1")
        .bind(user_id)
        .execute(&pool)
        .await?;

    let mut inserted = 0usize;
    for item in mock_items {
        let location = match ItemLocation::from_columns(
            &item.category,
            item.last_seen_location,
            item.found_location,
        ) {
            Ok(location) => location,
            Err(e) => bail!("bad item '{}': {}", item.name, e),
        };
        let (last_seen_location, found_location) = location.columns();

        sqlx::query(
            "INSERT INTO \"items\" (id, name, description, category, last_seen_location, found_location, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(Uuid::new_v4())
        .bind(&item.name)
        .bind(&item.description)
        .bind(location.category().as_str())
        .bind(last_seen_location)
        .bind(found_location)
        .bind(user_id)
        .execute(&pool)
        .await?;
        inserted += 1;
    }

    println!("Inserted {} items for {}", inserted, args.username);
    Ok(())
}
