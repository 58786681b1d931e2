//! Sample product image URLs straight from Postgres.
//!
//! Prisma created the schema, so table and column identifiers are quoted
//! camelCase (`"Product"`, `"imageUrls"`).

use anyhow::{Context, Result, bail};
use sqlx::Row;
use sqlx::postgres::PgPoolOptions;
use std::path::Path;

use crate::check::classify::{self, Tally};
use crate::settings;

const SAMPLE_SQL: &str = r#"
    SELECT id, name, "imageUrls"
    FROM "Product"
    WHERE "imageUrls" IS NOT NULL AND array_length("imageUrls", 1) > 0
    ORDER BY id
    LIMIT $1
"#;

const TOTAL_SQL: &str = r#"SELECT COUNT(*) FROM "Product""#;

const WITH_IMAGES_SQL: &str = r#"
    SELECT COUNT(*)
    FROM "Product"
    WHERE "imageUrls" IS NOT NULL AND array_length("imageUrls", 1) > 0
"#;

/// drivekit check db
#[tokio::main]
pub async fn run(limit: Option<i64>, config: Option<&Path>) -> Result<()> {
    let (cfg, _) = settings::load(config)?;

    let db_url = if !cfg.check.database_url.is_empty() {
        cfg.check.database_url.clone()
    } else {
        std::env::var("DATABASE_URL").unwrap_or_default()
    };
    if db_url.is_empty() {
        bail!("No database URL configured. Set [check] database_url or DATABASE_URL.");
    }
    let limit = limit.unwrap_or(cfg.check.sample_limit);

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&db_url)
        .await
        .context("Failed to connect to Postgres")?;

    let rows = sqlx::query(SAMPLE_SQL)
        .bind(limit)
        .fetch_all(&pool)
        .await
        .context("Product sample query failed")?;

    println!("Image URLs for {} product(s):", rows.len());
    let mut tally = Tally::default();
    for row in &rows {
        let id: i32 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let urls: Vec<String> = row.try_get("imageUrls")?;

        println!("\nProduct {}: {}", id, name);
        for (index, url) in urls.iter().enumerate() {
            let kind = classify::classify(url, &cfg.check.cdn_host, &cfg.check.local_prefix);
            tally.add(kind);
            println!("  {}. {} [{}]", index + 1, url, kind.label());
        }
    }

    let total: i64 = sqlx::query_scalar(TOTAL_SQL).fetch_one(&pool).await?;
    let with_images: i64 = sqlx::query_scalar(WITH_IMAGES_SQL).fetch_one(&pool).await?;

    println!("\nTotals:");
    println!("  CDN images:      {}", tally.cdn);
    println!("  local images:    {}", tally.local);
    if tally.unknown > 0 {
        println!("  unknown URLs:    {}", tally.unknown);
    }
    println!("  products:        {}", total);
    println!("  with images:     {}", with_images);
    Ok(())
}
