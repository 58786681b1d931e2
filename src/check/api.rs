//! Classify product image URLs through the shop's own REST API.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;

use crate::check::classify::{self, Tally, UrlKind};
use crate::settings;

#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(rename = "imageUrls", default)]
    pub image_urls: Vec<String>,
}

/// A product still carrying a CDN-hosted image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdnHit {
    pub id: i64,
    pub name: String,
    pub url: String,
}

/// Count URL kinds across all products and collect the CDN stragglers.
pub fn summarize(products: &[Product], cdn_host: &str, local_prefix: &str) -> (Tally, Vec<CdnHit>) {
    let mut tally = Tally::default();
    let mut hits = Vec::new();
    for product in products {
        for url in &product.image_urls {
            let kind = classify::classify(url, cdn_host, local_prefix);
            tally.add(kind);
            if kind == UrlKind::Cdn {
                hits.push(CdnHit {
                    id: product.id,
                    name: product.name.clone(),
                    url: url.clone(),
                });
            }
        }
    }
    (tally, hits)
}

/// drivekit check api
pub fn run(config: Option<&Path>) -> Result<()> {
    let (cfg, _) = settings::load(config)?;
    let url = format!(
        "{}/api/products?admin=true",
        cfg.check.api_base.trim_end_matches('/')
    );

    let products: Vec<Product> = match ureq::get(&url).call() {
        Ok(response) => response
            .into_json()
            .context("Unreadable product list from the API")?,
        Err(ureq::Error::Status(code, response)) => {
            let body = response.into_string().unwrap_or_default();
            bail!("API request failed: HTTP {code}: {}", body.trim());
        }
        Err(e) => return Err(e).with_context(|| format!("Request to {} failed", url)),
    };

    let (tally, hits) = summarize(&products, &cfg.check.cdn_host, &cfg.check.local_prefix);

    println!("Checked {} product(s) via {}", products.len(), url);
    println!("  CDN URLs:     {}", tally.cdn);
    println!("  local paths:  {}", tally.local);
    if tally.unknown > 0 {
        println!("  unknown URLs: {}", tally.unknown);
    }

    let cdn_products: std::collections::BTreeSet<i64> = hits.iter().map(|h| h.id).collect();
    println!("  products with CDN images: {}", cdn_products.len());

    if !hits.is_empty() {
        println!("\nProducts still on the CDN:");
        for hit in &hits {
            println!("  {} {}", hit.id, hit.name);
            println!("    {}", hit.url);
        }
    }
    Ok(())
}
