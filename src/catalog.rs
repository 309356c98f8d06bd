use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::config::CatalogConfig;
use crate::error::CatalogError;

use self::models::{Catalog, CatalogEntry, Course};

pub mod models;

/// Fetch every source and build the catalog
///
/// Sources are fetched concurrently and kept in the configured order. A source
/// that can't be fetched is logged and counts as an empty collection.
pub async fn load(config: &CatalogConfig) -> Catalog {
    let start = Instant::now();
    tracing::info!(sources = config.sources.len(), "fetching catalog");

    let client = match build_client(config) {
        Ok(client) => client,
        Err(err) => {
            tracing::warn!(%err, "can't build HTTP client, catalog left empty");
            return annotate(Vec::new());
        }
    };

    let handles: Vec<_> = config
        .sources
        .iter()
        .cloned()
        .map(|source| {
            let client = client.clone();
            tokio::spawn(async move {
                let courses = fetch(&client, &source).await;
                (source, courses)
            })
        })
        .collect();

    let mut courses = Vec::new();
    for handle in handles {
        match handle.await {
            Ok((_, Ok(mut fetched))) => courses.append(&mut fetched),
            Ok((source, Err(err))) => tracing::warn!(source = %source, %err, "catalog source skipped"),
            Err(err) => tracing::warn!(%err, "catalog task failed"),
        }
    }

    tracing::info!(
        courses = courses.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "catalog fetched"
    );

    annotate(courses)
}

/// Fetch one collection, from the web or from the disk
pub async fn fetch(client: &reqwest::Client, source: &str) -> Result<Vec<Course>, CatalogError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        get_courses(client, source).await
    } else {
        read_courses(Path::new(source)).await
    }
}

fn build_client(config: &CatalogConfig) -> Result<reqwest::Client, reqwest::Error> {
    // Use custom User-Agent
    reqwest::Client::builder()
        .user_agent(config.user_agent())
        .timeout(config.timeout())
        .build()
}

async fn get_courses(client: &reqwest::Client, url: &str) -> Result<Vec<Course>, CatalogError> {
    let http = |source| CatalogError::Http {
        url: url.to_owned(),
        source,
    };

    let body = client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(http)?
        .text()
        .await
        .map_err(http)?;

    from_json(&body, url)
}

async fn read_courses(path: &Path) -> Result<Vec<Course>, CatalogError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    from_json(&content, &path.display().to_string())
}

/// Parse a JSON array of courses, `location` only serves the error message
pub fn from_json(json: &str, location: &str) -> Result<Vec<Course>, CatalogError> {
    serde_json::from_str(json).map_err(|source| CatalogError::Parse {
        location: location.to_owned(),
        source,
    })
}

/// Compute the search fields of every course, once
#[must_use]
pub fn annotate(courses: Vec<Course>) -> Catalog {
    courses
        .into_iter()
        .map(|course| Arc::new(CatalogEntry::new(course)))
        .collect()
}
