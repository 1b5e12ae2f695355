use std::path::Path;

use serde_json::Value;

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// File name a fetched basemap is cached under, inside the maps directory
const CACHE_FILE: &str = "basemap.geojson";

/// A ring or polyline of `(lng, lat)` points
pub type LineString = Vec<(f64, f64)>;

/// World geometry drawn under the markers
#[derive(Clone, Debug, Default)]
pub struct Basemap {
    pub land: Vec<LineString>,
    pub coastlines: Vec<LineString>,
}

impl Basemap {
    /// Parse a GeoJSON FeatureCollection. Polygons become land, lines become
    /// coastlines; every other geometry is ignored.
    pub fn from_geojson(json: &str) -> AppResult<Self> {
        let v: Value = serde_json::from_str(json)
            .map_err(|e| AppError::Internal(format!("Invalid basemap: {}", e)))?;
        let features = v["features"]
            .as_array()
            .ok_or_else(|| AppError::Internal("Invalid basemap: no features".to_string()))?;

        let mut basemap = Basemap::default();
        for feature in features {
            let geometry = &feature["geometry"];
            let coordinates = &geometry["coordinates"];
            match geometry["type"].as_str() {
                Some("Polygon") => basemap.land.extend(extract_lines(coordinates)),
                Some("MultiPolygon") => {
                    for polygon in coordinates.as_array().into_iter().flatten() {
                        basemap.land.extend(extract_lines(polygon));
                    }
                }
                Some("LineString") => basemap.coastlines.extend(extract_line(coordinates)),
                Some("MultiLineString") => basemap.coastlines.extend(extract_lines(coordinates)),
                _ => {}
            }
        }

        Ok(basemap)
    }

    /// Load the configured basemap: a local file first, then a URL (cached in
    /// the maps directory), otherwise an empty one.
    pub async fn load(config: &Config) -> AppResult<Self> {
        let json = if let Some(path) = &config.basemap_path {
            tokio::fs::read_to_string(path).await?
        } else if let Some(url) = &config.basemap_url {
            fetch_or_cache(url, &config.maps_dir.join(CACHE_FILE)).await?
        } else {
            return Ok(Basemap::default());
        };

        let basemap = Self::from_geojson(&json)?;
        tracing::info!(
            land = basemap.land.len(),
            coastlines = basemap.coastlines.len(),
            "Basemap loaded"
        );
        Ok(basemap)
    }

    pub fn is_empty(&self) -> bool {
        self.land.is_empty() && self.coastlines.is_empty()
    }
}

fn extract_lines(arr: &Value) -> Vec<LineString> {
    arr.as_array()
        .into_iter()
        .flatten()
        .filter_map(extract_line)
        .collect()
}

fn extract_line(arr: &Value) -> Option<LineString> {
    let points = arr.as_array()?;
    let line: LineString = points
        .iter()
        .filter_map(|p| {
            let a = p.as_array()?;
            Some((a.first()?.as_f64()?, a.get(1)?.as_f64()?))
        })
        .collect();
    if line.len() < 2 { None } else { Some(line) }
}

async fn fetch_or_cache(url: &str, cache: &Path) -> AppResult<String> {
    if tokio::fs::try_exists(cache).await? {
        return Ok(tokio::fs::read_to_string(cache).await?);
    }

    tracing::info!("Fetching basemap from {}", url);
    let data = reqwest::get(url)
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(|e| AppError::Internal(format!("Failed to fetch basemap: {}", e)))?
        .text()
        .await
        .map_err(|e| AppError::Internal(format!("Failed to read basemap: {}", e)))?;

    if let Some(dir) = cache.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(cache, &data).await?;
    Ok(data)
}
