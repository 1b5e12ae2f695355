pub mod basemap;
pub mod color;
pub mod svg;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use resvg::{tiny_skia, usvg};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::store::get_coordinates;

pub use basemap::Basemap;
pub use color::{InvalidColor, MarkerColor};
use self::svg::{MapScene, Marker};

/// A rendered two-city map and the great-circle distance between them
#[derive(Clone, Debug)]
pub struct DistanceMap {
    pub path: PathBuf,
    pub distance_km: f64,
    /// The encoded image, identical to what was written to `path`
    pub png: Vec<u8>,
}

/// Renders city maps to PNG files
pub struct MapRenderer {
    options: Arc<usvg::Options<'static>>,
    basemap: Basemap,
    maps_dir: PathBuf,
}

impl MapRenderer {
    pub fn new(basemap: Basemap, maps_dir: impl Into<PathBuf>) -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_system_fonts();
        let mut options = usvg::Options::default();
        options.fontdb = Arc::new(fontdb);

        Self {
            options: Arc::new(options),
            basemap,
            maps_dir: maps_dir.into(),
        }
    }

    pub fn maps_dir(&self) -> &Path {
        &self.maps_dir
    }

    /// Draw every resolvable city in `cities` and write the map to `path`.
    /// Unknown cities are skipped; returns `false` without writing anything
    /// when none of them resolve.
    pub async fn create_graph(
        &self,
        db: &DatabaseConnection,
        path: &Path,
        cities: &[String],
        color: &MarkerColor,
    ) -> AppResult<bool> {
        let mut markers = Vec::new();
        for name in cities {
            if let Some(at) = get_coordinates(db, name).await? {
                markers.push(Marker {
                    name: name.clone(),
                    at,
                });
            }
        }

        if markers.is_empty() {
            return Ok(false);
        }

        let count = markers.len();
        let svg = MapScene::new(&self.basemap, "User city map")
            .markers(markers)
            .color(color.clone())
            .to_svg();

        self.write_png(path, svg).await?;
        tracing::debug!(path = %path.display(), cities = count, "Rendered city map");

        Ok(true)
    }

    /// Draw both cities joined by a dashed line, titled with their distance.
    /// Returns `None` without writing anything if either city is unknown.
    pub async fn draw_distance(
        &self,
        db: &DatabaseConnection,
        city1: &str,
        city2: &str,
    ) -> AppResult<Option<DistanceMap>> {
        let (Some(from), Some(to)) = (
            get_coordinates(db, city1).await?,
            get_coordinates(db, city2).await?,
        ) else {
            return Ok(None);
        };

        let distance_km = from.distance_km(&to);
        let title = format!("Distance {} - {}: {:.1} km", city1, city2, distance_km);
        let svg = MapScene::new(&self.basemap, title)
            .markers(vec![
                Marker {
                    name: city1.to_string(),
                    at: from,
                },
                Marker {
                    name: city2.to_string(),
                    at: to,
                },
            ])
            .route(from, to)
            .emphasized()
            .to_svg();

        let path = self
            .maps_dir
            .join(format!("distance_{}_{}.png", slug(city1), slug(city2)));
        let png = self.write_png(&path, svg).await?;
        tracing::debug!(path = %path.display(), distance_km, "Rendered distance map");

        Ok(Some(DistanceMap {
            path,
            distance_km,
            png,
        }))
    }

    /// Rasterize on the blocking pool, then replace `path` atomically so
    /// concurrent readers never observe a partially written file
    async fn write_png(&self, path: &Path, svg: String) -> AppResult<Vec<u8>> {
        let options = Arc::clone(&self.options);
        let png = tokio::task::spawn_blocking(move || rasterize(&svg, &options))
            .await
            .map_err(|e| AppError::Render(format!("Render task failed: {}", e)))??;

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let staging = path.with_extension(format!("{}.tmp", Uuid::new_v4()));
        tokio::fs::write(&staging, &png).await?;
        if let Err(e) = tokio::fs::rename(&staging, path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e.into());
        }

        Ok(png)
    }
}

fn rasterize(svg: &str, options: &usvg::Options<'static>) -> AppResult<Vec<u8>> {
    let tree = usvg::Tree::from_str(svg, options)
        .map_err(|e| AppError::Render(format!("Invalid map SVG: {}", e)))?;

    let size = tree.size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width().ceil() as u32, size.height().ceil() as u32)
        .ok_or_else(|| AppError::Render("Map has zero size".to_string()))?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| AppError::Render(format!("Failed to encode PNG: {}", e)))
}

/// File-name-safe form of a city name
pub fn slug(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}
