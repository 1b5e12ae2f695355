use crate::map::basemap::{Basemap, LineString};
use crate::map::color::MarkerColor;
use crate::utils::geo::Coordinates;

pub const WIDTH: f64 = 1200.0;
pub const MAP_HEIGHT: f64 = 600.0;
pub const TITLE_HEIGHT: f64 = 48.0;

/// Labels sit this many degrees north-east of their marker
const LABEL_OFFSET_DEG: f64 = 1.0;
const GRATICULE_STEP_DEG: i32 = 30;

const OCEAN: &str = "#a9cce3";
const LAND: &str = "#e9dfc0";
const COAST: &str = "#5d6d7e";
const ROUTE: &str = "#1b2631";

/// Plate carrée: longitude and latitude map linearly onto the map area
pub fn project(lng: f64, lat: f64) -> (f64, f64) {
    let x = (lng + 180.0) / 360.0 * WIDTH;
    let y = TITLE_HEIGHT + (90.0 - lat) / 180.0 * MAP_HEIGHT;
    (x, y)
}

#[derive(Clone, Debug)]
pub struct Marker {
    pub name: String,
    pub at: Coordinates,
}

/// A world map with labelled markers and an optional dashed route
pub struct MapScene<'a> {
    basemap: &'a Basemap,
    title: String,
    markers: Vec<Marker>,
    color: MarkerColor,
    marker_radius: f64,
    font_size: f64,
    route: Option<(Coordinates, Coordinates)>,
}

impl<'a> MapScene<'a> {
    pub fn new(basemap: &'a Basemap, title: impl Into<String>) -> Self {
        Self {
            basemap,
            title: title.into(),
            markers: Vec::new(),
            color: MarkerColor::default(),
            marker_radius: 4.0,
            font_size: 11.0,
            route: None,
        }
    }

    pub fn markers(mut self, markers: Vec<Marker>) -> Self {
        self.markers = markers;
        self
    }

    pub fn color(mut self, color: MarkerColor) -> Self {
        self.color = color;
        self
    }

    pub fn emphasized(mut self) -> Self {
        self.marker_radius = 5.0;
        self.font_size = 12.0;
        self
    }

    pub fn route(mut self, from: Coordinates, to: Coordinates) -> Self {
        self.route = Some((from, to));
        self
    }

    pub fn to_svg(&self) -> String {
        let height = TITLE_HEIGHT + MAP_HEIGHT;
        let mut svg = format!(
            "<svg width='{w}' height='{h}' viewBox='0 0 {w} {h}' xmlns='http://www.w3.org/2000/svg'>\n\
             <rect width='{w}' height='{h}' fill='white' />\n\
             <text x='{cx}' y='32' font-family='sans-serif' font-size='20' text-anchor='middle' fill='#000000'>{title}</text>\n\
             <rect x='0' y='{top}' width='{w}' height='{mh}' fill='{OCEAN}' />\n",
            w = WIDTH,
            h = height,
            cx = WIDTH / 2.0,
            top = TITLE_HEIGHT,
            mh = MAP_HEIGHT,
            title = escape(&self.title),
        );

        for ring in &self.basemap.land {
            svg.push_str(&format!(
                "<path d='{}' fill='{LAND}' stroke='none' />\n",
                path_data(ring, true)
            ));
        }
        for line in &self.basemap.coastlines {
            svg.push_str(&format!(
                "<path d='{}' fill='none' stroke='{COAST}' stroke-width='0.8' />\n",
                path_data(line, false)
            ));
        }
        // Land polygons get an outline when no separate coastline layer exists
        if self.basemap.coastlines.is_empty() {
            for ring in &self.basemap.land {
                svg.push_str(&format!(
                    "<path d='{}' fill='none' stroke='{COAST}' stroke-width='0.8' />\n",
                    path_data(ring, true)
                ));
            }
        }

        svg.push_str(&self.graticule());

        if let Some((from, to)) = self.route {
            let (x1, y1) = project(from.lng, from.lat);
            let (x2, y2) = project(to.lng, to.lat);
            svg.push_str(&format!(
                "<line x1='{x1:.2}' y1='{y1:.2}' x2='{x2:.2}' y2='{y2:.2}' stroke='{ROUTE}' stroke-width='2' stroke-dasharray='8 5' />\n"
            ));
        }

        for marker in &self.markers {
            let (x, y) = project(marker.at.lng, marker.at.lat);
            let (lx, ly) = project(
                marker.at.lng + LABEL_OFFSET_DEG,
                marker.at.lat + LABEL_OFFSET_DEG,
            );
            svg.push_str(&format!(
                "<circle cx='{x:.2}' cy='{y:.2}' r='{r}' fill='{color}' stroke='#000000' stroke-width='0.8' />\n\
                 <text x='{lx:.2}' y='{ly:.2}' font-family='sans-serif' font-size='{fs}' fill='#000000'>{name}</text>\n",
                r = self.marker_radius,
                color = self.color,
                fs = self.font_size,
                name = escape(&marker.name),
            ));
        }

        svg.push_str("</svg>");
        svg
    }

    fn graticule(&self) -> String {
        let mut d = String::new();
        for lng in (-180..=180).step_by(GRATICULE_STEP_DEG as usize) {
            let (x, top) = project(lng as f64, 90.0);
            let (_, bottom) = project(lng as f64, -90.0);
            d.push_str(&format!("M{x:.2},{top:.2} L{x:.2},{bottom:.2} "));
        }
        for lat in (-90..=90).step_by(GRATICULE_STEP_DEG as usize) {
            let (left, y) = project(-180.0, lat as f64);
            let (right, _) = project(180.0, lat as f64);
            d.push_str(&format!("M{left:.2},{y:.2} L{right:.2},{y:.2} "));
        }
        format!(
            "<path d='{}' fill='none' stroke='#ffffff' stroke-opacity='0.6' stroke-width='0.6' />\n",
            d.trim_end()
        )
    }
}

fn path_data(points: &LineString, closed: bool) -> String {
    let mut d = String::new();
    for (i, &(lng, lat)) in points.iter().enumerate() {
        let (x, y) = project(lng, lat);
        let cmd = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{cmd}{x:.2},{y:.2} "));
    }
    if closed {
        d.push('Z');
    }
    d.trim_end().to_string()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn london() -> Marker {
        Marker {
            name: "London".to_string(),
            at: Coordinates { lat: 51.5074, lng: -0.1278 },
        }
    }

    #[test]
    fn test_project_corners() {
        assert_eq!(project(-180.0, 90.0), (0.0, TITLE_HEIGHT));
        assert_eq!(project(180.0, -90.0), (WIDTH, TITLE_HEIGHT + MAP_HEIGHT));
        assert_eq!(project(0.0, 0.0), (WIDTH / 2.0, TITLE_HEIGHT + MAP_HEIGHT / 2.0));
    }

    #[test]
    fn test_markers_and_labels() {
        let basemap = Basemap::default();
        let svg = MapScene::new(&basemap, "User city map")
            .markers(vec![london()])
            .color("blue".parse().unwrap())
            .to_svg();

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("User city map"));
        assert!(svg.contains(">London</text>"));
        assert!(svg.contains("fill='blue'"));
        assert!(!svg.contains("stroke-dasharray"));
    }

    #[test]
    fn test_label_is_offset_from_marker() {
        let basemap = Basemap::default();
        let svg = MapScene::new(&basemap, "t").markers(vec![london()]).to_svg();

        let (x, y) = project(-0.1278, 51.5074);
        let (lx, ly) = project(0.8722, 52.5074);
        assert!(svg.contains(&format!("cx='{x:.2}' cy='{y:.2}'")));
        assert!(svg.contains(&format!("x='{lx:.2}' y='{ly:.2}'")));
    }

    #[test]
    fn test_route_is_dashed() {
        let basemap = Basemap::default();
        let jakarta = Coordinates { lat: -6.2088, lng: 106.8456 };
        let svg = MapScene::new(&basemap, "Distance")
            .markers(vec![london()])
            .route(london().at, jakarta)
            .emphasized()
            .to_svg();

        assert!(svg.contains("stroke-dasharray='8 5'"));
        assert!(svg.contains("r='5'"));
    }

    #[test]
    fn test_names_are_escaped() {
        let basemap = Basemap::default();
        let marker = Marker {
            name: "<Tom & Jerry's>".to_string(),
            at: Coordinates { lat: 0.0, lng: 0.0 },
        };
        let svg = MapScene::new(&basemap, "a & b").markers(vec![marker]).to_svg();

        assert!(svg.contains("&lt;Tom &amp; Jerry&apos;s&gt;"));
        assert!(svg.contains("a &amp; b"));
    }

    #[test]
    fn test_basemap_layers() {
        let basemap = Basemap {
            land: vec![vec![(-10.0, 50.0), (2.0, 50.0), (2.0, 59.0)]],
            coastlines: vec![],
        };
        let svg = MapScene::new(&basemap, "t").to_svg();

        assert!(svg.contains(&format!("fill='{LAND}'")));
        assert!(svg.contains(" Z'"));
    }
}
