//! Static Leaflet document for the course: marks, legs and the two summary tables.

use crate::core::catalog::MarkCatalog;
use crate::core::legs::ResolvedLeg;
use crate::core::tables::{self, escape_html};
use crate::domain::model::{Leg, Mark, ViewState};
use crate::domain::ports::MapSettings;
use crate::utils::error::{Result, ViewerError};
use serde::Serialize;

const LEAFLET_CSS: &str = "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.css";
const LEAFLET_JS: &str = "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.js";
const MARK_COLOR: &str = "yellow";
const SELECTED_MARK_COLOR: &str = "orange";

#[derive(Debug, Serialize)]
struct MarkFeature {
    sequence: usize,
    lat: f64,
    lon: f64,
    color: &'static str,
    tooltip: String,
    popup: String,
}

#[derive(Debug, Serialize)]
struct LegFeature {
    path: [[f64; 2]; 2],
    color: String,
    tooltip: String,
}

#[derive(Debug, Serialize)]
struct MapData {
    center: [f64; 2],
    zoom: f64,
    tiles: String,
    seamark_tiles: String,
    marks: Vec<MarkFeature>,
    legs: Vec<LegFeature>,
}

pub struct MapComposer {
    settings: MapSettings,
}

impl MapComposer {
    pub fn new(settings: MapSettings) -> Self {
        Self { settings }
    }

    pub fn compose(
        &self,
        catalog: &MarkCatalog,
        legs: &[ResolvedLeg<'_>],
        view: &ViewState,
    ) -> Result<String> {
        let (lat, lon) = catalog.centroid().ok_or_else(|| ViewerError::ProcessingError {
            message: "marks file contains no positioned marks, cannot centre the map".to_string(),
        })?;

        let data = MapData {
            center: [lat, lon],
            zoom: self.settings.zoom,
            tiles: self.settings.tiles.clone(),
            seamark_tiles: self.settings.seamark_tiles.clone(),
            marks: catalog.iter().map(|m| mark_feature(m, view)).collect(),
            legs: legs.iter().map(leg_feature).collect(),
        };

        // 避免資料中的 "</script>" 提早結束 script 區塊
        let data_json = serde_json::to_string(&data)?.replace("</", "<\\/");

        let table_legs: Vec<Leg> = legs.iter().map(|r| r.leg.clone()).collect();
        tracing::debug!(
            "Composing map with {} marks and {} legs centred on {:.4}, {:.4}",
            data.marks.len(),
            data.legs.len(),
            lat,
            lon
        );

        Ok(self.document(
            &data_json,
            &tables::legend_html(catalog),
            &tables::legs_html(&table_legs),
        ))
    }

    fn document(&self, data_json: &str, legend: &str, legs_table: &str) -> String {
        let title = escape_html(&self.settings.title);
        let description = escape_html(&self.settings.description);
        let generated = chrono::Local::now().format("%Y-%m-%d %H:%M");

        format!(
            r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>{title}</title>
  <link rel="stylesheet" href="{css}" crossorigin="anonymous" />
  <script src="{js}" crossorigin="anonymous"></script>
  <style>
    body {{ font-family: Arial, sans-serif; margin: 1rem 2rem; }}
    #map {{ width: 100%; height: {height}px; }}
    .mark-label {{ font-size: 10pt; font-weight: bold; color: #0f172a; }}
    .tables {{ display: flex; gap: 3rem; align-items: flex-start; margin-top: 1.5rem; }}
    table {{ border-collapse: collapse; }}
    th, td {{ border: 1px solid #cbd5e1; padding: 0.25rem 0.6rem; text-align: left; }}
    footer {{ margin-top: 1rem; color: #64748b; font-size: 9pt; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <p>{description}</p>
  <div id="map"></div>
  <div class="tables">
    <section>
      <h2>Marks</h2>
{legend}    </section>
    <section>
      <h2>Saved Legs</h2>
{legs_table}    </section>
  </div>
  <footer>Generated {generated}</footer>
  <script>
    const course = {data_json};
    const map = L.map('map', {{ zoomSnap: 0.1, scrollWheelZoom: true, zoomControl: true }})
      .setView(course.center, course.zoom);
    L.tileLayer(course.tiles, {{ attribution: '&copy; OpenStreetMap contributors' }}).addTo(map);
    L.tileLayer(course.seamark_tiles, {{ attribution: '&copy; OpenSeaMap contributors' }}).addTo(map);
    L.control.scale().addTo(map);

    for (const leg of course.legs) {{
      L.polyline(leg.path, {{ color: leg.color, weight: 3 }}).bindTooltip(leg.tooltip).addTo(map);
    }}
    for (const mark of course.marks) {{
      L.circleMarker([mark.lat, mark.lon], {{ radius: 6, color: mark.color, fill: true, fillOpacity: 1 }})
        .bindPopup(mark.popup, {{ maxWidth: 300 }})
        .bindTooltip(mark.tooltip)
        .addTo(map);
      L.marker([mark.lat, mark.lon], {{
        icon: L.divIcon({{ className: 'mark-label', html: String(mark.sequence), iconSize: [20, 14], iconAnchor: [-6, 16] }}),
        interactive: false
      }}).addTo(map);
    }}
  </script>
</body>
</html>
"#,
            css = LEAFLET_CSS,
            js = LEAFLET_JS,
            height = self.settings.height,
        )
    }
}

fn mark_feature(mark: &Mark, view: &ViewState) -> MarkFeature {
    let popup = format!(
        "<div style=\"font-size:12pt;font-family:Arial;\"><b>{}</b><br><br>\
<b>Description:</b> {}<br><b>Light:</b> {}<br><b>Position:</b> {:.4}, {:.4}</div>",
        escape_html(&mark.name),
        escape_html(&mark.description),
        escape_html(&mark.light),
        mark.lat,
        mark.lon
    );

    MarkFeature {
        sequence: mark.sequence,
        lat: mark.lat,
        lon: mark.lon,
        color: if view.is_selected(&mark.name) {
            SELECTED_MARK_COLOR
        } else {
            MARK_COLOR
        },
        tooltip: escape_html(&mark.name),
        popup,
    }
}

fn leg_feature(resolved: &ResolvedLeg<'_>) -> LegFeature {
    LegFeature {
        path: [
            [resolved.start.lat, resolved.start.lon],
            [resolved.end.lat, resolved.end.lon],
        ],
        color: resolved.leg.color.as_str().to_string(),
        tooltip: escape_html(&resolved.leg.tooltip()),
    }
}
