use crate::core::geo;
use crate::domain::model::Mark;
use crate::utils::error::{Result, ViewerError};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
struct MarkRow {
    #[serde(rename = "Mark Name")]
    name: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Light", default)]
    light: String,
    #[serde(rename = "Lat", default)]
    lat: Option<String>,
    #[serde(rename = "Long", default)]
    lon: Option<String>,
}

const REQUIRED_COLUMNS: [&str; 3] = ["Mark Name", "Lat", "Long"];

/// 空白格視為缺值；非數字是錯誤；NaN/inf 無法定位，同樣視為缺值
fn parse_coordinate(name: &str, field: &str, cell: Option<&str>) -> Result<Option<f64>> {
    let cell = match cell.map(str::trim) {
        Some(cell) if !cell.is_empty() => cell,
        _ => return Ok(None),
    };
    let value: f64 = cell.parse().map_err(|_| ViewerError::ValidationError {
        message: format!("Mark '{}' has a non-numeric {}: '{}'", name, field, cell),
    })?;
    Ok(value.is_finite().then_some(value))
}

/// Ordered set of marks, numbered 1..N in file order.
#[derive(Debug, Clone, Default)]
pub struct MarkCatalog {
    marks: Vec<Mark>,
    index: HashMap<String, usize>,
}

impl MarkCatalog {
    /// 解析標記 CSV：缺經緯度的列直接略過，其餘依序編號
    pub fn from_csv(data: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(data);

        let headers = reader.headers()?;
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|h| h == *column))
            .collect();
        if !missing.is_empty() {
            return Err(ViewerError::ValidationError {
                message: format!("Marks file is missing column(s): {}", missing.join(", ")),
            });
        }

        let mut marks = Vec::new();
        let mut index = HashMap::new();
        let mut dropped = 0usize;

        for row in reader.deserialize::<MarkRow>() {
            let row = row?;
            let lat = parse_coordinate(&row.name, "Lat", row.lat.as_deref())?;
            let lon = parse_coordinate(&row.name, "Long", row.lon.as_deref())?;
            let (lat, lon) = match (lat, lon) {
                (Some(lat), Some(lon)) => (lat, lon),
                _ => {
                    tracing::debug!("Dropping mark '{}' without a position", row.name);
                    dropped += 1;
                    continue;
                }
            };

            if index.contains_key(&row.name) {
                return Err(ViewerError::DuplicateMark { name: row.name });
            }

            index.insert(row.name.clone(), marks.len());
            marks.push(Mark {
                sequence: marks.len() + 1,
                name: row.name,
                description: row.description,
                light: row.light,
                lat,
                lon,
            });
        }

        if dropped > 0 {
            tracing::info!("⚠️ Dropped {} marks with missing Lat/Long", dropped);
        }

        Ok(Self { marks, index })
    }

    pub fn get(&self, name: &str) -> Option<&Mark> {
        self.index.get(name).map(|&i| &self.marks[i])
    }

    /// Looks up both ends of a leg; an unknown name is a dangling reference.
    pub fn endpoints(&self, start: &str, end: &str) -> Result<(&Mark, &Mark)> {
        let lookup = |name: &str| {
            self.get(name).ok_or_else(|| ViewerError::DanglingMark {
                start: start.to_string(),
                end: end.to_string(),
                missing: name.to_string(),
            })
        };
        Ok((lookup(start)?, lookup(end)?))
    }

    pub fn centroid(&self) -> Option<(f64, f64)> {
        geo::centroid(self.marks.iter().map(|m| (m.lat, m.lon)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mark> {
        self.marks.iter()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}
