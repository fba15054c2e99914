use crate::core::catalog::MarkCatalog;
use crate::core::geo;
use crate::domain::model::{Leg, LegColor, Mark, SpecialLegRule};
use crate::utils::error::{Result, ViewerError};
use serde::Deserialize;

pub const LEGS_HEADER: [&str; 4] = ["StartMark", "EndMark", "DistanceNM", "Color"];

/// Layout of the legs file as it was found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegsSchema {
    /// No file yet
    Absent,
    /// Written before legs carried a colour
    V1,
    V2,
}

#[derive(Debug, Deserialize)]
struct LegRow {
    #[serde(rename = "StartMark")]
    start: String,
    #[serde(rename = "EndMark")]
    end: String,
    #[serde(rename = "DistanceNM")]
    distance_nm: f64,
    #[serde(rename = "Color", default)]
    color: Option<LegColor>,
}

/// Legs normalized to the current schema, plus the schema they were read from.
#[derive(Debug, Clone, PartialEq)]
pub struct LegsSnapshot {
    pub legs: Vec<Leg>,
    pub schema: LegsSchema,
}

impl LegsSnapshot {
    pub fn absent() -> Self {
        Self {
            legs: Vec::new(),
            schema: LegsSchema::Absent,
        }
    }

    /// 讀取航段 CSV；舊格式沒有 Color 欄位，一律補上 black
    pub fn from_csv(data: &[u8]) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(data);

        let has_color = reader.headers()?.iter().any(|h| h == "Color");
        let schema = if has_color {
            LegsSchema::V2
        } else {
            LegsSchema::V1
        };

        let mut legs = Vec::new();
        for row in reader.deserialize::<LegRow>() {
            let row = row?;
            legs.push(Leg {
                start: row.start,
                end: row.end,
                distance_nm: row.distance_nm,
                color: row.color.unwrap_or_default(),
            });
        }

        Ok(Self { legs, schema })
    }

    pub fn needs_migration(&self) -> bool {
        self.schema == LegsSchema::V1
    }
}

/// Serializes legs with the full header, even when there are none.
pub fn legs_to_csv(legs: &[Leg]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(LEGS_HEADER)?;
    for leg in legs {
        writer.serialize(leg)?;
    }

    writer
        .into_inner()
        .map_err(|e| ViewerError::IoError(e.into_error()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpecialLegRules {
    rules: Vec<SpecialLegRule>,
}

impl SpecialLegRules {
    pub fn new(rules: Vec<SpecialLegRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[SpecialLegRule] {
        &self.rules
    }

    /// Colours every matching leg red and returns how many matched.
    pub fn annotate(&self, legs: &mut [Leg]) -> usize {
        let mut matched = 0;
        for leg in legs.iter_mut() {
            if self.rules.iter().any(|rule| rule.matches(leg)) {
                leg.color = LegColor::Red;
                matched += 1;
            }
        }
        matched
    }
}

impl Default for SpecialLegRules {
    fn default() -> Self {
        Self::new(vec![
            SpecialLegRule::new("R 4", "R3"),
            SpecialLegRule::new("R 4", "X-Ray"),
        ])
    }
}

/// A leg with both endpoints looked up in the catalog.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedLeg<'a> {
    pub leg: &'a Leg,
    pub start: &'a Mark,
    pub end: &'a Mark,
}

/// Resolves every leg; the first unknown mark name aborts the whole run.
pub fn resolve_legs<'a>(legs: &'a [Leg], catalog: &'a MarkCatalog) -> Result<Vec<ResolvedLeg<'a>>> {
    legs.iter()
        .map(|leg| {
            let (start, end) = catalog.endpoints(&leg.start, &leg.end)?;
            Ok(ResolvedLeg { leg, start, end })
        })
        .collect()
}

/// Builds a new black leg measured between two catalog marks.
pub fn measure_leg(catalog: &MarkCatalog, start: &str, end: &str) -> Result<Leg> {
    let (from, to) = catalog.endpoints(start, end)?;
    Ok(Leg {
        start: from.name.clone(),
        end: to.name.clone(),
        distance_nm: geo::distance_nm(from.lat, from.lon, to.lat, to.lon),
        color: LegColor::Black,
    })
}
