use crate::core::catalog::MarkCatalog;
use crate::core::legs::LegsSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A navigational mark. `sequence` is assigned at load time and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mark {
    pub sequence: usize,
    pub name: String,
    pub description: String,
    pub light: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LegColor {
    #[default]
    Black,
    Red,
    /// 檔案中的其他顏色原樣保留
    Named(String),
}

impl LegColor {
    pub fn as_str(&self) -> &str {
        match self {
            LegColor::Black => "black",
            LegColor::Red => "red",
            LegColor::Named(name) => name,
        }
    }
}

impl From<String> for LegColor {
    /// 只有小寫 black/red 是內建色，其他拼法原樣保留
    fn from(value: String) -> Self {
        if value == "black" || value.trim().is_empty() {
            LegColor::Black
        } else if value == "red" {
            LegColor::Red
        } else {
            LegColor::Named(value)
        }
    }
}

impl From<LegColor> for String {
    fn from(value: LegColor) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for LegColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A saved leg, in the column layout of the legs file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    #[serde(rename = "StartMark")]
    pub start: String,
    #[serde(rename = "EndMark")]
    pub end: String,
    #[serde(rename = "DistanceNM")]
    pub distance_nm: f64,
    #[serde(rename = "Color")]
    pub color: LegColor,
}

impl Leg {
    pub fn tooltip(&self) -> String {
        format!("{} → {} ({:.2} NM)", self.start, self.end, self.distance_nm)
    }
}

/// Directional (start, end) pair that marks a leg as mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialLegRule {
    pub start: String,
    pub end: String,
}

impl SpecialLegRule {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    pub fn matches(&self, leg: &Leg) -> bool {
        leg.start == self.start && leg.end == self.end
    }
}

/// Interaction state carried between runs instead of living in a global.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub selected_marks: BTreeSet<String>,
}

impl ViewState {
    pub fn with_selection<I, S>(marks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected_marks: marks.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected_marks.contains(name)
    }
}

/// Output of the extract phase.
#[derive(Debug, Clone)]
pub struct CourseData {
    pub catalog: MarkCatalog,
    pub legs: LegsSnapshot,
    /// Legs file bytes as they are on disk after any migration
    pub legs_on_disk: Option<Vec<u8>>,
}

/// Output of the transform phase.
#[derive(Debug, Clone)]
pub struct RenderedCourse {
    pub legs: Vec<Leg>,
    pub html: String,
    pub legend_text: String,
    pub legs_text: String,
    pub special_legs: usize,
    pub legs_changed: bool,
}
