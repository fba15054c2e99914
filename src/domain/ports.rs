use crate::domain::model::{CourseData, RenderedCourse, SpecialLegRule, ViewState};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub trait Storage: Send + Sync {
    fn exists(&self, path: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// When the legs file is written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum WritePolicy {
    #[default]
    Always,
    OnChange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    pub title: String,
    pub description: String,
    pub zoom: f64,
    pub tiles: String,
    pub seamark_tiles: String,
    pub height: u32,
}

pub const DEFAULT_TITLE: &str = "Navigators Challenge Course";
pub const DEFAULT_DESCRIPTION: &str = "Click on marks to view mark names, click on lines to view distances. \
Red legs are mandatory legs of the course, the longest red one being the St. Leonards race itself.";
pub const DEFAULT_TILES: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_SEAMARK_TILES: &str = "https://tiles.openseamap.org/seamark/{z}/{x}/{y}.png";

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            zoom: 10.4,
            tiles: DEFAULT_TILES.to_string(),
            seamark_tiles: DEFAULT_SEAMARK_TILES.to_string(),
            height: 900,
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn marks_file(&self) -> &str;
    fn legs_file(&self) -> &str;
    fn html_file(&self) -> &str;
    fn special_legs(&self) -> Vec<SpecialLegRule>;
    fn added_legs(&self) -> Vec<(String, String)>;
    fn view_state(&self) -> ViewState;
    fn write_policy(&self) -> WritePolicy;
    fn map_settings(&self) -> MapSettings;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<CourseData>;
    async fn transform(&self, data: CourseData) -> Result<RenderedCourse>;
    async fn load(&self, result: RenderedCourse) -> Result<String>;
}
