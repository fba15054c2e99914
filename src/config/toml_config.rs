use crate::core::legs::SpecialLegRules;
use crate::core::{ConfigProvider, WritePolicy};
use crate::domain::model::{SpecialLegRule, ViewState};
use crate::domain::ports::{self, MapSettings};
use crate::utils::error::{Result, ViewerError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub course: CourseSection,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub view: ViewConfig,
    /// 未設定時使用預設的必經航段
    pub special_legs: Option<Vec<SpecialLegRule>>,
    /// 由命令列帶入，不從檔案讀取
    #[serde(skip)]
    pub added_legs: Vec<(String, String)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSection {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_description")]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_marks_file")]
    pub marks_file: String,
    #[serde(default = "default_legs_file")]
    pub legs_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    #[serde(default = "default_tiles")]
    pub tiles: String,
    #[serde(default = "default_seamark_tiles")]
    pub seamark_tiles: String,
    #[serde(default = "default_height")]
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_html_file")]
    pub html_file: String,
    #[serde(default)]
    pub write_policy: WritePolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub selected_marks: Vec<String>,
}

fn default_title() -> String {
    ports::DEFAULT_TITLE.to_string()
}

fn default_description() -> String {
    ports::DEFAULT_DESCRIPTION.to_string()
}

fn default_data_dir() -> String {
    ".".to_string()
}

fn default_marks_file() -> String {
    "map.csv".to_string()
}

fn default_legs_file() -> String {
    "saved_lines.csv".to_string()
}

fn default_zoom() -> f64 {
    MapSettings::default().zoom
}

fn default_tiles() -> String {
    ports::DEFAULT_TILES.to_string()
}

fn default_seamark_tiles() -> String {
    ports::DEFAULT_SEAMARK_TILES.to_string()
}

fn default_height() -> u32 {
    MapSettings::default().height
}

fn default_html_file() -> String {
    "course_map.html".to_string()
}

impl Default for CourseSection {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
        }
    }
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            marks_file: default_marks_file(),
            legs_file: default_legs_file(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: default_zoom(),
            tiles: default_tiles(),
            seamark_tiles: default_seamark_tiles(),
            height: default_height(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            html_file: default_html_file(),
            write_policy: WritePolicy::default(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed_content)?)
    }

    /// 替換環境變數 (例如 ${COURSE_DATA_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ViewerError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("course.title", &self.course.title)?;
        validation::validate_path("sources.data_dir", &self.sources.data_dir)?;
        validation::validate_file_extensions(
            "sources",
            &[
                self.sources.marks_file.as_str(),
                self.sources.legs_file.as_str(),
            ],
            &["csv"],
        )?;
        validation::validate_file_extensions(
            "output.html_file",
            &[self.output.html_file.as_str()],
            &["html", "htm"],
        )?;
        validation::validate_range("map.zoom", self.map.zoom, 0.0, 20.0)?;
        validation::validate_range("map.height", self.map.height, 100, 4000)?;
        validation::validate_tile_template("map.tiles", &self.map.tiles)?;
        validation::validate_tile_template("map.seamark_tiles", &self.map.seamark_tiles)?;

        if let Some(rules) = &self.special_legs {
            for rule in rules {
                validation::validate_non_empty_string("special_legs.start", &rule.start)?;
                validation::validate_non_empty_string("special_legs.end", &rule.end)?;
            }
        }

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn data_dir(&self) -> &str {
        &self.sources.data_dir
    }

    fn marks_file(&self) -> &str {
        &self.sources.marks_file
    }

    fn legs_file(&self) -> &str {
        &self.sources.legs_file
    }

    fn html_file(&self) -> &str {
        &self.output.html_file
    }

    fn special_legs(&self) -> Vec<SpecialLegRule> {
        match &self.special_legs {
            Some(rules) => rules.clone(),
            None => SpecialLegRules::default().rules().to_vec(),
        }
    }

    fn added_legs(&self) -> Vec<(String, String)> {
        self.added_legs.clone()
    }

    fn view_state(&self) -> ViewState {
        ViewState::with_selection(self.view.selected_marks.iter().cloned())
    }

    fn write_policy(&self) -> WritePolicy {
        self.output.write_policy
    }

    fn map_settings(&self) -> MapSettings {
        MapSettings {
            title: self.course.title.clone(),
            description: self.course.description.clone(),
            zoom: self.map.zoom,
            tiles: self.map.tiles.clone(),
            seamark_tiles: self.map.seamark_tiles.clone(),
            height: self.map.height,
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[course]
title = "Autumn Series"
description = "Race area east of the pier"

[sources]
data_dir = "./data"
marks_file = "marks.csv"
legs_file = "legs.csv"

[map]
zoom = 11.0
height = 600

[output]
html_file = "autumn.html"
write_policy = "on-change"

[view]
selected_marks = ["R 4"]

[[special_legs]]
start = "R 4"
end = "Echo"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.course.title, "Autumn Series");
        assert_eq!(config.marks_file(), "marks.csv");
        assert_eq!(config.write_policy(), WritePolicy::OnChange);
        assert_eq!(config.special_legs(), vec![SpecialLegRule::new("R 4", "Echo")]);
        assert!(config.view_state().is_selected("R 4"));
        assert_eq!(config.map_settings().height, 600);
        assert_eq!(config.map.tiles, ports::DEFAULT_TILES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.data_dir(), ".");
        assert_eq!(config.legs_file(), "saved_lines.csv");
        assert_eq!(config.html_file(), "course_map.html");
        assert_eq!(config.write_policy(), WritePolicy::Always);
        assert_eq!(config.special_legs().len(), 2);
        assert_eq!(config.map_settings(), MapSettings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_special_legs_disables_highlighting() {
        let config = TomlConfig::from_toml_str("special_legs = []\n").unwrap();
        assert!(config.special_legs().is_empty());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("COURSE_VIEWER_TEST_DATA_DIR", "/srv/course");

        let toml_content = r#"
[sources]
data_dir = "${COURSE_VIEWER_TEST_DATA_DIR}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.sources.data_dir, "/srv/course");

        std::env::remove_var("COURSE_VIEWER_TEST_DATA_DIR");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[map]
seamark_tiles = "https://tiles.example.org/seamark.png"
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[map]\nzoom = 25.0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[course\ntitle = 1").unwrap_err();
        assert!(matches!(err, ViewerError::TomlError(_)));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[course]
title = "File test"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.course.title, "File test");
    }
}
