pub mod cli;
pub mod toml_config;

/// Parses a `START:END` leg argument. Mark names may contain spaces.
pub fn parse_leg_pair(value: &str) -> std::result::Result<(String, String), String> {
    match value.split_once(':') {
        Some((start, end)) if !start.trim().is_empty() && !end.trim().is_empty() => {
            Ok((start.trim().to_string(), end.trim().to_string()))
        }
        _ => Err(format!("expected START:END, got '{}'", value)),
    }
}

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use super::parse_leg_pair;
    use crate::core::legs::SpecialLegRules;
    use crate::core::{ConfigProvider, WritePolicy};
    use crate::domain::model::{SpecialLegRule, ViewState};
    use crate::domain::ports::MapSettings;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "course-viewer")]
    #[command(about = "Render a sailing course from mark and leg CSV files")]
    pub struct CliConfig {
        #[arg(long, default_value = ".")]
        pub data_dir: String,

        #[arg(long, default_value = "map.csv")]
        pub marks_file: String,

        #[arg(long, default_value = "saved_lines.csv")]
        pub legs_file: String,

        #[arg(long, default_value = "course_map.html")]
        pub html_file: String,

        #[arg(long = "add-leg", value_name = "START:END", value_parser = parse_leg_pair, help = "Measure and save a new leg between two marks")]
        pub add_legs: Vec<(String, String)>,

        #[arg(long = "special", value_name = "START:END", value_parser = parse_leg_pair, help = "Override the mandatory legs")]
        pub special_legs: Vec<(String, String)>,

        #[arg(long = "select", value_name = "MARK", help = "Highlight a mark on the map")]
        pub selected_marks: Vec<String>,

        #[arg(long, value_enum, default_value_t = WritePolicy::Always)]
        pub write_policy: WritePolicy,

        #[arg(long)]
        pub title: Option<String>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl ConfigProvider for CliConfig {
        fn data_dir(&self) -> &str {
            &self.data_dir
        }

        fn marks_file(&self) -> &str {
            &self.marks_file
        }

        fn legs_file(&self) -> &str {
            &self.legs_file
        }

        fn html_file(&self) -> &str {
            &self.html_file
        }

        fn special_legs(&self) -> Vec<SpecialLegRule> {
            if self.special_legs.is_empty() {
                return SpecialLegRules::default().rules().to_vec();
            }
            self.special_legs
                .iter()
                .map(|(start, end)| SpecialLegRule::new(start.as_str(), end.as_str()))
                .collect()
        }

        fn added_legs(&self) -> Vec<(String, String)> {
            self.add_legs.clone()
        }

        fn view_state(&self) -> ViewState {
            ViewState::with_selection(self.selected_marks.iter().cloned())
        }

        fn write_policy(&self) -> WritePolicy {
            self.write_policy
        }

        fn map_settings(&self) -> MapSettings {
            let mut settings = MapSettings::default();
            if let Some(title) = &self.title {
                settings.title = title.clone();
            }
            settings
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_path("data_dir", &self.data_dir)?;
            validation::validate_file_extensions(
                "marks_file/legs_file",
                &[self.marks_file.as_str(), self.legs_file.as_str()],
                &["csv"],
            )?;
            validation::validate_file_extensions("html_file", &[self.html_file.as_str()], &["html", "htm"])?;
            if let Some(title) = &self.title {
                validation::validate_non_empty_string("title", title)?;
            }
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_cli_defaults() {
            let config = CliConfig::parse_from(["course-viewer"]);
            assert_eq!(config.marks_file, "map.csv");
            assert_eq!(config.legs_file, "saved_lines.csv");
            assert_eq!(config.write_policy, WritePolicy::Always);
            assert_eq!(config.special_legs().len(), 2);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_cli_leg_arguments() {
            let config = CliConfig::parse_from([
                "course-viewer",
                "--add-leg",
                "R 4:Echo",
                "--special",
                "Echo:R3",
                "--select",
                "Echo",
                "--write-policy",
                "on-change",
            ]);
            assert_eq!(config.added_legs(), vec![("R 4".to_string(), "Echo".to_string())]);
            assert_eq!(config.special_legs(), vec![SpecialLegRule::new("Echo", "R3")]);
            assert!(config.view_state().is_selected("Echo"));
            assert_eq!(config.write_policy(), WritePolicy::OnChange);
        }

        #[test]
        fn test_cli_rejects_non_csv_sources() {
            let config = CliConfig::parse_from(["course-viewer", "--marks-file", "map.xlsx"]);
            assert!(config.validate().is_err());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_leg_pair() {
        assert_eq!(
            parse_leg_pair("R 4:X-Ray"),
            Ok(("R 4".to_string(), "X-Ray".to_string()))
        );
        assert!(parse_leg_pair("R 4").is_err());
        assert!(parse_leg_pair(":R3").is_err());
    }
}
