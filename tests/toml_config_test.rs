use anyhow::Result;
use course_viewer::core::{ConfigProvider, WritePolicy};
use course_viewer::utils::validation::Validate;
use course_viewer::{CoursePipeline, LocalStorage, TomlConfig, ViewerEngine};
use tempfile::TempDir;

/// 測試以 TOML 設定檔驅動整個流程
#[tokio::test]
async fn test_toml_driven_run_with_custom_rules() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let temp_path = temp_dir.path().to_str().unwrap();
    // 將Windows路徑中的反斜杠轉為正斜杠以避免TOML解析問題
    let normalized_path = temp_path.replace('\\', "/");

    std::fs::write(
        temp_dir.path().join("marks.csv"),
        "Mark Name,Description,Light,Lat,Long\nAlpha,,,50.0,0.0\nBravo,,,50.1,0.1\n",
    )?;
    std::fs::write(
        temp_dir.path().join("legs.csv"),
        "StartMark,EndMark,DistanceNM,Color\nAlpha,Bravo,7.0,black\nBravo,Alpha,7.0,black\n",
    )?;

    let config_content = format!(
        r#"
[course]
title = "Club Night"

[sources]
data_dir = "{}"
marks_file = "marks.csv"
legs_file = "legs.csv"

[output]
html_file = "club.html"
write_policy = "on-change"

[view]
selected_marks = ["Bravo"]

[[special_legs]]
start = "Bravo"
end = "Alpha"
"#,
        normalized_path
    );
    let config_path = temp_dir.path().join("course-config.toml");
    tokio::fs::write(&config_path, config_content).await?;

    let config = TomlConfig::from_file(&config_path)?;
    config.validate()?;
    assert_eq!(config.write_policy(), WritePolicy::OnChange);

    let storage = LocalStorage::new(config.data_dir().to_string());
    let engine = ViewerEngine::new(CoursePipeline::new(storage, config));
    let report = engine.run().await?;

    assert_eq!(report.special_legs, 1);
    let legs = std::fs::read_to_string(temp_dir.path().join("legs.csv"))?;
    assert_eq!(
        legs,
        "StartMark,EndMark,DistanceNM,Color\nAlpha,Bravo,7.0,black\nBravo,Alpha,7.0,red\n"
    );

    let html = std::fs::read_to_string(temp_dir.path().join("club.html"))?;
    assert!(html.contains("<title>Club Night</title>"));
    assert!(html.contains("\"color\":\"orange\""));
    Ok(())
}
