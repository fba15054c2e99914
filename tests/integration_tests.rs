use anyhow::Result;
use clap::Parser;
use course_viewer::{CliConfig, CoursePipeline, LocalStorage, ViewerEngine, ViewerError};
use std::path::Path;
use tempfile::TempDir;

const MARKS_CSV: &str = "\
Mark Name,Description,Light,Lat,Long
R 4,Red can,Fl R 4s,50.7701,0.2901
R3,Red can,Fl(2) R 6s,50.7512,0.3120
X-Ray,Yellow special,Fl Y 5s,50.7300,0.3550
Drifted,Off station,,,0.3000
Echo,West cardinal,Q(9) 15s,50.7100,0.2500
Unknown,Charted wreck,,50.7200,
";

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

fn read(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name)).unwrap()
}

fn engine_for(dir: &Path, extra: &[&str]) -> ViewerEngine<CoursePipeline<LocalStorage, CliConfig>> {
    let data_dir = dir.to_str().unwrap().to_string();
    let mut argv = vec!["course-viewer", "--data-dir", data_dir.as_str()];
    argv.extend_from_slice(extra);

    let config = CliConfig::parse_from(argv);
    let storage = LocalStorage::new(config.data_dir.clone());
    ViewerEngine::new(CoursePipeline::new(storage, config))
}

#[tokio::test]
async fn test_end_to_end_run_with_legacy_legs_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write(temp_dir.path(), "map.csv", MARKS_CSV);
    write(
        temp_dir.path(),
        "saved_lines.csv",
        "StartMark,EndMark,DistanceNM\nR 4,R3,1.42\nR3,R 4,1.42\nR 4,X-Ray,2.51\n",
    );

    let report = engine_for(temp_dir.path(), &[]).run().await?;

    // 兩列缺座標被略過
    assert_eq!(report.marks, 4);
    assert_eq!(report.legs, 3);
    assert_eq!(report.special_legs, 2);
    assert!(report.output_path.ends_with("course_map.html"));

    let legs = read(temp_dir.path(), "saved_lines.csv");
    assert_eq!(
        legs,
        "StartMark,EndMark,DistanceNM,Color\nR 4,R3,1.42,red\nR3,R 4,1.42,black\nR 4,X-Ray,2.51,red\n"
    );

    let html = read(temp_dir.path(), "course_map.html");
    assert!(html.contains("R 4 → R3 (1.42 NM)"));
    assert!(html.contains("R 4 → X-Ray (2.51 NM)"));
    assert!(html.contains("<td>4</td><td>Echo</td>"));
    assert!(!html.contains("Drifted"));

    assert!(report.legend_text.contains("   3  X-Ray"));
    assert!(report.legs_text.lines().last().unwrap().starts_with("Total"));
    Ok(())
}

#[tokio::test]
async fn test_second_run_is_idempotent() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write(temp_dir.path(), "map.csv", MARKS_CSV);
    write(
        temp_dir.path(),
        "saved_lines.csv",
        "StartMark,EndMark,DistanceNM,Color\nR 4,R3,1.42,black\nEcho,R3,3.0,blue\n",
    );

    engine_for(temp_dir.path(), &[]).run().await?;
    let first = read(temp_dir.path(), "saved_lines.csv");
    engine_for(temp_dir.path(), &[]).run().await?;
    let second = read(temp_dir.path(), "saved_lines.csv");

    assert_eq!(first, second);
    assert!(first.contains("R 4,R3,1.42,red"));
    assert!(first.contains("Echo,R3,3.0,blue"));
    Ok(())
}

#[tokio::test]
async fn test_missing_legs_file_starts_empty() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write(temp_dir.path(), "map.csv", MARKS_CSV);

    let report = engine_for(temp_dir.path(), &[]).run().await?;

    assert_eq!(report.legs, 0);
    assert_eq!(
        read(temp_dir.path(), "saved_lines.csv"),
        "StartMark,EndMark,DistanceNM,Color\n"
    );
    assert!(temp_dir.path().join("course_map.html").exists());
    Ok(())
}

#[tokio::test]
async fn test_add_leg_measures_distance() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write(temp_dir.path(), "map.csv", MARKS_CSV);

    let report = engine_for(temp_dir.path(), &["--add-leg", "R 4:X-Ray"]).run().await?;

    assert_eq!(report.legs, 1);
    assert_eq!(report.special_legs, 1);
    let legs = read(temp_dir.path(), "saved_lines.csv");
    let row = legs.lines().nth(1).unwrap();
    assert!(row.starts_with("R 4,X-Ray,"));
    assert!(row.ends_with(",red"));

    let distance: f64 = row.split(',').nth(2).unwrap().parse()?;
    let expected = course_viewer::distance_nm(50.7701, 0.2901, 50.7300, 0.3550);
    assert!((distance - expected).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn test_missing_marks_file_is_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let err = engine_for(temp_dir.path(), &[]).run().await.unwrap_err();

    assert!(matches!(err, ViewerError::MissingSource { .. }));
    assert!(!temp_dir.path().join("saved_lines.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_dangling_leg_reference_is_fatal() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write(temp_dir.path(), "map.csv", MARKS_CSV);
    write(
        temp_dir.path(),
        "saved_lines.csv",
        "StartMark,EndMark,DistanceNM,Color\nR 4,R3,1.42,black\nR3,Drifted,0.8,black\n",
    );

    let err = engine_for(temp_dir.path(), &[]).run().await.unwrap_err();

    match err {
        ViewerError::DanglingMark { start, end, missing } => {
            assert_eq!((start.as_str(), end.as_str()), ("R3", "Drifted"));
            assert_eq!(missing, "Drifted");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!temp_dir.path().join("course_map.html").exists());

    // 標註後的航段在繪圖前就已寫回
    assert_eq!(
        read(temp_dir.path(), "saved_lines.csv"),
        "StartMark,EndMark,DistanceNM,Color\nR 4,R3,1.42,red\nR3,Drifted,0.8,black\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_padded_names_are_kept_verbatim() -> Result<()> {
    let temp_dir = TempDir::new()?;
    write(temp_dir.path(), "map.csv", MARKS_CSV);
    write(
        temp_dir.path(),
        "saved_lines.csv",
        "StartMark,EndMark,DistanceNM,Color\nR 4,R3,1.42,black\nR 4 ,R3,1.42,black\n",
    );

    let err = engine_for(temp_dir.path(), &[]).run().await.unwrap_err();

    assert!(matches!(err, ViewerError::DanglingMark { missing, .. } if missing == "R 4 "));
    assert_eq!(
        read(temp_dir.path(), "saved_lines.csv"),
        "StartMark,EndMark,DistanceNM,Color\nR 4,R3,1.42,red\nR 4 ,R3,1.42,black\n"
    );
    Ok(())
}
