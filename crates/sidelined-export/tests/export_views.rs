// End-to-end export tests: load a CSV, build the report, write the files.

use std::fs;
use std::path::{Path, PathBuf};

use sidelined_core::filter::Filters;
use sidelined_core::report::ReportOptions;
use sidelined_core::Dataset;
use sidelined_export::export::{export_report, ViewOutcome, LEADERBOARD_CSV, MANIFEST_FILE};

fn project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "sidelined-export-{}-{}",
        std::process::id(),
        name
    ));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn export(csv: &Path, name: &str) -> (PathBuf, sidelined_export::Manifest) {
    let dataset = Dataset::load(csv).expect("dataset should load");
    let report = dataset.report(&Filters::default(), &ReportOptions::default());
    let out = scratch_dir(name);
    let manifest = export_report(&report, &dataset.source, &out).expect("export should succeed");
    (out, manifest)
}

#[test]
fn sample_data_exports_every_view() {
    let csv = project_root().join("data/player_injuries_impact_cleaned.csv");
    let (out, manifest) = export(&csv, "full");

    assert_eq!(manifest.rows, 20);
    assert_eq!(manifest.skipped(), 0);
    for file in [
        "1_top_perf_drop.html",
        "2_injury_counts_by_team.html",
        "3_heatmap_month_team.html",
        "4_scatter_age_perf_drop.html",
        "5_leaderboard_top_improvements.csv",
        "5_leaderboard_top_improvements.html",
        "6_before_after_Marcus_Hale.html",
        MANIFEST_FILE,
    ] {
        assert!(out.join(file).is_file(), "missing {file}");
    }

    let html = fs::read_to_string(out.join("2_injury_counts_by_team.html")).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<svg"));
    assert!(html.contains("Northbridge"));

    let csv_text = fs::read_to_string(out.join(LEADERBOARD_CSV)).unwrap();
    let lines: Vec<&str> = csv_text.lines().collect();
    assert_eq!(lines.len(), 11);
    assert!(lines[0].starts_with("player,"));
    assert_eq!(lines[10], "Nils Brandt,6.2,,,");

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn missing_team_column_skips_team_views() {
    let csv = project_root().join("crates/sidelined-core/tests/fixtures/no_team.csv");
    let (out, manifest) = export(&csv, "no-team");

    let skipped: Vec<usize> = manifest
        .views
        .iter()
        .filter_map(|v| match v {
            ViewOutcome::Skipped { view, .. } => Some(*view),
            ViewOutcome::Saved { .. } => None,
        })
        .collect();
    assert_eq!(skipped, vec![2, 3]);
    assert!(out.join("1_top_perf_drop.html").is_file());
    assert!(!out.join("2_injury_counts_by_team.html").exists());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join(MANIFEST_FILE)).unwrap()).unwrap();
    assert_eq!(json["views"][1]["status"], "skipped");
    assert!(json["views"][1]["reason"]
        .as_str()
        .unwrap()
        .contains("team/team_name"));

    let _ = fs::remove_dir_all(&out);
}

#[test]
fn output_directory_is_created_even_with_skips() {
    let csv = project_root().join("crates/sidelined-core/tests/fixtures/scenario.csv");
    let (out, manifest) = export(&csv, "nested");
    assert!(out.is_dir());
    // No known performance drop in this file, so view 1 is skipped.
    assert!(!manifest.saved_files().contains(&"1_top_perf_drop.html"));
    assert!(out.join(MANIFEST_FILE).is_file());
    let _ = fs::remove_dir_all(&out);
}

#[test]
fn rerun_removes_files_from_previous_export() {
    let csv = project_root().join("data/player_injuries_impact_cleaned.csv");
    let dataset = Dataset::load(&csv).expect("dataset should load");
    let report = dataset.report(&Filters::default(), &ReportOptions::default());
    let out = scratch_dir("rerun");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("6_before_after_Old_Player.html"), "old").unwrap();
    fs::write(out.join("4_scatter_age_fifa_rating.html"), "old").unwrap();
    fs::write(out.join("notes.txt"), "keep me").unwrap();

    let manifest = export_report(&report, &dataset.source, &out).expect("export should succeed");

    assert!(!out.join("6_before_after_Old_Player.html").exists());
    assert!(!out.join("4_scatter_age_fifa_rating.html").exists());
    assert!(out.join("notes.txt").is_file());
    let mut on_disk: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name != "notes.txt" && name != MANIFEST_FILE)
        .collect();
    on_disk.sort();
    let mut saved: Vec<String> = manifest.saved_files().iter().map(|s| s.to_string()).collect();
    saved.sort();
    assert_eq!(on_disk, saved);

    let _ = fs::remove_dir_all(&out);
}
