use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn statlens() -> Command {
    Command::cargo_bin("statlens").unwrap()
}

#[test]
fn parse_extracts_stats_from_stdin() {
    let output = statlens()
        .args(["parse", "-"])
        .write_stdin("치명타 저항: 123\n명증 1,300\n전투 속도 242%")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stats: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let stats = stats.as_array().unwrap();
    let names: Vec<&str> = stats.iter().map(|s| s["name"].as_str().unwrap()).collect();

    assert_eq!(names, vec!["치명타 저항", "명중", "전투 속도"]);
    assert_eq!(stats[1]["value"], "1300");
    assert_eq!(stats[2]["value"], "24.2%");
}

#[test]
fn parse_with_category_fills_expected_shape() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ocr.txt");
    fs::write(&input, "공격력 1,000\nPVP 명중 300").unwrap();

    let output = statlens()
        .args(["parse", input.to_str().unwrap(), "--category", "basic"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stats: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let stats = stats.as_array().unwrap();

    assert_eq!(stats.len(), 10);
    assert_eq!(stats[0]["value"], "1000");
    assert!(stats.iter().all(|s| s["name"] != "PVP 명중"));
}

#[test]
fn parse_csv_output() {
    statlens()
        .args(["parse", "-", "--format", "csv"])
        .write_stdin("회피 1200")
        .assert()
        .success()
        .stdout(predicate::str::contains("name,value,is_percentage,is_recognized"))
        .stdout(predicate::str::contains("회피,1200,false,true"));
}

#[test]
fn parse_rejects_unknown_category() {
    statlens()
        .args(["parse", "-", "--category", "misc"])
        .write_stdin("")
        .assert()
        .failure();
}

#[test]
fn catalog_lists_expected_stats() {
    statlens()
        .args(["catalog", "--category", "pvp-pve"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PVP 치명타 저항"))
        .stdout(predicate::str::contains("보스 피해 내성"))
        .stdout(predicate::str::contains("비행력").not());
}

#[test]
fn catalog_json_has_all_categories() {
    let output = statlens()
        .args(["catalog", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let categories: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let ids: Vec<&str> = categories
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["basic", "combat", "pvpPve", "special"]);
}

#[test]
fn config_path_points_at_json_file() {
    statlens()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"));
}

#[test]
fn config_init_writes_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    statlens()
        .args(["config", "init", "--output", path.to_str().unwrap()])
        .assert()
        .success();

    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["recognition"]["timeout_secs"], 30);
    assert_eq!(written["reconcile"]["scales"], serde_json::json!([1, 2, 3, 4]));

    // Refuses to overwrite without --force
    statlens()
        .args(["config", "init", "--output", path.to_str().unwrap()])
        .assert()
        .failure();
}

#[test]
fn preprocess_writes_scaled_raster() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("shot.png");
    let output = dir.path().join("out.png");

    image::RgbImage::from_pixel(20, 10, image::Rgb([30, 30, 30]))
        .save(&input)
        .unwrap();

    statlens()
        .args([
            "preprocess",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--scale",
            "3",
            "--threshold",
            "128",
        ])
        .assert()
        .success();

    let raster = image::open(&output).unwrap().to_luma8();
    assert_eq!(raster.dimensions(), (60, 30));
    assert!(raster.pixels().all(|p| p[0] == 0));
}

#[test]
fn preprocess_reports_decode_failure() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("broken.png");
    fs::write(&input, b"not an image").unwrap();

    statlens()
        .args([
            "preprocess",
            input.to_str().unwrap(),
            "--output",
            dir.path().join("out.png").to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to decode image"));
}
