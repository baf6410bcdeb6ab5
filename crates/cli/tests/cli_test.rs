//! End-to-end tests for the cluster-composition binary

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Atlas directory with two 3x3x3 atlases on an identity grid.
///
/// `aal`: voxel (1,1,1) = Frontal_Sup_L, voxel (0,0,0) = Precentral_R.
/// `ba`: voxel (1,1,1) = BA6.
fn write_atlases(dir: &Path) {
    let identity = "affine:\n  - [1.0, 0.0, 0.0, 0.0]\n  - [0.0, 1.0, 0.0, 0.0]\n  - [0.0, 0.0, 1.0, 0.0]\n";

    let mut aal = vec![0u8; 27];
    aal[0] = 2;
    aal[13] = 1;
    fs::write(dir.join("aal.raw"), &aal).unwrap();
    fs::write(
        dir.join("aal.csv"),
        "id,name\n1,Frontal_Sup_L\n2,Precentral_R\n",
    )
    .unwrap();
    fs::write(
        dir.join("aal.yaml"),
        format!(
            "name: aal\ndescription: Automated Anatomical Labeling\nvolume:\n  file: aal.raw\n  shape: [3, 3, 3]\n  dtype: u8\n{identity}labels: aal.csv\n"
        ),
    )
    .unwrap();

    let mut ba = vec![0u8; 27];
    ba[13] = 6;
    fs::write(dir.join("ba.raw"), &ba).unwrap();
    fs::write(dir.join("ba.csv"), "id,name\n6,BA6\n").unwrap();
    fs::write(
        dir.join("ba.yaml"),
        format!(
            "name: ba\nvolume:\n  file: ba.raw\n  shape: [3, 3, 3]\n  dtype: u8\n{identity}labels: ba.csv\n"
        ),
    )
    .unwrap();
}

struct Fixture {
    _dir: tempfile::TempDir,
    atlas_dir: PathBuf,
    config: PathBuf,
    root: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let atlas_dir = root.join("atlases");
    fs::create_dir(&atlas_dir).unwrap();
    write_atlases(&atlas_dir);

    let config = root.join("config.toml");
    fs::write(&config, "[compute]\nparallel = true\n").unwrap();

    Fixture {
        _dir: dir,
        atlas_dir,
        config,
        root,
    }
}

fn run(fixture: &Fixture, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cluster-composition"))
        .env_remove("CLUSTER_ATLAS_DIR")
        .env("CLUSTER_COMPOSITION_THREADS", "2")
        .arg("--atlas-dir")
        .arg(&fixture.atlas_dir)
        .arg("--config")
        .arg(&fixture.config)
        .args(args)
        .output()
        .expect("Failed to execute cluster-composition")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_compose_json_inline_coordinates() {
    let fixture = fixture();
    let output = run(
        &fixture,
        &[
            "compose",
            "--atlas",
            "aal",
            "--coord",
            "1,1,1",
            "--coord",
            "1.2,0.9,1.4",
            "--coord",
            "0,0,0",
            "--coord",
            "-5,5,5",
            "--format",
            "json",
        ],
    );
    let text = stdout(&output);
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    let table = &json["aal.cluster.composition"];

    assert_eq!(table["Frontal_Sup_L"]["Number of coordinates"], 2);
    assert_eq!(table["Frontal_Sup_L"]["Percentage (%)"], 50.0);
    assert_eq!(table["Precentral_R"]["Number of coordinates"], 1);
    assert_eq!(table["NULL"]["Percentage (%)"], 25.0);

    // Row order: count descending, named regions before NULL
    let a = text.find("Frontal_Sup_L").unwrap();
    let b = text.find("Precentral_R").unwrap();
    let c = text.find("NULL").unwrap();
    assert!(a < b && b < c);
}

#[test]
fn test_compose_file_table_all_atlases() {
    let fixture = fixture();
    let input = fixture.root.join("peaks.csv");
    fs::write(&input, "x,y,z\n1,1,1\n1,1,1\n2,2,2\n").unwrap();

    let output = run(&fixture, &["compose", input.to_str().unwrap()]);
    let text = stdout(&output);

    let aal = text.find("aal.cluster.composition").unwrap();
    let ba = text.find("ba.cluster.composition").unwrap();
    assert!(aal < ba);
    assert!(text.contains("Number of coordinates"));
    assert!(text.contains("Percentage (%)"));
    assert!(text.contains("66.7"));
    assert!(text.contains("33.3"));
    assert!(text.contains("BA6"));
}

#[test]
fn test_unknown_atlas_fails() {
    let fixture = fixture();
    let output = run(
        &fixture,
        &[
            "compose", "--atlas", "aal", "--atlas", "xyz", "--coord", "1,1,1",
        ],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown atlas name(s): xyz"));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_atlases_listing() {
    let fixture = fixture();
    let output = run(&fixture, &["atlases", "--regions"]);
    let text = stdout(&output);
    assert!(text.contains("aal"));
    assert!(text.contains("Automated Anatomical Labeling"));
    assert!(text.contains("Volume: 3x3x3 voxels"));
    assert!(text.contains("Precentral_R"));
}

#[test]
fn test_atlases_quiet_unless_verbose() {
    let fixture = fixture();
    let quiet = run(&fixture, &["atlases"]);
    stdout(&quiet);
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("Loaded atlas"));

    let verbose = run(&fixture, &["atlases", "-v"]);
    stdout(&verbose);
    assert!(String::from_utf8_lossy(&verbose.stderr).contains("Loaded atlas"));
}

#[test]
fn test_example_rejects_non_finite_radius() {
    let fixture = fixture();
    for radius in ["nan", "inf"] {
        let output = run(
            &fixture,
            &["example", "--center", "0,0,0", "--radius", radius],
        );
        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Radius must be a finite number"));
        assert!(!stderr.contains("panicked"));
    }
}

#[test]
fn test_malformed_first_row_is_reported() {
    let fixture = fixture();
    let input = fixture.root.join("peaks.csv");
    fs::write(&input, "1,2,oops\n1,1,1\n").unwrap();

    let output = run(&fixture, &["compose", input.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Line 1"));
}

#[test]
fn test_example_feeds_compose() {
    let fixture = fixture();
    let example = fixture.root.join("example.csv");
    let output = run(
        &fixture,
        &[
            "example",
            "--count",
            "12",
            "--center",
            "1,1,1",
            "--radius",
            "1",
            "--output",
            example.to_str().unwrap(),
        ],
    );
    stdout(&output);

    let csv = fs::read_to_string(&example).unwrap();
    assert_eq!(csv.lines().count(), 13);

    let output = run(
        &fixture,
        &["compose", example.to_str().unwrap(), "--format", "json"],
    );
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let table = json["ba.cluster.composition"].as_object().unwrap();
    let total: u64 = table
        .values()
        .map(|row| row["Number of coordinates"].as_u64().unwrap())
        .sum();
    assert_eq!(total, 12);
}

#[test]
fn test_missing_atlas_dir_is_reported() {
    let fixture = fixture();
    let output = Command::new(env!("CARGO_BIN_EXE_cluster-composition"))
        .env_remove("CLUSTER_ATLAS_DIR")
        .arg("--config")
        .arg(&fixture.config)
        .args(["compose", "--coord", "1,1,1"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No atlas directory configured"));
}
