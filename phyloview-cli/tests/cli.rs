use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn phyloview(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_phyloview"))
        .args(args)
        .current_dir(cwd)
        .env("RUST_LOG", "error")
        .output()
        .expect("failed to launch phyloview")
}

const TREE: &str = r#"{
  "strain": "root",
  "attr": {"div": 0, "num_date": 2010.0},
  "children": [
    {"strain": "A", "attr": {"div": 0.01, "num_date": 2012.0, "authors": "smith", "country": "brazil"}},
    {"strain": "B", "attr": {"div": 0.02, "num_date": 2013.5, "country": "usa"}}
  ]
}"#;

#[test]
fn grid_json_output() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("scales.json"),
        r#"{"x": {"domain": [0, 10], "range": [0, 500]}, "y": {"domain": [0, 30], "range": [0, 400]}}"#,
    )
    .unwrap();

    let out = phyloview(&["grid", "--scales", "scales.json", "--layout", "rect", "--format", "json"], dir.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let grid: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(grid["step"], 2.0);
    assert!(grid["major_paths"].as_array().unwrap().len() >= 6);
}

#[test]
fn newick_and_tables_are_written() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("tree.json"), TREE).unwrap();
    fs::write(
        dir.path().join("meta.json"),
        r#"{"author_info": {"smith": {"n": 1, "title": "zika, in brazil", "journal": "Nature"}}}"#,
    )
    .unwrap();

    for args in [
        vec!["newick", "--tree", "tree.json", "--prefix", "zika"],
        vec!["newick", "--tree", "tree.json", "--prefix", "zika", "--temporal"],
        vec!["metadata", "--tree", "tree.json", "--prefix", "zika"],
        vec!["authors", "--tree", "tree.json", "--meta", "meta.json", "--prefix", "zika"],
    ] {
        let out = phyloview(&args, dir.path());
        assert!(out.status.success(), "{:?}: {}", args, String::from_utf8_lossy(&out.stderr));
    }

    assert_eq!(fs::read_to_string(dir.path().join("zika_tree.nwk")).unwrap(), "(A:0.01,B:0.02)root;");
    assert_eq!(fs::read_to_string(dir.path().join("zika_timetree.nwk")).unwrap(), "(A:2,B:3.5)root;");

    let metadata = fs::read_to_string(dir.path().join("zika_metadata.tsv")).unwrap();
    assert_eq!(metadata.lines().count(), 3);
    assert!(metadata.starts_with("Strain\t"));

    let authors = fs::read_to_string(dir.path().join("zika_authors.tsv")).unwrap();
    assert_eq!(authors.lines().nth(1), Some("smith\t1\tZika In Brazil\tNature\tunknown\tA"));
}

#[test]
fn svg_snapshot_is_composed() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("panels.json"),
        r#"{"panels": {"tree": "<svg width=\"300\" height=\"200\"><g/></svg>"}, "caption": ["Zika virus"]}"#,
    )
    .unwrap();

    let out = phyloview(&["svg", "--snapshot", "panels.json", "--out-dir", "figs"], dir.path());
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let doc = fs::read_to_string(dir.path().join("figs").join("nextstrain.svg")).unwrap();
    assert!(doc.contains(r#"width="400" height="356""#));
    assert!(doc.contains("\nZika virus\n"));
}

#[test]
fn dataset_options_are_listed() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("datasets.json"),
        r#"[["flu", "h3n2", "ha"], ["flu", "h1n1pdm", "ha"], ["zika"]]"#,
    )
    .unwrap();

    let out = phyloview(&["options", "--available", "datasets.json", "--selected", "flu/h3n2"], dir.path());
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["0\tflu\tflu, zika", "1\th3n2\th3n2, h1n1pdm"]);
}

#[test]
fn missing_input_reports_suggestions() {
    let dir = tempfile::tempdir().unwrap();
    let out = phyloview(&["newick", "--tree", "nope.json"], dir.path());
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("File not found"));
    assert!(stderr.contains("Suggestions:"));
}

#[test]
fn example_config_is_printed() {
    let dir = tempfile::tempdir().unwrap();
    let out = phyloview(&["config", "--example"], dir.path());
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("[export]"));
    assert!(stdout.contains("minor_ticks = 4"));
}
