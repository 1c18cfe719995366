use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use districtmap::{CodeTable, Dataset, Pipeline, PipelineConfig, Stage};
use serde_json::{json, Value};
use tempfile::tempdir;

fn square(x: f64, y: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[[x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0], [x, y]]],
    })
}

fn feature(properties: Value, geometry: Value) -> Value {
    json!({ "type": "Feature", "properties": properties, "geometry": geometry })
}

fn write_collection(path: &Path, features: Vec<Value>) {
    let collection = json!({ "type": "FeatureCollection", "features": features });
    fs::write(path, serde_json::to_vec_pretty(&collection).unwrap()).unwrap();
}

fn read_collection(path: &Path) -> Vec<Value> {
    let value: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
    value["features"].as_array().unwrap().clone()
}

fn pipeline() -> Pipeline {
    Pipeline::new(CodeTable::builtin(), PipelineConfig::default())
}

fn districts() -> Dataset {
    Dataset::Districts { scheme: None, congress: None }
}

fn census(district: &str, geometry: Value) -> Value {
    feature(json!({ "STATEFP": "17", "CDSESSN": "115", "CD115FP": district }), geometry)
}

fn color_of<'a>(features: &'a [Value], id: &str, group: &str) -> &'a Value {
    &features.iter()
        .find(|f| f["properties"]["id"] == id && f["properties"]["group"] == group)
        .unwrap_or_else(|| panic!("no {group} for {id}"))["properties"]["colorClass"]
}

/// A 3x3 grid of census districts, numbered row by row from 1.
fn grid() -> Vec<Value> {
    (0..9)
        .map(|i| census(&format!("{:02}", i + 1), square((i % 3) as f64, (i / 3) as f64)))
        .collect()
}

#[test]
fn reruns_are_byte_identical() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("districts.geojson");
    write_collection(&input, grid());

    let first = dir.path().join("first.geojson");
    let second = dir.path().join("second.geojson");
    pipeline().run_file(&input, &first, &districts()).unwrap();
    let sequential = Pipeline::new(CodeTable::builtin(), PipelineConfig { parallel: false, ..Default::default() });
    sequential.run_file(&input, &second, &districts()).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn grid_is_properly_colored_and_labelled() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("districts.geojson");
    let output = dir.path().join("out.geojson");
    write_collection(&input, grid());

    let report = pipeline().run_file(&input, &output, &districts()).unwrap();
    assert_eq!(report.boundaries, 9);
    assert_eq!(report.labels, 9);
    assert_eq!(report.edges, 12);
    assert!(report.colors_used <= 5);

    let features = read_collection(&output);
    assert_eq!(features.len(), 18);

    // Edge-sharing neighbors in the grid differ; the center touches four.
    let center = color_of(&features, "IL05", "boundary");
    for neighbor in ["IL02", "IL04", "IL06", "IL08"] {
        assert_ne!(color_of(&features, neighbor, "boundary"), center, "{neighbor}");
    }
    for f in &features {
        let props = &f["properties"];
        if props["group"] == "label" {
            assert_eq!(f["geometry"]["type"], "Point");
            assert_eq!(props["colorClass"], *color_of(&features, props["id"].as_str().unwrap(), "boundary"));
        }
    }

    let first = &features[0]["properties"];
    assert_eq!(first["titleShort"], "IL 1");
    assert_eq!(first["titleLong"], "Illinois's 1st Congressional District");
    assert_eq!(first["entity"], "district");
}

#[test]
fn corner_contact_does_not_force_distinct_colors() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("districts.geojson");
    let output = dir.path().join("out.geojson");
    write_collection(&input, vec![census("01", square(0.0, 0.0)), census("02", square(1.0, 1.0))]);

    let report = pipeline().run_file(&input, &output, &districts()).unwrap();
    assert_eq!(report.edges, 0);

    let features = read_collection(&output);
    assert_eq!(color_of(&features, "IL01", "boundary"), color_of(&features, "IL02", "boundary"));
}

#[test]
fn composite_codes_with_congress_filter() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("districts.geojson");
    let output = dir.path().join("out.geojson");
    write_collection(&input, vec![
        feature(json!({ "ID": "002086114000" }), square(0.0, 0.0)),
        feature(json!({ "ID": "036080082012" }), square(5.0, 0.0)),
        feature(json!({ "ID": "036083087012" }), square(5.0, 0.0)),
        feature(json!({ "ID": "004001010-01" }), square(9.0, 0.0)),
    ]);

    let dataset = Dataset::Districts { scheme: None, congress: Some(86) };
    let report = pipeline().run_file(&input, &output, &dataset).unwrap();
    assert_eq!(report.skipped, 1);
    assert_eq!(report.filtered, 1);

    let features = read_collection(&output);
    let ids = features.iter()
        .filter(|f| f["properties"]["group"] == "boundary")
        .map(|f| f["properties"]["id"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["AK00@086-114", "NY12@083-087"]);

    let alaska = &features[0]["properties"];
    assert_eq!(alaska["titleShort"], "AK At Large");
    assert_eq!(alaska["district"], 0);
    assert_eq!(alaska["startDate"], "1959-01-01");
}

fn state(id: &str, version: &str, start: &str, end: &str, x: f64) -> Value {
    feature(
        json!({
            "ID": id, "VERSION": version, "FULL_NAME": "Virginia", "ABBR_NAME": "VA",
            "START_DATE": start, "END_DATE": end,
        }),
        square(x, 0.0),
    )
}

fn states() -> Vec<Value> {
    vec![
        state("va_state", "1", "1789/01/01", "1792/12/31", 0.0),
        state("va_state", "2", "1793/01/01", "1795/12/31", 0.0),
        state("ky_state", "1", "1792/06/01", "1795/12/31", 1.0),
    ]
}

fn run_states(as_of: NaiveDate) -> Vec<Value> {
    let dir = tempdir().unwrap();
    let input = dir.path().join("states.geojson");
    let output = dir.path().join("out.geojson");
    write_collection(&input, states());
    pipeline().run_file(&input, &output, &Dataset::StateVersions { as_of }).unwrap();
    read_collection(&output)
}

fn versions(features: &[Value]) -> Vec<(String, String)> {
    features.iter()
        .filter(|f| f["properties"]["group"] == "boundary")
        .map(|f| {
            let p = &f["properties"];
            (p["id"].as_str().unwrap().to_string(), p["version"].as_str().unwrap().to_string())
        })
        .collect()
}

#[test]
fn states_pick_the_version_in_force() {
    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    let pair = |id: &str, v: &str| (id.to_string(), v.to_string());

    assert_eq!(versions(&run_states(date(1792, 12, 31))), vec![pair("va_state", "1"), pair("ky_state", "1")]);
    assert_eq!(versions(&run_states(date(1793, 1, 1))), vec![pair("va_state", "2"), pair("ky_state", "1")]);
    assert_eq!(versions(&run_states(date(1790, 1, 1))), vec![pair("va_state", "1")]);
    assert_eq!(versions(&run_states(date(2050, 1, 1))), vec![pair("va_state", "2"), pair("ky_state", "1")]);
}

#[test]
fn failed_runs_leave_no_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("states.geojson");
    let output = dir.path().join("out.geojson");
    let mut features = states();
    features.push(state("va_state", "3", "1794/01/01", "1796/12/31", 0.0));
    write_collection(&input, features);

    let as_of = NaiveDate::from_ymd_opt(1795, 6, 1).unwrap();
    let err = pipeline().run_file(&input, &output, &Dataset::StateVersions { as_of }).unwrap_err();
    let cause = err.downcast_ref::<districtmap::PipelineError>().unwrap();
    assert_eq!(cause.stage, Stage::Temporal);
    assert_eq!(cause.affected, 2);
    assert!(!output.exists());
}

#[test]
fn labels_are_added_only_where_missing() {
    let dir = tempdir().unwrap();
    let prepared = dir.path().join("prepared.geojson");
    let output = dir.path().join("labelled.geojson");

    let mut features = vec![
        feature(json!({ "id": "IL01", "titleShort": "IL 1", "group": "boundary", "colorClass": 3 }), square(0.0, 0.0)),
        feature(json!({ "id": "IL01", "titleShort": "IL 1", "group": "label", "colorClass": 3 }),
            json!({ "type": "Point", "coordinates": [0.25, 0.25] })),
        feature(json!({ "id": "IL02", "titleShort": "IL 2", "group": "boundary", "colorClass": 1 }), square(1.0, 0.0)),
    ];
    features.push(feature(json!({ "id": "IL03", "titleShort": "IL 3", "group": "boundary" }), Value::Null));
    write_collection(&prepared, features);

    let report = pipeline().run_file(&prepared, &output, &Dataset::Labels).unwrap();
    assert_eq!(report.existing_labels, 1);
    assert_eq!(report.labels, 1);
    assert_eq!(report.degenerate.len(), 1);

    let out = read_collection(&output);
    assert_eq!(out.len(), 5);
    let labels = out.iter().filter(|f| f["properties"]["group"] == "label").collect::<Vec<_>>();
    assert_eq!(labels.len(), 2);
    assert_eq!(labels[0]["geometry"]["coordinates"], json!([0.25, 0.25]));
    assert_eq!(labels[1]["properties"]["id"], "IL02");
    assert_eq!(labels[1]["properties"]["colorClass"], 1);
    let point = labels[1]["geometry"]["coordinates"].as_array().unwrap();
    assert!((point[0].as_f64().unwrap() - 1.5).abs() < 1e-9);
    assert!((point[1].as_f64().unwrap() - 0.5).abs() < 1e-9);
    assert_eq!(out[2]["properties"]["id"], "IL03");
    assert!(out[2]["geometry"].is_null());
}

#[test]
fn line_delimited_streams() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("districts.geojsonl");
    let output = dir.path().join("out.ndjson");
    let lines = grid().iter().map(|f| serde_json::to_string(f).unwrap()).collect::<Vec<_>>().join("\n");
    fs::write(&input, lines).unwrap();

    pipeline().run_file(&input, &output, &districts()).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(text.lines().count(), 18);
    for line in text.lines() {
        let value: Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["type"], "Feature");
    }
}
