use renumber::config::{self, CheckpointConfig, LoadedConfig, RenumberConfig, CONFIG_FILE_NAME};
use renumber::counter::CounterPolicy;
use renumber::renumber::{run, RenumberOptions};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const JAVA: &str = "class KlingonContentDatabase {\n  public static final int ID_OF_FIRST_EXTRA_ENTRY = 1;\n}\n";

fn entry(name: &str, id: &str) -> String {
    format!(
        "  <table name=\"mem\">\n    <column name=\"_id\">{}</column>\n    <column name=\"entry_name\">{}</column>\n  </table>\n",
        id, name
    )
}

fn write_layout(dir: &Path) {
    fs::write(
        dir.join("mem-01-b.xml"),
        format!("{}{}", entry("bach", "3"), entry("bIng", "")),
    )
    .unwrap();
    fs::write(dir.join("mem-02-ch.xml"), entry("chab", "99")).unwrap();
    fs::write(
        dir.join("mem-27-extra.xml"),
        format!("{}{}", entry("extra1", "0"), entry("extra2", "0")),
    )
    .unwrap();
    fs::create_dir(dir.join("src")).unwrap();
    fs::write(dir.join("src/KlingonContentDatabase.java"), JAVA).unwrap();
}

fn layout_config(policy: CounterPolicy) -> RenumberConfig {
    RenumberConfig {
        files: vec![
            "mem-01-b.xml".to_string(),
            "mem-02-ch.xml".to_string(),
            "mem-27-extra.xml".to_string(),
        ],
        policy,
        checkpoint: Some(CheckpointConfig {
            file: "mem-27-extra.xml".to_string(),
            target: "src/KlingonContentDatabase.java".to_string(),
            constant: "ID_OF_FIRST_EXTRA_ENTRY".to_string(),
        }),
    }
}

fn ids_in(path: &Path) -> Vec<u64> {
    let content = fs::read_to_string(path).unwrap();
    content
        .lines()
        .filter_map(|line| {
            let start = line.find("_id\">")? + 5;
            let end = start + line[start..].find('<')?;
            line[start..end].parse().ok()
        })
        .collect()
}

#[test]
fn sequential_run_renumbers_and_propagates_checkpoint() {
    let dir = tempdir().unwrap();
    write_layout(dir.path());
    let loaded = LoadedConfig::in_dir(
        dir.path(),
        layout_config(CounterPolicy::Sequential { base: 10_000 }),
    )
    .unwrap();

    let report = run(&loaded, &RenumberOptions::default()).unwrap();

    assert_eq!(ids_in(&dir.path().join("mem-01-b.xml")), vec![10_000, 10_001]);
    assert_eq!(ids_in(&dir.path().join("mem-02-ch.xml")), vec![10_002]);
    assert_eq!(ids_in(&dir.path().join("mem-27-extra.xml")), vec![10_003, 10_004]);

    assert_eq!(report.renumber.total_substitutions, 5);
    assert_eq!(report.renumber.next_id, Some(10_005));
    let checkpoint = report.renumber.checkpoint.as_ref().unwrap();
    assert_eq!(checkpoint.value, 10_003);

    let propagation = report.propagation.as_ref().unwrap();
    assert!(propagation.stats.replaced);
    assert_eq!(propagation.stats.previous_value.as_deref(), Some("1"));
    assert_eq!(
        fs::read_to_string(dir.path().join("src/KlingonContentDatabase.java")).unwrap(),
        JAVA.replace("= 1;", "= 10003;")
    );
}

#[test]
fn block_run_gives_each_file_its_own_block() {
    let dir = tempdir().unwrap();
    write_layout(dir.path());
    let loaded = LoadedConfig::in_dir(
        dir.path(),
        layout_config(CounterPolicy::Block {
            base: 10_000,
            block_size: 10_000,
            step: 10,
        }),
    )
    .unwrap();

    let report = run(&loaded, &RenumberOptions::default()).unwrap();

    assert_eq!(ids_in(&dir.path().join("mem-01-b.xml")), vec![10_000, 10_010]);
    assert_eq!(ids_in(&dir.path().join("mem-02-ch.xml")), vec![20_000]);
    assert_eq!(ids_in(&dir.path().join("mem-27-extra.xml")), vec![30_000, 30_010]);
    assert_eq!(report.renumber.checkpoint.unwrap().value, 30_000);
    assert_eq!(report.renumber.policy, "block");
}

#[test]
fn other_lines_are_byte_identical() {
    let dir = tempdir().unwrap();
    write_layout(dir.path());
    let before = fs::read_to_string(dir.path().join("mem-01-b.xml")).unwrap();
    let loaded = LoadedConfig::in_dir(
        dir.path(),
        layout_config(CounterPolicy::Sequential { base: 10_000 }),
    )
    .unwrap();

    run(&loaded, &RenumberOptions::default()).unwrap();

    let after = fs::read_to_string(dir.path().join("mem-01-b.xml")).unwrap();
    let changed: Vec<(&str, &str)> = before
        .lines()
        .zip(after.lines())
        .filter(|(b, a)| b != a)
        .collect();
    assert_eq!(changed.len(), 2);
    assert!(changed.iter().all(|(b, _)| b.contains("_id\">")));
    assert_eq!(before.lines().count(), after.lines().count());
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempdir().unwrap();
    write_layout(dir.path());
    let original = fs::read_to_string(dir.path().join("mem-02-ch.xml")).unwrap();
    let loaded = LoadedConfig::in_dir(
        dir.path(),
        layout_config(CounterPolicy::Sequential { base: 10_000 }),
    )
    .unwrap();

    let options = RenumberOptions {
        dry_run: true,
        skip_propagate: false,
    };
    let report = run(&loaded, &options).unwrap();

    assert!(report.renumber.files.iter().all(|f| f.changed && !f.written));
    assert_eq!(
        fs::read_to_string(dir.path().join("mem-02-ch.xml")).unwrap(),
        original
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("src/KlingonContentDatabase.java")).unwrap(),
        JAVA
    );
    assert!(!report.propagation.unwrap().written);
}

#[test]
fn second_run_leaves_files_unwritten() {
    let dir = tempdir().unwrap();
    write_layout(dir.path());
    let loaded = LoadedConfig::in_dir(
        dir.path(),
        layout_config(CounterPolicy::Sequential { base: 10_000 }),
    )
    .unwrap();

    run(&loaded, &RenumberOptions::default()).unwrap();
    let report = run(&loaded, &RenumberOptions::default()).unwrap();

    assert!(report.renumber.files.iter().all(|f| !f.changed && !f.written));
    assert!(!report.propagation.unwrap().changed);
}

#[test]
fn missing_data_file_aborts_before_any_write() {
    let dir = tempdir().unwrap();
    write_layout(dir.path());
    fs::remove_file(dir.path().join("mem-02-ch.xml")).unwrap();
    let original = fs::read_to_string(dir.path().join("mem-01-b.xml")).unwrap();
    let loaded = LoadedConfig::in_dir(
        dir.path(),
        layout_config(CounterPolicy::Sequential { base: 10_000 }),
    )
    .unwrap();

    let err = run(&loaded, &RenumberOptions::default()).unwrap_err();

    assert_eq!(err.code.as_str(), "data.file_not_found");
    assert_eq!(
        fs::read_to_string(dir.path().join("mem-01-b.xml")).unwrap(),
        original
    );
}

#[test]
fn missing_anchor_is_reported_not_failed() {
    let dir = tempdir().unwrap();
    write_layout(dir.path());
    fs::write(
        dir.path().join("src/KlingonContentDatabase.java"),
        "class KlingonContentDatabase {}\n",
    )
    .unwrap();
    let loaded = LoadedConfig::in_dir(
        dir.path(),
        layout_config(CounterPolicy::Sequential { base: 10_000 }),
    )
    .unwrap();

    let report = run(&loaded, &RenumberOptions::default()).unwrap();

    let propagation = report.propagation.unwrap();
    assert!(!propagation.stats.replaced);
    assert!(!propagation.written);
}

#[test]
fn skip_propagate_still_reports_checkpoint() {
    let dir = tempdir().unwrap();
    write_layout(dir.path());
    let loaded = LoadedConfig::in_dir(
        dir.path(),
        layout_config(CounterPolicy::Sequential { base: 500 }),
    )
    .unwrap();

    let options = RenumberOptions {
        dry_run: false,
        skip_propagate: true,
    };
    let report = run(&loaded, &options).unwrap();

    assert_eq!(report.renumber.checkpoint.unwrap().value, 503);
    assert!(report.propagation.is_none());
    assert_eq!(
        fs::read_to_string(dir.path().join("src/KlingonContentDatabase.java")).unwrap(),
        JAVA
    );
}

#[test]
fn config_file_round_trip_drives_run() {
    let dir = tempdir().unwrap();
    write_layout(dir.path());
    let path = dir.path().join(CONFIG_FILE_NAME);
    config::save(
        &path,
        &layout_config(CounterPolicy::Sequential { base: 10_000 }),
    )
    .unwrap();

    let loaded = config::load(&path).unwrap();
    let report = run(&loaded, &RenumberOptions::default()).unwrap();

    assert_eq!(report.renumber.files.len(), 3);
    assert_eq!(report.renumber.files[0].stats.first_id, Some(10_000));
}
