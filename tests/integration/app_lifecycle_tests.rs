/*!
 * Full lifecycle tests: configuration on disk through a controller run
 */

use exhibit_linker::app_config::Config;
use exhibit_linker::app_controller::{Controller, RunOptions};
use exhibit_linker::document::Document;

use crate::common;

const EXHIBIT_MAP: &str = r#"{
    "20160217 exhibit desc": { "text": "AA p11", "url": "https://my-storage.com/files/exhibits/20160217.pdf" },
    "20190716 second exhibit": { "text": "AB p15" }
}"#;

/// Test a saved config with a relative exhibit file drives a complete run
#[test]
fn test_app_lifecycle_withConfigAndExhibitFile_shouldRelabel() {
    common::init_logging();
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path();
    common::create_test_file(dir, "exhibits.json", EXHIBIT_MAP).unwrap();
    let input = common::create_test_document(dir, "brief.json").unwrap();

    let mut config = Config::default();
    config.exhibits_file = Some("exhibits.json".to_string());
    config.relabel.output_suffix = "linked".to_string();
    let config_path = dir.join("conf.json");
    config.save(&config_path).unwrap();

    let loaded = Config::load(&config_path).unwrap();
    let controller = Controller::with_config(loaded, dir).unwrap();
    assert_eq!(controller.table().len(), 2);

    let report = controller.run(&input, &RunOptions::default()).unwrap();

    assert!(report.unused.is_empty());
    let output = Document::from_file(dir.join("brief.linked.json")).unwrap();
    assert_eq!(
        common::text_at(&output, &[0, 0]),
        "As shown in \u{201C}EXHIBIT AA p11 20160217 exhibit desc\u{201D}, the payment was made."
    );
}

/// Test links can be switched off from the configuration
#[test]
fn test_app_lifecycle_withLinksDisabled_shouldWritePlainLabels() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path();
    common::create_test_file(dir, "exhibits.json", EXHIBIT_MAP).unwrap();
    let input = common::create_test_document(dir, "brief.json").unwrap();

    let mut config = Config::default();
    config.exhibits_file = Some("exhibits.json".to_string());
    config.relabel.attach_links = false;
    let controller = Controller::with_config(config, dir).unwrap();

    let report = controller.run(&input, &RunOptions::default()).unwrap();

    assert_eq!(report.stats.links, 0);
    let output = Document::from_file(dir.join("brief.relabeled.json")).unwrap();
    assert!(!output.to_json_string().unwrap().contains("\"links\""));
}

/// Test invalid configurations are rejected before any document is touched
#[test]
fn test_app_lifecycle_withInvalidConfig_shouldFailToBuildController() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path();

    let mut bad_suffix = Config::default();
    bad_suffix.relabel.output_suffix = String::new();
    assert!(Controller::with_config(bad_suffix, dir).is_err());

    let mut missing_file = Config::default();
    missing_file.exhibits_file = Some("absent.json".to_string());
    assert!(Controller::with_config(missing_file, dir).is_err());

    common::create_test_file(dir, "bad.json", r#"{ "abc": { "text": "AA" } }"#).unwrap();
    let mut bad_key = Config::default();
    bad_key.exhibits_file = Some("bad.json".to_string());
    assert!(Controller::with_config(bad_key, dir).is_err());
}

/// Test a controller without exhibits still runs and reports every citation as a miss
#[test]
fn test_app_lifecycle_withEmptyTable_shouldReportAllMisses() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path();
    let input = common::create_test_document(dir, "brief.json").unwrap();
    let controller = Controller::with_config(Config::default(), dir).unwrap();

    let options = RunOptions {
        dry_run: true,
        ..RunOptions::default()
    };
    let report = controller.run(&input, &options).unwrap();

    assert_eq!(report.stats.replacements, 0);
    assert_eq!(report.misses.len(), 3);
    assert!(report.unused.is_empty());
}

/// Test a folder run next to the configuration skips config and exhibit map files
#[test]
fn test_app_lifecycle_withConfigInsideFolder_shouldSkipNonDocuments() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path();
    common::create_test_file(dir, "exhibits.json", EXHIBIT_MAP).unwrap();
    common::create_test_document(dir, "brief.json").unwrap();
    let mut config = Config::default();
    config.exhibits_file = Some("exhibits.json".to_string());
    let config_path = dir.join("conf.json");
    config.save(&config_path).unwrap();

    let controller = Controller::with_config(Config::load(&config_path).unwrap(), dir)
        .unwrap()
        .exclude(&config_path);
    let folder = controller.run_folder(dir, &RunOptions::default()).unwrap();

    assert_eq!(folder.failed, 0);
    assert_eq!(folder.files.len(), 1);
    assert!(folder.files[0].input.ends_with("brief.json"));
    assert!(!dir.join("conf.relabeled.json").exists());
    assert!(!dir.join("exhibits.relabeled.json").exists());
}
