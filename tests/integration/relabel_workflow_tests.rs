/*!
 * End-to-end tests for relabeling document files
 */

use exhibit_linker::app_config::Config;
use exhibit_linker::app_controller::{Controller, RunOptions};
use exhibit_linker::document::Document;

use crate::common;

fn sample_controller() -> Controller {
    Controller::with_table(Config::default(), common::sample_table())
}

/// Test a single file run writes a sibling output and leaves the input alone
#[test]
fn test_run_withSampleDocument_shouldWriteRelabeledSibling() {
    common::init_logging();
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_document(temp_dir.path(), "brief.json").unwrap();
    let original = std::fs::read_to_string(&input).unwrap();

    let report = sample_controller().run(&input, &RunOptions::default()).unwrap();

    let output = temp_dir.path().join("brief.relabeled.json");
    assert!(output.exists());
    assert_eq!(std::fs::read_to_string(&input).unwrap(), original);
    assert_eq!(report.stats.replacements, 2);
    assert_eq!(report.stats.links, 1);
    assert_eq!(report.misses, vec!["20990101 unknown".to_string()]);
    assert_eq!(report.unused, vec!["20200101 never cited".to_string()]);

    let relabeled = Document::from_file(&output).unwrap();
    assert_eq!(
        common::text_at(&relabeled, &[1, 1]),
        r#"See "EXHIBIT AB p15 20190716 second exhibit" and "EXHIBIT - 20990101 unknown"."#
    );
    let linked = relabeled
        .node(&vec![0, 0].into())
        .unwrap()
        .as_text()
        .unwrap()
        .clone();
    assert_eq!(&linked.text[linked.links[0].range()], "EXHIBIT AA p11");
}

/// Test an existing output is not overwritten without force
#[test]
fn test_run_withExistingOutput_shouldSkipUnlessForced() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_document(temp_dir.path(), "brief.json").unwrap();
    let output = common::create_test_file(temp_dir.path(), "brief.relabeled.json", "keep").unwrap();
    let controller = sample_controller();

    let report = controller.run(&input, &RunOptions::default()).unwrap();
    assert_eq!(report.stats.replacements, 0);
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "keep");

    let forced = RunOptions {
        force_overwrite: true,
        ..RunOptions::default()
    };
    let report = controller.run(&input, &forced).unwrap();
    assert_eq!(report.stats.replacements, 2);
    assert!(Document::from_file(&output).is_ok());
}

/// Test a dry run reports changes but writes nothing
#[test]
fn test_run_withDryRun_shouldNotWrite() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_document(temp_dir.path(), "brief.json").unwrap();
    let options = RunOptions {
        dry_run: true,
        ..RunOptions::default()
    };

    let report = sample_controller().run(&input, &options).unwrap();

    assert_eq!(report.stats.replacements, 2);
    assert!(!temp_dir.path().join("brief.relabeled.json").exists());
}

/// Test in-place mode rewrites the input and a second run changes nothing
#[test]
fn test_run_withInPlace_shouldRewriteInputOnce() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_document(temp_dir.path(), "brief.json").unwrap();
    let options = RunOptions {
        in_place: true,
        ..RunOptions::default()
    };
    let controller = sample_controller();

    controller.run(&input, &options).unwrap();
    let after_first = std::fs::read_to_string(&input).unwrap();
    assert!(after_first.contains("EXHIBIT AA p11 20160217 exhibit desc"));
    assert!(!temp_dir.path().join("brief.relabeled.json").exists());

    let second = controller.run(&input, &options).unwrap();
    assert_eq!(std::fs::read_to_string(&input).unwrap(), after_first);
    assert_eq!(second.stats.replacements, 0);
    assert_eq!(second.stats.rewritten_nodes, 0);
    assert_eq!(second.stats.links, 0);
    assert_eq!(second.unused, vec!["20200101 never cited".to_string()]);
}

/// Test a folder run shares usage across files and survives a broken file
#[test]
fn test_run_folder_withSeveralDocuments_shouldAggregateUsage() {
    common::init_logging();
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path();
    common::create_test_document(dir, "a.json").unwrap();
    common::create_test_file(
        dir,
        "b.json",
        r#"{ "body": { "type": "text", "text": "\"EXH 20200101 never cited\"" } }"#,
    )
    .unwrap();
    common::create_test_file(dir, "broken.json", "{ not json").unwrap();
    common::create_test_file(dir, "notes.txt", "\"EXH 20200101 never cited\"").unwrap();

    let folder = sample_controller()
        .run_folder(dir, &RunOptions::default())
        .unwrap();

    assert_eq!(folder.files.len(), 2);
    assert_eq!(folder.failed, 1);
    assert_eq!(folder.stats.replacements, 3);
    assert!(folder.unused.is_empty());
    assert!(dir.join("a.relabeled.json").exists());
    assert!(dir.join("b.relabeled.json").exists());

    let b = Document::from_file(dir.join("b.relabeled.json")).unwrap();
    assert_eq!(b.body.as_text().unwrap().text, r#""EXHIBIT AC p20 20200101 never cited""#);
}

/// Test that a second folder run does not pick up its own outputs
#[test]
fn test_run_folder_withPreviousOutputs_shouldIgnoreThem() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path();
    common::create_test_document(dir, "a.json").unwrap();
    let options = RunOptions {
        force_overwrite: true,
        ..RunOptions::default()
    };
    let controller = sample_controller();

    controller.run_folder(dir, &options).unwrap();
    let second = controller.run_folder(dir, &options).unwrap();

    assert_eq!(second.files.len(), 1);
    assert!(!dir.join("a.relabeled.relabeled.json").exists());
}

/// Test a missing folder is an error
#[test]
fn test_run_folder_withMissingDirectory_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let missing = temp_dir.path().join("nope");
    assert!(sample_controller()
        .run_folder(&missing, &RunOptions::default())
        .is_err());
}
