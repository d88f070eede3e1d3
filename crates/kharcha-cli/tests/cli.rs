//! Command-line behaviour of the `kharcha` binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

const SWIGGY: &str = "Paid ₹664.70\nSwiggy\nBill Total ₹664.70\nDelivered\n";
const GPAY: &str = "Google Pay\nPaid to Vi Prepaid\n₹299\nCompleted\n11 Jan 2026\n";
const ICICI_SMS: &str = "INR 2664.00 spent using ICICI Bank Card XX9006 on 11-Jan-26 on AMAZON PAY";

fn kharcha() -> Command {
    Command::cargo_bin("kharcha").unwrap()
}

#[test]
fn test_parse_text_file_as_json() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("swiggy.txt");
    fs::write(&input, SWIGGY).unwrap();

    kharcha()
        .arg("parse")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"amount\": \"664.70\""))
        .stdout(predicate::str::contains("\"source\": \"Swiggy\""))
        .stdout(predicate::str::contains("\"needsReview\": false"));
}

#[test]
fn test_parse_ocr_json_output() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("gpay.json");
    fs::write(&input, serde_json::json!({ "text": GPAY, "confidence": 0.93 }).to_string()).unwrap();

    kharcha()
        .args(["parse", "--format", "csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("id,amount,currency,merchant"))
        .stdout(predicate::str::contains("299.00,INR,Vi Prepaid,Utilities"));
}

#[test]
fn test_parse_sms_from_stdin() {
    kharcha()
        .args(["parse", "--sms", "--format", "text", "-"])
        .write_stdin(ICICI_SMS)
        .assert()
        .success()
        .stdout(predicate::str::contains("₹2664.00 at Amazon"))
        .stdout(predicate::str::contains("Source:     ICICI Bank"));
}

#[test]
fn test_parse_without_expense_prints_hint() {
    kharcha()
        .args(["parse", "-"])
        .write_stdin("Hello there, nothing to see")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No expense found"));
}

#[test]
fn test_parse_explain() {
    kharcha()
        .args(["parse", "--explain", "-"])
        .write_stdin(SWIGGY)
        .assert()
        .success()
        .stderr(predicate::str::contains("Document type: Food delivery"))
        .stderr(predicate::str::contains("Extractor: food_delivery"));
}

#[test]
fn test_parse_missing_file() {
    kharcha()
        .args(["parse", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_normalize_stages() {
    kharcha()
        .args(["normalize", "--stage", "repair", "-"])
        .write_stdin("Total  Amount  61200")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Amount ₹612.00"));

    kharcha()
        .args(["normalize", "-"])
        .write_stdin("Order ID 9988776655\nTOTAL ₹50")
        .assert()
        .success()
        .stdout(predicate::str::contains("order id ____\ntotal ₹50"));
}

#[test]
fn test_batch_skips_duplicates_and_writes_summary() {
    let dir = tempdir().unwrap();
    let inputs = dir.path().join("in");
    let outputs = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("a.txt"), SWIGGY).unwrap();
    fs::write(inputs.join("b.txt"), GPAY).unwrap();
    fs::write(inputs.join("c.txt"), SWIGGY).unwrap();
    fs::write(inputs.join("d.txt"), "nothing useful in here").unwrap();

    kharcha()
        .arg("batch")
        .arg(format!("{}/*.txt", inputs.display()))
        .arg("--output-dir")
        .arg(&outputs)
        .args(["--summary", "-j", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 4 files"))
        .stdout(predicate::str::contains("1 duplicates skipped"));

    assert!(outputs.join("a.json").exists());
    assert!(outputs.join("b.json").exists());
    assert!(!outputs.join("c.json").exists());
    assert!(!outputs.join("d.json").exists());

    let summary = fs::read_to_string(outputs.join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 4);
    assert!(summary.contains("a.txt,found"));
    assert!(summary.contains("d.txt,not_found"));
}

#[test]
fn test_batch_continue_on_error_records_failures() {
    let dir = tempdir().unwrap();
    let inputs = dir.path().join("in");
    let outputs = dir.path().join("out");
    fs::create_dir_all(&inputs).unwrap();
    fs::write(inputs.join("good.txt"), SWIGGY).unwrap();
    fs::write(inputs.join("broken.json"), "{ not an ocr result").unwrap();

    kharcha()
        .arg("batch")
        .arg(format!("{}/*", inputs.display()))
        .arg("--output-dir")
        .arg(&outputs)
        .args(["--summary", "--continue-on-error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 failed"))
        .stdout(predicate::str::contains("broken.json"));

    assert!(outputs.join("good.json").exists());
    let summary = fs::read_to_string(outputs.join("summary.csv")).unwrap();
    assert_eq!(summary.lines().count(), 3);
    assert!(summary.contains("broken.json,error"));
    assert!(summary.contains("good.txt,found"));
}

#[test]
fn test_batch_stops_on_first_error_by_default() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), SWIGGY).unwrap();
    fs::write(dir.path().join("b.json"), "[1, 2").unwrap();

    kharcha()
        .arg("batch")
        .arg(format!("{}/*", dir.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Processing failed"));
}

#[test]
fn test_config_lifecycle() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let path = path.to_str().unwrap();

    kharcha().args(["--config", path, "config", "init"]).assert().success();
    kharcha()
        .args(["--config", path, "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    kharcha()
        .args(["--config", path, "config", "set", "extraction.review_threshold", "0.5"])
        .assert()
        .success();
    kharcha()
        .args(["--config", path, "config", "get", "extraction.review_threshold"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.5"));

    kharcha()
        .args(["--config", path, "config", "set", "extraction.review_threshold", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("review_threshold"));

    kharcha()
        .args(["--config", path, "config", "get", "extraction.nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}
