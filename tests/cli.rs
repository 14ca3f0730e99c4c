//! Drives the binary against a manual with the full chapter structure.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

/// A miniature manual with the same part structure as the real one:
/// five chapters, the symbology chapter with seven sub-sections, the legal
/// chapter and two appendices.
fn manual() -> String {
    let mut doc = String::new();
    for i in 1..=5 {
        doc.push_str(&format!(
            "<h1 id=\"ch{i}\">Chapter {i} Title</h1>\n<p>chapter {i} body</p>\n"
        ));
    }
    doc.push_str(
        "<h1 id=\"types-of-symbology\">Types of Symbology</h1>\n<p>symbology overview</p>\n",
    );
    for i in 1..=7 {
        doc.push_str(&format!(
            "<h2 id=\"sym{i}\">Family {i}</h2>\n<p>family {i} body</p>\n"
        ));
    }
    doc.push_str(
        "<h1 id=\"legal-and-version-information\">Legal</h1>\n<p>legal body</p>\n",
    );
    doc.push_str("<h1 id=\"appendix-a\">Appendix A</h1>\n<p>appendix a body</p>\n");
    doc.push_str("<h1 id=\"appendix-b\">Appendix B</h1>\n<p>appendix b body</p>\n");
    doc
}

#[test]
fn writes_one_fragment_per_manual_part() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("manual.html");
    fs::write(&input, manual()).unwrap();

    let mut cmd = Command::cargo_bin("chapterhtml").unwrap();
    cmd.arg(&input).arg("--out-dir").arg(dir.path());
    cmd.assert().success();

    let chapter1 = fs::read_to_string(dir.path().join("chapter1.html")).unwrap();
    assert!(chapter1.contains("chapter 1 body"));
    assert!(!chapter1.contains("Chapter 1 Title"));
    assert!(chapter1.contains("<section class=\"container\">"));

    let chapter6_3 = fs::read_to_string(dir.path().join("chapter6.3.html")).unwrap();
    assert!(chapter6_3.contains("<h3 id=\"sym3\">Family 3</h3>"));
    assert!(chapter6_3.contains("family 3 body"));

    let appendix_b = fs::read_to_string(dir.path().join("appendixb.html")).unwrap();
    assert!(appendix_b.contains("appendix b body"));
}

#[test]
fn wrong_chapter_count_fails_with_a_message() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("manual.html");
    fs::write(&input, "<h1 id=\"only\">Only</h1>\n<p>x</p>\n").unwrap();

    let mut cmd = Command::cargo_bin("chapterhtml").unwrap();
    cmd.arg(&input).arg("--out-dir").arg(dir.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("output names are configured"));
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("chapterhtml").unwrap();
    cmd.arg(dir.path().join("nonexistent.html"));
    cmd.assert().failure();
}
