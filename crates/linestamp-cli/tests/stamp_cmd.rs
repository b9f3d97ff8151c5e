//! Integration tests for the `linestamp` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

fn cmd() -> Command {
    Command::cargo_bin("linestamp").unwrap()
}

/// Create a multi-page PDF. Each page gets one content stream.
fn pdf_with_pages(contents: &[&str]) -> Vec<u8> {
    use lopdf::{Object, Stream, dictionary};

    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let media_box = vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ];

    let mut page_ids = Vec::new();
    for content in contents {
        let stream = Stream::new(dictionary! {}, content.as_bytes().to_vec());
        let content_id = doc.add_object(stream);

        let resources = dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        };

        let page_dict = dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => Object::Reference(content_id),
            "Resources" => resources,
        };
        page_ids.push(doc.add_object(page_dict));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => Object::Integer(contents.len() as i64),
    };
    let pages_id = doc.add_object(pages_dict);

    for &pid in &page_ids {
        if let Ok(page_obj) = doc.get_object_mut(pid) {
            if let Ok(dict) = page_obj.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

const TWO_LINES: &str = "BT /F1 12 Tf 72 700 Td (first line) Tj 0 -50 Td (second line) Tj ET";
const THREE_LINES: &str =
    "BT /F1 12 Tf 72 700 Td (one) Tj 0 -50 Td (two) Tj 0 -50 Td (three) Tj ET";

/// All numbers stamped into a page, in content order.
fn stamped_numbers(output: &Path, page: u32) -> Vec<u64> {
    let doc = lopdf::Document::load(output).unwrap();
    let page_id = *doc.get_pages().get(&page).unwrap();
    let content = doc.get_page_content(page_id).unwrap();
    let text = String::from_utf8_lossy(&content);

    // Overlay streams show numbers as "(N) Tj" preceded by a Tm at the
    // stamp x position; original text never starts at x=30 in fixtures.
    text.lines()
        .filter(|l| l.starts_with("1 0 0 1 30 "))
        .filter_map(|l| {
            let open = l.find('(')?;
            let close = l.find(')')?;
            l[open + 1..close].parse().ok()
        })
        .collect()
}

#[test]
fn stamps_a_single_page() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.pdf");
    let output = dir.path().join("out.pdf");
    std::fs::write(&input, pdf_with_pages(&[TWO_LINES])).unwrap();

    cmd()
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("Page 1: 2 lines numbered (1-2)"));

    assert_eq!(stamped_numbers(&output, 1), vec![1, 2]);
}

#[test]
fn per_page_numbering_restarts_on_each_page() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.pdf");
    let output = dir.path().join("out.pdf");
    std::fs::write(&input, pdf_with_pages(&[THREE_LINES, TWO_LINES])).unwrap();

    cmd().arg(&input).arg(&output).assert().success();

    assert_eq!(stamped_numbers(&output, 1), vec![1, 2, 3]);
    assert_eq!(stamped_numbers(&output, 2), vec![1, 2]);
}

#[test]
fn continuous_numbering_runs_across_pages() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.pdf");
    let output = dir.path().join("out.pdf");
    std::fs::write(&input, pdf_with_pages(&[THREE_LINES, TWO_LINES])).unwrap();

    cmd()
        .arg(&input)
        .arg(&output)
        .arg("--continuous")
        .assert()
        .success();

    assert_eq!(stamped_numbers(&output, 1), vec![1, 2, 3]);
    assert_eq!(stamped_numbers(&output, 2), vec![4, 5]);
}

#[test]
fn start_flag_offsets_the_first_number() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.pdf");
    let output = dir.path().join("out.pdf");
    std::fs::write(&input, pdf_with_pages(&[TWO_LINES])).unwrap();

    cmd()
        .arg(&input)
        .arg(&output)
        .args(["--start", "100"])
        .assert()
        .success();

    assert_eq!(stamped_numbers(&output, 1), vec![100, 101]);
}

#[test]
fn missing_input_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .arg(dir.path().join("missing.pdf"))
        .arg(dir.path().join("out.pdf"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn unreadable_input_exits_1() {
    // A directory passes the existence check but cannot be read.
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .arg(dir.path())
        .arg(dir.path().join("out.pdf"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("failed to read input"));
}

#[test]
fn invalid_pdf_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.pdf");
    let output = dir.path().join("out.pdf");
    std::fs::write(&input, b"this is not a pdf").unwrap();

    cmd()
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error"));
    assert!(!output.exists());
}

#[test]
fn pdf_without_text_layer_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.pdf");
    let output = dir.path().join("out.pdf");
    std::fs::write(
        &input,
        pdf_with_pages(&["0.5 w 72 100 m 500 100 l S"]),
    )
    .unwrap();

    cmd()
        .arg(&input)
        .arg(&output)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no text layer"));
    assert!(!output.exists());
}

#[test]
fn unwritable_output_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.pdf");
    std::fs::write(&input, pdf_with_pages(&[TWO_LINES])).unwrap();

    cmd()
        .arg(&input)
        .arg(dir.path().join("no-such-dir").join("out.pdf"))
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn quiet_suppresses_the_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.pdf");
    let output = dir.path().join("out.pdf");
    std::fs::write(&input, pdf_with_pages(&[TWO_LINES])).unwrap();

    cmd()
        .arg(&input)
        .arg(&output)
        .arg("--quiet")
        .assert()
        .success()
        .stderr(predicate::str::contains("Page 1").not());
}

#[test]
fn json_report_goes_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.pdf");
    let output = dir.path().join("out.pdf");
    std::fs::write(&input, pdf_with_pages(&[THREE_LINES, TWO_LINES])).unwrap();

    let assert = cmd()
        .arg(&input)
        .arg(&output)
        .args(["--json", "--quiet"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["total_lines"], 5);
    assert_eq!(report["pages"][0]["lines"], 3);
    assert_eq!(report["pages"][1]["first"], 1);
}

#[test]
fn output_pdf_still_contains_original_text() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.pdf");
    let output = dir.path().join("out.pdf");
    std::fs::write(&input, pdf_with_pages(&[TWO_LINES])).unwrap();

    cmd().arg(&input).arg(&output).assert().success();

    let doc = lopdf::Document::load(&output).unwrap();
    let page_id = *doc.get_pages().get(&1).unwrap();
    let content = doc.get_page_content(page_id).unwrap();
    let text = String::from_utf8_lossy(&content);
    assert!(text.contains("(first line) Tj"));
    assert!(text.contains("(second line) Tj"));
}
