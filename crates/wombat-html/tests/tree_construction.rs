//! Runs the html5lib-format `.dat` fixtures under `tests/data/tree-construction`.
//!
//! Each case is parsed with the scripting flag its `#script-on` /
//! `#script-off` marker asks for (both when there is none) and its dump is
//! compared with `#document`. Error lines are not compared one to one since
//! the error kinds are our own; a case that expects no errors must produce none.

use std::collections::HashMap;
use std::fs;
use std::mem;
use std::path::{Path, PathBuf};

use wombat_html::{FragmentContext, ParseOpts, ParsedDocument, parse_document, parse_fragment};

/// One `#data` block, keyed by section name without the `#`.
type Fields = HashMap<String, String>;

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/tree-construction")
}

fn parse_dat(source: &str) -> Vec<Fields> {
    let mut tests = Vec::new();
    let mut test = Fields::new();
    let mut key: Option<String> = None;
    let mut value = String::new();

    for line in source.lines() {
        if let Some(rest) = line.strip_prefix('#') {
            if let Some(key) = key.take() {
                let _ = test.insert(key, mem::take(&mut value));
            }
            if line == "#data" && !test.is_empty() {
                tests.push(mem::take(&mut test));
            }
            key = Some(rest.to_string());
        } else {
            value.push_str(line);
            value.push('\n');
        }
    }
    if let Some(key) = key.take() {
        let _ = test.insert(key, value);
    }
    if !test.is_empty() {
        tests.push(test);
    }
    tests
}

fn run_case(fields: &Fields, scripting: bool) -> ParsedDocument {
    let mut data = fields.get("data").cloned().unwrap_or_default();
    // The line break before the next section header is not part of the input.
    let _ = data.pop();

    let opts = ParseOpts {
        scripting_enabled: scripting,
        ..ParseOpts::default()
    };

    match fields.get("document-fragment") {
        Some(context) => {
            let context: FragmentContext = context.trim().parse().expect("valid fragment context");
            parse_fragment(&data, &context, opts)
        }
        None => parse_document(&data, opts),
    }
}

#[test]
fn tree_construction_fixtures() {
    wombat_common::logging::init_for_tests();

    let mut paths: Vec<PathBuf> = fs::read_dir(fixture_dir())
        .expect("fixture directory exists")
        .map(|entry| entry.expect("readable entry").path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "dat"))
        .collect();
    paths.sort();
    assert!(!paths.is_empty(), "no .dat fixtures found");

    let mut failures = Vec::new();
    let mut ran = 0;

    for path in &paths {
        let source = fs::read_to_string(path).expect("readable fixture");
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

        for (index, fields) in parse_dat(&source).iter().enumerate() {
            let flags: &[bool] = if fields.contains_key("script-on") {
                &[true]
            } else if fields.contains_key("script-off") {
                &[false]
            } else {
                &[false, true]
            };
            let expected = fields
                .get("document")
                .map(|d| d.trim_end_matches('\n').to_string())
                .unwrap_or_default();
            let expects_errors = fields.get("errors").is_some_and(|e| !e.trim().is_empty());

            for &scripting in flags {
                ran += 1;
                let doc = run_case(fields, scripting);
                let actual = doc.dump();
                let actual = actual.trim_end_matches('\n');
                if actual != expected {
                    failures.push(format!(
                        "{name} #{index} (scripting {scripting})\n--- expected\n{expected}\n--- actual\n{actual}\n"
                    ));
                } else if !expects_errors && !doc.errors.is_empty() {
                    failures.push(format!(
                        "{name} #{index} (scripting {scripting}): unexpected errors {:?}",
                        doc.errors
                    ));
                }
            }
        }
    }

    assert!(
        failures.is_empty(),
        "{} of {ran} tree construction cases failed:\n{}",
        failures.len(),
        failures.join("\n")
    );
}

#[test]
fn dat_parser_splits_sections() {
    let tests = parse_dat("#data\n<p>\n#errors\n#document\n| <p>\n\n#data\nx\n#document-fragment\ntd\n#document\n| \"x\"\n");
    assert_eq!(tests.len(), 2);
    assert_eq!(tests[0]["data"], "<p>\n");
    assert_eq!(tests[0]["document"], "| <p>\n\n");
    assert_eq!(tests[1]["document-fragment"], "td\n");
}
