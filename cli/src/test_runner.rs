use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ExpectedViolation {
    /// Substring that must appear in the violation message.
    pub contains: String,

    /// If set, the violation's span must start on this 1-based source line.
    #[serde(default)]
    pub line: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// If true, the test expects parsing to fail.
    #[serde(default)]
    pub expect_parse_error: bool,

    /// Expected parse error — some error's Display string must contain this
    /// substring. Implies expect_parse_error.
    #[serde(default)]
    pub expect_error: Option<String>,

    /// Expected violations. If present (even empty), count and content are
    /// checked against `validate` output.
    #[serde(default)]
    pub expect_violations: Option<Vec<ExpectedViolation>>,

    /// Expected chapter/item outline (trimmed comparison).
    #[serde(default)]
    pub expect_outline: Option<String>,
}

/// Parse a `.test.md` file into its TOML config and notes source.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}'); // strip BOM

    let rest = content
        .strip_prefix("---")
        .ok_or("missing opening --- frontmatter delimiter")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    let close = rest
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;
    let toml_str = rest[..close].trim_end_matches('\r');

    let source = &rest[close + 4..]; // skip \n---
    let source = source
        .strip_prefix("\r\n")
        .or_else(|| source.strip_prefix('\n'))
        .unwrap_or(source);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

fn run_single_test(path: &Path) -> TestResult {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Fail(format!("cannot read file: {}", e)),
            };
        }
    };

    let (config, source) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => {
            return TestResult {
                path: path.to_path_buf(),
                description: None,
                outcome: TestOutcome::Fail(format!("frontmatter error: {}", e)),
            };
        }
    };

    let description = config.description.clone();
    TestResult {
        path: path.to_path_buf(),
        description,
        outcome: check_expectations(&config, source),
    }
}

fn check_expectations(config: &TestConfig, source: &str) -> TestOutcome {
    let parser = notes::parser::Parser::new(source.to_string(), 0);
    let parse_result = parser.parse();

    if config.expect_parse_error || config.expect_error.is_some() {
        return match parse_result {
            Err(errors) => {
                if let Some(expected) = &config.expect_error {
                    if errors.iter().any(|e| e.to_string().contains(expected.as_str())) {
                        TestOutcome::Pass
                    } else {
                        let msgs: Vec<String> =
                            errors.iter().map(|e| e.to_string()).collect();
                        TestOutcome::Fail(format!(
                            "expected parse error containing \"{}\", got: {}",
                            expected,
                            msgs.join("; ")
                        ))
                    }
                } else {
                    TestOutcome::Pass
                }
            }
            Ok(_) => TestOutcome::Fail("expected parse error, but parsing succeeded".into()),
        };
    }

    let document = match parse_result {
        Ok(d) => d,
        Err(errors) => {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            return TestOutcome::Fail(format!("unexpected parse error: {}", msgs.join("; ")));
        }
    };

    if let Some(expected_outline) = &config.expect_outline {
        let actual = render_outline(&document);
        if actual.trim() != expected_outline.trim() {
            return TestOutcome::Fail(format!(
                "outline mismatch\n  expected:\n{}\n  actual:\n{}",
                indent(expected_outline.trim()),
                indent(actual.trim())
            ));
        }
    }

    if let Some(expected) = &config.expect_violations {
        let violations = lint::validate(&document);
        if let Some(reason) = check_violations(source, &violations, expected) {
            return TestOutcome::Fail(reason);
        }
    }

    TestOutcome::Pass
}

fn render_outline(document: &notes::document::Document) -> String {
    let mut out = String::new();
    for chapter in &document.chapters {
        out.push_str(&format!("Chapter {}. {}\n", chapter.number, chapter.title));
        for item in &chapter.items {
            out.push_str(&format!("  Item {}: {}\n", item.number, item.title));
        }
    }
    out
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| format!("    {}", l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert a byte offset in `source` to a 1-based line number.
fn byte_offset_to_line(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}

/// Check that actual violations match expectations. Returns `Some(reason)`
/// on mismatch.
fn check_violations(
    source: &str,
    actual: &[lint::Violation],
    expected: &[ExpectedViolation],
) -> Option<String> {
    if actual.len() != expected.len() {
        let actual_msgs: Vec<String> = actual.iter().map(|v| format!("  - {}", v)).collect();
        return Some(format!(
            "expected {} violation(s), got {}\n  actual violations:\n{}",
            expected.len(),
            actual.len(),
            if actual_msgs.is_empty() {
                "    (none)".to_string()
            } else {
                actual_msgs.join("\n")
            }
        ));
    }

    for (i, (actual, expected)) in actual.iter().zip(expected.iter()).enumerate() {
        let msg = actual.to_string();

        if !msg.contains(&expected.contains) {
            return Some(format!(
                "violation[{}]: expected message containing \"{}\", got: {}",
                i, expected.contains, msg
            ));
        }

        if let Some(expected_line) = expected.line {
            let actual_line = byte_offset_to_line(source, actual.span.start);
            if actual_line != expected_line {
                return Some(format!(
                    "violation[{}]: expected on line {}, but span starts on line {}",
                    i, expected_line, actual_line
                ));
            }
        }
    }

    None
}

/// Discover `.test.md` files grouped by category (subfolder relative to
/// root). Files directly in `root` get category "" (uncategorized). A single
/// file becomes a one-entry uncategorized run.
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    if root.is_file() {
        categories.insert(String::new(), vec![root.to_path_buf()]);
        return categories;
    }
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, root, out);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.ends_with(".test.md") {
                let category = path
                    .parent()
                    .and_then(|p| p.strip_prefix(root).ok())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_default();
                out.entry(category).or_default().push(path);
            }
        }
    }
}

/// List available categories for the given test path.
pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no .test.md files found in {}", path.display());
        return;
    }

    eprintln!("available categories:");
    for (cat, files) in &categories {
        let label = if cat.is_empty() { "(root)" } else { cat.as_str() };
        eprintln!("  {} ({} tests)", label, files.len());
    }
}

fn pass_label(no_color: bool) -> &'static str {
    if no_color { "PASS" } else { "\x1b[32mPASS\x1b[0m" }
}

fn fail_label(no_color: bool) -> &'static str {
    if no_color { "FAIL" } else { "\x1b[31mFAIL\x1b[0m" }
}

fn bold(s: &str, no_color: bool) -> String {
    if no_color {
        s.to_string()
    } else {
        format!("\x1b[1m{}\x1b[0m", s)
    }
}

/// Run all `.test.md` files under `path` (or a single file).
/// If `categories` is non-empty, only run tests in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let all_categories = discover_categorized(path);

    if all_categories.is_empty() {
        eprintln!("no .test.md files found in {}", path.display());
        return 1;
    }

    let run_categories: BTreeMap<&str, &Vec<PathBuf>> = if categories.is_empty() || path.is_file()
    {
        all_categories.iter().map(|(k, v)| (k.as_str(), v)).collect()
    } else {
        let mut filtered = BTreeMap::new();
        for requested in categories {
            let req = requested.trim_matches('/');
            let mut found = false;
            for (cat, files) in &all_categories {
                if cat == req || cat.starts_with(&format!("{}/", req)) {
                    filtered.insert(cat.as_str(), files);
                    found = true;
                }
            }
            if !found {
                eprintln!(
                    "warning: category '{}' not found (available: {})",
                    req,
                    all_categories
                        .keys()
                        .map(|k| if k.is_empty() { "(root)" } else { k.as_str() })
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }
        filtered
    };

    if run_categories.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (cat, files) in &run_categories {
        if !cat.is_empty() {
            eprintln!();
            eprintln!("{}", bold(cat, no_color));
        }

        for file in *files {
            let result = run_single_test(file);
            let label = result.description.as_deref().unwrap_or_else(|| {
                file.file_stem().and_then(|s| s.to_str()).unwrap_or("?")
            });

            match &result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", pass_label(no_color), label);
                }
                TestOutcome::Fail(_) => {
                    failed += 1;
                    eprintln!("  {}  {}", fail_label(no_color), label);
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for f in &failures {
            eprintln!();
            eprintln!("  --- {} ---", f.path.display());
            if let TestOutcome::Fail(reason) = &f.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    if failed == 0 {
        let ok = if no_color { "ok" } else { "\x1b[32mok\x1b[0m" };
        eprintln!("test result: {}. {} passed, 0 failed", ok, passed);
        0
    } else {
        let label = if no_color {
            "FAILED"
        } else {
            "\x1b[31mFAILED\x1b[0m"
        };
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            label,
            passed,
            failed,
            passed + failed
        );
        1
    }
}
