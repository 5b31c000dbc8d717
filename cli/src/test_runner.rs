//! Runner for `.test.md` fixtures.
//!
//! A fixture is a TOML frontmatter block between `---` lines followed by
//! the message body:
//!
//! ```text
//! ---
//! description = "comment wins over a capitalized word"
//! expect_blocks = 1
//! expect_languages = ["python"]
//!
//! [[expect_span]]
//! text = "# Type 5"
//! style = "comment"
//! ---
//! ```python
//! # Type 5
//! ```
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chatmark::segment::{SegmentWarning, Segmented, Segmenter};
use chatmark::{Block, StyleTag};
use serde::Deserialize;

/// Style name meaning "no highlight at all" in `[[expect_span]]`.
const PLAIN: &str = "plain";

#[derive(Debug, Deserialize)]
pub struct ExpectedWarning {
    /// Substring that must appear in the warning message.
    pub contains: String,

    /// If set, the warning's span must start on this 1-based line of the body.
    #[serde(default)]
    pub line: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ExpectedSpan {
    /// Text to look for; its first occurrence in the code block is checked.
    pub text: String,

    /// A style tag name, or `plain` for unhighlighted text.
    pub style: String,

    /// Index among the message's code blocks.
    #[serde(default)]
    pub block: usize,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// Expected total number of blocks.
    #[serde(default)]
    pub expect_blocks: Option<usize>,

    /// Declared languages of the code blocks, in order.
    #[serde(default)]
    pub expect_languages: Option<Vec<String>>,

    /// Exact contents of the code blocks, in order.
    #[serde(default)]
    pub expect_code: Option<Vec<String>>,

    /// Expected warnings. If present (even empty), count and content are checked.
    #[serde(default)]
    pub expect_warnings: Option<Vec<ExpectedWarning>>,

    #[serde(default, rename = "expect_span")]
    pub expect_spans: Vec<ExpectedSpan>,
}

/// Split a `.test.md` file into its TOML config and message body.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}');

    let after_open = content
        .strip_prefix("---")
        .ok_or("missing opening --- frontmatter delimiter")?;
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest = &after_open[close_pos + 4..];
    let body = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, body))
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

impl TestResult {
    fn label(&self) -> &str {
        self.description.as_deref().unwrap_or_else(|| {
            self.path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("?")
        })
    }
}

fn run_single_test(path: &Path) -> TestResult {
    let fail = |description: Option<String>, reason: String| TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Fail(reason),
    };

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(None, format!("cannot read file: {}", e)),
    };

    let (config, body) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(None, format!("frontmatter error: {}", e)),
    };

    let segmented = Segmenter::new(body, 0).segment();
    tracing::debug!(path = %path.display(), blocks = segmented.blocks.len(), "running fixture");

    let failure = check_blocks(&config, &segmented)
        .or_else(|| {
            config
                .expect_warnings
                .as_deref()
                .and_then(|expected| check_warnings(body, &segmented.warnings, expected))
        })
        .or_else(|| check_spans(&config.expect_spans, &segmented.blocks));

    TestResult {
        path: path.to_path_buf(),
        description: config.description,
        outcome: match failure {
            Some(reason) => TestOutcome::Fail(reason),
            None => TestOutcome::Pass,
        },
    }
}

fn code_blocks(blocks: &[Block]) -> Vec<(&str, &str)> {
    blocks
        .iter()
        .filter_map(|b| match b {
            Block::Code { language, content } => Some((language.as_str(), content.as_str())),
            Block::Text { .. } => None,
        })
        .collect()
}

/// Check block count, languages and code contents. Returns `Some(reason)` on mismatch.
fn check_blocks(config: &TestConfig, segmented: &Segmented) -> Option<String> {
    let blocks = &segmented.blocks;
    if let Some(expected) = config.expect_blocks {
        if blocks.len() != expected {
            return Some(format!(
                "expected {} block(s), got {}\n  blocks: {:?}",
                expected,
                blocks.len(),
                blocks
            ));
        }
    }

    let code = code_blocks(blocks);
    if let Some(expected) = &config.expect_languages {
        let actual: Vec<&str> = code.iter().map(|(lang, _)| *lang).collect();
        if actual != *expected {
            return Some(format!(
                "language mismatch\n  expected: {:?}\n  actual:   {:?}",
                expected, actual
            ));
        }
    }
    if let Some(expected) = &config.expect_code {
        let actual: Vec<&str> = code.iter().map(|(_, content)| *content).collect();
        if actual != *expected {
            return Some(format!(
                "code mismatch\n  expected: {:?}\n  actual:   {:?}",
                expected, actual
            ));
        }
    }
    None
}

/// Convert a byte offset in `source` to a 1-based line number.
fn byte_offset_to_line(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}

/// Check that actual warnings match expectations. Returns `Some(reason)` on mismatch.
fn check_warnings(
    source: &str,
    warnings: &[SegmentWarning],
    expected: &[ExpectedWarning],
) -> Option<String> {
    if warnings.len() != expected.len() {
        return Some(format!(
            "expected {} warning(s), got {}: {:?}",
            expected.len(),
            warnings.len(),
            warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>()
        ));
    }

    for (i, (actual, expected)) in warnings.iter().zip(expected).enumerate() {
        if !actual.message.contains(&expected.contains) {
            return Some(format!(
                "warning[{}]: expected message containing \"{}\", got: {}",
                i, expected.contains, actual
            ));
        }
        if let Some(expected_line) = expected.line {
            let actual_line = byte_offset_to_line(source, actual.span.start);
            if actual_line != expected_line {
                return Some(format!(
                    "warning[{}]: expected on line {}, but span is on line {}",
                    i, expected_line, actual_line
                ));
            }
        }
    }
    None
}

/// Check resolved highlight styles of code fragments.
fn check_spans(expected: &[ExpectedSpan], blocks: &[Block]) -> Option<String> {
    let code = code_blocks(blocks);

    for (i, span) in expected.iter().enumerate() {
        let Some((language, content)) = code.get(span.block) else {
            return Some(format!(
                "expect_span[{}]: no code block at index {} ({} present)",
                i,
                span.block,
                code.len()
            ));
        };
        let Some(start) = content.find(&span.text) else {
            return Some(format!(
                "expect_span[{}]: {:?} not found in code block {}",
                i, span.text, span.block
            ));
        };
        let range = start..start + span.text.len();
        let resolved = chatmark::highlight(content, language);

        let matched = if span.style.eq_ignore_ascii_case(PLAIN) {
            resolved
                .iter()
                .all(|s| s.end <= range.start || s.start >= range.end)
        } else {
            let Some(tag) = StyleTag::from_name(&span.style) else {
                return Some(format!(
                    "expect_span[{}]: unknown style {:?}",
                    i, span.style
                ));
            };
            resolved
                .iter()
                .any(|s| s.style == tag && s.start <= range.start && s.end >= range.end)
        };

        if !matched {
            let overlapping: Vec<String> = resolved
                .iter()
                .filter(|s| s.start < range.end && s.end > range.start)
                .map(|s| format!("{} {:?}", s.style, &content[s.range()]))
                .collect();
            return Some(format!(
                "expect_span[{}]: {:?} is not {}\n  overlapping spans: {:?}",
                i, span.text, span.style, overlapping
            ));
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Discovery and reporting
// ---------------------------------------------------------------------------

/// Discover `.test.md` files grouped by category (subfolder relative to root).
/// Files directly in `root` get category "" (uncategorized).
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
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
        } else if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| name.ends_with(".test.md"))
        {
            let category = path
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            out.entry(category).or_default().push(path);
        }
    }
}

fn category_label(category: &str) -> &str {
    if category.is_empty() { "(root)" } else { category }
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
        eprintln!("  {} ({} tests)", category_label(cat), files.len());
    }
}

fn paint(text: &str, ansi: &str, no_color: bool) -> String {
    if no_color {
        text.to_string()
    } else {
        format!("\x1b[{}m{}\x1b[0m", ansi, text)
    }
}

#[derive(Default)]
struct Report {
    passed: usize,
    failures: Vec<TestResult>,
}

impl Report {
    fn record(&mut self, result: TestResult, no_color: bool) {
        match result.outcome {
            TestOutcome::Pass => {
                self.passed += 1;
                eprintln!("  {}  {}", paint("PASS", "32", no_color), result.label());
            }
            TestOutcome::Fail(_) => {
                eprintln!("  {}  {}", paint("FAIL", "31", no_color), result.label());
                self.failures.push(result);
            }
        }
    }

    /// Print failure details and the summary line. Returns the exit code.
    fn finish(self, no_color: bool) -> i32 {
        if !self.failures.is_empty() {
            eprintln!();
            eprintln!("failures:");
            for f in &self.failures {
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
        let failed = self.failures.len();
        if failed == 0 {
            eprintln!(
                "test result: {}. {} passed, 0 failed",
                paint("ok", "32", no_color),
                self.passed
            );
            0
        } else {
            eprintln!(
                "test result: {}. {} passed, {} failed (of {})",
                paint("FAILED", "31", no_color),
                self.passed,
                failed,
                self.passed + failed
            );
            1
        }
    }
}

/// Run all `.test.md` files under `path` (or a single file).
/// If `categories` is non-empty, only run tests in those categories.
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String]) -> i32 {
    let mut report = Report::default();

    if path.is_file() {
        report.record(run_single_test(path), no_color);
        return report.finish(no_color);
    }

    let all_categories = discover_categorized(path);
    if all_categories.is_empty() {
        eprintln!("no .test.md files found in {}", path.display());
        return 1;
    }

    let run_categories: BTreeMap<&str, &Vec<PathBuf>> = if categories.is_empty() {
        all_categories.iter().map(|(k, v)| (k.as_str(), v)).collect()
    } else {
        let mut filtered = BTreeMap::new();
        for requested in categories {
            let req = requested.trim_matches('/');
            let prefix = format!("{}/", req);
            let before = filtered.len();
            for (cat, files) in &all_categories {
                if cat == req || cat.starts_with(&prefix) {
                    filtered.insert(cat.as_str(), files);
                }
            }
            if filtered.len() == before {
                let available: Vec<&str> =
                    all_categories.keys().map(|k| category_label(k)).collect();
                eprintln!(
                    "warning: category '{}' not found (available: {})",
                    req,
                    available.join(", ")
                );
            }
        }
        filtered
    };

    if run_categories.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    for (cat, files) in &run_categories {
        eprintln!();
        eprintln!("{}", paint(category_label(cat), "1", no_color));
        for file in *files {
            report.record(run_single_test(file), no_color);
        }
    }

    report.finish(no_color)
}
