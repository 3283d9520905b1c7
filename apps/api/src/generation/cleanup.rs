//! Post-processing for generated documents.
//!
//! The model's raw output is run through a fixed sequence of string
//! transforms before it reaches the client. ORDER MATTERS: placeholder
//! stripping runs after the line-structure passes, since the structure
//! passes key off the lines placeholders sit on (`Dear [Name],`).
//!
//! Removing a placeholder can turn a line into a salutation, heading, or
//! bullet the earlier passes skipped, so each pipeline is re-run until its
//! output stops changing.

use once_cell::sync::Lazy;
use regex::Regex;

static TRAILING_WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)[ \t]+$").expect("valid regex"));

static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

static SALUTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(Dear [^\n]*[,:])$\n*").expect("valid regex"));

static SIGN_OFF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)\n*^((?:Sincerely|Yours sincerely|Yours truly|Best regards|Kind regards|Warm regards|Regards|Respectfully),)$\n*",
    )
    .expect("valid regex")
});

static BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:[-*][ \t]+|[•·▪][ \t]*)").expect("valid regex"));

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\[\]\n]*\][ \t]*").expect("valid regex"));

/// Upper bound on pipeline runs; real model output settles in two or three.
const MAX_PASSES: usize = 5;

/// Cleans a generated cover letter.
pub fn clean_cover_letter(raw: &str) -> String {
    settle(raw, cover_letter_pass)
}

/// Cleans a generated resume.
pub fn clean_resume(raw: &str) -> String {
    settle(raw, resume_pass)
}

/// Re-runs `pass` until it reaches a fixed point.
fn settle(raw: &str, pass: fn(&str) -> String) -> String {
    let mut text = pass(raw);
    for _ in 1..MAX_PASSES {
        let next = pass(&text);
        if next == text {
            break;
        }
        text = next;
    }
    text
}

fn cover_letter_pass(raw: &str) -> String {
    let text = prepare(raw);
    let text = SALUTATION.replace_all(&text, "${1}\n\n");
    let text = SIGN_OFF.replace_all(&text, "\n\n${1}\n");
    let text = normalize_bullets(&text);
    finish(&text)
}

fn resume_pass(raw: &str) -> String {
    let text = prepare(raw);
    let text = separate_headings(&text);
    let text = normalize_bullets(&text);
    finish(&text)
}

/// Shared line-structure passes: fences, line endings, trailing whitespace,
/// leading blank lines, blank-line runs.
fn prepare(raw: &str) -> String {
    let text = strip_code_fences(raw).replace("\r\n", "\n");
    let text = TRAILING_WHITESPACE.replace_all(&text, "");
    let text = text.trim_start_matches('\n');
    collapse_blank_runs(text)
}

/// Placeholder removal, then a final tidy of whatever the removal left behind.
fn finish(text: &str) -> String {
    let text = PLACEHOLDER.replace_all(text, "");
    let text = TRAILING_WHITESPACE.replace_all(&text, "");
    collapse_blank_runs(&text).trim().to_string()
}

fn collapse_blank_runs(text: &str) -> String {
    BLANK_RUNS.replace_all(text, "\n\n").into_owned()
}

fn normalize_bullets(text: &str) -> String {
    BULLET.replace_all(text, "• ").into_owned()
}

/// Puts a blank line above every ALL-CAPS section heading that doesn't have one.
fn separate_headings(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.split('\n') {
        if is_heading(line) && lines.last().is_some_and(|prev| !prev.is_empty()) {
            lines.push("");
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn is_heading(line: &str) -> bool {
    let line = line.trim();
    line.len() >= 3
        && line.chars().filter(|c| c.is_ascii_uppercase()).count() >= 2
        && line
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || " &/,-".contains(c))
}

/// Strips a ``` fence the model sometimes wraps the whole document in.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return text;
    };
    // Drop the fence line itself, including any language tag.
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body)
}
