//! Schema linting - static analysis of schema files.
//!
//! Flags constructs the normalizer silently skips:
//! - JSON syntax errors
//! - ambiguous type unions and unrecognized type keywords
//! - composition keywords (`oneOf`/`anyOf`/`allOf`)
//! - `$ref` pointers that will not be followed
//! - tuple-form `items` and non-object roots

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::loader::load_json;
use crate::resolver::{definitions, ref_resolves, resolve_node};
use crate::types::{declared_types, is_object_schema, SchemaType};

/// Composition keywords the normalizer does not resolve.
const COMPOSITION_KEYWORDS: &[&str] = &["oneOf", "anyOf", "allOf"];

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// A single diagnostic message from linting.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: String,
    pub file: PathBuf,
    /// JSON path to the issue (e.g., "/properties/id/type")
    pub path: String,
    pub message: String,
}

/// Result of linting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file: PathBuf,
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Status of a linted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Ok,
    Error,
    Warning,
}

/// Result of linting a directory or set of files.
#[derive(Debug, Clone, Serialize)]
pub struct LintResult {
    pub path: PathBuf,
    pub files_checked: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub results: Vec<FileResult>,
}

impl LintResult {
    /// Returns true if all files passed (no errors).
    pub fn is_ok(&self) -> bool {
        self.errors == 0
    }
}

/// Lint a file or directory.
///
/// If path is a directory, recursively finds all .json files.
/// If `strict` is true, warnings are treated as errors.
/// Returns aggregated results for all files.
pub fn lint(path: &Path, strict: bool) -> LintResult {
    let files = collect_schema_files(path);
    let mut results = Vec::new();
    let mut total_errors = 0;
    let mut total_warnings = 0;

    for file in &files {
        let file_result = lint_file(file, path);
        let file_errors = file_result
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        let file_warnings = file_result
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count();

        total_errors += file_errors;
        total_warnings += file_warnings;
        results.push(file_result);
    }

    let failed = results
        .iter()
        .filter(|r| {
            if strict {
                r.status != FileStatus::Ok
            } else {
                r.status == FileStatus::Error
            }
        })
        .count();

    LintResult {
        path: path.to_path_buf(),
        files_checked: files.len(),
        passed: files.len() - failed,
        failed,
        errors: total_errors,
        warnings: total_warnings,
        results,
    }
}

/// Lint a single schema file.
pub fn lint_file(file: &Path, base_path: &Path) -> FileResult {
    let mut diagnostics = Vec::new();

    // Try to load the file (checks syntax)
    let schema = match load_json(file) {
        Ok(s) => s,
        Err(e) => {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                code: "E001".to_string(),
                file: file.to_path_buf(),
                path: "/".to_string(),
                message: format!("syntax error: {}", e),
            });
            return FileResult {
                file: file.strip_prefix(base_path).unwrap_or(file).to_path_buf(),
                status: FileStatus::Error,
                diagnostics,
            };
        }
    };

    let defs = definitions(&schema);

    if !is_object_schema(resolve_node(&schema, defs)) {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            code: "W106".to_string(),
            file: file.to_path_buf(),
            path: "/".to_string(),
            message: "root schema is not an object schema: records pass through unchanged"
                .to_string(),
        });
    }

    check_schema_node(&schema, defs, file, "", &mut diagnostics);

    let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
    let has_warnings = diagnostics.iter().any(|d| d.severity == Severity::Warning);

    let status = if has_errors {
        FileStatus::Error
    } else if has_warnings {
        FileStatus::Warning
    } else {
        FileStatus::Ok
    };

    FileResult {
        file: file.strip_prefix(base_path).unwrap_or(file).to_path_buf(),
        status,
        diagnostics,
    }
}

/// Check one schema node and recurse into the positions the normalizer
/// reads: `properties` values, `items`, `definitions` entries, and the
/// branches of composition keywords.
fn check_schema_node(
    node: &Value,
    defs: Option<&Map<String, Value>>,
    file: &Path,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(map) = node.as_object() else {
        return;
    };

    check_declared_types(node, map, file, path, diagnostics);
    check_reference(node, defs, file, path, diagnostics);

    for &keyword in COMPOSITION_KEYWORDS {
        if let Some(branches) = map.get(keyword) {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                code: "W103".to_string(),
                file: file.to_path_buf(),
                path: format!("{}/{}", path, keyword),
                message: format!(
                    "unsupported composition keyword \"{}\": its subschemas are not applied",
                    keyword
                ),
            });
            if let Some(branches) = branches.as_array() {
                for (index, branch) in branches.iter().enumerate() {
                    let branch_path = format!("{}/{}/{}", path, keyword, index);
                    check_schema_node(branch, defs, file, &branch_path, diagnostics);
                }
            }
        }
    }

    if let Some(props) = map.get("properties").and_then(Value::as_object) {
        for (key, subschema) in props {
            let child_path = format!("{}/properties/{}", path, key);
            check_schema_node(subschema, defs, file, &child_path, diagnostics);
        }
    }

    match map.get("items") {
        Some(Value::Array(entries)) => {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                code: "W105".to_string(),
                file: file.to_path_buf(),
                path: format!("{}/items", path),
                message: "array-form items is unsupported: elements are not coerced".to_string(),
            });
            for (index, entry) in entries.iter().enumerate() {
                let entry_path = format!("{}/items/{}", path, index);
                check_schema_node(entry, defs, file, &entry_path, diagnostics);
            }
        }
        Some(item) => {
            check_schema_node(item, defs, file, &format!("{}/items", path), diagnostics);
        }
        None => {}
    }

    if let Some(local_defs) = map.get("definitions").and_then(Value::as_object) {
        for (name, definition) in local_defs {
            let def_path = format!("{}/definitions/{}", path, name);
            check_schema_node(definition, defs, file, &def_path, diagnostics);
        }
    }
}

/// W101 ambiguous unions, W102 unrecognized keywords.
fn check_declared_types(
    node: &Value,
    map: &Map<String, Value>,
    file: &Path,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Some(type_value) = map.get("type") else {
        return;
    };

    let keywords: Vec<&Value> = match type_value {
        Value::Array(entries) => entries.iter().collect(),
        single => vec![single],
    };
    for keyword in keywords {
        match keyword.as_str() {
            Some("null") => {}
            Some(kw) if SchemaType::from_keyword(kw) == SchemaType::Unknown => {
                diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    code: "W102".to_string(),
                    file: file.to_path_buf(),
                    path: format!("{}/type", path),
                    message: format!("unrecognized type keyword \"{}\"", kw),
                });
            }
            Some(_) => {}
            None => {
                diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    code: "W102".to_string(),
                    file: file.to_path_buf(),
                    path: format!("{}/type", path),
                    message: format!("non-string entry {} in type", keyword),
                });
            }
        }
    }

    if declared_types(node).len() > 1 {
        diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            code: "W101".to_string(),
            file: file.to_path_buf(),
            path: format!("{}/type", path),
            message: format!("ambiguous type union {}: values here are not coerced", type_value),
        });
    }
}

/// W104 references the resolver will not follow.
fn check_reference(
    node: &Value,
    defs: Option<&Map<String, Value>>,
    file: &Path,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if ref_resolves(node, defs) {
        return;
    }
    // ref_resolves is false only when a $ref is present, so as_str is safe
    // to flatten here.
    let pointer = node
        .get("$ref")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let message = if pointer.starts_with("#/definitions/") {
        format!("unresolvable $ref \"{}\": no matching definition", pointer)
    } else {
        format!(
            "unsupported $ref shape \"{}\": only #/definitions/<key> is followed",
            pointer
        )
    };
    diagnostics.push(Diagnostic {
        severity: Severity::Warning,
        code: "W104".to_string(),
        file: file.to_path_buf(),
        path: format!("{}/$ref", path),
        message,
    });
}

/// Collect all .json files in a path (file or directory).
fn collect_schema_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            return vec![path.to_path_buf()];
        }
        return vec![];
    }

    let mut files = Vec::new();
    collect_files_recursive(path, &mut files);
    files.sort();
    files
}

fn collect_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files_recursive(&path, files);
        } else if path.extension().map(|e| e == "json").unwrap_or(false) {
            files.push(path);
        }
    }
}
