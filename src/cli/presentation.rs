//! Presentation: text and JSON renderings of lifecycle results.

use crate::lifecycle::InitializationResult;
use crate::resolver::VersionCheckResult;
use crate::tree::sync::SyncReport;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::json;
use std::path::Path;

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| json!({ "error": e.to_string() }).to_string())
}

fn yes_no(value: bool) -> String {
    if value {
        "yes".green().to_string()
    } else {
        "no".to_string()
    }
}

pub fn format_check_result(result: &VersionCheckResult, format: &str) -> String {
    if format == "json" {
        return to_json(result);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Initialized".to_string(), yes_no(result.is_initialized)]);
    table.add_row(vec![
        "Installed version".to_string(),
        result.current_version.clone().unwrap_or_else(|| "-".to_string()),
    ]);
    table.add_row(vec![
        "Source version".to_string(),
        result.source_version.clone().unwrap_or_else(|| "-".to_string()),
    ]);
    table.add_row(vec![
        "Update available".to_string(),
        yes_no(result.update_available),
    ]);
    if let Some(source) = &result.source_path {
        table.add_row(vec!["Source".to_string(), source.display().to_string()]);
    }
    table.to_string()
}

pub fn format_initialization(
    result: &InitializationResult,
    report: Option<&SyncReport>,
    format: &str,
) -> String {
    if format == "json" {
        return to_json(&json!({
            "result": result,
            "report": report,
        }));
    }

    if !result.success {
        let message = result.error.as_deref().unwrap_or("unknown error");
        return format!("{} {}", "✗".red(), message);
    }

    let action = if result.was_update == Some(true) {
        "Updated"
    } else {
        "Initialized"
    };
    let mut output = format!(
        "{} {} to version {}\n",
        "✓".green(),
        action,
        result.version.as_deref().unwrap_or("unknown")
    );
    if let Some(report) = report {
        output.push_str(&format!("  copied files:        {}\n", report.copied.len()));
        output.push_str(&format!("  created directories: {}\n", report.created_dirs.len()));
        for preserved in &report.preserved {
            output.push_str(&format!("  ⊘ {} (preserved)\n", preserved.display()));
        }
    }
    output.trim_end().to_string()
}

pub fn format_install_path(path: Option<&Path>, format: &str) -> String {
    if format == "json" {
        return to_json(&json!({ "installPath": path }));
    }
    match path {
        Some(path) => path.display().to_string(),
        None => "Not initialized".to_string(),
    }
}

pub fn format_fingerprint(dir: &Path, fingerprint: &str, format: &str) -> String {
    if format == "json" {
        return to_json(&json!({ "path": dir, "fingerprint": fingerprint }));
    }
    format!("{}  {}", fingerprint, dir.display())
}
