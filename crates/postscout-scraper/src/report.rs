//! Writes the [`RunReport`] artifact.

use std::path::Path;

use postscout_core::RunReport;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::ScraperError;

const INDENT: &[u8] = b"    ";

/// Serializes `report` as 4-space indented UTF-8 JSON.
///
/// Non-ASCII text is written as-is, not `\u` escaped.
///
/// # Errors
///
/// Returns [`ScraperError::ReportSerialize`] if serialization fails.
pub fn render_report(report: &RunReport) -> Result<Vec<u8>, ScraperError> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    report
        .serialize(&mut ser)
        .map_err(ScraperError::ReportSerialize)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Writes `report` to `path` in one step.
///
/// The document is written to a hidden sibling file and then renamed over
/// `path`, so readers never observe a half-written report. Missing parent
/// directories are created.
///
/// # Errors
///
/// Returns [`ScraperError::ReportIo`] on any filesystem failure and
/// [`ScraperError::ReportSerialize`] if serialization fails.
pub fn write_report(path: &Path, report: &RunReport) -> Result<(), ScraperError> {
    let io_err = |source| ScraperError::ReportIo {
        path: path.to_path_buf(),
        source,
    };

    let body = render_report(report)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file_name = path
        .file_name()
        .map_or_else(|| "report".into(), |n| n.to_string_lossy().into_owned());
    let tmp_path = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&tmp_path, &body).map_err(io_err)?;
    if let Err(err) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(io_err(err));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use postscout_core::PostRecord;

    use super::*;

    fn sample_report() -> RunReport {
        let at = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 8, 0, 0).unwrap();
        RunReport::at(
            "https://www.linkedin.com/in/someone/",
            at,
            vec![PostRecord {
                id: "urn:li:activity:7".to_string(),
                author: "https://www.linkedin.com/in/someone".to_string(),
                time: "1w".to_string(),
                text: "Grüße aus Köln\nneue Zeile".to_string(),
                tags: vec!["#köln".to_string()],
                links: vec!["https://example.com".to_string()],
                reactions: 5,
                comments: 1,
            }],
        )
    }

    #[test]
    fn render_uses_four_space_indent() {
        let body = String::from_utf8(render_report(&sample_report()).unwrap()).unwrap();
        assert!(body.starts_with("{\n    \"profile_url\""), "got: {body}");
        assert!(body.contains("\n        {\n            \"id\""), "got: {body}");
    }

    #[test]
    fn render_keeps_non_ascii_unescaped() {
        let body = String::from_utf8(render_report(&sample_report()).unwrap()).unwrap();
        assert!(body.contains("Grüße aus Köln"));
        assert!(!body.contains("\\u00fc"));
    }

    #[test]
    fn write_creates_parent_dirs_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/li_posts.json");
        let report = sample_report();

        write_report(&path, &report).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: RunReport = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, report);
        assert_eq!(parsed.total_posts, 1);
    }

    #[test]
    fn write_leaves_no_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("li_posts.json");
        write_report(&path, &sample_report()).unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["li_posts.json".to_string()]);
    }

    #[test]
    fn write_replaces_existing_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("li_posts.json");
        std::fs::write(&path, "stale").unwrap();

        write_report(&path, &sample_report()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"total_posts\": 1"));
    }
}
