//! Probe output to catalog record.
//!
//! Pure transform: everything filesystem-related (the stat, the probe run)
//! has already happened by the time this is called.

use std::path::Path;

use uuid::Uuid;

use vidvault_core::{normalize_name, CatalogRecord, DurationRule};

use crate::error::ProbeError;
use crate::report::ProbeReport;

/// Duration substituted when the container reports none.
const ZERO_DURATION: &str = "0:0:0.0";

/// Builds the candidate catalog record for a probed file.
///
/// The first video stream is mandatory; its width/height default to 0 when
/// the probe omits them. The storage key is a fresh UUID plus the file's
/// original extension (case preserved). The record is not yet persisted and
/// carries no id.
pub fn extract_record(
    report: &ProbeReport,
    path: &Path,
    size_bytes: u64,
    privacy_level: i32,
    rule: DurationRule,
) -> Result<CatalogRecord, ProbeError> {
    let stream = report
        .first_video_stream()
        .ok_or(ProbeError::NoVideoStream)?;

    let raw_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let duration_text = report.format.duration.as_deref().unwrap_or(ZERO_DURATION);
    let duration = parse_duration(duration_text, rule)?;

    Ok(CatalogRecord {
        id: None,
        normalized_name: normalize_name(&raw_name),
        raw_name,
        storage_key: format!("{}{}", Uuid::new_v4(), extension),
        uploaded: false,
        size_bytes: size_bytes as i64,
        width: Some(stream.width.unwrap_or(0) as i32),
        height: Some(stream.height.unwrap_or(0) as i32),
        duration_seconds: Some(duration),
        privacy_level,
        description: None,
    })
}

/// Parses the sexagesimal `H:MM:SS.f…` duration text and converts it to the
/// stored float.
///
/// The fractional part must be present and is discarded after parsing, so
/// only whole seconds enter the conversion. Under [`DurationRule::Legacy`]
/// the conversion is the historical `hours*60 + minutes + seconds/100`;
/// under [`DurationRule::TotalSeconds`] it is the conventional
/// `hours*3600 + minutes*60 + seconds`.
pub fn parse_duration(text: &str, rule: DurationRule) -> Result<f64, ProbeError> {
    let bad = || ProbeError::Duration(text.to_string());

    let (clock, fraction) = text.split_once('.').ok_or_else(bad)?;
    if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad());
    }

    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() != 3 {
        return Err(bad());
    }
    let hours: u32 = parts[0].parse().map_err(|_| bad())?;
    let minutes: u32 = parts[1].parse().map_err(|_| bad())?;
    let seconds: u32 = parts[2].parse().map_err(|_| bad())?;
    if hours > 23 || minutes > 59 || seconds > 61 {
        return Err(bad());
    }

    let value = match rule {
        DurationRule::Legacy => f64::from(hours * 60 + minutes) + f64::from(seconds) / 100.0,
        DurationRule::TotalSeconds => f64::from(hours * 3600 + minutes * 60 + seconds),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn scenario_report() -> ProbeReport {
        serde_json::from_str(
            r#"{
                "streams": [
                    {"codec_type": "audio"},
                    {"codec_type": "video", "width": 1280, "height": 720}
                ],
                "format": {"duration": "0:00:10.000000"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_extract_builds_normalized_record() {
        let record = extract_record(
            &scenario_report(),
            Path::new("/data/My Clip.MP4"),
            200_000,
            3,
            DurationRule::Legacy,
        )
        .unwrap();

        assert_eq!(record.id, None);
        assert_eq!(record.raw_name, "My Clip.MP4");
        assert_eq!(record.normalized_name, "my_clip.mp4");
        assert_eq!(record.size_bytes, 200_000);
        assert_eq!(record.width, Some(1280));
        assert_eq!(record.height, Some(720));
        assert_eq!(record.privacy_level, 3);
        assert!(!record.uploaded);
        assert_eq!(record.description, None);
    }

    #[test]
    fn test_storage_key_is_uuid_plus_original_extension() {
        let record = extract_record(
            &scenario_report(),
            Path::new("My Clip.MP4"),
            200_000,
            3,
            DurationRule::Legacy,
        )
        .unwrap();

        // Extension keeps its original case; the stem is a fresh UUID.
        assert!(record.storage_key.ends_with(".MP4"));
        let stem = record.storage_key.trim_end_matches(".MP4");
        assert!(Uuid::parse_str(stem).is_ok());
    }

    #[test]
    fn test_storage_keys_are_unique_per_extraction() {
        let report = scenario_report();
        let path = Path::new("clip.mp4");
        let a = extract_record(&report, path, 1, 3, DurationRule::Legacy).unwrap();
        let b = extract_record(&report, path, 1, 3, DurationRule::Legacy).unwrap();
        assert_ne!(a.storage_key, b.storage_key);
    }

    #[test]
    fn test_extract_without_video_stream_fails() {
        let report: ProbeReport = serde_json::from_str(
            r#"{"streams": [{"codec_type": "audio"}], "format": {"duration": "0:00:10.0"}}"#,
        )
        .unwrap();
        let err = extract_record(&report, Path::new("a.mp4"), 1, 3, DurationRule::Legacy)
            .unwrap_err();
        assert!(matches!(err, ProbeError::NoVideoStream));
    }

    #[test]
    fn test_missing_dimensions_default_to_zero() {
        let report: ProbeReport =
            serde_json::from_str(r#"{"streams": [{"codec_type": "video"}]}"#).unwrap();
        let record =
            extract_record(&report, Path::new("a.mp4"), 1, 3, DurationRule::Legacy).unwrap();
        assert_eq!(record.width, Some(0));
        assert_eq!(record.height, Some(0));
        // No duration reported either: the zero default applies.
        assert_close(record.duration_seconds.unwrap(), 0.0);
    }

    #[test]
    fn test_legacy_duration_formula() {
        // The historical conversion scales hours to minutes and seconds to
        // hundredths; it is kept bit-for-bit for parity with existing rows.
        assert_close(
            parse_duration("1:02:03.45", DurationRule::Legacy).unwrap(),
            62.03,
        );
        assert_close(
            parse_duration("0:0:10.00", DurationRule::Legacy).unwrap(),
            0.1,
        );
    }

    #[test]
    fn test_total_seconds_duration_rule() {
        assert_close(
            parse_duration("0:0:10.00", DurationRule::TotalSeconds).unwrap(),
            10.0,
        );
        assert_close(
            parse_duration("1:02:03.45", DurationRule::TotalSeconds).unwrap(),
            3723.0,
        );
    }

    #[test]
    fn test_fraction_is_discarded_not_rounded() {
        assert_close(
            parse_duration("0:00:59.999999", DurationRule::TotalSeconds).unwrap(),
            59.0,
        );
    }

    #[test]
    fn test_malformed_durations_are_rejected() {
        let cases = [
            "",
            "10.5",
            "0:00:10",
            "0:00:ab.0",
            "0:75:00.0",
            "24:00:00.0",
            "0:00:10.",
            "0:00:10.5x",
            "1:2.0",
        ];
        for text in cases {
            let err = parse_duration(text, DurationRule::Legacy).unwrap_err();
            assert!(
                matches!(err, ProbeError::Duration(_)),
                "{text:?} should be rejected"
            );
        }
    }
}
