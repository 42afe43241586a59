use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use time::OffsetDateTime;

/// Classification of a status record, driving cell color and legend text.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum StatusKind {
    #[default]
    #[serde(rename = "", alias = "none")]
    None,
    Success,
    Warning,
    Error,
    NoData,
}

impl StatusKind {
    /// Legend order matches the palette's insertion order.
    pub(crate) const ALL: [StatusKind; 5] = [
        StatusKind::None,
        StatusKind::Success,
        StatusKind::Warning,
        StatusKind::Error,
        StatusKind::NoData,
    ];
}

/// One dated status datapoint.  `date` decides which time bucket the record
/// colors; `timestamp` is an opaque value handed back to the host on click.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct StatusRecord {
    #[serde(with = "time::serde::timestamp")]
    pub(crate) date: OffsetDateTime,
    #[serde(rename = "type", default)]
    pub(crate) kind: StatusKind,
    #[serde(default)]
    pub(crate) timestamp: Option<i64>,
}

/// Reads a whole record sequence from a JSON array file.  Records are only
/// ever replaced wholesale, never patched in place.
pub(crate) fn load_records(path: &Path) -> anyhow::Result<Vec<StatusRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_parse_record() {
        let json = r#"{"date": 1710946800, "type": "success", "timestamp": 42}"#;
        let record = serde_json::from_str::<StatusRecord>(json).unwrap();
        assert_eq!(record.date, datetime!(2024-03-20 15:00 UTC));
        assert_eq!(record.kind, StatusKind::Success);
        assert_eq!(record.timestamp, Some(42));
    }

    #[test]
    fn test_parse_record_defaults() {
        let json = r#"{"date": 1710946800}"#;
        let record = serde_json::from_str::<StatusRecord>(json).unwrap();
        assert_eq!(record.kind, StatusKind::None);
        assert_eq!(record.timestamp, None);
    }

    #[test]
    fn test_parse_kinds() {
        for (text, kind) in [
            (r#""""#, StatusKind::None),
            (r#""success""#, StatusKind::Success),
            (r#""warning""#, StatusKind::Warning),
            (r#""error""#, StatusKind::Error),
            (r#""nodata""#, StatusKind::NoData),
        ] {
            assert_eq!(serde_json::from_str::<StatusKind>(text).unwrap(), kind);
        }
    }
}
