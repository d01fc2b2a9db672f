use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Times in the chart file are milliseconds from song start.
pub type Milliseconds = f64;

pub const CHART_FORMAT_VERSION: &str = "1";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartFile {
    pub meta: ChartMeta,
    pub notes: Vec<ChartNote>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartMeta {
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub bpm: f64,
    #[serde(default)]
    pub total_duration_ms: Milliseconds,
}

fn default_version() -> String {
    CHART_FORMAT_VERSION.to_string()
}

impl ChartMeta {
    pub fn untitled(bpm: f64) -> Self {
        Self {
            title: "Untitled".to_string(),
            artist: String::new(),
            version: default_version(),
            bpm,
            total_duration_ms: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub time_ms: Milliseconds,
    pub lane: u8,
    #[serde(flatten)]
    pub kind: ChartNoteKind,
    #[serde(default)]
    pub color: ChartColor,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ChartNoteKind {
    #[serde(rename = "tap")]
    Tap,

    #[serde(rename = "hold")]
    Hold { duration_ms: Milliseconds },
}

impl ChartNoteKind {
    pub fn duration_ms(&self) -> Option<Milliseconds> {
        match self {
            ChartNoteKind::Tap => None,
            ChartNoteKind::Hold { duration_ms } => Some(*duration_ms),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ChartColor {
    #[default]
    Blue,
    Pink,
}

impl ChartFile {
    /// End of the last note (hold tails included), or 0 for an empty chart.
    pub fn last_note_end_ms(&self) -> Milliseconds {
        self.notes
            .iter()
            .map(|n| n.time_ms + n.kind.duration_ms().unwrap_or(0.0))
            .fold(0.0, f64::max)
    }
}

pub fn load_chart_json_from_path(path: impl AsRef<Path>) -> anyhow::Result<ChartFile> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("failed to read chart: {}", path.display()))?;
    let chart: ChartFile = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse chart json: {}", path.display()))?;
    Ok(chart)
}

pub fn load_chart_json_from_str(json: &str) -> anyhow::Result<ChartFile> {
    let chart: ChartFile = serde_json::from_str(json).context("failed to parse chart json")?;
    Ok(chart)
}

pub fn save_chart_json_to_path(chart: &ChartFile, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(chart).context("failed to serialize chart")?;
    fs::write(path, json).with_context(|| format!("failed to write chart: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_note_serialization_includes_type_tag() {
        let note = ChartNote {
            id: Some("n1".to_string()),
            time_ms: 1200.0,
            lane: 2,
            kind: ChartNoteKind::Hold { duration_ms: 350.0 },
            color: ChartColor::Pink,
        };

        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["type"], "hold");
        assert_eq!(json["duration_ms"], 350.0);
        assert_eq!(json["time_ms"], 1200.0);
        assert_eq!(json["lane"], 2);
        assert_eq!(json["color"], "pink");
        assert_eq!(json["id"], "n1");
    }

    #[test]
    fn id_and_color_are_optional_on_input() {
        let v = serde_json::json!({
            "time_ms": 500.0,
            "lane": 1,
            "type": "tap"
        });

        let note: ChartNote = serde_json::from_value(v).unwrap();
        assert_eq!(note.id, None);
        assert_eq!(note.kind, ChartNoteKind::Tap);
        assert_eq!(note.color, ChartColor::Blue);
    }

    #[test]
    fn tap_without_id_omits_the_field() {
        let note = ChartNote {
            id: None,
            time_ms: 0.0,
            lane: 0,
            kind: ChartNoteKind::Tap,
            color: ChartColor::Blue,
        };
        let json = serde_json::to_value(&note).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("duration_ms").is_none());
    }

    #[test]
    fn chart_loads_from_str_and_reports_last_note_end() {
        let json = r#"{
            "meta": { "title": "t", "bpm": 128.0 },
            "notes": [
                { "time_ms": 1000.0, "lane": 0, "type": "tap" },
                { "time_ms": 1500.0, "lane": 3, "type": "hold", "duration_ms": 400.0, "color": "pink" }
            ]
        }"#;

        let chart = load_chart_json_from_str(json).unwrap();
        assert_eq!(chart.meta.version, CHART_FORMAT_VERSION);
        assert_eq!(chart.notes.len(), 2);
        assert_eq!(chart.last_note_end_ms(), 1900.0);
    }

    #[test]
    fn malformed_chart_is_an_error() {
        let err = load_chart_json_from_str("{ \"meta\": {} }").unwrap_err();
        assert!(err.to_string().contains("failed to parse chart json"));
    }

    #[test]
    fn saved_chart_loads_back() {
        let chart = load_chart_json_from_str(
            r#"{ "meta": { "title": "saved", "bpm": 140.0 },
                 "notes": [ { "time_ms": 250.0, "lane": 1, "type": "tap" } ] }"#,
        )
        .unwrap();
        let path =
            std::env::temp_dir().join(format!("chart_schema_save_{}.json", std::process::id()));

        save_chart_json_to_path(&chart, &path).unwrap();
        let back = load_chart_json_from_path(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(back.meta.title, "saved");
        assert_eq!(back.notes, chart.notes);
    }
}
