use beatlane_core::chart::generator::{generate_beatmap, BeatmapConfig};
use beatlane_core::chart::Chart;
use chart_schema::{ChartFile, ChartMeta};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Generates a chart with the default beatmap shape. The same seed always
/// yields the same note layout; ids are fresh on every run.
pub fn generate_chart(seed: Option<u64>, title: &str, bpm: f64) -> ChartFile {
    let config = BeatmapConfig::default();
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let chart = Chart::from_notes(generate_beatmap(&config, &mut rng));

    let meta = ChartMeta {
        title: title.to_string(),
        total_duration_ms: config.total_duration_ms,
        ..ChartMeta::untitled(bpm)
    };
    chart.to_file(meta)
}
