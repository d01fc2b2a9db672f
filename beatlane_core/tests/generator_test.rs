use beatlane_core::chart::generator::{generate_beatmap, generate_random_beatmap, BeatmapConfig};
use beatlane_core::chart::{NoteKind, MAX_LANE};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_default_beatmap_shape() {
    let config = BeatmapConfig::default();
    let mut rng = StdRng::seed_from_u64(7);
    let notes = generate_beatmap(&config, &mut rng);

    assert!(!notes.is_empty());
    let first = notes[0].time_ms;
    assert!((1400.0..=1800.0).contains(&first), "first note at {first}");

    for pair in notes.windows(2) {
        let gap = pair[1].time_ms - pair[0].time_ms;
        assert!(gap == 400.0 || gap == 800.0, "unexpected gap {gap}");
    }
    for note in &notes {
        assert!(note.time_ms < config.total_duration_ms);
        assert!(note.lane <= MAX_LANE);
        assert!(note.is_pending());
        if let NoteKind::Hold { duration_ms } = note.kind {
            assert!((200.0..700.0).contains(&duration_ms));
        }
    }
}

#[test]
fn test_same_seed_same_chart() {
    let config = BeatmapConfig::default();
    let a = generate_beatmap(&config, &mut StdRng::seed_from_u64(42));
    let b = generate_beatmap(&config, &mut StdRng::seed_from_u64(42));
    let shape = |notes: &[beatlane_core::Note]| {
        notes
            .iter()
            .map(|n| (n.time_ms, n.lane, n.kind, n.color))
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&a), shape(&b));
}

#[test]
fn test_ids_are_unique() {
    let notes = generate_random_beatmap(&BeatmapConfig::default());
    let mut ids: Vec<_> = notes.iter().map(|n| n.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), notes.len());
}

#[test]
fn test_short_duration_yields_empty_chart() {
    let config = BeatmapConfig {
        total_duration_ms: 1200.0,
        ..BeatmapConfig::default()
    };
    assert!(generate_beatmap(&config, &mut StdRng::seed_from_u64(1)).is_empty());
}

#[test]
fn test_always_short_interval_without_holds() {
    let config = BeatmapConfig {
        total_duration_ms: 5000.0,
        short_interval_chance: 1.0,
        hold_chance: 0.0,
        ..BeatmapConfig::default()
    };
    let notes = generate_beatmap(&config, &mut StdRng::seed_from_u64(3));
    let times: Vec<f64> = notes.iter().map(|n| n.time_ms).collect();
    assert_eq!(
        times,
        vec![1400.0, 1800.0, 2200.0, 2600.0, 3000.0, 3400.0, 3800.0, 4200.0, 4600.0]
    );
    assert!(notes.iter().all(|n| n.kind == NoteKind::Tap));
}

#[test]
fn test_non_positive_interval_is_empty() {
    let config = BeatmapConfig {
        base_interval_ms: 0.0,
        ..BeatmapConfig::default()
    };
    assert!(generate_beatmap(&config, &mut StdRng::seed_from_u64(0)).is_empty());
}

#[test]
fn test_non_finite_config_is_empty() {
    let broken = [
        BeatmapConfig {
            total_duration_ms: f64::NAN,
            ..BeatmapConfig::default()
        },
        BeatmapConfig {
            total_duration_ms: f64::INFINITY,
            ..BeatmapConfig::default()
        },
        BeatmapConfig {
            start_offset_ms: f64::NAN,
            ..BeatmapConfig::default()
        },
        BeatmapConfig {
            short_interval_chance: f64::NAN,
            ..BeatmapConfig::default()
        },
        BeatmapConfig {
            hold_chance: f64::NAN,
            ..BeatmapConfig::default()
        },
        BeatmapConfig {
            hold_max_ms: f64::INFINITY,
            ..BeatmapConfig::default()
        },
        BeatmapConfig {
            start_offset_ms: -500.0,
            ..BeatmapConfig::default()
        },
    ];
    for config in &broken {
        assert!(
            generate_beatmap(config, &mut StdRng::seed_from_u64(0)).is_empty(),
            "{config:?}"
        );
    }
}

#[test]
fn test_zero_hold_minimum_generates_taps_only() {
    let config = BeatmapConfig {
        total_duration_ms: 10_000.0,
        hold_chance: 1.0,
        hold_min_ms: 0.0,
        ..BeatmapConfig::default()
    };
    let notes = generate_beatmap(&config, &mut StdRng::seed_from_u64(4));
    assert!(!notes.is_empty());
    assert!(notes.iter().all(|n| n.kind == NoteKind::Tap));
}
