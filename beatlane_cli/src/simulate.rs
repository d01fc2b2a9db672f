use std::fmt::Write as _;

use beatlane_core::chart::Chart;
use beatlane_core::config::GameSettings;
use beatlane_core::gameplay::player::GamePlayer;
use beatlane_core::gameplay::session::PlayResult;
use beatlane_core::input::events::KeyEvent;
use beatlane_core::time::clock::ManualTimeSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One 60 Hz frame.
const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Debug, Clone, Default)]
pub struct SimulateOptions {
    pub offset_ms: f64,
    pub jitter_ms: f64,
    pub miss_every: Option<u32>,
    pub seed: Option<u64>,
}

/// Plays the chart with a virtual player pressing each note's lane key at
/// `note time + offset +/- jitter`, frame by frame on a manual clock.
pub fn run_simulation(
    chart: &Chart,
    settings: &GameSettings,
    options: &SimulateOptions,
) -> anyhow::Result<PlayResult> {
    if !options.offset_ms.is_finite() || !(options.jitter_ms.is_finite() && options.jitter_ms >= 0.0)
    {
        anyhow::bail!(
            "offset and jitter must be finite, jitter non-negative (got {} / {})",
            options.offset_ms,
            options.jitter_ms
        );
    }

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut pending = plan_presses(chart, settings, options, &mut rng)
        .into_iter()
        .peekable();

    let source = ManualTimeSource::new(0.0);
    let mut player = GamePlayer::new(source.clone(), settings);
    player.start(chart.notes.clone());

    let mut next_frame = FRAME_MS;
    loop {
        let now = match pending.peek() {
            Some((t, _)) if *t < next_frame => *t,
            _ => next_frame,
        };
        if now >= next_frame {
            next_frame += FRAME_MS;
        }
        source.set(now);

        while let Some((_, event)) = pending.next_if(|(t, _)| *t <= now) {
            player.push_input(event);
        }

        let report = player.tick();
        for judged in &report.judged {
            log::debug!(
                "lane {} {:?} ({:+.1} ms)",
                judged.lane,
                judged.judgment.kind,
                judged.time_diff_ms
            );
        }
        if report.finished {
            break;
        }
    }

    Ok(player.result())
}

/// Press times in ascending order.
fn plan_presses(
    chart: &Chart,
    settings: &GameSettings,
    options: &SimulateOptions,
    rng: &mut StdRng,
) -> Vec<(f64, KeyEvent)> {
    let mut presses: Vec<(f64, KeyEvent)> = chart
        .notes
        .iter()
        .enumerate()
        .filter(|(i, _)| match options.miss_every {
            Some(n) if n > 0 => (i + 1) % n as usize != 0,
            _ => true,
        })
        .filter_map(|(_, note)| {
            let key = settings.key_map.key_for(note.lane)?;
            let jitter = if options.jitter_ms > 0.0 {
                rng.gen_range(-options.jitter_ms..=options.jitter_ms)
            } else {
                0.0
            };
            let at = (note.time_ms + options.offset_ms + jitter).max(0.0);
            Some((
                at,
                KeyEvent {
                    code: key.clone(),
                    pressed: true,
                },
            ))
        })
        .collect();
    presses.sort_by(|a, b| a.0.total_cmp(&b.0));
    presses
}

pub fn format_result(result: &PlayResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "score: {}", result.score);
    let _ = writeln!(out, "max combo: {}", result.max_combo);
    let _ = writeln!(out, "perfect: {}", result.perfect);
    let _ = writeln!(out, "good: {}", result.good);
    let _ = writeln!(out, "miss: {}", result.miss);
    let _ = writeln!(out, "accuracy: {:.2}%", result.accuracy);
    let _ = writeln!(out, "rank: {:?}", result.rank);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use beatlane_core::chart::{Note, NoteColor};
    use beatlane_core::gameplay::session::Rank;

    fn chart() -> Chart {
        Chart::from_notes(
            (0..8)
                .map(|i| Note::tap(i % 4, 500.0 + i as f64 * 250.0, NoteColor::Blue))
                .collect(),
        )
    }

    #[test]
    fn exact_presses_are_all_perfect() {
        let result =
            run_simulation(&chart(), &GameSettings::default(), &SimulateOptions::default())
                .unwrap();
        assert_eq!(result.perfect, 8);
        assert_eq!(result.max_combo, 8);
        assert_eq!(result.rank, Rank::S);
    }

    #[test]
    fn late_offset_lands_in_good() {
        let options = SimulateOptions {
            offset_ms: 80.0,
            ..SimulateOptions::default()
        };
        let result = run_simulation(&chart(), &GameSettings::default(), &options).unwrap();
        assert_eq!(result.good, 8);
        assert_eq!(result.score, 400);
    }

    #[test]
    fn skipped_notes_are_swept_as_misses() {
        let options = SimulateOptions {
            miss_every: Some(2),
            ..SimulateOptions::default()
        };
        let result = run_simulation(&chart(), &GameSettings::default(), &options).unwrap();
        assert_eq!(result.perfect, 4);
        assert_eq!(result.miss, 4);
        assert_eq!(result.max_combo, 1);
    }

    #[test]
    fn jitter_is_reproducible_with_a_seed() {
        let options = SimulateOptions {
            jitter_ms: 90.0,
            seed: Some(5),
            ..SimulateOptions::default()
        };
        let a = run_simulation(&chart(), &GameSettings::default(), &options).unwrap();
        let b = run_simulation(&chart(), &GameSettings::default(), &options).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.perfect + a.good + a.miss, 8);
    }

    #[test]
    fn negative_jitter_is_rejected() {
        let options = SimulateOptions {
            jitter_ms: -1.0,
            ..SimulateOptions::default()
        };
        assert!(run_simulation(&chart(), &GameSettings::default(), &options).is_err());
    }
}
