use std::fmt::Write as _;

use beatlane_core::chart::{Chart, NoteColor, NoteKind, LANE_COUNT};

const LANES: usize = LANE_COUNT as usize;

/// Renders one row per distinct event time.
///
/// `N` tap, `H` hold head, `|` holding, `#` hold tail, `.` empty.
/// Pink notes are listed in the info column.
pub fn render_timeline(chart: &Chart) -> String {
    let mut out = String::new();

    let mut time_points: Vec<f64> = chart
        .notes
        .iter()
        .flat_map(|n| {
            let end = n.duration_ms().map(|d| n.time_ms + d);
            std::iter::once(n.time_ms).chain(end)
        })
        .collect();
    time_points.sort_by(f64::total_cmp);
    time_points.dedup();

    if time_points.is_empty() {
        out.push_str("Chart is empty.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "Timeline ({} notes, last at {:.1} ms)",
        chart.notes.len(),
        time_points[time_points.len() - 1]
    );
    let _ = writeln!(out, " Time(ms) | 0 1 2 3 | Info");
    let _ = writeln!(out, "----------|---------|------------------");

    // End time of the hold currently sounding on each lane.
    let mut holding: [Option<f64>; LANES] = [None; LANES];

    for &t in &time_points {
        let mut lane_chars = ['.'; LANES];
        for (lane, end) in holding.iter().enumerate() {
            if end.is_some() {
                lane_chars[lane] = '|';
            }
        }

        let mut info = Vec::new();
        for (lane, end) in holding.iter_mut().enumerate() {
            if *end == Some(t) {
                lane_chars[lane] = '#';
                *end = None;
            }
        }

        for note in chart.notes.iter().filter(|n| n.time_ms == t) {
            let lane = note.lane as usize;
            lane_chars[lane] = match note.kind {
                NoteKind::Tap => 'N',
                NoteKind::Hold { duration_ms } => {
                    holding[lane] = Some(t + duration_ms);
                    'H'
                }
            };
            if note.color == NoteColor::Pink {
                info.push(format!("pink@{lane}"));
            }
        }

        let lanes = lane_chars
            .iter()
            .map(char::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(out, "{t:9.1} | {lanes} | {}", info.join(", "));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use beatlane_core::chart::Note;

    #[test]
    fn empty_chart() {
        assert_eq!(render_timeline(&Chart::default()), "Chart is empty.\n");
    }

    #[test]
    fn holds_span_rows_until_their_tail() {
        let chart = Chart::from_notes(vec![
            Note::tap(0, 500.0, NoteColor::Blue),
            Note::hold(2, 1000.0, 500.0, NoteColor::Pink),
            Note::tap(1, 1250.0, NoteColor::Blue),
        ]);
        let out = render_timeline(&chart);
        let rows: Vec<&str> = out.lines().skip(3).collect();

        assert_eq!(rows.len(), 4);
        assert!(rows[0].ends_with("| N . . . | "));
        assert!(rows[1].contains("| . . H . | pink@2"));
        assert!(rows[2].contains("| . N | . |"));
        assert!(rows[3].contains("| . . # . |"));
    }
}
