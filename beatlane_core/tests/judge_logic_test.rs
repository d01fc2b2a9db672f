use beatlane_core::gameplay::judge::{
    judge, Judgment, JudgmentKind, Timing, GOOD_WINDOW_MS, MISS_WINDOW_MS, PERFECT_WINDOW_MS,
};
use proptest::prelude::*;

#[test]
fn test_exact_hit_is_perfect_late() {
    let j = judge(0.0).expect("Should judge");
    assert_eq!(j.kind, JudgmentKind::Perfect);
    assert_eq!(j.timing, Some(Timing::Late));
}

#[test]
fn test_window_edges_are_inclusive() {
    assert_eq!(judge(50.0).unwrap().kind, JudgmentKind::Perfect);
    assert_eq!(judge(-50.0).unwrap().kind, JudgmentKind::Perfect);
    assert_eq!(judge(50.001).unwrap().kind, JudgmentKind::Good);
    assert_eq!(judge(100.0).unwrap().kind, JudgmentKind::Good);
    assert_eq!(judge(-100.0).unwrap().kind, JudgmentKind::Good);
    assert_eq!(judge(150.0), Some(Judgment::miss()));
    assert_eq!(judge(-150.0), Some(Judgment::miss()));
    assert_eq!(judge(150.001), None);
    assert_eq!(judge(-150.001), None);
}

#[test]
fn test_early_input_is_fast() {
    // Note at 1000, input at 930: note is still 70ms away.
    let j = judge(1000.0 - 930.0).unwrap();
    assert_eq!(j.kind, JudgmentKind::Good);
    assert_eq!(j.timing, Some(Timing::Fast));
}

#[test]
fn test_late_input_is_late() {
    let j = judge(1000.0 - 1030.0).unwrap();
    assert_eq!(j.kind, JudgmentKind::Perfect);
    assert_eq!(j.timing, Some(Timing::Late));
}

#[test]
fn test_nan_is_not_judgeable() {
    assert_eq!(judge(f64::NAN), None);
}

#[test]
fn test_points() {
    assert_eq!(JudgmentKind::Perfect.points(), 100);
    assert_eq!(JudgmentKind::Good.points(), 50);
    assert_eq!(JudgmentKind::Miss.points(), 0);
}

proptest! {
    #[test]
    fn perfect_window_reports_timing(diff in -PERFECT_WINDOW_MS..=PERFECT_WINDOW_MS) {
        let j = judge(diff).unwrap();
        prop_assert_eq!(j.kind, JudgmentKind::Perfect);
        let expected = if diff > 0.0 { Timing::Fast } else { Timing::Late };
        prop_assert_eq!(j.timing, Some(expected));
    }

    #[test]
    fn good_window_reports_timing(
        abs in (PERFECT_WINDOW_MS + 1e-6)..=GOOD_WINDOW_MS,
        early in any::<bool>(),
    ) {
        let diff = if early { abs } else { -abs };
        let j = judge(diff).unwrap();
        prop_assert_eq!(j.kind, JudgmentKind::Good);
        let expected = if early { Timing::Fast } else { Timing::Late };
        prop_assert_eq!(j.timing, Some(expected));
    }

    #[test]
    fn miss_window_has_no_timing(
        abs in (GOOD_WINDOW_MS + 1e-6)..=MISS_WINDOW_MS,
        early in any::<bool>(),
    ) {
        let diff = if early { abs } else { -abs };
        prop_assert_eq!(judge(diff), Some(Judgment::miss()));
    }

    #[test]
    fn outside_miss_window_is_none(
        abs in (MISS_WINDOW_MS + 1e-6)..1e9,
        early in any::<bool>(),
    ) {
        let diff = if early { abs } else { -abs };
        prop_assert_eq!(judge(diff), None);
    }
}
