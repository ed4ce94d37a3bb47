//! Streak engine.
//!
//! Pure functions over a [`CompletionSet`] and an explicit reference day. No
//! function here reads the clock; callers pass "today" in.

use crate::habit::{CompletionDate, CompletionSet};

/// True iff `day` is in `completions`.
pub fn is_completed_on(completions: &CompletionSet, day: CompletionDate) -> bool {
    completions.contains(day)
}

/// Return a copy of `completions` with `day`'s membership flipped.
///
/// Applying it twice with the same day yields the original set.
pub fn toggle(completions: &CompletionSet, day: CompletionDate) -> CompletionSet {
    let mut next = completions.clone();
    toggle_in_place(&mut next, day);
    next
}

/// Flip `day`'s membership in `completions`; returns true if it is now completed.
pub fn toggle_in_place(completions: &mut CompletionSet, day: CompletionDate) -> bool {
    if completions.remove(day) {
        false
    } else {
        completions.insert(day)
    }
}

/// Day the backward walk starts from: `today` if completed, else the day before.
pub fn anchor_day(completions: &CompletionSet, today: CompletionDate) -> Option<CompletionDate> {
    if completions.contains(today) {
        Some(today)
    } else {
        today.pred()
    }
}

/// Number of consecutive completed days ending at the anchor day.
///
/// A habit not yet done today still reports the streak that ran through
/// yesterday. Completions after `today` are never reached.
pub fn current_streak(completions: &CompletionSet, today: CompletionDate) -> u32 {
    if completions.is_empty() {
        return 0;
    }

    let mut streak = 0;
    let mut cursor = anchor_day(completions, today);
    while let Some(day) = cursor {
        if !completions.contains(day) {
            break;
        }
        streak += 1;
        cursor = day.pred();
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(s: &str) -> CompletionDate {
        CompletionDate::parse(s).unwrap()
    }

    fn set(days: &[&str]) -> CompletionSet {
        CompletionSet::parse(days).unwrap()
    }

    #[test]
    fn streak_through_today() {
        let c = set(&["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(current_streak(&c, d("2024-01-03")), 3);
    }

    #[test]
    fn streak_through_yesterday_when_today_open() {
        let c = set(&["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(current_streak(&c, d("2024-01-04")), 3);
    }

    #[test]
    fn streak_resets_after_missed_day() {
        let c = set(&["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(current_streak(&c, d("2024-01-05")), 0);
    }

    #[test]
    fn empty_set_has_no_streak() {
        assert_eq!(current_streak(&CompletionSet::new(), d("2024-01-01")), 0);
    }

    #[test]
    fn gap_stops_the_walk() {
        let c = set(&["2024-01-01", "2024-01-03"]);
        assert_eq!(current_streak(&c, d("2024-01-03")), 1);
    }

    #[test]
    fn future_days_are_ignored() {
        let c = set(&["2024-01-10"]);
        assert_eq!(current_streak(&c, d("2024-01-01")), 0);

        let c = set(&["2024-01-01", "2024-01-02", "2024-01-05"]);
        assert_eq!(current_streak(&c, d("2024-01-02")), 2);
    }

    #[test]
    fn streak_crosses_year_boundary() {
        let c = set(&["2023-12-30", "2023-12-31", "2024-01-01"]);
        assert_eq!(current_streak(&c, d("2024-01-01")), 3);
    }

    #[test]
    fn streak_crosses_leap_day() {
        let c = set(&["2024-02-28", "2024-02-29", "2024-03-01"]);
        assert_eq!(current_streak(&c, d("2024-03-02")), 3);
    }

    #[test]
    fn anchor_prefers_today() {
        let c = set(&["2024-01-03"]);
        assert_eq!(anchor_day(&c, d("2024-01-03")), Some(d("2024-01-03")));
        assert_eq!(anchor_day(&c, d("2024-01-04")), Some(d("2024-01-03")));
    }

    #[test]
    fn walk_stops_at_earliest_representable_day() {
        let first = CompletionDate::from(chrono::NaiveDate::MIN);
        let c: CompletionSet = [first].into_iter().collect();
        assert_eq!(current_streak(&c, first), 1);
    }

    #[test]
    fn toggle_adds_and_removes() {
        let c = set(&["2024-01-01"]);
        let added = toggle(&c, d("2024-01-02"));
        assert!(is_completed_on(&added, d("2024-01-02")));
        let removed = toggle(&added, d("2024-01-01"));
        assert_eq!(removed, set(&["2024-01-02"]));
    }

    #[test]
    fn toggle_in_place_reports_new_membership() {
        let mut c = set(&["2024-01-01"]);
        assert!(toggle_in_place(&mut c, d("2024-01-02")));
        assert!(!toggle_in_place(&mut c, d("2024-01-01")));
        assert_eq!(c, set(&["2024-01-02"]));
    }

    fn arb_day() -> impl Strategy<Value = CompletionDate> {
        // 2000-01-01 plus up to ~30 years
        (0i64..11_000).prop_map(|offset| {
            let base = chrono::NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
            CompletionDate::from(base + chrono::Duration::days(offset))
        })
    }

    fn arb_set() -> impl Strategy<Value = CompletionSet> {
        prop::collection::vec(arb_day(), 0..40).prop_map(|days| days.into_iter().collect())
    }

    /// Sets made of a single contiguous run, so streaks are non-trivial.
    fn arb_run() -> impl Strategy<Value = (CompletionSet, CompletionDate, u32)> {
        (arb_day(), 1u32..60).prop_map(|(end, len)| {
            let mut set = CompletionSet::new();
            let mut day = end;
            for _ in 0..len {
                set.insert(day);
                day = day.pred().unwrap();
            }
            (set, end, len)
        })
    }

    proptest! {
        #[test]
        fn prop_toggle_is_involution(c in arb_set(), day in arb_day()) {
            prop_assert_eq!(toggle(&toggle(&c, day), day), c);
        }

        #[test]
        fn prop_toggle_flips_membership(c in arb_set(), day in arb_day()) {
            prop_assert_eq!(
                is_completed_on(&toggle(&c, day), day),
                !is_completed_on(&c, day)
            );
        }

        #[test]
        fn prop_in_place_matches_pure_toggle(c in arb_set(), day in arb_day()) {
            let mut in_place = c.clone();
            let now_completed = toggle_in_place(&mut in_place, day);
            prop_assert_eq!(&in_place, &toggle(&c, day));
            prop_assert_eq!(now_completed, is_completed_on(&in_place, day));
        }

        #[test]
        fn prop_toggle_touches_only_one_day(c in arb_set(), day in arb_day()) {
            let next = toggle(&c, day);
            prop_assert_eq!(next.len().abs_diff(c.len()), 1);
            for other in c.iter().filter(|d| *d != day) {
                prop_assert!(next.contains(other));
            }
        }

        #[test]
        fn prop_streak_bounded_by_set_size(c in arb_set(), today in arb_day()) {
            prop_assert!(current_streak(&c, today) as usize <= c.len());
        }

        #[test]
        fn prop_run_streak_matches_length((c, end, len) in arb_run()) {
            prop_assert_eq!(current_streak(&c, end), len);
            prop_assert_eq!(current_streak(&c, end.succ().unwrap()), len);
            prop_assert_eq!(current_streak(&c, end.succ().unwrap().succ().unwrap()), 0);
        }

        #[test]
        fn prop_future_days_never_count(c in arb_set(), today in arb_day()) {
            let past: CompletionSet = c.iter().filter(|d| *d <= today).collect();
            prop_assert_eq!(current_streak(&c, today), current_streak(&past, today));
        }
    }
}
