//! Practice statistics derived from a user's progress history.

use chrono::{DateTime, Days, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{info, instrument};

use crate::constants::STREAK_WINDOW;
use crate::db::progress;
use crate::error::Result;
use crate::models::ProgressStats;

/// Aggregate statistics for `user_id` as of `now`
///
/// All reads share one transaction so the numbers describe a single snapshot.
#[instrument(skip(pool))]
pub async fn progress_stats(
    pool: &SqlitePool,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<ProgressStats> {
    info!("Computing progress statistics");

    let today = now.date_naive();
    let (day_start, day_end) = day_window(today);

    let mut tx = pool.begin().await?;

    let total_practices = progress::count_for_user(&mut *tx, user_id).await?;
    let total_seconds = progress::total_seconds(&mut *tx, user_id).await?;
    let completed_today =
        progress::completed_between(&mut *tx, user_id, day_start, day_end).await?;
    let favorite_yogasana = progress::favorite_yogasana(&mut *tx, user_id).await?;
    let recent = progress::recent_practice_dates(&mut *tx, user_id, STREAK_WINDOW).await?;

    tx.commit().await?;

    let dates: Vec<NaiveDate> = recent.iter().map(DateTime::date_naive).collect();

    Ok(ProgressStats {
        total_practices,
        total_time_minutes: seconds_to_minutes(total_seconds),
        completed_today,
        favorite_yogasana,
        practice_streak: practice_streak(&dates, today),
    })
}

/// Whole minutes in `seconds`, truncating
pub fn seconds_to_minutes(seconds: i64) -> i64 {
    seconds / 60
}

/// `[midnight, next midnight)` of `day` in UTC
pub fn day_window(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(chrono::NaiveTime::MIN).and_utc();
    let next = day.checked_add_days(Days::new(1)).unwrap_or(day);
    let end = next.and_time(chrono::NaiveTime::MIN).and_utc();
    (start, end)
}

/// Consecutive practice days ending today
///
/// `dates` must be ordered newest first. Walks the list keeping the day the
/// next counted session is expected on: a match extends the streak, an older
/// date ends it, and a newer one (a repeat of a counted day, or a future date)
/// is passed over. A streak that does not include today is 0.
pub fn practice_streak(dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let mut streak: u32 = 1;

    for &date in dates {
        let Some(expected) = today.checked_sub_days(Days::new(u64::from(streak - 1))) else {
            break;
        };

        if date == expected {
            streak += 1;
        } else if date < expected {
            break;
        }
    }

    streak - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_streak_empty_history() {
        assert_eq!(practice_streak(&[], day(2025, 3, 10)), 0);
    }

    #[test]
    fn test_streak_today_only() {
        let today = day(2025, 3, 10);
        assert_eq!(practice_streak(&[today], today), 1);
    }

    #[test]
    fn test_streak_requires_today() {
        let today = day(2025, 3, 10);
        assert_eq!(practice_streak(&[day(2025, 3, 9)], today), 0);
    }

    #[test]
    fn test_streak_same_day_repeat_is_skipped() {
        let today = day(2025, 3, 10);
        let dates = [today, today, day(2025, 3, 9), day(2025, 3, 7)];
        assert_eq!(practice_streak(&dates, today), 2);
    }

    #[test]
    fn test_streak_consecutive_days_with_repeats() {
        let today = day(2025, 3, 10);
        let dates = [
            today,
            day(2025, 3, 9),
            day(2025, 3, 9),
            day(2025, 3, 8),
            day(2025, 3, 8),
            day(2025, 3, 8),
        ];
        assert_eq!(practice_streak(&dates, today), 3);
    }

    #[test]
    fn test_streak_skips_future_dates() {
        let today = day(2025, 3, 10);
        let dates = [day(2025, 3, 12), today, day(2025, 3, 9)];
        assert_eq!(practice_streak(&dates, today), 2);
    }

    #[test]
    fn test_streak_crosses_month_boundary() {
        let today = day(2025, 3, 1);
        let dates = [today, day(2025, 2, 28), day(2025, 2, 27)];
        assert_eq!(practice_streak(&dates, today), 3);
    }

    #[test]
    fn test_seconds_to_minutes_truncates() {
        assert_eq!(seconds_to_minutes(65 + 65), 2);
        assert_eq!(seconds_to_minutes(59), 0);
        assert_eq!(seconds_to_minutes(0), 0);
    }

    #[test]
    fn test_day_window_spans_one_utc_day() {
        let (start, end) = day_window(day(2025, 12, 31));
        assert_eq!(start.to_rfc3339(), "2025-12-31T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-01-01T00:00:00+00:00");
    }
}
