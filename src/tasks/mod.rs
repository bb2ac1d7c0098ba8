//! Background scheduled tasks for the application.
//!
//! Currently a single daily job deactivates client accounts whose membership
//! has ended. Call `spawn_all` once during startup to launch it.

use crate::config::SweepConfig;
use crate::services::MembershipService;
use chrono::{DateTime, Duration, Local, TimeZone};

/// Next occurrence of `hour:00` local time strictly after `now`.
///
/// Days whose `hour:00` does not exist (DST gap) are skipped.
pub fn next_run_after<Tz: TimeZone>(now: &DateTime<Tz>, hour: u32) -> DateTime<Tz> {
    let today = now.date_naive();
    for offset in 0..=2 {
        let candidate = (today + Duration::days(offset))
            .and_hms_opt(hour, 0, 0)
            .and_then(|naive| now.timezone().from_local_datetime(&naive).earliest());
        if let Some(at) = candidate
            && at > *now
        {
            return at;
        }
    }
    now.clone() + Duration::days(1)
}

/// Spawn all background tasks.
///
/// Notes
/// - The sweep only touches still-active rows, so an extra run is harmless.
/// - Nothing is persisted between runs; a restart just recomputes the next wake-up.
/// - This function detaches tasks via `tokio::spawn`; it does not block.
pub fn spawn_all(membership_service: MembershipService, sweep: SweepConfig) {
    let svc = membership_service;
    tokio::spawn(async move {
        loop {
            let now = Local::now();
            let next = next_run_after(&now, sweep.hour);
            log::info!("Next membership expiry sweep at {}", next.to_rfc3339());
            let wait = (next - now)
                .to_std()
                .unwrap_or(std::time::Duration::from_secs(60));
            tokio::time::sleep(wait).await;

            match svc.expire_memberships().await {
                Ok(n) => log::info!("Membership expiry sweep deactivated {n} members"),
                Err(e) => log::error!("Failed to expire memberships: {e:?}"),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Utc};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_before_hour_runs_same_day() {
        let next = next_run_after(&at(2025, 3, 1, 0, 30), 1);
        assert_eq!(next, at(2025, 3, 1, 1, 0));
    }

    #[test]
    fn test_exactly_at_hour_runs_next_day() {
        let next = next_run_after(&at(2025, 3, 1, 1, 0), 1);
        assert_eq!(next, at(2025, 3, 2, 1, 0));
    }

    #[test]
    fn test_after_hour_rolls_over_month_end() {
        let next = next_run_after(&at(2025, 2, 28, 23, 59), 1);
        assert_eq!(next, at(2025, 3, 1, 1, 0));
    }

    #[test]
    fn test_always_future_and_on_the_hour() {
        let start = at(2025, 1, 1, 0, 0);
        for step in 0..(48 * 4) {
            let now = start + Duration::minutes(15 * step);
            for hour in [0, 1, 13, 23] {
                let next = next_run_after(&now, hour);
                assert!(next > now);
                assert!(next - now <= Duration::days(1));
                assert_eq!(next.hour(), hour);
                assert_eq!(next.minute(), 0);
            }
        }
    }
}
