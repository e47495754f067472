//! Time source for date-relative rules.
//!
//! # Responsibility
//! - Supply "now" and the time zone that defines calendar days.
//! - Let tests pin time so sorting and statistics are reproducible.
//!
//! # Invariants
//! - Day boundaries use the zone offset in force at the instant being
//!   converted, so DST changes never move an instant to a neighbouring day.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone, Utc};

/// Wall clock plus the time zone that defines calendar days.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar day of `instant` in this clock's zone.
    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate;

    /// First instant of `date` in this clock's zone.
    fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc>;

    fn today(&self) -> NaiveDate {
        self.local_date(self.now())
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        (**self).local_date(instant)
    }

    fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        (**self).start_of_day(date)
    }
}

/// Production clock backed by the host time and time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        date_in(&Local, instant)
    }

    fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        midnight_in(&Local, date)
    }
}

/// Frozen clock for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock<Z: TimeZone = Utc> {
    now: DateTime<Utc>,
    zone: Z,
}

impl FixedClock<Utc> {
    /// Frozen at `now`, calendar days in UTC.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now, zone: Utc }
    }
}

impl FixedClock<FixedOffset> {
    pub fn with_offset(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, zone: offset }
    }
}

impl<Z: TimeZone> FixedClock<Z> {
    /// Frozen at `now`, calendar days in `zone` (DST rules included).
    pub fn in_zone(now: DateTime<Utc>, zone: Z) -> Self {
        Self { now, zone }
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl<Z: TimeZone> Clock for FixedClock<Z> {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        date_in(&self.zone, instant)
    }

    fn start_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        midnight_in(&self.zone, date)
    }
}

fn date_in<Z: TimeZone>(zone: &Z, instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(zone).date_naive()
}

/// Earliest existing local time on `date`. Zones that skip midnight for DST
/// start the day at the first hour that exists.
fn midnight_in<Z: TimeZone>(zone: &Z, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..24)
        .find_map(|hour| {
            zone.from_local_datetime(&(midnight + Duration::hours(hour)))
                .earliest()
        })
        .map_or_else(
            || Utc.from_utc_datetime(&midnight),
            |local| local.with_timezone(&Utc),
        )
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock};
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
    use chrono_tz::America::{New_York, Santiago};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn local_date_respects_offset() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 23, 30, 0).unwrap();
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        let clock = FixedClock::with_offset(now, east);
        assert_eq!(clock.today(), day(2026, 1, 2));
    }

    #[test]
    fn start_of_day_maps_local_midnight_to_utc() {
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        let clock = FixedClock::with_offset(Utc::now(), east);
        assert_eq!(
            clock.start_of_day(day(2026, 1, 2)),
            Utc.with_ymd_and_hms(2026, 1, 1, 22, 0, 0).unwrap()
        );
    }

    #[test]
    fn zone_offset_is_taken_at_the_converted_instant() {
        // "now" sits in EDT (-04:00); the instant converted is in EST (-05:00).
        let summer = Utc.with_ymd_and_hms(2026, 7, 1, 12, 0, 0).unwrap();
        let clock = FixedClock::in_zone(summer, New_York);

        let late_evening = Utc.with_ymd_and_hms(2026, 1, 15, 4, 30, 0).unwrap();
        assert_eq!(clock.local_date(late_evening), day(2026, 1, 14));
        assert_eq!(
            clock.start_of_day(day(2026, 1, 15)),
            Utc.with_ymd_and_hms(2026, 1, 15, 5, 0, 0).unwrap()
        );
        assert_eq!(
            clock.start_of_day(day(2026, 7, 15)),
            Utc.with_ymd_and_hms(2026, 7, 15, 4, 0, 0).unwrap()
        );
    }

    #[test]
    fn skipped_midnight_starts_day_at_first_existing_hour() {
        // Chile springs forward at local midnight: 2026-09-06 00:00 does not exist.
        let clock = FixedClock::in_zone(Utc::now(), Santiago);
        let start = clock.start_of_day(day(2026, 9, 6));
        assert_eq!(clock.local_date(start), day(2026, 9, 6));
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 9, 6, 4, 0, 0).unwrap());
    }
}
