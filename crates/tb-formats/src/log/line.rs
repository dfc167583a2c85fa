//! The prelude at the start of every device log line.
//!
//! `2r0096c008p023d18h18m53s401/314/314V` reads as household rotation 2,
//! power cycle 96, period 8, day 23, 18:18:53 into the period, then the
//! highest, steady-state and lowest voltage in hundredths of a volt.

use std::sync::{Arc, LazyLock};

use chrono::NaiveTime;
use regex::Regex;
use serde::Serialize;

use crate::context::SyncProcessingContext;

static NEWER_FIRMWARE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+p(.*)$").unwrap());

static PRELUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0|(\d+)r)(\d+)c(\d+)p\D*(\d+)d(\d+)h(\d+)m(\d+)s(\d+)/(\d+)/(\d+)V$")
        .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogLineInfo {
    pub household_rotation: u16,
    pub cycle: u16,
    pub period: u16,
    pub day_of_period: u32,
    pub time_in_period: NaiveTime,
    pub max_volts: f64,
    pub steady_state_volts: f64,
    pub min_volts: f64,
}

impl LogLineInfo {
    /// Parse a prelude. Returns `None` when the text is not a prelude or a
    /// number in it does not fit.
    pub fn parse(prelude: &str) -> Option<Self> {
        let prelude = NEWER_FIRMWARE_PREFIX
            .captures(prelude)
            .and_then(|caps| caps.get(1))
            .map_or(prelude, |m| m.as_str());

        let caps = PRELUDE.captures(prelude)?;
        let number = |group: usize| caps.get(group).map_or("", |m| m.as_str());

        let household_rotation = match caps.get(2) {
            Some(rotation) => rotation.as_str().parse().ok()?,
            None => 0,
        };
        let cycle = number(3).parse().ok()?;
        let period = number(4).parse().ok()?;
        let mut day: u32 = number(5).parse().ok()?;
        let mut hour: u32 = number(6).parse().ok()?;
        let mut minute: u32 = number(7).parse().ok()?;
        let mut second: u32 = number(8).parse().ok()?;
        let volts = |group: usize| number(group).parse::<f64>().ok().map(|v| v / 100.0);

        // Devices occasionally log minutes or hours past their range.
        minute = minute.saturating_add(second / 60);
        second %= 60;
        hour = hour.saturating_add(minute / 60);
        minute %= 60;
        day = day.saturating_add(hour / 24);
        hour %= 24;

        Some(Self {
            household_rotation,
            cycle,
            period,
            day_of_period: day,
            time_in_period: NaiveTime::from_hms_opt(hour, minute, second)?,
            max_volts: volts(9)?,
            steady_state_volts: volts(10)?,
            min_volts: volts(11)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LogFilePosition {
    pub file_name: String,
    /// 1-based.
    pub line_number: usize,
}

/// Header shared by every event decoded from one log line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogLineContext {
    pub info: Option<LogLineInfo>,
    pub position: LogFilePosition,
    pub sync: Arc<SyncProcessingContext>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2r0096c008p023d18h18m53s401/314/314V", 2, 96, 8, 23, (18, 18, 53), (4.01, 3.14, 3.14))]
    #[case("0096c008p023d18h18m53s401/314/314V", 0, 96, 8, 23, (18, 18, 53), (4.01, 3.14, 3.14))]
    #[case("0r0015c003p004d14h09m42s339/289/289V", 0, 15, 3, 4, (14, 9, 42), (3.39, 2.89, 2.89))]
    #[case("0r0035c012pS18d14h22m59s306/217/216V", 0, 35, 12, 18, (14, 22, 59), (3.06, 2.17, 2.16))]
    fn test_parses_prelude(
        #[case] text: &str,
        #[case] rotation: u16,
        #[case] cycle: u16,
        #[case] period: u16,
        #[case] day: u32,
        #[case] time: (u32, u32, u32),
        #[case] volts: (f64, f64, f64),
    ) {
        let info = LogLineInfo::parse(text).unwrap();
        assert_eq!(info.household_rotation, rotation);
        assert_eq!(info.cycle, cycle);
        assert_eq!(info.period, period);
        assert_eq!(info.day_of_period, day);
        assert_eq!(
            info.time_in_period,
            NaiveTime::from_hms_opt(time.0, time.1, time.2).unwrap()
        );
        assert_eq!(info.max_volts, volts.0);
        assert_eq!(info.steady_state_volts, volts.1);
        assert_eq!(info.min_volts, volts.2);
    }

    #[test]
    fn test_rejects_non_numeric_rotation() {
        assert_eq!(LogLineInfo::parse("ar0035c012pS18d14h22m59s306/217/216V"), None);
    }

    #[test]
    fn test_strips_newer_firmware_prefix() {
        let info = LogLineInfo::parse("0p2r0096c008p023d18h18m53s401/314/314V").unwrap();
        assert_eq!(info.household_rotation, 2);
        assert_eq!(info.cycle, 96);
    }

    #[test]
    fn test_carries_overflowing_clock_fields() {
        let info = LogLineInfo::parse("0r0001c001p001d23h59m75s300/300/300V").unwrap();
        assert_eq!(info.day_of_period, 2);
        assert_eq!(info.time_in_period, NaiveTime::from_hms_opt(0, 0, 15).unwrap());
    }
}
