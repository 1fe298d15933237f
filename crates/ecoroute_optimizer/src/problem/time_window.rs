use jiff::civil;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Minutes since midnight.
pub type Minutes = i64;

/// Delivery window as minute-of-day offsets. Either bound may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, JsonSchema)]
pub struct TimeWindow {
    start: Option<Minutes>,
    end: Option<Minutes>,
}

impl TimeWindow {
    pub const NONE: TimeWindow = TimeWindow {
        start: None,
        end: None,
    };

    /// An inverted window (`start > end`) is treated as absent.
    pub fn new(start: Option<Minutes>, end: Option<Minutes>) -> Self {
        match (start, end) {
            (Some(start), Some(end)) if start > end => TimeWindow::NONE,
            _ => TimeWindow { start, end },
        }
    }

    /// Builds a window from `HH:MM` strings, unparseable bounds become absent.
    pub fn from_clock(start: Option<&str>, end: Option<&str>) -> Self {
        TimeWindow::new(
            start.and_then(parse_clock_minutes),
            end.and_then(parse_clock_minutes),
        )
    }

    pub fn start(&self) -> Option<Minutes> {
        self.start
    }

    pub fn end(&self) -> Option<Minutes> {
        self.end
    }

    /// Both bounds, when the window is fully specified.
    pub fn bounds(&self) -> Option<(Minutes, Minutes)> {
        self.start.zip(self.end)
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Parses a clock time (`08:00`, `8:05`, `08:00:00`) into minutes since midnight.
pub fn parse_clock_minutes(value: &str) -> Option<Minutes> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let time = value.parse::<civil::Time>().ok().or_else(|| {
        let mut parts = value.split(':');
        let hour = parts.next()?.trim().parse::<i8>().ok()?;
        let minute = parts.next()?.trim().parse::<i8>().ok()?;
        civil::Time::new(hour, minute, 0, 0).ok()
    })?;

    Some(i64::from(time.hour()) * 60 + i64::from(time.minute()))
}

pub fn format_clock_minutes(minutes: Minutes) -> String {
    format!("{:02}:{:02}", minutes.div_euclid(60), minutes.rem_euclid(60))
}
