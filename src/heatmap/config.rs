use crate::records::StatusKind;
use crate::theme::Palette;
use std::str::FromStr;
use thiserror::Error;
use time::{Month, Weekday};

/// Bucket granularity: controls the time range, the grid layout, and the
/// record-matching rule.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum Frequency {
    Hour,
    #[default]
    Day,
    Week,
    Month,
}

impl Frequency {
    pub(crate) fn next(self) -> Frequency {
        match self {
            Frequency::Hour => Frequency::Day,
            Frequency::Day => Frequency::Week,
            Frequency::Week => Frequency::Month,
            Frequency::Month => Frequency::Hour,
        }
    }

    /// Height of the bucket grid in cell rows.
    pub(crate) fn grid_rows(self) -> u16 {
        match self {
            Frequency::Hour => 6,
            Frequency::Day | Frequency::Week => 7,
            Frequency::Month => 4,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Frequency::Hour => "hour",
            Frequency::Day => "day",
            Frequency::Week => "week",
            Frequency::Month => "month",
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid frequency {0:?}; expected hour, day, week, or month")]
pub(crate) struct ParseFrequencyError(String);

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Frequency, ParseFrequencyError> {
        match s.to_ascii_lowercase().as_str() {
            "hour" => Ok(Frequency::Hour),
            "day" => Ok(Frequency::Day),
            "week" => Ok(Frequency::Week),
            "month" => Ok(Frequency::Month),
            _ => Err(ParseFrequencyError(s.to_owned())),
        }
    }
}

/// First day of the week for the day-frequency rows.  Week frequency always
/// uses Monday-started ISO weeks regardless of this setting.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub(crate) fn toggled(self) -> WeekStart {
        match self {
            WeekStart::Sunday => WeekStart::Monday,
            WeekStart::Monday => WeekStart::Sunday,
        }
    }

    /// Row index of a weekday under this week-start convention.
    pub(crate) fn row(self, weekday: Weekday) -> u16 {
        let days = match self {
            WeekStart::Sunday => weekday.number_days_from_sunday(),
            WeekStart::Monday => weekday.number_days_from_monday(),
        };
        u16::from(days)
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid week start {0:?}; expected sun or mon")]
pub(crate) struct ParseWeekStartError(String);

impl FromStr for WeekStart {
    type Err = ParseWeekStartError;

    fn from_str(s: &str) -> Result<WeekStart, ParseWeekStartError> {
        match s.to_ascii_lowercase().as_str() {
            "sun" | "sunday" | "0" => Ok(WeekStart::Sunday),
            "mon" | "monday" | "1" => Ok(WeekStart::Monday),
            _ => Err(ParseWeekStartError(s.to_owned())),
        }
    }
}

/// Display strings for labels, legend entries, and the tooltip.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Locale {
    /// Month names, January first.
    pub(crate) months: Vec<String>,
    /// Day names, Sunday first.
    pub(crate) days: Vec<String>,
    /// Labels for the six 4-hour rows of the hour grid.
    pub(crate) hours: Vec<String>,
    pub(crate) anomaly: String,
    pub(crate) no_anomaly: String,
    pub(crate) error: String,
    pub(crate) no_data: String,
    pub(crate) default_msg: String,
    pub(crate) for_period: String,
}

impl Default for Locale {
    fn default() -> Locale {
        Locale {
            months: to_strings(&[
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov",
                "Dec",
            ]),
            days: to_strings(&["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"]),
            hours: to_strings(&["12-4am", "4-8am", "8-12pm", "12-4pm", "4-8pm", "8-12am"]),
            anomaly: "Anomaly".to_owned(),
            no_anomaly: "No Anomaly".to_owned(),
            error: "Error".to_owned(),
            no_data: "No Data for Timeseries".to_owned(),
            default_msg: "No Job Scheduled".to_owned(),
            for_period: "for period".to_owned(),
        }
    }
}

impl Locale {
    pub(crate) fn month_name(&self, month: Month) -> &str {
        let index = usize::from(u8::from(month) - 1);
        self.months.get(index).map_or("", String::as_str)
    }

    pub(crate) fn day_name(&self, weekday: Weekday) -> &str {
        let index = usize::from(weekday.number_days_from_sunday());
        self.days.get(index).map_or("", String::as_str)
    }

    /// Day names ordered for the given week start.
    pub(crate) fn ordered_days(&self, week_start: WeekStart) -> Vec<String> {
        let mut days = self.days.clone();
        if week_start == WeekStart::Monday && !days.is_empty() {
            days.rotate_left(1);
        }
        days
    }

    pub(crate) fn status_label(&self, kind: StatusKind) -> &str {
        match kind {
            StatusKind::None => &self.default_msg,
            StatusKind::Success => &self.no_anomaly,
            StatusKind::Warning => &self.anomaly,
            StatusKind::Error => &self.error,
            StatusKind::NoData => &self.no_data,
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|&s| s.to_owned()).collect()
}

/// Immutable per-widget configuration, built once via the builder and passed
/// by reference into every render.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct HeatmapConfig {
    /// Hours subtracted from the current time before computing the range.
    pub(crate) lag_hours: i64,
    pub(crate) frequency: Frequency,
    /// Initial chart pane width in columns.
    pub(crate) width: u16,
    pub(crate) palette: Palette,
    pub(crate) tooltip_enabled: bool,
    pub(crate) legend_enabled: bool,
    /// When false, cell clicks neither select nor emit a payload.
    pub(crate) click_enabled: bool,
    pub(crate) week_start: WeekStart,
    pub(crate) locale: Locale,
}

impl Default for HeatmapConfig {
    fn default() -> HeatmapConfig {
        HeatmapConfig {
            lag_hours: 0,
            frequency: Frequency::default(),
            width: 120,
            palette: Palette::default(),
            tooltip_enabled: true,
            legend_enabled: true,
            click_enabled: true,
            week_start: WeekStart::default(),
            locale: Locale::default(),
        }
    }
}

impl HeatmapConfig {
    pub(crate) fn builder() -> HeatmapConfigBuilder {
        HeatmapConfigBuilder::default()
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct HeatmapConfigBuilder(HeatmapConfig);

impl HeatmapConfigBuilder {
    pub(crate) fn lag_hours(mut self, hours: i64) -> Self {
        self.0.lag_hours = hours;
        self
    }

    pub(crate) fn frequency(mut self, frequency: Frequency) -> Self {
        self.0.frequency = frequency;
        self
    }

    pub(crate) fn width(mut self, width: u16) -> Self {
        self.0.width = width;
        self
    }

    pub(crate) fn palette(mut self, palette: Palette) -> Self {
        self.0.palette = palette;
        self
    }

    pub(crate) fn tooltip_enabled(mut self, enabled: bool) -> Self {
        self.0.tooltip_enabled = enabled;
        self
    }

    pub(crate) fn legend_enabled(mut self, enabled: bool) -> Self {
        self.0.legend_enabled = enabled;
        self
    }

    pub(crate) fn click_enabled(mut self, enabled: bool) -> Self {
        self.0.click_enabled = enabled;
        self
    }

    pub(crate) fn week_start(mut self, week_start: WeekStart) -> Self {
        self.0.week_start = week_start;
        self
    }

    pub(crate) fn locale(mut self, locale: Locale) -> Self {
        self.0.locale = locale;
        self
    }

    pub(crate) fn build(self) -> HeatmapConfig {
        self.0
    }
}
