mod config;
mod grid;
mod widget;

pub(crate) use config::{Frequency, HeatmapConfig, WeekStart};
pub(crate) use widget::{natural_height, Heatmap, HeatmapState};
