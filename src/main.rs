mod app;
mod heatmap;
mod help;
mod notify;
mod records;
mod request;
mod resize;
mod theme;
use crate::app::App;
use crate::heatmap::{Frequency, HeatmapConfig, WeekStart};
use crate::records::load_records;
use anyhow::Context;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::io;
use std::path::PathBuf;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct RunOptions {
    file: Option<PathBuf>,
    frequency: Option<Frequency>,
    lag: Option<i64>,
    week_start: Option<WeekStart>,
    width: Option<u16>,
    no_tooltip: bool,
    no_legend: bool,
    no_click: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = RunOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('f') | Arg::Long("frequency") => {
                    opts.frequency = Some(parser.value()?.parse()?);
                }
                Arg::Short('l') | Arg::Long("lag") => {
                    opts.lag = Some(parser.value()?.parse()?);
                }
                Arg::Long("week-start") => {
                    opts.week_start = Some(parser.value()?.parse()?);
                }
                Arg::Long("width") => {
                    opts.width = Some(parser.value()?.parse()?);
                }
                Arg::Long("no-tooltip") => opts.no_tooltip = true,
                Arg::Long("no-legend") => opts.no_legend = true,
                Arg::Long("no-click") => opts.no_click = true,
                Arg::Value(value) if opts.file.is_none() => {
                    opts.file = Some(PathBuf::from(value));
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                let records = match &opts.file {
                    Some(path) => load_records(path)?,
                    None => Vec::new(),
                };
                let config = opts.into_config();
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(config, records).run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: heatcal [OPTIONS] [FILE]");
                println!();
                println!("Calendar heatmap of dated status records in the terminal");
                println!();
                println!("FILE is a JSON array of records; without it the chart is empty.");
                println!();
                println!("Options:");
                println!("  -f, --frequency <FREQ>   Bucket granularity: hour, day, week, or month");
                println!("                           [default: day]");
                println!("  -l, --lag <HOURS>        Shift the chart's clock back this many hours");
                println!("      --week-start <DAY>   First day of the week: sun or mon [default: sun]");
                println!("      --width <COLS>       Initial chart pane width [default: 120]");
                println!("      --no-tooltip         Do not show a tooltip on hover");
                println!("      --no-legend          Do not show the status legend");
                println!("      --no-click           Ignore clicks on cells");
                println!("  -h, --help               Display this help message and exit");
                println!("  -V, --version            Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

impl RunOptions {
    fn into_config(self) -> HeatmapConfig {
        let mut builder = HeatmapConfig::builder()
            .tooltip_enabled(!self.no_tooltip)
            .legend_enabled(!self.no_legend)
            .click_enabled(!self.no_click);
        if let Some(frequency) = self.frequency {
            builder = builder.frequency(frequency);
        }
        if let Some(lag) = self.lag {
            builder = builder.lag_hours(lag);
        }
        if let Some(week_start) = self.week_start {
            builder = builder.week_start(week_start);
        }
        if let Some(width) = self.width {
            builder = builder.width(width);
        }
        builder.build()
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let enabled = crossterm::execute!(io::stdout(), EnableMouseCapture).is_ok();
    let r = func(terminal);
    if enabled {
        let _ = crossterm::execute!(io::stdout(), DisableMouseCapture);
    }
    ratatui::restore();
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_iter(
            std::iter::once("heatcal").chain(args.iter().copied()),
        ))
    }

    #[test]
    fn test_parse_defaults() {
        let Ok(Command::Run(opts)) = parse(&[]) else {
            panic!("expected a run command");
        };
        assert_eq!(opts, RunOptions::default());
        let config = opts.into_config();
        assert_eq!(config, HeatmapConfig::default());
    }

    #[test]
    fn test_parse_options() {
        let Ok(Command::Run(opts)) = parse(&[
            "-f",
            "week",
            "--lag",
            "6",
            "--week-start",
            "mon",
            "--width",
            "80",
            "--no-tooltip",
            "records.json",
        ]) else {
            panic!("expected a run command");
        };
        assert_eq!(opts.file, Some(PathBuf::from("records.json")));
        let config = opts.into_config();
        assert_eq!(config.frequency, Frequency::Week);
        assert_eq!(config.lag_hours, 6);
        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.width, 80);
        assert!(!config.tooltip_enabled);
        assert!(config.legend_enabled);
    }

    #[test]
    fn test_parse_help_and_version() {
        assert_eq!(parse(&["--help"]).unwrap(), Command::Help);
        assert_eq!(parse(&["-V"]).unwrap(), Command::Version);
    }

    #[test]
    fn test_parse_rejects_bad_frequency() {
        assert!(parse(&["-f", "year"]).is_err());
    }

    #[test]
    fn test_parse_rejects_second_file() {
        assert!(parse(&["a.json", "b.json"]).is_err());
    }
}
