use super::monitor::MonitorConfig;
use super::{DEFAULT_DIRECTORY, DRAG_FILENAME, VERSION};
use clap::{App, Arg, ArgMatches};
use std::path::PathBuf;
use std::time::Duration;

fn build_cli() -> App<'static, 'static> {
    let arg_dir = Arg::with_name("directory")
        .help("directory where the solver writes the drag report")
        .short("d")
        .long("dir")
        .takes_value(true)
        .default_value(DEFAULT_DIRECTORY);
    let arg_filename = Arg::with_name("filename")
        .help("name of the drag report file")
        .short("f")
        .long("filename")
        .takes_value(true)
        .default_value(DRAG_FILENAME);
    let arg_steady = Arg::with_name("steady_drag")
        .help("steady drag, plotted as reference line")
        .short("s")
        .long("steady")
        .takes_value(true)
        .default_value("0.0026");
    let arg_interval = Arg::with_name("interval")
        .help("seconds between file checks and between updates")
        .short("i")
        .long("interval")
        .takes_value(true)
        .default_value("2");
    let arg_min_lines = Arg::with_name("min_lines")
        .help("minimum number of lines in the file before plotting")
        .long("min_lines")
        .takes_value(true)
        .default_value("3");
    let arg_max_wait = Arg::with_name("max_wait")
        .help("check for the file at most this many times, wait forever if not given")
        .long("max_wait")
        .takes_value(true);
    let arg_max_failures = Arg::with_name("max_failures")
        .help("stop after this many failed updates in a row, retry forever if not given")
        .long("max_failures")
        .takes_value(true);
    let arg_verbose = Arg::with_name("verbose")
        .help("print verbose information")
        .short("v")
        .long("verbose")
        .takes_value(false)
        .required(false);
    App::new("drag_live")
        .version(VERSION.unwrap_or("unknown"))
        .author("Luca Peruzzo")
        .about("cli app to follow the drag time series while the solver runs")
        .arg(arg_dir)
        .arg(arg_filename)
        .arg(arg_steady)
        .arg(arg_interval)
        .arg(arg_min_lines)
        .arg(arg_max_wait)
        .arg(arg_max_failures)
        .arg(arg_verbose)
}

fn value_or_exit<T: std::str::FromStr>(cli_args: &ArgMatches, name: &str) -> Option<T> {
    cli_args.value_of(name).map(|v| match v.parse::<T>() {
        Ok(t) => t,
        Err(_) => clap::Error::value_validation_auto(format!("invalid value '{}' for {}", v, name))
            .exit(),
    })
}

fn config_from(cli_args: &ArgMatches) -> (PathBuf, String, MonitorConfig, bool) {
    let dir = PathBuf::from(cli_args.value_of("directory").unwrap_or(DEFAULT_DIRECTORY));
    let filename = String::from(cli_args.value_of("filename").unwrap_or(DRAG_FILENAME));
    let defaults = MonitorConfig::default();
    let config = MonitorConfig {
        steady_drag: value_or_exit(cli_args, "steady_drag").unwrap_or(defaults.steady_drag),
        interval: value_or_exit(cli_args, "interval")
            .map(Duration::from_secs)
            .unwrap_or(defaults.interval),
        min_lines: value_or_exit(cli_args, "min_lines").unwrap_or(defaults.min_lines),
        max_wait_checks: value_or_exit(cli_args, "max_wait"),
        max_failures: value_or_exit(cli_args, "max_failures"),
    };
    let verbose = cli_args.is_present("verbose");
    (dir, filename, config, verbose)
}

/// Takes the CLI arguments that control the live plotting of the drag.
pub fn parse_cli() -> (PathBuf, String, MonitorConfig, bool) {
    let cli_args = build_cli().get_matches();
    config_from(&cli_args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_monitor_defaults() {
        let cli_args = build_cli().get_matches_from(vec!["drag_live"]);
        let (dir, filename, config, verbose) = config_from(&cli_args);
        assert_eq!(dir, PathBuf::from(DEFAULT_DIRECTORY));
        assert_eq!(filename, "drag-rfile.out");
        assert_eq!(config, MonitorConfig::default());
        assert!(!verbose);
    }

    #[test]
    fn test_overrides() {
        let cli_args = build_cli().get_matches_from(vec![
            "drag_live",
            "-d",
            "/tmp/fluent",
            "-s",
            "0.003",
            "-i",
            "5",
            "--min_lines",
            "1",
            "--max_wait",
            "10",
            "--max_failures",
            "4",
            "-v",
        ]);
        let (dir, _, config, verbose) = config_from(&cli_args);
        assert_eq!(dir, PathBuf::from("/tmp/fluent"));
        assert_eq!(config.steady_drag, 0.003);
        assert_eq!(config.interval, Duration::from_secs(5));
        assert_eq!(config.min_lines, 1);
        assert_eq!(config.max_wait_checks, Some(10));
        assert_eq!(config.max_failures, Some(4));
        assert!(verbose);
    }
}
