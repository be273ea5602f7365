use drag_lpp::live::parse_cli;
use drag_lpp::monitor::{resolve_target, wait_for_file, Poller};
use drag_lpp::window::run_window;
use log::{error, info};

fn main() {
    let (dir, filename, config, verbose) = parse_cli();
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let target = match resolve_target(&dir, &filename) {
        Ok(t) => t,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    info!("checking for file: {}", target.display());

    if let Err(e) = wait_for_file(&target, &config) {
        error!("{}", e);
        std::process::exit(1);
    }
    info!(
        "file detected! now plotting live every {} s",
        config.interval.as_secs()
    );

    if let Err(e) = run_window(Poller::new(target, config)) {
        error!("{}", e);
        std::process::exit(1);
    }
}
