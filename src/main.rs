use ir_sensor_monitor::acquisition::session::Session;
use ir_sensor_monitor::config::{load_config, Config};
use ir_sensor_monitor::sensor::{run_sensor, simulator::run_simulator};
use ir_sensor_monitor::visualization::window::MonitorApp;
use ir_sensor_monitor::Result;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let mode = args.get(1).map(String::as_str).unwrap_or("monitor");

    let config = match args.get(2) {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    let result = match mode {
        "monitor" => run_monitor(&config),
        "sensor" => run_sensor(&config.sensor),
        "simulate" => run_simulator(&config.sensor, &config.simulator),
        _ => {
            println!(
                "Invalid argument, please use 'monitor', 'sensor' or 'simulate' [config.yaml]"
            );
            return;
        }
    };

    if let Err(e) = result {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run_monitor(config: &Config) -> Result<()> {
    let session = Session::from_config(config)?;
    MonitorApp::run(session, config)
}
