use gtk4::glib;
use xtermng::config::Config;
use xtermng::platform::app::App;

fn main() -> glib::ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Starting XtermNG v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    App::new(config).run()
}
