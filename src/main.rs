use anyhow::Result;
use clap::{App as Cli, Arg};
use enrollment_tui::app::App;
use enrollment_tui::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Cli::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Directory holding config.yml")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("api-url")
                .long("api-url")
                .value_name("URL")
                .help("Enrollment API base URL, overriding the configuration")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Log at debug level"),
        )
        .get_matches();

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;
    if let Some(url) = matches.value_of("api-url") {
        config.set_api_base_url(url)?;
    }
    if matches.is_present("verbose") {
        config.log_level = "debug".to_string();
    }
    App::start(config).await?;
    Ok(())
}
