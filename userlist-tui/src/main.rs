use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use simplelog::{Config as LogConfig, LevelFilter, WriteLogger};
use userlist_lib::UsersClient;

use userlist_tui::app::{self, App};
use userlist_tui::config::Config;
use userlist_tui::error::AppError;
use userlist_tui::paths;
use userlist_tui::store::Store;
use userlist_tui::view::UserListView;

/// Terminal user listing backed by the users API.
///
/// Settings not given on the command line come from `USERLIST_API_URL`,
/// `USERLIST_PAGE_SIZE` and `USERLIST_LOG_LEVEL` (a `.env` file is read too).
#[derive(Debug, Parser)]
#[command(name = "userlist")]
#[command(version)]
struct Cli {
    /// Fetch the first page, print the listing as HTML and exit
    #[arg(long)]
    html: bool,

    /// Users API base URL (overrides USERLIST_API_URL)
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Users per page (overrides USERLIST_PAGE_SIZE)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    page_size: Option<u32>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Where the `h` key writes the HTML listing
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,
}

impl Cli {
    /// Applies command-line overrides on top of `config`.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(url) = &self.api_url {
            config = config.api_url(url.clone());
        }
        if let Some(size) = self.page_size {
            config = config.page_size(size);
        }
        if let Some(secs) = self.timeout {
            config = config.request_timeout(Duration::from_secs(secs));
        }
        if let Some(path) = &self.out {
            config = config.markup_file(path.clone());
        }
        config
    }
}

/// Logs to the rotated log file; logging is skipped if no cache dir is available.
fn init_logging(level: LevelFilter) {
    paths::rotate_logs();
    let Some(path) = paths::log_file() else {
        return;
    };
    match paths::create_log_file(&path) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(level, LogConfig::default(), file) {
                eprintln!("Failed to initialize logger: {}", e);
            }
        }
        Err(e) => eprintln!("{}", e),
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let _ = dotenvy::dotenv();
    let config = cli.apply(Config::from_env()?);
    init_logging(config.log_level);
    log::info!("starting with {:?}", config);

    let client = UsersClient::builder()
        .url(&config.api_url)
        .timeout(config.request_timeout)
        .build()?;
    let view = UserListView::new(Store::new(), Arc::new(client), config.page_size);

    if cli.html {
        app::print_markup(view, &config).await
    } else {
        App::new(view, config).run().await
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
