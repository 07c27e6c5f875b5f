use mimalloc::MiMalloc;
use modules::{
    common::signal::SignalManager,
    common::tls::CattyMailTls,
    context::{CattyMailTask, Initialize},
    error::CattyMailResult,
    ingest::IngestTask,
    logger,
    rest::start_http_server,
    settings::cli::SETTINGS,
    store::Store,
};
use tracing::{error, info};

mod modules;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

static LOGO: &str = r#"
   ____      _   _        __  __       _ _
  / ___|__ _| |_| |_ _   _|  \/  | __ _(_) |
 | |   / _` | __| __| | | | |\/| |/ _` | | |
 | |__| (_| | |_| |_| |_| | |  | | (_| | | |
  \____\__,_|\__|\__|\__, |_|  |_|\__,_|_|_|
                     |___/
"#;

#[tokio::main]
async fn main() -> CattyMailResult<()> {
    logger::initialize_logging();
    info!("{}", LOGO);
    info!("Starting cattymail");
    info!("Version:  {}", cattymail_version!());
    info!("Git:      [{}]", env!("GIT_HASH"));

    if let Err(error) = initialize().await {
        eprintln!("{:?}", error);
        return Err(error);
    }

    start_services().await
}

/// Initialize shared infrastructure. A store that cannot be reached here is
/// fatal.
async fn initialize() -> CattyMailResult<()> {
    SignalManager::initialize().await?;
    CattyMailTls::initialize().await?;
    Store::initialize().await?;
    Ok(())
}

async fn start_services() -> CattyMailResult<()> {
    if SETTINGS.cattymail_ingestor_enabled {
        IngestTask::start();
    }

    if SETTINGS.cattymail_api_enabled {
        if let Err(e) = start_http_server().await {
            error!("Failed to start REST server: {:?}", e);
            return Err(e);
        }
    } else {
        // Ingestor-only process: park until the shutdown signal arrives.
        let _ = SignalManager::subscribe_global().recv().await;
        info!("Ingestor shutting down");
    }
    Ok(())
}
