use class_app::config::{Config, POLL_INTERVAL};
use class_app::session::{EnvHost, Session};
use class_app::state::BootOutcome;
use class_app::{AppState, LocalStore, poller};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    let host = EnvHost;
    let session = Session::from_host(&host);
    let store = Arc::new(LocalStore::open(config.data_path.clone()).await?);
    let state = AppState::new(&config, session, store)?;

    match state.boot().await {
        BootOutcome::NeedsHost { message } => {
            error!("{message}");
            return Ok(());
        }
        BootOutcome::Onboarding { error } => {
            if let Some(err) = error {
                error!("profile lookup failed: {err}");
            }
            info!("no registered profile yet");
        }
        BootOutcome::Ready { greeting, is_admin } => {
            info!("{greeting}");
            if let Some(summary) = state.profile_summary() {
                info!("{summary}");
            }
            if is_admin {
                info!("admin tools are available");
            }
        }
    }

    let poll = poller::spawn(Arc::clone(&state));
    info!(
        "refreshing every {}s, ctrl-c to exit",
        POLL_INTERVAL.as_secs()
    );
    tokio::signal::ctrl_c().await?;
    poll.abort();

    Ok(())
}
