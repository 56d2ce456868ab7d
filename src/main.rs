// src/main.rs

use std::process::ExitCode;
use std::sync::Arc;

use flowrank::{
    Aggregator, CycleDriver, FlowConfig, HttpSession, LogNotifier, Notifier, NotifierConfig, ReportFormatter,
    TelegramNotifier,
};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match FlowConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            flowrank::logging::init("info");
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    flowrank::logging::init(&config.log_level);

    let session = match HttpSession::new(config.source_timeout, config.requests_per_second, config.max_burst) {
        Ok(session) => Arc::new(session),
        Err(e) => {
            error!(error = %e, "failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    let notifier: Arc<dyn Notifier> = match &config.notifier {
        NotifierConfig::Telegram { bot_token, chat_id } => {
            Arc::new(TelegramNotifier::new(Arc::clone(&session), bot_token.clone(), chat_id.clone()))
        }
        NotifierConfig::Log => {
            warn!("TELEGRAM_BOT_TOKEN/TELEGRAM_CHAT_ID not set, reports will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let aggregator = Aggregator::new(config.build_adapters(), config.stablecoin_filter(), config.source_timeout);
    let formatter = ReportFormatter::new(config.top_n, config.report_timezone);
    let driver = CycleDriver::new(session, aggregator, formatter, notifier, config.interval);

    let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
    let driver_handle = tokio::spawn(driver.run(shutdown_rx));

    info!(top_n = config.top_n, metric = ?config.metric, "flowrank running, press Ctrl+C to stop");
    tokio::signal::ctrl_c().await.ok();
    info!("Received Ctrl+C");

    let _ = shutdown_tx.send(()).await;
    if let Err(e) = driver_handle.await {
        error!(error = %e, "cycle driver task failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
