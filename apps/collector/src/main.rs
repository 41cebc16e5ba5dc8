mod config;

use codectrl_collector::{ChannelHandler, CollectorServer};
use codectrl_protocol::Log;
use tracing_subscriber::EnvFilter;

use config::CollectorConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,codectrl=debug")),
        )
        .init();

    let path = config::config_path(std::env::args());
    let cfg = CollectorConfig::load(&path)?;

    let (handler, mut rx) = ChannelHandler::new(cfg.queue_capacity);
    let server = CollectorServer::new(cfg.server_config(), handler);
    let listener = server.bind().await?;

    let printer = tokio::spawn(async move {
        while let Some(log) = rx.recv().await {
            print_log(&log);
        }
    });

    let server_shutdown = server.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received");
            server_shutdown.shutdown();
        }
    });

    server.run(listener).await?;
    printer.abort();
    Ok(())
}

fn print_log(log: &Log) {
    println!(
        "[{}] {} {}:{} ({})",
        log.address, log.uuid, log.file_name, log.line_number, log.message_type
    );
    println!("  message: {}", log.message);
    for frame in &log.stack {
        println!(
            "  at {} ({}:{})",
            frame.name, frame.file_path, frame.line_number
        );
    }
    for (line, text) in &log.code_snippet {
        let marker = if *line == log.line_number { '>' } else { ' ' };
        println!("  {marker}{line:>5} | {text}");
    }
    for warning in &log.warnings {
        println!("  warning: {warning}");
    }
}
