//! Logs "Hello, world!" from four calls deep.
//!
//! Start a collector first (`cargo run -p codectrl-collector-app`), then:
//!
//! ```text
//! cargo run -p codectrl-logger --example layers
//! ```

use codectrl_logger::Logger;
use tracing_subscriber::EnvFilter;

async fn layer1(logger: &Logger) {
    layer2(logger).await;
}

async fn layer2(logger: &Logger) {
    layer3(logger).await;
}

async fn layer3(logger: &Logger) {
    final_layer(logger).await;
}

async fn final_layer(logger: &Logger) {
    match logger.log("Hello, world!").await {
        Ok(reply) => println!("collector replied: {}", reply.message),
        Err(e) => eprintln!("log not sent ({:?}): {e}", e.kind()),
    }

    match logger.log_when_env("only with CODECTRL_DEBUG set").await {
        Ok(reply) => println!("collector replied: {}", reply.message),
        Err(e) if e.is_skipped() => println!("skipped: {e}"),
        Err(e) => eprintln!("log not sent ({:?}): {e}", e.kind()),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let logger = Logger::new();
    layer1(&logger).await;
}
