use {
    modlog::LoggerBuilder,
    tracing_subscriber::{util::SubscriberInitExt, EnvFilter},
};

// The logger reports its own setup and write failures as tracing events.
// Route them to stderr so they can be inspected next to the log lines.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (non_blocking, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(EnvFilter::new("modlog=debug"))
        .with_ansi(false)
        .with_target(true)
        .finish()
        .try_init()?;

    let logger = LoggerBuilder::new("Probe").directory("./logs").build();
    logger.info("check", "file output is ready");

    let broken = LoggerBuilder::new("Probe").directory("/proc/modlog-denied").build();
    broken.warn("check", "this line only reaches the console");

    Ok(())
}
