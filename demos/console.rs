use modlog::{Level, LoggerBuilder};

fn main() {
    let logger = LoggerBuilder::new("Worker").min_level(Level::Warn).build();

    logger.debug("run", "tick"); // dropped, below WARN
    logger.warn("run", "disk low");
    logger.error("run", format_args!("retry {} of {} failed", 3, 3));
}
