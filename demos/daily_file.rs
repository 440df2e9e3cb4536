use modlog::{LoggerBuilder, TimeZone};

fn main() {
    // Lines also go to ./logs/Server.<yyyy-MM-dd>.log, dated in UTC
    let logger = LoggerBuilder::new("Server")
        .rotate_daily(true)
        .directory("./logs")
        .time_zone(TimeZone::UTC)
        .file_mode(0o640) // owner rw, group r, others none
        .build();

    logger.info("startup", "configuration loaded successfully");
    logger.info("listen", "server listening on port 8080");

    if let Some(path) = logger.log_file() {
        println!("log file: {}", path.display());
    }
}
