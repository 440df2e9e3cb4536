use {modlog::Logger, std::fs};

struct Importer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Reads MODLOG_LOG_LEVEL, MODLOG_LOG_ROTATE_DAILY and MODLOG_LOG_DIR
    let logger = Logger::for_type::<Importer>()?;

    if let Err(err) = fs::read_to_string("/definitely/not/here.csv") {
        // At DEBUG the error's source chain is printed to the console as well
        logger.exception_in("load", &err);
    }

    logger.fatal("load", "nothing to import");
}
