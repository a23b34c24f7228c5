use flexi_logger::{
    colored_default_format, opt_format, Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError,
    Logger, LoggerHandle, Naming,
};

/// Start the global logger.
///
/// Without a directory, logs go to stderr. With one, they go to rotating
/// files and warnings are still echoed to stderr. The returned handle must
/// stay alive for the lifetime of the process.
pub fn setup_logging(log_dir: Option<&str>) -> Result<LoggerHandle, FlexiLoggerError> {
    let logger = Logger::try_with_env_or_str("info")?;

    match log_dir {
        None => logger.format(colored_default_format).start(),
        Some(dir) => logger
            .log_to_file(FileSpec::default().directory(dir).basename("portfolio"))
            .format(opt_format)
            .duplicate_to_stderr(Duplicate::Warn)
            .rotate(
                Criterion::Size(10 * 1024 * 1024), // 10 MB
                Naming::Numbers,
                Cleanup::KeepLogFiles(7),
            )
            .start(),
    }
}
