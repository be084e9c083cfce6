use crate::config::LoggingConfig;
use log::{info, warn};
use std::fs;
use std::io;
use std::path::Path;

/// Install the global logger: stderr plus the configured log file.
pub fn init(config: &LoggingConfig, verbose: bool) -> Result<(), fern::InitError> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .chain(fern::log_file(&config.file)?)
        .apply()?;
    Ok(())
}

/// Keep only the last `max_lines` lines of the log file.
///
/// Returns whether the file was rewritten.
pub fn trim_log(config: &LoggingConfig) -> io::Result<bool> {
    let log_path = Path::new(&config.file);
    let content = match fs::read_to_string(log_path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("Log file not found for trimming");
            return Ok(false);
        }
        Err(e) => return Err(e),
    };

    let lines: Vec<&str> = content.lines().collect();
    if lines.len() <= config.max_lines {
        return Ok(false);
    }
    let start = lines.len() - config.max_lines;
    fs::write(log_path, lines[start..].join("\n") + "\n")?;
    info!("Trimmed log file to {} lines", config.max_lines);
    Ok(true)
}
