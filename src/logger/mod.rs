//! Logger module
//!
//! Access and error logging for the fields service: lifecycle messages,
//! one access line per handled request, and error/warning output, with
//! optional file targets.

mod format;
mod writer;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use crate::config::Config;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    if writer::is_initialized() {
        writer::get().write_info(message);
    } else {
        println!("{message}");
    }
}

/// Write to error log
fn write_error(message: &str) {
    if writer::is_initialized() {
        writer::get().write_error(message);
    } else {
        eprintln!("{message}");
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Fields API started");
    write_info(&format!("Listening on: http://{addr}"));
    if config.database.url.is_none() {
        write_error("[WARN] DATABASE_URL not set; requests will answer 500");
    }
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_shutdown() {
    write_info("[SHUTDOWN] Stopped accepting connections; draining in-flight requests");
}

/// One line per handled request, in the configured format
pub fn log_access(entry: &AccessLogEntry, log_format: &str) {
    let line = entry.format(log_format);
    if writer::is_initialized() {
        writer::get().write_access(&line);
    } else {
        println!("{line}");
    }
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}
