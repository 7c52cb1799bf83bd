use crate::config::{LoggingConfig, Section};
use std::{
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::{level_filters::LevelFilter, Level, Metadata};
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

fn parse_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// Returns true if target == crate_name or target starts with "crate_name::"
fn matches_crate_prefix(target: &str, crate_name: &str) -> bool {
    target == crate_name
        || (target.starts_with(crate_name) && target[crate_name.len()..].starts_with("::"))
}

// -------- rotating writer for file sinks --------

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl<'a> fmt::MakeWriter<'a> for RotWriter {
    type Writer = RotWriterHandle;
    fn make_writer(&'a self) -> Self::Writer {
        RotWriterHandle(self.0.clone())
    }
}

struct RotWriterHandle(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriterHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().unwrap().flush()
    }
}

/// Resolve a log file path against `base_dir` (home_dir).
/// Absolute paths are kept as-is; relative paths are joined with `base_dir`.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

/// Create a rotating writer for a section's log file, ensuring the parent
/// directory exists. Returns None (with a note on stderr) when the sink
/// cannot be created; logging setup proceeds without the file.
fn rotating_writer(section: &Section, base_dir: &Path) -> Option<RotWriter> {
    if section.file.trim().is_empty() {
        return None;
    }

    let log_path = resolve_log_path(&section.file, base_dir);
    let max_bytes = section.max_size_mb.unwrap_or(100) as usize * 1024 * 1024;

    if let Some(parent) = log_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!(
                "Failed to create log directory for '{}': {}",
                log_path.display(),
                e
            );
            return None;
        }
    }

    let rot = FileRotate::new(
        &log_path,
        AppendTimestamp::default(FileLimit::Age(chrono::Duration::days(1))),
        ContentLimit::BytesSurpassed(max_bytes),
        Compression::None,
        #[cfg(unix)]
        None, // file permissions (Unix only)
    );

    Some(RotWriter(Arc::new(Mutex::new(rot))))
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize logging from a configuration.
///
/// Each section routes one subsystem (crate name) to a console level and an
/// optional rotating JSON file; the "default" section is the catch-all for
/// everything that doesn't match a named subsystem.
///
/// - `cfg`: LoggingConfig containing the logging sections
/// - `base_dir`: base directory used to resolve relative log file paths
///   (usually server.home_dir)
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` → `tracing` *before* installing the subscriber
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_default_logging();
        return;
    }

    let named: Vec<(String, Section)> = cfg
        .iter()
        .filter(|(k, _)| k.as_str() != "default")
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let crate_names: Vec<String> = named.iter().map(|(n, _)| n.clone()).collect();
    let default_section = cfg.get("default");

    let ansi = std::io::stdout().is_terminal();
    let mut layers: Vec<BoxedLayer> = Vec::new();

    // One console layer: catch-all level from "default", per-subsystem overrides.
    let default_console = default_section
        .and_then(|s| parse_level(&s.console_level))
        .map_or(LevelFilter::OFF, LevelFilter::from_level);
    let mut console_targets = Targets::new().with_default(default_console);
    for (crate_name, section) in &named {
        let level = parse_level(&section.console_level)
            .map_or(LevelFilter::OFF, LevelFilter::from_level);
        console_targets = console_targets.with_target(crate_name.clone(), level);
    }
    layers.push(
        fmt::layer()
            .with_ansi(ansi)
            .with_target(true)
            .with_level(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_filter(console_targets)
            .boxed(),
    );

    // One JSON file layer per named section that configured a file.
    for (crate_name, section) in &named {
        let Some(writer) = rotating_writer(section, base_dir) else {
            continue;
        };
        let Some(level) = parse_level(&section.file_level) else {
            continue;
        };
        let targets = Targets::new()
            .with_default(LevelFilter::OFF)
            .with_target(crate_name.clone(), LevelFilter::from_level(level));
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_level(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(writer)
                .with_filter(targets)
                .boxed(),
        );
    }

    // Default file layer: everything not claimed by a named subsystem.
    if let Some(section) = default_section {
        if let (Some(writer), Some(level)) = (
            rotating_writer(section, base_dir),
            parse_level(&section.file_level),
        ) {
            let crates = crate_names.clone();
            let filter = FilterFn::new(move |meta: &Metadata<'_>| {
                let claimed = crates
                    .iter()
                    .any(|c| matches_crate_prefix(meta.target(), c));
                !claimed && meta.level() <= &level
            });
            layers.push(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_target(true)
                    .with_level(true)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_writer(writer)
                    .with_filter(filter)
                    .boxed(),
            );
        }
    }

    let _ = tracing_subscriber::registry().with(layers).try_init();
}

fn init_default_logging() {
    let _ = fmt()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .try_init();
}
