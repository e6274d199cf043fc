//! Tracing setup for npm-meta binaries.
//!
//! Configured from the environment:
//!
//! - `LOG_LEVEL`: default filter when `RUST_LOG` is unset (`info`)
//! - `LOG_FORMAT`: `human` or `json` (`human`)
//! - `LOG_OUTPUT`: `console`, `file`, `both` or `none` (`console`)
//! - `LOG_FILE_PATH`: daily rolling log file (`/tmp/npm-meta.log`)
//!
//! Console output goes to stderr; stdout is reserved for documents.

use std::{
    env,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt::MakeWriter, prelude::*, registry, EnvFilter};

// --- Custom "Tee" Writer ---
struct Tee<A, B> {
    a: A,
    b: B,
}

impl<A, B> Write for Tee<A, B>
where
    A: Write,
    B: Write,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let res_a = self.a.write(buf);
        let res_b = self.b.write(buf);
        res_a.or(res_b)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.a.flush()?;
        self.b.flush()
    }
}

#[derive(Clone)]
struct MakeTee<A, B> {
    make_a: A,
    make_b: B,
}

impl<'a, A, B, W1, W2> MakeWriter<'a> for MakeTee<A, B>
where
    A: MakeWriter<'a, Writer = W1>,
    B: MakeWriter<'a, Writer = W2>,
    W1: Write + 'a,
    W2: Write + 'a,
{
    type Writer = Tee<W1, W2>;
    fn make_writer(&'a self) -> Self::Writer {
        Tee {
            a: self.make_a.make_writer(),
            b: self.make_b.make_writer(),
        }
    }
}

/// Where log lines are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Console,
    File,
    Both,
    None,
}

impl LogOutput {
    fn parse(value: &str) -> Self {
        match value {
            "file" => LogOutput::File,
            "both" => LogOutput::Both,
            "none" => LogOutput::None,
            _ => LogOutput::Console,
        }
    }
}

/// Logging settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
    pub output: LogOutput,
    pub file_path: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            json: lookup("LOG_FORMAT").is_some_and(|f| f == "json"),
            output: LogOutput::parse(&lookup("LOG_OUTPUT").unwrap_or_default()),
            file_path: lookup("LOG_FILE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/tmp/npm-meta.log")),
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{},tokio=warn", self.level)))
    }

    fn file_writer(&self) -> (tracing_appender::non_blocking::NonBlocking, WorkerGuard) {
        let log_dir = self.file_path.parent().unwrap_or_else(|| Path::new("/tmp"));
        let log_filename = self
            .file_path
            .file_name()
            .unwrap_or("npm-meta.log".as_ref());
        let file_appender = tracing_appender::rolling::daily(log_dir, log_filename);
        tracing_appender::non_blocking(file_appender)
    }
}

/// Initializes the global tracing subscriber based on environment variables.
///
/// Keep the returned guard alive for as long as file logging should flush.
pub fn init_subscriber() -> Option<WorkerGuard> {
    init_with(&LogSettings::from_env())
}

/// Initializes the global tracing subscriber from explicit settings.
///
/// Does nothing if a global subscriber is already installed.
pub fn init_with(settings: &LogSettings) -> Option<WorkerGuard> {
    let subscriber = registry().with(settings.env_filter());

    match settings.output {
        LogOutput::Both => {
            let (non_blocking, guard) = settings.file_writer();
            let tee_writer = MakeTee {
                make_a: io::stderr,
                make_b: non_blocking,
            };
            let fmt_layer = tracing_subscriber::fmt::layer().with_writer(tee_writer);
            if settings.json {
                let _ = subscriber.with(fmt_layer.json()).try_init();
            } else {
                let _ = subscriber.with(fmt_layer).try_init();
            }
            Some(guard)
        }
        LogOutput::File => {
            let (non_blocking, guard) = settings.file_writer();
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false);
            if settings.json {
                let _ = subscriber.with(fmt_layer.json()).try_init();
            } else {
                let _ = subscriber.with(fmt_layer).try_init();
            }
            Some(guard)
        }
        LogOutput::Console => {
            let fmt_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);
            if settings.json {
                let _ = subscriber.with(fmt_layer.json()).try_init();
            } else {
                let _ = subscriber.with(fmt_layer).try_init();
            }
            None
        }
        LogOutput::None => {
            let _ = subscriber.try_init();
            None
        }
    }
}
