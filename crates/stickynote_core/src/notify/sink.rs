//! Notification delivery backends.
//!
//! # Responsibility
//! - Define the delivery seam used by the scheduler.
//! - Provide desktop command backends with a console last resort.
//!
//! # Invariants
//! - `FallbackSink` makes at most one successful delivery per call and stops
//!   at the first backend that succeeds.
//! - Message text is never logged.

use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Arc;

/// Delivery failure of a single backend.
#[derive(Debug)]
pub enum SinkError {
    Spawn {
        program: String,
        source: std::io::Error,
    },
    Exit {
        program: String,
        status: ExitStatus,
    },
    NoBackend,
}

impl Display for SinkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Spawn { program, source } => write!(f, "failed to run `{program}`: {source}"),
            Self::Exit { program, status } => write!(f, "`{program}` exited with {status}"),
            Self::NoBackend => write!(f, "no notification backend configured"),
        }
    }
}

impl Error for SinkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Something that can show a `(title, message)` notification.
pub trait NotificationSink: Send + Sync {
    /// Stable backend name for logs.
    fn name(&self) -> &str;
    fn deliver(&self, title: &str, message: &str) -> Result<(), SinkError>;
}

/// Prints to stdout. Always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    fn deliver(&self, _title: &str, message: &str) -> Result<(), SinkError> {
        println!("Notification: {message}");
        Ok(())
    }
}

type ArgsBuilder = fn(&str, &str) -> Vec<String>;

/// Runs a desktop notification command and waits for it to exit.
#[derive(Clone)]
pub struct DesktopCommandSink {
    name: &'static str,
    program: &'static str,
    args: ArgsBuilder,
}

impl DesktopCommandSink {
    pub fn new(name: &'static str, program: &'static str, args: ArgsBuilder) -> Self {
        Self {
            name,
            program,
            args,
        }
    }

    /// Preferred platform-native backend, if the platform has one.
    pub fn native() -> Option<Self> {
        if cfg!(target_os = "linux") {
            Some(Self::new("notify-send", "notify-send", |title, message| {
                vec![title.to_string(), message.to_string()]
            }))
        } else if cfg!(target_os = "macos") {
            Some(Self::new("osascript", "osascript", |title, message| {
                vec![
                    "-e".to_string(),
                    format!(
                        "display notification \"{}\" with title \"{}\"",
                        escape_applescript(message),
                        escape_applescript(title)
                    ),
                ]
            }))
        } else {
            None
        }
    }

    /// Older backend tried when the native one fails.
    pub fn legacy() -> Option<Self> {
        if cfg!(target_os = "linux") {
            Some(Self::new("zenity", "zenity", |title, message| {
                vec![
                    "--notification".to_string(),
                    format!("--text={title}: {message}"),
                ]
            }))
        } else if cfg!(target_os = "windows") {
            Some(Self::new("msg", "msg", |title, message| {
                vec!["*".to_string(), format!("{title}: {message}")]
            }))
        } else {
            None
        }
    }

    /// Arguments passed to the program for one delivery.
    pub fn command_args(&self, title: &str, message: &str) -> Vec<String> {
        (self.args)(title, message)
    }
}

impl NotificationSink for DesktopCommandSink {
    fn name(&self) -> &str {
        self.name
    }

    fn deliver(&self, title: &str, message: &str) -> Result<(), SinkError> {
        let status = Command::new(self.program)
            .args(self.command_args(title, message))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| SinkError::Spawn {
                program: self.program.to_string(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(SinkError::Exit {
                program: self.program.to_string(),
                status,
            })
        }
    }
}

fn escape_applescript(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Tries backends in order until one succeeds.
#[derive(Clone, Default)]
pub struct FallbackSink {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl FallbackSink {
    pub fn new(sinks: Vec<Arc<dyn NotificationSink>>) -> Self {
        Self { sinks }
    }

    /// Native backend, then legacy backend, then the console.
    pub fn platform_default() -> Self {
        let mut sinks: Vec<Arc<dyn NotificationSink>> = Vec::new();
        if let Some(native) = DesktopCommandSink::native() {
            sinks.push(Arc::new(native));
        }
        if let Some(legacy) = DesktopCommandSink::legacy() {
            sinks.push(Arc::new(legacy));
        }
        sinks.push(Arc::new(ConsoleSink));
        Self::new(sinks)
    }

    pub fn backend_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|sink| sink.name()).collect()
    }
}

impl NotificationSink for FallbackSink {
    fn name(&self) -> &str {
        "fallback"
    }

    fn deliver(&self, title: &str, message: &str) -> Result<(), SinkError> {
        let mut last_error = SinkError::NoBackend;
        for sink in &self.sinks {
            match sink.deliver(title, message) {
                Ok(()) => {
                    info!(
                        "event=notification_deliver module=notify status=ok backend={}",
                        sink.name()
                    );
                    return Ok(());
                }
                Err(err) => {
                    warn!(
                        "event=notification_deliver module=notify status=fallback backend={} error={}",
                        sink.name(),
                        err
                    );
                    last_error = err;
                }
            }
        }
        Err(last_error)
    }
}

#[cfg(test)]
mod tests {
    use super::{DesktopCommandSink, FallbackSink, NotificationSink, SinkError};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Scripted {
        name: &'static str,
        succeed: bool,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(name: &'static str, succeed: bool) -> Arc<Self> {
            Arc::new(Self {
                name,
                succeed,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl NotificationSink for Scripted {
        fn name(&self) -> &str {
            self.name
        }

        fn deliver(&self, _title: &str, _message: &str) -> Result<(), SinkError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.succeed {
                Ok(())
            } else {
                Err(SinkError::NoBackend)
            }
        }
    }

    #[test]
    fn fallback_stops_at_first_success() {
        let broken = Scripted::new("broken", false);
        let working = Scripted::new("working", true);
        let unused = Scripted::new("unused", true);
        let sink = FallbackSink::new(vec![
            broken.clone() as Arc<dyn NotificationSink>,
            working.clone() as Arc<dyn NotificationSink>,
            unused.clone() as Arc<dyn NotificationSink>,
        ]);

        sink.deliver("t", "m").expect("second backend should deliver");
        assert_eq!(broken.calls.load(Ordering::SeqCst), 1);
        assert_eq!(working.calls.load(Ordering::SeqCst), 1);
        assert_eq!(unused.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_fallback_reports_no_backend() {
        let err = FallbackSink::default().deliver("t", "m").unwrap_err();
        assert!(matches!(err, SinkError::NoBackend));
    }

    #[test]
    fn platform_default_ends_with_console() {
        let sink = FallbackSink::platform_default();
        assert_eq!(sink.backend_names().last().copied(), Some("console"));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let sink = DesktopCommandSink::new("missing", "stickynote-no-such-program", |_, _| Vec::new());
        let err = sink.deliver("t", "m").unwrap_err();
        assert!(matches!(err, SinkError::Spawn { .. }));
    }
}
