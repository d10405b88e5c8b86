//! Named loggers with a replaceable handler.
//!
//! Every [`Logger`] starts at the global level set through [`set_log_level`]. The default handler
//! prints a timestamped line to stdout/stderr natively and writes to the browser console on the
//! web; [`set_user_log_handler`] installs an additional callback on every live logger.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, LazyLock, Mutex, RwLock, Weak};

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

static GLOBAL_LOG_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);
static INSTANCES: LazyLock<Mutex<Vec<Weak<LoggerInner>>>> =
    LazyLock::new(|| Mutex::new(Vec::new()));

type SharedLogHandler = Arc<dyn Fn(&Logger, LogLevel, &[LogArgument]) + Send + Sync + 'static>;

#[derive(Clone)]
pub struct Logger {
    inner: Arc<LoggerInner>,
}

struct LoggerInner {
    name: String,
    log_level: AtomicU8,
    log_handler: RwLock<SharedLogHandler>,
    user_log_handler: RwLock<Option<SharedLogHandler>>,
}

impl Logger {
    pub fn new(name: impl Into<String>) -> Self {
        let inner = Arc::new(LoggerInner {
            name: name.into(),
            log_level: AtomicU8::new(GLOBAL_LOG_LEVEL.load(Ordering::SeqCst)),
            log_handler: RwLock::new(Arc::new(default_log_handler)),
            user_log_handler: RwLock::new(None),
        });
        let mut instances = INSTANCES.lock().unwrap();
        instances.retain(|weak| weak.strong_count() > 0);
        instances.push(Arc::downgrade(&inner));
        drop(instances);
        Self { inner }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn log_level(&self) -> LogLevel {
        LogLevel::from_u8(self.inner.log_level.load(Ordering::SeqCst))
    }

    pub fn set_log_level(&self, level: LogLevel) {
        self.inner.log_level.store(level as u8, Ordering::SeqCst);
    }

    /// Replaces the handler that renders records for this logger.
    pub fn set_log_handler<F>(&self, handler: F)
    where
        F: Fn(&Logger, LogLevel, &[LogArgument]) + Send + Sync + 'static,
    {
        *self.inner.log_handler.write().unwrap() = Arc::new(handler);
    }

    pub fn reset_log_handler(&self) {
        *self.inner.log_handler.write().unwrap() = Arc::new(default_log_handler);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.dispatch(LogLevel::Debug, vec![LogArgument::Text(message.into())]);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.dispatch(LogLevel::Info, vec![LogArgument::Text(message.into())]);
    }

    /// Logs `message` followed by a structured payload, like `console.log(message, payload)`.
    pub fn info_with(&self, message: impl Into<String>, payload: Value) {
        self.dispatch(
            LogLevel::Info,
            vec![LogArgument::Text(message.into()), LogArgument::Value(payload)],
        );
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.dispatch(LogLevel::Warn, vec![LogArgument::Text(message.into())]);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.dispatch(LogLevel::Error, vec![LogArgument::Text(message.into())]);
    }

    fn dispatch(&self, level: LogLevel, arguments: Vec<LogArgument>) {
        let user_handler = self.inner.user_log_handler.read().unwrap().clone();
        if let Some(handler) = user_handler {
            handler(self, level, &arguments);
        }
        let handler = self.inner.log_handler.read().unwrap().clone();
        handler(self, level, &arguments);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("log_level", &self.log_level())
            .finish()
    }
}

fn default_log_handler(logger: &Logger, level: LogLevel, args: &[LogArgument]) {
    if level < logger.log_level() || level == LogLevel::Silent {
        return;
    }

    #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
    {
        console_log(logger, level, args);
    }

    #[cfg(not(all(feature = "wasm-web", target_arch = "wasm32")))]
    {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let message = build_message(args);
        let header = format!("[{}]  {}:", now, logger.name());
        match level {
            LogLevel::Warn | LogLevel::Error => eprintln!("{header} {message}"),
            _ => println!("{header} {message}"),
        }
    }
}

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
fn console_log(logger: &Logger, level: LogLevel, args: &[LogArgument]) {
    use serde::Serialize;
    use wasm_bindgen::JsValue;

    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let values = js_sys::Array::new();
    values.push(&JsValue::from_str(&format!("[{}]  {}:", now, logger.name())));
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    for arg in args {
        let value = match arg {
            LogArgument::Text(text) => JsValue::from_str(text),
            LogArgument::Value(value) => value.serialize(&serializer).unwrap_or(JsValue::NULL),
        };
        values.push(&value);
    }
    match level {
        LogLevel::Warn => web_sys::console::warn(&values),
        LogLevel::Error => web_sys::console::error(&values),
        _ => web_sys::console::log(&values),
    }
}

/// Joins the arguments into one line, rendering structured values as JSON.
pub fn build_message(args: &[LogArgument]) -> String {
    args.iter()
        .map(|arg| match arg {
            LogArgument::Text(text) => text.clone(),
            LogArgument::Value(value) => value.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn with_instances<F>(mut f: F)
where
    F: FnMut(Logger),
{
    let mut instances = INSTANCES.lock().unwrap();
    instances.retain(|weak| weak.strong_count() > 0);
    for weak in instances.iter() {
        if let Some(inner) = weak.upgrade() {
            f(Logger { inner });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    Silent = 4,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Silent => "silent",
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::Debug,
            1 => LogLevel::Info,
            2 => LogLevel::Warn,
            3 => LogLevel::Error,
            _ => LogLevel::Silent,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "silent" => Ok(LogLevel::Silent),
            other => Err(LogError::InvalidLogLevel(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogArgument {
    Text(String),
    Value(Value),
}

#[derive(Debug, Clone)]
pub enum LogError {
    InvalidLogLevel(String),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::InvalidLogLevel(level) => write!(f, "Invalid log level \"{level}\""),
        }
    }
}

impl std::error::Error for LogError {}

/// Sets the level of every live logger and of loggers created afterwards.
pub fn set_log_level(level: LogLevel) {
    GLOBAL_LOG_LEVEL.store(level as u8, Ordering::SeqCst);
    with_instances(|logger| logger.set_log_level(level));
}

/// Record handed to a user log handler.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: LogLevel,
    pub logger: String,
    pub message: String,
    pub args: Vec<Value>,
}

/// Installs (or with `None`, removes) a callback on every live logger.
///
/// The callback only sees records at or above the logger's own level.
pub fn set_user_log_handler<F>(callback: Option<F>)
where
    F: Fn(LogRecord) + Send + Sync + 'static,
{
    match callback {
        Some(callback) => {
            let callback = Arc::new(callback);
            with_instances(|logger| {
                let callback = Arc::clone(&callback);
                let handler: SharedLogHandler =
                    Arc::new(move |instance: &Logger, level, args: &[LogArgument]| {
                        if level < instance.log_level() {
                            return;
                        }
                        callback(LogRecord {
                            level,
                            logger: instance.name().to_string(),
                            message: build_message(args),
                            args: args
                                .iter()
                                .map(|arg| match arg {
                                    LogArgument::Text(text) => Value::String(text.clone()),
                                    LogArgument::Value(value) => value.clone(),
                                })
                                .collect(),
                        });
                    });
                *logger.inner.user_log_handler.write().unwrap() = Some(handler);
            });
        }
        None => with_instances(|logger| {
            logger.inner.user_log_handler.write().unwrap().take();
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    static TEST_GUARD: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

    fn reset_logging() {
        set_log_level(LogLevel::Info);
        set_user_log_handler(None::<fn(LogRecord)>);
    }

    fn capture(logger: &Logger) -> Arc<Mutex<Vec<(LogLevel, String)>>> {
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&records);
        logger.set_log_handler(move |instance, level, args| {
            if level < instance.log_level() {
                return;
            }
            sink.lock().unwrap().push((level, build_message(args)));
        });
        records
    }

    #[test]
    fn level_filters_records() {
        let _guard = TEST_GUARD.lock().unwrap();
        reset_logging();
        let logger = Logger::new("@gtm-support/level-test");
        let records = capture(&logger);

        logger.debug("debug message");
        logger.info("info message");
        logger.set_log_level(LogLevel::Warn);
        logger.info("hidden");
        logger.error("error message");

        let stored = records.lock().unwrap();
        let levels: Vec<_> = stored.iter().map(|(level, _)| *level).collect();
        assert_eq!(levels, [LogLevel::Info, LogLevel::Error]);
        assert_eq!(stored[0].1, "info message");
    }

    #[test]
    fn global_level_reaches_live_loggers() {
        let _guard = TEST_GUARD.lock().unwrap();
        reset_logging();
        let logger = Logger::new("@gtm-support/global-test");
        set_log_level(LogLevel::Debug);
        assert_eq!(logger.log_level(), LogLevel::Debug);
        assert_eq!(Logger::new("later").log_level(), LogLevel::Debug);
        reset_logging();
    }

    #[test]
    fn user_handler_receives_structured_arguments() {
        let _guard = TEST_GUARD.lock().unwrap();
        reset_logging();
        let logger = Logger::new("@gtm-support/user-handler-test");
        logger.set_log_handler(|_, _, _| {});

        let captured = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&captured);
        let name = logger.name().to_string();
        set_user_log_handler(Some(move |record: LogRecord| {
            if record.logger == name {
                sink.lock().unwrap().push(record);
            }
        }));

        logger.info_with("Dispatching event", json!({"event": "login"}));

        let records = captured.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].message, "Dispatching event {\"event\":\"login\"}");
        assert_eq!(records[0].args[1], json!({"event": "login"}));
        drop(records);
        reset_logging();
    }

    #[test]
    fn dropped_loggers_are_forgotten() {
        let _guard = TEST_GUARD.lock().unwrap();
        let name = "@gtm-support/short-lived";
        for _ in 0..32 {
            drop(Logger::new(name));
        }
        let _survivor = Logger::new(name);

        let instances = INSTANCES.lock().unwrap();
        let dead = instances
            .iter()
            .filter(|weak| weak.strong_count() == 0)
            .count();
        // Loggers owned by tests running in parallel may have been dropped since.
        assert!(dead < 32, "{dead} dead logger entries kept");
    }

    #[test]
    fn parses_levels() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::Error.to_string(), "ERROR");
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
