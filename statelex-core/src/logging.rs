//! 日志系统初始化
//!
//! 基于 `tracing-subscriber` 实现分阶段日志控制。
//! 引擎本身只发事件，是否安装订阅者由调用方决定。

use statelex_config::{LogConfig, LogFormat, LogLevel, Stage};
use tracing::Subscriber;
use tracing_subscriber::{
    filter::{LevelFilter, Targets},
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

pub use tracing_subscriber::util::TryInitError as InitError;

/// 配置级别 → tracing 过滤级别
pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}

/// 按阶段构建 target 过滤器
pub fn filter(config: &LogConfig) -> Targets {
    Stage::ALL.iter().fold(
        Targets::new().with_default(level_filter(config.global)),
        |targets, stage| targets.with_target(stage.target(), level_filter(config.level_for(*stage))),
    )
}

/// 构建订阅者但不安装，便于测试里用 `with_default` 限定作用域
pub fn subscriber<W>(config: &LogConfig, make_writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = format_layer(config.format, make_writer).with_filter(filter(config));
    tracing_subscriber::registry().with(layer)
}

/// 安装全局订阅者，输出到 stderr
pub fn init(config: &LogConfig) -> Result<(), InitError> {
    subscriber(config, std::io::stderr).try_init()
}

fn format_layer<W>(format: LogFormat, make_writer: W) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_ansi(false)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use statelex_config::targets;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl Capture {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(config: &LogConfig, emit: impl FnOnce()) -> String {
        let out = Capture::default();
        let writer = out.clone();
        tracing::subscriber::with_default(subscriber(config, move || writer.clone()), emit);
        out.contents()
    }

    #[test]
    fn test_level_filter_mapping() {
        assert_eq!(level_filter(LogLevel::Off), LevelFilter::OFF);
        assert_eq!(level_filter(LogLevel::Trace), LevelFilter::TRACE);
        assert!(level_filter(LogLevel::Warn) < level_filter(LogLevel::Debug));
    }

    #[test]
    fn test_stage_override_enables_target() {
        let config = LogConfig {
            global: LogLevel::Off,
            engine: Some(LogLevel::Debug),
            ..LogConfig::default()
        };
        let output = capture(&config, || {
            tracing::debug!(target: targets::ENGINE, "engine event");
            tracing::debug!(target: targets::COMPILER, "compiler event");
        });
        assert!(output.contains("engine event"));
        assert!(!output.contains("compiler event"));
    }

    #[test]
    fn test_json_format() {
        let config = LogConfig {
            global: LogLevel::Info,
            format: LogFormat::Json,
            ..LogConfig::default()
        };
        let output = capture(&config, || {
            tracing::info!(target: targets::RESOLVER, rule = 3, "resolved");
        });
        let line = output.lines().next().unwrap();
        let json: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(json["target"], "statelex::resolver");
        assert_eq!(json["fields"]["rule"], 3);
    }
}
