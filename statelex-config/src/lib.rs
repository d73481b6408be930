//! Statelex Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all Statelex crates.

use serde::{Deserialize, Serialize};

/// 默认的基础状态名
pub const DEFAULT_BASE_STATE: &str = "start";

/// Log targets used by the engine (must stay constant expressions for `tracing`)
pub mod targets {
    pub const COMPILER: &str = "statelex::compiler";
    pub const RESOLVER: &str = "statelex::resolver";
    pub const ENGINE: &str = "statelex::engine";
}

/// Configuration for a lexer instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexerConfig {
    /// Name of the reserved base state (active when the state stack is empty)
    pub base_state: String,
    /// Build every state's full alternation at construction time
    pub eager_compile: bool,
    /// Logging configuration
    ///
    /// The lexer does not install a subscriber; pass this to
    /// `statelex_core::logging::init` (or `statelex::init_logging`).
    pub log: LogConfig,
}

impl LexerConfig {
    /// 从 JSON 文本加载配置（缺省字段取默认值）
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// 序列化为 JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn with_base_state(mut self, name: impl Into<String>) -> Self {
        self.base_state = name.into();
        self
    }

    pub fn with_eager_compile(mut self, eager: bool) -> Self {
        self.eager_compile = eager;
        self
    }
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            base_state: DEFAULT_BASE_STATE.to_string(),
            eager_compile: true,
            log: LogConfig::default(),
        }
    }
}

/// Log verbosity
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// 日志输出格式
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// 彩色格式化（开发使用）
    Pretty,
    /// 紧凑格式
    Compact,
    /// JSON 格式（工具集成）
    Json,
}

/// 日志配置：全局级别 + 分阶段覆盖
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub global: LogLevel,
    pub compiler: Option<LogLevel>,
    pub resolver: Option<LogLevel>,
    pub engine: Option<LogLevel>,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: LogLevel::Warn,
            compiler: None,
            resolver: None,
            engine: None,
            format: LogFormat::Compact,
        }
    }
}

impl LogConfig {
    /// Get log level for a specific stage
    pub fn level_for(&self, stage: Stage) -> LogLevel {
        let specific = match stage {
            Stage::Compiler => self.compiler,
            Stage::Resolver => self.resolver,
            Stage::Engine => self.engine,
        };
        specific.unwrap_or(self.global)
    }
}

/// Engine stage, used for stage-specific log configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Compiler,
    Resolver,
    Engine,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Compiler, Stage::Resolver, Stage::Engine];

    /// Get the string name of the stage
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Compiler => "compiler",
            Stage::Resolver => "resolver",
            Stage::Engine => "engine",
        }
    }

    /// Get the log target name for this stage
    pub fn target(&self) -> &'static str {
        match self {
            Stage::Compiler => targets::COMPILER,
            Stage::Resolver => targets::RESOLVER,
            Stage::Engine => targets::ENGINE,
        }
    }
}
