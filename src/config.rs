//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置，`FX_API_BASE_URL` 环境变量可覆盖上游地址

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::ExchangeRateType;

/// 上游地址环境变量
pub const BASE_URL_ENV: &str = "FX_API_BASE_URL";

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// 上游汇率服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// 上游服务根地址
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// 历史查询使用的汇率类型
    #[serde(default = "default_history_rate_type")]
    pub history_rate_type: ExchangeRateType,
    /// 首页热门汇率使用的汇率类型
    #[serde(default = "default_current_rate_type")]
    pub current_rate_type: ExchangeRateType,
}

/// 分页配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagingConfig {
    /// 默认每页条数
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// 每页条数上限
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

/// 历史查询默认值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// 默认货币
    #[serde(default = "default_currency")]
    pub default_currency: String,
    /// 默认开始日期
    #[serde(default = "default_from_date")]
    pub default_from_date: NaiveDate,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub paging: PagingConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub log: LogConfig,
    /// 实际加载的配置文件
    #[serde(skip)]
    pub loaded_from: Option<PathBuf>,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_base_url() -> String { "http://localhost:8081".to_string() }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_history_rate_type() -> ExchangeRateType { ExchangeRateType::EU }
fn default_current_rate_type() -> ExchangeRateType { ExchangeRateType::LT }
fn default_page_size() -> usize { 10 }
fn default_max_page_size() -> usize { 100 }
fn default_currency() -> String { "USD".to_string() }
fn default_from_date() -> NaiveDate { NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or_default() }
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            history_rate_type: default_history_rate_type(),
            current_rate_type: default_current_rate_type(),
        }
    }
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
            default_from_date: default_from_date(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut config: AppConfig = serde_json::from_str(&content)?;
        config.loaded_from = Some(path.as_ref().to_path_buf());
        Ok(config)
    }

    /// 加载配置，优先从文件，失败则使用默认值
    ///
    /// 日志系统依赖配置中的级别，因此这里不输出日志，
    /// 加载结果通过 `loaded_from` 与返回的警告交给调用方记录
    pub fn load() -> (Self, Vec<String>) {
        let config_paths = ["config.json", "config/config.json"];
        let mut warnings = Vec::new();
        let mut config = None;

        for path in config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(c) => {
                        config = Some(c);
                        break;
                    }
                    Err(e) => warnings.push(format!("加载配置文件 {} 失败: {}", path, e)),
                }
            }
        }

        let mut config = config.unwrap_or_default();
        if let Ok(base_url) = env::var(BASE_URL_ENV) {
            if !base_url.trim().is_empty() {
                config.upstream.base_url = base_url;
            }
        }

        (config, warnings)
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
