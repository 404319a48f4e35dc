use serde::{Deserialize, Serialize};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀：CW__SERVER__PORT=9999
pub const ENV_PREFIX: &str = "CW";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: 服务器地址、端口、CPU 数量
/// - database: 数据库连接与重试配置
/// - logging: 日志配置
/// - api: JWT、可信代理、GraphQL Playground、CORS
/// - rate_limit: 访客计数与登录限流
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl StaticConfig {
    /// 从 `config.toml` 和环境变量加载配置
    pub fn load() -> Self {
        Self::load_from(None)
    }

    /// 从指定 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > TOML > 默认值
    /// ENV 前缀：CW，分隔符：__
    pub fn load_from(path: Option<&str>) -> Self {
        Self::load_with_env(path, None)
    }

    /// `env` 为 None 时读取进程环境变量
    fn load_with_env(path: Option<&str>, env: Option<config::Map<String, String>>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("api.trusted_proxies")
                    .with_list_parse_key("api.cors_allowed_origins")
                    .try_parsing(true)
                    .source(env),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    /// 连接/获取超时（秒）
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "text" 或 "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// HS256 密钥，为空时启动时生成随机值（重启后 token 失效）
    #[serde(default)]
    pub jwt_secret: String,
    #[serde(default = "default_access_token_minutes")]
    pub access_token_minutes: u64,
    /// 可信反向代理（IP 或 CIDR）
    #[serde(default)]
    pub trusted_proxies: Vec<String>,
    #[serde(default)]
    pub enable_playground: bool,
    /// 为空时不允许跨域；["*"] 允许任意来源
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

/// 限流配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// incrementVisitorCount：每个客户端每个周期允许的次数
    #[serde(default = "default_visitor_period_secs")]
    pub visitor_period_secs: u64,
    #[serde(default = "default_visitor_burst")]
    pub visitor_burst: u32,
    /// /api/auth/* 令牌补充间隔（秒）
    #[serde(default = "default_auth_seconds_per_request")]
    pub auth_seconds_per_request: u64,
    #[serde(default = "default_auth_burst")]
    pub auth_burst: u32,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "sqlite://civicwatch.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    8
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_access_token_minutes() -> u64 {
    60
}

fn default_visitor_period_secs() -> u64 {
    60
}

fn default_visitor_burst() -> u32 {
    1
}

fn default_auth_seconds_per_request() -> u64 {
    1
}

fn default_auth_burst() -> u32 {
    5
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_minutes: default_access_token_minutes(),
            trusted_proxies: Vec::new(),
            enable_playground: false,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            visitor_period_secs: default_visitor_period_secs(),
            visitor_burst: default_visitor_burst(),
            auth_seconds_per_request: default_auth_seconds_per_request(),
            auth_burst: default_auth_burst(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_visitor_policy() {
        let config = StaticConfig::default();
        assert_eq!(config.rate_limit.visitor_period_secs, 60);
        assert_eq!(config.rate_limit.visitor_burst, 1);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.retry_count, 3);
    }

    #[test]
    fn test_sample_config_round_trips_through_toml() {
        let sample = StaticConfig::generate_sample_config();
        assert!(sample.contains("[rate_limit]"));
        let parsed: StaticConfig = toml::from_str(&sample).expect("sample must parse");
        assert_eq!(parsed.api.access_token_minutes, 60);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: StaticConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [api]
            trusted_proxies = ["10.0.0.0/8"]
            "#,
        )
        .expect("partial config must parse");
        assert_eq!(parsed.server.port, 9000);
        assert_eq!(parsed.server.host, "127.0.0.1");
        assert_eq!(parsed.api.trusted_proxies, vec!["10.0.0.0/8".to_string()]);
        assert_eq!(parsed.rate_limit.visitor_period_secs, 60);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("civicwatch.toml");
        std::fs::write(
            &path,
            "[database]\ndatabase_url = \"sqlite://from-file.db\"\n",
        )
        .expect("write config");

        let config = StaticConfig::load_from(path.to_str());
        assert_eq!(config.database.database_url, "sqlite://from-file.db");
    }

    #[test]
    fn test_env_overrides_toml() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("civicwatch.toml");
        std::fs::write(&path, "[server]\nport = 9000\n").expect("write config");

        let env = config::Map::from([
            ("CW__SERVER__PORT".to_string(), "9100".to_string()),
            ("CW__RATE_LIMIT__VISITOR_BURST".to_string(), "3".to_string()),
            (
                "CW__API__TRUSTED_PROXIES".to_string(),
                "10.0.0.1,192.168.0.0/16".to_string(),
            ),
        ]);
        let config = StaticConfig::load_with_env(path.to_str(), Some(env));
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.rate_limit.visitor_burst, 3);
        assert_eq!(config.api.trusted_proxies.len(), 2);
        assert_eq!(config.rate_limit.visitor_period_secs, 60);
    }
}
