use std::time::Duration;

use crate::error::ConfigError;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    // --- 批改节奏 ---
    /// 每份答卷的最大尝试次数（含首次）
    pub max_attempts: u32,
    /// 线性退避步长：第 k 次失败后等待 k × 步长
    pub backoff_step_ms: u64,
    /// 相邻两份答卷之间的固定冷却时间
    pub cooldown_ms: u64,
    // --- 输出 ---
    pub output_report_file: String,
    /// 输出日志文件
    pub output_log_file: String,
    pub warn_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            llm_model_name: "gemini-2.5-flash".to_string(),
            request_timeout_secs: 300,
            max_attempts: 3,
            backoff_step_ms: 5_000,
            cooldown_ms: 2_500,
            output_report_file: "grading_results.csv".to_string(),
            output_log_file: "grading_log.txt".to_string(),
            warn_file: "warn.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            llm_api_key: std::env::var("LLM_API_KEY")
                .or_else(|_| std::env::var("GEMINI_API_KEY"))
                .unwrap_or(default.llm_api_key),
            llm_api_base_url: std::env::var("LLM_API_BASE_URL").unwrap_or(default.llm_api_base_url),
            llm_model_name: std::env::var("LLM_MODEL_NAME").unwrap_or(default.llm_model_name),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            max_attempts: std::env::var("MAX_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_attempts),
            backoff_step_ms: std::env::var("BACKOFF_STEP_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.backoff_step_ms),
            cooldown_ms: std::env::var("COOLDOWN_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.cooldown_ms),
            output_report_file: std::env::var("OUTPUT_REPORT_FILE").unwrap_or(default.output_report_file),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            warn_file: std::env::var("WARN_FILE").unwrap_or(default.warn_file),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                name: "MAX_ATTEMPTS".to_string(),
                reason: "至少需要 1 次尝试".to_string(),
            });
        }
        if self.llm_model_name.trim().is_empty() {
            return Err(ConfigError::Invalid {
                name: "LLM_MODEL_NAME".to_string(),
                reason: "模型名称不能为空".to_string(),
            });
        }
        Ok(())
    }

    pub fn backoff_step(&self) -> Duration {
        Duration::from_millis(self.backoff_step_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}
