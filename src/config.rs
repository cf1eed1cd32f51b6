//! 程序配置
//!
//! 加载顺序：默认值 → TOML 配置文件（可选）→ 环境变量覆盖 → 校验

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::models::ExtractStrategy;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- 路径 ---
    /// 文献目录（markdown 表格）
    pub catalog_file: PathBuf,
    /// 下载目录
    pub papers_dir: PathBuf,
    /// 文本提取输出根目录
    pub markdown_dir: PathBuf,
    /// 摘要输出目录
    pub summaries_dir: PathBuf,
    /// 批次报告输出目录
    pub reports_dir: PathBuf,
    /// 失败记录文件
    pub failure_log_file: PathBuf,

    // --- 并发上限 ---
    /// 同时进行的下载数量
    pub download_concurrency: usize,
    /// 同时进行的文本提取数量
    pub extract_concurrency: usize,
    /// 同时进行的 LLM 摘要请求数量
    pub summarize_concurrency: usize,

    // --- 下载 ---
    /// 单次下载总超时（秒）
    pub fetch_timeout_secs: u64,
    /// 已存在文件被视为有效缓存的最小字节数
    pub min_cached_bytes: u64,
    /// URL 中没有扩展名时使用的默认扩展名
    pub default_extension: String,

    // --- OCR 提取 ---
    /// nougat 可执行文件路径（为空时从 PATH 中查找）
    pub nougat_binary: Option<PathBuf>,
    /// 单个文档 OCR 超时（秒）
    pub ocr_timeout_secs: u64,
    /// OCR 结束后轮询输出文件的次数
    pub ocr_poll_attempts: u32,
    /// OCR 轮询间隔（毫秒）
    pub ocr_poll_interval_ms: u64,

    // --- 摘要 ---
    /// 摘要阶段读取哪种提取策略的输出
    pub summarize_source: ExtractStrategy,
    /// 系统提示词文件（为空时使用内置提示词）
    pub system_prompt_file: Option<PathBuf>,

    // --- LLM 配置 ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,

    // --- 文献检索 ---
    pub search_api_base_url: String,
    pub search_query: String,
    pub search_limit: usize,

    // --- 运行行为 ---
    /// 有失败项时以非零状态退出
    pub fail_on_error: bool,
    /// 是否显示进度条
    pub show_progress: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_file: PathBuf::from("papers.md"),
            papers_dir: PathBuf::from("papers"),
            markdown_dir: PathBuf::from("markdown"),
            summaries_dir: PathBuf::from("summaries"),
            reports_dir: PathBuf::from("reports"),
            failure_log_file: PathBuf::from("failures.txt"),
            download_concurrency: 5,
            extract_concurrency: 2,
            summarize_concurrency: 4,
            fetch_timeout_secs: 60,
            min_cached_bytes: 1,
            default_extension: "pdf".to_string(),
            nougat_binary: None,
            ocr_timeout_secs: 1800,
            ocr_poll_attempts: 10,
            ocr_poll_interval_ms: 500,
            summarize_source: ExtractStrategy::Structural,
            system_prompt_file: None,
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            llm_temperature: 0.3,
            llm_max_tokens: 4096,
            search_api_base_url: "https://dblp.org".to_string(),
            search_query: "Large Language Models Security".to_string(),
            search_limit: 30,
            fail_on_error: false,
            show_progress: true,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载配置：可选的 TOML 文件 + 环境变量覆盖
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        let config = base.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取配置，缺失字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn with_env_overrides(self) -> Self {
        Self {
            catalog_file: env_or("PIPELINE_CATALOG_FILE", self.catalog_file),
            papers_dir: env_or("PIPELINE_PAPERS_DIR", self.papers_dir),
            markdown_dir: env_or("PIPELINE_MARKDOWN_DIR", self.markdown_dir),
            summaries_dir: env_or("PIPELINE_SUMMARIES_DIR", self.summaries_dir),
            reports_dir: env_or("PIPELINE_REPORTS_DIR", self.reports_dir),
            failure_log_file: env_or("PIPELINE_FAILURE_LOG_FILE", self.failure_log_file),
            download_concurrency: env_or("PIPELINE_DOWNLOAD_CONCURRENCY", self.download_concurrency),
            extract_concurrency: env_or("PIPELINE_EXTRACT_CONCURRENCY", self.extract_concurrency),
            summarize_concurrency: env_or("PIPELINE_SUMMARIZE_CONCURRENCY", self.summarize_concurrency),
            fetch_timeout_secs: env_or("PIPELINE_FETCH_TIMEOUT_SECS", self.fetch_timeout_secs),
            min_cached_bytes: env_or("PIPELINE_MIN_CACHED_BYTES", self.min_cached_bytes),
            default_extension: env_or("PIPELINE_DEFAULT_EXTENSION", self.default_extension),
            nougat_binary: std::env::var("PIPELINE_NOUGAT_BINARY").ok().map(PathBuf::from).or(self.nougat_binary),
            ocr_timeout_secs: env_or("PIPELINE_OCR_TIMEOUT_SECS", self.ocr_timeout_secs),
            ocr_poll_attempts: env_or("PIPELINE_OCR_POLL_ATTEMPTS", self.ocr_poll_attempts),
            ocr_poll_interval_ms: env_or("PIPELINE_OCR_POLL_INTERVAL_MS", self.ocr_poll_interval_ms),
            summarize_source: env_or("PIPELINE_SUMMARIZE_SOURCE", self.summarize_source),
            system_prompt_file: std::env::var("PIPELINE_SYSTEM_PROMPT_FILE").ok().map(PathBuf::from).or(self.system_prompt_file),
            llm_api_key: env_or("LLM_API_KEY", self.llm_api_key),
            llm_api_base_url: env_or("LLM_API_BASE_URL", self.llm_api_base_url),
            llm_model_name: env_or("LLM_MODEL_NAME", self.llm_model_name),
            llm_temperature: env_or("LLM_TEMPERATURE", self.llm_temperature),
            llm_max_tokens: env_or("LLM_MAX_TOKENS", self.llm_max_tokens),
            search_api_base_url: env_or("SEARCH_API_BASE_URL", self.search_api_base_url),
            search_query: env_or("SEARCH_QUERY", self.search_query),
            search_limit: env_or("SEARCH_LIMIT", self.search_limit),
            fail_on_error: env_or("PIPELINE_FAIL_ON_ERROR", self.fail_on_error),
            show_progress: env_or("PIPELINE_SHOW_PROGRESS", self.show_progress),
            verbose_logging: env_or("VERBOSE_LOGGING", self.verbose_logging),
        }
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("download_concurrency", self.download_concurrency),
            ("extract_concurrency", self.extract_concurrency),
            ("summarize_concurrency", self.summarize_concurrency),
        ] {
            if value == 0 {
                bail!("配置项 {} 必须大于 0", name);
            }
        }
        if self.fetch_timeout_secs == 0 {
            bail!("配置项 fetch_timeout_secs 必须大于 0");
        }
        if self.ocr_timeout_secs == 0 {
            bail!("配置项 ocr_timeout_secs 必须大于 0");
        }
        if self.default_extension.is_empty() {
            bail!("配置项 default_extension 不能为空");
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn ocr_timeout(&self) -> Duration {
        Duration::from_secs(self.ocr_timeout_secs)
    }

    pub fn ocr_poll_interval(&self) -> Duration {
        Duration::from_millis(self.ocr_poll_interval_ms)
    }

    /// 某种提取策略的输出目录
    pub fn strategy_dir(&self, strategy: ExtractStrategy) -> PathBuf {
        self.markdown_dir.join(strategy.tag())
    }
}

/// 读取环境变量，解析失败或不存在时使用默认值
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
