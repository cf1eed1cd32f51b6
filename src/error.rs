//! 流水线错误类型
//!
//! 所有单项处理中可能出现的错误都收敛到 [`PipelineError`]，
//! 由编排层在处理边界统一转换为 [`ProcessingResult`](crate::models::ProcessingResult)，
//! 不会向上冒泡中断整个批次。

use std::path::Path;
use thiserror::Error;

/// 单项处理错误
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 引用无效（N/A 占位符、非 http/https 链接等）
    #[error("无效引用: {reason}")]
    InvalidReference { reason: String },

    /// HTTP 返回非 200 状态码
    #[error("下载失败 ({url}): HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// 网络请求失败（超时、连接错误、读取响应体失败）
    #[error("网络请求失败 ({url}): {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// 提取或生成的内容为空
    #[error("内容为空: {what}")]
    EmptyOutput { what: String },

    /// 外部服务错误（LLM、文献检索）
    #[error("外部服务错误 ({service}): {message}")]
    ExternalService { service: String, message: String },

    /// 外部工具执行失败（nougat 等命令行工具）
    #[error("外部工具执行失败 ({tool}): {message}")]
    ExternalTool { tool: String, message: String },

    /// 文本提取失败
    #[error("文本提取失败 ({strategy}, {path}): {message}")]
    Extraction {
        strategy: String,
        path: String,
        message: String,
    },

    /// 文件读写失败
    #[error("文件操作失败 ({path}): {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ========== 便捷构造函数 ==========

impl PipelineError {
    /// 创建无效引用错误
    pub fn invalid_reference(reason: impl Into<String>) -> Self {
        PipelineError::InvalidReference {
            reason: reason.into(),
        }
    }

    /// 创建空内容错误
    pub fn empty_output(what: impl Into<String>) -> Self {
        PipelineError::EmptyOutput { what: what.into() }
    }

    /// 创建外部服务错误
    pub fn external_service(service: impl Into<String>, message: impl ToString) -> Self {
        PipelineError::ExternalService {
            service: service.into(),
            message: message.to_string(),
        }
    }

    /// 创建外部工具错误
    pub fn external_tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::ExternalTool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// 创建文件操作错误
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// 创建网络错误
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        PipelineError::Network {
            url: url.into(),
            source,
        }
    }
}

// ========== Result 类型别名 ==========

/// 单项处理结果类型
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = PipelineError::HttpStatus {
            url: "https://example.org/a.pdf".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "下载失败 (https://example.org/a.pdf): HTTP 404");

        let err = PipelineError::empty_output("摘要");
        assert_eq!(err.to_string(), "内容为空: 摘要");
    }

    #[test]
    fn test_io_error_keeps_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = PipelineError::io(Path::new("papers/x.pdf"), source);
        assert!(err.to_string().contains("papers/x.pdf"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
