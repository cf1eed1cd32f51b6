//! 摘要提示词
//!
//! 启动时构建一次，之后以不可变值在所有摘要请求间共享

use anyhow::{Context, Result};

use crate::config::Config;

/// 内置的系统提示词
pub const DEFAULT_SYSTEM_INSTRUCTION: &str = "\
You are an expert research assistant. Summarize the research paper you are given \
using the following structure, in markdown:

# <Paper title>

1. Key Points (3-5 bullet points)
2. Main Contributions
3. Methodology
4. Results and Conclusions
5. Future Work

The first line of your answer must be the paper title as a level-1 heading.";

pub const DEFAULT_USER_PREFIX: &str = "Please summarize this research paper:\n\n";

/// 摘要请求的固定部分：系统提示词和采样参数
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryPrompt {
    pub system_instruction: String,
    pub user_prefix: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for SummaryPrompt {
    fn default() -> Self {
        Self {
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            user_prefix: DEFAULT_USER_PREFIX.to_string(),
            temperature: 0.3,
            max_tokens: 4096,
        }
    }
}

impl SummaryPrompt {
    /// 按配置构建；指定了提示词文件但读取失败时报错
    pub fn from_config(config: &Config) -> Result<Self> {
        let system_instruction = match &config.system_prompt_file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("无法读取系统提示词: {}", path.display()))?,
            None => DEFAULT_SYSTEM_INSTRUCTION.to_string(),
        };

        Ok(Self {
            system_instruction,
            temperature: config.llm_temperature,
            max_tokens: config.llm_max_tokens,
            ..Self::default()
        })
    }

    /// 拼出用户消息
    pub fn user_message(&self, content: &str) -> String {
        format!("{}{}", self.user_prefix, content)
    }
}
