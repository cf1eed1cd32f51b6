//! # Paper Pipeline
//!
//! 文献处理流水线：检索 → 下载 → 文本提取 → 摘要 → 报告
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源，只暴露能力
//! - `ConcurrencyLimiter` - 每个阶段的并发名额
//! - `ProgressReporter` - 进度条和完成计数
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个文件或请求
//! - `DownloadService` - 下载并原子落盘
//! - `StructuralExtractor` / `NougatExtractor` - 两种文本提取策略
//! - `LlmService` - 摘要生成能力
//! - `SearchService` / `CatalogWriter` - 文献检索和目录写入
//! - `FailureWriter` - 写失败记录
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个工作项"的完整处理流程
//! - `ItemCtx` - 上下文封装（阶段 + 序号）
//! - `DownloadFlow` / `ExtractFlow` / `SummarizeFlow` - 幂等检查 + 处理
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_runner` - 批量运行器，管理并发和故障隔离
//! - `orchestrator/reporting` - 批次报告、对比报告、摘要索引
//! - `orchestrator/app` - 各阶段驱动
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{PipelineError, PipelineResult};
pub use models::{BatchReport, ProcessingResult, SkipReason, Stage, StrategySet};
pub use orchestrator::{App, BatchRunner};
pub use workflow::{ItemCtx, ItemProcessor};
