//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和阶段调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_runner` - 批量运行器
//! - 为每个工作项派发任务
//! - 幂等检查后再占用并发名额
//! - 把每一项的结果（含 panic）收集进批次报告
//!
//! ### `reporting` - 汇总报告
//! - 批次报告 JSON
//! - 跨策略对比报告
//! - 摘要索引
//!
//! ### `app` - 阶段驱动
//! - collect / download / extract / summarize / report / all
//!
//! ## 层次关系
//!
//! ```text
//! app (枚举工作项、输出统计)
//!     ↓
//! batch_runner (处理 Vec<Item>)
//!     ↓
//! workflow::*Flow (处理单个 Item)
//!     ↓
//! services (能力层：download / extract / llm / search)
//!     ↓
//! infrastructure (基础设施：ConcurrencyLimiter / ProgressReporter)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：batch_runner 管批量，flow 管单个
//! 2. **向下依赖**：编排层 → workflow → services → infrastructure
//! 3. **无业务逻辑**：只做调度和统计，不做具体业务判断

pub mod app;
pub mod batch_runner;
pub mod reporting;

// 重新导出主要类型
pub use app::App;
pub use batch_runner::BatchRunner;
