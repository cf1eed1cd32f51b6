//! 基础设施层
//!
//! 持有跨工作项共享的稀缺资源，只暴露能力，不认识具体业务。

pub mod limiter;
pub mod progress;

pub use limiter::ConcurrencyLimiter;
pub use progress::ProgressReporter;
