//! 工作项处理上下文
//!
//! 封装"我正在处理哪个阶段的第几项"这一信息

use std::fmt::Display;

use crate::models::Stage;

/// 工作项处理上下文
#[derive(Debug, Clone, Copy)]
pub struct ItemCtx {
    pub stage: Stage,

    /// 在枚举顺序中的位置（从1开始）
    pub index: usize,

    /// 本批次工作项总数
    pub total: usize,
}

impl ItemCtx {
    pub fn new(stage: Stage, index: usize, total: usize) -> Self {
        Self {
            stage,
            index,
            total,
        }
    }
}

impl Display for ItemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {}/{}]", self.stage.label(), self.index, self.total)
    }
}
