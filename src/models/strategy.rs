use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 文本提取策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractStrategy {
    /// 进程内结构化文本提取（快）
    Structural,
    /// 外部 OCR / 版面分析（慢）
    Ocr,
}

impl ExtractStrategy {
    pub const ALL: [ExtractStrategy; 2] = [ExtractStrategy::Structural, ExtractStrategy::Ocr];

    /// 用于目录名、文件名后缀和报告字段的标签
    pub fn tag(self) -> &'static str {
        match self {
            ExtractStrategy::Structural => "structural",
            ExtractStrategy::Ocr => "ocr",
        }
    }

    /// 某个文档在该策略下的输出文件名：`<stem>_<tag>.md`
    pub fn output_file_name(self, stem: &str) -> String {
        format!("{}_{}.md", stem, self.tag())
    }

    /// 从输出文件的 stem 中还原文档名
    pub fn base_name<'a>(self, output_stem: &'a str) -> Option<&'a str> {
        output_stem.strip_suffix(&format!("_{}", self.tag()))
    }
}

impl fmt::Display for ExtractStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ExtractStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "structural" => Ok(ExtractStrategy::Structural),
            "ocr" => Ok(ExtractStrategy::Ocr),
            other => Err(format!("未知的提取策略: {}", other)),
        }
    }
}

/// 本次运行选中的提取策略集合（去重、有序）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategySet(Vec<ExtractStrategy>);

impl StrategySet {
    pub fn new(strategies: impl IntoIterator<Item = ExtractStrategy>) -> Self {
        let mut list: Vec<ExtractStrategy> = strategies.into_iter().collect();
        list.sort();
        list.dedup();
        Self(list)
    }

    pub fn both() -> Self {
        Self::new(ExtractStrategy::ALL)
    }

    pub fn contains(&self, strategy: ExtractStrategy) -> bool {
        self.0.contains(&strategy)
    }

    pub fn iter(&self) -> impl Iterator<Item = ExtractStrategy> + '_ {
        self.0.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromStr for StrategySet {
    type Err = String;

    /// 支持 `structural`、`ocr`、`both` 以及逗号分隔的组合
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("both") {
            return Ok(Self::both());
        }
        let strategies = s
            .split(',')
            .filter(|part| !part.trim().is_empty())
            .map(ExtractStrategy::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        if strategies.is_empty() {
            return Err("至少需要选择一种提取策略".to_string());
        }
        Ok(Self::new(strategies))
    }
}
