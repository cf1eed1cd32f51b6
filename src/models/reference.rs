use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::ExtractStrategy;

/// 文献目录中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub title: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citations: Option<u64>,
}

impl Reference {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            citations: None,
        }
    }
}

/// 下载阶段的工作项
///
/// `output_key` 在枚举阶段确定，只取决于标题（以及目录中的重名顺序），
/// 重复运行时总是得到同一个输出路径。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadItem {
    pub reference: Reference,
    pub output_key: String,
    pub extension: String,
}

impl DownloadItem {
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.output_key, self.extension)
    }

    pub fn output_path(&self, papers_dir: &Path) -> PathBuf {
        papers_dir.join(self.file_name())
    }
}

/// 文本提取阶段的工作项：一个文档 × 一种策略
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionItem {
    pub source: PathBuf,
    pub strategy: ExtractStrategy,
}

impl ExtractionItem {
    pub fn stem(&self) -> String {
        file_stem(&self.source)
    }
}

/// 摘要阶段的工作项：一个已提取的文本文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentItem {
    pub path: PathBuf,
}

impl DocumentItem {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn stem(&self) -> String {
        file_stem(&self.path)
    }

    /// 摘要文件名：`<stem>_summary.md`
    pub fn summary_file_name(&self) -> String {
        format!("{}_summary.md", self.stem())
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_item_paths() {
        let item = DownloadItem {
            reference: Reference::new("Attention Is All You Need!", "https://x.org/a.pdf"),
            output_key: "Attention_Is_All_You_Need".to_string(),
            extension: "pdf".to_string(),
        };
        assert_eq!(item.file_name(), "Attention_Is_All_You_Need.pdf");
        assert_eq!(
            item.output_path(Path::new("papers")),
            PathBuf::from("papers/Attention_Is_All_You_Need.pdf")
        );
    }

    #[test]
    fn test_document_summary_name() {
        let doc = DocumentItem::new("markdown/structural/Paper_structural.md");
        assert_eq!(doc.stem(), "Paper_structural");
        assert_eq!(doc.summary_file_name(), "Paper_structural_summary.md");
    }
}
