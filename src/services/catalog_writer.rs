//! 目录写入服务 - 业务能力层
//!
//! 把检索结果渲染成下载阶段可读取的 markdown 表格

use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::PipelineResult;
use crate::models::Publication;
use crate::utils::fs::{ensure_dir, write_atomic};

const NOT_AVAILABLE: &str = "N/A";

/// 目录写入服务
pub struct CatalogWriter {
    path: PathBuf,
}

impl CatalogWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 渲染并写入目录文件，返回写入的行数
    pub async fn write(&self, query: &str, publications: &[Publication]) -> PipelineResult<usize> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent).await?;
        }

        let content = render_catalog(query, publications);
        write_atomic(&self.path, content.as_bytes()).await?;

        info!(
            "📝 已写入目录: {} ({} 条)",
            self.path.display(),
            publications.len()
        );
        Ok(publications.len())
    }
}

/// 渲染目录内容
///
/// 引用次数未知时留空，链接缺失时写 `N/A`（下载阶段会把该行判为无效引用）
pub fn render_catalog(query: &str, publications: &[Publication]) -> String {
    let mut out = format!("# {}\n\n", query.trim());
    out.push_str("| Title | Authors | Year | Citations | Link |\n");
    out.push_str("|-------|---------|------|-----------|------|\n");

    for publication in publications {
        let citations = publication
            .citations
            .map(|c| c.to_string())
            .unwrap_or_default();

        out.push_str(&format!(
            "| {} | {} | {} | {} | [Link]({}) |\n",
            cell(&publication.title),
            cell(&publication.authors_display()),
            cell(publication.year.as_deref().unwrap_or(NOT_AVAILABLE)),
            citations,
            publication.url.as_deref().unwrap_or(NOT_AVAILABLE),
        ));
    }

    out
}

/// 表格单元格内不能出现竖线和换行
fn cell(text: &str) -> String {
    text.replace('|', "/").replace(['\n', '\r'], " ")
}
