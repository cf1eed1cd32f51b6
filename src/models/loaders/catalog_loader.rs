use crate::models::{DownloadItem, Reference};
use crate::utils::filename::{extension_from_url, sanitize_filename, with_collision_suffix};
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use tokio::fs;

/// 目录表格行：`| 标题 | ... | ... | 引用次数 | [Link](URL) |`
const ROW_PATTERN: &str = r"\|(.*?)\|(.*?)\|(.*?)\|\s*(\d*)\s*\|\s*\[Link\]\((.*?)\)\s*\|";

/// 从 markdown 文件加载文献目录
///
/// 文件无法读取时整个阶段失败（没有可处理的工作项）
pub async fn load_catalog(path: &Path) -> Result<Vec<Reference>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取文献目录: {}", path.display()))?;

    let references = parse_catalog(&content)?;
    tracing::info!(
        "从 {} 解析到 {} 条引用",
        path.file_name().unwrap_or_default().to_string_lossy(),
        references.len()
    );
    Ok(references)
}

/// 解析目录内容，不匹配的行直接忽略
pub fn parse_catalog(content: &str) -> Result<Vec<Reference>> {
    let re = Regex::new(ROW_PATTERN)?;

    let references = content
        .lines()
        .filter_map(|line| re.captures(line))
        .filter_map(|caps| {
            let title = caps.get(1)?.as_str().trim();
            let url = caps.get(5)?.as_str().trim();
            if title.is_empty() || url.is_empty() {
                return None;
            }
            Some(Reference {
                title: title.to_string(),
                url: url.to_string(),
                citations: caps.get(4).and_then(|m| m.as_str().parse().ok()),
            })
        })
        .collect();

    Ok(references)
}

/// 为每条引用确定输出文件名
///
/// 清洗后重名的引用按目录顺序依次追加 `_2`、`_3`…，
/// 保证并发写入时不会有两个工作项指向同一路径。
/// 重名按忽略大小写比较：后续阶段只看文件名主干，大小写不敏感的文件系统也不区分大小写。
pub fn plan_downloads(references: Vec<Reference>, default_extension: &str) -> Vec<DownloadItem> {
    let mut taken: HashSet<String> = HashSet::new();

    references
        .into_iter()
        .map(|reference| {
            let mut base = sanitize_filename(&reference.title);
            if base.is_empty() {
                base = "untitled".to_string();
            }
            let extension = extension_from_url(&reference.url, default_extension);

            let mut output_key = base.clone();
            let mut n = 1;
            while !taken.insert(output_key.to_lowercase()) {
                n += 1;
                output_key = with_collision_suffix(&base, n);
            }

            DownloadItem {
                reference,
                output_key,
                extension,
            }
        })
        .collect()
}
