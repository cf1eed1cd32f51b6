//! 汇总报告 - 编排层
//!
//! 所有报告只读取磁盘上的最终状态再聚合，重复运行结果一致、没有副作用
//! （除了覆盖写报告文件本身）。

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::models::{list_files, ArtifactInfo, BatchReport, ComparisonRecord, ExtractStrategy};
use crate::utils::fs::{ensure_dir, file_size, write_atomic};

pub const COMPARISON_REPORT_FILE: &str = "comparison_report.json";
pub const SUMMARY_INDEX_FILE: &str = "index.md";
const SUMMARY_SUFFIX: &str = "_summary";

/// 写入批次报告 `<reports_dir>/<stage>_report.json`
pub async fn write_batch_report(report: &BatchReport, reports_dir: &Path) -> Result<PathBuf> {
    ensure_dir(reports_dir).await?;
    let path = reports_dir.join(format!("{}_report.json", report.stage.as_str()));

    let json = serde_json::to_string_pretty(report).context("序列化批次报告失败")?;
    write_atomic(&path, json.as_bytes()).await?;

    debug!("批次报告已写入: {}", path.display());
    Ok(path)
}

/// 按文档汇总各策略的输出状态
///
/// 文档集合是所有策略目录中出现过的文档名的并集，缺失的一侧记为
/// `exists = false, size = 0`，结果按文档名排序。
pub async fn build_comparison_report(markdown_dir: &Path) -> Result<Vec<ComparisonRecord>> {
    let mut records: BTreeMap<String, ComparisonRecord> = BTreeMap::new();

    for strategy in ExtractStrategy::ALL {
        let dir = markdown_dir.join(strategy.tag());
        for path in list_files(&dir, "md").await? {
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            let Some(base) = strategy.base_name(&stem) else {
                continue;
            };

            let size = file_size(&path).await.unwrap_or(0);
            records
                .entry(base.to_string())
                .or_insert_with(|| ComparisonRecord::new(base))
                .artifacts
                .insert(strategy, ArtifactInfo { exists: true, size });
        }
    }

    Ok(records.into_values().collect())
}

/// 写入 `<markdown_dir>/comparison_report.json`
pub async fn write_comparison_report(markdown_dir: &Path) -> Result<(PathBuf, usize)> {
    let records = build_comparison_report(markdown_dir).await?;

    ensure_dir(markdown_dir).await?;
    let path = markdown_dir.join(COMPARISON_REPORT_FILE);
    let json = serde_json::to_string_pretty(&records).context("序列化对比报告失败")?;
    write_atomic(&path, json.as_bytes()).await?;

    info!("📊 对比报告已写入: {} ({} 个文档)", path.display(), records.len());
    Ok((path, records.len()))
}

/// 生成摘要索引内容；没有摘要文件时返回 `None`
pub async fn build_summary_index(summaries_dir: &Path) -> Result<Option<String>> {
    let mut entries = Vec::new();

    for path in list_files(summaries_dir, "md").await? {
        let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
            continue;
        };
        if !stem.ends_with(SUMMARY_SUFFIX) {
            continue;
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("无法读取摘要: {}", path.display()))?;
        let title = summary_title(&content).unwrap_or_else(|| stem.clone());
        entries.push((title, file_name));
    }

    if entries.is_empty() {
        return Ok(None);
    }

    let mut out = String::from("# Paper Summaries Index\n\n");
    for (title, file_name) in entries {
        out.push_str(&format!("- [{}](./{})\n", title, file_name));
    }
    Ok(Some(out))
}

/// 写入 `<summaries_dir>/index.md`
pub async fn write_summary_index(summaries_dir: &Path) -> Result<Option<PathBuf>> {
    let Some(content) = build_summary_index(summaries_dir).await? else {
        info!("没有摘要文件，跳过索引生成");
        return Ok(None);
    };

    let path = summaries_dir.join(SUMMARY_INDEX_FILE);
    write_atomic(&path, content.as_bytes()).await?;
    info!("📑 摘要索引已写入: {}", path.display());
    Ok(Some(path))
}

/// 摘要标题：第一个非空行去掉 `#` 和空格
fn summary_title(content: &str) -> Option<String> {
    content
        .lines()
        .map(|line| line.trim_matches(|c: char| c == '#' || c.is_whitespace()))
        .find(|line| !line.is_empty())
        .map(str::to_string)
}
