//! 文件写入工具
//!
//! 所有产物都先写到同目录下的 `.part` 临时文件，再重命名到目标路径，
//! 进程中途被杀时不会留下截断的最终文件。

use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::{PipelineError, PipelineResult};

/// 目标路径对应的临时文件路径
pub fn part_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    target.with_file_name(name)
}

/// 原子写入文件
pub async fn write_atomic(target: &Path, content: &[u8]) -> PipelineResult<()> {
    let tmp = part_path(target);
    fs::write(&tmp, content)
        .await
        .map_err(|e| PipelineError::io(&tmp, e))?;
    commit_part(&tmp, target).await
}

/// 把写完的临时文件移动到目标路径
pub async fn commit_part(tmp: &Path, target: &Path) -> PipelineResult<()> {
    if let Err(e) = fs::rename(tmp, target).await {
        let _ = fs::remove_file(tmp).await;
        return Err(PipelineError::io(target, e));
    }
    Ok(())
}

/// 非空内容才写入；空白内容不产生任何文件
pub async fn save_non_empty(target: &Path, content: &str, what: &str) -> PipelineResult<PathBuf> {
    if content.trim().is_empty() {
        return Err(PipelineError::empty_output(what));
    }
    write_atomic(target, content.as_bytes()).await?;
    Ok(target.to_path_buf())
}

/// 文件大小；不存在时返回 None
pub async fn file_size(path: &Path) -> Option<u64> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Some(meta.len()),
        _ => None,
    }
}

/// 创建目录（含父目录）
pub async fn ensure_dir(dir: &Path) -> PipelineResult<()> {
    fs::create_dir_all(dir)
        .await
        .map_err(|e| PipelineError::io(dir, e))
}
