//! 下载服务 - 业务能力层
//!
//! 只负责"把一个 URL 存成一个文件"，不关心目录、批次和跳过逻辑

use reqwest::{Client, StatusCode};
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::utils::fs::{commit_part, part_path};

/// 下载服务
///
/// 职责：
/// - 持有共享的 HTTP 客户端（连接池）
/// - 每次请求带固定的总超时
/// - 只有 200 视为成功
pub struct DownloadService {
    client: Client,
}

impl DownloadService {
    /// 创建新的下载服务
    pub fn new(timeout: Duration) -> PipelineResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("paper-pipeline/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PipelineError::network("<client>", e))?;
        Ok(Self { client })
    }

    /// 下载 `url` 到 `target`，返回写入的字节数
    ///
    /// 响应体边读边写到 `<target>.part`，完整写完后才重命名为目标文件。
    pub async fn fetch_to(&self, url: &str, target: &Path) -> PipelineResult<u64> {
        debug!("开始下载: {}", url);

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::network(url, e))?;

        if response.status() != StatusCode::OK {
            return Err(PipelineError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let tmp = part_path(target);
        let mut file = File::create(&tmp)
            .await
            .map_err(|e| PipelineError::io(&tmp, e))?;

        let written = match stream_body(&mut response, &mut file, url, &tmp).await {
            Ok(written) => written,
            Err(e) => {
                drop(file);
                let _ = tokio::fs::remove_file(&tmp).await;
                return Err(e);
            }
        };
        drop(file);

        commit_part(&tmp, target).await?;
        debug!("下载完成: {} ({} 字节)", target.display(), written);
        Ok(written)
    }
}

async fn stream_body(
    response: &mut reqwest::Response,
    file: &mut File,
    url: &str,
    tmp: &Path,
) -> PipelineResult<u64> {
    let mut written = 0u64;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| PipelineError::network(url, e))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| PipelineError::io(tmp, e))?;
        written += chunk.len() as u64;
    }
    file.flush().await.map_err(|e| PipelineError::io(tmp, e))?;
    Ok(written)
}
