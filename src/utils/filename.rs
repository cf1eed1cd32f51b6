//! 文件名工具
//!
//! 标题 → 安全文件名 的推导是各阶段之间的连接键：下载阶段写出的文件名
//! 必须能被提取阶段找到，所以这里的规则不能随意修改。

use url::Url;

/// 文件名最大字符数
pub const MAX_FILENAME_CHARS: usize = 100;

/// 由标题生成安全文件名
///
/// 只保留字母数字、下划线、连字符和空白，空白折叠为单个下划线，最多 100 个字符。
pub fn sanitize_filename(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();
    let joined = kept.split_whitespace().collect::<Vec<_>>().join("_");
    joined.chars().take(MAX_FILENAME_CHARS).collect()
}

/// 为重名的输出键追加序号后缀，保证总长度不超过上限
pub fn with_collision_suffix(key: &str, n: usize) -> String {
    let suffix = format!("_{}", n);
    let keep = MAX_FILENAME_CHARS.saturating_sub(suffix.chars().count());
    let base: String = key.chars().take(keep).collect();
    format!("{}{}", base, suffix)
}

/// 从 URL 路径中取扩展名（不含点），取不到时使用默认值
///
/// 只接受 1–8 个 ASCII 字母数字，避免把查询串或奇怪的路径片段带进文件名。
/// 扩展名统一转为小写，`a.pdf` 和 `b.PDF` 才会被视为同一种输出。
pub fn extension_from_url(url: &str, default: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return default.to_string();
    };
    let last_segment = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();

    match last_segment.rsplit_once('.') {
        Some((stem, ext))
            if !stem.trim_start_matches('.').is_empty()
                && (1..=8).contains(&ext.len())
                && ext.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            ext.to_ascii_lowercase()
        }
        _ => default.to_string(),
    }
}

/// 检查引用是否可以下载：不是 N/A 占位符，且是 http/https 链接
pub fn validate_reference(title: &str, url: &str) -> Result<(), String> {
    if title.trim() == "N/A" {
        return Err("标题为 N/A".to_string());
    }
    if url.trim() == "N/A" {
        return Err("链接为 N/A".to_string());
    }
    match Url::parse(url.trim()) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        Ok(parsed) => Err(format!("不支持的协议: {}", parsed.scheme())),
        Err(e) => Err(format!("链接格式错误: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_examples() {
        assert_eq!(
            sanitize_filename("Attention Is All You Need!"),
            "Attention_Is_All_You_Need"
        );
        assert_eq!(sanitize_filename(" a  b "), "a_b");
        assert_eq!(sanitize_filename("BERT: Pre-training (v2)"), "BERT_Pre-training_v2");
        assert_eq!(sanitize_filename("大模型 安全"), "大模型_安全");
    }

    #[test]
    fn test_sanitize_truncates_to_limit() {
        let title = "x".repeat(250);
        assert_eq!(sanitize_filename(&title).chars().count(), 100);

        let exact = "y".repeat(100);
        assert_eq!(sanitize_filename(&exact), exact);
    }

    #[test]
    fn test_sanitize_is_deterministic() {
        let title = "Large Language Models for Security: A Survey";
        assert_eq!(sanitize_filename(title), sanitize_filename(title));
    }

    #[test]
    fn test_collision_suffix_stays_within_limit() {
        assert_eq!(with_collision_suffix("paper", 2), "paper_2");
        let long = "z".repeat(100);
        let key = with_collision_suffix(&long, 12);
        assert_eq!(key.chars().count(), 100);
        assert!(key.ends_with("_12"));
    }

    #[test]
    fn test_extension_from_url() {
        assert_eq!(extension_from_url("https://arxiv.org/pdf/x.pdf", "pdf"), "pdf");
        assert_eq!(extension_from_url("https://example.org/paper.PS?dl=1", "pdf"), "ps");
        assert_eq!(extension_from_url("https://x.org/b.PDF", "pdf"), "pdf");
        assert_eq!(extension_from_url("https://arxiv.org/abs/1706", "pdf"), "pdf");
        assert_eq!(extension_from_url("https://example.org/", "pdf"), "pdf");
        assert_eq!(extension_from_url("https://example.org/.hidden", "pdf"), "pdf");
        assert_eq!(extension_from_url("https://example.org/a.b%20c", "pdf"), "pdf");
        assert_eq!(extension_from_url("not a url", "pdf"), "pdf");
    }

    #[test]
    fn test_validate_reference() {
        assert!(validate_reference("Paper", "https://example.org/a.pdf").is_ok());
        assert!(validate_reference("Paper", "http://example.org/a.pdf").is_ok());
        assert!(validate_reference("Paper", "N/A").is_err());
        assert!(validate_reference("N/A", "https://example.org/a.pdf").is_err());
        assert!(validate_reference("Paper", "ftp://example.org/a.pdf").is_err());
        assert!(validate_reference("Paper", "example.org/a.pdf").is_err());
    }
}
