use serde::{Deserialize, Serialize};

/// 文献检索返回的一条记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Publication {
    /// 作者列表的显示形式，没有作者时为 `N/A`
    pub fn authors_display(&self) -> String {
        if self.authors.is_empty() {
            "N/A".to_string()
        } else {
            self.authors.join(", ")
        }
    }
}
