use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;

use crate::models::ExtractStrategy;

/// 某个策略下的输出文件状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArtifactInfo {
    pub exists: bool,
    pub size: u64,
}

/// 跨策略对比记录，以文档名为键
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRecord {
    pub filename: String,
    pub artifacts: BTreeMap<ExtractStrategy, ArtifactInfo>,
}

impl ComparisonRecord {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            artifacts: BTreeMap::new(),
        }
    }

    pub fn artifact(&self, strategy: ExtractStrategy) -> ArtifactInfo {
        self.artifacts.get(&strategy).copied().unwrap_or_default()
    }
}

/// 平铺为 `filename, <tag>_exists..., <tag>_size...`
impl Serialize for ComparisonRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + ExtractStrategy::ALL.len() * 2))?;
        map.serialize_entry("filename", &self.filename)?;
        for strategy in ExtractStrategy::ALL {
            map.serialize_entry(&format!("{}_exists", strategy.tag()), &self.artifact(strategy).exists)?;
        }
        for strategy in ExtractStrategy::ALL {
            map.serialize_entry(&format!("{}_size", strategy.tag()), &self.artifact(strategy).size)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_serialization() {
        let mut record = ComparisonRecord::new("Paper");
        record.artifacts.insert(
            ExtractStrategy::Structural,
            ArtifactInfo {
                exists: true,
                size: 42,
            },
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["filename"], "Paper");
        assert_eq!(json["structural_exists"], true);
        assert_eq!(json["structural_size"], 42);
        assert_eq!(json["ocr_exists"], false);
        assert_eq!(json["ocr_size"], 0);
    }
}
