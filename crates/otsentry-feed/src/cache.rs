use crate::error::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// 已处理 CVE ID 的持久化缓存，是去重的唯一依据。
///
/// 磁盘格式为扁平 JSON 字符串数组，保持插入顺序。进程生命周期内只追加；
/// 缓存文件缺失或损坏按空缓存处理，不视为致命错误。
pub struct SeenCache {
    path: PathBuf,
    ids: Vec<String>,
    index: HashSet<String>,
}

impl SeenCache {
    /// 从磁盘加载缓存。文件不存在或内容损坏时返回空缓存。
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ids: Vec<String> = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(ids) => ids,
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Corrupt seen-id cache, starting empty");
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No seen-id cache yet, starting empty");
                Vec::new()
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to read seen-id cache, starting empty");
                Vec::new()
            }
        };

        if !ids.is_empty() {
            tracing::info!(count = ids.len(), "Loaded cached CVE IDs");
        }

        let index = ids.iter().cloned().collect();
        Self { path, ids, index }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    /// 追加一个 ID。重复插入返回 false。
    pub fn insert(&mut self, id: &str) -> bool {
        if !self.index.insert(id.to_string()) {
            return false;
        }
        self.ids.push(id.to_string());
        true
    }

    /// 持久化到磁盘，按需创建父目录。
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.ids)?;
        std::fs::write(&self.path, content)?;
        tracing::debug!(count = self.ids.len(), path = %self.path.display(), "Seen-id cache saved");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SeenCache::load(dir.path().join("cache.json"));
        assert!(cache.is_empty());
    }

    #[test]
    fn corrupt_file_yields_empty_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{not json").unwrap();
        let cache = SeenCache::load(&path);
        assert!(cache.is_empty());
    }

    #[test]
    fn save_and_reload_preserves_ids_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/cache.json");

        let mut cache = SeenCache::load(&path);
        assert!(cache.insert("CVE-2026-0001"));
        assert!(cache.insert("CVE-2026-0002"));
        assert!(!cache.insert("CVE-2026-0001"));
        cache.save().unwrap();

        let reloaded = SeenCache::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("CVE-2026-0001"));
        assert!(reloaded.contains("CVE-2026-0002"));
    }

    #[test]
    fn cache_grows_without_duplicates_across_cycles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        // Three disjoint fetch cycles of 2, 3, and 1 new ids
        let cycles: [&[&str]; 3] = [
            &["CVE-1", "CVE-2"],
            &["CVE-3", "CVE-4", "CVE-5"],
            &["CVE-6"],
        ];

        for batch in cycles {
            let mut cache = SeenCache::load(&path);
            for id in batch {
                cache.insert(id);
            }
            cache.save().unwrap();
        }

        let cache = SeenCache::load(&path);
        assert_eq!(cache.len(), 6);
        for id in ["CVE-1", "CVE-2", "CVE-3", "CVE-4", "CVE-5", "CVE-6"] {
            assert!(cache.contains(id));
        }
    }
}
