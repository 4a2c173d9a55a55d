use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entities::{person_entity as persons, prize_entity as prizes};
use crate::error::{AppError, AppResult};
use crate::services::{PersonPool, PrizeRegistry};

/// 持久化快照：人员、奖项及自增ID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub persons: Vec<persons::Model>,
    pub prizes: Vec<prizes::Model>,
    pub next_person_id: i64,
}

impl Snapshot {
    pub fn capture(pool: &PersonPool, registry: &PrizeRegistry) -> Self {
        Self {
            persons: pool.persons().to_vec(),
            prizes: registry.prizes().to_vec(),
            next_person_id: pool.next_id(),
        }
    }

    /// 还原为奖池与注册表，违反不变量的快照会被拒绝
    pub fn restore(self) -> AppResult<(PersonPool, PrizeRegistry)> {
        let pool = PersonPool::from_parts(self.persons, self.next_person_id)?;
        let registry = PrizeRegistry::from_parts(self.prizes)?;
        Ok((pool, registry))
    }
}

/// 基于 JSON 文件的快照存储
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取快照，文件不存在时返回 None
    pub async fn load(&self) -> AppResult<Option<Snapshot>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                let snapshot = serde_json::from_slice(&bytes).map_err(|e| {
                    AppError::ConfigError(format!(
                        "Invalid snapshot {}: {e}",
                        self.path.display()
                    ))
                })?;
                Ok(Some(snapshot))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 先写临时文件再重命名，避免写到一半的文件
    pub async fn save(&self, snapshot: &Snapshot) -> AppResult<()> {
        let bytes = serde_json::to_vec_pretty(snapshot)?;
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(dir).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
