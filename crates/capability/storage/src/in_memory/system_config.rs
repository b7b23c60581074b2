//! 系统配置内存存储实现

use super::InMemoryStore;
use crate::error::StorageError;
use crate::models::SystemConfigRecord;
use crate::traits::SystemConfigStore;

#[async_trait::async_trait]
impl SystemConfigStore for InMemoryStore {
    async fn list_configs(&self) -> Result<Vec<SystemConfigRecord>, StorageError> {
        let tables = self.read()?;
        let mut items: Vec<SystemConfigRecord> = tables.configs.values().cloned().collect();
        items.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(items)
    }

    async fn find_config(&self, key: &str) -> Result<Option<SystemConfigRecord>, StorageError> {
        Ok(self.read()?.configs.get(key).cloned())
    }

    async fn upsert_config(
        &self,
        record: SystemConfigRecord,
    ) -> Result<SystemConfigRecord, StorageError> {
        let mut tables = self.write()?;
        let stored = tables
            .configs
            .entry(record.key.clone())
            .and_modify(|existing| {
                existing.value = record.value.clone();
                existing.updated_at_ms = record.updated_at_ms;
            })
            .or_insert_with(|| record.clone());
        Ok(stored.clone())
    }
}
