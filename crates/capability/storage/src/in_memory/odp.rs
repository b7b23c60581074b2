//! ODP 内存存储实现
//!
//! 名称唯一；`olt_id` 可为空，非空时必须指向已存在的 OLT。

use super::{InMemoryStore, Tables, sort_newest_first};
use crate::error::StorageError;
use crate::models::{OdpFilter, OdpRecord, OdpUpdate};
use crate::traits::OdpStore;
use domain::now_epoch_ms;

fn ensure_olt(tables: &Tables, olt_id: Option<&str>) -> Result<(), StorageError> {
    match olt_id {
        Some(olt_id) if !tables.olts.contains_key(olt_id) => {
            Err(StorageError::foreign_key("OLT not found"))
        }
        _ => Ok(()),
    }
}

#[async_trait::async_trait]
impl OdpStore for InMemoryStore {
    async fn list_odps(&self, filter: &OdpFilter) -> Result<Vec<OdpRecord>, StorageError> {
        let tables = self.read()?;
        let mut items: Vec<OdpRecord> = tables
            .odps
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        sort_newest_first(&mut items, |item| (item.created_at_ms, item.odp_id.as_str()));
        Ok(items)
    }

    async fn find_odp(&self, odp_id: &str) -> Result<Option<OdpRecord>, StorageError> {
        Ok(self.read()?.odps.get(odp_id).cloned())
    }

    async fn create_odp(&self, record: OdpRecord) -> Result<OdpRecord, StorageError> {
        let mut tables = self.write()?;
        ensure_olt(&tables, record.olt_id.as_deref())?;
        if tables.odps.contains_key(&record.odp_id) {
            return Err(StorageError::conflict("odp exists"));
        }
        if tables.odps.values().any(|item| item.name == record.name) {
            return Err(StorageError::conflict("odp name already in use"));
        }
        tables.odps.insert(record.odp_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_odp(
        &self,
        odp_id: &str,
        update: OdpUpdate,
    ) -> Result<Option<OdpRecord>, StorageError> {
        let mut tables = self.write()?;
        if !tables.odps.contains_key(odp_id) {
            return Ok(None);
        }
        ensure_olt(&tables, update.olt_id.as_deref())?;
        if tables
            .odps
            .values()
            .any(|item| item.odp_id != odp_id && item.name == update.name)
        {
            return Err(StorageError::conflict("odp name already in use"));
        }
        let Some(odp) = tables.odps.get_mut(odp_id) else {
            return Ok(None);
        };
        odp.apply(update, now_epoch_ms());
        Ok(Some(odp.clone()))
    }

    async fn delete_odp(&self, odp_id: &str) -> Result<bool, StorageError> {
        Ok(self.write()?.odps.remove(odp_id).is_some())
    }
}
