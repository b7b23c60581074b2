//! OLT 内存存储实现
//!
//! IP 地址唯一；删除时按策略处理仍引用它的 ONT/ODP。

use super::{InMemoryStore, Tables, sort_by_name};
use crate::error::StorageError;
use crate::models::{OltDependents, OltFilter, OltRecord, OltUpdate};
use crate::traits::OltStore;
use domain::{DeletePolicy, now_epoch_ms};

fn dependents(tables: &Tables, olt_id: &str) -> OltDependents {
    OltDependents {
        onts: tables
            .onts
            .values()
            .filter(|ont| ont.olt_id == olt_id)
            .count() as u64,
        odps: tables
            .odps
            .values()
            .filter(|odp| odp.olt_id.as_deref() == Some(olt_id))
            .count() as u64,
    }
}

#[async_trait::async_trait]
impl OltStore for InMemoryStore {
    async fn list_olts(&self, filter: &OltFilter) -> Result<Vec<OltRecord>, StorageError> {
        let tables = self.read()?;
        let mut items: Vec<OltRecord> = tables
            .olts
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        sort_by_name(&mut items, |item| (item.name.as_str(), item.olt_id.as_str()));
        Ok(items)
    }

    async fn find_olt(&self, olt_id: &str) -> Result<Option<OltRecord>, StorageError> {
        Ok(self.read()?.olts.get(olt_id).cloned())
    }

    async fn create_olt(&self, record: OltRecord) -> Result<OltRecord, StorageError> {
        let mut tables = self.write()?;
        if tables.olts.contains_key(&record.olt_id) {
            return Err(StorageError::conflict("olt exists"));
        }
        if tables
            .olts
            .values()
            .any(|item| item.ip_address == record.ip_address)
        {
            return Err(StorageError::conflict("ip address already in use"));
        }
        tables.olts.insert(record.olt_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_olt(
        &self,
        olt_id: &str,
        update: OltUpdate,
    ) -> Result<Option<OltRecord>, StorageError> {
        let mut tables = self.write()?;
        if !tables.olts.contains_key(olt_id) {
            return Ok(None);
        }
        if tables
            .olts
            .values()
            .any(|item| item.olt_id != olt_id && item.ip_address == update.ip_address)
        {
            return Err(StorageError::conflict("ip address already in use"));
        }
        let Some(olt) = tables.olts.get_mut(olt_id) else {
            return Ok(None);
        };
        olt.apply(update, now_epoch_ms());
        Ok(Some(olt.clone()))
    }

    async fn count_olt_dependents(&self, olt_id: &str) -> Result<OltDependents, StorageError> {
        Ok(dependents(&*self.read()?, olt_id))
    }

    async fn delete_olt(&self, olt_id: &str, policy: DeletePolicy) -> Result<bool, StorageError> {
        let mut tables = self.write()?;
        if !tables.olts.contains_key(olt_id) {
            return Ok(false);
        }
        let refs = dependents(&tables, olt_id);
        match policy {
            DeletePolicy::Restrict if !refs.is_empty() => {
                return Err(StorageError::conflict(format!(
                    "olt still referenced by {} ONT(s) and {} ODP(s)",
                    refs.onts, refs.odps
                )));
            }
            DeletePolicy::Restrict => {}
            DeletePolicy::Cascade => {
                tables.onts.retain(|_, ont| ont.olt_id != olt_id);
                tables
                    .odps
                    .retain(|_, odp| odp.olt_id.as_deref() != Some(olt_id));
            }
        }
        tables.olts.remove(olt_id);
        Ok(true)
    }
}
