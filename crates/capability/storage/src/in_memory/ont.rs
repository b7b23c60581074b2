//! ONT 内存存储实现
//!
//! 序列号唯一；`olt_id` 必须指向已存在的 OLT。

use super::{InMemoryStore, sort_newest_first};
use crate::error::StorageError;
use crate::models::{OntFilter, OntRecord, OntUpdate};
use crate::traits::OntStore;
use domain::now_epoch_ms;

#[async_trait::async_trait]
impl OntStore for InMemoryStore {
    async fn list_onts(&self, filter: &OntFilter) -> Result<Vec<OntRecord>, StorageError> {
        let tables = self.read()?;
        let mut items: Vec<OntRecord> = tables
            .onts
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        sort_newest_first(&mut items, |item| (item.created_at_ms, item.ont_id.as_str()));
        Ok(items)
    }

    async fn find_ont(&self, ont_id: &str) -> Result<Option<OntRecord>, StorageError> {
        Ok(self.read()?.onts.get(ont_id).cloned())
    }

    async fn create_ont(&self, record: OntRecord) -> Result<OntRecord, StorageError> {
        let mut tables = self.write()?;
        if !tables.olts.contains_key(&record.olt_id) {
            return Err(StorageError::foreign_key("OLT not found"));
        }
        if tables.onts.contains_key(&record.ont_id) {
            return Err(StorageError::conflict("ont exists"));
        }
        if tables
            .onts
            .values()
            .any(|item| item.serial_number == record.serial_number)
        {
            return Err(StorageError::conflict("serial number already registered"));
        }
        tables.onts.insert(record.ont_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_ont(
        &self,
        ont_id: &str,
        update: OntUpdate,
    ) -> Result<Option<OntRecord>, StorageError> {
        let mut tables = self.write()?;
        if !tables.onts.contains_key(ont_id) {
            return Ok(None);
        }
        if !tables.olts.contains_key(&update.olt_id) {
            return Err(StorageError::foreign_key("OLT not found"));
        }
        if tables
            .onts
            .values()
            .any(|item| item.ont_id != ont_id && item.serial_number == update.serial_number)
        {
            return Err(StorageError::conflict("serial number already registered"));
        }
        let Some(ont) = tables.onts.get_mut(ont_id) else {
            return Ok(None);
        };
        ont.apply(update, now_epoch_ms());
        Ok(Some(ont.clone()))
    }

    async fn delete_ont(&self, ont_id: &str) -> Result<bool, StorageError> {
        Ok(self.write()?.onts.remove(ont_id).is_some())
    }
}
