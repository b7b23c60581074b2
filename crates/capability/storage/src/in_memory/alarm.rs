//! 告警内存存储实现
//!
//! 告警对设备是弱引用，不做外键校验。

use super::{InMemoryStore, sort_newest_first};
use crate::error::StorageError;
use crate::models::{AlarmFilter, AlarmRecord, AlarmUpdate};
use crate::traits::AlarmStore;
use domain::{AlarmStatus, now_epoch_ms};

#[async_trait::async_trait]
impl AlarmStore for InMemoryStore {
    async fn list_alarms(&self, filter: &AlarmFilter) -> Result<Vec<AlarmRecord>, StorageError> {
        let tables = self.read()?;
        let mut items: Vec<AlarmRecord> = tables
            .alarms
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        sort_newest_first(&mut items, |item| {
            (item.created_at_ms, item.alarm_id.as_str())
        });
        Ok(items)
    }

    async fn find_alarm(&self, alarm_id: &str) -> Result<Option<AlarmRecord>, StorageError> {
        Ok(self.read()?.alarms.get(alarm_id).cloned())
    }

    async fn create_alarm(&self, record: AlarmRecord) -> Result<AlarmRecord, StorageError> {
        let mut tables = self.write()?;
        if tables.alarms.contains_key(&record.alarm_id) {
            return Err(StorageError::conflict("alarm exists"));
        }
        tables.alarms.insert(record.alarm_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_alarm(
        &self,
        alarm_id: &str,
        update: AlarmUpdate,
    ) -> Result<Option<AlarmRecord>, StorageError> {
        let mut tables = self.write()?;
        let Some(alarm) = tables.alarms.get_mut(alarm_id) else {
            return Ok(None);
        };
        alarm.apply(update, now_epoch_ms());
        Ok(Some(alarm.clone()))
    }

    async fn resolve_alarm(
        &self,
        alarm_id: &str,
        at_ms: i64,
    ) -> Result<Option<AlarmRecord>, StorageError> {
        let mut tables = self.write()?;
        let Some(alarm) = tables.alarms.get_mut(alarm_id) else {
            return Ok(None);
        };
        if alarm.status != AlarmStatus::Resolved {
            alarm.status = AlarmStatus::Resolved;
            alarm.resolved_at_ms = Some(at_ms);
            alarm.updated_at_ms = at_ms;
        }
        Ok(Some(alarm.clone()))
    }

    async fn delete_alarm(&self, alarm_id: &str) -> Result<bool, StorageError> {
        Ok(self.write()?.alarms.remove(alarm_id).is_some())
    }
}
