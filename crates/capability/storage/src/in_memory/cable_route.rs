//! 光缆路由内存存储实现

use super::{InMemoryStore, sort_by_name};
use crate::error::StorageError;
use crate::models::{CableRouteFilter, CableRouteRecord, CableRouteUpdate};
use crate::traits::CableRouteStore;
use domain::now_epoch_ms;

#[async_trait::async_trait]
impl CableRouteStore for InMemoryStore {
    async fn list_cable_routes(
        &self,
        filter: &CableRouteFilter,
    ) -> Result<Vec<CableRouteRecord>, StorageError> {
        let tables = self.read()?;
        let mut items: Vec<CableRouteRecord> = tables
            .cable_routes
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        sort_by_name(&mut items, |item| (item.name.as_str(), item.route_id.as_str()));
        Ok(items)
    }

    async fn find_cable_route(
        &self,
        route_id: &str,
    ) -> Result<Option<CableRouteRecord>, StorageError> {
        Ok(self.read()?.cable_routes.get(route_id).cloned())
    }

    async fn create_cable_route(
        &self,
        record: CableRouteRecord,
    ) -> Result<CableRouteRecord, StorageError> {
        let mut tables = self.write()?;
        if tables.cable_routes.contains_key(&record.route_id) {
            return Err(StorageError::conflict("cable route exists"));
        }
        if tables
            .cable_routes
            .values()
            .any(|item| item.name == record.name)
        {
            return Err(StorageError::conflict("cable route name already in use"));
        }
        tables
            .cable_routes
            .insert(record.route_id.clone(), record.clone());
        Ok(record)
    }

    async fn update_cable_route(
        &self,
        route_id: &str,
        update: CableRouteUpdate,
    ) -> Result<Option<CableRouteRecord>, StorageError> {
        let mut tables = self.write()?;
        if !tables.cable_routes.contains_key(route_id) {
            return Ok(None);
        }
        if tables
            .cable_routes
            .values()
            .any(|item| item.route_id != route_id && item.name == update.name)
        {
            return Err(StorageError::conflict("cable route name already in use"));
        }
        let Some(route) = tables.cable_routes.get_mut(route_id) else {
            return Ok(None);
        };
        route.apply(update, now_epoch_ms());
        Ok(Some(route.clone()))
    }

    async fn delete_cable_route(&self, route_id: &str) -> Result<bool, StorageError> {
        Ok(self.write()?.cable_routes.remove(route_id).is_some())
    }
}
