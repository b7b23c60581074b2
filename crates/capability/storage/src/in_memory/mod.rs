//! 内存存储实现模块
//!
//! 用于本地演示和测试。
//!
//! 所有表放在同一把 `RwLock` 下，单个操作（包括 OLT 级联删除）天然原子。
//! 各实体的 Trait 实现分布在子模块中：
//! - UserStore: user.rs
//! - OltStore: olt.rs
//! - OntStore: ont.rs
//! - OdpStore: odp.rs
//! - CableRouteStore: cable_route.rs
//! - AlarmStore: alarm.rs
//! - SystemConfigStore: system_config.rs

mod alarm;
mod cable_route;
mod odp;
mod olt;
mod ont;
mod system_config;
mod user;

use crate::error::StorageError;
use crate::models::{
    AlarmRecord, CableRouteRecord, OdpRecord, OltRecord, OntRecord, SystemConfigRecord,
    UserRecord,
};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
pub(crate) struct Tables {
    pub users: HashMap<String, UserRecord>,
    pub olts: HashMap<String, OltRecord>,
    pub onts: HashMap<String, OntRecord>,
    pub odps: HashMap<String, OdpRecord>,
    pub cable_routes: HashMap<String, CableRouteRecord>,
    pub alarms: HashMap<String, AlarmRecord>,
    pub configs: HashMap<String, SystemConfigRecord>,
}

/// 内存存储
///
/// 使用 RwLock + HashMap 提供线程安全的内存存储。
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StorageError> {
        self.tables
            .read()
            .map_err(|_| StorageError::new("lock failed"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StorageError> {
        self.tables
            .write()
            .map_err(|_| StorageError::new("lock failed"))
    }
}

/// 名称升序，名称相同按 id 保证稳定。
fn sort_by_name<T>(items: &mut [T], key: impl Fn(&T) -> (&str, &str)) {
    items.sort_by(|a, b| key(a).cmp(&key(b)));
}

/// 创建时间倒序，时间相同按 id 保证稳定。
fn sort_newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (i64, &str)) {
    items.sort_by(|a, b| {
        let (a_ts, a_id) = key(a);
        let (b_ts, b_id) = key(b);
        b_ts.cmp(&a_ts).then_with(|| a_id.cmp(b_id))
    });
}
