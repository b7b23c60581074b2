use super::{InventoryService, RECENT_LIMIT, Tracked};
use crate::error::InventoryError;
use domain::{AlarmStatus, OltStatus, OntStatus};
use olt_storage::{
    AlarmFilter, AlarmRecord, AlarmStore, OltFilter, OltStore, OntFilter, OntRecord, OntStore,
};

const ENTITY: &str = "dashboard";

/// 设备数量统计；离线数为总数减在线数。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceCounts {
    pub total: u64,
    pub online: u64,
    pub offline: u64,
}

impl DeviceCounts {
    fn from_statuses<S: PartialEq>(statuses: impl Iterator<Item = S>, online: S) -> Self {
        let mut counts = Self::default();
        for status in statuses {
            counts.total += 1;
            if status == online {
                counts.online += 1;
            }
        }
        counts.offline = counts.total - counts.online;
        counts
    }
}

/// 仪表盘汇总。
#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub olts: DeviceCounts,
    pub onts: DeviceCounts,
    pub active_alarms: u64,
    pub recent_alarms: Vec<AlarmRecord>,
    pub recent_onts: Vec<OntRecord>,
}

impl InventoryService {
    /// 设备计数、活动告警数，以及最近的告警与 ONT 各 [`RECENT_LIMIT`] 条。
    pub async fn dashboard(&self) -> Result<DashboardSummary, InventoryError> {
        let (olt_filter, ont_filter, alarm_filter) =
            (OltFilter::default(), OntFilter::default(), AlarmFilter::default());
        let (olts, onts, alarms) = futures_util::try_join!(
            self.store.list_olts(&olt_filter),
            self.store.list_onts(&ont_filter),
            self.store.list_alarms(&alarm_filter),
        )
        .tracked(ENTITY, "get")?;

        let active_alarms = alarms
            .iter()
            .filter(|alarm| alarm.status == AlarmStatus::Active)
            .count() as u64;
        Ok(DashboardSummary {
            olts: DeviceCounts::from_statuses(olts.iter().map(|olt| olt.status), OltStatus::Online),
            onts: DeviceCounts::from_statuses(onts.iter().map(|ont| ont.status), OntStatus::Online),
            active_alarms,
            // 列表本身已按创建时间倒序
            recent_alarms: alarms.into_iter().take(RECENT_LIMIT).collect(),
            recent_onts: onts.into_iter().take(RECENT_LIMIT).collect(),
        })
    }
}
