use super::{InventoryService, Tracked};
use crate::error::{FieldError, InventoryError};
use api_contract::{SettingsDto, SettingsPayload};
use domain::{SessionContext, now_epoch_ms};
use futures_util::future::join_all;
use olt_storage::{SystemConfigRecord, SystemConfigStore};
use olt_telemetry::record_update;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{info, warn};

const ENTITY: &str = "settings";

/// 配置值统一以字符串保存：数字、布尔转成文本，其余类型拒绝。
fn stringify(key: &str, value: &Value) -> Result<String, FieldError> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        _ => Err(FieldError::new(
            key,
            format!("{key} must be a string, number or boolean"),
        )),
    }
}

fn settings_records(payload: &SettingsPayload) -> Result<Vec<SystemConfigRecord>, InventoryError> {
    let now_ms = now_epoch_ms();
    let mut errors = Vec::new();
    let mut records = Vec::with_capacity(payload.len());
    let mut seen = BTreeSet::new();
    for (key, value) in payload {
        let key = key.trim();
        if key.is_empty() {
            errors.push(FieldError::new("key", "setting key must not be empty"));
            continue;
        }
        // 去空格后重名的键会变成同一行的并发写入
        if !seen.insert(key) {
            errors.push(FieldError::new(key, format!("duplicate setting key {key}")));
            continue;
        }
        match stringify(key, value) {
            Ok(value) => records.push(SystemConfigRecord {
                key: key.to_string(),
                value,
                description: format!("Configuration for {key}"),
                updated_at_ms: now_ms,
            }),
            Err(err) => errors.push(err),
        }
    }
    if errors.is_empty() {
        Ok(records)
    } else {
        Err(InventoryError::Validation(errors))
    }
}

impl InventoryService {
    /// 全部配置的 key → value 映射。
    pub async fn get_settings(&self) -> Result<SettingsDto, InventoryError> {
        let records = self.store.list_configs().await.tracked(ENTITY, "get")?;
        Ok(records
            .into_iter()
            .map(|record| (record.key, record.value))
            .collect())
    }

    /// 批量保存配置。
    ///
    /// 先校验全部值，任一无效则不写入；之后每个键并发独立 upsert，
    /// 键之间没有原子性，只报告整体结果。返回写入的键数量。
    pub async fn save_settings(
        &self,
        ctx: &SessionContext,
        payload: SettingsPayload,
    ) -> Result<usize, InventoryError> {
        let records = settings_records(&payload).tracked(ENTITY, "save")?;
        let total = records.len();
        let results = join_all(
            records
                .into_iter()
                .map(|record| self.store.upsert_config(record)),
        )
        .await;

        let mut saved = 0;
        let mut first_error = None;
        for result in results {
            match result {
                Ok(_) => saved += 1,
                Err(err) => {
                    warn!(
                        target: "olt.inventory",
                        entity = ENTITY,
                        error = %err,
                        "setting_upsert_failed"
                    );
                    first_error.get_or_insert(err);
                }
            }
        }
        if let Some(err) = first_error {
            return Err(InventoryError::Internal(format!(
                "failed to save settings ({saved} of {total} saved): {err}"
            )))
            .tracked(ENTITY, "save");
        }
        record_update();
        info!(
            target: "olt.inventory",
            entity = ENTITY,
            user_id = %ctx.user_id,
            saved,
            "settings_saved"
        );
        Ok(saved)
    }
}
