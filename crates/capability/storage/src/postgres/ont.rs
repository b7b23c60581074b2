//! Postgres ONT 存储实现

use super::{PgStore, parse_tag};
use crate::error::StorageError;
use crate::models::{OntFilter, OntRecord, OntUpdate};
use crate::traits::OntStore;
use domain::now_epoch_ms;
use sqlx::Row;
use sqlx::postgres::PgRow;

const ONT_COLUMNS: &str = "ont_id, serial_number, mac_address, olt_id, port, status, \
     signal_strength, rx_power, tx_power, distance, customer_name, customer_phone, customer_email, \
     address, service_package, install_date, notes, created_at_ms, updated_at_ms";

fn ont_from_row(row: &PgRow) -> Result<OntRecord, StorageError> {
    let status: String = row.try_get("status")?;
    Ok(OntRecord {
        ont_id: row.try_get("ont_id")?,
        serial_number: row.try_get("serial_number")?,
        mac_address: row.try_get("mac_address")?,
        olt_id: row.try_get("olt_id")?,
        port: row.try_get("port")?,
        status: parse_tag(&status)?,
        signal_strength: row.try_get("signal_strength")?,
        rx_power: row.try_get("rx_power")?,
        tx_power: row.try_get("tx_power")?,
        distance: row.try_get("distance")?,
        customer_name: row.try_get("customer_name")?,
        customer_phone: row.try_get("customer_phone")?,
        customer_email: row.try_get("customer_email")?,
        address: row.try_get("address")?,
        service_package: row.try_get("service_package")?,
        install_date: row.try_get("install_date")?,
        notes: row.try_get("notes")?,
        created_at_ms: row.try_get("created_at_ms")?,
        updated_at_ms: row.try_get("updated_at_ms")?,
    })
}

#[async_trait::async_trait]
impl OntStore for PgStore {
    async fn list_onts(&self, filter: &OntFilter) -> Result<Vec<OntRecord>, StorageError> {
        let sql = format!(
            "select {ONT_COLUMNS} from onts \
             where ($1::text is null or olt_id = $1) and ($2::text is null or status = $2) \
             order by created_at_ms desc, ont_id asc"
        );
        let rows = sqlx::query(&sql)
            .bind(filter.olt_id.as_deref())
            .bind(filter.status.map(|status| status.as_str()))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(ont_from_row).collect()
    }

    async fn find_ont(&self, ont_id: &str) -> Result<Option<OntRecord>, StorageError> {
        let sql = format!("select {ONT_COLUMNS} from onts where ont_id = $1");
        let row = sqlx::query(&sql)
            .bind(ont_id)
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(ont_from_row(&row)?))
    }

    async fn create_ont(&self, record: OntRecord) -> Result<OntRecord, StorageError> {
        sqlx::query(
            "insert into onts (ont_id, serial_number, mac_address, olt_id, port, status, \
             signal_strength, rx_power, tx_power, distance, customer_name, customer_phone, \
             customer_email, address, service_package, install_date, notes, \
             created_at_ms, updated_at_ms) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, \
             $11, $12, $13, $14, $15, $16, $17, $18, $19)",
        )
        .bind(&record.ont_id)
        .bind(&record.serial_number)
        .bind(&record.mac_address)
        .bind(&record.olt_id)
        .bind(record.port)
        .bind(record.status.as_str())
        .bind(record.signal_strength)
        .bind(record.rx_power)
        .bind(record.tx_power)
        .bind(record.distance)
        .bind(&record.customer_name)
        .bind(&record.customer_phone)
        .bind(&record.customer_email)
        .bind(&record.address)
        .bind(&record.service_package)
        .bind(record.install_date)
        .bind(&record.notes)
        .bind(record.created_at_ms)
        .bind(record.updated_at_ms)
        .execute(&self.pool)
        .await?;
        Ok(record)
    }

    async fn update_ont(
        &self,
        ont_id: &str,
        update: OntUpdate,
    ) -> Result<Option<OntRecord>, StorageError> {
        let sql = format!(
            "update onts set serial_number = $2, mac_address = $3, olt_id = $4, port = $5, \
             status = $6, signal_strength = $7, rx_power = $8, tx_power = $9, distance = $10, \
             customer_name = $11, customer_phone = $12, customer_email = $13, address = $14, \
             service_package = $15, install_date = $16, notes = $17, updated_at_ms = $18 \
             where ont_id = $1 returning {ONT_COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(ont_id)
            .bind(&update.serial_number)
            .bind(&update.mac_address)
            .bind(&update.olt_id)
            .bind(update.port)
            .bind(update.status.as_str())
            .bind(update.signal_strength)
            .bind(update.rx_power)
            .bind(update.tx_power)
            .bind(update.distance)
            .bind(&update.customer_name)
            .bind(&update.customer_phone)
            .bind(&update.customer_email)
            .bind(&update.address)
            .bind(&update.service_package)
            .bind(update.install_date)
            .bind(&update.notes)
            .bind(now_epoch_ms())
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(ont_from_row(&row)?))
    }

    async fn delete_ont(&self, ont_id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("delete from onts where ont_id = $1")
            .bind(ont_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
