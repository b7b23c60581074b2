//! 地理坐标点。

use serde::{Deserialize, Serialize};

/// 纬度合法区间。
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
/// 经度合法区间。
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// 光缆路由上的一个折线点。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// 纬度是否落在 [-90, 90]。
pub fn latitude_in_range(value: f64) -> bool {
    value.is_finite() && value >= LATITUDE_RANGE.0 && value <= LATITUDE_RANGE.1
}

/// 经度是否落在 [-180, 180]。
pub fn longitude_in_range(value: f64) -> bool {
    value.is_finite() && value >= LONGITUDE_RANGE.0 && value <= LONGITUDE_RANGE.1
}
