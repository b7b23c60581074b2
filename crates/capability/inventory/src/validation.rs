//! 请求体字段校验与数值转换
//!
//! [`Checker`] 逐字段收集错误，调用方读完全部字段后用 [`Checker::finish`] 一次性报告，
//! 所以一个请求里的多个问题会同时返回。必填字段缺失时先返回占位值，
//! 只要记录过错误，`finish` 就会失败，占位值不会进入存储。
//!
//! 数值字段同时接受 JSON 数字和数字字符串（表单提交的常见形式）。

use crate::error::{FieldError, InventoryError};
use chrono::NaiveDate;
use domain::geo::{latitude_in_range, longitude_in_range};
use domain::{GeoPoint, UnknownTag};
use serde_json::Value;
use std::net::IpAddr;
use std::str::FromStr;

/// 光缆路由最少坐标点数。
pub const MIN_ROUTE_POINTS: usize = 2;

/// 字段错误收集器。
#[derive(Debug, Default)]
pub struct Checker {
    errors: Vec<FieldError>,
}

enum Numeric {
    Missing,
    Present(f64),
    Invalid,
}

fn read_number(value: Option<Value>) -> Numeric {
    match value {
        None | Some(Value::Null) => Numeric::Missing,
        Some(Value::Number(number)) => match number.as_f64() {
            Some(parsed) if parsed.is_finite() => Numeric::Present(parsed),
            _ => Numeric::Invalid,
        },
        Some(Value::String(raw)) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Numeric::Missing;
            }
            match trimmed.parse::<f64>() {
                Ok(parsed) if parsed.is_finite() => Numeric::Present(parsed),
                _ => Numeric::Invalid,
            }
        }
        Some(_) => Numeric::Invalid,
    }
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// 有错误时返回 `Validation`，否则放行。
    pub fn finish(self) -> Result<(), InventoryError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(InventoryError::Validation(self.errors))
        }
    }

    /// 必填文本：去除首尾空格后不能为空。
    pub fn required_text(&mut self, field: &str, value: Option<String>) -> String {
        match value.map(|value| value.trim().to_string()) {
            Some(value) if !value.is_empty() => value,
            _ => {
                self.push(field, format!("{field} is required"));
                String::new()
            }
        }
    }

    /// 可选文本：空字符串视为未填写。
    pub fn optional_text(&mut self, value: Option<String>) -> Option<String> {
        value
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    pub fn optional_number(&mut self, field: &str, value: Option<Value>) -> Option<f64> {
        match read_number(value) {
            Numeric::Missing => None,
            Numeric::Present(parsed) => Some(parsed),
            Numeric::Invalid => {
                self.push(field, format!("{field} must be a number"));
                None
            }
        }
    }

    pub fn required_number(&mut self, field: &str, value: Option<Value>) -> f64 {
        match read_number(value) {
            Numeric::Present(parsed) => parsed,
            Numeric::Missing => {
                self.push(field, format!("{field} is required"));
                0.0
            }
            Numeric::Invalid => {
                self.push(field, format!("{field} must be a number"));
                0.0
            }
        }
    }

    /// 可选整数，给出时必须不小于 `min`。
    pub fn optional_integer(&mut self, field: &str, value: Option<Value>, min: i32) -> Option<i32> {
        let parsed = match read_number(value) {
            Numeric::Missing => return None,
            Numeric::Present(parsed) => parsed,
            Numeric::Invalid => {
                self.push(field, format!("{field} must be an integer"));
                return None;
            }
        };
        if parsed.fract() != 0.0 || parsed < f64::from(i32::MIN) || parsed > f64::from(i32::MAX) {
            self.push(field, format!("{field} must be an integer"));
            return None;
        }
        let parsed = parsed as i32;
        if parsed < min {
            self.push(field, format!("{field} must be at least {min}"));
            return None;
        }
        Some(parsed)
    }

    pub fn integer_or(&mut self, field: &str, value: Option<Value>, default: i32, min: i32) -> i32 {
        self.optional_integer(field, value, min).unwrap_or(default)
    }

    pub fn required_integer(&mut self, field: &str, value: Option<Value>, min: i32) -> i32 {
        let missing = matches!(read_number(value.clone()), Numeric::Missing);
        if missing {
            self.push(field, format!("{field} is required"));
            return 0;
        }
        self.optional_integer(field, value, min).unwrap_or_default()
    }

    pub fn latitude(&mut self, field: &str, value: Option<f64>) -> Option<f64> {
        match value {
            Some(lat) if !latitude_in_range(lat) => {
                self.push(field, format!("{field} must be between -90 and 90"));
                None
            }
            other => other,
        }
    }

    pub fn longitude(&mut self, field: &str, value: Option<f64>) -> Option<f64> {
        match value {
            Some(lng) if !longitude_in_range(lng) => {
                self.push(field, format!("{field} must be between -180 and 180"));
                None
            }
            other => other,
        }
    }

    /// 可选标签，缺省时取 `default`。
    pub fn tag_or<T>(&mut self, field: &str, value: Option<String>, default: T) -> T
    where
        T: FromStr<Err = UnknownTag>,
    {
        match self.optional_tag(field, value) {
            Some(tag) => tag,
            None => default,
        }
    }

    /// 可选标签，未给出时返回 None。
    pub fn optional_tag<T>(&mut self, field: &str, value: Option<String>) -> Option<T>
    where
        T: FromStr<Err = UnknownTag>,
    {
        let raw = self.optional_text(value)?;
        match raw.parse::<T>() {
            Ok(tag) => Some(tag),
            Err(err) => {
                self.push(field, err.to_string());
                None
            }
        }
    }

    /// 必填标签；`placeholder` 只在已记录错误时返回。
    pub fn required_tag<T>(&mut self, field: &str, value: Option<String>, placeholder: T) -> T
    where
        T: FromStr<Err = UnknownTag>,
    {
        let present = value
            .as_deref()
            .is_some_and(|value| !value.trim().is_empty());
        if !present {
            self.push(field, format!("{field} is required"));
            return placeholder;
        }
        self.tag_or(field, value, placeholder)
    }

    pub fn ip_address(&mut self, field: &str, value: Option<String>) -> String {
        let value = self.required_text(field, value);
        if !value.is_empty() && !is_valid_ip(&value) {
            self.push(field, format!("{field} must be a valid IPv4 or IPv6 address"));
        }
        value
    }

    /// MAC 地址统一转为大写。
    pub fn mac_address(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let value = self.optional_text(value)?;
        if !is_valid_mac(&value) {
            self.push(field, format!("{field} must look like XX:XX:XX:XX:XX:XX"));
            return None;
        }
        Some(value.to_ascii_uppercase())
    }

    pub fn optional_email(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let value = self.optional_text(value)?;
        if !is_valid_email(&value) {
            self.push(field, format!("{field} must be a valid email address"));
            return None;
        }
        Some(value)
    }

    pub fn color(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let value = self.optional_text(value)?;
        if !is_valid_color(&value) {
            self.push(field, format!("{field} must look like #RRGGBB"));
            return None;
        }
        Some(value)
    }

    pub fn date(&mut self, field: &str, value: Option<String>) -> Option<NaiveDate> {
        let value = self.optional_text(value)?;
        match parse_date(&value) {
            Some(date) => Some(date),
            None => {
                self.push(field, format!("{field} must be YYYY-MM-DD"));
                None
            }
        }
    }

    pub fn coordinates(&mut self, field: &str, value: Option<Value>) -> Vec<GeoPoint> {
        match parse_coordinates(field, value) {
            Ok(points) => points,
            Err(err) => {
                self.errors.push(err);
                Vec::new()
            }
        }
    }
}

pub fn is_valid_ip(value: &str) -> bool {
    value.parse::<IpAddr>().is_ok()
}

/// 六组两位十六进制，分隔符统一为 `:` 或 `-`。
pub fn is_valid_mac(value: &str) -> bool {
    let separator = if value.contains(':') { ':' } else { '-' };
    let groups: Vec<&str> = value.split(separator).collect();
    groups.len() == 6
        && groups
            .iter()
            .all(|group| group.len() == 2 && group.chars().all(|ch| ch.is_ascii_hexdigit()))
}

pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|part| !part.is_empty())
}

pub fn is_valid_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|ch| ch.is_ascii_hexdigit())
}

/// 解析 `YYYY-MM-DD`；带时间部分的 ISO 字符串只取日期。
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let date_part = match value.split_once('T') {
        Some((date, _)) => date,
        None => value,
    };
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn number_of(value: &Value) -> Option<f64> {
    match read_number(Some(value.clone())) {
        Numeric::Present(parsed) => Some(parsed),
        _ => None,
    }
}

fn parse_point(value: &Value) -> Option<GeoPoint> {
    match value {
        Value::Object(map) => {
            let lat = number_of(map.get("lat")?)?;
            let lng = number_of(map.get("lng")?)?;
            let label = map
                .get("label")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .map(str::to_string);
            Some(GeoPoint { lat, lng, label })
        }
        Value::Array(pair) if pair.len() == 2 => {
            Some(GeoPoint::new(number_of(&pair[0])?, number_of(&pair[1])?))
        }
        _ => None,
    }
}

/// 解析光缆路由坐标。错误信息中的序号从 1 开始，指向第一个无效点。
pub fn parse_coordinates(field: &str, value: Option<Value>) -> Result<Vec<GeoPoint>, FieldError> {
    let items = match value {
        None | Some(Value::Null) => {
            return Err(FieldError::new(field, format!("{field} is required")));
        }
        Some(Value::Array(items)) if items.len() >= MIN_ROUTE_POINTS => items,
        Some(_) => {
            return Err(FieldError::new(
                field,
                format!("Coordinates must be an array with at least {MIN_ROUTE_POINTS} points"),
            ));
        }
    };

    let mut points = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let position = index + 1;
        let Some(point) = parse_point(item) else {
            return Err(FieldError::new(
                field,
                format!("Coordinate {position} must have numeric lat and lng"),
            ));
        };
        if !latitude_in_range(point.lat) || !longitude_in_range(point.lng) {
            return Err(FieldError::new(
                field,
                format!("Coordinate {position} is out of range"),
            ));
        }
        points.push(point);
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_accept_numeric_strings() {
        let mut checker = Checker::new();
        assert_eq!(
            checker.optional_number("rxPower", Some(json!(" -21.5 "))),
            Some(-21.5)
        );
        assert_eq!(checker.optional_number("rxPower", Some(json!(""))), None);
        assert!(checker.errors.is_empty());

        assert_eq!(checker.optional_number("rxPower", Some(json!("abc"))), None);
        assert_eq!(checker.optional_number("rxPower", Some(json!(true))), None);
        let err = checker.finish().expect_err("invalid");
        assert!(matches!(err, InventoryError::Validation(fields) if fields.len() == 2));
    }

    #[test]
    fn integers_reject_fractions_and_small_values() {
        let mut checker = Checker::new();
        assert_eq!(checker.optional_integer("port", Some(json!("4")), 1), Some(4));
        assert_eq!(checker.optional_integer("port", Some(json!(4.0)), 1), Some(4));
        assert_eq!(checker.optional_integer("port", Some(json!(1.5)), 1), None);
        assert_eq!(checker.optional_integer("port", Some(json!(0)), 1), None);
        assert_eq!(checker.errors.len(), 2);
        assert_eq!(checker.errors[1].message, "port must be at least 1");
    }

    #[test]
    fn required_integer_reports_missing() {
        let mut checker = Checker::new();
        checker.required_integer("port", None, 1);
        assert_eq!(checker.errors[0].message, "port is required");
    }

    #[test]
    fn formats() {
        assert!(is_valid_ip("192.168.1.100"));
        assert!(is_valid_ip("fe80::1"));
        assert!(!is_valid_ip("192.168.1.300"));

        assert!(is_valid_mac("aa:bb:cc:dd:ee:ff"));
        assert!(is_valid_mac("AA-BB-CC-DD-EE-FF"));
        assert!(!is_valid_mac("AA:BB-CC:DD:EE:FF"));
        assert!(!is_valid_mac("AA:BB:CC:DD:EE"));

        assert!(is_valid_email("admin@smartolt.com"));
        assert!(!is_valid_email("admin@localhost"));
        assert!(!is_valid_email("admin smartolt.com"));

        assert!(is_valid_color("#3B82F6"));
        assert!(!is_valid_color("3B82F6"));
        assert!(!is_valid_color("#3B82G6"));

        assert_eq!(
            parse_date("2024-01-15T00:00:00.000Z"),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert!(parse_date("15/01/2024").is_none());
    }

    #[test]
    fn coordinates_require_two_points() {
        let err = parse_coordinates("coordinates", Some(json!([[-6.2, 106.8]])))
            .expect_err("too short");
        assert!(err.message.contains("at least 2 points"));

        let points = parse_coordinates(
            "coordinates",
            Some(json!([[-6.2, 106.8], [-6.3, 106.9]])),
        )
        .expect("valid");
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn coordinates_accept_objects_with_labels() {
        let points = parse_coordinates(
            "coordinates",
            Some(json!([
                { "lat": -6.2088, "lng": 106.8456, "label": "Start" },
                { "lat": "-6.2100", "lng": "106.8500" }
            ])),
        )
        .expect("valid");
        assert_eq!(points[0].label.as_deref(), Some("Start"));
        assert_eq!(points[1].lat, -6.21);
    }

    #[test]
    fn coordinates_report_first_bad_index() {
        let err = parse_coordinates(
            "coordinates",
            Some(json!([[-6.2, 106.8], { "lat": -6.3 }, "x"])),
        )
        .expect_err("bad point");
        assert_eq!(err.message, "Coordinate 2 must have numeric lat and lng");

        let err = parse_coordinates("coordinates", Some(json!({ "lat": 1 })))
            .expect_err("not an array");
        assert!(err.message.starts_with("Coordinates must be an array"));
    }

    #[test]
    fn unknown_tag_is_a_field_error() {
        let mut checker = Checker::new();
        let status =
        checker.tag_or("status", Some("sleeping".to_string()), domain::OltStatus::Offline);
        assert_eq!(status, domain::OltStatus::Offline);
        assert_eq!(checker.errors[0].field, "status");
    }
}
