//! 网络资产的状态与分类标签。
//!
//! 所有标签都是不透明值：本层不做状态迁移校验，任意状态可以改为任意状态。
//! 解析大小写不敏感，输出统一为规范写法（设备类为大写，光缆路由为小写）。

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 未知标签值。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag {
    pub kind: &'static str,
    pub value: String,
    pub allowed: &'static [&'static str],
}

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid {} '{}', expected one of: {}",
            self.kind,
            self.value,
            self.allowed.join(", ")
        )
    }
}

impl std::error::Error for UnknownTag {}

macro_rules! tag_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $tag:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [&'static str] = &[$($tag),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $tag),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownTag;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let trimmed = value.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($tag) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(UnknownTag {
                    kind: $kind,
                    value: value.to_string(),
                    allowed: Self::ALL,
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

tag_enum! {
    /// 操作员角色。
    Role, "role" {
        Admin => "ADMIN",
        Operator => "OPERATOR",
        Viewer => "VIEWER",
    }
}

tag_enum! {
    /// 账户状态。
    UserStatus, "user status" {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
    }
}

tag_enum! {
    /// OLT 运行状态。
    OltStatus, "OLT status" {
        Online => "ONLINE",
        Offline => "OFFLINE",
        Maintenance => "MAINTENANCE",
        Error => "ERROR",
    }
}

tag_enum! {
    /// ONT 运行状态。
    OntStatus, "ONT status" {
        Online => "ONLINE",
        Offline => "OFFLINE",
        Los => "LOS",
        PowerOff => "POWER_OFF",
        Pending => "PENDING",
    }
}

tag_enum! {
    /// ODP 状态。历史数据里同时出现过 ACTIVE 与 ONLINE 两套写法，这里都接受。
    OdpStatus, "ODP status" {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        Online => "ONLINE",
        Offline => "OFFLINE",
        Maintenance => "MAINTENANCE",
    }
}

tag_enum! {
    /// 光缆路由状态。
    CableRouteStatus, "cable route status" {
        Active => "active",
        Inactive => "inactive",
        Maintenance => "maintenance",
    }
}

tag_enum! {
    /// 光缆类型。
    CableType, "cable type" {
        Fiber => "fiber",
        Copper => "copper",
        Coaxial => "coaxial",
    }
}

tag_enum! {
    /// 告警来源设备类型。
    DeviceType, "device type" {
        Olt => "OLT",
        Ont => "ONT",
    }
}

tag_enum! {
    /// 告警级别。
    AlarmSeverity, "severity" {
        Critical => "CRITICAL",
        Warning => "WARNING",
        Info => "INFO",
    }
}

tag_enum! {
    /// 告警状态。
    AlarmStatus, "alarm status" {
        Active => "ACTIVE",
        Resolved => "RESOLVED",
    }
}

tag_enum! {
    /// 删除仍被 ONT/ODP 引用的 OLT 时的处理策略。
    DeletePolicy, "delete policy" {
        Restrict => "restrict",
        Cascade => "cascade",
    }
}
