//! Dashboard metrics: the counter catalog and the values the backend returns.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use strum::IntoEnumIterator;

/// One counter card on the dashboard, in display order.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::EnumIter,
    strum::IntoStaticStr,
    strum::Display,
)]
#[strum(serialize_all = "camelCase")]
pub enum MetricKey {
    TotalInStock,
    ExpectedToday,
    ExpectedTomorrow,
    PendingAllocation,
    LabelsToBePrinted,
    DispatchedToday,
    DispatchedTomorrow,
    #[strum(serialize = "longerThan90Days")]
    LongerThan90Days,
    CriticalStockItems,
    DangerousGoods,
    TemperatureSensitive,
    #[strum(serialize = "openOSDInventory")]
    OpenOsdInventory,
    MainWarehouseUtilization,
    BondedWarehouseUtilization,
    CoveredStackingUtilization,
    OpenStackingUtilization,
}

impl MetricKey {
    /// The key used on the wire and in navigation targets.
    pub fn key(&self) -> &'static str {
        self.into()
    }

    pub fn title(&self) -> &'static str {
        match self {
            MetricKey::TotalInStock => "Total In Stock",
            MetricKey::ExpectedToday => "Expected Today",
            MetricKey::ExpectedTomorrow => "Expected Tomorrow",
            MetricKey::PendingAllocation => "Pending Allocation",
            MetricKey::LabelsToBePrinted => "Labels To Be Printed",
            MetricKey::DispatchedToday => "Dispatched Today",
            MetricKey::DispatchedTomorrow => "Dispatched Tomorrow",
            MetricKey::LongerThan90Days => "Longer Than 90 Days",
            MetricKey::CriticalStockItems => "Critical Stock Items",
            MetricKey::DangerousGoods => "Dangerous Goods",
            MetricKey::TemperatureSensitive => "Temperature Sensitive",
            MetricKey::OpenOsdInventory => "Open OS&D Inventory",
            MetricKey::MainWarehouseUtilization => "Main Warehouse",
            MetricKey::BondedWarehouseUtilization => "Bonded Warehouse",
            MetricKey::CoveredStackingUtilization => "Covered Stacking",
            MetricKey::OpenStackingUtilization => "Open Stacking",
        }
    }

    /// Utilization cards show a percentage rather than a count.
    pub fn is_percentage(&self) -> bool {
        matches!(
            self,
            MetricKey::MainWarehouseUtilization
                | MetricKey::BondedWarehouseUtilization
                | MetricKey::CoveredStackingUtilization
                | MetricKey::OpenStackingUtilization
        )
    }

    pub fn icon_path(&self) -> String {
        format!("/warehousing_system/static/src/img/icons/{}.png", self.key())
    }
}

/// A single counter value as the backend sends it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(i64),
    Ratio(f64),
    Text(String),
}

impl MetricValue {
    /// Falsy values (`null`, `false`, `0`, `""`) all display as zero.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null | Value::Bool(false) => Self::Count(0),
            Value::Bool(true) => Self::Count(1),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Count)
                .unwrap_or_else(|| Self::Ratio(n.as_f64().unwrap_or_default())),
            Value::String(s) if s.is_empty() => Self::Count(0),
            Value::String(s) => Self::Text(s.clone()),
            other => Self::Text(other.to_string()),
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Count(n) => write!(f, "{n}"),
            MetricValue::Ratio(r) if r.fract() == 0.0 => write!(f, "{r:.0}"),
            MetricValue::Ratio(r) => write!(f, "{r}"),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}

/// Metric key to value, replaced wholesale on every successful fetch.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics(BTreeMap<String, MetricValue>);

impl DashboardMetrics {
    /// All catalog keys at zero. Utilization keys are zero strings, as the
    /// backend sends them.
    pub fn zeroed() -> Self {
        Self(
            MetricKey::iter()
                .map(|k| {
                    let zero = if k.is_percentage() {
                        MetricValue::Text("0".to_string())
                    } else {
                        MetricValue::Count(0)
                    };
                    (k.key().to_string(), zero)
                })
                .collect(),
        )
    }

    /// Decodes a fetch result. A missing, empty or non-object result falls
    /// back to [`DashboardMetrics::zeroed`].
    pub fn from_result(result: Value) -> Self {
        match result {
            Value::Object(map) if !map.is_empty() => Self(
                map.iter()
                    .map(|(k, v)| (k.clone(), MetricValue::from_json(v)))
                    .collect(),
            ),
            _ => Self::zeroed(),
        }
    }

    /// Display text for a card; keys absent from the result show zero.
    pub fn display(&self, key: MetricKey) -> String {
        let value = self
            .0
            .get(key.key())
            .map(|v| v.to_string())
            .unwrap_or_else(|| "0".to_string());
        if key.is_percentage() {
            format!("{value}%")
        } else {
            value
        }
    }
}
