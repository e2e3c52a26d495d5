//! Feed data: warehouses, acceptance coefficients and package types.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Date-time format used by the coefficient feed (`2025-01-05T10:00:00Z`).
pub const FEED_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A warehouse from the upstream directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warehouse {
    #[serde(rename = "ID")]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub address: String,
}

impl Warehouse {
    pub fn new(id: i64, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
        }
    }

    /// The label users pick from the warehouse keyboard: `"{name} (ID: {id})"`.
    pub fn label(&self) -> String {
        format!("{} (ID: {})", self.name, self.id)
    }

    /// Case-insensitive substring match of `city` against name or address.
    pub fn matches_city(&self, city: &str) -> bool {
        let needle = city.to_lowercase();
        self.name.to_lowercase().contains(&needle) || self.address.to_lowercase().contains(&needle)
    }
}

/// One row of the acceptance coefficient feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptanceCoefficient {
    /// Slot date, `YYYY-MM-DDTHH:MM:SSZ`.
    pub date: String,
    pub coefficient: f64,
    pub box_type_name: String,
    #[serde(default, rename = "warehouseID")]
    pub warehouse_id: Option<i64>,
    #[serde(default)]
    pub warehouse_name: Option<String>,
}

impl AcceptanceCoefficient {
    pub fn new(date: impl Into<String>, box_type_name: impl Into<String>, coefficient: f64) -> Self {
        Self {
            date: date.into(),
            coefficient,
            box_type_name: box_type_name.into(),
            warehouse_id: None,
            warehouse_name: None,
        }
    }

    /// Calendar date of the slot.
    ///
    /// Accepts the feed format and falls back to RFC 3339 with an offset.
    pub fn slot_date(&self) -> Option<NaiveDate> {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&self.date, FEED_DATE_FORMAT) {
            return Some(dt.date());
        }
        DateTime::parse_from_rfc3339(&self.date)
            .ok()
            .map(|dt| dt.naive_utc().date())
    }

    /// Package type of the slot, if the label is one we know.
    pub fn package_type(&self) -> Option<PackageType> {
        PackageType::from_label(&self.box_type_name)
    }
}

/// Supply package types, in the order they are offered to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageType {
    Boxes,
    MonoPallets,
    Supersafe,
    QrSupplyWithBoxes,
}

impl PackageType {
    pub const ALL: [PackageType; 4] = [
        PackageType::Boxes,
        PackageType::MonoPallets,
        PackageType::Supersafe,
        PackageType::QrSupplyWithBoxes,
    ];

    /// English label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Boxes => "Boxes",
            Self::MonoPallets => "Mono-pallets",
            Self::Supersafe => "Supersafe",
            Self::QrSupplyWithBoxes => "QR-supply-with-boxes",
        }
    }

    /// Label used by the Wildberries feed (`boxTypeName`).
    pub fn feed_label(self) -> &'static str {
        match self {
            Self::Boxes => "Короба",
            Self::MonoPallets => "Монопаллеты",
            Self::Supersafe => "Суперсейф",
            Self::QrSupplyWithBoxes => "QR-поставка с коробами",
        }
    }

    /// Resolve an exact label in either vocabulary.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.label() == label || p.feed_label() == label)
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warehouse_label() {
        let w = Warehouse::new(507, "Коледино", "Московская обл.");
        assert_eq!(w.label(), "Коледино (ID: 507)");
    }

    #[test]
    fn test_matches_city_on_name_or_address() {
        let w = Warehouse::new(1, "Moscow North", "Lenina 1");
        assert!(w.matches_city("moscow"));
        assert!(w.matches_city("LENINA"));
        assert!(!w.matches_city("Kazan"));

        let w = Warehouse::new(2, "Коледино", "Московская область, Подольск");
        assert!(w.matches_city("московская"));
    }

    #[test]
    fn test_deserialize_feed_rows() {
        let warehouse: Warehouse =
            serde_json::from_str(r#"{"ID": 507, "name": "Коледино", "address": "Подольск", "workTime": "24/7"}"#)
                .unwrap();
        assert_eq!(warehouse.id, 507);

        let row: AcceptanceCoefficient = serde_json::from_str(
            r#"{"date": "2025-01-05T00:00:00Z", "coefficient": -1, "warehouseID": 507,
                "warehouseName": "Коледино", "boxTypeName": "Короба", "boxTypeID": 2}"#,
        )
        .unwrap();
        assert_eq!(row.coefficient, -1.0);
        assert_eq!(row.warehouse_id, Some(507));
        assert_eq!(row.package_type(), Some(PackageType::Boxes));
        assert_eq!(row.slot_date(), NaiveDate::from_ymd_opt(2025, 1, 5));
    }

    #[test]
    fn test_slot_date_rejects_garbage() {
        let row = AcceptanceCoefficient::new("tomorrow", "Boxes", 1.0);
        assert_eq!(row.slot_date(), None);
    }

    #[test]
    fn test_package_type_labels() {
        assert_eq!(PackageType::from_label("Boxes"), Some(PackageType::Boxes));
        assert_eq!(PackageType::from_label("Монопаллеты"), Some(PackageType::MonoPallets));
        assert_eq!(
            PackageType::from_label("QR-поставка с коробами"),
            Some(PackageType::QrSupplyWithBoxes)
        );
        assert_eq!(PackageType::from_label("boxes"), None);
    }
}
