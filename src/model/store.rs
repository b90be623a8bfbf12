//! Store orders and inventory.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Order as submitted to `POST /store/order`.
///
/// `id` stays `None` for new orders. It is only populated when an existing
/// order is re-submitted with changed fields, which is how the service
/// models updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Identifier of an existing order being re-submitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Pet being ordered. Required by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet_id: Option<i64>,
    /// Number of pets ordered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    /// ISO-8601 ship date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_date: Option<String>,
    /// Status such as `placed`, `approved` or `delivered`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Whether the order is complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
}

impl OrderRequest {
    /// Build an update request that re-submits `order` with a new status.
    #[must_use]
    pub fn status_update(order: &Order, status: impl Into<String>) -> Self {
        Self {
            id: order.id,
            pet_id: order.pet_id,
            quantity: order.quantity,
            ship_date: order.ship_date.clone(),
            status: Some(status.into()),
            complete: order.complete,
        }
    }
}

/// Order as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Service-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Pet being ordered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pet_id: Option<i64>,
    /// Number of pets ordered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    /// ISO-8601 ship date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ship_date: Option<String>,
    /// Order status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Whether the order is complete.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complete: Option<bool>,
}

/// Pet counts keyed by status, in the order the service reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory(IndexMap<String, i64>);

impl Inventory {
    /// Count reported for `status`, if the service listed it.
    #[must_use]
    pub fn count(&self, status: &str) -> Option<i64> {
        self.0.get(status).copied()
    }

    /// Number of distinct statuses reported.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the service reported no statuses.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(status, count)` pairs in reported order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(status, count)| (status.as_str(), *count))
    }
}

impl FromIterator<(String, i64)> for Inventory {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
