//! Pet entities and the category/tag references they carry.

use serde::{Deserialize, Serialize};

/// Category reference attached to a pet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Service-assigned identifier, absent on newly described categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Category {
    /// Describe a category by name only.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }
}

/// Tag reference attached to a pet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Service-assigned identifier, absent on newly described tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Tag {
    /// Describe a tag by name only.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }
}

/// Pet as submitted to `POST /pet`.
///
/// The request shape has no identifier: the service assigns one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetRequest {
    /// Pet name.
    pub name: String,
    /// Optional category reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Photo URLs in submission order.
    #[serde(default)]
    pub photo_urls: Vec<String>,
    /// Tags in submission order.
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Status string such as `available`, `pending` or `sold`.
    pub status: String,
}

impl PetRequest {
    /// Name of the requested category, if any.
    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().and_then(|c| c.name.as_deref())
    }
}

/// Pet as returned by the service or loaded from a reference fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    /// Service-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Pet name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Category reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Photo URLs in service order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_urls: Option<Vec<String>>,
    /// Tags in service order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    /// Status string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Pet {
    /// Name of the pet's category, if any.
    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().and_then(|c| c.name.as_deref())
    }

    /// Identifier of the pet's category, if any.
    #[must_use]
    pub fn category_id(&self) -> Option<i64> {
        self.category.as_ref().and_then(|c| c.id)
    }

    /// Photo URLs, treating an absent list as empty.
    #[must_use]
    pub fn photo_urls(&self) -> &[String] {
        self.photo_urls.as_deref().unwrap_or_default()
    }

    /// Tags, treating an absent list as empty.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        self.tags.as_deref().unwrap_or_default()
    }
}
