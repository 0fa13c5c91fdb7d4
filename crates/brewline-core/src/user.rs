use serde::{Deserialize, Serialize};

/// The signed-in account. Storefront members carry loyalty fields; back-office
/// accounts carry a `role`. Absent fields default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub member_level_id: u32,
    #[serde(default)]
    pub points: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}
