//! Activity Log Types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One audited user action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserActivity {
    pub id: i64,
    pub status: String,
    pub action: String,
    pub object: String,
    pub user_id: i64,
    pub user_email: String,
    pub role_id: i64,
    pub role: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub device: String,
    pub created_at: String,
}

/// User reference used to narrow the activity log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityUser {
    pub id: i64,
    pub email: String,
}

/// Filter body posted to the activity log endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityFilter {
    pub search: String,
    pub action: String,
    pub resource: String,
    pub user: Vec<ActivityUser>,
    pub date: Option<NaiveDate>,
}
