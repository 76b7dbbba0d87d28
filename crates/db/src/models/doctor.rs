use bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Public profile of a practitioner, created alongside a `Role::Doctor` user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub name: String,
    pub email: String,
    pub specialization: String,
    pub years_of_experience: Option<u32>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default = "bool_true")]
    pub is_available: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

fn bool_true() -> bool {
    true
}

impl Doctor {
    pub const COLLECTION: &'static str = "doctors";
}
