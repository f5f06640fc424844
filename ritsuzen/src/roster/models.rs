//! Participant master data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Master ID type
pub type MasterId = String;

/// A reusable roster entry used to prefill new participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantMaster {
    pub id: MasterId,
    pub name: String,
    pub rank: u32,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default)]
    pub usage_count: u32,
    pub created_at: DateTime<Utc>,
}

/// Partial update applied by `StorageManager::update_master`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MasterUpdate {
    pub name: Option<String>,
    pub rank: Option<u32>,
    pub is_active: Option<bool>,
}

impl MasterUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.rank.is_none() && self.is_active.is_none()
    }
}

/// Roster export file layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterExport {
    pub participant_masters: Vec<ParticipantMaster>,
    pub exported_at: DateTime<Utc>,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_master_json_layout() {
        let master = ParticipantMaster {
            id: "mast-1".to_string(),
            name: "佐藤".to_string(),
            rank: 4,
            is_active: true,
            last_used: None,
            usage_count: 2,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&master).unwrap();
        assert_eq!(json["isActive"], true);
        assert_eq!(json["usageCount"], 2);
        assert!(json.get("lastUsed").is_none());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(MasterUpdate::default().is_empty());
        let update = MasterUpdate {
            rank: Some(3),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
