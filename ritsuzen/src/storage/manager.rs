//! Storage manager implementing the persisted application layout.

use chrono::Utc;
use log::{debug, error, info, warn};
use serde_json::Value;

use super::{
    errors::{StorageError, StorageResult},
    models::{StorageData, StorageInfo},
    port::StoragePort,
};
use crate::competition::Competition;
use crate::constants::{EXPORT_VERSION, MAX_COMPETITION_HISTORY, MAX_RANK, MIN_RANK, STORAGE_KEY};
use crate::export::ExportData;
use crate::ids::{IdPrefix, generate_id};
use crate::roster::{MasterExport, MasterUpdate, ParticipantMaster};

/// Storage manager
///
/// Every operation reads the whole blob from the port, applies its change
/// and writes the blob back. There is a single writer, so no locking is
/// needed beyond what the port does.
#[derive(Debug)]
pub struct StorageManager<S: StoragePort> {
    port: S,
}

impl<S: StoragePort> StorageManager<S> {
    /// Create a new storage manager
    ///
    /// # Arguments
    ///
    /// * `port` - Key-value store the blob is kept in
    pub fn new(port: S) -> Self {
        Self { port }
    }

    pub fn port(&self) -> &S {
        &self.port
    }

    /// Load the stored blob.
    ///
    /// Missing data yields the empty layout. Unreadable or corrupt data is
    /// logged and also yields the empty layout.
    pub fn load(&self) -> StorageData {
        let raw = match self.port.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return StorageData::default(),
            Err(e) => {
                error!("Failed to read stored data: {e}");
                return StorageData::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(data) => data,
            Err(e) => {
                error!("Failed to parse stored data, using defaults: {e}");
                StorageData::default()
            }
        }
    }

    /// Write the blob back, stamping `last_updated`
    pub fn save(&self, data: &mut StorageData) -> StorageResult<()> {
        data.last_updated = Utc::now();
        let json = serde_json::to_string(data)?;
        self.port.set(STORAGE_KEY, &json)?;
        debug!("Saved {} bytes of application data", json.len());
        Ok(())
    }

    fn update<T>(&self, f: impl FnOnce(&mut StorageData) -> StorageResult<T>) -> StorageResult<T> {
        let mut data = self.load();
        let result = f(&mut data)?;
        self.save(&mut data)?;
        Ok(result)
    }

    // === Current competition ===

    pub fn load_current_competition(&self) -> Option<Competition> {
        self.load().current_competition
    }

    pub fn save_current_competition(&self, competition: Option<&Competition>) -> StorageResult<()> {
        self.update(|data| {
            data.current_competition = competition.cloned();
            Ok(())
        })
    }

    // === Competition history ===

    /// Put a competition at the front of the history.
    ///
    /// An older entry with the same id is replaced and the history is
    /// capped at [`MAX_COMPETITION_HISTORY`] entries.
    pub fn save_to_history(&self, competition: &Competition) -> StorageResult<()> {
        self.update(|data| {
            push_history(&mut data.competitions, competition.clone());
            Ok(())
        })
    }

    /// Finished competitions, most recent first
    pub fn history(&self) -> Vec<Competition> {
        self.load().competitions
    }

    pub fn competition_by_id(&self, id: &str) -> Option<Competition> {
        self.load().competitions.into_iter().find(|c| c.id == id)
    }

    /// Save every competition of an import file to the history.
    ///
    /// # Returns
    ///
    /// * `StorageResult<usize>` - Number of competitions imported
    pub fn import_competitions(&self, import: &ExportData) -> StorageResult<usize> {
        let competitions = import.competitions_to_import();
        if competitions.is_empty() {
            return Err(StorageError::InvalidImport(
                "no competitions in import data".to_string(),
            ));
        }

        let count = competitions.len();
        self.update(|data| {
            // Reverse so the first competition of the file ends up first
            for competition in competitions.into_iter().rev() {
                push_history(&mut data.competitions, competition.clone());
            }
            Ok(())
        })?;

        info!("Imported {count} competitions into history");
        Ok(count)
    }

    // === Participant masters ===

    /// Active masters
    pub fn masters(&self) -> Vec<ParticipantMaster> {
        self.load()
            .participant_masters
            .into_iter()
            .filter(|m| m.is_active)
            .collect()
    }

    /// All masters, including inactive ones
    pub fn all_masters(&self) -> Vec<ParticipantMaster> {
        self.load().participant_masters
    }

    /// Register a new master
    ///
    /// # Errors
    ///
    /// * `StorageError::InvalidMaster` - Blank name or grade outside 1..=8
    pub fn save_master(&self, name: &str, rank: u32) -> StorageResult<ParticipantMaster> {
        let name = name.trim();
        validate_master(name, rank)?;

        let master = ParticipantMaster {
            id: generate_id(IdPrefix::Master),
            name: name.to_string(),
            rank,
            is_active: true,
            last_used: None,
            usage_count: 0,
            created_at: Utc::now(),
        };

        self.update(|data| {
            data.participant_masters.push(master.clone());
            Ok(())
        })?;
        Ok(master)
    }

    /// Apply a partial update and mark the master as used now
    ///
    /// # Errors
    ///
    /// * `StorageError::MasterNotFound` - Unknown id
    /// * `StorageError::InvalidMaster` - Updated name or grade rejected
    pub fn update_master(&self, id: &str, update: MasterUpdate) -> StorageResult<ParticipantMaster> {
        self.update(|data| {
            let master = find_master_mut(data, id)?;
            let name = update
                .name
                .as_deref()
                .map_or(master.name.as_str(), str::trim)
                .to_string();
            let rank = update.rank.unwrap_or(master.rank);
            validate_master(&name, rank)?;

            master.name = name;
            master.rank = rank;
            if let Some(is_active) = update.is_active {
                master.is_active = is_active;
            }
            master.last_used = Some(Utc::now());
            Ok(master.clone())
        })
    }

    pub fn increment_master_usage(&self, id: &str) -> StorageResult<()> {
        self.update(|data| {
            let master = find_master_mut(data, id)?;
            master.usage_count += 1;
            master.last_used = Some(Utc::now());
            Ok(())
        })
    }

    pub fn delete_master(&self, id: &str) -> StorageResult<()> {
        self.update(|data| {
            let before = data.participant_masters.len();
            data.participant_masters.retain(|m| m.id != id);
            if data.participant_masters.len() == before {
                return Err(StorageError::MasterNotFound(id.to_string()));
            }
            Ok(())
        })
    }

    /// Active master with exactly this name
    pub fn find_master_by_name(&self, name: &str) -> Option<ParticipantMaster> {
        self.masters().into_iter().find(|m| m.name == name)
    }

    /// Import masters from a roster export.
    ///
    /// Entries without a name or grade, and entries whose name already
    /// exists, are skipped. Imported masters get fresh ids; `isActive`
    /// defaults to true and `usageCount` to 0.
    ///
    /// # Returns
    ///
    /// * `StorageResult<usize>` - Number of masters added
    pub fn import_masters(&self, import: &Value) -> StorageResult<usize> {
        let entries = import
            .get("participantMasters")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                StorageError::InvalidImport("participantMasters array missing".to_string())
            })?;

        self.update(|data| {
            let mut imported = 0;
            for entry in entries {
                let Some(master) = master_from_import(entry) else {
                    warn!("Skipping participant master without name or rank");
                    continue;
                };
                if data
                    .participant_masters
                    .iter()
                    .any(|m| m.name == master.name)
                {
                    debug!("Skipping existing participant master {}", master.name);
                    continue;
                }
                data.participant_masters.push(master);
                imported += 1;
            }
            info!("Imported {imported} participant masters");
            Ok(imported)
        })
    }

    /// All masters in the roster export layout
    pub fn export_masters(&self) -> MasterExport {
        MasterExport {
            participant_masters: self.all_masters(),
            exported_at: Utc::now(),
            version: EXPORT_VERSION.to_string(),
        }
    }

    // === Maintenance ===

    pub fn storage_info(&self) -> StorageInfo {
        let used_bytes = match self.port.get(STORAGE_KEY) {
            Ok(raw) => raw.map_or(0, |r| r.len()),
            Err(e) => {
                error!("Failed to read stored data: {e}");
                0
            }
        };
        let data = self.load();

        StorageInfo {
            used_bytes,
            competition_count: data.competitions.len(),
            master_count: data.participant_masters.len(),
            has_current_competition: data.current_competition.is_some(),
            last_updated: (used_bytes > 0).then_some(data.last_updated),
        }
    }

    /// Remove everything, including the roster
    pub fn clear_all_data(&self) -> StorageResult<()> {
        self.port.clear(STORAGE_KEY)?;
        warn!("All stored data cleared");
        Ok(())
    }
}

fn push_history(history: &mut Vec<Competition>, competition: Competition) {
    history.retain(|c| c.id != competition.id);
    history.insert(0, competition);
    history.truncate(MAX_COMPETITION_HISTORY);
}

fn find_master_mut<'a>(data: &'a mut StorageData, id: &str) -> StorageResult<&'a mut ParticipantMaster> {
    data.participant_masters
        .iter_mut()
        .find(|m| m.id == id)
        .ok_or_else(|| StorageError::MasterNotFound(id.to_string()))
}

fn validate_master(name: &str, rank: u32) -> StorageResult<()> {
    if name.is_empty() {
        return Err(StorageError::InvalidMaster("name must not be empty".to_string()));
    }
    if !(MIN_RANK..=MAX_RANK).contains(&rank) {
        return Err(StorageError::InvalidMaster(format!(
            "rank must be between {MIN_RANK} and {MAX_RANK}, got {rank}"
        )));
    }
    Ok(())
}

fn master_from_import(entry: &Value) -> Option<ParticipantMaster> {
    let name = entry.get("name")?.as_str()?.trim();
    let rank = u32::try_from(entry.get("rank")?.as_u64()?).ok()?;
    if name.is_empty() || rank == 0 {
        return None;
    }

    let last_used = entry
        .get("lastUsed")
        .and_then(|v| serde_json::from_value(v.clone()).ok());

    Some(ParticipantMaster {
        id: generate_id(IdPrefix::Master),
        name: name.to_string(),
        rank,
        is_active: entry
            .get("isActive")
            .and_then(Value::as_bool)
            .unwrap_or(true),
        last_used,
        usage_count: entry
            .get("usageCount")
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .unwrap_or(0),
        created_at: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competition::{CompetitionAction, CompetitionSettings, CompetitionState};
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;
    use serde_json::json;

    fn competition(name: &str) -> Competition {
        CompetitionState::new()
            .apply(CompetitionAction::Create(CompetitionSettings::new(
                name,
                NaiveDate::from_ymd_opt(2024, 7, 7).unwrap(),
            )))
            .unwrap()
            .competition
            .unwrap()
    }

    fn manager() -> StorageManager<MemoryStorage> {
        StorageManager::new(MemoryStorage::new())
    }

    #[test]
    fn test_load_defaults_when_empty() {
        let data = manager().load();
        assert!(data.current_competition.is_none());
        assert!(data.competitions.is_empty());
    }

    #[test]
    fn test_load_defaults_when_corrupt() {
        let manager = manager();
        manager.port().set(STORAGE_KEY, "{not json").unwrap();
        assert!(manager.load().competitions.is_empty());
        assert!(manager.load_current_competition().is_none());
    }

    #[test]
    fn test_current_competition_roundtrip() {
        let manager = manager();
        let comp = competition("月例会");
        manager.save_current_competition(Some(&comp)).unwrap();
        assert_eq!(manager.load_current_competition(), Some(comp));
        manager.save_current_competition(None).unwrap();
        assert!(manager.load_current_competition().is_none());
    }

    #[test]
    fn test_history_dedupes_and_orders_newest_first() {
        let manager = manager();
        let a = competition("A");
        let b = competition("B");
        manager.save_to_history(&a).unwrap();
        manager.save_to_history(&b).unwrap();
        manager.save_to_history(&a).unwrap();

        let names: Vec<String> = manager.history().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(manager.competition_by_id(&b.id).unwrap().name, "B");
        assert!(manager.competition_by_id("missing").is_none());
    }

    #[test]
    fn test_history_is_capped() {
        let manager = manager();
        for i in 0..(MAX_COMPETITION_HISTORY + 5) {
            manager.save_to_history(&competition(&format!("C{i}"))).unwrap();
        }
        let history = manager.history();
        assert_eq!(history.len(), MAX_COMPETITION_HISTORY);
        assert_eq!(history[0].name, format!("C{}", MAX_COMPETITION_HISTORY + 4));
    }

    #[test]
    fn test_quota_exceeded_surfaces_error() {
        let manager = StorageManager::new(MemoryStorage::with_quota(64));
        let err = manager
            .save_current_competition(Some(&competition("大会")))
            .unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
    }

    #[test]
    fn test_master_lifecycle() {
        let manager = manager();
        let master = manager.save_master(" 佐藤 ", 4).unwrap();
        assert_eq!(master.name, "佐藤");
        assert!(master.id.starts_with("mast-"));

        manager.increment_master_usage(&master.id).unwrap();
        manager.increment_master_usage(&master.id).unwrap();
        let found = manager.find_master_by_name("佐藤").unwrap();
        assert_eq!(found.usage_count, 2);
        assert!(found.last_used.is_some());

        let updated = manager
            .update_master(
                &master.id,
                MasterUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(!updated.is_active);
        assert!(manager.find_master_by_name("佐藤").is_none());
        assert!(manager.masters().is_empty());
        assert_eq!(manager.all_masters().len(), 1);

        manager.delete_master(&master.id).unwrap();
        assert!(manager.all_masters().is_empty());
        assert!(matches!(
            manager.delete_master(&master.id),
            Err(StorageError::MasterNotFound(_))
        ));
    }

    #[test]
    fn test_master_validation() {
        let manager = manager();
        assert!(matches!(
            manager.save_master("", 1),
            Err(StorageError::InvalidMaster(_))
        ));
        assert!(matches!(
            manager.save_master("高橋", 9),
            Err(StorageError::InvalidMaster(_))
        ));
        assert!(matches!(
            manager.increment_master_usage("missing"),
            Err(StorageError::MasterNotFound(_))
        ));
    }

    #[test]
    fn test_import_masters_skips_invalid_and_duplicates() {
        let manager = manager();
        manager.save_master("佐藤", 4).unwrap();

        let imported = manager
            .import_masters(&json!({
                "participantMasters": [
                    { "name": "佐藤", "rank": 2 },
                    { "name": "高橋", "rank": 3, "usageCount": 5 },
                    { "name": "伊藤" },
                    { "rank": 1 },
                    { "name": "渡辺", "rank": 1, "isActive": false }
                ]
            }))
            .unwrap();
        assert_eq!(imported, 2);

        let takahashi = manager.find_master_by_name("高橋").unwrap();
        assert_eq!(takahashi.usage_count, 5);
        assert!(takahashi.is_active);
        assert_eq!(manager.all_masters().len(), 3);
        assert!(manager.find_master_by_name("渡辺").is_none());
    }

    #[test]
    fn test_import_masters_rejects_wrong_shape() {
        let err = manager().import_masters(&json!({ "masters": [] })).unwrap_err();
        assert!(matches!(err, StorageError::InvalidImport(_)));
    }

    #[test]
    fn test_export_masters() {
        let manager = manager();
        manager.save_master("佐藤", 4).unwrap();
        let export = manager.export_masters();
        assert_eq!(export.version, "1.0");
        assert_eq!(export.participant_masters.len(), 1);

        // An export can be imported into another store
        let other = StorageManager::new(MemoryStorage::new());
        let value = serde_json::to_value(&export).unwrap();
        assert_eq!(other.import_masters(&value).unwrap(), 1);
    }

    #[test]
    fn test_storage_info_and_clear() {
        let manager = manager();
        let empty = manager.storage_info();
        assert_eq!(empty.used_bytes, 0);
        assert!(empty.last_updated.is_none());

        manager.save_to_history(&competition("A")).unwrap();
        let info = manager.storage_info();
        assert!(info.used_bytes > 0);
        assert_eq!(info.competition_count, 1);
        assert!(!info.has_current_competition);
        assert!(info.last_updated.is_some());

        manager.clear_all_data().unwrap();
        assert_eq!(manager.storage_info().competition_count, 0);
    }

    #[test]
    fn test_import_competitions() {
        let manager = manager();
        let a = competition("A");
        let b = competition("B");
        let export = ExportData::all(None, &[a.clone(), b.clone()]);

        assert_eq!(manager.import_competitions(&export).unwrap(), 2);
        let names: Vec<String> = manager.history().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["A", "B"]);

        let single = ExportData::single(&a);
        assert_eq!(manager.import_competitions(&single).unwrap(), 1);
        assert_eq!(manager.history().len(), 2);
    }
}
