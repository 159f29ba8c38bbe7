use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::{CanonicalMapping, DELETE_KEY, MappingTables};
use crate::errors::ConfigurationError;

pub const MIXAMO_MOVEONE_TABLE: &str = "mixamo_moveone_mapping";
pub const MIXAMO_VROID_TABLE: &str = "mixamo_vroid_mapping";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingTablesSerial {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixamo_moveone_mapping: Option<CanonicalMappingSerial>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mixamo_vroid_mapping: Option<CanonicalMappingSerial>,
}

/// On-disk shape of a canonical table: `{ "Hips": "J_Bip_C_Hips", ..., "delete": { "X": true } }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalMappingSerial(pub IndexMap<String, MappingEntrySerial>);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MappingEntrySerial {
    Rename(String),
    Delete(IndexMap<String, bool>),
}

impl MappingTablesSerial {
    pub fn to_value(self) -> Result<MappingTables, ConfigurationError> {
        Ok(MappingTables {
            mixamo_moveone: self
                .mixamo_moveone_mapping
                .map(|table| table.to_value(MIXAMO_MOVEONE_TABLE))
                .transpose()?,
            mixamo_vroid: self
                .mixamo_vroid_mapping
                .map(|table| table.to_value(MIXAMO_VROID_TABLE))
                .transpose()?,
        })
    }

    pub fn from_value(tables: &MappingTables) -> Self {
        Self {
            mixamo_moveone_mapping: tables
                .mixamo_moveone
                .as_ref()
                .map(CanonicalMappingSerial::from_value),
            mixamo_vroid_mapping: tables
                .mixamo_vroid
                .as_ref()
                .map(CanonicalMappingSerial::from_value),
        }
    }
}

impl CanonicalMappingSerial {
    pub fn to_value(self, table: &str) -> Result<CanonicalMapping, ConfigurationError> {
        let mut renames = IndexMap::with_capacity(self.0.len());
        let mut deletion_set = IndexSet::new();

        for (key, entry) in self.0 {
            let is_delete_key = key == DELETE_KEY;
            match (is_delete_key, entry) {
                (true, MappingEntrySerial::Delete(marked)) => {
                    deletion_set.extend(
                        marked
                            .into_iter()
                            .filter_map(|(bone, delete)| delete.then_some(bone)),
                    );
                }
                (true, MappingEntrySerial::Rename(_)) => {
                    return Err(ConfigurationError::ReservedKey {
                        table: table.to_string(),
                    });
                }
                (false, MappingEntrySerial::Rename(target)) => {
                    renames.insert(key, target);
                }
                (false, MappingEntrySerial::Delete(_)) => {
                    return Err(ConfigurationError::NotARename {
                        table: table.to_string(),
                        key,
                    });
                }
            }
        }

        if let Some(bone) = deletion_set.iter().find(|bone| renames.contains_key(*bone)) {
            return Err(ConfigurationError::DeletedAndRenamed {
                table: table.to_string(),
                bone: bone.clone(),
            });
        }

        Ok(CanonicalMapping::from_parts(renames, deletion_set))
    }

    pub fn from_value(mapping: &CanonicalMapping) -> Self {
        let mut entries: IndexMap<String, MappingEntrySerial> = mapping
            .renames()
            .iter()
            .map(|(k, v)| (k.clone(), MappingEntrySerial::Rename(v.clone())))
            .collect();

        if !mapping.deletion_set().is_empty() {
            entries.insert(
                DELETE_KEY.to_string(),
                MappingEntrySerial::Delete(
                    mapping
                        .deletion_set()
                        .iter()
                        .map(|bone| (bone.clone(), true))
                        .collect(),
                ),
            );
        }

        Self(entries)
    }
}
