use std::path::Path;

use tracing::{error, warn};

use super::{MappingTables, serial::MappingTablesSerial};
use crate::errors::ConfigurationError;

const BUNDLED_TABLES: &str = include_str!("../../assets/bone_mappings.json");

/// Serialization formats accepted for mapping tables and skeleton files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Ron,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigurationError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigurationError::UnsupportedExtension(
                path.display().to_string(),
            )),
        }
    }
}

impl MappingTables {
    /// Tables shipped with the crate, covering the standard humanoid bones of each rig type.
    pub fn bundled() -> Result<Self, ConfigurationError> {
        Self::from_json_str(BUNDLED_TABLES)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str::<MappingTablesSerial>(json)?.to_value()
    }

    pub fn from_ron_str(ron: &str) -> Result<Self, ConfigurationError> {
        ron::de::from_str::<MappingTablesSerial>(ron)?.to_value()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;

        let tables = match format {
            FileFormat::Json => Self::from_json_str(&contents)?,
            FileFormat::Ron => Self::from_ron_str(&contents)?,
        };

        if tables.is_empty() {
            warn!("Mapping file {} contains no canonical tables", path.display());
        }

        Ok(tables)
    }

    /// Like [`MappingTables::load`], but a missing or malformed file degrades to empty tables
    /// (every mapping then resolves to a no-op).
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|err| {
            error!("Could not load bone mappings from {}: {err}", path.display());
            Self::default()
        })
    }

    pub fn to_json_string(&self) -> Result<String, ConfigurationError> {
        Ok(serde_json::to_string_pretty(
            &MappingTablesSerial::from_value(self),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Taxonomy;

    #[test]
    fn bundled_tables_parse() {
        let tables = MappingTables::bundled().unwrap();
        let vroid = tables.table_for(Taxonomy::Vroid).unwrap();
        let moveone = tables.table_for(Taxonomy::MoveOne).unwrap();

        assert_eq!(vroid.renames()["Hips"], "J_Bip_C_Hips");
        assert!(!vroid.deletion_set().is_empty());
        assert!(moveone.deletion_set().is_empty());
        assert_eq!(
            vroid.pivot_names().count(),
            moveone.pivot_names().count()
        );
    }

    #[test]
    fn ron_and_json_agree() {
        let json = MappingTables::from_json_str(
            r#"{"mixamo_vroid_mapping": {"Hips": "J_Bip_C_Hips", "delete": {"J_Sec_Hair": true}}}"#,
        )
        .unwrap();
        let ron = MappingTables::from_ron_str(
            r#"(mixamo_vroid_mapping: Some({"Hips": "J_Bip_C_Hips", "delete": {"J_Sec_Hair": true}}))"#,
        )
        .unwrap();

        assert_eq!(json, ron);
        assert!(json.mixamo_moveone.is_none());
    }

    #[test]
    fn json_output_reloads() {
        let tables = MappingTables::bundled().unwrap();
        let reloaded = MappingTables::from_json_str(&tables.to_json_string().unwrap()).unwrap();
        assert_eq!(tables, reloaded);
    }

    #[test]
    fn missing_file_degrades_to_empty_tables() {
        let tables = MappingTables::load_or_empty("/definitely/not/here/bone_mappings.json");
        assert!(tables.is_empty());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(matches!(
            MappingTables::load("bone_mappings.yaml"),
            Err(ConfigurationError::UnsupportedExtension(_))
        ));
    }
}
