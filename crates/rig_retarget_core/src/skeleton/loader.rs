use std::path::Path;

use ron::ser::PrettyConfig;

use super::{Skeleton, serial::SkeletonSerial};
use crate::{errors::ConfigurationError, mapping::FileFormat};

impl Skeleton {
    pub fn from_ron_str(ron: &str) -> Result<Self, ConfigurationError> {
        ron::de::from_str::<SkeletonSerial>(ron)?.to_value()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str::<SkeletonSerial>(json)?.to_value()
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigurationError> {
        Ok(ron::ser::to_string_pretty(
            &SkeletonSerial::from_value(self),
            PrettyConfig::default(),
        )?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let format = FileFormat::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;

        match format {
            FileFormat::Json => Self::from_json_str(&contents),
            FileFormat::Ron => Self::from_ron_str(&contents),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigurationError> {
        let path = path.as_ref();
        let contents = match FileFormat::from_path(path)? {
            FileFormat::Json => {
                serde_json::to_string_pretty(&SkeletonSerial::from_value(self))?
            }
            FileFormat::Ron => self.to_ron_string()?,
        };
        std::fs::write(path, contents)?;
        Ok(())
    }
}
