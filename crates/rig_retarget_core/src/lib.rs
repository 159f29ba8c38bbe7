//! # Rig Retarget
//!
//! Converts humanoid armatures between the Mixamo, VRoid and Move-One bone naming conventions
//! and copies poses between two armatures that share bone names.
//!
//! ## Mapping tables
//!
//! All conversions are derived from two canonical tables keyed by Mixamo bone names, usually
//! stored as JSON:
//! ```json
//! {
//!     "mixamo_moveone_mapping": { "Hips": "hips", "LeftUpLeg": "l_thigh" },
//!     "mixamo_vroid_mapping": {
//!         "Hips": "J_Bip_C_Hips",
//!         "LeftUpLeg": "J_Bip_L_UpperLeg",
//!         "delete": { "J_Sec_Hair1_01": true }
//!     }
//! }
//! ```
//! Mappings that do not involve Mixamo are composed through it. The `delete` set lists bones
//! with no counterpart, which are removed rather than renamed. A default set of tables ships
//! with the crate, see [`MappingTables::bundled`].
//!
//! ## Skeletons
//!
//! A [`Skeleton`] is a snapshot of an armature: a world placement and an ordered forest of
//! bones with parent-relative transforms. Skeletons can be stored in `*.skn.ron` files:
//! ```ron
//! (
//!     name: "character",
//!     placement: (translation: (5., 0., 0.)),
//!     bones: [
//!         (name: "Hips", transform: (translation: (0., 1., 0.))),
//!         (name: "Spine", parent: Some("Hips"), transform: (translation: (0., 0.1, 0.))),
//!     ],
//! )
//! ```
//!
//! ## Commands
//!
//! - [`convert_rig`] detects the convention of a skeleton, resolves the mapping to the requested
//!   one and applies it.
//! - [`match_rig_pose`] moves every bone of one skeleton onto the bone with the same name in
//!   another, compensating for the distance between the two.
//!
//! [`MappingTables::bundled`]: mapping::MappingTables::bundled
//! [`Skeleton`]: skeleton::Skeleton
//! [`convert_rig`]: commands::convert_rig
//! [`match_rig_pose`]: commands::match_rig_pose

pub mod align;
pub mod classifier;
pub mod commands;
pub mod convert;
pub mod errors;
pub mod mapping;
pub mod settings;
pub mod skeleton;
pub mod space_conversion;
pub mod taxonomy;

pub mod prelude {
    pub use crate::{
        align::{AlignConfig, AlignmentReport, BoneAlignment, align},
        classifier::{Classification, DETECTION_THRESHOLD, classify, detect},
        commands::{ConversionOutcome, convert_rig, match_rig_pose},
        convert::{ConversionReport, convert},
        errors::{AlignmentSkip, CommandError, ConfigurationError, PreconditionError},
        mapping::{CanonicalMapping, MappingTables, ResolvedMapping, resolve},
        settings::{ConversionSettings, TargetChange, target_options},
        skeleton::{Bone, BoneId, Skeleton},
        space_conversion::SpaceConversion,
        taxonomy::Taxonomy,
    };
}
