use tracing::info;

use crate::{
    align::{AlignConfig, AlignmentReport, align},
    classifier::detect,
    convert::{ConversionReport, convert},
    errors::{CommandError, PreconditionError},
    mapping::{MappingTables, resolve},
    skeleton::Skeleton,
    taxonomy::Taxonomy,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutcome {
    pub source: Taxonomy,
    pub target: Taxonomy,
    pub report: ConversionReport,
}

/// Converts `skeleton` to the `target` naming convention.
///
/// The source convention is detected from the bone names unless `source_override` is given.
/// Fails without touching the skeleton when no target is selected, the source cannot be
/// determined, or the skeleton already follows the target convention.
pub fn convert_rig(
    skeleton: &mut Skeleton,
    tables: &MappingTables,
    target: Option<Taxonomy>,
    source_override: Option<Taxonomy>,
) -> Result<ConversionOutcome, CommandError> {
    let target = target.ok_or(PreconditionError::NoTarget)?;

    let source = match source_override {
        Some(source) => source,
        None => detect(skeleton, tables)?
            .taxonomy
            .ok_or_else(|| PreconditionError::UnknownSourceRig(skeleton.name().to_string()))?,
    };

    if source == target {
        return Err(PreconditionError::AlreadyTarget {
            skeleton: skeleton.name().to_string(),
            taxonomy: target,
        }
        .into());
    }

    info!("Converting `{}` from {source} to {target}", skeleton.name());

    let mapping = resolve(source, target, tables);
    let report = convert(skeleton, &mapping);

    Ok(ConversionOutcome {
        source,
        target,
        report,
    })
}

/// Matches the pose of `active` to `source`. Both must be distinct skeletons.
pub fn match_rig_pose(
    active: &mut Skeleton,
    source: &Skeleton,
    config: &AlignConfig,
) -> Result<AlignmentReport, CommandError> {
    if active.id() == source.id() {
        return Err(PreconditionError::SameSkeleton(active.name().to_string()).into());
    }

    info!("Active object: {}", active.name());
    info!("Target object: {}", source.name());

    let report = align(active, source, config);

    info!("All bones aligned");
    Ok(report)
}
