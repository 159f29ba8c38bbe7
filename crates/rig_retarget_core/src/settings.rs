use tracing::debug;

use crate::taxonomy::Taxonomy;

/// Result of [`ConversionSettings::set_target`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetChange {
    /// The value was stored and the change handler ran once.
    Changed { generation: u64 },
    /// Same value as before, the handler did not run.
    Unchanged,
    /// Requested from inside a running change handler and ignored.
    Suppressed,
}

/// Target rig selection shared between a UI and the convert command.
///
/// Change handlers may write back into the settings (hosts commonly refresh their option list
/// from inside the handler); such nested writes are dropped instead of recursing.
#[derive(Debug, Clone, Default)]
pub struct ConversionSettings {
    target: Option<Taxonomy>,
    generation: u64,
    updating: bool,
}

impl ConversionSettings {
    pub fn target(&self) -> Option<Taxonomy> {
        self.target
    }

    /// Bumped every time the target actually changes.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_target(
        &mut self,
        target: Option<Taxonomy>,
        on_change: impl FnOnce(&mut Self),
    ) -> TargetChange {
        if self.updating {
            debug!("Ignoring target change to {target:?} requested during a change notification");
            return TargetChange::Suppressed;
        }
        if self.target == target {
            return TargetChange::Unchanged;
        }

        self.target = target;
        self.generation += 1;
        let generation = self.generation;

        self.updating = true;
        on_change(self);
        self.updating = false;

        TargetChange::Changed { generation }
    }
}

/// Taxonomies a rig can be converted to: all of them except the one it already follows.
pub fn target_options(detected: Option<Taxonomy>) -> Vec<Taxonomy> {
    Taxonomy::ALL
        .into_iter()
        .filter(|taxonomy| Some(*taxonomy) != detected)
        .collect()
}
