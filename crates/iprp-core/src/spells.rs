//! Selecting spells.2da rows that need an iprp_spells entry

use crate::error::Result;
use crate::resources::ResourceProvider;
use crate::table::SENTINEL;
use serde::{Deserialize, Serialize};

pub const SPELLS_TABLE: &str = "spells";
pub const IPRP_SPELLS_TABLE: &str = "iprp_spells";

/// An otherwise usable spell without an innate level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingInnate {
    /// Row index in spells.2da
    pub row: u32,
    /// Localized spell name
    pub name: String,
}

impl std::fmt::Display for MissingInnate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WARNING: Spell ID #{} (\"{}\") has no innate level.",
            self.row, self.name
        )
    }
}

/// Output of the candidate scan
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Spell row indices in table order
    pub candidates: Vec<u32>,
    /// Rows skipped for lacking an innate level
    pub warnings: Vec<MissingInnate>,
}

/// Output of the exclusion pass
#[derive(Debug, Clone)]
pub struct Exclusion {
    /// Candidates with no iprp_spells entry yet, in original order
    pub missing: Vec<u32>,
    /// Candidate count before filtering
    pub candidates_before: usize,
    /// Row count of iprp_spells; the first new row takes this index
    pub existing_rows: u32,
}

/// Scan spells.2da for rows that are not removed, named, not feats, and have an innate level
pub fn select_candidates<P: ResourceProvider + ?Sized>(resources: &P) -> Result<Selection> {
    let count = resources.row_count(SPELLS_TABLE)?;
    let mut selection = Selection::default();

    for row in 0..count {
        if resources.get_bool(SPELLS_TABLE, "REMOVED", row)? {
            continue;
        }

        if resources.get_string(SPELLS_TABLE, "Name", row)? == SENTINEL {
            continue;
        }

        // Spells bound to a feat are feat abilities, not castable spells
        if resources.get_string(SPELLS_TABLE, "FeatID", row)? != SENTINEL {
            continue;
        }

        if resources.get_string(SPELLS_TABLE, "Innate", row)? == SENTINEL {
            let name = spell_display_name(resources, row)?;
            tracing::debug!(row, name = %name, "spell has no innate level");
            selection.warnings.push(MissingInnate { row, name });
            continue;
        }

        selection.candidates.push(row);
    }

    tracing::debug!(
        candidates = selection.candidates.len(),
        warnings = selection.warnings.len(),
        "candidate scan complete"
    );
    Ok(selection)
}

/// Localized name of a spell, or the raw Name cell when it is not a strref
fn spell_display_name<P: ResourceProvider + ?Sized>(resources: &P, row: u32) -> Result<String> {
    match resources.get_uint(SPELLS_TABLE, "Name", row) {
        Ok(strref) => resources.talk_string(strref),
        Err(_) => resources.get_string(SPELLS_TABLE, "Name", row),
    }
}

/// Drop candidates that already have an iprp_spells row
///
/// Each iprp_spells row removes the first candidate equal to its SpellIndex.
/// Rows with a `****` SpellIndex reference no spell.
pub fn exclude_existing<P: ResourceProvider + ?Sized>(
    resources: &P,
    candidates: Vec<u32>,
) -> Result<Exclusion> {
    let existing_rows = resources.row_count(IPRP_SPELLS_TABLE)?;
    let candidates_before = candidates.len();
    let mut missing = candidates;

    for row in 0..existing_rows {
        if resources.get_string(IPRP_SPELLS_TABLE, "SpellIndex", row)? == SENTINEL {
            tracing::debug!(row, "iprp_spells row has no spell index");
            continue;
        }

        let spell = resources.get_uint(IPRP_SPELLS_TABLE, "SpellIndex", row)?;
        if let Some(pos) = missing.iter().position(|&c| c == spell) {
            missing.remove(pos);
        }
    }

    Ok(Exclusion {
        missing,
        candidates_before,
        existing_rows,
    })
}
