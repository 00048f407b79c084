//! Deriving and writing new iprp_spells rows

use crate::error::{ResourceError, Result};
use crate::resources::ResourceProvider;
use crate::spells::SPELLS_TABLE;
use std::io::Write;

/// Gold cost per innate level per caster level
pub const COST_FACTOR: u64 = 360;
/// Highest innate level usable in a potion
pub const MAX_POTION_INNATE: u32 = 3;
/// Highest innate level usable in a wand
pub const MAX_WAND_INNATE: u32 = 4;

/// One row to append to iprp_spells.2da
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IprpSpellRow {
    pub index: u32,
    pub label: String,
    pub name: String,
    pub caster_level: u64,
    pub innate_level: u32,
    pub cost: u64,
    pub spell_index: u32,
    pub potion_use: bool,
    pub wand_use: bool,
    pub general_use: bool,
    pub icon: String,
}

impl IprpSpellRow {
    /// Build a row, deriving caster level, cost and use flags from the innate level
    ///
    /// Returns `None` when the cost does not fit in a `u64`.
    pub fn derive(
        index: u32,
        spell_index: u32,
        label: String,
        name: String,
        icon: String,
        innate_level: u32,
    ) -> Option<Self> {
        let caster_level = caster_level(innate_level);
        let cost = u64::from(innate_level)
            .checked_mul(caster_level)?
            .checked_mul(COST_FACTOR)?;

        Some(Self {
            index,
            label,
            name,
            caster_level,
            innate_level,
            cost,
            spell_index,
            potion_use: innate_level <= MAX_POTION_INNATE,
            wand_use: innate_level <= MAX_WAND_INNATE,
            general_use: true,
            icon,
        })
    }
}

/// Caster level for an innate level: 0 for cantrips, otherwise `2n - 1`
pub fn caster_level(innate_level: u32) -> u64 {
    if innate_level == 0 {
        0
    } else {
        u64::from(innate_level) * 2 - 1
    }
}

impl std::fmt::Display for IprpSpellRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}_({}) {} {} {} {} {} {} {} {} {}",
            self.index,
            self.label,
            self.caster_level,
            self.name,
            self.caster_level,
            self.innate_level,
            self.cost,
            self.spell_index,
            u8::from(self.potion_use),
            u8::from(self.wand_use),
            u8::from(self.general_use),
            self.icon
        )
    }
}

/// Writes rows with contiguous indices following the existing table
pub struct RowEmitter<W: Write> {
    writer: W,
    next_index: u32,
}

impl<W: Write> RowEmitter<W> {
    /// Start numbering at the existing table's row count
    pub fn new(writer: W, first_index: u32) -> Self {
        Self {
            writer,
            next_index: first_index,
        }
    }

    /// Read a spell, derive its row and write it
    pub fn emit<P: ResourceProvider + ?Sized>(
        &mut self,
        resources: &P,
        spell_index: u32,
    ) -> Result<IprpSpellRow> {
        let innate = resources.get_uint(SPELLS_TABLE, "Innate", spell_index)?;
        let row = IprpSpellRow::derive(
            self.next_index,
            spell_index,
            resources.get_string(SPELLS_TABLE, "Label", spell_index)?,
            resources.get_string(SPELLS_TABLE, "Name", spell_index)?,
            resources.get_string(SPELLS_TABLE, "IconResRef", spell_index)?,
            innate,
        )
        .ok_or_else(|| ResourceError::InvalidValue {
            table: SPELLS_TABLE.to_string(),
            column: "Innate".to_string(),
            row: spell_index,
            value: innate.to_string(),
            expected: "innate level with a cost that fits in 64 bits",
        })?;

        writeln!(self.writer, "{}", row)?;
        tracing::debug!(index = row.index, spell = spell_index, label = %row.label, "wrote row");

        self.next_index += 1;
        Ok(row)
    }

    /// Flush and return the writer
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Write one row per missing spell, in order
pub fn write_rows<P, W>(resources: &P, missing: &[u32], first_index: u32, writer: W) -> Result<W>
where
    P: ResourceProvider + ?Sized,
    W: Write,
{
    let mut emitter = RowEmitter::new(writer, first_index);
    for &spell in missing {
        emitter.emit(resources, spell)?;
    }
    emitter.finish()
}
