#![forbid(unsafe_code)]

//! Portable macro steps.
//!
//! A [`MacroAction`] carries no snapshots and no sheet or view ids. Document
//! steps name their view and express position as offsets; structural steps
//! point at sheets through a [`SheetTarget`]. A [`MacroItem`] is the
//! immutable, named sequence produced by the recorder.

use gridlog_core::{BorderSpec, CellCoord, CellRange, CellStyle, CellValue, ClearMode, MergeDirection};
use web_time::SystemTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::offset::{ActiveCellOffset, ReferenceMode, SelectionOffset};
use crate::history::{ActionKind, EditOp};
use crate::ids::{MacroActionId, MacroId};

/// A cell-level edit with its location stripped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "effect", rename_all = "snake_case"))]
pub enum CellEffect {
    /// Applied to the step's active cell.
    SetValue { value: CellValue },
    Clear { mode: ClearMode },
    Style { style: CellStyle },
    Borders { borders: BorderSpec },
    Merge { direction: MergeDirection },
    Unmerge,
    /// Moves the cursor and changes nothing else.
    Select,
}

impl CellEffect {
    #[must_use]
    pub fn from_op(op: &EditOp) -> Self {
        match op {
            EditOp::SetValue { value, .. } => Self::SetValue {
                value: value.clone(),
            },
            EditOp::Clear { mode, .. } => Self::Clear { mode: *mode },
            EditOp::Style { style, .. } => Self::Style {
                style: style.clone(),
            },
            EditOp::Borders { borders, .. } => Self::Borders { borders: *borders },
            EditOp::Merge { direction, .. } => Self::Merge {
                direction: *direction,
            },
            EditOp::Unmerge { .. } => Self::Unmerge,
        }
    }

    /// Place the effect: value edits land on `active`, everything else on
    /// `selection`. `None` for [`CellEffect::Select`].
    #[must_use]
    pub fn at(&self, active: CellCoord, selection: CellRange) -> Option<EditOp> {
        let op = match self {
            Self::Select => return None,
            Self::SetValue { value } => EditOp::SetValue {
                cell: active,
                value: value.clone(),
            },
            Self::Clear { mode } => EditOp::Clear {
                range: selection,
                mode: *mode,
            },
            Self::Style { style } => EditOp::Style {
                range: selection,
                style: style.clone(),
            },
            Self::Borders { borders } => EditOp::Borders {
                range: selection,
                borders: *borders,
            },
            Self::Merge { direction } => EditOp::Merge {
                range: selection,
                direction: *direction,
            },
            Self::Unmerge => EditOp::Unmerge { range: selection },
        };
        Some(op)
    }
}

/// How a structural step finds its sheet on replay.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SheetTarget {
    /// Whatever sheet is active when the step runs.
    Active,
    /// The sheet carrying this name when the step runs.
    Named(String),
    /// The n-th sheet created (or duplicated) earlier in the same macro.
    Created(usize),
}

/// A recorded cell-level step.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DocumentStep {
    pub view_name: String,
    pub selection: SelectionOffset,
    pub active_cell: ActiveCellOffset,
    pub effect: CellEffect,
}

/// A recorded sheet lifecycle step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "snake_case"))]
pub enum SheetStep {
    Create { after: Option<SheetTarget> },
    Delete { sheet: SheetTarget },
    Duplicate { sheet: SheetTarget },
    Rename { sheet: SheetTarget, name: String },
    Reorder { from: usize, to: usize },
    Activate { sheet: SheetTarget },
}

impl SheetStep {
    /// True for steps that bring a new sheet into existence.
    #[must_use]
    pub fn creates_sheet(&self) -> bool {
        matches!(self, Self::Create { .. } | Self::Duplicate { .. })
    }
}

/// What a macro step does.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MacroStep {
    Document(DocumentStep),
    Structural(SheetStep),
}

/// One step of a macro.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MacroAction {
    pub id: MacroActionId,
    pub state: MacroStep,
}

impl MacroAction {
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self.state {
            MacroStep::Document(_) => ActionKind::Document,
            MacroStep::Structural(_) => ActionKind::Structural,
        }
    }
}

/// A named, recorded macro.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MacroItem {
    id: MacroId,
    name: String,
    #[cfg_attr(feature = "serde", serde(skip, default = "SystemTime::now"))]
    created_at: SystemTime,
    owner: String,
    reference_mode: ReferenceMode,
    actions: Vec<MacroAction>,
}

impl MacroItem {
    pub(crate) fn new(
        id: MacroId,
        name: String,
        owner: String,
        reference_mode: ReferenceMode,
        actions: Vec<MacroAction>,
    ) -> Self {
        Self {
            id,
            name,
            created_at: SystemTime::now(),
            owner,
            reference_mode,
            actions,
        }
    }

    #[must_use]
    pub fn id(&self) -> MacroId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn reference_mode(&self) -> ReferenceMode {
        self.reference_mode
    }

    #[must_use]
    pub fn actions(&self) -> &[MacroAction] {
        &self.actions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_round_trips_through_op() {
        let range = CellRange::parse_a1("B2:C3").unwrap();
        let op = EditOp::Merge {
            range,
            direction: MergeDirection::Horizontal,
        };
        let effect = CellEffect::from_op(&op);
        assert_eq!(effect.at(CellCoord::ORIGIN, range), Some(op));
    }

    #[test]
    fn test_value_effect_targets_active_cell() {
        let effect = CellEffect::SetValue { value: 3.into() };
        let op = effect.at(
            CellCoord::new(4, 1),
            CellRange::parse_a1("A1:D9").unwrap(),
        );
        assert_eq!(op.expect("value effect yields an op").range(), CellRange::single(CellCoord::new(4, 1)));
    }

    #[test]
    fn test_creating_steps() {
        assert!(SheetStep::Create { after: None }.creates_sheet());
        assert!(
            SheetStep::Duplicate {
                sheet: SheetTarget::Active
            }
            .creates_sheet()
        );
        assert!(!SheetStep::Reorder { from: 0, to: 1 }.creates_sheet());
    }
}
