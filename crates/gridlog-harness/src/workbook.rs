#![forbid(unsafe_code)]

//! In-memory workbook implementing the document and view traits.
//!
//! [`MemoryWorkbook`] is a small but faithful spreadsheet model: sheets in
//! tab order, named views with their own cursors, cell values, styles,
//! per-edge borders, and merged regions. It is the fixture every history and
//! macro test runs against, and the document behind the harness CLI.
//!
//! # Fault injection
//!
//! [`fail_next`](MemoryWorkbook::fail_next) arms a one-shot failure for a
//! [`FailPoint`]; the next call through that point returns the error and
//! leaves the workbook untouched. An [`ActivationMode`] makes sheet and view
//! switches resolve from another thread, or abandons them outright.
//!
//! # Invariants
//!
//! 1. There is always at least one sheet, and every sheet has at least one
//!    view.
//! 2. Sheet names are unique.
//! 3. Merged regions on a sheet never overlap.

use std::collections::{BTreeMap, HashMap};

use gridlog_core::{
    Activation, BorderEdges, BorderLine, BorderSpec, CellBorders, CellCoord, CellRange,
    CellSnapshot, CellStyle, CellValue, ClearMode, CursorState, DocResult, DocumentApi,
    DocumentError, MergeDirection, RangeSnapshot, SheetId, SheetInfo, SheetSnapshot, ViewId,
    ViewRef, ViewResolver,
};

/// Document calls that can be made to fail on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    SetValue,
    Clear,
    Style,
    Borders,
    Merge,
    Unmerge,
    RestoreRange,
    CreateSheet,
    DeleteSheet,
    DuplicateSheet,
    RenameSheet,
    ReorderSheet,
    ActivateSheet,
    RestoreSheet,
    SwitchView,
    SetCursor,
}

/// How sheet and view switches report readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivationMode {
    /// Ready as soon as the call returns.
    #[default]
    Immediate,
    /// Completed by a spawned thread.
    Deferred,
    /// The readiness signal is dropped, so waiting fails.
    Abandoned,
}

/// Comparable state of the whole workbook, cursors excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookState {
    pub active: SheetId,
    pub sheets: Vec<SheetSnapshot>,
}

#[derive(Debug, Clone, Default)]
struct CellData {
    value: CellValue,
    style: CellStyle,
    borders: CellBorders,
}

impl CellData {
    fn is_blank(&self) -> bool {
        self.value.is_empty() && self.style.is_empty() && self.borders.is_empty()
    }
}

#[derive(Debug, Clone)]
struct ViewState {
    view: ViewRef,
    cursor: CursorState,
}

#[derive(Debug, Clone)]
struct SheetState {
    id: SheetId,
    name: String,
    views: Vec<ViewState>,
    active_view: usize,
    /// Keyed by `(row, col)` so iteration is row-major.
    cells: BTreeMap<(u32, u32), CellData>,
    /// Sorted by corners, so restoring a snapshot never reorders them.
    merges: Vec<CellRange>,
}

impl SheetState {
    fn add_merges(&mut self, regions: impl IntoIterator<Item = CellRange>) {
        self.merges.extend(regions);
        self.merges.sort_by_key(|m| (m.start, m.end));
    }

    fn view(&self) -> &ViewState {
        let index = self.active_view.min(self.views.len().saturating_sub(1));
        &self.views[index]
    }

    fn view_mut(&mut self) -> &mut ViewState {
        let index = self.active_view.min(self.views.len().saturating_sub(1));
        &mut self.views[index]
    }

    fn cell_mut(&mut self, cell: CellCoord) -> &mut CellData {
        self.cells.entry((cell.row, cell.col)).or_default()
    }

    fn prune(&mut self, cell: CellCoord) {
        if self
            .cells
            .get(&(cell.row, cell.col))
            .is_some_and(CellData::is_blank)
        {
            self.cells.remove(&(cell.row, cell.col));
        }
    }

    fn snapshot_cells(&self, range: Option<CellRange>) -> Vec<CellSnapshot> {
        self.cells
            .iter()
            .map(|(&(row, col), data)| (CellCoord::new(row, col), data))
            .filter(|(coord, _)| range.is_none_or(|r| r.contains(*coord)))
            .map(|(coord, data)| CellSnapshot {
                coord,
                value: data.value.clone(),
                style: data.style.clone(),
                borders: data.borders,
            })
            .collect()
    }

    fn view_refs(&self) -> Vec<ViewRef> {
        self.views.iter().map(|v| v.view.clone()).collect()
    }
}

/// A spreadsheet held entirely in memory.
#[derive(Debug)]
pub struct MemoryWorkbook {
    sheets: Vec<SheetState>,
    active: SheetId,
    next_sheet: u64,
    next_view: u64,
    refreshes: usize,
    faults: HashMap<FailPoint, DocumentError>,
    activation: ActivationMode,
}

impl Default for MemoryWorkbook {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryWorkbook {
    /// One sheet, `Sheet1`, with a single view named `main`.
    #[must_use]
    pub fn new() -> Self {
        let mut book = Self {
            sheets: Vec::new(),
            active: SheetId(1),
            next_sheet: 1,
            next_view: 1,
            refreshes: 0,
            faults: HashMap::new(),
            activation: ActivationMode::Immediate,
        };
        let sheet = book.new_sheet_state("Sheet1".to_string());
        book.active = sheet.id;
        book.sheets.push(sheet);
        book
    }

    /// A workbook whose sheets carry `names`, in order. The first is active.
    #[must_use]
    pub fn with_sheets(names: &[&str]) -> Self {
        let mut book = Self::new();
        if let Some((first, rest)) = names.split_first() {
            book.sheets[0].name = (*first).to_string();
            for name in rest {
                let sheet = book.new_sheet_state((*name).to_string());
                book.sheets.push(sheet);
            }
        }
        book
    }

    fn new_sheet_state(&mut self, name: String) -> SheetState {
        let id = SheetId(self.next_sheet);
        self.next_sheet += 1;
        let view = self.new_view(id, "main");
        SheetState {
            id,
            name,
            views: vec![view],
            active_view: 0,
            cells: BTreeMap::new(),
            merges: Vec::new(),
        }
    }

    fn new_view(&mut self, sheet: SheetId, name: &str) -> ViewState {
        let id = ViewId(self.next_view);
        self.next_view += 1;
        ViewState {
            view: ViewRef::new(id, sheet, name),
            cursor: CursorState::default(),
        }
    }

    // ========================================================================
    // Fixture controls
    // ========================================================================

    /// Make the next call through `point` fail with `error`.
    pub fn fail_next(&mut self, point: FailPoint, error: DocumentError) {
        self.faults.insert(point, error);
    }

    /// Make the next `restore_range` fail with `error`.
    pub fn fail_next_restore(&mut self, error: DocumentError) {
        self.fail_next(FailPoint::RestoreRange, error);
    }

    pub fn set_activation_mode(&mut self, mode: ActivationMode) {
        self.activation = mode;
    }

    fn check(&mut self, point: FailPoint) -> DocResult<()> {
        match self.faults.remove(&point) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn activation(&self) -> Activation {
        match self.activation {
            ActivationMode::Immediate => Activation::ready(),
            ActivationMode::Deferred => {
                let (activation, signal) = Activation::pending();
                std::thread::spawn(move || signal.complete());
                activation
            }
            ActivationMode::Abandoned => {
                let (activation, signal) = Activation::pending();
                drop(signal);
                activation
            }
        }
    }

    /// Number of `request_refresh` calls so far.
    #[must_use]
    pub fn refresh_count(&self) -> usize {
        self.refreshes
    }

    /// Add a view named `name` to `sheet`. `None` if the sheet is unknown.
    pub fn add_view(&mut self, sheet: SheetId, name: &str) -> Option<ViewRef> {
        let index = self.position(sheet).ok()?;
        let view = self.new_view(sheet, name);
        let handle = view.view.clone();
        self.sheets[index].views.push(view);
        Some(handle)
    }

    /// Switch to `view` (and its sheet) immediately. `false` if it does not
    /// exist.
    pub fn switch_to(&mut self, view: &ViewRef) -> bool {
        let Ok(index) = self.position(view.sheet_id) else {
            return false;
        };
        let Some(slot) = self.sheets[index]
            .views
            .iter()
            .position(|v| v.view.id == view.id)
        else {
            return false;
        };
        self.sheets[index].active_view = slot;
        self.active = view.sheet_id;
        true
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    #[must_use]
    pub fn active_sheet_id(&self) -> SheetId {
        self.active
    }

    /// The active view of the active sheet.
    #[must_use]
    pub fn active_view_ref(&self) -> ViewRef {
        self.active_state().view().view.clone()
    }

    /// Set a value on the active sheet without going through the history.
    pub fn set_value(&mut self, cell: CellCoord, value: impl Into<CellValue>) {
        let sheet = self.active_state_mut();
        sheet.cell_mut(cell).value = value.into();
        sheet.prune(cell);
    }

    /// Value of `cell` on the active sheet.
    #[must_use]
    pub fn value(&self, cell: CellCoord) -> CellValue {
        self.value_in(self.active, cell)
    }

    /// Value of `cell` on `sheet` (`Empty` for unknown sheets).
    #[must_use]
    pub fn value_in(&self, sheet: SheetId, cell: CellCoord) -> CellValue {
        self.sheets
            .iter()
            .find(|s| s.id == sheet)
            .and_then(|s| s.cells.get(&(cell.row, cell.col)))
            .map(|data| data.value.clone())
            .unwrap_or_default()
    }

    /// Style of `cell` on the active sheet.
    #[must_use]
    pub fn style(&self, cell: CellCoord) -> CellStyle {
        self.active_state()
            .cells
            .get(&(cell.row, cell.col))
            .map(|data| data.style.clone())
            .unwrap_or_default()
    }

    /// Borders of `cell` on the active sheet.
    #[must_use]
    pub fn borders(&self, cell: CellCoord) -> CellBorders {
        self.active_state()
            .cells
            .get(&(cell.row, cell.col))
            .map(|data| data.borders)
            .unwrap_or_default()
    }

    /// Sheet names in tab order.
    #[must_use]
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    /// Non-empty values of a sheet in row-major order.
    #[must_use]
    pub fn values(&self, sheet: SheetId) -> Vec<(CellCoord, CellValue)> {
        self.sheets
            .iter()
            .find(|s| s.id == sheet)
            .map(|s| {
                s.cells
                    .iter()
                    .filter(|(_, data)| !data.value.is_empty())
                    .map(|(&(row, col), data)| (CellCoord::new(row, col), data.value.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Everything except cursors, for before/after comparisons.
    #[must_use]
    pub fn state(&self) -> WorkbookState {
        WorkbookState {
            active: self.active,
            sheets: self
                .sheets
                .iter()
                .enumerate()
                .map(|(index, sheet)| self.snapshot_of(index, sheet))
                .collect(),
        }
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn position(&self, id: SheetId) -> DocResult<usize> {
        self.sheets
            .iter()
            .position(|s| s.id == id)
            .ok_or(DocumentError::SheetNotFound(id))
    }

    fn active_index(&self) -> usize {
        self.sheets
            .iter()
            .position(|s| s.id == self.active)
            .unwrap_or(0)
    }

    fn active_state(&self) -> &SheetState {
        &self.sheets[self.active_index()]
    }

    fn active_state_mut(&mut self) -> &mut SheetState {
        let index = self.active_index();
        &mut self.sheets[index]
    }

    fn info(&self, index: usize) -> SheetInfo {
        let sheet = &self.sheets[index];
        SheetInfo {
            id: sheet.id,
            name: sheet.name.clone(),
            index,
            primary_view: sheet.views[0].view.clone(),
        }
    }

    fn snapshot_of(&self, index: usize, sheet: &SheetState) -> SheetSnapshot {
        SheetSnapshot {
            info: self.info(index),
            views: sheet.view_refs(),
            cells: sheet.snapshot_cells(None),
            merges: sheet.merges.clone(),
        }
    }

    fn name_taken(&self, name: &str, except: Option<SheetId>) -> bool {
        self.sheets
            .iter()
            .any(|s| s.name == name && Some(s.id) != except)
    }

    fn fresh_name(&self) -> String {
        (self.sheets.len() + 1..)
            .map(|n| format!("Sheet{n}"))
            .find(|name| !self.name_taken(name, None))
            .unwrap_or_else(|| format!("Sheet{}", self.next_sheet))
    }

    fn copy_name(&self, base: &str) -> String {
        (2..)
            .map(|n| format!("{base} ({n})"))
            .find(|name| !self.name_taken(name, None))
            .unwrap_or_else(|| format!("{base} ({})", self.next_sheet))
    }

    fn for_each_cell(
        &mut self,
        range: CellRange,
        mut f: impl FnMut(&mut CellData, CellCoord),
    ) {
        let sheet = self.active_state_mut();
        for cell in range.cells() {
            f(sheet.cell_mut(cell), cell);
            sheet.prune(cell);
        }
    }
}

/// Which edges of `cell` a border request touches inside `range`.
fn edges_for(range: CellRange, cell: CellCoord, edges: BorderEdges) -> [bool; 4] {
    let first_row = cell.row == range.start.row;
    let last_row = cell.row == range.end.row;
    let first_col = cell.col == range.start.col;
    let last_col = cell.col == range.end.col;
    // [top, bottom, left, right]
    match edges {
        BorderEdges::All => [true; 4],
        BorderEdges::Outer => [first_row, last_row, first_col, last_col],
        BorderEdges::Inner => [!first_row, !last_row, !first_col, !last_col],
        BorderEdges::Top => [first_row, false, false, false],
        BorderEdges::Bottom => [false, last_row, false, false],
        BorderEdges::Left => [false, false, first_col, false],
        BorderEdges::Right => [false, false, false, last_col],
    }
}

fn merge_regions(range: CellRange, direction: MergeDirection) -> Vec<CellRange> {
    match direction {
        MergeDirection::All => vec![range],
        MergeDirection::Horizontal => (range.start.row..=range.end.row)
            .map(|row| {
                CellRange::new(
                    CellCoord::new(row, range.start.col),
                    CellCoord::new(row, range.end.col),
                )
            })
            .collect(),
        MergeDirection::Vertical => (range.start.col..=range.end.col)
            .map(|col| {
                CellRange::new(
                    CellCoord::new(range.start.row, col),
                    CellCoord::new(range.end.row, col),
                )
            })
            .collect(),
    }
}

// ============================================================================
// DocumentApi
// ============================================================================

impl DocumentApi for MemoryWorkbook {
    fn set_cell_value(&mut self, cell: CellCoord, value: &CellValue) -> DocResult<()> {
        self.check(FailPoint::SetValue)?;
        let sheet = self.active_state_mut();
        sheet.cell_mut(cell).value = value.clone();
        sheet.prune(cell);
        Ok(())
    }

    fn clear_cells(&mut self, range: CellRange, mode: ClearMode) -> DocResult<()> {
        self.check(FailPoint::Clear)?;
        self.for_each_cell(range, |data, _| match mode {
            ClearMode::Content => data.value = CellValue::Empty,
            ClearMode::Format => {
                data.style = CellStyle::default();
                data.borders = CellBorders::default();
            }
        });
        Ok(())
    }

    fn apply_style(&mut self, range: CellRange, style: &CellStyle) -> DocResult<()> {
        self.check(FailPoint::Style)?;
        self.for_each_cell(range, |data, _| data.style = data.style.merge(style));
        Ok(())
    }

    fn apply_borders(&mut self, range: CellRange, borders: &BorderSpec) -> DocResult<()> {
        self.check(FailPoint::Borders)?;
        let line = match borders.style {
            BorderLine::None => None,
            style => Some((style, borders.color)),
        };
        self.for_each_cell(range, |data, cell| {
            let [top, bottom, left, right] = edges_for(range, cell, borders.edges);
            if top {
                data.borders.top = line;
            }
            if bottom {
                data.borders.bottom = line;
            }
            if left {
                data.borders.left = line;
            }
            if right {
                data.borders.right = line;
            }
        });
        Ok(())
    }

    fn merge_cells(&mut self, range: CellRange, direction: MergeDirection) -> DocResult<()> {
        self.check(FailPoint::Merge)?;
        let regions: Vec<CellRange> = merge_regions(range, direction)
            .into_iter()
            .filter(|r| !r.is_single_cell())
            .collect();
        let sheet = self.active_state_mut();
        if regions
            .iter()
            .any(|r| sheet.merges.iter().any(|m| m.intersects(r)))
        {
            return Err(DocumentError::MergeConflict(range));
        }
        for region in &regions {
            for cell in region.cells().filter(|c| *c != region.start) {
                sheet.cell_mut(cell).value = CellValue::Empty;
                sheet.prune(cell);
            }
        }
        sheet.add_merges(regions);
        Ok(())
    }

    fn unmerge_cells(&mut self, range: CellRange) -> DocResult<()> {
        self.check(FailPoint::Unmerge)?;
        self.active_state_mut()
            .merges
            .retain(|m| !m.intersects(&range));
        Ok(())
    }

    fn current_merged_cells(&self) -> Vec<CellRange> {
        self.active_state().merges.clone()
    }

    fn snapshot_range(&self, range: CellRange) -> DocResult<RangeSnapshot> {
        let sheet = self.active_state();
        Ok(RangeSnapshot {
            range,
            cells: sheet.snapshot_cells(Some(range)),
            merges: sheet
                .merges
                .iter()
                .filter(|m| m.intersects(&range))
                .copied()
                .collect(),
        })
    }

    fn restore_range(&mut self, snapshot: &RangeSnapshot) -> DocResult<()> {
        self.check(FailPoint::RestoreRange)?;
        let range = snapshot.range;
        let sheet = self.active_state_mut();
        sheet.cells.retain(|&(row, col), _| !range.contains(CellCoord::new(row, col)));
        sheet.merges.retain(|m| !m.intersects(&range));
        for cell in &snapshot.cells {
            let data = CellData {
                value: cell.value.clone(),
                style: cell.style.clone(),
                borders: cell.borders,
            };
            if !data.is_blank() {
                sheet.cells.insert((cell.coord.row, cell.coord.col), data);
            }
        }
        sheet.add_merges(snapshot.merges.iter().copied());
        Ok(())
    }

    fn sheets(&self) -> Vec<SheetInfo> {
        (0..self.sheets.len()).map(|i| self.info(i)).collect()
    }

    fn active_sheet(&self) -> SheetId {
        self.active
    }

    fn create_sheet(&mut self, after: Option<SheetId>) -> DocResult<SheetInfo> {
        self.check(FailPoint::CreateSheet)?;
        let index = match after {
            Some(id) => self.position(id)? + 1,
            None => self.sheets.len(),
        };
        let name = self.fresh_name();
        let sheet = self.new_sheet_state(name);
        self.sheets.insert(index, sheet);
        tracing::trace!(target: "gridlog.harness", index, "sheet created");
        Ok(self.info(index))
    }

    fn delete_sheet(&mut self, id: SheetId) -> DocResult<()> {
        self.check(FailPoint::DeleteSheet)?;
        let index = self.position(id)?;
        if self.sheets.len() == 1 {
            return Err(DocumentError::LastSheet);
        }
        self.sheets.remove(index);
        if self.active == id {
            let next = index.min(self.sheets.len() - 1);
            self.active = self.sheets[next].id;
        }
        Ok(())
    }

    fn duplicate_sheet(&mut self, id: SheetId) -> DocResult<SheetInfo> {
        self.check(FailPoint::DuplicateSheet)?;
        let index = self.position(id)?;
        let name = self.copy_name(&self.sheets[index].name);
        let mut copy = self.new_sheet_state(name);
        let source = &self.sheets[index];
        copy.cells = source.cells.clone();
        copy.merges = source.merges.clone();
        let extra: Vec<String> = source
            .views
            .iter()
            .skip(1)
            .map(|v| v.view.name.clone())
            .collect();
        copy.views[0].view.name = source.views[0].view.name.clone();
        for name in extra {
            let view = self.new_view(copy.id, &name);
            copy.views.push(view);
        }
        self.sheets.insert(index + 1, copy);
        Ok(self.info(index + 1))
    }

    fn rename_sheet(&mut self, id: SheetId, name: &str) -> DocResult<()> {
        self.check(FailPoint::RenameSheet)?;
        let index = self.position(id)?;
        if name.trim().is_empty() {
            return Err(DocumentError::InvalidSheetName(name.to_string()));
        }
        if self.name_taken(name, Some(id)) {
            return Err(DocumentError::SheetNameTaken(name.to_string()));
        }
        self.sheets[index].name = name.to_string();
        Ok(())
    }

    fn reorder_sheet(&mut self, from_index: usize, to_index: usize) -> DocResult<()> {
        self.check(FailPoint::ReorderSheet)?;
        let len = self.sheets.len();
        for index in [from_index, to_index] {
            if index >= len {
                return Err(DocumentError::IndexOutOfRange { index, len });
            }
        }
        let sheet = self.sheets.remove(from_index);
        self.sheets.insert(to_index, sheet);
        Ok(())
    }

    fn activate_sheet(&mut self, id: SheetId) -> DocResult<Activation> {
        self.check(FailPoint::ActivateSheet)?;
        self.position(id)?;
        self.active = id;
        Ok(self.activation())
    }

    fn snapshot_sheet(&self, id: SheetId) -> DocResult<SheetSnapshot> {
        let index = self.position(id)?;
        Ok(self.snapshot_of(index, &self.sheets[index]))
    }

    fn restore_sheet(&mut self, snapshot: &SheetSnapshot) -> DocResult<()> {
        self.check(FailPoint::RestoreSheet)?;
        let id = snapshot.info.id;
        if self.name_taken(&snapshot.info.name, Some(id)) {
            return Err(DocumentError::SheetNameTaken(snapshot.info.name.clone()));
        }
        let views: Vec<ViewState> = snapshot
            .views
            .iter()
            .map(|view| ViewState {
                view: view.clone(),
                cursor: CursorState::default(),
            })
            .collect();
        let views = if views.is_empty() {
            vec![ViewState {
                view: snapshot.info.primary_view.clone(),
                cursor: CursorState::default(),
            }]
        } else {
            views
        };
        let sheet = SheetState {
            id,
            name: snapshot.info.name.clone(),
            views,
            active_view: 0,
            cells: snapshot
                .cells
                .iter()
                .map(|c| {
                    (
                        (c.coord.row, c.coord.col),
                        CellData {
                            value: c.value.clone(),
                            style: c.style.clone(),
                            borders: c.borders,
                        },
                    )
                })
                .collect(),
            merges: snapshot.merges.clone(),
        };
        if let Ok(existing) = self.position(id) {
            self.sheets.remove(existing);
        }
        let index = snapshot.info.index.min(self.sheets.len());
        self.sheets.insert(index, sheet);
        Ok(())
    }

    fn active_cell(&self) -> CellCoord {
        self.active_state().view().cursor.active_cell
    }

    fn selections(&self) -> Vec<CellRange> {
        self.active_state().view().cursor.selections.clone()
    }

    fn set_cursor(&mut self, cursor: &CursorState) -> DocResult<()> {
        self.check(FailPoint::SetCursor)?;
        let mut cursor = cursor.clone();
        if cursor.selections.is_empty() {
            cursor.selections.push(CellRange::single(cursor.active_cell));
        }
        self.active_state_mut().view_mut().cursor = cursor;
        Ok(())
    }
}

// ============================================================================
// ViewResolver
// ============================================================================

impl ViewResolver for MemoryWorkbook {
    fn find_view_by_name(&self, sheet: SheetId, name: &str) -> Option<ViewRef> {
        self.sheets
            .iter()
            .find(|s| s.id == sheet)?
            .views
            .iter()
            .find(|v| v.view.name == name)
            .map(|v| v.view.clone())
    }

    fn active_view(&self) -> Option<ViewRef> {
        Some(self.active_view_ref())
    }

    fn switch_active_view(&mut self, view: &ViewRef) -> DocResult<Activation> {
        self.check(FailPoint::SwitchView)?;
        let index = self.position(view.sheet_id)?;
        let slot = self.sheets[index]
            .views
            .iter()
            .position(|v| v.view.id == view.id)
            .ok_or_else(|| DocumentError::ViewNotFound {
                sheet: view.sheet_id,
                name: view.name.clone(),
            })?;
        self.sheets[index].active_view = slot;
        self.active = view.sheet_id;
        Ok(self.activation())
    }

    fn request_refresh(&mut self) {
        self.refreshes += 1;
    }
}
