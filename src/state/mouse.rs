//! Mouse Module - hit testing for node headers.
//!
//! The painter records what it drew where in a [`HitGrid`]; mouse events are
//! resolved against the grid from the last frame:
//! - left click on a skip arrow: skip
//! - left click elsewhere on a node: expand/collapse
//! - right click on a node: log its element
//! - wheel: vertical scroll, Shift+wheel or horizontal wheel: horizontal
//!   scroll

use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use super::keyboard::{Action, NodeAction, Target};
use crate::engine::NodeId;

/// Rows moved per wheel notch.
pub const WHEEL_ROWS: i32 = 3;

// =============================================================================
// HIT GRID
// =============================================================================

/// Which part of a node a cell belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitPart {
    Body,
    SkipBackward,
    SkipForward,
}

/// What was drawn at one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    pub node: NodeId,
    pub part: HitPart,
}

/// A grid for O(1) mouse hit detection.
pub struct HitGrid {
    width: u16,
    height: u16,
    cells: Vec<Option<Hit>>,
}

impl HitGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize the grid, clearing all contents.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells.clear();
        self.cells.resize(width as usize * height as usize, None);
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Fill a rectangle, clipped to the grid.
    pub fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, hit: Hit) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for cy in y..y_end {
            let row = cy as usize * self.width as usize;
            for cx in x..x_end {
                self.cells[row + cx as usize] = Some(hit);
            }
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Hit> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y as usize * self.width as usize + x as usize]
    }
}

// =============================================================================
// EVENT MAPPING
// =============================================================================

/// Translate a mouse event into an action using the last frame's hits.
pub fn action_for_mouse(event: &MouseEvent, grid: &HitGrid) -> Option<Action> {
    let shift = event.modifiers.contains(KeyModifiers::SHIFT);
    let hit = grid.get(event.column, event.row);

    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let hit = hit?;
            let action = match hit.part {
                HitPart::Body => NodeAction::Toggle,
                HitPart::SkipBackward => NodeAction::SkipBackward,
                HitPart::SkipForward => NodeAction::SkipForward,
            };
            Some(Action::Node(action, Target::Node(hit.node)))
        }
        MouseEventKind::Down(MouseButton::Right) => {
            let hit = hit?;
            Some(Action::Node(NodeAction::LogElement, Target::Node(hit.node)))
        }
        MouseEventKind::ScrollUp if shift => Some(Action::ScrollSteps(-1)),
        MouseEventKind::ScrollDown if shift => Some(Action::ScrollSteps(1)),
        MouseEventKind::ScrollUp => Some(Action::ScrollRows(-WHEEL_ROWS)),
        MouseEventKind::ScrollDown => Some(Action::ScrollRows(WHEEL_ROWS)),
        MouseEventKind::ScrollLeft => Some(Action::ScrollSteps(-1)),
        MouseEventKind::ScrollRight => Some(Action::ScrollSteps(1)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(node: u32, part: HitPart) -> Hit {
        Hit {
            node: NodeId(node),
            part,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn setup() -> HitGrid {
        let mut grid = HitGrid::new(20, 5);
        grid.fill_rect(0, 1, 20, 2, hit(3, HitPart::Body));
        grid.fill_rect(0, 1, 1, 1, hit(3, HitPart::SkipBackward));
        grid.fill_rect(19, 1, 1, 1, hit(3, HitPart::SkipForward));
        grid
    }

    #[test]
    fn test_hit_grid_fill_and_clip() {
        let mut grid = HitGrid::new(10, 10);
        assert_eq!(grid.get(5, 5), None);

        grid.fill_rect(8, 8, 10, 10, hit(1, HitPart::Body));
        assert_eq!(grid.get(9, 9), Some(hit(1, HitPart::Body)));
        assert_eq!(grid.get(7, 8), None);
        assert_eq!(grid.get(10, 9), None);
    }

    #[test]
    fn test_hit_grid_resize_clears() {
        let mut grid = HitGrid::new(10, 10);
        grid.fill_rect(0, 0, 5, 5, hit(1, HitPart::Body));
        grid.resize(20, 20);
        assert_eq!(grid.get(2, 2), None);
        assert_eq!(grid.width(), 20);
        assert_eq!(grid.height(), 20);
    }

    #[test]
    fn test_clicks() {
        let grid = setup();
        let left = MouseEventKind::Down(MouseButton::Left);

        assert_eq!(
            action_for_mouse(&mouse(left, 5, 2), &grid),
            Some(Action::Node(NodeAction::Toggle, Target::Node(NodeId(3))))
        );
        assert_eq!(
            action_for_mouse(&mouse(left, 0, 1), &grid),
            Some(Action::Node(NodeAction::SkipBackward, Target::Node(NodeId(3))))
        );
        assert_eq!(
            action_for_mouse(&mouse(left, 19, 1), &grid),
            Some(Action::Node(NodeAction::SkipForward, Target::Node(NodeId(3))))
        );
        assert_eq!(action_for_mouse(&mouse(left, 5, 4), &grid), None);
    }

    #[test]
    fn test_right_click_logs() {
        let grid = setup();
        assert_eq!(
            action_for_mouse(&mouse(MouseEventKind::Down(MouseButton::Right), 5, 1), &grid),
            Some(Action::Node(NodeAction::LogElement, Target::Node(NodeId(3))))
        );
    }

    #[test]
    fn test_wheel() {
        let grid = setup();
        assert_eq!(
            action_for_mouse(&mouse(MouseEventKind::ScrollDown, 0, 0), &grid),
            Some(Action::ScrollRows(WHEEL_ROWS))
        );

        let mut shifted = mouse(MouseEventKind::ScrollUp, 0, 0);
        shifted.modifiers = KeyModifiers::SHIFT;
        assert_eq!(action_for_mouse(&shifted, &grid), Some(Action::ScrollSteps(-1)));
    }
}
