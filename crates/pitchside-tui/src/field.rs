//! Top-down field picker.
//!
//! The field is drawn as a plan view filling a terminal rectangle: columns
//! run along the server x axis, rows along the server y axis with +y at the
//! top. Picking inverts that mapping and hands back renderer-frame points.

use ratatui::layout::Rect;

use pitchside_core::coords::to_world_space;
use pitchside_core::{FieldPicker, ScreenPoint, SelectableEntity, ServerPoint, WorldPoint};

use crate::scene::{FIELD_LENGTH, FIELD_WIDTH};

#[derive(Debug, Clone, Default)]
pub struct FieldView {
    area: Rect,
    entities: Vec<(SelectableEntity, ServerPoint)>,
}

impl FieldView {
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    /// Replace the entity positions used for picking.
    pub fn set_entities(&mut self, entities: Vec<(SelectableEntity, ServerPoint)>) {
        self.entities = entities;
    }

    /// Metres covered by one cell, horizontally and vertically.
    fn cell_size(&self) -> (f32, f32) {
        (
            FIELD_LENGTH / f32::from(self.area.width.max(1)),
            FIELD_WIDTH / f32::from(self.area.height.max(1)),
        )
    }

    /// Ground position under `screen`, server frame. `None` off the field.
    fn ground_at(&self, screen: ScreenPoint) -> Option<(f32, f32)> {
        if self.area.width == 0 || self.area.height == 0 {
            return None;
        }
        let left = f32::from(self.area.x);
        let top = f32::from(self.area.y);
        let u = (screen.x - left) / f32::from(self.area.width);
        let v = (screen.y - top) / f32::from(self.area.height);
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return None;
        }
        Some(((u - 0.5) * FIELD_LENGTH, (0.5 - v) * FIELD_WIDTH))
    }
}

impl FieldPicker for FieldView {
    fn pick_field(&self, screen: ScreenPoint) -> Option<WorldPoint> {
        let (x, y) = self.ground_at(screen)?;
        Some(to_world_space(ServerPoint::new(x, y, 0.0)))
    }

    /// Closest entity within one cell of the click.
    fn pick_entity(&self, screen: ScreenPoint) -> Option<SelectableEntity> {
        let (x, y) = self.ground_at(screen)?;
        let (cell_w, cell_h) = self.cell_size();
        let reach = cell_w.max(cell_h);

        self.entities
            .iter()
            .map(|(entity, p)| (*entity, (p.0.x - x).hypot(p.0.y - y)))
            .filter(|(_, distance)| *distance <= reach)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(entity, _)| entity)
    }
}
