// This file is part of Slate.
//
// Slate is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Slate is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Slate.  If not, see <http://www.gnu.org/licenses/>.
mod on_demand;

pub use on_demand::{Generation, OnDemand};

use geometry::BoundRect;
use nalgebra::{Point2, Vector2};
use parking_lot::RwLock;
use std::sync::Arc;

/// Anything that can be placed on the board and handed to the renderer.
/// Coordinates are board units; `global_position` translates the item's
/// local geometry onto the board.
pub trait RenderItem: Send + Sync {
    fn global_position(&self) -> Vector2<f32>;
    fn set_global_position(&mut self, position: Vector2<f32>);

    /// Bounds of the item's geometry in its own coordinate space.
    fn local_bounding_rect(&self) -> BoundRect;

    fn hidden(&self) -> bool;
    fn set_hidden(&mut self, hidden: bool);

    /// Frozen items ignore the move tool.
    fn frozen(&self) -> bool {
        false
    }

    /// Opaque items let the renderer skip blending.
    fn is_opaque(&self) -> bool;

    /// Distance from a board-space point to the item's visible geometry,
    /// for eraser and cursor hit testing.
    fn distance_to(&self, global_point: Point2<f32>) -> f32;

    fn bounding_rect(&self) -> BoundRect {
        self.local_bounding_rect().offset_by(self.global_position())
    }
}

pub type ItemHandle = Arc<RwLock<dyn RenderItem>>;

pub fn item_handle<T: RenderItem + 'static>(item: T) -> ItemHandle {
    Arc::new(RwLock::new(item))
}

/// The per-frame visibility filter: hidden items and items entirely outside
/// the viewport are skipped.
pub fn visible_items(items: &[ItemHandle], viewport: &BoundRect) -> Vec<ItemHandle> {
    items
        .iter()
        .filter(|handle| {
            let item = handle.read();
            !item.hidden() && viewport.intersects(&item.bounding_rect())
        })
        .cloned()
        .collect()
}

/// One eraser pass over the board. Holds the items it hid so the action can
/// be undone by restoring them.
#[derive(Default)]
pub struct ErasedItems {
    selected: Vec<ItemHandle>,
}

impl ErasedItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn select(&mut self, item: ItemHandle) {
        self.selected.push(item);
    }

    pub fn erase(&self) {
        log::debug!("erasing {} items", self.selected.len());
        for item in &self.selected {
            item.write().set_hidden(true);
        }
    }

    pub fn restore(&self) {
        log::debug!("restoring {} items", self.selected.len());
        for item in &self.selected {
            item.write().set_hidden(false);
        }
    }
}
