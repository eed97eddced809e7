//! Pointer-driven crop box dragging.
//!
//! `Idle --down(1 pointer)--> Dragging --move--> Dragging --up/cancel--> Idle`
//!
//! Gestures with more than one active pointer are ignored, so pinch zooming
//! never moves the box.

use serde::{Deserialize, Serialize};

use crate::crop_box::CropBox;

/// A point in source pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Input from a mouse or touch surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { position: Point, pointers: u32 },
    Move { position: Point, pointers: u32 },
    Up,
    Cancel,
}

/// Drag state machine for the crop box.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CropDrag {
    #[default]
    Idle,
    Dragging {
        /// Pointer position when the drag began.
        origin: Point,
        /// Crop box origin when the drag began.
        start_offset: Point,
    },
}

impl CropDrag {
    pub fn is_dragging(&self) -> bool {
        matches!(self, CropDrag::Dragging { .. })
    }

    /// Advance the machine. Returns the next state and, for a move during a
    /// drag, the crop box at its new clamped position.
    pub fn handle(self, event: PointerEvent, crop: &CropBox) -> (CropDrag, Option<CropBox>) {
        match (self, event) {
            (CropDrag::Idle, PointerEvent::Down { position, pointers: 1 }) => (
                CropDrag::Dragging {
                    origin: position,
                    start_offset: Point::new(crop.x, crop.y),
                },
                None,
            ),
            (
                CropDrag::Dragging {
                    origin,
                    start_offset,
                },
                PointerEvent::Move {
                    position,
                    pointers: 1,
                },
            ) => {
                let moved = crop.move_to(
                    start_offset.x + position.x - origin.x,
                    start_offset.y + position.y - origin.y,
                );
                (self, Some(moved))
            }
            (CropDrag::Dragging { .. }, PointerEvent::Up | PointerEvent::Cancel) => {
                (CropDrag::Idle, None)
            }
            (state, _) => (state, None),
        }
    }

    pub fn pointer_down(self, position: Point, pointers: u32, crop: &CropBox) -> CropDrag {
        self.handle(PointerEvent::Down { position, pointers }, crop).0
    }

    pub fn pointer_move(
        self,
        position: Point,
        pointers: u32,
        crop: &CropBox,
    ) -> (CropDrag, Option<CropBox>) {
        self.handle(PointerEvent::Move { position, pointers }, crop)
    }

    pub fn pointer_up(self, crop: &CropBox) -> CropDrag {
        self.handle(PointerEvent::Up, crop).0
    }
}
