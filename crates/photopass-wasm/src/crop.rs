//! Crop box and pointer dragging bindings.
//!
//! The box lives in rotated source pixel coordinates. The caller converts
//! pointer positions from screen space before passing them in.

use crate::js_error;
use photopass_core::catalog;
use photopass_core::{CropBox, CropDrag, Point, PointerEvent};
use wasm_bindgen::prelude::*;

/// A crop box for JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy)]
pub struct JsCropBox {
    inner: CropBox,
}

#[wasm_bindgen]
impl JsCropBox {
    #[wasm_bindgen(getter)]
    pub fn x(&self) -> f64 {
        self.inner.x
    }

    #[wasm_bindgen(getter)]
    pub fn y(&self) -> f64 {
        self.inner.y
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> f64 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> f64 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn max_x(&self) -> f64 {
        self.inner.max_x()
    }

    #[wasm_bindgen(getter)]
    pub fn max_y(&self) -> f64 {
        self.inner.max_y()
    }

    /// The same box moved to `(x, y)`, clamped inside the source.
    pub fn move_to(&self, x: f64, y: f64) -> JsCropBox {
        self.inner.move_to(x, y).into()
    }

    pub fn centered(&self) -> JsCropBox {
        self.inner.centered().into()
    }
}

impl From<CropBox> for JsCropBox {
    fn from(inner: CropBox) -> Self {
        Self { inner }
    }
}

impl JsCropBox {
    pub(crate) fn inner(&self) -> &CropBox {
        &self.inner
    }
}

/// Center a crop box of the given aspect ratio (width / height) on a
/// `src_width x src_height` image.
#[wasm_bindgen]
pub fn compute_crop_box(
    src_width: u32,
    src_height: u32,
    aspect: f64,
) -> Result<JsCropBox, JsValue> {
    photopass_core::compute_crop_box(src_width, src_height, aspect)
        .map(JsCropBox::from)
        .map_err(js_error)
}

/// Crop box for a catalog passport size. `None` for `custom`, which has no
/// fixed aspect ratio.
#[wasm_bindgen]
pub fn crop_box_for_size(
    src_width: u32,
    src_height: u32,
    size_id: &str,
) -> Result<Option<JsCropBox>, JsValue> {
    let size = catalog::passport_size(size_id)
        .ok_or_else(|| js_error(format!("Unknown passport size '{}'", size_id)))?;
    match size.aspect_ratio() {
        Some(aspect) => compute_crop_box(src_width, src_height, aspect).map(Some),
        None => Ok(None),
    }
}

/// Pointer drag state for the crop overlay.
///
/// # Example (TypeScript)
///
/// ```typescript
/// const drag = new JsCropDrag();
/// el.onpointerdown = (e) => drag.pointer_down(toSourceX(e), toSourceY(e), activePointers, box);
/// el.onpointermove = (e) => {
///   const moved = drag.pointer_move(toSourceX(e), toSourceY(e), activePointers, box);
///   if (moved) box = moved;
/// };
/// el.onpointerup = () => drag.pointer_up(box);
/// ```
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct JsCropDrag {
    state: CropDrag,
}

#[wasm_bindgen]
impl JsCropDrag {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    #[wasm_bindgen(getter)]
    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, pointers: u32, crop: &JsCropBox) {
        self.state = self.state.pointer_down(Point::new(x, y), pointers, crop.inner());
    }

    /// Returns the moved box while dragging with a single pointer.
    pub fn pointer_move(
        &mut self,
        x: f64,
        y: f64,
        pointers: u32,
        crop: &JsCropBox,
    ) -> Option<JsCropBox> {
        let (state, moved) = self
            .state
            .pointer_move(Point::new(x, y), pointers, crop.inner());
        self.state = state;
        moved.map(JsCropBox::from)
    }

    pub fn pointer_up(&mut self, crop: &JsCropBox) {
        self.state = self.state.pointer_up(crop.inner());
    }

    pub fn pointer_cancel(&mut self, crop: &JsCropBox) {
        self.state = self.state.handle(PointerEvent::Cancel, crop.inner()).0;
    }
}
