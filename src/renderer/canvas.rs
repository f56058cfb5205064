//! 2D canvas drawing for the trace challenge

use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::BridgeError;
use crate::gesture::{DrawingSurface, GesturePath, Point};

/// Stroke styles
mod colors {
    /// Dashed target outline
    pub const GUIDE: &str = "blue";
    /// User's trace
    pub const STROKE: &str = "red";
}

const GUIDE_WIDTH: f64 = 3.0;
const GUIDE_DASH: [f64; 2] = [5.0, 5.0];
const STROKE_WIDTH: f64 = 2.0;

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, BridgeError> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or(BridgeError::Unavailable("2d canvas context"))?;
        Ok(Self { canvas, ctx })
    }

    fn set_dash(&self, segments: &[f64]) {
        let dash: js_sys::Array = segments.iter().map(|&len| JsValue::from_f64(len)).collect();
        if let Err(err) = self.ctx.set_line_dash(&dash) {
            warn!("setLineDash failed: {:?}", err);
        }
    }

    #[allow(deprecated)]
    fn set_style(&self, color: &str, width: f64) {
        self.ctx.set_stroke_style(&JsValue::from_str(color));
        self.ctx.set_line_width(width);
    }
}

impl DrawingSurface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn clear(&self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn draw_guide(&self, target: &GesturePath) {
        let Some((first, rest)) = target.points().split_first() else {
            return;
        };

        self.set_dash(&GUIDE_DASH);
        self.set_style(colors::GUIDE, GUIDE_WIDTH);
        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for point in rest {
            self.ctx.line_to(point.x, point.y);
        }
        self.ctx.close_path();
        self.ctx.stroke();
    }

    fn draw_stroke(&self, from: Point, to: Point) {
        self.set_dash(&[]);
        self.set_style(colors::STROKE, STROKE_WIDTH);
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.stroke();
    }
}
