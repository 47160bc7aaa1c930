use crate::utils::viewport_size;
use noughts_core::Particle;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Draws confetti onto the full-viewport overlay canvas.
#[derive(Debug)]
pub(crate) struct Painter {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
    // something is left on the canvas from the previous paint
    dirty: bool,
}

impl Painter {
    pub(crate) fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self {
            canvas,
            context,
            dirty: false,
        })
    }

    /// Matches the canvas backing store to the viewport and returns the new size.
    pub(crate) fn fit_to_viewport(&mut self) -> (f32, f32) {
        let (width, height) = viewport_size();
        self.canvas.set_width(width as u32);
        self.canvas.set_height(height as u32);
        // resizing wipes the canvas
        self.dirty = false;
        (width, height)
    }

    pub(crate) fn paint(&mut self, particles: &[Particle]) {
        if particles.is_empty() && !self.dirty {
            return;
        }

        let ctx = &self.context;
        ctx.clear_rect(
            0.0,
            0.0,
            f64::from(self.canvas.width()),
            f64::from(self.canvas.height()),
        );
        for particle in particles {
            ctx.save();
            if let Err(err) = draw_particle(ctx, particle) {
                log::trace!("could not draw particle: {:?}", err);
            }
            ctx.restore();
        }

        self.dirty = !particles.is_empty();
    }
}

fn draw_particle(ctx: &CanvasRenderingContext2d, particle: &Particle) -> Result<(), JsValue> {
    let size = f64::from(particle.size);
    ctx.translate(f64::from(particle.x), f64::from(particle.y))?;
    ctx.rotate(f64::from(particle.rotation).to_radians())?;
    ctx.set_fill_style_str(particle.color);
    ctx.fill_rect(-size / 2.0, -size / 2.0, size, size * 0.6);
    Ok(())
}
