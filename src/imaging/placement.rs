//! Aspect-preserving placement of a source inside a target canvas.
//!
//! Offsets are signed: a cover placement overflows the canvas and its
//! negative offset is what crops the overflow.

/// Where a scaled copy of the source lands on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    /// Scale uniformly so the canvas is fully covered, centring the overflow
    ///
    /// A relatively wider source is matched on height and overflows left and
    /// right; otherwise it is matched on width and centred vertically.
    pub fn cover(source: (u32, u32), canvas: (u32, u32)) -> Self {
        let source_aspect = aspect(source);
        let canvas_aspect = aspect(canvas);

        if source_aspect > canvas_aspect {
            let width = scaled(canvas.1 as f64 * source_aspect);
            Self {
                x: centred(canvas.0, width),
                y: 0,
                width,
                height: canvas.1,
            }
        } else {
            let height = scaled(canvas.0 as f64 / source_aspect);
            Self {
                x: 0,
                y: centred(canvas.1, height),
                width: canvas.0,
                height,
            }
        }
    }

    /// Scale uniformly so the whole source fits, centring the margins
    pub fn contain(source: (u32, u32), canvas: (u32, u32)) -> Self {
        let source_aspect = aspect(source);
        let canvas_aspect = aspect(canvas);

        if source_aspect > canvas_aspect {
            let height = scaled(canvas.0 as f64 / source_aspect);
            Self {
                x: 0,
                y: centred(canvas.1, height),
                width: canvas.0,
                height,
            }
        } else {
            let width = scaled(canvas.1 as f64 * source_aspect);
            Self {
                x: centred(canvas.0, width),
                y: 0,
                width,
                height: canvas.1,
            }
        }
    }

    /// Stretch to exactly the canvas, ignoring aspect ratio
    pub fn stretch(canvas: (u32, u32)) -> Self {
        Self {
            x: 0,
            y: 0,
            width: canvas.0,
            height: canvas.1,
        }
    }

    /// Whether this placement leaves no canvas pixel uncovered
    pub fn covers(&self, canvas: (u32, u32)) -> bool {
        self.x <= 0
            && self.y <= 0
            && self.x + self.width as i64 >= canvas.0 as i64
            && self.y + self.height as i64 >= canvas.1 as i64
    }

    /// The part of the canvas this placement draws on, as `(left, top, right, bottom)`
    pub fn visible(&self, canvas: (u32, u32)) -> Option<(u32, u32, u32, u32)> {
        let left = self.x.max(0);
        let top = self.y.max(0);
        let right = (self.x + self.width as i64).min(canvas.0 as i64);
        let bottom = (self.y + self.height as i64).min(canvas.1 as i64);

        if right <= left || bottom <= top {
            return None;
        }

        Some((left as u32, top as u32, right as u32, bottom as u32))
    }
}

fn aspect((width, height): (u32, u32)) -> f64 {
    width as f64 / height as f64
}

fn scaled(length: f64) -> u32 {
    length.round().max(1.0) as u32
}

fn centred(canvas: u32, length: u32) -> i64 {
    (canvas as i64 - length as i64) / 2
}
