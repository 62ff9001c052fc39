use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::SignatureError;

/// A position on the drawing surface, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn checked(self) -> Result<Self, SignatureError> {
        if self.x.is_finite() && self.y.is_finite() {
            Ok(self)
        } else {
            Err(SignatureError::InvalidPoint {
                x: self.x,
                y: self.y,
            })
        }
    }
}

/// Input delivered to the pad.
///
/// Touch events carry every active touch point; only the first is used.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    MouseDown(Point),
    MouseMove(Point),
    MouseUp,
    /// The pointer left the surface; treated as a release.
    MouseLeave,
    TouchStart(Vec<Point>),
    TouchMove(Vec<Point>),
    TouchEnd,
}

/// How the surface is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadLayout {
    /// Full-size surface embedded in the form.
    Inline,
    /// A button that opens the surface in a modal (touch devices).
    Modal,
}

impl PadLayout {
    pub fn for_user_agent(user_agent: &str) -> Self {
        if is_touch_device(user_agent) {
            PadLayout::Modal
        } else {
            PadLayout::Inline
        }
    }
}

const TOUCH_AGENTS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// Whether a user-agent string belongs to a touch-first device.
pub fn is_touch_device(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    TOUCH_AGENTS.iter().any(|needle| ua.contains(needle))
}

type ChangeCallback = Box<dyn FnMut(&str) + Send>;

/// Freehand signature capture.
///
/// The only drawing state is whether a stroke is in progress and the last
/// point of that stroke; move events before a press are ignored. Finalizing
/// a stroke (release or leave) emits the whole surface as a PNG data URI,
/// clearing emits an empty string. No minimum-ink check is made here.
pub struct SignaturePad {
    canvas: Canvas,
    drawing: bool,
    last_point: Option<Point>,
    disabled: bool,
    layout: PadLayout,
    modal_open: bool,
    preview: Option<String>,
    on_change: Option<ChangeCallback>,
}

impl std::fmt::Debug for SignaturePad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignaturePad")
            .field("width", &self.canvas.width())
            .field("height", &self.canvas.height())
            .field("drawing", &self.drawing)
            .field("disabled", &self.disabled)
            .field("layout", &self.layout)
            .field("modal_open", &self.modal_open)
            .finish()
    }
}

impl SignaturePad {
    pub fn new(width: u32, height: u32, layout: PadLayout) -> Result<Self, SignatureError> {
        Ok(Self {
            canvas: Canvas::new(width, height)?,
            drawing: false,
            last_point: None,
            disabled: false,
            layout,
            modal_open: false,
            preview: None,
            on_change: None,
        })
    }

    /// A default-size pad laid out for the given user agent.
    pub fn for_user_agent(user_agent: &str) -> Result<Self, SignatureError> {
        Self::new(
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT,
            PadLayout::for_user_agent(user_agent),
        )
    }

    /// Register the signature-change callback.
    pub fn on_signature_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn layout(&self) -> PadLayout {
        self.layout
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// The last emitted signature, if any.
    pub fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    /// Feed one input event.
    pub fn handle(&mut self, event: PointerEvent) -> Result<(), SignatureError> {
        if !self.accepts_input() {
            return Ok(());
        }
        match event {
            PointerEvent::MouseDown(p) => self.start(p),
            PointerEvent::TouchStart(points) => match points.first() {
                Some(&p) => self.start(p),
                None => Ok(()),
            },
            PointerEvent::MouseMove(p) => self.draw(p),
            PointerEvent::TouchMove(points) => match points.first() {
                Some(&p) => self.draw(p),
                None => Ok(()),
            },
            PointerEvent::MouseUp | PointerEvent::MouseLeave | PointerEvent::TouchEnd => {
                self.finish()
            }
        }
    }

    /// Blank the surface and emit an empty signature.
    pub fn clear(&mut self) {
        if self.disabled {
            return;
        }
        self.canvas.clear();
        self.drawing = false;
        self.last_point = None;
        self.preview = None;
        self.emit("");
    }

    /// Show the modal surface. Each opening starts from a blank surface.
    pub fn open_modal(&mut self) {
        if self.layout != PadLayout::Modal || self.disabled {
            return;
        }
        self.canvas.clear();
        self.drawing = false;
        self.last_point = None;
        self.modal_open = true;
    }

    /// Close the modal without emitting.
    pub fn cancel_modal(&mut self) {
        self.modal_open = false;
        self.drawing = false;
        self.last_point = None;
    }

    /// Emit the modal surface and close it.
    pub fn save_modal(&mut self) -> Result<(), SignatureError> {
        if !self.modal_open {
            return Ok(());
        }
        let encoded = self.canvas.to_data_uri()?;
        self.preview = Some(encoded.clone());
        self.emit(&encoded);
        self.cancel_modal();
        Ok(())
    }

    fn accepts_input(&self) -> bool {
        match self.layout {
            PadLayout::Inline => true,
            PadLayout::Modal => self.modal_open,
        }
    }

    fn start(&mut self, point: Point) -> Result<(), SignatureError> {
        if self.disabled {
            return Ok(());
        }
        self.last_point = Some(point.checked()?);
        self.drawing = true;
        Ok(())
    }

    fn draw(&mut self, point: Point) -> Result<(), SignatureError> {
        if !self.drawing || self.disabled {
            return Ok(());
        }
        let point = point.checked()?;
        if let Some(last) = self.last_point {
            self.canvas.stroke_segment(last, point);
        }
        self.last_point = Some(point);
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SignatureError> {
        if !self.drawing || self.disabled {
            return Ok(());
        }
        self.drawing = false;
        self.last_point = None;
        let encoded = self.canvas.to_data_uri()?;
        tracing::debug!(bytes = encoded.len(), "signature stroke finalized");
        self.preview = Some(encoded.clone());
        self.emit(&encoded);
        Ok(())
    }

    fn emit(&mut self, encoded: &str) {
        if let Some(callback) = self.on_change.as_mut() {
            callback(encoded);
        }
    }
}

/// A recorded signature: surface size plus the points of each stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeSet {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    pub strokes: Vec<Vec<Point>>,
}

/// Most points a recorded stroke set may carry.
pub const MAX_STROKE_POINTS: usize = 4096;

impl StrokeSet {
    /// Total points across all strokes.
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Vec::len).sum()
    }

    /// Reject sets larger than `max_width` x `max_height` or carrying more
    /// than [`MAX_STROKE_POINTS`] points.
    pub fn check_limits(&self, max_width: u32, max_height: u32) -> Result<(), SignatureError> {
        if self.width > max_width || self.height > max_height {
            return Err(SignatureError::SurfaceTooLarge {
                width: self.width,
                height: self.height,
                max_width,
                max_height,
            });
        }
        let count = self.point_count();
        if count > MAX_STROKE_POINTS {
            return Err(SignatureError::TooManyPoints {
                count,
                max: MAX_STROKE_POINTS,
            });
        }
        Ok(())
    }
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

/// Replay `set` through an inline pad and return the last emitted
/// signature, or an empty string when no stroke was drawn.
pub fn render_strokes(set: &StrokeSet) -> Result<String, SignatureError> {
    let count = set.point_count();
    if count > MAX_STROKE_POINTS {
        return Err(SignatureError::TooManyPoints {
            count,
            max: MAX_STROKE_POINTS,
        });
    }
    let mut pad = SignaturePad::new(set.width, set.height, PadLayout::Inline)?;
    for stroke in set.strokes.iter().filter(|s| !s.is_empty()) {
        pad.handle(PointerEvent::MouseDown(stroke[0]))?;
        for &point in &stroke[1..] {
            pad.handle(PointerEvent::MouseMove(point))?;
        }
        pad.handle(PointerEvent::MouseUp)?;
    }
    Ok(pad.preview().unwrap_or_default().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{decode_data_uri, PNG_DATA_URI_PREFIX};
    use std::sync::{Arc, Mutex};

    fn capturing_pad(layout: PadLayout) -> (SignaturePad, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let pad = SignaturePad::new(100, 40, layout)
            .unwrap()
            .on_signature_change(move |s| sink.lock().unwrap().push(s.to_string()));
        (pad, seen)
    }

    fn scribble(pad: &mut SignaturePad) {
        pad.handle(PointerEvent::MouseDown(Point::new(10.0, 10.0))).unwrap();
        pad.handle(PointerEvent::MouseMove(Point::new(50.0, 30.0))).unwrap();
        pad.handle(PointerEvent::MouseMove(Point::new(90.0, 12.0))).unwrap();
        pad.handle(PointerEvent::MouseUp).unwrap();
    }

    #[test]
    fn release_emits_png_data_uri() {
        let (mut pad, seen) = capturing_pad(PadLayout::Inline);
        scribble(&mut pad);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].starts_with(PNG_DATA_URI_PREFIX));
        let png = decode_data_uri(&seen[0]).unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (100, 40));
        assert_eq!(pad.preview(), Some(seen[0].as_str()));
    }

    #[test]
    fn moves_before_press_are_ignored() {
        let (mut pad, seen) = capturing_pad(PadLayout::Inline);
        pad.handle(PointerEvent::MouseMove(Point::new(10.0, 10.0))).unwrap();
        pad.handle(PointerEvent::MouseMove(Point::new(80.0, 30.0))).unwrap();
        pad.handle(PointerEvent::MouseUp).unwrap();
        assert!(pad.canvas().is_blank());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn leaving_the_surface_finalizes_the_stroke() {
        let (mut pad, seen) = capturing_pad(PadLayout::Inline);
        pad.handle(PointerEvent::MouseDown(Point::new(10.0, 10.0))).unwrap();
        pad.handle(PointerEvent::MouseMove(Point::new(30.0, 10.0))).unwrap();
        pad.handle(PointerEvent::MouseLeave).unwrap();
        assert!(!pad.is_drawing());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn press_and_release_without_motion_still_emits() {
        let (mut pad, seen) = capturing_pad(PadLayout::Inline);
        pad.handle(PointerEvent::MouseDown(Point::new(10.0, 10.0))).unwrap();
        pad.handle(PointerEvent::MouseUp).unwrap();
        assert!(pad.canvas().is_blank());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn only_first_touch_point_draws() {
        let (mut pad, _) = capturing_pad(PadLayout::Inline);
        pad.handle(PointerEvent::TouchStart(vec![
            Point::new(10.0, 20.0),
            Point::new(90.0, 5.0),
        ]))
        .unwrap();
        pad.handle(PointerEvent::TouchMove(vec![
            Point::new(20.0, 20.0),
            Point::new(95.0, 35.0),
        ]))
        .unwrap();
        pad.handle(PointerEvent::TouchEnd).unwrap();

        let img = pad.canvas().image();
        assert!(img.get_pixel(15, 19).0[0] < 128);
        assert_eq!(img.get_pixel(92, 20).0[0], 255);
    }

    #[test]
    fn clear_blanks_surface_and_emits_empty() {
        let (mut pad, seen) = capturing_pad(PadLayout::Inline);
        scribble(&mut pad);
        pad.clear();
        assert!(pad.canvas().is_blank());
        assert_eq!(pad.preview(), None);
        assert_eq!(seen.lock().unwrap().last().map(String::as_str), Some(""));
    }

    #[test]
    fn disabled_pad_ignores_drawing_and_clear() {
        let (mut pad, seen) = capturing_pad(PadLayout::Inline);
        pad.set_disabled(true);
        scribble(&mut pad);
        pad.clear();
        assert!(pad.canvas().is_blank());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn non_finite_points_are_rejected() {
        let (mut pad, _) = capturing_pad(PadLayout::Inline);
        let err = pad
            .handle(PointerEvent::MouseDown(Point::new(f32::NAN, 1.0)))
            .unwrap_err();
        assert!(matches!(err, SignatureError::InvalidPoint { .. }));
        assert!(!pad.is_drawing());
    }

    #[test]
    fn modal_layout_only_draws_while_open() {
        let (mut pad, seen) = capturing_pad(PadLayout::Modal);
        scribble(&mut pad);
        assert!(pad.canvas().is_blank());
        assert!(seen.lock().unwrap().is_empty());

        pad.open_modal();
        pad.handle(PointerEvent::TouchStart(vec![Point::new(10.0, 10.0)])).unwrap();
        pad.handle(PointerEvent::TouchMove(vec![Point::new(60.0, 20.0)])).unwrap();
        pad.save_modal().unwrap();

        assert!(!pad.is_modal_open());
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].starts_with(PNG_DATA_URI_PREFIX));
    }

    #[test]
    fn cancelling_the_modal_emits_nothing() {
        let (mut pad, seen) = capturing_pad(PadLayout::Modal);
        pad.open_modal();
        pad.handle(PointerEvent::TouchStart(vec![Point::new(10.0, 10.0)])).unwrap();
        pad.handle(PointerEvent::TouchMove(vec![Point::new(60.0, 20.0)])).unwrap();
        pad.cancel_modal();
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(pad.preview(), None);
    }

    #[test]
    fn touch_user_agents_get_the_modal() {
        let iphone = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X)";
        let desktop = "Mozilla/5.0 (X11; Linux x86_64) Firefox/130.0";
        assert!(is_touch_device(iphone));
        assert!(is_touch_device("Opera/9.80 (J2ME/MIDP; Opera Mini/9.80)"));
        assert!(!is_touch_device(desktop));
        assert_eq!(PadLayout::for_user_agent(iphone), PadLayout::Modal);
        assert_eq!(PadLayout::for_user_agent(desktop), PadLayout::Inline);
    }

    #[test]
    fn render_strokes_matches_live_drawing() {
        let set: StrokeSet = serde_json::from_str(
            r#"{"width":100,"height":40,"strokes":[[{"x":10,"y":10},{"x":50,"y":30},{"x":90,"y":12}]]}"#,
        )
        .unwrap();
        let rendered = render_strokes(&set).unwrap();

        let (mut pad, seen) = capturing_pad(PadLayout::Inline);
        scribble(&mut pad);
        assert_eq!(rendered, seen.lock().unwrap()[0]);
    }

    #[test]
    fn render_without_strokes_is_empty() {
        let set: StrokeSet = serde_json::from_str(r#"{"strokes":[[]]}"#).unwrap();
        assert_eq!((set.width, set.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert_eq!(render_strokes(&set).unwrap(), "");
    }

    #[test]
    fn limits_reject_large_surfaces_and_long_strokes() {
        let small: StrokeSet =
            serde_json::from_str(r#"{"strokes":[[{"x":1,"y":1},{"x":5,"y":5}]]}"#).unwrap();
        assert!(small.check_limits(DEFAULT_WIDTH, DEFAULT_HEIGHT).is_ok());

        let wide = StrokeSet {
            width: 4096,
            ..small.clone()
        };
        assert!(matches!(
            wide.check_limits(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            Err(SignatureError::SurfaceTooLarge { width: 4096, .. })
        ));

        let long = StrokeSet {
            strokes: vec![vec![Point { x: 1.0, y: 1.0 }; MAX_STROKE_POINTS + 1]],
            ..small
        };
        assert_eq!(long.point_count(), MAX_STROKE_POINTS + 1);
        assert!(matches!(
            long.check_limits(DEFAULT_WIDTH, DEFAULT_HEIGHT),
            Err(SignatureError::TooManyPoints { .. })
        ));
        assert!(matches!(
            render_strokes(&long),
            Err(SignatureError::TooManyPoints { .. })
        ));
    }
}
