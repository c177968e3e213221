//! Presentation surface the overlay controller drives

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Window origin and size in screen units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub fn new(position: (i32, i32), size: (u32, u32)) -> Self {
        Self {
            x: position.0,
            y: position.1,
            width: size.0,
            height: size.1,
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Font used for the countdown text (always rendered bold)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: u32,
}

/// A borderless, always-on-top, draggable window showing the countdown.
///
/// Implemented by whatever toolkit hosts the overlay. Calls are made from the
/// interactive context only.
pub trait OverlayWindow: Send {
    /// Rendered width and line height of `text` in `font`
    fn measure_text(&self, text: &str, font: &FontSpec) -> (u32, u32);

    fn set_text(&mut self, text: &str);
    fn set_font(&mut self, font: &FontSpec);
    fn set_colors(&mut self, text_color: &str, bg_color: &str);
    fn set_opacity(&mut self, opacity: f64);
    fn set_geometry(&mut self, geometry: Geometry);
    /// Whether the user may drag-resize the window (drag-move is always on)
    fn set_resizable(&mut self, resizable: bool);
    fn set_visible(&mut self, visible: bool);

    /// Show the topmost pre-shutdown notice
    fn show_notice(&mut self, message: &str);
    fn hide_notice(&mut self);
}

/// Window-less overlay that tracks what a real window would show.
///
/// Text extent is estimated from the font size: 0.6 em per character and a
/// 1.2 em line height.
#[derive(Debug, Clone)]
pub struct HeadlessOverlay {
    text: String,
    font: FontSpec,
    colors: (String, String),
    opacity: f64,
    geometry: Geometry,
    resizable: bool,
    visible: bool,
    notice: Option<String>,
}

impl HeadlessOverlay {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            font: FontSpec {
                family: String::new(),
                size: 0,
            },
            colors: (String::new(), String::new()),
            opacity: 1.0,
            geometry: Geometry::new((0, 0), (0, 0)),
            resizable: false,
            visible: false,
            notice: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn colors(&self) -> (&str, &str) {
        (&self.colors.0, &self.colors.1)
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn is_resizable(&self) -> bool {
        self.resizable
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}

impl Default for HeadlessOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayWindow for HeadlessOverlay {
    fn measure_text(&self, text: &str, font: &FontSpec) -> (u32, u32) {
        let chars = text.chars().count() as u32;
        let width = (chars * font.size * 3).div_ceil(5);
        let height = (font.size * 6).div_ceil(5);
        (width, height)
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn set_font(&mut self, font: &FontSpec) {
        debug!("Overlay font: {} {}pt bold", font.family, font.size);
        self.font = font.clone();
    }

    fn set_colors(&mut self, text_color: &str, bg_color: &str) {
        debug!("Overlay colors: text={} bg={}", text_color, bg_color);
        self.colors = (text_color.to_string(), bg_color.to_string());
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity;
    }

    fn set_geometry(&mut self, geometry: Geometry) {
        debug!(
            "Overlay geometry: {}x{}+{}+{}",
            geometry.width, geometry.height, geometry.x, geometry.y
        );
        self.geometry = geometry;
    }

    fn set_resizable(&mut self, resizable: bool) {
        self.resizable = resizable;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn show_notice(&mut self, message: &str) {
        self.notice = Some(message.to_string());
    }

    fn hide_notice(&mut self) {
        self.notice = None;
    }
}
