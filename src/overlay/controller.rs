//! Keeps the overlay window in step with the countdown and display settings

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    warning::WarningNotice,
    window::{FontSpec, Geometry, OverlayWindow},
};
use crate::{
    constants::{
        AUTO_SIZE_PADDING, FONT_HEIGHT_DIVISOR, FONT_WIDTH_DIVISOR, IDLE_DISPLAY_TEXT,
        MIN_OVERLAY_HEIGHT, MIN_OVERLAY_WIDTH, WIDEST_DISPLAY_TEXT,
    },
    settings::{model::clamp_font_size, DisplayPatch, DisplaySettings},
    utils::format_time,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    /// Drag to move
    Primary,
    /// Drag to resize (manual size mode only)
    Secondary,
}

/// Pointer input on the overlay, in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PointerEvent {
    Press { button: PointerButton, x: i32, y: i32 },
    Move { x: i32, y: i32 },
    Release,
}

/// Side effects of a pointer event the owner may need to record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerOutcome {
    /// Font size recomputed from a resized box
    pub font_size: Option<u32>,
    /// Final geometry after a drag or resize ended
    pub released: Option<Geometry>,
}

/// Geometry keys a settings edit set explicitly
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometryEdit {
    pub position: bool,
    pub size: bool,
}

impl GeometryEdit {
    pub fn of(patch: &DisplayPatch) -> Self {
        Self {
            position: patch.overlay_position.is_some(),
            size: patch.overlay_size.is_some(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    pointer: (i32, i32),
    origin: (i32, i32),
}

#[derive(Debug, Clone, Copy)]
struct ResizeState {
    pointer: (i32, i32),
    base: (u32, u32),
}

/// Observable overlay state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlaySnapshot {
    pub text: String,
    pub geometry: Geometry,
    pub visible: bool,
    pub auto_size: bool,
    pub font_size: u32,
    pub warning: Option<String>,
}

pub struct OverlayController<W: OverlayWindow> {
    window: W,
    settings: DisplaySettings,
    text: String,
    geometry: Geometry,
    visible: bool,
    drag: Option<DragState>,
    resize: Option<ResizeState>,
    warning: WarningNotice,
}

impl<W: OverlayWindow> OverlayController<W> {
    /// Configure `window` from `settings` and place it at the saved position
    pub fn new(mut window: W, settings: DisplaySettings, visible: bool) -> Self {
        let settings = settings.normalized();
        let font = font_of(&settings);

        let size = if settings.auto_size {
            let (width, height) = window.measure_text(WIDEST_DISPLAY_TEXT, &font);
            (width + AUTO_SIZE_PADDING, height + AUTO_SIZE_PADDING)
        } else {
            settings.overlay_size
        };
        let geometry = Geometry::new(settings.overlay_position, size);

        window.set_font(&font);
        window.set_colors(&settings.text_color, &settings.bg_color);
        window.set_opacity(settings.opacity);
        window.set_resizable(!settings.auto_size);
        window.set_geometry(geometry);
        window.set_text(IDLE_DISPLAY_TEXT);
        window.set_visible(visible);

        Self {
            window,
            settings,
            text: IDLE_DISPLAY_TEXT.to_string(),
            geometry,
            visible,
            drag: None,
            resize: None,
            warning: WarningNotice::new(),
        }
    }

    /// Show the new remaining time, refitting the window in auto-size mode
    pub fn on_tick(&mut self, remaining: f64) {
        self.show_text(format_time(remaining));
    }

    /// Return to the idle placeholder after a cancel or completion
    pub fn reset(&mut self) {
        self.show_text(IDLE_DISPLAY_TEXT.to_string());
    }

    /// Re-apply appearance and sizing mode from fresh settings.
    ///
    /// Position and size are taken from `settings` only when `edit` says the
    /// user set them; otherwise the overlay keeps the geometry it last had,
    /// so a stale record cannot undo a drag or resize.
    pub fn on_settings_changed(&mut self, settings: DisplaySettings, edit: GeometryEdit) {
        let mut settings = settings.normalized();
        if !edit.position {
            settings.overlay_position = self.settings.overlay_position;
        }
        if !edit.size {
            settings.overlay_size = self.settings.overlay_size;
        }
        let switched_to_manual = self.settings.auto_size && !settings.auto_size;
        if settings.auto_size != self.settings.auto_size {
            info!(
                "Overlay sizing switched to {}",
                if settings.auto_size { "auto-fit" } else { "manual" }
            );
        }
        self.settings = settings;

        self.window.set_font(&font_of(&self.settings));
        self.window
            .set_colors(&self.settings.text_color, &self.settings.bg_color);
        self.window.set_opacity(self.settings.opacity);
        self.window.set_resizable(!self.settings.auto_size);

        if self.settings.auto_size {
            self.fit_to_text();
        } else if edit.size || switched_to_manual {
            let manual = Geometry::new(self.geometry.position(), self.settings.overlay_size);
            self.apply_geometry(manual);
        }
        if edit.position {
            let (x, y) = self.settings.overlay_position;
            self.apply_geometry(Geometry { x, y, ..self.geometry });
        }
    }

    /// Show or hide the overlay without touching any other state
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.window.set_visible(visible);
        }
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerOutcome {
        match event {
            PointerEvent::Press { button: PointerButton::Primary, x, y } => {
                self.begin_drag(x, y);
                PointerOutcome::default()
            }
            PointerEvent::Press { button: PointerButton::Secondary, x, y } => {
                self.begin_resize(x, y);
                PointerOutcome::default()
            }
            PointerEvent::Move { x, y } => {
                if self.drag.is_some() {
                    self.drag_to(x, y);
                    PointerOutcome::default()
                } else {
                    PointerOutcome {
                        font_size: self.resize_to(x, y),
                        released: None,
                    }
                }
            }
            PointerEvent::Release => PointerOutcome {
                font_size: None,
                released: self.end_pointer(),
            },
        }
    }

    pub fn begin_drag(&mut self, x: i32, y: i32) {
        self.resize = None;
        self.drag = Some(DragState {
            pointer: (x, y),
            origin: self.geometry.position(),
        });
    }

    /// Move so the window follows the total pointer travel since the press
    pub fn drag_to(&mut self, x: i32, y: i32) {
        let Some(drag) = self.drag else {
            return;
        };
        let moved = Geometry {
            x: offset(drag.origin.0, x, drag.pointer.0),
            y: offset(drag.origin.1, y, drag.pointer.1),
            ..self.geometry
        };
        self.apply_geometry(moved);
    }

    /// Start a manual resize. Ignored in auto-size mode.
    pub fn begin_resize(&mut self, x: i32, y: i32) -> bool {
        if self.settings.auto_size {
            debug!("Ignoring resize request while auto-size is enabled");
            return false;
        }
        self.drag = None;
        self.resize = Some(ResizeState {
            pointer: (x, y),
            base: self.geometry.size(),
        });
        true
    }

    /// Resize from the press point. Returns a new font size when auto-size
    /// was switched on mid-resize and the box calls for a different one.
    pub fn resize_to(&mut self, x: i32, y: i32) -> Option<u32> {
        let resize = self.resize?;
        let width = extent(resize.base.0, x, resize.pointer.0, MIN_OVERLAY_WIDTH);
        let height = extent(resize.base.1, y, resize.pointer.1, MIN_OVERLAY_HEIGHT);

        self.apply_geometry(Geometry::new(self.geometry.position(), (width, height)));

        if self.settings.auto_size {
            self.adjust_font_size(width, height)
        } else {
            None
        }
    }

    /// Finish any drag or resize, returning the resulting geometry
    pub fn end_pointer(&mut self) -> Option<Geometry> {
        let was_resizing = self.resize.take().is_some();
        let was_dragging = self.drag.take().is_some();
        if !was_resizing && !was_dragging {
            return None;
        }
        if was_resizing {
            self.settings.overlay_size = self.geometry.size();
        }
        self.settings.overlay_position = self.geometry.position();
        Some(self.geometry)
    }

    pub fn present_warning(&mut self, threshold_secs: f64) {
        self.warning.present(&mut self.window, threshold_secs);
    }

    pub fn dismiss_warning(&mut self) -> bool {
        self.warning.dismiss(&mut self.window)
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn snapshot(&self) -> OverlaySnapshot {
        OverlaySnapshot {
            text: self.text.clone(),
            geometry: self.geometry,
            visible: self.visible,
            auto_size: self.settings.auto_size,
            font_size: self.settings.font_size,
            warning: self.warning.message().map(str::to_string),
        }
    }

    fn show_text(&mut self, text: String) {
        if text != self.text {
            self.window.set_text(&text);
            self.text = text;
        }
        if self.settings.auto_size {
            self.fit_to_text();
        }
    }

    /// Size the window to the current text plus padding, keeping its origin
    fn fit_to_text(&mut self) {
        let (width, height) = self
            .window
            .measure_text(&self.text, &font_of(&self.settings));
        let fitted = Geometry::new(
            self.geometry.position(),
            (width + AUTO_SIZE_PADDING, height + AUTO_SIZE_PADDING),
        );
        self.apply_geometry(fitted);
    }

    fn adjust_font_size(&mut self, width: u32, height: u32) -> Option<u32> {
        let size = clamp_font_size((width / FONT_WIDTH_DIVISOR).min(height / FONT_HEIGHT_DIVISOR));
        if size == self.settings.font_size {
            return None;
        }
        debug!("Resized box calls for font size {}", size);
        self.settings.font_size = size;
        self.window.set_font(&font_of(&self.settings));
        Some(size)
    }

    fn apply_geometry(&mut self, geometry: Geometry) {
        if geometry != self.geometry {
            self.geometry = geometry;
            self.window.set_geometry(geometry);
        }
    }
}

/// `base` moved by the pointer travel from `from` to `to`, saturating at the
/// screen coordinate range
fn offset(base: i32, to: i32, from: i32) -> i32 {
    let moved = base as i64 + (to as i64 - from as i64);
    moved.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// `base` grown by the pointer travel from `from` to `to`, kept within
/// `min..=u32::MAX`
fn extent(base: u32, to: i32, from: i32, min: u32) -> u32 {
    let grown = base as i64 + (to as i64 - from as i64);
    grown.clamp(min as i64, u32::MAX as i64) as u32
}

fn font_of(settings: &DisplaySettings) -> FontSpec {
    FontSpec {
        family: settings.font_family.clone(),
        size: settings.font_size,
    }
}
