use egui::{Context, Key, KeyboardShortcut, Modifiers, Pos2, Rect};

/// Ctrl+Z, or Cmd+Z on macOS
pub const UNDO_SHORTCUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);

/// One step of a single-finger drawing gesture, in surface-local device pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// Finger down / primary button pressed on the canvas
    Start(Pos2),
    /// Pointer moved while the gesture is active
    Move(Pos2),
    /// Finger lifted / button released
    End(Pos2),
}

/// The parts of egui's pointer state the gesture translator looks at
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerSample {
    /// Latest pointer position in egui points
    pub pos: Option<Pos2>,
    pub pressed: bool,
    pub down: bool,
    pub released: bool,
}

/// Turns raw egui pointer input into `GestureEvent`s for the canvas
#[derive(Debug)]
pub struct InputHandler {
    canvas_rect: Rect,
    pixels_per_point: f32,
    last_pointer_pos: Option<Pos2>,
    gesture_active: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(Rect::NOTHING, 1.0)
    }
}

impl InputHandler {
    pub fn new(canvas_rect: Rect, pixels_per_point: f32) -> Self {
        Self {
            canvas_rect,
            pixels_per_point,
            last_pointer_pos: None,
            gesture_active: false,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect, pixels_per_point: f32) {
        self.canvas_rect = rect;
        self.pixels_per_point = pixels_per_point;
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture_active
    }

    /// Map a position in egui points to surface-local device pixels
    pub fn to_surface(&self, pos: Pos2) -> Pos2 {
        ((pos - self.canvas_rect.min) * self.pixels_per_point).to_pos2()
    }

    /// Read this frame's pointer state from egui and translate it.
    ///
    /// `canvas_hovered` is false while something (a window, a popup) covers
    /// the canvas; presses there must not start a stroke.
    pub fn process_input(&mut self, ctx: &Context, canvas_hovered: bool) -> Vec<GestureEvent> {
        let sample = ctx.input(|input| PointerSample {
            pos: input.pointer.interact_pos(),
            pressed: input.pointer.primary_pressed() && canvas_hovered,
            down: input.pointer.primary_down(),
            released: input.pointer.primary_released(),
        });
        self.process_pointer(sample)
    }

    /// Translate one frame of pointer state.
    ///
    /// A gesture only starts on a press inside the canvas; once started it
    /// follows the pointer anywhere until release. A press and release in the
    /// same frame yields a start immediately followed by an end.
    pub fn process_pointer(&mut self, sample: PointerSample) -> Vec<GestureEvent> {
        let mut events = Vec::new();

        if sample.pressed {
            if let Some(pos) = sample.pos.filter(|p| self.canvas_rect.contains(*p)) {
                events.push(GestureEvent::Start(self.to_surface(pos)));
                self.gesture_active = true;
                self.last_pointer_pos = Some(pos);
            }
        } else if self.gesture_active && sample.down {
            if let Some(pos) = sample.pos {
                if Some(pos) != self.last_pointer_pos {
                    events.push(GestureEvent::Move(self.to_surface(pos)));
                    self.last_pointer_pos = Some(pos);
                }
            }
        }

        if sample.released && self.gesture_active {
            let pos = sample.pos.or(self.last_pointer_pos).unwrap_or(self.canvas_rect.min);
            events.push(GestureEvent::End(self.to_surface(pos)));
            self.gesture_active = false;
            self.last_pointer_pos = None;
        }

        events
    }
}

/// True if the undo shortcut was pressed this frame; the key press is consumed.
///
/// Left alone while a text field has focus, so it can undo its own edits.
pub fn undo_requested(ctx: &Context) -> bool {
    if ctx.wants_keyboard_input() {
        return false;
    }
    ctx.input_mut(|input| input.consume_shortcut(&UNDO_SHORTCUT))
}
