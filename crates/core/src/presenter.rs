//! Visibility of the spinner, modal, backdrop and failure notice.
//!
//! [`OverlayPresenter`] tracks what is on screen and only forwards real
//! changes to the [`Surface`], so every show/hide call is idempotent. The
//! backdrop also owns the page scroll-lock: scrolling is disabled while it is
//! visible and restored only once its fade-out has finished.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, trace};

use crate::event::{EventSender, OverlayEvent};
use crate::render::RenderInstruction;

/// Backdrop appearance requested from the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackdropPaint {
    Shown,
    /// Fade-out transition in progress; the element is still present.
    FadingOut,
    Removed,
}

/// The rendering surface the overlay draws on (the page DOM in a browser).
pub trait Surface {
    fn set_spinner(&mut self, visible: bool);
    fn set_modal(&mut self, visible: bool);
    fn set_backdrop(&mut self, paint: BackdropPaint);
    fn set_scroll_locked(&mut self, locked: bool);
    fn set_input_focus(&mut self, focused: bool);
    /// Show or clear the notice displayed when search cannot be loaded.
    fn set_notice(&mut self, message: Option<&str>);
    /// Replace the result area (count line, empty state, entries).
    fn apply(&mut self, instruction: &RenderInstruction);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackdropState {
    Hidden,
    Visible,
    FadingOut { generation: u64 },
}

pub struct OverlayPresenter<S> {
    surface: S,
    events: EventSender,
    fade: Duration,
    spinner: bool,
    modal: bool,
    notice: bool,
    focused: bool,
    backdrop: BackdropState,
    fade_generation: u64,
}

impl<S: Surface> OverlayPresenter<S> {
    pub fn new(surface: S, fade: Duration, events: EventSender) -> Self {
        Self {
            surface,
            events,
            fade,
            spinner: false,
            modal: false,
            notice: false,
            focused: false,
            backdrop: BackdropState::Hidden,
            fade_generation: 0,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    pub fn is_spinner_visible(&self) -> bool {
        self.spinner
    }

    pub fn is_modal_visible(&self) -> bool {
        self.modal
    }

    /// True while the backdrop is shown or still fading out.
    pub fn is_backdrop_present(&self) -> bool {
        self.backdrop != BackdropState::Hidden
    }

    /// Scroll is locked for as long as the backdrop element exists.
    pub fn is_scroll_locked(&self) -> bool {
        self.is_backdrop_present()
    }

    pub fn show_spinner(&mut self) {
        if !self.spinner {
            self.spinner = true;
            self.surface.set_spinner(true);
        }
    }

    pub fn hide_spinner(&mut self) {
        if self.spinner {
            self.spinner = false;
            self.surface.set_spinner(false);
        }
    }

    pub fn show_modal(&mut self) {
        if !self.modal {
            self.modal = true;
            self.surface.set_modal(true);
        }
    }

    pub fn hide_modal(&mut self) {
        if self.modal {
            self.modal = false;
            self.surface.set_modal(false);
        }
    }

    pub fn show_notice(&mut self, message: &str) {
        if !self.notice {
            self.notice = true;
            self.surface.set_notice(Some(message));
        }
    }

    pub fn hide_notice(&mut self) {
        if self.notice {
            self.notice = false;
            self.surface.set_notice(None);
        }
    }

    pub fn focus_input(&mut self) {
        if !self.focused {
            self.focused = true;
            self.surface.set_input_focus(true);
        }
    }

    pub fn blur_input(&mut self) {
        if self.focused {
            self.focused = false;
            self.surface.set_input_focus(false);
        }
    }

    pub fn show_backdrop(&mut self) {
        match self.backdrop {
            BackdropState::Visible => {}
            BackdropState::Hidden => {
                self.backdrop = BackdropState::Visible;
                self.surface.set_backdrop(BackdropPaint::Shown);
                self.surface.set_scroll_locked(true);
            }
            BackdropState::FadingOut { generation } => {
                // Pending removal is cancelled; scroll was never unlocked.
                trace!(generation, "Backdrop fade interrupted");
                self.backdrop = BackdropState::Visible;
                self.surface.set_backdrop(BackdropPaint::Shown);
            }
        }
    }

    /// Start fading the backdrop out. It is removed and scrolling restored in
    /// [`finish_backdrop_fade`](Self::finish_backdrop_fade) once the fade completes.
    pub fn hide_backdrop(&mut self) {
        if self.backdrop != BackdropState::Visible {
            return;
        }
        self.fade_generation += 1;
        let generation = self.fade_generation;
        self.backdrop = BackdropState::FadingOut { generation };
        self.surface.set_backdrop(BackdropPaint::FadingOut);

        if self.fade.is_zero() {
            self.finish_backdrop_fade(generation);
            return;
        }
        let fade = self.fade;
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(fade).await;
            let _ = events.send(OverlayEvent::BackdropFaded { generation });
        });
    }

    /// Complete the fade started under `generation`. Stale completions are ignored.
    pub fn finish_backdrop_fade(&mut self, generation: u64) -> bool {
        match self.backdrop {
            BackdropState::FadingOut { generation: current } if current == generation => {
                self.backdrop = BackdropState::Hidden;
                self.surface.set_backdrop(BackdropPaint::Removed);
                self.surface.set_scroll_locked(false);
                true
            }
            _ => {
                debug!(generation, "Stale backdrop fade completion");
                false
            }
        }
    }

    pub fn render(&mut self, instruction: &RenderInstruction) {
        self.surface.apply(instruction);
    }
}
