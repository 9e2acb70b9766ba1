//! Terminal rendition of the overlay's page surface.

use std::io::Write;

use searchlight_core::markup::results_html;
use searchlight_core::presenter::{BackdropPaint, Surface};
use searchlight_core::render::RenderInstruction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Html,
    Json,
}

/// Prints every surface change as one line, and rendered results in the chosen format.
pub struct TerminalSurface<W> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        // Output is best-effort; a closed stdout must not take the session down.
        let _ = writeln!(self.out, "{text}");
    }

    fn show_text(&mut self, instruction: &RenderInstruction) {
        match instruction {
            RenderInstruction::Unavailable { message } => self.line(&format!("[results] {message}")),
            RenderInstruction::Results(view) => {
                self.line(&format!("[results] {}", view.message));
                if view.empty_state_visible {
                    self.line("[results] (no result)");
                }
                for (i, entry) in view.entries.iter().enumerate() {
                    let date = if entry.date.is_empty() { String::new() } else { format!(" · {}", entry.date) };
                    self.line(&format!("  {}. {}{date}", i + 1, entry.title));
                    if !entry.href.is_empty() {
                        self.line(&format!("     {}", entry.href));
                    }
                    let excerpt = strip_tags(&entry.excerpt_html);
                    if !excerpt.trim().is_empty() {
                        self.line(&format!("     {}", excerpt.trim()));
                    }
                }
            }
        }
    }
}

/// Drop markup from index-provided highlight HTML for terminal display.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn shown(visible: bool) -> &'static str {
    if visible {
        "shown"
    } else {
        "hidden"
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn set_spinner(&mut self, visible: bool) {
        self.line(&format!("[overlay] spinner {}", shown(visible)));
    }

    fn set_modal(&mut self, visible: bool) {
        self.line(&format!("[overlay] search modal {}", shown(visible)));
    }

    fn set_backdrop(&mut self, paint: BackdropPaint) {
        let state = match paint {
            BackdropPaint::Shown => "shown",
            BackdropPaint::FadingOut => "fading out",
            BackdropPaint::Removed => "removed",
        };
        self.line(&format!("[overlay] backdrop {state}"));
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.line(if locked { "[page] scrolling disabled" } else { "[page] scrolling restored" });
    }

    fn set_input_focus(&mut self, focused: bool) {
        self.line(if focused { "[overlay] search input focused" } else { "[overlay] search input blurred" });
    }

    fn set_notice(&mut self, message: Option<&str>) {
        match message {
            Some(message) => self.line(&format!("[overlay] ! {message}")),
            None => self.line("[overlay] notice cleared"),
        }
    }

    fn apply(&mut self, instruction: &RenderInstruction) {
        match self.format {
            OutputFormat::Text => self.show_text(instruction),
            OutputFormat::Html => match instruction {
                RenderInstruction::Results(view) => {
                    self.line(&format!("<p class=\"results-count\">{}</p>", view.message));
                    if view.empty_state_visible {
                        self.line("<div class=\"no-result\"></div>");
                    } else {
                        let html = results_html(&view.entries);
                        self.line(&html);
                    }
                }
                RenderInstruction::Unavailable { message } => {
                    self.line(&format!("<p class=\"results-count\">{message}</p>"));
                }
            },
            OutputFormat::Json => match serde_json::to_string(instruction) {
                Ok(json) => self.line(&json),
                Err(e) => self.line(&format!("[results] could not encode: {e}")),
            },
        }
    }
}
