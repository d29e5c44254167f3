pub mod shared;
mod panel;
mod confirmation;

use std::io::{self, Write};

use crossterm::{
    queue,
    terminal::{Clear, ClearType},
};

use crate::config::ThemeConfig;
use crate::controller::{Frame, ViewContent};
use crate::model::ViewId;

pub use shared::{truncate_str, wrap_line, TextStyle};

/// Anything that can put a [`Frame`] on screen.
pub trait Renderer {
    fn draw(&mut self, frame: &Frame) -> io::Result<()>;
}

/// Border and text styles resolved from the theme config.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Theme {
    pub active_border: TextStyle,
    pub inactive_border: TextStyle,
    pub options_text: TextStyle,
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Self {
        Self {
            active_border: shared::parse_style(&config.active_border_color),
            inactive_border: shared::parse_style(&config.inactive_border_color),
            options_text: shared::parse_style(&config.options_text_color),
        }
    }
}

/// Draws frames with crossterm onto any writer.
pub struct Presenter<W: Write> {
    out: W,
    theme: Theme,
}

impl<W: Write> Presenter<W> {
    pub fn new(out: W, theme: Theme) -> Self {
        Self { out, theme }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for Presenter<W> {
    fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All))?;
        let empty = ViewContent::default();

        for view in &frame.views {
            let content = frame.content(view.id).unwrap_or(&empty);
            match view.id {
                ViewId::Limit => panel::render_limit(&mut self.out, view)?,
                ViewId::Options => panel::render_bar(&mut self.out, view, content, self.theme.options_text)?,
                ViewId::Confirmation => confirmation::render_confirmation(&mut self.out, view, content)?,
                id => {
                    let border = if frame.focused == Some(id) {
                        self.theme.active_border
                    } else {
                        self.theme.inactive_border
                    };
                    panel::render_box(&mut self.out, view, content, border)?;
                }
            }
        }
        self.out.flush()
    }
}
