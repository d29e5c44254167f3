use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
};

use crate::controller::ViewContent;
use crate::layout::View;

use super::shared::{clip, wrap_line};

/// Red prompt box over the middle of the screen.
pub fn render_confirmation(out: &mut impl Write, view: &View, content: &ViewContent) -> io::Result<()> {
    let r = view.rect;
    let width = r.width() as usize;
    let text_width = width.saturating_sub(4);
    let rows: Vec<String> = content.lines.iter().flat_map(|l| wrap_line(l, text_width)).collect();

    queue!(
        out,
        SetBackgroundColor(Color::DarkRed),
        SetForegroundColor(Color::White),
        SetAttribute(Attribute::Bold)
    )?;
    for (i, y) in (r.y0..=r.y1).enumerate() {
        // first and last rows stay blank as padding
        let text = match i {
            0 => "",
            n => rows.get(n - 1).map(String::as_str).unwrap_or(""),
        };
        let text = clip(text, text_width);
        let line = format!("  {:<w$}  ", text, w = text_width);
        queue!(out, MoveTo(r.x0, y), Print(clip(&line, width)))?;
    }
    queue!(out, ResetColor, SetAttribute(Attribute::Reset))?;
    Ok(())
}
