use std::io::{self, Write};

use crossterm::{cursor::MoveTo, queue, style::Print};

use crate::controller::ViewContent;
use crate::layout::View;

use super::shared::{clip, reset_style, set_style, wrap_line, write_selectable, TextStyle};

/// Bordered box with the title in the top edge and one content row per inner line.
/// Every inner cell is written, so a box drawn later covers whatever was below it.
pub fn render_box(out: &mut impl Write, view: &View, content: &ViewContent, border: TextStyle) -> io::Result<()> {
    let r = view.rect;
    if r.width() < 2 || r.height() < 2 {
        return Ok(());
    }
    let inner_w = r.inner_width();

    set_style(out, border)?;
    queue!(out, MoveTo(r.x0, r.y0), Print('┌'), Print(top_edge(&view.title, inner_w)), Print('┐'))?;
    for y in r.y0 + 1..r.y1 {
        queue!(out, MoveTo(r.x0, y), Print('│'), MoveTo(r.x1, y), Print('│'))?;
    }
    queue!(out, MoveTo(r.x0, r.y1), Print('└'), Print("─".repeat(inner_w)), Print('┘'))?;
    reset_style(out)?;

    for row in 0..r.inner_height() {
        let index = content.first_line + row;
        let text = content.lines.get(index).map(String::as_str).unwrap_or("");
        queue!(out, MoveTo(r.x0 + 1, r.y0 + 1 + row as u16))?;
        write_selectable(out, text, inner_w, content.selected == Some(index))?;
    }
    Ok(())
}

fn top_edge(title: &str, width: usize) -> String {
    if title.is_empty() {
        return "─".repeat(width);
    }
    let label = format!(" {} ", title);
    let label = clip(&label, width);
    format!("{}{}", label, "─".repeat(width - label.chars().count()))
}

/// Single unbordered row, e.g. the options bar.
pub fn render_bar(out: &mut impl Write, view: &View, content: &ViewContent, style: TextStyle) -> io::Result<()> {
    let r = view.rect;
    let text = content.lines.first().map(String::as_str).unwrap_or("");
    set_style(out, style)?;
    queue!(out, MoveTo(r.x0, r.y0))?;
    write_selectable(out, text, r.width() as usize, false)?;
    reset_style(out)
}

/// The "Not Enough Space" placeholder: the title wrapped into the whole terminal.
pub fn render_limit(out: &mut impl Write, view: &View) -> io::Result<()> {
    let r = view.rect;
    let width = r.width() as usize;
    for (row, line) in wrap_line(&view.title, width).iter().take(r.height() as usize).enumerate() {
        queue!(out, MoveTo(r.x0, r.y0 + row as u16), Print(line))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_edge_fills_width() {
        assert_eq!(top_edge("Logs", 10), " Logs ────");
        assert_eq!(top_edge("", 3), "───");
        assert_eq!(top_edge("Containers", 6), " Conta");
    }
}
