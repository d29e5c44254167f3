use std::io::{self, Write};

use crossterm::{
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
};

/// Truncate a string to at most `max_len` characters (not bytes), appending "..."
/// if truncated. Safe for multi-byte UTF-8.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else {
        let keep = max_len.saturating_sub(3);
        let truncated: String = s.chars().take(keep).collect();
        format!("{}...", truncated)
    }
}

/// First `width` characters of `s`, without an ellipsis.
pub fn clip(s: &str, width: usize) -> &str {
    match s.char_indices().nth(width) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

const TAB_WIDTH: usize = 8;

/// Make a line of command output safe to place in a box: escape sequences and
/// control characters are removed, tabs become spaces up to the next tab stop.
pub fn printable_line(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut column = 0;
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\x1b' => match chars.next() {
                // CSI: parameters up to a final byte in '@'..='~'
                Some('[') => {
                    for c in chars.by_ref() {
                        if ('@'..='~').contains(&c) {
                            break;
                        }
                    }
                }
                // OSC: up to BEL or ESC '\'
                Some(']') => {
                    while let Some(c) = chars.next() {
                        if c == '\x07' {
                            break;
                        }
                        if c == '\x1b' {
                            chars.next_if_eq(&'\\');
                            break;
                        }
                    }
                }
                _ => {}
            },
            '\t' => {
                let pad = TAB_WIDTH - column % TAB_WIDTH;
                out.extend(std::iter::repeat_n(' ', pad));
                column += pad;
            }
            c if c.is_control() => {}
            c => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

/// Hard-wrap a line at `width` characters. An empty line stays one empty row.
pub fn wrap_line(s: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    let chars: Vec<char> = s.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}

/// Style described by a theme entry such as `["green", "bold"]`. Unknown names are
/// ignored; `default` leaves the terminal color alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextStyle {
    pub color: Option<Color>,
    pub bold: bool,
    pub underline: bool,
    pub reverse: bool,
}

pub fn parse_style(names: &[String]) -> TextStyle {
    let mut style = TextStyle::default();
    for name in names {
        match name.to_ascii_lowercase().as_str() {
            "bold" => style.bold = true,
            "underline" => style.underline = true,
            "reverse" => style.reverse = true,
            "default" => style.color = None,
            other => {
                if let Some(color) = parse_color(other) {
                    style.color = Some(color);
                }
            }
        }
    }
    style
}

fn parse_color(name: &str) -> Option<Color> {
    let color = match name {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        _ => return None,
    };
    Some(color)
}

pub fn set_style(out: &mut impl Write, style: TextStyle) -> io::Result<()> {
    if let Some(color) = style.color {
        queue!(out, SetForegroundColor(color))?;
    }
    if style.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if style.underline {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    if style.reverse {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    Ok(())
}

pub fn reset_style(out: &mut impl Write) -> io::Result<()> {
    queue!(out, ResetColor, SetAttribute(Attribute::Reset))
}

/// Write `text` padded to `width`, highlighted when selected.
pub fn write_selectable(out: &mut impl Write, text: &str, width: usize, selected: bool) -> io::Result<()> {
    if selected {
        queue!(out, SetBackgroundColor(Color::DarkBlue), SetForegroundColor(Color::White))?;
    }
    let text = clip(text, width);
    let pad = width.saturating_sub(text.chars().count());
    queue!(out, Print(text), Print(" ".repeat(pad)))?;
    if selected {
        queue!(out, ResetColor)?;
    }
    Ok(())
}
