use std::io;

use crossterm::terminal;

use crate::view::Renderer;

use super::App;

pub fn render(app: &mut App) -> io::Result<()> {
    let (width, height) = terminal::size()?;
    let frame = app.dashboard.frame(width, height);
    app.presenter.draw(&frame)
}
