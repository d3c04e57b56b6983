use lifegrid::CellRenderer;
use std::io::{self, Write};

/// Character framebuffer fed by the simulation's cell updates
pub struct TerminalRenderer {
    columns: usize,
    frame: Vec<bool>,
}

impl TerminalRenderer {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            frame: vec![false; columns * rows],
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.frame.len() + self.frame.len() / self.columns);
        for row in self.frame.chunks(self.columns) {
            out.extend(row.iter().map(|&alive| if alive { '#' } else { '.' }));
            out.push('\n');
        }
        out
    }

    pub fn print(&self, header: &str) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", header)?;
        stdout.write_all(self.render().as_bytes())?;
        stdout.flush()
    }
}

impl CellRenderer for TerminalRenderer {
    fn set_cell_visual(&mut self, index: usize, alive: bool) {
        if let Some(slot) = self.frame.get_mut(index) {
            *slot = alive;
        }
    }
}
