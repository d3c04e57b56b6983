//! Rendering collaborator interface

/// Receives cell state changes. The simulation never reads visuals back.
pub trait CellRenderer: Send {
    fn set_cell_visual(&mut self, index: usize, alive: bool);
}

/// Renderer that discards every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl CellRenderer for NullRenderer {
    fn set_cell_visual(&mut self, _index: usize, _alive: bool) {}
}

impl<F> CellRenderer for F
where
    F: FnMut(usize, bool) + Send,
{
    fn set_cell_visual(&mut self, index: usize, alive: bool) {
        self(index, alive)
    }
}
