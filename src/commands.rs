//! Command types for the Elm-style architecture
//!
//! Commands are what an update asks the host to do afterwards.

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cmd {
    /// No command - do nothing
    #[default]
    None,
    /// The tree changed; repaint it
    Redraw,
    /// Execute multiple commands
    Batch(Vec<Cmd>),
}

impl Cmd {
    /// Whether the host has to repaint after this command
    pub fn needs_redraw(&self) -> bool {
        match self {
            Cmd::None => false,
            Cmd::Redraw => true,
            Cmd::Batch(cmds) => cmds.iter().any(Cmd::needs_redraw),
        }
    }
}
