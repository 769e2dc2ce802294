use crate::keys::KeyEvent;

#[derive(Debug, Clone)]
pub enum Command {
    /// Programmatically focus the search input, from any state.
    FocusSearch,
    Submit,
    Escape,
    InputKey(KeyEvent),
}
