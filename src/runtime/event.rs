use crate::keys::KeyEvent;
use crate::lookup::LookupEvent;
use crate::runtime::command::Command;

/// Everything the runner can feed through the engine. Input events come
/// from the host; `QuerySettled` and `GraceElapsed` are produced by the
/// scheduler; `Lookup` events are drained from the worker.
#[derive(Debug, Clone)]
pub enum AppEvent {
    Key(KeyEvent),
    FocusGained,
    FocusLost,
    PointerEntered,
    PointerLeft,
    PointerSelect(usize),
    Command(Command),
    Lookup(LookupEvent),
    QuerySettled { text: String },
    GraceElapsed,
}

/// Actions emitted by the engine toward its consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    LocationChosen(String),
}
