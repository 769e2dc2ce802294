use tracing::debug;

use super::fetcher::Fetcher;
use super::focus::{DropdownFocus, FocusState};
use super::history::RecentSearches;
use super::merge;
use super::model::{FetchState, ListEntry};
use crate::config::SearchOptions;
use crate::keys::{KeyCode, KeyEvent, KeyModifiers};
use crate::lookup::LookupEvent;
use crate::runtime::command::Command;
use crate::runtime::effect::Effect;
use crate::runtime::event::{AppEvent, SearchAction};
use crate::runtime::scheduler::SchedulerCommand;

const SETTLE_KEY: &str = "settle";
const GRACE_KEY: &str = "blur_grace";

/// The search input plus its dropdown, as one component: owns the raw
/// query text, the focus machine, the recent-selection store, and the
/// fetcher. Handlers are synchronous and return the effects the runner
/// should apply; no state mutation is observable mid-handler.
pub struct LocationSearch {
    options: SearchOptions,
    raw_query: String,
    cursor: usize,
    focus: DropdownFocus,
    history: RecentSearches,
    fetcher: Fetcher,
}

impl LocationSearch {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            raw_query: String::new(),
            cursor: 0,
            focus: DropdownFocus::new(),
            history: RecentSearches::new(),
            fetcher: Fetcher::new(),
        }
    }

    pub fn raw_query(&self) -> &str {
        &self.raw_query
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn focus_state(&self) -> FocusState {
        self.focus.state()
    }

    pub fn dropdown_open(&self) -> bool {
        self.focus.is_open()
    }

    pub fn fetch_state(&self) -> &FetchState {
        self.fetcher.state()
    }

    pub fn recent(&self) -> &RecentSearches {
        &self.history
    }

    pub fn rows(&self) -> Vec<ListEntry> {
        merge::combine(&self.history, self.fetcher.state())
    }

    pub fn handle_command(&mut self, command: Command) -> Vec<Effect> {
        match command {
            Command::FocusSearch => self.focus_input(),
            Command::Submit => self.submit(),
            Command::Escape => self.escape(),
            Command::InputKey(key) => self.handle_key(key),
        }
    }

    /// Raw-text editing. Only the focused input receives keystrokes; each
    /// edit restarts the settle debounce with the full current text.
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if self.focus.state() != FocusState::Focused {
            return Vec::new();
        }

        let edited = match (key.code, key.modifiers) {
            (KeyCode::Char(ch), mods)
                if mods == KeyModifiers::NONE || mods == KeyModifiers::SHIFT =>
            {
                let at = self.byte_index(self.cursor);
                self.raw_query.insert(at, ch);
                self.cursor += 1;
                true
            }
            (KeyCode::Backspace, mods) if mods == KeyModifiers::NONE => {
                if self.cursor == 0 {
                    false
                } else {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.raw_query.remove(at);
                    true
                }
            }
            (KeyCode::Delete, mods) if mods == KeyModifiers::NONE => {
                if self.cursor < self.char_count() {
                    let at = self.byte_index(self.cursor);
                    self.raw_query.remove(at);
                    true
                } else {
                    false
                }
            }
            (KeyCode::Left, mods) if mods == KeyModifiers::NONE => {
                self.cursor = self.cursor.saturating_sub(1);
                return vec![Effect::RequestRender];
            }
            (KeyCode::Right, mods) if mods == KeyModifiers::NONE => {
                self.cursor = (self.cursor + 1).min(self.char_count());
                return vec![Effect::RequestRender];
            }
            (KeyCode::Home, mods) if mods == KeyModifiers::NONE => {
                self.cursor = 0;
                return vec![Effect::RequestRender];
            }
            (KeyCode::End, mods) if mods == KeyModifiers::NONE => {
                self.cursor = self.char_count();
                return vec![Effect::RequestRender];
            }
            _ => false,
        };

        if !edited {
            return Vec::new();
        }

        vec![
            Effect::Schedule(SchedulerCommand::Debounce {
                key: SETTLE_KEY.to_string(),
                delay: self.options.debounce_delay(),
                event: AppEvent::QuerySettled {
                    text: self.raw_query.clone(),
                },
            }),
            Effect::RequestRender,
        ]
    }

    /// Focus from the host (pointer focus on the input).
    pub fn handle_focus(&mut self) -> Vec<Effect> {
        self.focus_input()
    }

    /// Programmatic focus: the global shortcut path. Opens the dropdown
    /// from any state and discards a running blur grace.
    pub fn focus_input(&mut self) -> Vec<Effect> {
        let mut effects = vec![Effect::Schedule(SchedulerCommand::Cancel {
            key: GRACE_KEY.to_string(),
        })];
        if self.focus.focus() {
            effects.push(Effect::RequestRender);
        }
        effects
    }

    pub fn handle_blur(&mut self) -> Vec<Effect> {
        if !self.focus.blur() {
            return Vec::new();
        }
        vec![Effect::Schedule(SchedulerCommand::EmitAfter {
            key: GRACE_KEY.to_string(),
            delay: self.options.grace_delay(),
            event: AppEvent::GraceElapsed,
        })]
    }

    pub fn on_grace_elapsed(&mut self) -> Vec<Effect> {
        if self.focus.grace_elapsed() {
            vec![Effect::RequestRender]
        } else {
            Vec::new()
        }
    }

    pub fn pointer_entered(&mut self) -> Vec<Effect> {
        self.focus.pointer_entered();
        Vec::new()
    }

    pub fn pointer_left(&mut self) -> Vec<Effect> {
        if self.focus.pointer_left() {
            vec![Effect::RequestRender]
        } else {
            Vec::new()
        }
    }

    /// A settled query from the debounce timer.
    pub fn on_query_settled(&mut self, text: &str) -> Vec<Effect> {
        debug!(query = %text, "query settled");
        match self.fetcher.settle(text) {
            Some(request) => vec![Effect::Lookup(request), Effect::RequestRender],
            None => vec![Effect::RequestRender],
        }
    }

    pub fn on_lookup(&mut self, event: LookupEvent) -> Vec<Effect> {
        if self.fetcher.apply(event) {
            vec![Effect::RequestRender]
        } else {
            Vec::new()
        }
    }

    /// Activation of a dropdown row, by pointer or otherwise. Works while
    /// the dropdown is visible, which includes the blur grace window.
    pub fn select_row(&mut self, index: usize) -> Vec<Effect> {
        if !self.focus.is_open() {
            return Vec::new();
        }
        let Some(name) = self.rows().get(index).map(|row| row.name().to_string()) else {
            return Vec::new();
        };
        self.confirm(&name)
    }

    /// Submitting the input treats the literal typed text as the choice.
    fn submit(&mut self) -> Vec<Effect> {
        let name = self.raw_query.trim().to_string();
        self.confirm(&name)
    }

    /// The selection dispatcher: emit the choice, apply the history push
    /// policy, clear the raw query, and close immediately (no grace).
    /// Both activation paths end up here.
    fn confirm(&mut self, name: &str) -> Vec<Effect> {
        let name = name.trim();
        if name.is_empty() {
            return Vec::new();
        }

        debug!(%name, "selection confirmed");
        let mut effects = vec![Effect::Action(SearchAction::LocationChosen(
            name.to_string(),
        ))];

        self.history.push(name);
        self.raw_query.clear();
        self.cursor = 0;
        // Bumps the generation, so any in-flight lookup response is stale.
        self.fetcher.settle("");
        self.focus.force_idle();

        effects.push(Effect::Schedule(SchedulerCommand::Cancel {
            key: SETTLE_KEY.to_string(),
        }));
        effects.push(Effect::Schedule(SchedulerCommand::Cancel {
            key: GRACE_KEY.to_string(),
        }));
        effects.push(Effect::RequestRender);
        effects
    }

    fn escape(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();

        if self.options.escape_clears_query && !self.raw_query.is_empty() {
            self.raw_query.clear();
            self.cursor = 0;
            self.fetcher.settle("");
            effects.push(Effect::Schedule(SchedulerCommand::Cancel {
                key: SETTLE_KEY.to_string(),
            }));
        }

        if self.focus.force_idle() {
            effects.push(Effect::Schedule(SchedulerCommand::Cancel {
                key: GRACE_KEY.to_string(),
            }));
            effects.push(Effect::RequestRender);
        }

        effects
    }

    fn char_count(&self) -> usize {
        self.raw_query.chars().count()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.raw_query
            .char_indices()
            .nth(char_idx)
            .map(|(idx, _)| idx)
            .unwrap_or(self.raw_query.len())
    }
}
