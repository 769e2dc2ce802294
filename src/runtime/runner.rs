use std::time::{Duration, Instant};

use crate::components::location_search::{FocusState, LocationSearch};
use crate::config::SearchOptions;
use crate::lookup::{LookupService, LookupWorker};
use crate::runtime::command::Command;
use crate::runtime::effect::Effect;
use crate::runtime::event::{AppEvent, SearchAction};
use crate::runtime::key_bindings::KeyBindings;
use crate::runtime::scheduler::Scheduler;

/// What one dispatch or tick produced: actions for the consumer and
/// whether the dropdown needs re-rendering.
#[derive(Debug, Default)]
pub struct Dispatched {
    pub actions: Vec<SearchAction>,
    pub render: bool,
}

impl Dispatched {
    fn absorb(&mut self, other: Dispatched) {
        self.actions.extend(other.actions);
        self.render |= other.render;
    }
}

/// Single-threaded pump around the search component. Events dispatch one
/// at a time and each handler runs to completion; the only suspension
/// points are the scheduler (debounce, blur grace) and the lookup worker,
/// both drained on `tick`. The key-binding table (including the
/// document-level focus shortcut) lives and dies with the runner, so a
/// remount cannot leave a stale handler behind.
pub struct SearchRunner {
    component: LocationSearch,
    scheduler: Scheduler,
    bindings: KeyBindings,
    worker: LookupWorker,
}

impl SearchRunner {
    pub fn new(options: SearchOptions, service: impl LookupService) -> Self {
        Self {
            component: LocationSearch::new(options),
            scheduler: Scheduler::new(),
            bindings: KeyBindings::new(),
            worker: LookupWorker::spawn(service),
        }
    }

    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn component(&self) -> &LocationSearch {
        &self.component
    }

    pub fn dispatch(&mut self, event: AppEvent, now: Instant) -> Dispatched {
        let effects = self.route(event);
        self.apply_effects(effects, now)
    }

    /// Drains due timer emissions and lookup completions.
    pub fn tick(&mut self, now: Instant) -> Dispatched {
        let mut out = Dispatched::default();

        for event in self.scheduler.drain_ready(now) {
            out.absorb(self.dispatch(event, now));
        }
        for event in self.worker.drain_ready() {
            out.absorb(self.dispatch(AppEvent::Lookup(event), now));
        }

        out
    }

    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        self.scheduler.poll_timeout(now, default_timeout)
    }

    fn route(&mut self, event: AppEvent) -> Vec<Effect> {
        match event {
            AppEvent::Key(key) => {
                let focused = self.component.focus_state() == FocusState::Focused;
                match self.bindings.resolve(key) {
                    // The focus shortcut works from anywhere in the
                    // document; everything else needs the input focused.
                    Some(Command::FocusSearch) => {
                        self.component.handle_command(Command::FocusSearch)
                    }
                    Some(command) if focused => self.component.handle_command(command),
                    Some(_) => Vec::new(),
                    None if focused => self.component.handle_key(key),
                    None => Vec::new(),
                }
            }
            AppEvent::FocusGained => self.component.handle_focus(),
            AppEvent::FocusLost => self.component.handle_blur(),
            AppEvent::PointerEntered => self.component.pointer_entered(),
            AppEvent::PointerLeft => self.component.pointer_left(),
            AppEvent::PointerSelect(index) => self.component.select_row(index),
            AppEvent::Command(command) => self.component.handle_command(command),
            AppEvent::Lookup(event) => self.component.on_lookup(event),
            AppEvent::QuerySettled { text } => self.component.on_query_settled(&text),
            AppEvent::GraceElapsed => self.component.on_grace_elapsed(),
        }
    }

    fn apply_effects(&mut self, effects: Vec<Effect>, now: Instant) -> Dispatched {
        let mut out = Dispatched::default();

        for effect in effects {
            match effect {
                Effect::Action(action) => out.actions.push(action),
                Effect::Schedule(command) => self.scheduler.schedule(command, now),
                Effect::Lookup(request) => self.worker.submit(request),
                Effect::RequestRender => out.render = true,
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use super::SearchRunner;
    use crate::components::location_search::{FocusState, ListEntry};
    use crate::config::SearchOptions;
    use crate::keys::{KeyCode, KeyEvent};
    use crate::lookup::{LookupError, LookupEvent, SuggestionEntry};
    use crate::runtime::event::{AppEvent, SearchAction};

    const DEBOUNCE: Duration = Duration::from_millis(500);

    fn counting_service(
        calls: Arc<AtomicUsize>,
    ) -> impl Fn(&str) -> Result<Vec<SuggestionEntry>, LookupError> + Send + 'static {
        move |query: &str| {
            calls.fetch_add(1, Ordering::SeqCst);
            match query {
                "Lon" | "London" => Ok(vec![SuggestionEntry::new(
                    "London",
                    "City of London, Greater London",
                    "United Kingdom",
                )]),
                "Par" => Ok(vec![SuggestionEntry::new("Paris", "Ile-de-France", "France")]),
                "Xyzzy" => Ok(Vec::new()),
                "Xy" => Err(LookupError::Service {
                    message: Some("service melted".to_string()),
                }),
                other => Ok(vec![SuggestionEntry::new(other, "", "")]),
            }
        }
    }

    fn runner_with_counter() -> (SearchRunner, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let runner = SearchRunner::new(SearchOptions::default(), counting_service(calls.clone()));
        (runner, calls)
    }

    fn focus(runner: &mut SearchRunner, now: Instant) {
        runner.dispatch(AppEvent::Key(KeyEvent::ctrl(KeyCode::Char('k'))), now);
    }

    fn type_text(runner: &mut SearchRunner, text: &str, now: Instant) {
        for ch in text.chars() {
            runner.dispatch(AppEvent::Key(KeyEvent::plain(KeyCode::Char(ch))), now);
        }
    }

    /// Keeps ticking (at a frozen logical time) until the worker's
    /// response has landed or the real-time deadline passes.
    fn wait_for_fetch_done(runner: &mut SearchRunner, now: Instant) -> Vec<SearchAction> {
        let deadline = Instant::now() + Duration::from_secs(2);
        let mut actions = Vec::new();
        while runner.component().fetch_state().is_pending() && Instant::now() < deadline {
            actions.extend(runner.tick(now).actions);
            std::thread::sleep(Duration::from_millis(5));
        }
        actions.extend(runner.tick(now).actions);
        actions
    }

    #[test]
    fn pause_after_typing_issues_exactly_one_lookup() {
        let (mut runner, calls) = runner_with_counter();
        let start = Instant::now();

        focus(&mut runner, start);
        type_text(&mut runner, "Lon", start);

        // One tick short of the idle interval: no settlement yet.
        runner.tick(start + DEBOUNCE - Duration::from_millis(1));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let settled_at = start + DEBOUNCE;
        runner.tick(settled_at);
        wait_for_fetch_done(&mut runner, settled_at);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let rows = runner.component().rows();
        assert_eq!(rows.len(), 1);
        assert!(matches!(
            &rows[0],
            ListEntry::Suggestion { name, .. } if name == "London"
        ));

        // Clicking the row dispatches the selection.
        let out = runner.dispatch(AppEvent::PointerSelect(0), settled_at);
        assert_eq!(
            out.actions,
            [SearchAction::LocationChosen("London".to_string())]
        );
        assert_eq!(runner.component().recent().entries()[0].name, "London");
        assert_eq!(runner.component().raw_query(), "");
        assert!(!runner.component().dropdown_open());
    }

    #[test]
    fn rapid_retype_settles_once_with_the_final_text() {
        let (mut runner, calls) = runner_with_counter();
        let start = Instant::now();

        focus(&mut runner, start);
        type_text(&mut runner, "Lon", start);
        type_text(&mut runner, "don", start + Duration::from_millis(100));

        // One idle interval after the *first* burst: superseded, nothing.
        runner.tick(start + DEBOUNCE);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let settled_at = start + Duration::from_millis(100) + DEBOUNCE;
        runner.tick(settled_at);
        wait_for_fetch_done(&mut runner, settled_at);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        match runner.component().fetch_state() {
            crate::components::location_search::FetchState::Resolved { query, .. } => {
                assert_eq!(query, "London")
            }
            other => panic!("expected resolved fetch, got {other:?}"),
        }
    }

    #[test]
    fn full_history_evicts_oldest_on_submit() {
        let (mut runner, _) = runner_with_counter();
        let now = Instant::now();

        for name in ["Paris", "Tokyo", "Cairo", "Berlin"] {
            focus(&mut runner, now);
            type_text(&mut runner, name, now);
            runner.dispatch(AppEvent::Key(KeyEvent::plain(KeyCode::Enter)), now);
        }

        let names: Vec<&str> = runner
            .component()
            .recent()
            .entries()
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(names, ["Tokyo", "Cairo", "Berlin"]);
    }

    #[test]
    fn empty_result_shows_not_found_and_touches_nothing() {
        let (mut runner, _) = runner_with_counter();
        let start = Instant::now();

        focus(&mut runner, start);
        type_text(&mut runner, "Xyzzy", start);
        let settled_at = start + DEBOUNCE;
        runner.tick(settled_at);
        wait_for_fetch_done(&mut runner, settled_at);

        assert!(runner.component().fetch_state().is_empty_result());
        assert!(runner.component().recent().is_empty());
        assert_eq!(runner.component().raw_query(), "Xyzzy");
    }

    #[test]
    fn failed_lookup_recovers_on_the_next_keystroke() {
        let (mut runner, calls) = runner_with_counter();
        let start = Instant::now();

        focus(&mut runner, start);
        type_text(&mut runner, "Xy", start);
        let first_settle = start + DEBOUNCE;
        runner.tick(first_settle);
        wait_for_fetch_done(&mut runner, first_settle);
        assert!(runner.component().fetch_state().error().is_some());

        // No automatic retry: the count stays put until the user types.
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        type_text(&mut runner, "z", first_settle);
        let second_settle = first_settle + DEBOUNCE;
        runner.tick(second_settle);
        wait_for_fetch_done(&mut runner, second_settle);

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(runner.component().fetch_state().error().is_none());
        assert_eq!(runner.component().fetch_state().suggestions()[0].name, "Xyz");
    }

    #[test]
    fn late_response_for_the_previous_query_never_surfaces() {
        let (mut runner, _) = runner_with_counter();
        let now = Instant::now();

        focus(&mut runner, now);
        // Settlements injected directly; generations start at 1.
        runner.dispatch(
            AppEvent::QuerySettled {
                text: "Lon".to_string(),
            },
            now,
        );
        runner.dispatch(
            AppEvent::QuerySettled {
                text: "Par".to_string(),
            },
            now,
        );

        // B's response first, then A's stale one.
        runner.dispatch(
            AppEvent::Lookup(LookupEvent::Finished {
                generation: 2,
                query: "Par".to_string(),
                result: Ok(vec![SuggestionEntry::new("Paris", "Ile-de-France", "France")]),
            }),
            now,
        );
        runner.dispatch(
            AppEvent::Lookup(LookupEvent::Finished {
                generation: 1,
                query: "Lon".to_string(),
                result: Ok(vec![SuggestionEntry::new("London", "", "")]),
            }),
            now,
        );

        let names: Vec<String> = runner
            .component()
            .rows()
            .iter()
            .map(|row| row.name().to_string())
            .collect();
        assert_eq!(names, ["Paris"]);
    }

    #[test]
    fn shortcut_focuses_from_any_state_and_gates_other_keys() {
        let (mut runner, _) = runner_with_counter();
        let now = Instant::now();

        // Unfocused: plain keys go nowhere.
        type_text(&mut runner, "abc", now);
        assert_eq!(runner.component().raw_query(), "");

        focus(&mut runner, now);
        assert_eq!(runner.component().focus_state(), FocusState::Focused);

        runner.dispatch(AppEvent::Key(KeyEvent::plain(KeyCode::Esc)), now);
        assert_eq!(runner.component().focus_state(), FocusState::Idle);

        focus(&mut runner, now);
        assert_eq!(runner.component().focus_state(), FocusState::Focused);
    }

    #[test]
    fn selection_during_the_blur_grace_applies_and_hides() {
        let (mut runner, _) = runner_with_counter();
        let now = Instant::now();

        focus(&mut runner, now);
        type_text(&mut runner, "Paris", now);
        runner.dispatch(AppEvent::Key(KeyEvent::plain(KeyCode::Enter)), now);

        focus(&mut runner, now);
        runner.dispatch(AppEvent::FocusLost, now);
        assert_eq!(runner.component().focus_state(), FocusState::Closing);

        let within_grace = now + Duration::from_millis(100);
        let out = runner.dispatch(AppEvent::PointerSelect(0), within_grace);
        assert_eq!(
            out.actions,
            [SearchAction::LocationChosen("Paris".to_string())]
        );
        assert!(!runner.component().dropdown_open());

        // The canceled grace timer stays quiet.
        let out = runner.tick(now + Duration::from_millis(300));
        assert!(out.actions.is_empty());
        assert_eq!(runner.component().focus_state(), FocusState::Idle);
    }

    #[test]
    fn unselected_blur_hides_after_the_grace_window() {
        let (mut runner, _) = runner_with_counter();
        let now = Instant::now();

        focus(&mut runner, now);
        runner.dispatch(AppEvent::FocusLost, now);
        assert!(runner.component().dropdown_open());

        runner.tick(now + Duration::from_millis(199));
        assert!(runner.component().dropdown_open());

        runner.tick(now + Duration::from_millis(200));
        assert!(!runner.component().dropdown_open());
    }

    #[test]
    fn poll_timeout_shrinks_toward_the_next_deadline() {
        let (mut runner, _) = runner_with_counter();
        let now = Instant::now();
        let default = Duration::from_millis(120);

        assert_eq!(runner.poll_timeout(now, default), default);

        focus(&mut runner, now);
        type_text(&mut runner, "L", now);
        assert_eq!(
            runner.poll_timeout(now + Duration::from_millis(450), default),
            Duration::from_millis(50)
        );
    }
}
