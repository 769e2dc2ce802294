use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};
use crossterm::terminal;

use seekly::components::location_search::{FetchState, ListEntry};
use seekly::config::SearchOptions;
use seekly::keys::KeyEvent;
use seekly::lookup::{LookupError, SuggestionEntry};
use seekly::runtime::{AppEvent, SearchAction, SearchRunner};

static CITIES: &[(&str, &str, &str)] = &[
    ("London", "City of London, Greater London", "United Kingdom"),
    ("Londrina", "Parana", "Brazil"),
    ("Long Beach", "California", "United States of America"),
    ("Paris", "Ile-de-France", "France"),
    ("Tokyo", "Tokyo", "Japan"),
    ("Toronto", "Ontario", "Canada"),
    ("Cairo", "Cairo Governorate", "Egypt"),
    ("Berlin", "Berlin", "Germany"),
    ("Lisbon", "Lisboa", "Portugal"),
    ("Lima", "Lima", "Peru"),
];

fn static_lookup(query: &str) -> Result<Vec<SuggestionEntry>, LookupError> {
    // Small artificial latency so the pending state is visible.
    std::thread::sleep(Duration::from_millis(150));
    let needle = query.to_lowercase();
    Ok(CITIES
        .iter()
        .filter(|(name, _, _)| name.to_lowercase().starts_with(&needle))
        .map(|(name, region, country)| SuggestionEntry::new(*name, *region, *country))
        .collect())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
    }
}

fn run() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let result = event_loop();
    terminal::disable_raw_mode()?;
    result
}

fn event_loop() -> io::Result<()> {
    let mut runner = SearchRunner::new(SearchOptions::default(), static_lookup);

    print!("Ctrl+K focuses the search box, Enter submits, Esc blurs, Ctrl+C quits.\r\n");
    let mut render_requested = true;

    loop {
        let now = Instant::now();
        let timeout = runner.poll_timeout(now, Duration::from_millis(120));

        if event::poll(timeout)? {
            if let CrosstermEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if is_quit(&key) {
                    break;
                }
                let out = runner.dispatch(AppEvent::Key(KeyEvent::from(key)), Instant::now());
                render_requested |= report(&out.actions) || out.render;
            }
        }

        let out = runner.tick(Instant::now());
        render_requested |= report(&out.actions) || out.render;

        if render_requested {
            render(&runner);
            render_requested = false;
        }
    }

    Ok(())
}

fn is_quit(key: &crossterm::event::KeyEvent) -> bool {
    use crossterm::event::{KeyCode, KeyModifiers};
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn report(actions: &[SearchAction]) -> bool {
    for action in actions {
        let SearchAction::LocationChosen(name) = action;
        print!(">> location chosen: {}\r\n", name);
    }
    !actions.is_empty()
}

fn render(runner: &SearchRunner) {
    let component = runner.component();
    print!("search: {}\r\n", component.raw_query());

    if !component.dropdown_open() {
        return;
    }

    match component.fetch_state() {
        FetchState::Pending { .. } => print!("  Loading...\r\n"),
        FetchState::Failed { error, .. } => {
            print!("  Something went wrong when fetching location... ({})\r\n", error)
        }
        state if state.is_empty_result() => print!("  Location not found...\r\n"),
        _ => {}
    }

    for (index, row) in component.rows().iter().enumerate() {
        match row {
            ListEntry::Recent { name } => print!("  {index}. (recent) {name}\r\n"),
            ListEntry::Suggestion {
                name,
                region,
                country,
            } => print!("  {index}. {name}  Country > {country} - Region > {region}\r\n"),
        }
    }
}
