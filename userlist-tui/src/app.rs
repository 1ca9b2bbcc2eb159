//! Interactive terminal front-end for the user listing.

use std::fs;
use std::time::Instant;

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use userlist_lib::api::query::{FilterField, Gender, SortKey};
use userlist_lib::model::User;

use crate::config::Config;
use crate::error::AppError;
use crate::store::ListState;
use crate::terminal::{Line, LineStyle, Terminal, fit};
use crate::view::{COLUMNS, Markup, ScrollMetrics, UserListView};
use crate::widgets::Spinner;

/// Screen row of the column headers.
const HEADER_ROW: u16 = 2;
/// Rows that are not table body: title, filters, header, status.
const CHROME_ROWS: u16 = 4;
/// Display width per column; the last column takes the rest.
const COLUMN_WIDTHS: [usize; 6] = [5, 30, 22, 5, 28, 0];
const MIN_LAST_COLUMN: usize = 12;
const WHEEL_STEP: i64 = 3;

/// Something the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Scroll(i64),
    Top,
    Bottom,
    Sort(SortKey),
    CycleFilter(FilterField),
    Export,
}

/// Maps a terminal event to an action. `page_rows` is the table body height.
pub fn action_for(event: &Event, page_rows: u16) -> Option<Action> {
    match event {
        Event::Key(key) => key_action(key, page_rows),
        Event::Mouse(mouse) => mouse_action(mouse),
        _ => None,
    }
}

fn key_action(key: &KeyEvent, page_rows: u16) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let page = i64::from(page_rows.max(1));
    let action = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Down | KeyCode::Char('j') => Action::Scroll(1),
        KeyCode::Up | KeyCode::Char('k') => Action::Scroll(-1),
        KeyCode::PageDown | KeyCode::Char(' ') => Action::Scroll(page),
        KeyCode::PageUp => Action::Scroll(-page),
        KeyCode::Home => Action::Top,
        KeyCode::End => Action::Bottom,
        KeyCode::Char('1') => Action::Sort(SortKey::Id),
        KeyCode::Char('2') => Action::Sort(SortKey::Name),
        KeyCode::Char('3') => Action::Sort(SortKey::Age),
        KeyCode::Char('g') => Action::CycleFilter(FilterField::Gender),
        KeyCode::Char('c') => Action::CycleFilter(FilterField::City),
        KeyCode::Char('h') => Action::Export,
        _ => return None,
    };
    Some(action)
}

fn mouse_action(mouse: &MouseEvent) -> Option<Action> {
    match mouse.kind {
        MouseEventKind::ScrollDown => Some(Action::Scroll(WHEEL_STEP)),
        MouseEventKind::ScrollUp => Some(Action::Scroll(-WHEEL_STEP)),
        MouseEventKind::Down(MouseButton::Left) if mouse.row == HEADER_ROW => {
            column_at(mouse.column as usize).and_then(|i| COLUMNS[i].sort).map(Action::Sort)
        }
        _ => None,
    }
}

/// Index of the column under screen column `x`.
fn column_at(x: usize) -> Option<usize> {
    let mut start = 0;
    for (i, width) in COLUMN_WIDTHS.iter().enumerate() {
        if *width == 0 || x < start + width {
            return Some(i);
        }
        // One space between columns.
        start += width + 1;
        if x < start {
            return None;
        }
    }
    None
}

/// The value after `current` in `"" + options`, wrapping around.
fn next_value(current: &str, options: &[String]) -> String {
    let all: Vec<&str> = std::iter::once("")
        .chain(options.iter().map(String::as_str))
        .collect();
    let index = all.iter().position(|v| *v == current).unwrap_or(0);
    all[(index + 1) % all.len()].to_string()
}

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal application state around a [`UserListView`].
pub struct App {
    view: UserListView,
    config: Config,
    offset: u32,
    height: u16,
    spinner: Spinner,
    started: Instant,
    message: Option<String>,
}

impl App {
    pub fn new(view: UserListView, config: Config) -> Self {
        Self {
            view,
            config,
            offset: 0,
            height: 24,
            spinner: Spinner::new(),
            started: Instant::now(),
            message: None,
        }
    }

    pub fn view(&self) -> &UserListView {
        &self.view
    }

    /// Rows available for the table body.
    pub fn page_rows(&self) -> u16 {
        self.height.saturating_sub(CHROME_ROWS)
    }

    pub fn set_height(&mut self, height: u16) {
        self.height = height;
        self.offset = self.metrics().scrolled_by(0).offset;
    }

    fn metrics(&self) -> ScrollMetrics {
        let content = self.view.store().read(|s| s.users.len()) as u32;
        ScrollMetrics::new(self.offset, u32::from(self.page_rows()), content)
    }

    /// Scrolls the table and reports the new position to the view.
    fn scroll_to(&mut self, metrics: ScrollMetrics) {
        self.offset = metrics.offset;
        self.view.on_scroll(metrics);
    }

    pub fn apply(&mut self, action: Action) -> Flow {
        match action {
            Action::Quit => return Flow::Quit,
            Action::Scroll(delta) => self.scroll_to(self.metrics().scrolled_by(delta)),
            Action::Top => self.scroll_to(ScrollMetrics {
                offset: 0,
                ..self.metrics()
            }),
            Action::Bottom => {
                let metrics = self.metrics();
                self.scroll_to(ScrollMetrics {
                    offset: metrics.max_offset(),
                    ..metrics
                });
            }
            Action::Sort(key) => {
                self.view.on_sort_click(key);
                self.offset = 0;
            }
            Action::CycleFilter(field) => self.cycle_filter(field),
            Action::Export => self.export(),
        }
        Flow::Continue
    }

    fn cycle_filter(&mut self, field: FilterField) {
        let current = self.view.store().read(|s| s.filter.value(field).to_string());
        let next = match field {
            FilterField::Gender => {
                let genders: Vec<String> = Gender::ALL.iter().map(|g| g.to_string()).collect();
                next_value(&current, &genders)
            }
            FilterField::City => next_value(&current, &self.config.cities),
        };
        if let Err(e) = self.view.on_filter_change(field, &next) {
            log::error!("filter change rejected: {}", e);
        }
        self.offset = self.metrics().scrolled_by(0).offset;
    }

    fn export(&mut self) {
        let state = self.view.store().snapshot();
        let html = Markup::new(&state, &self.config.cities).to_string();
        let path = &self.config.markup_file;
        self.message = Some(match fs::write(path, html) {
            Ok(()) => {
                log::info!("wrote markup to {}", path.display());
                format!("wrote {}", path.display())
            }
            Err(e) => {
                log::error!("failed to write {}: {}", path.display(), e);
                format!("export failed: {}", e)
            }
        });
    }

    /// Screen content for a `width` x `self.height` terminal.
    pub fn lines(&self, width: u16) -> Vec<Line> {
        let state = self.view.store().snapshot();
        let width = width as usize;
        let mut lines = Vec::with_capacity(self.height as usize);

        lines.push(Line::new("User Listing", LineStyle::Title));
        lines.push(Line::normal(filter_line(&state)));
        lines.push(Line::new(header_line(&state, width), LineStyle::Header));

        let rows = self.page_rows() as usize;
        for user in state.users.iter().skip(self.offset as usize).take(rows) {
            lines.push(Line::normal(user_line(user, width)));
        }
        while lines.len() < rows + 3 {
            lines.push(Line::normal(""));
        }

        lines.push(Line::new(self.status_line(&state), LineStyle::Dim));
        lines
    }

    fn status_line(&self, state: &ListState) -> String {
        if state.loading {
            let frame = self.spinner.frame_at(self.started.elapsed());
            return format!("{} Loading...", frame);
        }

        let mut status = format!(
            "{} shown · {} loaded · page {}",
            state.users.len(),
            state.all_users.len(),
            state.page
        );
        if !state.has_more {
            status.push_str(" · end of list");
        }
        if let Some(message) = &self.message {
            status.push_str(" · ");
            status.push_str(message);
        }
        status
    }

    /// Runs the interactive loop until the user quits.
    pub async fn run(mut self) -> Result<(), AppError> {
        let mut terminal = Terminal::new()?;
        let mut events = EventStream::new();
        let mut revisions = self.view.store().subscribe();
        let mut ticker = tokio::time::interval(self.spinner.interval());

        let (_, height) = terminal.size()?;
        self.set_height(height);
        self.view.mount();

        loop {
            let (width, height) = terminal.size()?;
            if height != self.height {
                self.set_height(height);
            }
            terminal.draw(&self.lines(width), width)?;

            let loading = self.view.store().read(|s| s.loading);
            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(Event::Resize(_, height))) => self.set_height(height),
                    Some(Ok(event)) => {
                        if let Some(action) = action_for(&event, self.page_rows()) {
                            if self.apply(action) == Flow::Quit {
                                break;
                            }
                        }
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                changed = revisions.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = ticker.tick(), if loading => {}
            }
        }

        self.view.unmount();
        Ok(())
    }
}

fn filter_line(state: &ListState) -> String {
    let any = |v: &str| if v.is_empty() { "Any".to_string() } else { v.to_string() };
    format!(
        "Gender: {:<8} Country: {:<15} [1/2/3] sort  [g/c] filter  [h] export  [q] quit",
        any(state.filter.value(FilterField::Gender)),
        any(state.filter.value(FilterField::City)),
    )
}

fn header_line(state: &ListState, width: usize) -> String {
    let cells: Vec<String> = COLUMNS
        .iter()
        .map(|column| match column.sort.and_then(|key| state.sort.indicator(key)) {
            Some(glyph) => format!("{} {}", column.label, glyph),
            None => column.label.to_string(),
        })
        .collect();
    join_cells(&cells, width)
}

fn user_line(user: &User, width: usize) -> String {
    let cells = [
        user.id.to_string(),
        user.image.clone(),
        user.full_name(),
        user.age.to_string(),
        user.company.title.clone(),
        user.location(),
    ];
    join_cells(&cells, width)
}

fn join_cells(cells: &[String], width: usize) -> String {
    let fixed: usize = COLUMN_WIDTHS.iter().map(|w| w + 1).sum();
    let last = width.saturating_sub(fixed).max(MIN_LAST_COLUMN);
    cells
        .iter()
        .zip(COLUMN_WIDTHS)
        .map(|(cell, w)| fit(cell, if w == 0 { last } else { w }))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fetches the first page and prints its markup to stdout.
pub async fn print_markup(mut view: UserListView, config: &Config) -> Result<(), AppError> {
    view.mount();
    view.settle().await;
    let state = view.store().snapshot();
    print!("{}", Markup::new(&state, &config.cities));
    view.unmount();
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use crossterm::event::KeyEventState;
    use userlist_lib::UserSource;
    use userlist_lib::api::query::{Page, PageRequest, SortSpec};
    use userlist_lib::error::Error;

    use super::*;
    use crate::store::Store;
    use crate::store::tests::users;

    struct FixedSource(u64);

    #[async_trait]
    impl UserSource for FixedSource {
        async fn fetch_users(&self, request: &PageRequest) -> Result<Page, Error> {
            if request.page > 2 {
                return Ok(Page::new(Vec::new()));
            }
            Ok(Page::new(users(request.skip() + 1, self.0)))
        }
    }

    fn app(per_page: u64, height: u16) -> App {
        let view = UserListView::new(Store::new(), Arc::new(FixedSource(per_page)), 30);
        let mut app = App::new(view, Config::default());
        app.set_height(height);
        app
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_key_actions() {
        assert_eq!(action_for(&key(KeyCode::Char('q')), 20), Some(Action::Quit));
        assert_eq!(action_for(&key(KeyCode::PageDown), 20), Some(Action::Scroll(20)));
        assert_eq!(action_for(&key(KeyCode::Char('2')), 20), Some(Action::Sort(SortKey::Name)));
        assert_eq!(
            action_for(&key(KeyCode::Char('c')), 20),
            Some(Action::CycleFilter(FilterField::City))
        );
        assert_eq!(action_for(&key(KeyCode::Char('z')), 20), None);

        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(action_for(&ctrl_c, 20), Some(Action::Quit));
    }

    #[test]
    fn test_release_is_ignored() {
        let mut event = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(action_for(&Event::Key(event), 20), None);
    }

    #[test]
    fn test_header_click_sorts_sortable_columns() {
        // ID occupies columns 0..5
        assert_eq!(action_for(&click(2, HEADER_ROW), 20), Some(Action::Sort(SortKey::Id)));
        // Image is not sortable
        assert_eq!(action_for(&click(10, HEADER_ROW), 20), None);
        // Full Name starts at 5 + 1 + 30 + 1 = 37
        assert_eq!(action_for(&click(37, HEADER_ROW), 20), Some(Action::Sort(SortKey::Name)));
        // Age starts at 37 + 22 + 1 = 60
        assert_eq!(action_for(&click(61, HEADER_ROW), 20), Some(Action::Sort(SortKey::Age)));
        // Separator between ID and Image
        assert_eq!(action_for(&click(5, HEADER_ROW), 20), None);
        // Body rows are not headers
        assert_eq!(action_for(&click(2, HEADER_ROW + 1), 20), None);
    }

    #[test]
    fn test_next_value_wraps() {
        let options = vec!["a".to_string(), "b".to_string()];
        assert_eq!(next_value("", &options), "a");
        assert_eq!(next_value("a", &options), "b");
        assert_eq!(next_value("b", &options), "");
        assert_eq!(next_value("unknown", &options), "a");
    }

    #[tokio::test]
    async fn test_scrolling_to_bottom_loads_more() {
        let mut app = app(30, 24);
        app.view.mount();
        app.view.settle().await;

        // 20 body rows, 30 users: not at bottom yet.
        app.apply(Action::Scroll(1));
        assert_eq!(app.view().store().read(|s| s.page), 1);

        app.apply(Action::Bottom);
        assert_eq!(app.offset, 10);
        assert_eq!(app.view().store().read(|s| s.page), 2);
        app.view.settle().await;
        assert_eq!(app.view().store().read(|s| s.users.len()), 60);
    }

    #[tokio::test]
    async fn test_sort_resets_scroll() {
        let mut app = app(30, 24);
        app.view.mount();
        app.view.settle().await;
        app.apply(Action::Scroll(5));
        assert_eq!(app.offset, 5);

        app.apply(Action::Sort(SortKey::Age));
        assert_eq!(app.offset, 0);
        assert_eq!(app.view().store().read(|s| s.sort), SortSpec::asc(SortKey::Age));
        app.view.settle().await;
    }

    #[tokio::test]
    async fn test_cycle_gender_filter() {
        let mut app = app(30, 24);
        app.view.mount();
        app.view.settle().await;

        app.apply(Action::CycleFilter(FilterField::Gender));
        assert_eq!(app.view().store().read(|s| s.filter.gender), Some(Gender::Male));
        app.apply(Action::CycleFilter(FilterField::Gender));
        assert_eq!(app.view().store().read(|s| s.filter.gender), Some(Gender::Female));
        app.apply(Action::CycleFilter(FilterField::Gender));
        assert_eq!(app.view().store().read(|s| s.filter.gender), None);
    }

    #[tokio::test]
    async fn test_lines_layout() {
        let app = {
            let mut app = app(3, 10);
            app.view.mount();
            app.view.settle().await;
            app
        };

        let lines = app.lines(120);
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0].text, "User Listing");
        assert!(lines[1].text.starts_with("Gender: Any"));
        assert_eq!(lines[2].style, LineStyle::Header);
        assert!(lines[2].text.starts_with("ID ↑ "));
        assert!(lines[3].text.starts_with("1     "));
        assert!(lines[3].text.contains("First1 Last1"));
        assert_eq!(lines[6].text, "");
        assert_eq!(lines[9].text, "3 shown · 3 loaded · page 1");
    }

    #[tokio::test]
    async fn test_export_writes_markup() {
        let path = std::env::temp_dir().join(format!("userlist-export-{}.html", std::process::id()));
        let view = UserListView::new(Store::new(), Arc::new(FixedSource(2)), 30);
        let mut app = App::new(view, Config::default().markup_file(&path));
        app.view.mount();
        app.view.settle().await;

        app.apply(Action::Export);

        let html = fs::read_to_string(&path).unwrap();
        assert!(html.contains(r#"<tr data-id="2">"#));
        assert!(app.message.as_deref().unwrap().starts_with("wrote "));
        fs::remove_file(&path).unwrap();
    }
}
