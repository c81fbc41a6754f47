//! Application state and event loop

use super::flag;
use super::input::{TextInput, Toast};
use super::palette::Palette;
use super::ui::{self, HitMap};
use super::worker::{
    CatalogResult, FlagRequest, FlagResponse, spawn_fetch_worker, spawn_flag_worker,
};
use anyhow::Result;
use countries_core::{
    CatalogSource, DetailView, Filter, GridView, OverlayAction, OverlayState, RecordStore, Region,
    ThemeController, detail_view, grid_view, reduce,
};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Position};
use ratatui_image::picker::Picker;
use ratatui_image::protocol::StatefulProtocol;
use std::io::{self, Stdout};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

/// Where the catalog fetch stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading { started_at: Instant },
    Ready,
    /// Carries the static message shown in place of the grid
    Failed(String),
}

pub struct App {
    pub search_input: TextInput,
    /// `None` is "all regions"
    pub region: Option<Region>,
    /// Full record set; installed once when the fetch completes
    pub store: Arc<RecordStore>,
    pub load_state: LoadState,
    /// Grid content for the current filter, rebuilt whenever it changes
    pub grid: GridView,
    /// Index into `grid.cards()`
    pub selected: usize,
    pub overlay: OverlayState,
    /// View for the open overlay, if any
    pub detail: Option<DetailView>,
    /// Focused border link inside the overlay
    pub border_focus: Option<usize>,
    /// Decoded flag for the open overlay
    pub flag: Option<StatefulProtocol>,
    pub theme: ThemeController,
    pub toast: Option<Toast>,
    pub should_quit: bool,
    /// Image picker (None if the terminal cannot show images)
    pub picker: Option<Picker>,
    /// Clickable regions recorded by the last render
    pub(crate) hits: HitMap,
    /// Cards per grid row in the last render
    pub(crate) grid_columns: usize,
    /// First visible grid row
    pub(crate) grid_scroll: usize,
    catalog_rx: Option<Receiver<CatalogResult>>,
    flag_tx: Option<Sender<FlagRequest>>,
    flag_rx: Option<Receiver<FlagResponse>>,
    /// Key of the country whose flag we are waiting for
    pending_flag_for: Option<String>,
}

impl App {
    /// Start fetching from `source` in the background
    pub fn new(source: Box<dyn CatalogSource>, theme: ThemeController) -> Self {
        log::debug!("Loading catalog from {}", source.describe());

        let (catalog_tx, catalog_rx) = mpsc::channel::<CatalogResult>();
        spawn_fetch_worker(source, catalog_tx);

        let mut app = Self::blank(
            theme,
            LoadState::Loading {
                started_at: Instant::now(),
            },
        );
        app.catalog_rx = Some(catalog_rx);

        app.picker = flag::detect_picker();
        if app.picker.is_some() {
            let (flag_tx, flag_req_rx) = mpsc::channel::<FlagRequest>();
            let (flag_resp_tx, flag_rx) = mpsc::channel::<FlagResponse>();
            spawn_flag_worker(flag_req_rx, flag_resp_tx);
            app.flag_tx = Some(flag_tx);
            app.flag_rx = Some(flag_rx);
        }

        app
    }

    /// App over an already loaded record set, with no background workers
    pub fn with_store(store: RecordStore, theme: ThemeController) -> Self {
        let mut app = Self::blank(theme, LoadState::Ready);
        app.store = Arc::new(store);
        app.refresh_grid();
        app
    }

    fn blank(theme: ThemeController, load_state: LoadState) -> Self {
        let mut app = Self {
            search_input: TextInput::new(),
            region: None,
            store: Arc::new(RecordStore::empty()),
            load_state,
            grid: GridView::Loading,
            selected: 0,
            overlay: OverlayState::Closed,
            detail: None,
            border_focus: None,
            flag: None,
            theme,
            toast: None,
            should_quit: false,
            picker: None,
            hits: HitMap::default(),
            grid_columns: 1,
            grid_scroll: 0,
            catalog_rx: None,
            flag_tx: None,
            flag_rx: None,
            pending_flag_for: None,
        };
        app.refresh_grid();
        app
    }

    pub fn palette(&self) -> Palette {
        Palette::for_theme(self.theme.current())
    }

    /// Current filter as typed and selected
    pub fn filter(&self) -> Filter {
        Filter::new(
            self.search_input.text.clone(),
            self.region.map(|r| r.label().to_string()),
        )
    }

    /// Rebuild the grid from scratch for the current load state and filter
    fn refresh_grid(&mut self) {
        self.grid = match &self.load_state {
            LoadState::Loading { .. } => GridView::Loading,
            LoadState::Failed(message) => GridView::Failed(message.clone()),
            LoadState::Ready => grid_view(self.filter().apply(&self.store)),
        };
        let len = self.grid.cards().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn on_filter_changed(&mut self) {
        self.selected = 0;
        self.grid_scroll = 0;
        self.refresh_grid();
    }

    fn set_region(&mut self, region: Option<Region>) {
        self.region = region;
        self.on_filter_changed();
    }

    /// Take ownership of the fetch outcome. Called at most once per session.
    pub(crate) fn install_catalog(&mut self, result: CatalogResult) {
        match result {
            Ok(records) => {
                self.store = Arc::new(RecordStore::new(records));
                self.load_state = LoadState::Ready;
            }
            Err(failure) => {
                self.load_state = LoadState::Failed(failure.user_message().to_string());
            }
        }
        self.refresh_grid();
    }

    /// Poll for the catalog from the fetch worker (non-blocking)
    fn poll_catalog(&mut self) {
        let Some(rx) = &self.catalog_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.catalog_rx = None;
                self.install_catalog(result);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                log::error!("Catalog worker exited without a result");
                self.catalog_rx = None;
                self.load_state =
                    LoadState::Failed(countries_core::FETCH_FAILURE_MESSAGE.to_string());
                self.refresh_grid();
            }
        }
    }

    /// Poll for flag downloads, ignoring any for an overlay no longer open
    fn poll_flags(&mut self) {
        let Some(rx) = &self.flag_rx else {
            return;
        };
        while let Ok(resp) = rx.try_recv() {
            if self.pending_flag_for.as_deref() != Some(resp.key.as_str()) {
                continue;
            }
            self.pending_flag_for = None;
            if let (Some(bytes), Some(picker)) = (resp.bytes, &self.picker) {
                self.flag = flag::decode_flag(&bytes, picker);
            }
        }
    }

    fn request_flag(&mut self) {
        let (Some(tx), Some(detail)) = (&self.flag_tx, &self.detail) else {
            return;
        };
        let Some(url) = detail.flag_png_url.clone() else {
            return;
        };
        self.pending_flag_for = Some(detail.key.clone());
        let _ = tx.send(FlagRequest {
            key: detail.key.clone(),
            url,
        });
    }

    /// Feed an action through the overlay reducer and sync everything hanging off it
    fn dispatch(&mut self, action: OverlayAction) {
        let next = reduce(&self.overlay, action, &self.store);
        if next == self.overlay {
            return;
        }

        self.overlay = next;
        self.border_focus = None;
        self.flag = None;
        self.pending_flag_for = None;
        self.detail = self
            .overlay
            .open_key()
            .and_then(|key| detail_view(&self.store, key));
        self.request_flag();
    }

    fn open_selected(&mut self) {
        if let Some(card) = self.grid.cards().get(self.selected) {
            let key = card.key.clone();
            self.dispatch(OverlayAction::OpenCard(key));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.grid.cards().len();
        if len == 0 {
            return;
        }
        let max = len as isize - 1;
        self.selected = (self.selected as isize + delta).clamp(0, max) as usize;
    }

    fn row_step(&self) -> isize {
        self.grid_columns.max(1) as isize
    }

    fn border_count(&self) -> usize {
        self.detail
            .as_ref()
            .map(|d| d.borders.links().len())
            .unwrap_or(0)
    }

    /// Move border focus by `step`, wrapping around
    fn focus_border(&mut self, step: isize) {
        let count = self.border_count();
        if count == 0 {
            return;
        }
        self.border_focus = Some(match self.border_focus {
            None if step >= 0 => 0,
            None => count - 1,
            Some(i) => (i as isize + step).rem_euclid(count as isize) as usize,
        });
    }

    fn activate_border(&mut self, index: usize) {
        let key = self
            .detail
            .as_ref()
            .and_then(|d| d.borders.links().get(index))
            .map(|link| link.key.clone());
        if let Some(key) = key {
            self.dispatch(OverlayAction::ActivateBorder(key));
        }
    }

    fn toggle_theme(&mut self) {
        match self.theme.toggle() {
            Ok(theme) => self.toast = Some(Toast::info(format!("Switched to {theme} theme"))),
            Err(e) => {
                log::warn!("Failed to save theme: {:#}", e);
                self.toast = Some(Toast::error(format!("Could not save theme: {e}")));
            }
        }
    }

    /// Clear expired toast
    fn update_toast(&mut self) {
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            (KeyCode::Char('t'), KeyModifiers::CONTROL) => {
                self.toggle_theme();
                return;
            }
            _ => {}
        }

        if self.overlay.is_open() {
            match key.code {
                KeyCode::Esc => self.dispatch(OverlayAction::Close),
                KeyCode::Tab | KeyCode::Right | KeyCode::Down => self.focus_border(1),
                KeyCode::BackTab | KeyCode::Left | KeyCode::Up => self.focus_border(-1),
                KeyCode::Enter => {
                    if let Some(i) = self.border_focus {
                        self.activate_border(i);
                    }
                }
                _ => {}
            }
            return;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => self.should_quit = true,
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => {
                self.set_region(Region::cycle_next(self.region))
            }
            (KeyCode::Enter, _) => self.open_selected(),
            (KeyCode::Up, _) => self.move_selection(-self.row_step()),
            (KeyCode::Down, _) => self.move_selection(self.row_step()),
            (KeyCode::Tab, _) => self.move_selection(1),
            (KeyCode::BackTab, _) => self.move_selection(-1),
            (KeyCode::PageUp, _) => self.move_selection(-self.row_step() * 4),
            (KeyCode::PageDown, _) => self.move_selection(self.row_step() * 4),
            _ => {
                let before = self.search_input.text.clone();
                if self.search_input.handle_key(key.code, key.modifiers)
                    && self.search_input.text != before
                {
                    self.on_filter_changed();
                }
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let pos = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.click(pos),
            MouseEventKind::Down(MouseButton::Right)
                if !self.overlay.is_open() && self.hits.region_chip_contains(pos) =>
            {
                self.set_region(Region::cycle_prev(self.region))
            }
            MouseEventKind::ScrollDown if !self.overlay.is_open() => {
                self.move_selection(self.row_step())
            }
            MouseEventKind::ScrollUp if !self.overlay.is_open() => {
                self.move_selection(-self.row_step())
            }
            _ => {}
        }
    }

    fn click(&mut self, pos: Position) {
        if self.overlay.is_open() {
            if self.hits.close.is_some_and(|r| r.contains(pos)) {
                self.dispatch(OverlayAction::Close);
            } else if let Some(i) = self.hits.border_at(pos) {
                self.border_focus = Some(i);
                self.activate_border(i);
            } else if !self.hits.overlay.is_some_and(|r| r.contains(pos)) {
                self.dispatch(OverlayAction::ActivateOutside);
            }
            return;
        }

        if self.hits.region_chip_contains(pos) {
            self.set_region(Region::cycle_next(self.region));
        } else if self.hits.theme_chip.is_some_and(|r| r.contains(pos)) {
            self.toggle_theme();
        } else if let Some(i) = self.hits.card_at(pos) {
            self.selected = i;
            self.open_selected();
        }
    }
}

/// Run the browser until the user quits
pub fn run(source: Box<dyn CatalogSource>, theme: ThemeController) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(source, theme);

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // ~60Hz is plenty; nothing here animates except the spinner
    const FRAME_TIME: Duration = Duration::from_millis(16);

    loop {
        let frame_start = Instant::now();

        let mut events_processed = 0usize;
        while event::poll(Duration::from_millis(0))? && events_processed < 100 {
            app.handle_event(event::read()?);
            events_processed += 1;
            if app.should_quit {
                break;
            }
        }

        if app.should_quit {
            break;
        }

        app.update_toast();
        app.poll_catalog();
        app.poll_flags();

        terminal.draw(|f| ui::render(f, app))?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - elapsed);
        }
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use countries_core::{CatalogSource, FileCatalog, PreferenceStore, Theme};
    use countries_test_utils::CATALOG_FIXTURE;
    use tempfile::TempDir;

    fn theme_in(dir: &TempDir) -> ThemeController {
        ThemeController::load(PreferenceStore::new(
            dir.path().join(".countries").join("preferences.toml"),
        ))
    }

    /// App over the six-country fixture; keep the TempDir alive for the test
    pub(crate) fn fixture_app() -> (TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("countries.json");
        std::fs::write(&path, CATALOG_FIXTURE).unwrap();
        let records = FileCatalog::new(&path).fetch_all().unwrap();
        let app = App::with_store(RecordStore::new(records), theme_in(&dir));
        (dir, app)
    }

    pub(crate) fn press(app: &mut App, code: KeyCode) {
        app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    pub(crate) fn ctrl(app: &mut App, c: char) {
        app.handle_event(Event::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::CONTROL,
        )));
    }

    pub(crate) fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn visible_keys(app: &App) -> Vec<&str> {
        app.grid.cards().iter().map(|c| c.key.as_str()).collect()
    }

    #[test]
    fn test_all_countries_in_catalog_order() {
        let (_dir, app) = fixture_app();
        assert_eq!(
            visible_keys(&app),
            vec!["FRA", "DEU", "CHE", "ISL", "BRA", "ATA"]
        );
    }

    #[test]
    fn test_typing_filters_grid() {
        let (_dir, mut app) = fixture_app();
        type_text(&mut app, "fra");
        assert_eq!(visible_keys(&app), vec!["FRA"]);

        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(visible_keys(&app).len(), 6);
    }

    #[test]
    fn test_region_cycling_combines_with_query() {
        let (_dir, mut app) = fixture_app();

        ctrl(&mut app, 'r');
        assert_eq!(app.region, Some(Region::Africa));
        assert!(app.grid.cards().is_empty());

        ctrl(&mut app, 'r');
        assert_eq!(visible_keys(&app), vec!["BRA"]);

        // Antarctic, Asia, Europe
        for _ in 0..3 {
            ctrl(&mut app, 'r');
        }
        assert_eq!(app.region, Some(Region::Europe));
        type_text(&mut app, "LAND");
        assert_eq!(visible_keys(&app), vec!["CHE", "ISL"]);

        // Oceania, then back to all regions
        ctrl(&mut app, 'r');
        ctrl(&mut app, 'r');
        assert_eq!(app.region, None);
        assert_eq!(visible_keys(&app), vec!["CHE", "ISL"]);
    }

    #[test]
    fn test_border_navigation_by_keyboard() {
        let (_dir, mut app) = fixture_app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.overlay, OverlayState::Open("FRA".into()));
        let detail = app.detail.as_ref().unwrap();
        assert_eq!(detail.name, "France");
        assert_eq!(detail.borders.links()[0].label, "AND");
        assert_eq!(detail.borders.links()[2].label, "Germany");

        // Unresolvable link: nothing happens
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.overlay, OverlayState::Open("FRA".into()));
        assert_eq!(app.border_focus, Some(0));

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.overlay, OverlayState::Open("DEU".into()));
        assert_eq!(app.border_focus, None);
        let labels: Vec<_> = app
            .detail
            .as_ref()
            .unwrap()
            .borders
            .links()
            .iter()
            .map(|l| l.label.as_str())
            .collect();
        assert!(labels.contains(&"France"));
        assert!(labels.contains(&"Switzerland"));
        assert!(labels.contains(&"AUT"));
    }

    #[test]
    fn test_border_focus_wraps() {
        let (_dir, mut app) = fixture_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.border_focus, Some(7));
        press(&mut app, KeyCode::Right);
        assert_eq!(app.border_focus, Some(0));
    }

    #[test]
    fn test_escape_closes_overlay_then_quits() {
        let (_dir, mut app) = fixture_app();
        press(&mut app, KeyCode::Enter);
        assert!(app.overlay.is_open());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.overlay, OverlayState::Closed);
        assert!(app.detail.is_none());
        assert!(!app.should_quit);

        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_overlay_swallows_typing() {
        let (_dir, mut app) = fixture_app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "xyz");
        assert!(app.search_input.text.is_empty());
        assert_eq!(app.grid.cards().len(), 6);
    }

    #[test]
    fn test_ctrl_c_quits_with_overlay_open() {
        let (_dir, mut app) = fixture_app();
        press(&mut app, KeyCode::Enter);
        ctrl(&mut app, 'c');
        assert!(app.should_quit);
    }

    #[test]
    fn test_selection_moves_and_clamps() {
        let (_dir, mut app) = fixture_app();
        app.grid_columns = 4;
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 4);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected, 5);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.selected, 5);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.overlay, OverlayState::Open("ATA".into()));
    }

    #[test]
    fn test_enter_with_no_matches_is_noop() {
        let (_dir, mut app) = fixture_app();
        type_text(&mut app, "atlantis");
        assert!(app.grid.cards().is_empty());
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.overlay, OverlayState::Closed);
    }

    #[test]
    fn test_theme_toggle_persists() {
        let (dir, mut app) = fixture_app();
        assert_eq!(app.theme.current(), Theme::Light);

        ctrl(&mut app, 't');
        assert_eq!(app.theme.current(), Theme::Dark);
        assert!(app.toast.as_ref().is_some_and(|t| !t.is_error));
        assert_eq!(app.palette(), Palette::for_theme(Theme::Dark));

        let stored = PreferenceStore::new(dir.path().join(".countries").join("preferences.toml"));
        assert_eq!(stored.load_theme(), Some(Theme::Dark));
    }

    #[test]
    fn test_actions_before_load_are_noops() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::blank(
            theme_in(&dir),
            LoadState::Loading {
                started_at: Instant::now(),
            },
        );
        assert_eq!(app.grid, GridView::Loading);

        type_text(&mut app, "fra");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.grid, GridView::Loading);
        assert_eq!(app.overlay, OverlayState::Closed);

        let path = dir.path().join("countries.json");
        std::fs::write(&path, CATALOG_FIXTURE).unwrap();
        app.install_catalog(FileCatalog::new(&path).fetch_all());
        assert_eq!(app.load_state, LoadState::Ready);
        // The query typed while loading applies once records arrive
        assert_eq!(visible_keys(&app), vec!["FRA"]);
    }

    #[test]
    fn test_fetch_failure_replaces_grid() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::blank(
            theme_in(&dir),
            LoadState::Loading {
                started_at: Instant::now(),
            },
        );
        app.install_catalog(FileCatalog::new(dir.path().join("missing.json")).fetch_all());

        assert_eq!(
            app.grid,
            GridView::Failed("Failed to load countries. Please try again later.".to_string())
        );
        assert!(app.store.is_empty());

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.overlay, OverlayState::Closed);
    }
}
