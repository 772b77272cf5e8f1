//! # Application Root
//!
//! Owns the session, the navigator, every page and the two pieces of chrome
//! that sit outside the pages: the search field in the header and the quit
//! confirmation dialog.
//!
//! ## Focus
//!
//! Exactly one of three places holds focus at a time:
//!
//! ```text
//! Focus::Dialog       quit prompt, drawn over everything
//! Focus::SearchField  header search field
//! Focus::Page         whatever page the navigator says is current
//! ```
//!
//! Keys go to the focus holder only. If it leaves a key unhandled, the
//! global bindings get a chance, in this order: back, quit, search, select.
//! Everything that is not a key is broadcast to the whole tree.
//!
//! A holder may give up focus on its own (the search field and the dialog
//! blur themselves on back). After every routed action the root notices and
//! hands focus back to the current page.

use log::{debug, info};
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Text;

use crate::core::action::{Action, Effect, Update};
use crate::core::navigation::{Back, Navigator, Page};
use crate::core::state::Session;

use super::blocks::{StyledBlock, VAlign, blank, join_horizontal, join_vertical, margin, styled};
use super::component::{Component, Context, Size};
use super::components::{Dialog, TextField};
use super::keymap::{Binding, Keymap};
use super::layout::{text_height, text_width};
use super::overlay::{clip_columns, render_overlay};
use super::pages::{AccountPage, FilmDetailsPage, ListsPage, SearchPage};

const TITLE: &str = " reel ";
const TITLE_WIDTH: u16 = 6;
const TITLE_BG: Color = Color::Rgb(0xF2, 0x5D, 0x94);
/// Header (3) plus the blank line and help line under the page.
const CHROME_HEIGHT: u16 = 5;
const HEADER_HEIGHT: u16 = 3;
const ACCOUNT_MIN_WIDTH: u16 = 30;
const SEARCH_CHAR_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Dialog,
    SearchField,
    Page,
}

/// All pages, kept apart from the rest of the root so one can be borrowed
/// mutably while the session is lent out.
#[derive(Debug, Default)]
struct Pages {
    account: AccountPage,
    lists: ListsPage,
    search: SearchPage,
    details: FilmDetailsPage,
}

impl Pages {
    fn get(&self, page: Page) -> &dyn Component {
        match page {
            Page::Account => &self.account,
            Page::Lists => &self.lists,
            Page::Search => &self.search,
            Page::FilmDetails => &self.details,
        }
    }

    fn get_mut(&mut self, page: Page) -> &mut dyn Component {
        match page {
            Page::Account => &mut self.account,
            Page::Lists => &mut self.lists,
            Page::Search => &mut self.search,
            Page::FilmDetails => &mut self.details,
        }
    }

    fn all_mut(&mut self) -> [&mut dyn Component; 4] {
        [
            &mut self.account,
            &mut self.lists,
            &mut self.search,
            &mut self.details,
        ]
    }

    fn all(&self) -> [&dyn Component; 4] {
        [&self.account, &self.lists, &self.search, &self.details]
    }
}

pub struct App {
    session: Session,
    keys: Keymap,
    nav: Navigator,
    focus: Focus,
    dialog: Dialog,
    search_field: TextField,
    pages: Pages,
    size: Size,
}

impl App {
    pub fn new(keys: Keymap) -> Self {
        let mut app = Self {
            session: Session::default(),
            keys,
            nav: Navigator::new(),
            focus: Focus::Page,
            dialog: Dialog::quit_prompt(),
            search_field: TextField::new("Search films").with_char_limit(SEARCH_CHAR_LIMIT),
            pages: Pages::default(),
            size: Size::default(),
        };
        app.set_focus(Focus::Page);
        app
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_page(&self) -> Page {
        self.nav.current()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn search_field(&self) -> &TextField {
        &self.search_field
    }

    pub fn search_page(&self) -> &SearchPage {
        &self.pages.search
    }

    pub fn lists_page(&self) -> &ListsPage {
        &self.pages.lists
    }

    pub fn details_page(&self) -> &FilmDetailsPage {
        &self.pages.details
    }

    pub fn account_page(&self) -> &AccountPage {
        &self.pages.account
    }

    /// Focused leaves across the whole tree. Exactly one in a sound state.
    pub fn focused_leaf_count(&self) -> usize {
        self.dialog.focused_leaves()
            + self.search_field.focused_leaves()
            + self.pages.all().iter().map(|p| p.focused_leaves()).sum::<usize>()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Lay out the header, the pages and the dialog for a `width` x `height`
    /// terminal.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = Size::new(width, height);
        let view_height = height.saturating_sub(CHROME_HEIGHT);
        self.search_field
            .resize(width.saturating_sub(TITLE_WIDTH + 1), HEADER_HEIGHT);
        let account_width = (width / 2).max(ACCOUNT_MIN_WIDTH).min(width);
        self.pages.account.resize(account_width, view_height);
        self.pages.lists.resize(width, view_height);
        self.pages.search.resize(width, view_height);
        self.pages.details.resize(width, view_height);
        self.dialog.resize(width, height);
    }

    /// Route one action through the tree.
    pub fn update(&mut self, action: &Action) -> Update {
        let update = match action {
            Action::Key(key) => {
                let update = self.route_key(action);
                if update.is_handled() {
                    update
                } else {
                    update.merge(self.global_key(key))
                }
            }
            Action::Resize { width, height } => {
                self.resize(*width, *height);
                Update::handled()
            }
            Action::Authenticated(auth) => {
                info!("Authenticated (guest: {})", auth.user.is_none());
                self.session.auth = auth.clone();
                self.nav.authenticated();
                self.set_focus(Focus::Page);
                Update::handled().merge(self.pages.lists.reload(&self.session))
            }
            Action::ShowFilm(id) => {
                let update = self.pages.details.open(*id, &self.session);
                self.nav.open(Page::FilmDetails);
                self.set_focus(Focus::Page);
                Update::handled().merge(update)
            }
            Action::DismissDialog => {
                self.set_focus(Focus::Page);
                Update::handled()
            }
            Action::Quit => self.quit(),
            Action::SearchResults {
                generation, result, ..
            } => {
                if let (true, Ok(paged)) = (self.pages.search.accepts(*generation), result) {
                    for film in &paged.results {
                        self.session.films.insert(film.clone());
                    }
                }
                self.broadcast(action)
            }
            _ => self.broadcast(action),
        };
        self.reconcile_focus();
        update
    }

    fn route_key(&mut self, action: &Action) -> Update {
        let ctx = Context::new(&self.session, &self.keys);
        match self.focus {
            Focus::Dialog => self.dialog.update(action, &ctx),
            Focus::SearchField => self.search_field.update(action, &ctx),
            Focus::Page => self.pages.get_mut(self.nav.current()).update(action, &ctx),
        }
    }

    fn global_key(&mut self, key: &crossterm::event::KeyEvent) -> Update {
        let binding = [Binding::Back, Binding::Quit, Binding::Search, Binding::Select]
            .into_iter()
            .find(|b| self.keys.matches(*b, key));
        match binding {
            Some(Binding::Back) => self.back(),
            Some(Binding::Quit) => self.quit(),
            Some(Binding::Search) if self.session.is_authed() && self.focus != Focus::SearchField => {
                self.set_focus(Focus::SearchField);
                Update::handled()
            }
            Some(Binding::Select) if self.focus == Focus::SearchField => self.submit_search(),
            _ => Update::ignored(),
        }
    }

    fn broadcast(&mut self, action: &Action) -> Update {
        let ctx = Context::new(&self.session, &self.keys);
        let mut update = self
            .dialog
            .update(action, &ctx)
            .merge(self.search_field.update(action, &ctx));
        for page in self.pages.all_mut() {
            update = update.merge(page.update(action, &ctx));
        }
        update
    }

    fn back(&mut self) -> Update {
        match self.nav.back() {
            Back::AtRoot => {
                self.set_focus(Focus::Dialog);
                Update::handled()
            }
            Back::Moved(page) => {
                let mut update = Update::handled();
                if page == Page::Lists {
                    self.search_field.set_value("");
                    update = update.merge(self.pages.lists.reload(&self.session));
                }
                self.set_focus(Focus::Page);
                update
            }
        }
    }

    /// First request shows the prompt, a second one while it is up quits.
    fn quit(&mut self) -> Update {
        if self.focus == Focus::Dialog {
            info!("Quit confirmed");
            Update::handled().with(Effect::Quit)
        } else {
            self.set_focus(Focus::Dialog);
            Update::handled()
        }
    }

    fn submit_search(&mut self) -> Update {
        let query = self.search_field.value().trim().to_string();
        if query.is_empty() {
            return Update::handled();
        }
        self.nav.open(Page::Search);
        self.set_focus(Focus::Page);
        Update::handled().with_all(self.pages.search.begin_query(&query))
    }

    fn set_focus(&mut self, focus: Focus) {
        debug!("Focus: {:?} -> {:?}", self.focus, focus);
        self.dialog.blur();
        self.search_field.blur();
        for page in self.pages.all_mut() {
            page.blur();
        }
        self.focus = focus;
        match focus {
            Focus::Dialog => self.dialog.focus(),
            Focus::SearchField => self.search_field.focus(),
            Focus::Page => self.pages.get_mut(self.nav.current()).focus(),
        }
    }

    fn reconcile_focus(&mut self) {
        let lost = match self.focus {
            Focus::Dialog => !self.dialog.focused(),
            Focus::SearchField => !self.search_field.focused(),
            Focus::Page => false,
        };
        if lost {
            self.set_focus(Focus::Page);
        }
    }

    fn title(&self) -> StyledBlock {
        styled(
            TITLE,
            Style::default()
                .fg(Color::White)
                .bg(TITLE_BG)
                .add_modifier(Modifier::BOLD),
        )
    }

    fn centered(&self, block: StyledBlock) -> StyledBlock {
        let left = (self.size.width as usize).saturating_sub(text_width(&block)) / 2;
        margin(block, 0, 0, 0, left)
    }

    fn body(&self) -> StyledBlock {
        let page = self.pages.get(self.nav.current()).view();
        if self.session.is_authed() {
            let header = join_horizontal(
                VAlign::Center,
                &[self.title(), blank(1, 1), self.search_field.view()],
            );
            join_vertical(Alignment::Left, &[header, page])
        } else {
            let app_bar = margin(self.title(), 1, 0, 1, 0);
            join_vertical(
                Alignment::Left,
                &[self.centered(app_bar), self.centered(page)],
            )
        }
    }

    pub fn view(&self) -> StyledBlock {
        if self.size.is_empty() {
            return Text::default();
        }
        let (width, height) = (self.size.width as usize, self.size.height as usize);

        let mut base = self.body();
        base.lines.truncate(height.saturating_sub(2));
        let filler = height.saturating_sub(2) - base.lines.len();
        let mut base = join_vertical(
            Alignment::Left,
            &[base, blank(0, filler + 1), Text::from(self.keys.help_line())],
        );
        base.lines.truncate(height);
        let mut base = clip_columns(base, width);

        if self.focus == Focus::Dialog {
            let dialog = self.dialog.view();
            let x = width.saturating_sub(text_width(&dialog)) / 2;
            let y = (height.saturating_sub(text_height(&dialog)) / 2).saturating_sub(3);
            base = render_overlay(&base, &dialog, x as i32, y as i32);
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AuthState, Film, Paged};
    use crate::test_support::{char_key, ctrl, film, key, signed_in_auth};
    use crossterm::event::KeyCode;

    fn app() -> App {
        let mut app = App::new(Keymap::default());
        app.resize(100, 40);
        app
    }

    fn authed_app() -> App {
        let mut app = app();
        app.update(&Action::Authenticated(signed_in_auth()));
        app
    }

    fn results(generation: u64, query: &str, films: Vec<Film>) -> Action {
        Action::SearchResults {
            generation,
            query: query.to_string(),
            result: Ok(Paged {
                page: 1,
                total_pages: 1,
                total_results: films.len() as u32,
                results: films,
            }),
        }
    }

    fn search(app: &mut App, query: &str) -> Update {
        app.update(&char_key('/'));
        for c in query.chars() {
            app.update(&char_key(c));
        }
        app.update(&key(KeyCode::Enter))
    }

    #[test]
    fn test_starts_on_account_page_with_one_focus() {
        let app = app();
        assert_eq!(app.current_page(), Page::Account);
        assert_eq!(app.focus(), Focus::Page);
        assert_eq!(app.focused_leaf_count(), 1);
    }

    #[test]
    fn test_guest_login_lands_on_lists() {
        let mut app = app();
        let update = app.update(&Action::Authenticated(AuthState::guest()));
        assert_eq!(app.current_page(), Page::Lists);
        assert!(update.effects.is_empty());
        assert_eq!(app.focused_leaf_count(), 1);
    }

    #[test]
    fn test_sign_in_reloads_lists() {
        let mut app = app();
        let update = app.update(&Action::Authenticated(signed_in_auth()));
        assert_eq!(
            update.effects,
            vec![Effect::FetchReviews {
                generation: 1,
                user_id: 3,
                token: Some("id=abc".to_string())
            }]
        );
    }

    #[test]
    fn test_search_is_not_available_before_auth() {
        let mut app = app();
        app.update(&char_key('/'));
        assert_eq!(app.focus(), Focus::Page);
    }

    #[test]
    fn test_search_submits_query_and_opens_page() {
        let mut app = authed_app();
        let update = search(&mut app, "dune");
        assert_eq!(app.current_page(), Page::Search);
        assert_eq!(app.focus(), Focus::Page);
        assert_eq!(
            update.effects,
            vec![Effect::SearchFilms {
                generation: 1,
                query: "dune".to_string()
            }]
        );
        assert_eq!(app.focused_leaf_count(), 1);
    }

    #[test]
    fn test_typing_quit_key_in_field_is_text() {
        let mut app = authed_app();
        app.update(&char_key('/'));
        app.update(&char_key('q'));
        assert_eq!(app.focus(), Focus::SearchField);
        assert_eq!(app.search_field().value(), "q");
    }

    #[test]
    fn test_stale_search_results_are_not_shown_or_cached() {
        let mut app = authed_app();
        search(&mut app, "dune");
        search(&mut app, "arrival");

        app.update(&results(2, "arrival", vec![film(5, "Arrival")]));
        app.update(&results(1, "dune", vec![film(1, "Dune")]));

        assert_eq!(app.search_page().items().len(), 1);
        assert!(app.session().films.get(5).is_some());
        assert!(app.session().films.get(1).is_none());
    }

    #[test]
    fn test_details_then_back_twice_returns_to_lists() {
        let mut app = authed_app();
        search(&mut app, "dune");
        app.update(&results(1, "dune", vec![film(1, "Dune"), film(2, "Dune II")]));

        // Select the first result; the item dispatches ShowFilm
        let update = app.update(&key(KeyCode::Enter));
        assert_eq!(update.effects, vec![Effect::Dispatch(Action::ShowFilm(1))]);
        let update = app.update(&Action::ShowFilm(1));
        assert_eq!(app.current_page(), Page::FilmDetails);
        // Cached from the search, so nothing to fetch but the poster (none here)
        assert!(update.effects.is_empty());
        assert_eq!(app.focused_leaf_count(), 1);

        app.update(&key(KeyCode::Esc));
        assert_eq!(app.current_page(), Page::Search);
        assert_eq!(app.focused_leaf_count(), 1);

        let update = app.update(&key(KeyCode::Esc));
        assert_eq!(app.current_page(), Page::Lists);
        assert_eq!(app.search_field().value(), "");
        assert!(matches!(
            update.effects.as_slice(),
            [Effect::FetchReviews { generation: 2, .. }]
        ));

        // Lists is a root page: back now asks to quit
        app.update(&key(KeyCode::Esc));
        assert_eq!(app.focus(), Focus::Dialog);
        assert_eq!(app.focused_leaf_count(), 1);
    }

    #[test]
    fn test_back_in_search_field_returns_focus_to_page() {
        let mut app = authed_app();
        app.update(&char_key('/'));
        assert_eq!(app.focus(), Focus::SearchField);
        app.update(&key(KeyCode::Esc));
        assert_eq!(app.focus(), Focus::Page);
        assert_eq!(app.current_page(), Page::Lists);
        assert_eq!(app.focused_leaf_count(), 1);
    }

    #[test]
    fn test_back_in_account_form_stays_on_page() {
        let mut app = app();
        app.update(&Action::Account(crate::core::action::AccountAction::ShowSignIn));
        app.update(&key(KeyCode::Esc));
        // The form consumed back: no quit prompt
        assert_eq!(app.focus(), Focus::Page);
        assert_eq!(
            app.account_page().stage(),
            crate::tui::pages::account::Stage::Picker
        );
    }

    #[test]
    fn test_quit_takes_two_steps() {
        let mut app = authed_app();
        let first = app.update(&ctrl('c'));
        assert!(first.effects.is_empty());
        assert_eq!(app.focus(), Focus::Dialog);

        let second = app.update(&ctrl('c'));
        assert_eq!(second.effects, vec![Effect::Quit]);
    }

    #[test]
    fn test_quit_action_only_honoured_from_dialog() {
        let mut app = authed_app();
        let update = app.update(&Action::Quit);
        assert!(update.effects.is_empty());
        assert_eq!(app.focus(), Focus::Dialog);
        assert_eq!(app.update(&Action::Quit).effects, vec![Effect::Quit]);
    }

    #[test]
    fn test_dismiss_dialog_restores_page_focus() {
        let mut app = authed_app();
        app.update(&key(KeyCode::Esc));
        assert_eq!(app.focus(), Focus::Dialog);
        app.update(&Action::DismissDialog);
        assert_eq!(app.focus(), Focus::Page);
        assert_eq!(app.focused_leaf_count(), 1);
    }

    #[test]
    fn test_view_fills_terminal() {
        let mut app = authed_app();
        let view = app.view();
        assert_eq!(view.lines.len(), 40);
        assert!(view.lines.iter().all(|l| crate::tui::layout::line_width(l) <= 100));

        app.update(&key(KeyCode::Esc));
        let with_dialog = app.view();
        assert_eq!(with_dialog.lines.len(), 40);
        let text: String = with_dialog
            .lines
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("Quit program?"));
    }

    #[test]
    fn test_resize_action_relayouts() {
        let mut app = authed_app();
        app.update(&Action::Resize {
            width: 60,
            height: 20,
        });
        assert_eq!(app.size(), Size::new(60, 20));
        assert_eq!(app.view().lines.len(), 20);
    }

    #[test]
    fn test_tiny_terminal_renders_without_panicking() {
        let mut app = authed_app();
        app.resize(3, 2);
        app.view();
        app.resize(0, 0);
        assert_eq!(app.view(), Text::default());
    }
}
