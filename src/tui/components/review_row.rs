use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

use crate::api::{FilmId, Review};
use crate::core::action::{Action, Effect, Update};
use crate::core::state::Session;
use crate::tui::blocks::StyledBlock;
use crate::tui::component::{Component, Context, Size};
use crate::tui::keymap::Binding;
use crate::tui::layout::{measure_width, truncate_with_ellipsis};

const ACTIVE: Color = Color::Indexed(170);
const SUBTLE: Color = Color::Indexed(8);

/// One line in the Lists page: title, score and last update.
#[derive(Debug, Clone)]
pub struct ReviewRow {
    film_id: FilmId,
    title: String,
    score: Option<u8>,
    date: String,
    focused: bool,
    size: Size,
}

impl ReviewRow {
    /// Titles come from the session's film cache; unknown films show their id.
    pub fn new(review: &Review, session: &Session, width: u16) -> Self {
        let title = session
            .films
            .get(review.film_id)
            .map(|f| f.title.clone())
            .unwrap_or_else(|| format!("#{}", review.film_id));
        Self {
            film_id: review.film_id,
            title,
            score: review.score,
            date: review.updated_at.format("%Y-%m-%d").to_string(),
            focused: false,
            size: Size::new(width, 1),
        }
    }

    pub fn film_id(&self) -> FilmId {
        self.film_id
    }
}

impl Component for ReviewRow {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.size = Size::new(width, height);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn update(&mut self, action: &Action, ctx: &Context<'_>) -> Update {
        match action {
            Action::Key(key) if self.focused && ctx.keys.matches(Binding::Select, key) => {
                Update::handled().with(Effect::Dispatch(Action::ShowFilm(self.film_id)))
            }
            _ => Update::ignored(),
        }
    }

    fn view(&self) -> StyledBlock {
        if self.size.is_empty() {
            return Text::default();
        }
        let score = match self.score {
            Some(s) => format!("★ {s:>2}/10"),
            None => "  -     ".to_string(),
        };
        let tail = format!("  {score}  {}", self.date);
        let marker = if self.focused { "> " } else { "  " };
        let room = (self.size.width as usize)
            .saturating_sub(measure_width(marker) + measure_width(&tail));
        let title = truncate_with_ellipsis(&self.title, room);
        let pad = room.saturating_sub(measure_width(&title));

        let title_style = if self.focused {
            Style::default().fg(ACTIVE).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Text::from(Line::from(vec![
            Span::styled(marker, Style::default().fg(ACTIVE)),
            Span::styled(title, title_style),
            Span::raw(" ".repeat(pad)),
            Span::styled(tail, Style::default().fg(SUBTLE)),
        ]))
    }
}
