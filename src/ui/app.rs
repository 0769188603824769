//! Main application state and logic.

use std::time::Instant;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use rand::rngs::StdRng;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph},
    Frame,
};
use tracing::{debug, info, warn};

use super::theme::{icons, Theme};
use super::widgets::{AnswerOptions, KeyHints, Logo, QuestionCue, ResultScreen, WordCard};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::models::{ScoreSummary, Unit};
use crate::progress::{KeyValueStore, ProgressStore};
use crate::session::QuizSession;
use crate::speech::Speaker;

// ══════════════════════════════════════════════════════════════════════════
// Application State
// ══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Home,
    Learn,
    Test,
    Result,
}

/// One line of the home screen unit list.
#[derive(Debug, Clone)]
pub struct UnitRow {
    pub unit_id: String,
    pub module_name: String,
    pub unit_name: String,
    pub word_count: usize,
    pub stars: u32,
    pub learned_percent: u32,
}

/// Outcome shown on the result screen.
#[derive(Debug, Clone)]
pub struct QuizOutcome {
    pub summary: ScoreSummary,
    pub stars: u32,
}

pub struct App<S: KeyValueStore> {
    pub screen: Screen,
    pub running: bool,

    // Config and theme
    pub config: Config,
    pub theme: Theme,

    // Collaborators
    pub catalog: Catalog,
    pub progress: ProgressStore<S>,
    pub speaker: Box<dyn Speaker>,
    pub rng: StdRng,

    // Home
    pub unit_rows: Vec<UnitRow>,
    pub unit_list_state: ListState,
    pub total_stars: u32,
    pub total_learned: usize,

    // Current unit
    pub current_unit: Option<String>,

    // Learn state
    pub word_index: usize,
    pub showing_meaning: bool,

    // Test state
    pub session: Option<QuizSession>,
    pub option_cursor: usize,

    // Result state
    pub outcome: Option<QuizOutcome>,

    // Status message (shown temporarily)
    pub status_message: Option<(String, Instant)>,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(
        catalog: Catalog,
        progress: ProgressStore<S>,
        speaker: Box<dyn Speaker>,
        config: Config,
        rng: StdRng,
    ) -> Self {
        let theme = Theme::from_name(&config.theme);
        info!(speech = speaker.is_supported(), "Initializing app");

        let mut app = Self {
            screen: Screen::Home,
            running: true,
            config,
            theme,
            catalog,
            progress,
            speaker,
            rng,
            unit_rows: Vec::new(),
            unit_list_state: ListState::default().with_selected(Some(0)),
            total_stars: 0,
            total_learned: 0,
            current_unit: None,
            word_index: 0,
            showing_meaning: false,
            session: None,
            option_cursor: 0,
            outcome: None,
            status_message: None,
        };
        app.refresh_unit_list();
        app
    }

    pub fn refresh_unit_list(&mut self) {
        self.unit_rows = self
            .catalog
            .all_units()
            .into_iter()
            .map(|(module, unit)| UnitRow {
                unit_id: unit.id.clone(),
                module_name: module.name.clone(),
                unit_name: unit.name.clone(),
                word_count: unit.words.len(),
                stars: self.progress.unit_progress(&unit.id).stars,
                learned_percent: self.progress.learned_percentage(&unit.id, unit.words.len()),
            })
            .collect();
        (self.total_stars, self.total_learned) = self.progress.totals();
    }

    pub fn unit(&self) -> Option<&Unit> {
        let id = self.current_unit.as_deref()?;
        self.catalog.unit_by_id(id).map(|(_, unit)| unit)
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    pub fn cycle_theme(&mut self) {
        let new_theme_name = self.theme.name.next();
        self.theme = Theme::new(new_theme_name);
        self.config.theme = new_theme_name.as_str().to_string();
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }

    fn go_home(&mut self) {
        self.speaker.stop();
        self.session = None;
        self.current_unit = None;
        self.refresh_unit_list();
        self.screen = Screen::Home;
    }

    fn speak(&self, text: &str) {
        self.speaker.speak(text, &self.config.speech.options);
    }

    // ══════════════════════════════════════════════════════════════════════
    // Learning
    // ══════════════════════════════════════════════════════════════════════

    /// Open the learning screen for `unit_id`.
    /// A module id opens that module's first unit with words.
    pub fn open_unit(&mut self, unit_id: &str) {
        if let Some(module) = self.catalog.module_by_id(unit_id) {
            if let Some(first) = module.units.iter().find(|u| !u.is_empty()) {
                let first = first.id.clone();
                return self.open_unit(&first);
            }
        }

        let Some((_, unit)) = self.catalog.unit_by_id(unit_id) else {
            warn!(unit_id, "Unit not found");
            self.set_status(format!("Unit '{}' not found", unit_id));
            return;
        };
        if unit.is_empty() {
            let message = format!("{} has no words yet", unit.name);
            self.set_status(message);
            return;
        }

        info!(unit_id, "Opening unit");
        self.current_unit = Some(unit_id.to_string());
        self.word_index = 0;
        self.showing_meaning = false;
        self.screen = Screen::Learn;
        self.on_word_shown();
    }

    fn on_word_shown(&self) {
        if self.config.auto_play {
            if let Some(word) = self.unit().and_then(|u| u.words.get(self.word_index)) {
                self.speak(&word.english);
            }
        }
    }

    fn mark_current_word_learned(&mut self) {
        let Some(unit) = self.unit() else { return };
        let Some(word) = unit.words.get(self.word_index) else { return };
        let (unit_id, english) = (unit.id.clone(), word.english.clone());
        self.progress.mark_learned(&unit_id, &english);
    }

    pub fn next_word(&mut self) {
        let count = self.unit().map(|u| u.words.len()).unwrap_or(0);
        if self.word_index + 1 < count {
            self.mark_current_word_learned();
            self.word_index += 1;
            self.showing_meaning = false;
            self.on_word_shown();
        }
    }

    pub fn previous_word(&mut self) {
        if self.word_index > 0 {
            self.word_index -= 1;
            self.showing_meaning = false;
            self.on_word_shown();
        }
    }

    pub fn is_last_word(&self) -> bool {
        self.unit()
            .map(|u| self.word_index + 1 >= u.words.len())
            .unwrap_or(true)
    }

    pub fn play_current_word(&self) {
        if let Some(word) = self.unit().and_then(|u| u.words.get(self.word_index)) {
            self.speak(&word.english);
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Testing
    // ══════════════════════════════════════════════════════════════════════

    /// Leave the learning screen for the quiz.
    pub fn finish_learning(&mut self) {
        self.mark_current_word_learned();
        self.start_test();
    }

    pub fn start_test(&mut self) {
        let unit = self
            .current_unit
            .as_deref()
            .and_then(|id| self.catalog.unit_by_id(id))
            .map(|(_, unit)| unit);
        let Some(unit) = unit else {
            self.go_home();
            return;
        };

        match QuizSession::start(unit, self.config.question_count, &mut self.rng) {
            Some(session) => {
                info!(
                    unit_id = %session.unit_id,
                    attempt_id = %session.id,
                    questions = session.questions.len(),
                    "Starting quiz"
                );
                self.session = Some(session);
                self.option_cursor = 0;
                self.outcome = None;
                self.screen = Screen::Test;
                self.on_question_shown();
            }
            None => {
                let name = unit.name.clone();
                self.go_home();
                self.set_status(format!("No quiz available for {}", name));
            }
        }
    }

    fn on_question_shown(&self) {
        if let Some(ref session) = self.session {
            let question = session.current();
            if self.config.auto_play && question.kind.is_listening() {
                self.speak(&question.word.english);
            }
        }
    }

    pub fn replay_question_audio(&self) {
        if let Some(ref session) = self.session {
            self.speak(&session.current().word.english);
        }
    }

    /// Answer the current question with the option at `index`.
    pub fn choose_option(&mut self, index: usize) {
        let Some(ref mut session) = self.session else { return };
        if session.is_answered() {
            return;
        }
        let Some(choice) = session.current().options.get(index).cloned() else { return };

        let correct = session.answer(&choice);
        debug!(question = session.current, choice = %choice, correct, "Answered question");
        self.option_cursor = index;
    }

    pub fn move_cursor(&mut self, down: bool) {
        let Some(ref session) = self.session else { return };
        let count = session.current().options.len();
        if count == 0 || session.is_answered() {
            return;
        }
        self.option_cursor = if down {
            (self.option_cursor + 1) % count
        } else {
            (self.option_cursor + count - 1) % count
        };
    }

    /// Continue after an answered question; grades the quiz after the last.
    pub fn next_question(&mut self) {
        let Some(ref mut session) = self.session else { return };
        if !session.is_answered() {
            return;
        }

        if session.advance() {
            self.option_cursor = 0;
            self.on_question_shown();
        } else {
            self.finish_test();
        }
    }

    pub fn finish_test(&mut self) {
        let Some(session) = self.session.take() else { return };
        self.speaker.stop();

        let summary = session.summary();
        let stars = self
            .progress
            .apply_quiz_result(&session.unit_id, &session.id, &summary);

        self.outcome = Some(QuizOutcome { summary, stars });
        self.refresh_unit_list();
        self.screen = Screen::Result;
    }

    // ══════════════════════════════════════════════════════════════════════
    // Event Handling
    // ══════════════════════════════════════════════════════════════════════

    pub fn handle_events(&mut self) -> anyhow::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match self.screen {
            Screen::Home => self.handle_home_keys(key),
            Screen::Learn => self.handle_learn_keys(key),
            Screen::Test => self.handle_test_keys(key),
            Screen::Result => self.handle_result_keys(key),
        }
    }

    fn selected_unit_id(&self) -> Option<String> {
        let i = self.unit_list_state.selected()?;
        self.unit_rows.get(i).map(|row| row.unit_id.clone())
    }

    fn handle_home_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('t') => self.cycle_theme(),
            KeyCode::Up | KeyCode::Char('k') => {
                let i = self.unit_list_state.selected().unwrap_or(0);
                let new_i = if i == 0 {
                    self.unit_rows.len().saturating_sub(1)
                } else {
                    i - 1
                };
                self.unit_list_state.select(Some(new_i));
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let i = self.unit_list_state.selected().unwrap_or(0);
                let new_i = if i >= self.unit_rows.len().saturating_sub(1) {
                    0
                } else {
                    i + 1
                };
                self.unit_list_state.select(Some(new_i));
            }
            KeyCode::Enter => {
                if let Some(unit_id) = self.selected_unit_id() {
                    self.open_unit(&unit_id);
                }
            }
            KeyCode::Char('x') => {
                if let Some(unit_id) = self.selected_unit_id() {
                    self.current_unit = Some(unit_id);
                    self.start_test();
                }
            }
            _ => {}
        }
    }

    fn handle_learn_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('q') => self.go_home(),
            KeyCode::Char(' ') => self.showing_meaning = !self.showing_meaning,
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') => self.next_word(),
            KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => self.previous_word(),
            KeyCode::Char('r') => self.play_current_word(),
            KeyCode::Enter => {
                if self.is_last_word() {
                    self.finish_learning();
                } else {
                    self.next_word();
                }
            }
            KeyCode::Char('x') => self.finish_learning(),
            KeyCode::Char('t') => self.cycle_theme(),
            _ => {}
        }
    }

    fn handle_test_keys(&mut self, key: KeyCode) {
        let answered = self.session.as_ref().map(|s| s.is_answered()).unwrap_or(false);
        match key {
            KeyCode::Esc | KeyCode::Char('q') => {
                info!("Quiz abandoned");
                self.go_home();
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                self.choose_option(index);
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(true),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if answered {
                    self.next_question();
                } else {
                    self.choose_option(self.option_cursor);
                }
            }
            KeyCode::Char('r') => self.replay_question_audio(),
            _ => {}
        }
    }

    fn handle_result_keys(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('r') => {
                if self.current_unit.is_some() {
                    self.start_test();
                }
            }
            KeyCode::Char('l') => {
                if let Some(unit_id) = self.current_unit.clone() {
                    self.open_unit(&unit_id);
                }
            }
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => self.go_home(),
            _ => {}
        }
    }

    // ══════════════════════════════════════════════════════════════════════
    // Rendering
    // ══════════════════════════════════════════════════════════════════════

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Clear with background
        frame.render_widget(Clear, area);
        frame.render_widget(
            Block::default().style(Style::default().bg(self.theme.colors.bg_dark)),
            area,
        );

        match self.screen {
            Screen::Home => self.render_home(frame, area),
            Screen::Learn => self.render_learn(frame, area),
            Screen::Test => self.render_test(frame, area),
            Screen::Result => self.render_result(frame, area),
        }
    }

    fn render_home(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(1),   // Top padding
            Constraint::Length(5),   // Logo
            Constraint::Length(2),   // Totals
            Constraint::Min(5),      // Unit list
            Constraint::Length(3),   // Help
        ])
        .split(area);

        Logo::render_to(&self.theme, chunks[1], frame.buffer_mut());

        let totals = Paragraph::new(Line::from(vec![
            Span::styled(format!("{} ", icons::STAR), self.theme.star(true)),
            Span::styled(
                format!("{} stars", self.total_stars),
                Style::default().fg(self.theme.colors.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled("   ", Style::default()),
            Span::styled(format!("{} ", icons::BOOK), Style::default()),
            Span::styled(
                format!("{} words learned", self.total_learned),
                Style::default().fg(self.theme.colors.text).add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(totals, chunks[2]);

        let list_area = centered_rect(70, 100, chunks[3]);
        let items: Vec<ListItem> = self
            .unit_rows
            .iter()
            .map(|row| {
                let mut spans = vec![
                    Span::styled(
                        format!("{} · ", row.module_name),
                        Style::default().fg(self.theme.colors.text_muted),
                    ),
                    Span::styled(&row.unit_name, Style::default().add_modifier(Modifier::BOLD)),
                    Span::styled(
                        format!("  {} words, {}% learned  ", row.word_count, row.learned_percent),
                        Style::default().fg(self.theme.colors.text_dim),
                    ),
                ];
                if row.stars > 0 {
                    spans.push(Span::styled(
                        format!("{} {}", icons::STAR, row.stars),
                        self.theme.star(true),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(self.theme.colors.primary))
                    .title(" Units ")
                    .title_style(self.theme.highlight()),
            )
            .highlight_style(self.theme.selected())
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, list_area, &mut self.unit_list_state);

        let theme_hint = format!("[{}]", self.theme.name.display_name());
        let hints_data: [(&str, &str); 5] = [
            ("j/k", "nav"),
            ("Enter", "learn"),
            ("x", "quiz"),
            ("t", &theme_hint),
            ("q", "quit"),
        ];
        frame.render_widget(KeyHints::new(&hints_data, &self.theme), chunks[4]);

        // Show status message if recent (within 5 seconds)
        if let Some((ref msg, time)) = self.status_message {
            if time.elapsed().as_secs() < 5 {
                let status = Paragraph::new(msg.as_str())
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(self.theme.colors.notice));
                let status_area = Rect {
                    y: chunks[4].y.saturating_sub(1),
                    height: 1,
                    ..chunks[4]
                };
                frame.render_widget(status, status_area);
            }
        }
    }

    fn render_learn(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(3),   // Header
            Constraint::Length(1),   // Progress
            Constraint::Length(1),   // Spacing
            Constraint::Min(8),      // Card
            Constraint::Length(2),   // Hints
        ])
        .split(area);

        let Some(unit) = self.unit() else { return };
        let Some(word) = unit.words.get(self.word_index) else { return };

        let header = Paragraph::new(Line::from(Span::styled(unit.name.as_str(), self.theme.title())))
            .alignment(Alignment::Center);
        frame.render_widget(header, chunks[0]);

        let position = self.word_index + 1;
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(self.theme.colors.primary).bg(self.theme.colors.bg_highlight))
            .ratio(position as f64 / unit.words.len() as f64)
            .label(format!("{} / {}", position, unit.words.len()));
        frame.render_widget(gauge, centered_rect(60, 100, chunks[1]));

        let learned = self.progress.unit_progress(&unit.id).has_learned(&word.english);
        frame.render_widget(
            WordCard::new(word, self.showing_meaning, learned, &self.theme),
            centered_rect(60, 100, chunks[3]),
        );

        let quiz_key = if self.is_last_word() { "Enter" } else { "x" };
        let hints_data = [
            ("←/→", "prev/next"),
            ("Space", "meaning"),
            ("r", "listen"),
            (quiz_key, "start quiz"),
            ("Esc", "home"),
        ];
        frame.render_widget(KeyHints::new(&hints_data, &self.theme), chunks[4]);
    }

    fn render_test(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Length(3),   // Header
            Constraint::Length(7),   // Cue
            Constraint::Length(1),   // Spacing
            Constraint::Min(8),      // Options
            Constraint::Length(1),   // Feedback
            Constraint::Length(2),   // Hints
        ])
        .split(area);

        let Some(ref session) = self.session else { return };
        let question = session.current();

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                format!("Question {} / {}", session.current + 1, session.questions.len()),
                self.theme.title(),
            ),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(header, chunks[0]);

        frame.render_widget(QuestionCue::new(question, &self.theme), centered_rect(60, 100, chunks[1]));

        let chosen = session.current_answer();
        frame.render_widget(
            AnswerOptions::new(question, self.option_cursor, chosen, &self.theme),
            chunks[3],
        );

        if let Some(choice) = chosen {
            let feedback = if question.is_correct(choice) {
                Line::from(Span::styled(format!("{} Correct!", icons::CHECK), self.theme.correct()))
            } else {
                Line::from(vec![
                    Span::styled(format!("{} The answer is ", icons::CROSS), self.theme.wrong()),
                    Span::styled(question.correct_answer.as_str(), self.theme.word()),
                    Span::styled(format!("  {}", question.word.chinese), self.theme.meaning()),
                ])
            };
            frame.render_widget(Paragraph::new(feedback).alignment(Alignment::Center), chunks[4]);
        }

        let next = if session.is_finished() { "finish" } else { "next" };
        let answered_hints = [("Enter", next), ("Esc", "quit")];
        let hints = if chosen.is_some() {
            KeyHints::new(&answered_hints, &self.theme)
        } else {
            KeyHints::new(
                &[("1-4", "answer"), ("j/k", "move"), ("Enter", "choose"), ("r", "listen"), ("Esc", "quit")],
                &self.theme,
            )
        };
        frame.render_widget(hints, chunks[5]);
    }

    fn render_result(&mut self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Min(10),     // Result card
            Constraint::Length(2),   // Hints
        ])
        .split(area);

        let Some(ref outcome) = self.outcome else { return };
        let unit_name = self.unit().map(|u| u.name.as_str()).unwrap_or("Quiz");

        frame.render_widget(
            ResultScreen::new(&outcome.summary, outcome.stars, unit_name, &self.theme),
            centered_rect(60, 90, chunks[0]),
        );

        let hints = KeyHints::new(
            &[("r", "retry quiz"), ("l", "learn again"), ("Enter", "home")],
            &self.theme,
        );
        frame.render_widget(hints, chunks[1]);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Helper Functions
// ══════════════════════════════════════════════════════════════════════════

/// Create a centered rectangle.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::MemoryStore;
    use crate::speech::SilentSpeaker;
    use rand::SeedableRng;

    fn app() -> App<MemoryStore> {
        App::new(
            Catalog::bundled().unwrap(),
            ProgressStore::new(MemoryStore::default()),
            Box::new(SilentSpeaker),
            Config::default(),
            StdRng::seed_from_u64(11),
        )
    }

    fn answer_all(app: &mut App<MemoryStore>, correctly: bool) {
        while app.screen == Screen::Test {
            let session = app.session.as_ref().unwrap();
            let question = session.current();
            let index = question
                .options
                .iter()
                .position(|o| question.is_correct(o) == correctly)
                .unwrap_or(0);
            app.handle_key(KeyCode::Char(char::from(b'1' + index as u8)));
            app.handle_key(KeyCode::Enter);
        }
    }

    #[test]
    fn test_home_lists_non_empty_units() {
        let app = app();
        assert_eq!(app.screen, Screen::Home);
        assert_eq!(app.unit_rows.len(), 18);
        assert_eq!(app.unit_rows[0].unit_id, "module-1-unit-1");
        assert_eq!((app.total_stars, app.total_learned), (0, 0));
    }

    #[test]
    fn test_unknown_unit_sets_status() {
        let mut app = app();
        app.open_unit("module-42-unit-9");
        assert_eq!(app.screen, Screen::Home);
        assert!(app.status_message.is_some());

        app.open_unit("module-1-unit-2");
        assert_eq!(app.screen, Screen::Home);
    }

    #[test]
    fn test_module_id_opens_first_unit() {
        let mut app = app();
        app.open_unit("module-2");
        assert_eq!(app.screen, Screen::Learn);
        assert_eq!(app.current_unit.as_deref(), Some("module-2-unit-1"));
    }

    #[test]
    fn test_learning_marks_words() {
        let mut app = app();
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.screen, Screen::Learn);
        assert_eq!(app.current_unit.as_deref(), Some("module-1-unit-1"));

        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Right);
        let learned = app.progress.unit_progress("module-1-unit-1").learned_words;
        assert_eq!(learned, vec!["met".to_string(), "above".to_string()]);
    }

    #[test]
    fn test_perfect_quiz_earns_three_stars() {
        let mut app = app();
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Char('x'));
        assert_eq!(app.screen, Screen::Test);
        assert_eq!(app.session.as_ref().unwrap().questions.len(), 10);

        answer_all(&mut app, true);

        assert_eq!(app.screen, Screen::Result);
        let outcome = app.outcome.as_ref().unwrap();
        assert_eq!(outcome.summary.percentage, 100);
        assert_eq!(outcome.stars, 3);
        assert_eq!(app.progress.unit_progress("module-1-unit-1").stars, 3);
        assert_eq!(app.total_stars, 3);
    }

    #[test]
    fn test_retry_accumulates_stars() {
        let mut app = app();
        app.handle_key(KeyCode::Char('x'));
        answer_all(&mut app, true);
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(app.screen, Screen::Test);
        answer_all(&mut app, false);

        let outcome = app.outcome.as_ref().unwrap();
        assert_eq!(outcome.stars, 0);
        assert_eq!(outcome.summary.wrong_words.len(), 10);

        let progress = app.progress.unit_progress("module-1-unit-1");
        assert_eq!(progress.stars, 3);
        assert_eq!(progress.completed_tests.len(), 2);
    }

    #[test]
    fn test_enter_before_answering_chooses_cursor() {
        let mut app = app();
        app.handle_key(KeyCode::Char('x'));
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);
        let session = app.session.as_ref().unwrap();
        let chosen = session.current_answer().unwrap();
        assert_eq!(chosen, session.current().options[1]);
    }

    #[test]
    fn test_abandoned_quiz_is_not_recorded() {
        let mut app = app();
        app.handle_key(KeyCode::Char('x'));
        app.handle_key(KeyCode::Char('1'));
        app.handle_key(KeyCode::Esc);
        assert_eq!(app.screen, Screen::Home);
        assert!(app.session.is_none());
        assert!(app.progress.all_progress().is_empty());
    }
}
