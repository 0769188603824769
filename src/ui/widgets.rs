//! Custom widgets for the word game TUI.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{block::BorderType, Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::theme::{icons, Theme};
use crate::models::{ScoreSummary, TestQuestion, Word};

// ══════════════════════════════════════════════════════════════════════════
// Logo Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct Logo;

impl Logo {
    const ART: &'static str = r#"
 __        __            _    ____
 \ \      / /__  _ __ __| |  / ___| __ _ _ __ ___   ___
  \ \ /\ / / _ \| '__/ _` | | |  _ / _` | '_ ` _ \ / _ \
   \ V  V / (_) | | | (_| | | |_| | (_| | | | | | |  __/
    \_/\_/ \___/|_|  \__,_|  \____|\__,_|_| |_| |_|\___|"#;

    pub fn render_to(theme: &Theme, area: Rect, buf: &mut Buffer) {
        let lines: Vec<Line> = Self::ART
            .lines()
            .skip(1)
            .map(|line| Line::from(Span::styled(line, Style::default().fg(theme.colors.primary))))
            .collect();

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Star Row
// ══════════════════════════════════════════════════════════════════════════

/// `earned` lit stars out of `out_of`.
pub fn star_spans<'a>(earned: u32, out_of: u32, theme: &Theme) -> Vec<Span<'a>> {
    (0..out_of)
        .map(|i| {
            let lit = i < earned;
            let icon = if lit { icons::STAR } else { icons::STAR_EMPTY };
            Span::styled(format!("{} ", icon), theme.star(lit))
        })
        .collect()
}

// ══════════════════════════════════════════════════════════════════════════
// Word Card Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct WordCard<'a> {
    word: &'a Word,
    show_meaning: bool,
    learned: bool,
    theme: &'a Theme,
}

impl<'a> WordCard<'a> {
    pub fn new(word: &'a Word, show_meaning: bool, learned: bool, theme: &'a Theme) -> Self {
        Self { word, show_meaning, learned, theme }
    }
}

impl Widget for WordCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let label = if self.learned { " LEARNED " } else { " NEW WORD " };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.colors.primary))
            .title(Line::from(Span::styled(label, self.theme.key_highlight())))
            .title_alignment(Alignment::Center);

        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![Line::from(Span::styled(self.word.english.as_str(), self.theme.word()))];
        if let Some(ref phonetic) = self.word.phonetic {
            lines.push(Line::from(Span::styled(
                phonetic.as_str(),
                Style::default().fg(self.theme.colors.text_muted),
            )));
        }
        lines.push(Line::from(""));
        if self.show_meaning {
            lines.push(Line::from(Span::styled(self.word.chinese.as_str(), self.theme.meaning())));
        } else {
            lines.push(Line::from(Span::styled(
                "(Space to show meaning)",
                Style::default().fg(self.theme.colors.text_dim),
            )));
        }

        // Center vertically
        let content_height = lines.len() as u16;
        let vertical_padding = inner.height.saturating_sub(content_height) / 2;
        let content_area = Rect {
            y: inner.y + vertical_padding,
            height: inner.height.saturating_sub(vertical_padding),
            ..inner
        };

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(content_area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Question Cue Widget
// ══════════════════════════════════════════════════════════════════════════

/// What the learner is given before choosing: a sound or a meaning.
pub struct QuestionCue<'a> {
    question: &'a TestQuestion,
    theme: &'a Theme,
}

impl<'a> QuestionCue<'a> {
    pub fn new(question: &'a TestQuestion, theme: &'a Theme) -> Self {
        Self { question, theme }
    }
}

impl Widget for QuestionCue<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let kind_style = self.theme.question_kind(self.question.kind);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(kind_style)
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(self.question.kind.name(), kind_style),
                Span::raw(" "),
            ]))
            .title_alignment(Alignment::Center);

        let inner = block.inner(area);
        block.render(area, buf);

        let lines = if self.question.kind.is_listening() {
            vec![
                Line::from(Span::styled(format!("{}  Listen", icons::SPEAKER), self.theme.word())),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Press ", self.theme.key_hint()),
                    Span::styled("r", self.theme.key_highlight()),
                    Span::styled(" to hear the word again", self.theme.key_hint()),
                ]),
            ]
        } else {
            vec![
                Line::from(Span::styled(self.question.word.chinese.as_str(), self.theme.meaning())),
                Line::from(""),
                Line::from(Span::styled("Which word matches?", self.theme.key_hint())),
            ]
        };

        let vertical_padding = inner.height.saturating_sub(lines.len() as u16) / 2;
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(
                Rect {
                    y: inner.y + vertical_padding,
                    height: inner.height.saturating_sub(vertical_padding),
                    ..inner
                },
                buf,
            );
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Answer Options Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct AnswerOptions<'a> {
    question: &'a TestQuestion,
    cursor: usize,
    chosen: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> AnswerOptions<'a> {
    pub fn new(question: &'a TestQuestion, cursor: usize, chosen: Option<&'a str>, theme: &'a Theme) -> Self {
        Self { question, cursor, chosen, theme }
    }

    fn option_style(&self, index: usize, option: &str) -> Style {
        match self.chosen {
            Some(_) if self.question.is_correct(option) => self.theme.correct(),
            Some(chosen) if chosen == option => self.theme.wrong(),
            Some(_) => Style::default().fg(self.theme.colors.text_dim),
            None if index == self.cursor => self.theme.selected().add_modifier(Modifier::BOLD),
            None => Style::default().fg(self.theme.colors.text),
        }
    }
}

impl Widget for AnswerOptions<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let widest = self
            .question
            .options
            .iter()
            .map(|o| o.width())
            .max()
            .unwrap_or(0);

        let lines: Vec<Line> = self
            .question
            .options
            .iter()
            .enumerate()
            .flat_map(|(i, option)| {
                let marker = match self.chosen {
                    Some(_) if self.question.is_correct(option) => icons::CHECK,
                    Some(chosen) if chosen == option => icons::CROSS,
                    _ if i == self.cursor && self.chosen.is_none() => ">",
                    _ => " ",
                };
                // Pad by display width so CJK and Latin options line up.
                let padding = " ".repeat(widest - option.width());
                vec![
                    Line::from(vec![
                        Span::styled(format!("{} ", marker), self.option_style(i, option)),
                        Span::styled(format!("{} ", i + 1), self.theme.key_highlight()),
                        Span::styled(format!(" {}{} ", option, padding), self.option_style(i, option)),
                    ]),
                    Line::from(""),
                ]
            })
            .collect();

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Key Hints Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct KeyHints<'a> {
    hints: &'a [(&'a str, &'a str)],
    theme: &'a Theme,
}

impl<'a> KeyHints<'a> {
    pub fn new(hints: &'a [(&'a str, &'a str)], theme: &'a Theme) -> Self {
        Self { hints, theme }
    }
}

impl Widget for KeyHints<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for (i, (key, desc)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("│ ", Style::default().fg(self.theme.colors.text_dim)));
            }
            spans.push(Span::styled(*key, self.theme.key_highlight()));
            spans.push(Span::styled(format!(" {} ", desc), self.theme.key_hint()));
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Result Screen Widget
// ══════════════════════════════════════════════════════════════════════════

pub struct ResultScreen<'a> {
    summary: &'a ScoreSummary,
    stars: u32,
    unit_name: &'a str,
    theme: &'a Theme,
}

impl<'a> ResultScreen<'a> {
    pub fn new(summary: &'a ScoreSummary, stars: u32, unit_name: &'a str, theme: &'a Theme) -> Self {
        Self { summary, stars, unit_name, theme }
    }

    fn cheer(&self) -> &'static str {
        match self.stars {
            3 => "Excellent!",
            2 => "Great job!",
            1 => "Good effort!",
            _ => "Keep practicing!",
        }
    }
}

impl Widget for ResultScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.theme.colors.correct))
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled("QUIZ COMPLETE", self.theme.correct()),
                Span::raw(" "),
            ]))
            .title_alignment(Alignment::Center);

        let inner = block.inner(area);
        block.render(area, buf);

        let chunks = Layout::vertical([
            Constraint::Length(8),   // Score
            Constraint::Min(3),      // Wrong words
        ])
        .split(inner);

        let mut stars_line = star_spans(self.stars, 3, self.theme);
        stars_line.insert(0, Span::raw("  "));

        let score = vec![
            Line::from(Span::styled(self.unit_name, self.theme.title())),
            Line::from(""),
            Line::from(Span::styled(self.cheer(), self.theme.correct())),
            Line::from(vec![
                Span::styled(
                    format!("{}%", self.summary.percentage),
                    Style::default().fg(self.theme.colors.primary).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({} / {} correct)", self.summary.correct, self.summary.total),
                    Style::default().fg(self.theme.colors.text_muted),
                ),
            ]),
            Line::from(""),
            Line::from(stars_line),
        ];
        Paragraph::new(score)
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let width = chunks[1].width.saturating_sub(4).max(10) as usize;
        let mut review = Vec::new();
        if self.summary.wrong_words.is_empty() {
            review.push(Line::from(Span::styled("No mistakes!", self.theme.correct())));
        } else {
            review.push(Line::from(Span::styled(
                "Words to review:",
                Style::default().fg(self.theme.colors.notice),
            )));
            for word in &self.summary.wrong_words {
                let entry = format!("{}  {}", word.english, word.chinese);
                for piece in textwrap::wrap(&entry, width) {
                    review.push(Line::from(Span::styled(
                        piece.into_owned(),
                        Style::default().fg(self.theme.colors.text),
                    )));
                }
            }
        }
        Paragraph::new(review)
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuestionKind;

    fn buffer_text(buf: &Buffer) -> String {
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_star_spans() {
        let theme = Theme::default();
        let spans = star_spans(2, 3, &theme);
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "★ ★ ☆ ");
    }

    #[test]
    fn test_answer_options_render_all_choices() {
        let theme = Theme::default();
        let question = TestQuestion {
            kind: QuestionKind::ListenAndChoose,
            word: Word::new("ground", "地面"),
            options: vec!["met".into(), "ground".into(), "above".into(), "those".into()],
            correct_answer: "ground".into(),
        };
        let area = Rect::new(0, 0, 40, 10);
        let mut buf = Buffer::empty(area);
        AnswerOptions::new(&question, 0, None, &theme).render(area, &mut buf);

        let text = buffer_text(&buf);
        for option in &question.options {
            assert!(text.contains(option.as_str()), "missing {}", option);
        }
    }

    #[test]
    fn test_result_screen_lists_wrong_words() {
        let theme = Theme::default();
        let summary = ScoreSummary {
            correct: 1,
            total: 2,
            percentage: 50,
            wrong_words: vec![Word::new("hurry", "chase")],
        };
        let area = Rect::new(0, 0, 50, 16);
        let mut buf = Buffer::empty(area);
        ResultScreen::new(&summary, 1, "Unit 1", &theme).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("50%"));
        assert!(text.contains("hurry  chase"));
    }
}
