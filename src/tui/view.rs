use super::app::App;
use crate::lab::{Entry, EntryKind, Tone, ValidationState};
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

const PROMPT: &str = "$ ";

impl App {
    pub(super) fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(6),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);

        self.draw_header(frame, layout[0]);
        self.draw_main(frame, layout[1]);
        self.draw_input(frame, layout[2]);
        self.draw_footer(frame, layout[3]);

        if self.editor.is_some() {
            self.draw_editor(frame, area);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let scenario = self.console.scenario();
        let progress = self.console.progress();
        let chip = format!(" {} of {} tasks complete ", progress.complete, progress.total);
        let chip_style = if progress.complete == progress.total {
            Style::default().fg(Color::Black).bg(Color::Green)
        } else {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        };
        let mut title = vec![
            Span::styled(
                scenario.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(chip, chip_style),
        ];
        if let Some((label, style)) = validation_badge(self.console.validation()) {
            title.push(Span::raw(" "));
            title.push(Span::styled(label, style));
        }
        let lines = vec![
            Line::from(title),
            Line::from(Span::styled(
                scenario.description.clone(),
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn draw_main(&mut self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);

        let scenario = self.console.scenario();
        let steps = scenario.intro_steps.len() + scenario.walkthrough_steps.len();
        let briefing_height = if steps == 0 {
            0
        } else {
            let extra = usize::from(!scenario.walkthrough_steps.is_empty());
            u16::try_from(steps + extra + 2).unwrap_or(u16::MAX).min(area.height / 3)
        };
        let resources_height = u16::try_from(scenario.resources.len() * 2 + 2)
            .unwrap_or(u16::MAX)
            .min(area.height / 2);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(briefing_height), Constraint::Min(3)])
            .split(columns[0]);
        self.draw_briefing(frame, left[0]);
        self.draw_transcript(frame, left[1]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(resources_height)])
            .split(columns[1]);
        self.draw_checklist(frame, right[0]);
        self.draw_resources(frame, right[1]);
    }

    fn draw_briefing(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        let scenario = self.console.scenario();
        let mut lines = numbered(&scenario.intro_steps);
        if !scenario.walkthrough_steps.is_empty() {
            lines.push(Line::from(Span::styled(
                "Walkthrough",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.extend(numbered(&scenario.walkthrough_steps));
        }
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Briefing"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_transcript(&mut self, frame: &mut Frame, area: Rect) {
        let latest = self.console.transcript().latest().map(|entry| entry.id);
        if latest != self.followed {
            self.followed = latest;
            self.scroll_back = 0;
        }
        let width = usize::from(area.width.saturating_sub(2)).max(1);
        let height = usize::from(area.height.saturating_sub(2));
        let lines = self
            .console
            .transcript()
            .entries()
            .iter()
            .flat_map(|entry| entry_lines(entry, width))
            .collect::<Vec<_>>();
        let max_back = lines.len().saturating_sub(height);
        self.scroll_back = self.scroll_back.min(max_back);
        let start = max_back - self.scroll_back;
        let visible = lines.into_iter().skip(start).take(height).collect::<Vec<_>>();
        let title = if self.scroll_back > 0 {
            format!("Terminal (scrolled back {} lines)", self.scroll_back)
        } else {
            "Terminal".to_string()
        };
        let paragraph =
            Paragraph::new(visible).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
    }

    fn draw_checklist(&self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();
        for status in self.console.statuses() {
            let (label, style) = if status.complete {
                ("Complete", Style::default().fg(Color::Green))
            } else {
                ("Pending", Style::default().fg(Color::Yellow))
            };
            lines.push(Line::from(vec![
                Span::styled(format!("[{label}] "), style),
                Span::styled(
                    status.task.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(Span::raw(status.task.description.clone())));
            if !status.complete {
                if let Some(hint) = status.task.hint.as_deref() {
                    lines.push(Line::from(Span::styled(
                        format!("Hint: {hint}"),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
            lines.push(Line::default());
        }
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Checklist"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_resources(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        let lines = self
            .console
            .scenario()
            .resources
            .iter()
            .flat_map(|resource| {
                [
                    Line::from(Span::styled(
                        resource.label.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        resource.href.clone(),
                        Style::default().fg(Color::Cyan),
                    )),
                ]
            })
            .collect::<Vec<_>>();
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Resources"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_input(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(PROMPT, Style::default().fg(Color::Green)),
            Span::raw(self.input.text().to_string()),
        ]);
        let paragraph =
            Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Command"));
        frame.render_widget(paragraph, area);
        if self.editor.is_none() {
            let offset = u16::try_from(PROMPT.len() + self.input.cursor()).unwrap_or(u16::MAX);
            let x = area.x.saturating_add(1).saturating_add(offset);
            frame.set_cursor_position(Position::new(
                x.min(area.right().saturating_sub(2)),
                area.y + 1,
            ));
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let text = if self.editor.is_some() {
            "Ctrl-S save · Esc cancel · Tab indent · Ctrl-C quit"
        } else {
            "Enter run · Up/Down history · PgUp/PgDn scroll · F2 validate · Ctrl-C quit"
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(Color::DarkGray),
        )));
        frame.render_widget(paragraph, area);
    }

    fn draw_editor(&self, frame: &mut Frame, area: Rect) {
        let (Some(buffer), Some(session)) = (self.editor.as_ref(), self.console.editor()) else {
            return;
        };
        let popup = centered_rect(80, 80, area);
        frame.render_widget(Clear, popup);

        let inner_height = usize::from(popup.height.saturating_sub(2));
        let (line, col) = buffer.line_col();
        let top = (line + 1).saturating_sub(inner_height);
        let text = buffer
            .text()
            .split('\n')
            .skip(top)
            .take(inner_height)
            .map(|row| Line::from(row.to_string()))
            .collect::<Vec<_>>();
        let label = self
            .console
            .files()
            .meta(&session.path)
            .and_then(|meta| meta.label.clone())
            .unwrap_or_else(|| session.path.clone());
        let title = format!("Editing {} ({label})", session.path);
        let paragraph =
            Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, popup);
        if inner_height == 0 {
            return;
        }

        let x = popup
            .x
            .saturating_add(1)
            .saturating_add(u16::try_from(col).unwrap_or(u16::MAX))
            .min(popup.right().saturating_sub(2));
        let y = popup
            .y
            .saturating_add(1)
            .saturating_add(u16::try_from(line.saturating_sub(top)).unwrap_or(u16::MAX))
            .min(popup.bottom().saturating_sub(2));
        frame.set_cursor_position(Position::new(x, y));
    }
}

fn validation_badge(state: ValidationState) -> Option<(&'static str, Style)> {
    match state {
        ValidationState::Unvalidated => None,
        ValidationState::Success => Some((
            " Validated ",
            Style::default().fg(Color::Black).bg(Color::Green),
        )),
        ValidationState::Failure => Some((
            " Needs work ",
            Style::default().fg(Color::Black).bg(Color::Red),
        )),
    }
}

fn numbered(steps: &[String]) -> Vec<Line<'static>> {
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| Line::from(format!("{}. {step}", index + 1)))
        .collect()
}

fn entry_style(entry: &Entry) -> Style {
    let style = match entry.tone {
        Tone::Default => Style::default(),
        Tone::Success => Style::default().fg(Color::Green),
        Tone::Warning => Style::default().fg(Color::Yellow),
        Tone::Danger => Style::default().fg(Color::Red),
    };
    match entry.kind {
        EntryKind::Command => style.fg(Color::Cyan).add_modifier(Modifier::BOLD),
        EntryKind::System => style.add_modifier(Modifier::ITALIC),
        EntryKind::Output => style,
    }
}

fn entry_lines(entry: &Entry, width: usize) -> Vec<Line<'static>> {
    let style = entry_style(entry);
    wrap_text(&entry.text, width)
        .into_iter()
        .map(|text| Line::from(Span::styled(text, style)))
        .collect()
}

/// Hard-wrap each line of `text` at `width` chars so scroll offsets can be
/// computed exactly.
pub(super) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for line in text.split('\n') {
        let chars = line.chars().collect::<Vec<_>>();
        if chars.is_empty() {
            out.push(String::new());
            continue;
        }
        out.extend(chars.chunks(width).map(|chunk| chunk.iter().collect::<String>()));
    }
    out
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
