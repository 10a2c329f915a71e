use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use taskdeck_core::model::Task;

use super::{App, ConfirmChoice, InputMode};
use crate::tui::chat::ChatRole;
use crate::tui::constants::APP_VERSION;
use crate::tui::filters::FilterColumn;
use crate::tui::form::FormField;
use crate::tui::helpers::{centered_rect, format_local, truncate};

impl App {
    pub(crate) fn draw(&mut self, f: &mut Frame) {
        if let Some(detail) = self.fatal.clone() {
            self.draw_fatal(f, &detail);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(f.size());

        self.draw_header(f, chunks[0]);
        self.draw_summary(f, chunks[1]);

        if self.chat.open {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[2]);
            self.draw_table(f, body[0]);
            self.draw_chat(f, body[1]);
        } else {
            self.draw_table(f, chunks[2]);
        }

        self.draw_footer(f, chunks[3]);

        match self.input_mode {
            InputMode::Form => self.draw_form(f),
            InputMode::FilterPicker => self.draw_filter_picker(f),
            InputMode::ConfirmDelete => self.draw_confirm(f),
            InputMode::Help => self.draw_help(f),
            _ => {}
        }
    }

    fn draw_header(&self, f: &mut Frame, area: Rect) {
        let total = self.store.len();
        let shown = self.visible.len();
        let line = Line::from(vec![
            Span::styled(
                format!(" taskdeck v{APP_VERSION} "),
                Style::default()
                    .fg(self.palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("• {} ", self.client.base_url()),
                Style::default().fg(self.palette.muted),
            ),
            Span::styled(
                format!("• {shown}/{total} tasks"),
                Style::default().fg(self.palette.text),
            ),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }

    fn draw_summary(&self, f: &mut Frame, area: Rect) {
        let mut spans = Vec::new();

        if let Some(stats) = &self.stats {
            spans.push(Span::styled(
                format!(
                    " {} done / {} open ({:.0}%) ",
                    stats.completed, stats.incomplete, stats.completion_percentage
                ),
                Style::default().fg(self.palette.success),
            ));
        }

        spans.push(Span::styled(
            format!("• sort: {} ", self.sort.label()),
            Style::default().fg(self.palette.muted),
        ));

        match self.filters.summary() {
            Some(summary) => spans.push(Span::styled(
                format!("• {summary}"),
                Style::default().fg(self.palette.info),
            )),
            None => spans.push(Span::styled(
                "• no filters",
                Style::default().fg(self.palette.muted),
            )),
        }

        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_table(&mut self, f: &mut Frame, area: Rect) {
        let header = Row::new(vec!["", "Pri", "Title", "Tags", "Created"]).style(
            Style::default()
                .fg(self.palette.muted)
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = self
            .visible
            .iter()
            .map(|task| self.task_row(task))
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Min(24),
                Constraint::Length(20),
                Constraint::Length(16),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.palette.border))
                .title(" Tasks "),
        )
        .highlight_style(
            Style::default()
                .bg(self.palette.highlight_bg)
                .add_modifier(Modifier::BOLD),
        );

        f.render_stateful_widget(table, area, &mut self.table_state);

        if self.visible.is_empty() {
            let message = if self.store.is_empty() {
                "No tasks yet. Press 'a' to add one or 'c' to ask the assistant."
            } else {
                "No tasks match the current filters. Press 'f' to adjust them."
            };
            let inner = centered_rect(70, 30, area);
            f.render_widget(
                Paragraph::new(message)
                    .style(Style::default().fg(self.palette.muted))
                    .wrap(Wrap { trim: true })
                    .alignment(ratatui::layout::Alignment::Center),
                inner,
            );
        }
    }

    fn task_row(&self, task: &Task) -> Row<'static> {
        let check = if task.completed { "✓" } else { " " };
        let title_style = if task.completed {
            Style::default()
                .fg(self.palette.muted)
                .add_modifier(Modifier::CROSSED_OUT)
        } else {
            Style::default().fg(self.palette.text)
        };
        let tags = task
            .tags
            .iter()
            .map(|tag| format!("#{}", tag.name))
            .collect::<Vec<_>>()
            .join(" ");

        Row::new(vec![
            Cell::from(check.to_string()).style(Style::default().fg(self.palette.success)),
            Cell::from(task.priority.as_str().to_string())
                .style(Style::default().fg(self.palette.priority(task.priority))),
            Cell::from(task.title.clone()).style(title_style),
            Cell::from(truncate(&tags, 18)).style(Style::default().fg(self.palette.info)),
            Cell::from(format_local(task.created_at))
                .style(Style::default().fg(self.palette.muted)),
        ])
    }

    fn draw_chat(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(area);

        let mut items: Vec<ListItem> = Vec::new();
        for message in &self.chat.messages {
            let (prefix, style) = match message.role {
                ChatRole::User => ("you", Style::default().fg(self.palette.accent)),
                ChatRole::Assistant => ("deck", Style::default().fg(self.palette.text)),
            };
            items.push(ListItem::new(Line::from(Span::styled(
                format!("{prefix} {}", format_local(message.timestamp)),
                Style::default().fg(self.palette.muted),
            ))));
            // Pre-wrap by hand; List items do not wrap on their own.
            let width = area.width.saturating_sub(2).max(8) as usize;
            for chunk in wrap_content(&message.content, width) {
                items.push(ListItem::new(Line::from(Span::styled(chunk, style))));
            }
        }
        if self.chat.sending {
            items.push(ListItem::new(Span::styled(
                "… thinking",
                Style::default()
                    .fg(self.palette.muted)
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.palette.border))
                .title(" Assistant "),
        );
        f.render_widget(list, chunks[0]);

        let focused = self.input_mode == InputMode::Chat;
        let border = if focused {
            Style::default().fg(self.palette.accent)
        } else {
            Style::default().fg(self.palette.border)
        };
        let input = Paragraph::new(self.chat.input.as_str().to_string()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(" Message "),
        );
        f.render_widget(input, chunks[1]);

        if focused {
            let x = chunks[1].x + 1 + self.chat.input.cursor_col() as u16;
            let y = chunks[1].y + 1;
            f.set_cursor(x.min(chunks[1].right().saturating_sub(2)), y);
        }
    }

    fn draw_footer(&mut self, f: &mut Frame, area: Rect) {
        if self.input_mode == InputMode::Search {
            let line = Line::from(vec![
                Span::styled(" /", Style::default().fg(self.palette.accent)),
                Span::styled(
                    self.search_input.as_str().to_string(),
                    Style::default().fg(self.palette.text),
                ),
            ]);
            f.render_widget(Paragraph::new(line), area);
            let x = area.x + 2 + self.search_input.cursor_col() as u16;
            f.set_cursor(x.min(area.right().saturating_sub(1)), area.y);
            return;
        }

        let line = match &self.status {
            Some(status) => Line::from(Span::styled(
                format!(" {}", status.text),
                status.style(&self.palette),
            )),
            None => Line::from(Span::styled(
                " a add • e edit • d done • x delete • / search • f filters • c chat • t theme • h help • q quit",
                Style::default().fg(self.palette.muted),
            )),
        };
        f.render_widget(Paragraph::new(line), area);
    }

    fn draw_form(&self, f: &mut Frame) {
        let Some(form) = &self.form else {
            return;
        };
        let area = centered_rect(64, 72, f.size());
        f.render_widget(Clear, area);

        let title = if form.editing.is_some() {
            " Edit task "
        } else {
            " New task "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.palette.accent))
            .title(title);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(2),
                Constraint::Length(1),
            ])
            .split(inner);

        self.draw_form_text(f, chunks[0], "Title", &form.title, form.focus == FormField::Title);
        self.draw_form_text(
            f,
            chunks[1],
            "Description",
            &form.description,
            form.focus == FormField::Description,
        );

        let mut priority_spans = vec![Span::styled(
            "Priority: ",
            self.field_label_style(form.focus == FormField::Priority),
        )];
        for priority in taskdeck_core::model::Priority::ALL {
            let style = if priority == form.priority {
                Style::default()
                    .fg(self.palette.priority(priority))
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            } else {
                Style::default().fg(self.palette.muted)
            };
            priority_spans.push(Span::styled(format!(" {} ", priority.as_str()), style));
        }
        f.render_widget(Paragraph::new(Line::from(priority_spans)), chunks[2]);

        let mut tag_spans = vec![Span::styled(
            "Tags: ",
            self.field_label_style(form.focus == FormField::Tags),
        )];
        if self.tags.is_empty() {
            tag_spans.push(Span::styled(
                "(none defined)",
                Style::default().fg(self.palette.muted),
            ));
        }
        for (idx, tag) in self.tags.iter().enumerate() {
            let selected = form.tag_ids.contains(&tag.id);
            let mark = if selected { "◉" } else { "○" };
            let mut style = if selected {
                Style::default().fg(self.palette.info)
            } else {
                Style::default().fg(self.palette.muted)
            };
            if form.focus == FormField::Tags && idx == form.tag_cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            tag_spans.push(Span::styled(format!(" {mark} {} ", tag.name), style));
        }
        f.render_widget(
            Paragraph::new(Line::from(tag_spans)).wrap(Wrap { trim: true }),
            chunks[3],
        );

        if let Some(error) = &form.error {
            f.render_widget(
                Paragraph::new(Span::styled(
                    error.clone(),
                    Style::default().fg(self.palette.danger),
                )),
                chunks[4],
            );
        }
    }

    fn draw_form_text(
        &self,
        f: &mut Frame,
        area: Rect,
        label: &'static str,
        buffer: &crate::tui::buffer::TextBuffer,
        focused: bool,
    ) {
        let border = if focused {
            Style::default().fg(self.palette.accent)
        } else {
            Style::default().fg(self.palette.border)
        };
        let widget = Paragraph::new(buffer.as_str().to_string()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(label),
        );
        f.render_widget(widget, area);
        if focused {
            let x = area.x + 1 + buffer.cursor_col() as u16;
            f.set_cursor(x.min(area.right().saturating_sub(2)), area.y + 1);
        }
    }

    fn field_label_style(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.palette.muted)
        }
    }

    fn draw_filter_picker(&self, f: &mut Frame) {
        let Some(overlay) = &self.filter_overlay else {
            return;
        };
        let area = centered_rect(76, 64, f.size());
        f.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.palette.accent))
            .title(" Filters & sort ");
        let inner = block.inner(area);
        f.render_widget(block, area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ])
            .split(inner);

        for (idx, column) in FilterColumn::ALL.iter().enumerate() {
            let active = overlay.column == *column;
            let cursor = overlay.current_row();
            let items: Vec<ListItem> = overlay
                .rows(*column)
                .into_iter()
                .enumerate()
                .map(|(row, (label, selected))| {
                    let mark = if selected { "●" } else { " " };
                    let mut style = if selected {
                        Style::default().fg(self.palette.info)
                    } else {
                        Style::default().fg(self.palette.text)
                    };
                    if active && row == cursor {
                        style = style.bg(self.palette.highlight_bg);
                    }
                    ListItem::new(format!("{mark} {label}")).style(style)
                })
                .collect();

            let border = if active {
                Style::default().fg(self.palette.accent)
            } else {
                Style::default().fg(self.palette.border)
            };
            let list = List::new(items).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(column.title()),
            );
            f.render_widget(list, columns[idx]);
        }
    }

    fn draw_confirm(&self, f: &mut Frame) {
        let area = centered_rect(44, 24, f.size());
        f.render_widget(Clear, area);

        let title = self
            .pending_delete
            .and_then(|id| self.store.get(id))
            .map(|task| task.title.clone())
            .unwrap_or_default();

        let yes_style = if self.confirm_choice == ConfirmChoice::Yes {
            Style::default()
                .fg(self.palette.danger)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(self.palette.muted)
        };
        let no_style = if self.confirm_choice == ConfirmChoice::No {
            Style::default()
                .fg(self.palette.text)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(self.palette.muted)
        };

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("Delete \"{}\"?", truncate(&title, 34)),
                Style::default().fg(self.palette.text),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  [ Yes ]  ", yes_style),
                Span::styled("  [ No ]  ", no_style),
            ]),
        ];
        let widget = Paragraph::new(lines)
            .alignment(ratatui::layout::Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.palette.danger))
                    .title(" Confirm "),
            );
        f.render_widget(widget, area);
    }

    fn draw_help(&self, f: &mut Frame) {
        let area = centered_rect(60, 70, f.size());
        f.render_widget(Clear, area);

        let bindings = [
            ("j/k, ↑/↓", "move selection"),
            ("g / G", "first / last task"),
            ("a", "add a task"),
            ("e / Enter", "edit the selected task"),
            ("d / Space", "toggle done"),
            ("x / Del", "delete (with confirmation)"),
            ("/", "live search"),
            ("f", "filter & sort picker"),
            ("c", "assistant chat"),
            ("r", "refresh from server"),
            ("t", "toggle dark/light theme"),
            ("q", "quit"),
        ];
        let lines: Vec<Line> = bindings
            .iter()
            .map(|(keys, action)| {
                Line::from(vec![
                    Span::styled(
                        format!(" {keys:<12}"),
                        Style::default()
                            .fg(self.palette.accent)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(*action, Style::default().fg(self.palette.text)),
                ])
            })
            .collect();

        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.palette.border))
                .title(" Keys "),
        );
        f.render_widget(widget, area);
    }

    fn draw_fatal(&self, f: &mut Frame, detail: &str) {
        let area = centered_rect(60, 40, f.size());
        f.render_widget(Clear, area);

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Could not load tasks",
                Style::default()
                    .fg(self.palette.danger)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                detail.to_string(),
                Style::default().fg(self.palette.text),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "r retry  •  q quit",
                Style::default().fg(self.palette.muted),
            )),
        ];
        let widget = Paragraph::new(lines)
            .alignment(ratatui::layout::Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.palette.danger))
                    .title(" Error "),
            );
        f.render_widget(widget, area);
    }
}

/// Greedy word wrap on character count. Terminal cells and chars are not
/// identical but this is close enough for chat prose.
fn wrap_content(content: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw_line in content.lines() {
        let mut current = String::new();
        let mut current_len = 0usize;
        for word in raw_line.split_whitespace() {
            let word_len = word.chars().count();
            if current_len > 0 && current_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;
        }
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
