use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{App, ConfirmChoice, InputMode};
use crate::tui::constants::STATUS_HELP;

impl App {
    pub(crate) async fn on_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        if self.fatal.is_some() {
            self.handle_fatal(key).await;
            return Ok(());
        }

        match self.input_mode {
            InputMode::Normal => self.handle_normal(key).await,
            InputMode::Search => self.handle_search(key),
            InputMode::Form => self.handle_form(key).await,
            InputMode::FilterPicker => self.handle_filter_picker(key),
            InputMode::ConfirmDelete => self.handle_confirm_delete(key).await,
            InputMode::Chat => self.handle_chat(key).await,
            InputMode::Help => self.handle_help(key),
        }
        Ok(())
    }

    async fn handle_fatal(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('r') | KeyCode::Enter => self.load_initial().await,
            _ => {}
        }
    }

    async fn handle_normal(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('a') => self.open_form_create(),
            KeyCode::Char('e') | KeyCode::Enter => self.open_form_edit(),
            KeyCode::Char('d') | KeyCode::Char(' ') => self.toggle_selected().await,
            KeyCode::Char('x') | KeyCode::Delete => self.request_delete(),
            KeyCode::Char('/') => self.open_search(),
            KeyCode::Char('f') => self.open_filter_picker(),
            KeyCode::Char('r') => self.refresh_all().await,
            KeyCode::Char('c') => self.open_chat(),
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('h') | KeyCode::Char('?') => {
                self.input_mode = InputMode::Help;
                self.set_status_info(STATUS_HELP);
            }
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Home | KeyCode::Char('g') => self.select_first(),
            KeyCode::End | KeyCode::Char('G') => self.select_last(),
            _ => {}
        }
    }

    fn handle_search(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.cancel_search(),
            KeyCode::Enter => {
                self.search_before.clear();
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                self.search_input.backspace();
                self.sync_search();
            }
            KeyCode::Delete => {
                self.search_input.delete_char();
                self.sync_search();
            }
            KeyCode::Left => self.search_input.move_left(),
            KeyCode::Right => self.search_input.move_right(),
            KeyCode::Home => self.search_input.move_home(),
            KeyCode::End => self.search_input.move_end(),
            KeyCode::Char(ch) => {
                self.search_input.insert_char(ch);
                self.sync_search();
            }
            _ => {}
        }
    }

    async fn handle_form(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.form = None;
                self.input_mode = InputMode::Normal;
                self.status = None;
            }
            KeyCode::Enter => self.submit_form().await,
            KeyCode::Tab | KeyCode::Down => {
                if let Some(form) = self.form.as_mut() {
                    form.next_field();
                }
            }
            KeyCode::BackTab | KeyCode::Up => {
                if let Some(form) = self.form.as_mut() {
                    form.prev_field();
                }
            }
            _ => self.handle_form_field(key),
        }
    }

    fn handle_form_field(&mut self, key: KeyEvent) {
        use crate::tui::form::FormField;

        let catalog_len = self.tags.len();
        let tags = &self.tags;
        let Some(form) = self.form.as_mut() else {
            return;
        };

        match form.focus {
            FormField::Title | FormField::Description => {
                let Some(buffer) = form.focused_buffer() else {
                    return;
                };
                match key.code {
                    KeyCode::Backspace => buffer.backspace(),
                    KeyCode::Delete => buffer.delete_char(),
                    KeyCode::Left => buffer.move_left(),
                    KeyCode::Right => buffer.move_right(),
                    KeyCode::Home => buffer.move_home(),
                    KeyCode::End => buffer.move_end(),
                    KeyCode::Char(ch) => buffer.insert_char(ch),
                    _ => {}
                }
            }
            FormField::Priority => match key.code {
                KeyCode::Left => form.cycle_priority(false),
                KeyCode::Right | KeyCode::Char(' ') => form.cycle_priority(true),
                _ => {}
            },
            FormField::Tags => match key.code {
                KeyCode::Left => form.tag_cursor_prev(catalog_len),
                KeyCode::Right => form.tag_cursor_next(catalog_len),
                KeyCode::Char(' ') => form.toggle_tag_under_cursor(tags),
                _ => {}
            },
        }
    }

    fn handle_filter_picker(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.filter_overlay = None;
                self.input_mode = InputMode::Normal;
                self.status = None;
            }
            KeyCode::Enter => self.apply_filter_picker(),
            _ => {
                let Some(overlay) = self.filter_overlay.as_mut() else {
                    return;
                };
                match key.code {
                    KeyCode::Left => overlay.prev_column(),
                    KeyCode::Right | KeyCode::Tab => overlay.next_column(),
                    KeyCode::BackTab => overlay.prev_column(),
                    KeyCode::Up => overlay.prev_row(),
                    KeyCode::Down => overlay.next_row(),
                    KeyCode::Char(' ') => overlay.toggle_current(),
                    KeyCode::Char('c') | KeyCode::Char('C') => overlay.clear_all(),
                    _ => {}
                }
            }
        }
    }

    async fn handle_confirm_delete(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') => {
                self.pending_delete = None;
                self.input_mode = InputMode::Normal;
                self.status = None;
            }
            KeyCode::Char('y') => self.confirm_delete().await,
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                self.confirm_choice = self.confirm_choice.toggle();
            }
            KeyCode::Enter => {
                if self.confirm_choice == ConfirmChoice::Yes {
                    self.confirm_delete().await;
                } else {
                    self.pending_delete = None;
                    self.input_mode = InputMode::Normal;
                    self.status = None;
                }
            }
            _ => {}
        }
    }

    async fn handle_chat(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.close_chat(),
            KeyCode::Enter => self.send_chat().await,
            KeyCode::Backspace => self.chat.input.backspace(),
            KeyCode::Delete => self.chat.input.delete_char(),
            KeyCode::Left => self.chat.input.move_left(),
            KeyCode::Right => self.chat.input.move_right(),
            KeyCode::Home => self.chat.input.move_home(),
            KeyCode::End => self.chat.input.move_end(),
            KeyCode::Char(ch) => self.chat.input.insert_char(ch),
            _ => {}
        }
    }

    fn handle_help(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') | KeyCode::Char('h') => {
                self.input_mode = InputMode::Normal;
                self.status = None;
            }
            _ => {}
        }
    }
}
