use std::time::Instant;

use ratatui::style::Style;
use ratatui::widgets::TableState;
use tracing::{error, info, warn};

use taskdeck_api::{ApiClient, ChatRequest};
use taskdeck_core::filter::{FilterState, SortState};
use taskdeck_core::model::{Tag, Task, TaskStats};
use taskdeck_core::projection::project;
use taskdeck_core::query;
use taskdeck_core::{AppConfig, Session, TaskStore};

use super::buffer::TextBuffer;
use super::chat::ChatPanel;
use super::constants::*;
use super::filters::FilterOverlay;
use super::form::TaskForm;
use super::theme::Palette;

mod input;
mod render;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Search,
    Form,
    FilterPicker,
    ConfirmDelete,
    Chat,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmChoice {
    Yes,
    No,
}

impl ConfirmChoice {
    fn toggle(self) -> Self {
        match self {
            ConfirmChoice::Yes => ConfirmChoice::No,
            ConfirmChoice::No => ConfirmChoice::Yes,
        }
    }
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    kind: StatusKind,
    created_at: Instant,
}

impl StatusMessage {
    fn new<T: Into<String>>(text: T, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    fn style(&self, palette: &Palette) -> Style {
        match self.kind {
            StatusKind::Info => Style::default().fg(palette.accent),
            StatusKind::Error => Style::default().fg(palette.danger),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusKind {
    Info,
    Error,
}

pub(crate) struct App {
    config: AppConfig,
    client: ApiClient,
    session: Session,
    store: TaskStore,
    tags: Vec<Tag>,
    stats: Option<TaskStats>,
    filters: FilterState,
    sort: SortState,
    visible: Vec<Task>,
    selected: usize,
    table_state: TableState,
    input_mode: InputMode,
    search_input: TextBuffer,
    search_before: String,
    form: Option<TaskForm>,
    filter_overlay: Option<FilterOverlay>,
    confirm_choice: ConfirmChoice,
    pending_delete: Option<i64>,
    chat: ChatPanel,
    status: Option<StatusMessage>,
    fatal: Option<String>,
    palette: Palette,
    should_quit: bool,
}

impl App {
    pub(crate) fn new(
        config: AppConfig,
        client: ApiClient,
        session: Session,
        initial_query: Option<&str>,
    ) -> Self {
        let (filters, sort) = initial_query.map(query::decode).unwrap_or_default();
        let palette = Palette::for_preference(session.theme);
        Self {
            config,
            client,
            session,
            store: TaskStore::new(),
            tags: Vec::new(),
            stats: None,
            filters,
            sort,
            visible: Vec::new(),
            selected: 0,
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            search_input: TextBuffer::new(),
            search_before: String::new(),
            form: None,
            filter_overlay: None,
            confirm_choice: ConfirmChoice::No,
            pending_delete: None,
            chat: ChatPanel::new(),
            status: None,
            fatal: None,
            palette,
            should_quit: false,
        }
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub(crate) fn on_tick(&mut self) {
        if let Some(status) = &self.status {
            if status.created_at.elapsed() >= STATUS_TTL {
                self.status = None;
            }
        }
    }

    fn set_status_info<T: Into<String>>(&mut self, text: T) {
        self.status = Some(StatusMessage::new(text, StatusKind::Info));
    }

    fn set_status_error<T: Into<String>>(&mut self, text: T) {
        self.status = Some(StatusMessage::new(text, StatusKind::Error));
    }

    /// The sharable encoding of the current view, without the leading '?'.
    fn query_string(&self) -> String {
        query::encode(&self.filters, &self.sort)
    }

    /// Recompute the visible projection and keep the selection in range.
    fn reproject(&mut self) {
        self.visible = project(self.store.tasks(), &self.filters, &self.sort);
        if self.visible.is_empty() {
            self.selected = 0;
            self.table_state.select(None);
        } else {
            if self.selected >= self.visible.len() {
                self.selected = self.visible.len() - 1;
            }
            self.table_state.select(Some(self.selected));
        }
    }

    fn selected_task(&self) -> Option<&Task> {
        self.visible.get(self.selected)
    }

    // ---- server round-trips --------------------------------------------

    /// First load. A failure here is fatal: there is nothing to render
    /// without the collection, so the error screen takes over until a
    /// retry succeeds.
    pub(crate) async fn load_initial(&mut self) {
        match self.client.list_tasks().await {
            Ok(tasks) => {
                self.fatal = None;
                self.store.replace_all(tasks);
                self.reproject();
            }
            Err(err) => {
                error!(%err, "initial task fetch failed");
                self.fatal = Some(err.to_string());
                return;
            }
        }
        self.refresh_tags().await;
        self.refresh_stats().await;
    }

    async fn refresh_tasks(&mut self) -> bool {
        match self.client.list_tasks().await {
            Ok(tasks) => {
                self.store.replace_all(tasks);
                self.reproject();
                true
            }
            Err(err) => {
                warn!(%err, "task refresh failed");
                self.set_status_error(format!("Refresh failed: {err}"));
                false
            }
        }
    }

    /// Stats are decoration; a failed refresh keeps the last good value.
    async fn refresh_stats(&mut self) {
        match self.client.task_stats().await {
            Ok(stats) => self.stats = Some(stats),
            Err(err) => warn!(%err, "stats refresh failed"),
        }
    }

    async fn refresh_tags(&mut self) {
        match self.client.list_tags().await {
            Ok(tags) => self.tags = tags,
            Err(err) => warn!(%err, "tag refresh failed"),
        }
    }

    async fn refresh_all(&mut self) {
        if self.refresh_tasks().await {
            self.refresh_tags().await;
            self.refresh_stats().await;
            self.set_status_info(STATUS_REFRESHED);
        }
    }

    /// Submit the open form. Create and edit both wait for the server;
    /// the collection only changes once the saved task comes back. A
    /// rejected save keeps the form open with the error inline.
    async fn submit_form(&mut self) {
        let (draft, editing) = match &self.form {
            Some(form) => (form.draft(), form.editing),
            None => return,
        };
        let payload = match draft.validate() {
            Ok(payload) => payload,
            Err(err) => {
                if let Some(form) = self.form.as_mut() {
                    form.error = Some(err.to_string());
                }
                return;
            }
        };

        let result = match editing {
            Some(id) => self.client.update_task(id, &payload).await,
            None => self.client.create_task(&payload).await,
        };
        match result {
            Ok(task) => {
                let title = task.title.clone();
                match editing {
                    Some(_) => {
                        self.store.apply_update(task);
                        self.set_status_info(format!("Saved \"{title}\""));
                    }
                    None => {
                        self.store.insert_created(task);
                        self.set_status_info(format!("Created \"{title}\""));
                    }
                }
                self.form = None;
                self.input_mode = InputMode::Normal;
                self.reproject();
                self.refresh_stats().await;
            }
            Err(err) => {
                warn!(%err, "task save failed");
                if let Some(form) = self.form.as_mut() {
                    form.error = Some(err.to_string());
                }
            }
        }
    }

    /// Delete waits for the server too; the row disappears only after a
    /// 204. Failures are logged and shown without touching the list.
    async fn confirm_delete(&mut self) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        self.input_mode = InputMode::Normal;
        match self.client.delete_task(id).await {
            Ok(()) => {
                self.store.remove(id);
                self.reproject();
                self.refresh_stats().await;
                self.set_status_info("Task deleted");
            }
            Err(err) => {
                warn!(id, %err, "delete failed");
                self.set_status_error(format!("Delete failed: {err}"));
            }
        }
    }

    /// Completion toggle is the one optimistic mutation: flip locally,
    /// then reconcile with the server's copy on success or put back the
    /// saved snapshot of that entry on failure. Only the toggled entry is
    /// ever rolled back, so edits to other tasks that land in between
    /// survive.
    async fn toggle_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let id = task.id;
        let Some(undo) = self.store.toggle(id) else {
            return;
        };
        self.reproject();

        match self.client.toggle_status(id).await {
            Ok(confirmed) => {
                self.store.apply_update(confirmed);
                self.reproject();
                self.refresh_stats().await;
            }
            Err(err) => {
                warn!(id, %err, "toggle failed, rolling back");
                self.store.undo(undo);
                self.reproject();
                self.set_status_error(format!("Toggle failed: {err}"));
            }
        }
    }

    /// Chat send. The user line is already on screen when the request
    /// goes out; `task_updated` means the assistant changed tasks
    /// server-side, so the collection and stats are refetched.
    async fn send_chat(&mut self) {
        let Some(message) = self.chat.begin_send() else {
            return;
        };
        let request = ChatRequest::new(message.clone(), self.session.conversation_id.clone());
        match self.client.send_chat(&request).await {
            Ok(response) => {
                self.session.conversation_id = Some(response.conversation_id.clone());
                if let Err(err) = self.session.save(&self.config.session_path()) {
                    warn!(%err, "failed to persist session");
                }
                let task_updated = response.task_updated;
                self.chat.complete(&response);
                if task_updated {
                    info!("assistant updated tasks, refetching");
                    self.refresh_tasks().await;
                    self.refresh_stats().await;
                }
            }
            Err(err) => {
                warn!(%err, "chat request failed");
                self.chat.fail(message, err.to_string());
            }
        }
    }

    // ---- local state transitions ---------------------------------------

    fn open_form_create(&mut self) {
        self.form = Some(TaskForm::create());
        self.input_mode = InputMode::Form;
        self.set_status_info(STATUS_FORM_CREATE);
    }

    fn open_form_edit(&mut self) {
        if let Some(task) = self.selected_task() {
            self.form = Some(TaskForm::edit(task));
            self.input_mode = InputMode::Form;
            self.set_status_info(STATUS_FORM_EDIT);
        }
    }

    fn open_filter_picker(&mut self) {
        self.filter_overlay = Some(FilterOverlay::new(&self.tags, &self.filters, &self.sort));
        self.input_mode = InputMode::FilterPicker;
        self.set_status_info(STATUS_FILTER_PICKER);
    }

    fn apply_filter_picker(&mut self) {
        if let Some(overlay) = self.filter_overlay.take() {
            let (filters, sort) = overlay.commit();
            self.filters = filters;
            self.sort = sort;
            self.reproject();
        }
        self.input_mode = InputMode::Normal;
        let encoded = self.query_string();
        if encoded.is_empty() {
            self.set_status_info("Filters cleared");
        } else {
            self.set_status_info(format!("View: ?{encoded}"));
        }
    }

    fn open_search(&mut self) {
        self.search_before = self.filters.search.clone();
        self.search_input.set(self.filters.search.clone());
        self.input_mode = InputMode::Search;
        self.set_status_info(STATUS_SEARCH);
    }

    fn sync_search(&mut self) {
        self.filters.search = self.search_input.as_str().to_string();
        self.reproject();
    }

    fn cancel_search(&mut self) {
        self.filters.search = std::mem::take(&mut self.search_before);
        self.search_input.clear();
        self.input_mode = InputMode::Normal;
        self.reproject();
    }

    fn request_delete(&mut self) {
        if let Some(task) = self.selected_task() {
            self.pending_delete = Some(task.id);
            self.confirm_choice = ConfirmChoice::No;
            self.input_mode = InputMode::ConfirmDelete;
            self.set_status_info(STATUS_CONFIRM_DELETE);
        }
    }

    fn open_chat(&mut self) {
        self.chat.open = true;
        self.input_mode = InputMode::Chat;
        self.set_status_info(STATUS_CHAT);
    }

    fn close_chat(&mut self) {
        self.chat.open = false;
        self.input_mode = InputMode::Normal;
    }

    fn toggle_theme(&mut self) {
        self.session.theme = self.session.theme.toggled();
        self.palette = Palette::for_preference(self.session.theme);
        if let Err(err) = self.session.save(&self.config.session_path()) {
            warn!(%err, "failed to persist session");
        }
        self.set_status_info(format!("Theme: {}", self.session.theme.label()));
    }

    fn select_next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.selected = (self.selected + 1) % self.visible.len();
        self.table_state.select(Some(self.selected));
    }

    fn select_prev(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.selected = if self.selected == 0 {
            self.visible.len() - 1
        } else {
            self.selected - 1
        };
        self.table_state.select(Some(self.selected));
    }

    fn select_first(&mut self) {
        if !self.visible.is_empty() {
            self.selected = 0;
            self.table_state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        if !self.visible.is_empty() {
            self.selected = self.visible.len() - 1;
            self.table_state.select(Some(self.selected));
        }
    }
}
