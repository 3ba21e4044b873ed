//! Application state management for the jamboree TUI.
//!
//! This module contains the `App` struct that owns every page, the lookups,
//! the scout gate and the channel background tasks report back on.

use std::path::PathBuf;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use jamboree_core::api::{ApiClient, ApiError};
use jamboree_core::auth::ScoutGate;
use jamboree_core::config::Config;
use jamboree_core::models::{
    active_categories, Category, FieldKind, FormFields, Group, Item, ItemDraft, ItemPatch, ItemStatus, Leader,
    LeaderDraft, LeaderPatch, Resource, Scout, ScoutDraft, ScoutPatch, ValidationError,
};
use jamboree_core::sync::{Dispatcher, MutationError, Page, RefreshOutcome, RefreshTicket, Store, UploadReport};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for any single-line text input.
const MAX_INPUT_LENGTH: usize = 128;

/// Number of rows to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Items,
    Leaders,
    Scouts,
    Summary,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Items => "Items",
            Tab::Leaders => "Leaders",
            Tab::Scouts => "Scouts",
            Tab::Summary => "Summary",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Items => Tab::Leaders,
            Tab::Leaders => Tab::Scouts,
            Tab::Scouts => Tab::Summary,
            Tab::Summary => Tab::Items,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Items => Tab::Summary,
            Tab::Leaders => Tab::Items,
            Tab::Scouts => Tab::Leaders,
            Tab::Summary => Tab::Scouts,
        }
    }
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    Form,
    ConfirmingDelete,
    Unlocking,
    ImportingCsv,
    ConfirmingQuit,
    Quitting,
}

// ============================================================================
// Form editing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// One keystroke's worth of form editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOp {
    Type(char),
    Backspace,
    Next,
    Prev,
    Cycle { forward: bool },
    Commit,
}

/// Cursor state of the create/edit overlay. The values themselves live in
/// the page's draft; `buffer` holds the focused field while it is typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub mode: FormMode,
    pub focus: usize,
    pub buffer: String,
    pub error: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self { mode: FormMode::Create, focus: 0, buffer: String::new(), error: None }
    }
}

impl FormState {
    pub fn open<F: FormFields>(mode: FormMode, target: &F) -> Self {
        Self { mode, focus: 0, buffer: target.value(0), error: None }
    }

    pub fn focused_kind<F: FormFields>(&self) -> Option<FieldKind> {
        F::fields().get(self.focus).map(|f| f.kind)
    }

    /// Apply `op` to `target`. Returns false when the focused value was
    /// rejected; the error is kept for display.
    pub fn apply<F: FormFields>(&mut self, op: FormOp, target: &mut F, groups: &[Group], categories: &[Category]) -> bool {
        let Some(kind) = self.focused_kind::<F>() else {
            return false;
        };
        let count = F::fields().len();

        match op {
            FormOp::Type(' ') if kind.is_choice() => {
                self.buffer = next_choice(kind, &self.buffer, groups, categories, true);
                self.commit(target)
            }
            FormOp::Type(c) if !kind.is_choice() => {
                if can_add_input_char(self.buffer.chars().count(), c) {
                    self.buffer.push(c);
                }
                true
            }
            FormOp::Backspace if !kind.is_choice() => {
                self.buffer.pop();
                true
            }
            FormOp::Cycle { forward } if kind.is_choice() => {
                self.buffer = next_choice(kind, &self.buffer, groups, categories, forward);
                self.commit(target)
            }
            FormOp::Next | FormOp::Prev => {
                if !self.commit(target) {
                    return false;
                }
                self.focus = if op == FormOp::Next {
                    (self.focus + 1) % count
                } else {
                    (self.focus + count - 1) % count
                };
                self.buffer = target.value(self.focus);
                true
            }
            FormOp::Commit => self.commit(target),
            _ => true,
        }
    }

    fn commit<F: FormFields>(&mut self, target: &mut F) -> bool {
        match target.set_value(self.focus, &self.buffer) {
            Ok(()) => {
                self.error = None;
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }
}

/// The choice after (or before) `current` for a choice field. Unknown
/// values move to the first choice.
pub fn next_choice(kind: FieldKind, current: &str, groups: &[Group], categories: &[Category], forward: bool) -> String {
    let choices: Vec<String> = match kind {
        FieldKind::Flag => vec!["no".to_string(), "yes".to_string()],
        FieldKind::Status => ItemStatus::CHOICES.iter().map(|s| s.as_str().to_string()).collect(),
        FieldKind::Group => groups.iter().map(|g| g.id.to_string()).collect(),
        FieldKind::Category => active_categories(categories).iter().map(|c| c.name.clone()).collect(),
        FieldKind::Text | FieldKind::Number => return current.to_string(),
    };
    let len = choices.len();
    if len == 0 {
        return current.to_string();
    }
    let next = match (choices.iter().position(|c| c == current), forward) {
        (None, _) => 0,
        (Some(pos), true) => (pos + 1) % len,
        (Some(pos), false) => (pos + len - 1) % len,
    };
    choices[next].clone()
}

/// What a submitted form turns into.
enum Submission<T: Resource> {
    Create(T::Draft),
    Update(i64, T::Patch),
}

fn prepare_submission<T: Resource>(page: &Page<T>, mode: FormMode) -> Result<Option<Submission<T>>, ValidationError> {
    match mode {
        FormMode::Create => {
            T::validate(&page.form)?;
            Ok(Some(Submission::Create(page.form.clone())))
        }
        FormMode::Edit => match page.edit_payload() {
            Some((id, patch)) => {
                T::validate_patch(&patch)?;
                Ok(Some(Submission::Update(id, patch)))
            }
            None => Ok(None),
        },
    }
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from spawned network tasks.
enum TaskResult {
    Items(RefreshTicket, Result<Vec<Item>, ApiError>),
    Leaders(RefreshTicket, Result<Vec<Leader>, ApiError>),
    Scouts(RefreshTicket, Result<Vec<Scout>, ApiError>),
    Groups(RefreshTicket, Result<Vec<Group>, ApiError>),
    Categories(RefreshTicket, Result<Vec<Category>, ApiError>),
    Created(Tab, Result<(), MutationError>),
    Updated(Tab, i64, Result<(), MutationError>),
    Deleted(i64, Result<(), MutationError>),
    Uploaded(Result<UploadReport, ApiError>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub gate: ScoutGate,
    pub base_url: String,
    dispatcher: Dispatcher<ApiClient>,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,

    // Pages and lookups
    pub items: Page<Item>,
    pub leaders: Page<Leader>,
    pub scouts: Page<Scout>,
    pub groups: Store<Group>,
    pub categories: Store<Category>,

    // Selection indices into the visible rows
    pub item_selection: usize,
    pub leader_selection: usize,
    pub scout_selection: usize,

    // Overlay inputs
    pub form: FormState,
    pub unlock_input: String,
    pub unlock_error: Option<String>,
    pub import_path: String,

    // Background task channel
    task_rx: Option<mpsc::Receiver<TaskResult>>,
    task_tx: mpsc::Sender<TaskResult>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        debug!(?cache_dir, "Cache directory configured");

        let mut gate = ScoutGate::new(config.scout_gate_hash.clone(), cache_dir);
        if let Err(e) = gate.load() {
            warn!(error = %e, "Failed to restore scout page unlock");
        }

        let base_url = config.resolved_base_url();
        let dispatcher = Dispatcher::new(ApiClient::new(&base_url)?);
        info!(%base_url, "Backend configured");

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            gate,
            base_url,
            dispatcher,

            state: AppState::Normal,
            current_tab: Tab::Items,

            items: Page::new(),
            leaders: Page::new(),
            scouts: Page::new(),
            groups: Store::new("groups"),
            categories: Store::new("categories"),

            item_selection: 0,
            leader_selection: 0,
            scout_selection: 0,

            form: FormState::default(),
            unlock_input: String::new(),
            unlock_error: None,
            import_path: String::new(),

            task_rx: Some(rx),
            task_tx: tx,

            status_message: None,
        })
    }

    // =========================================================================
    // Fetch-Refresh
    // =========================================================================

    /// Refresh every page the user may see
    pub fn refresh_all(&mut self) {
        self.refresh_lookups();
        self.refresh_items();
        self.refresh_leaders();
        if self.gate.is_open() {
            self.refresh_scouts();
        }
    }

    /// Refresh whatever the current tab shows
    pub fn refresh_current_tab(&mut self) {
        match self.current_tab {
            Tab::Items => {
                self.refresh_lookups();
                self.refresh_items();
            }
            Tab::Leaders => self.refresh_leaders(),
            Tab::Scouts if self.gate.is_open() => self.refresh_scouts(),
            Tab::Scouts => {}
            Tab::Summary => self.refresh_all(),
        }
    }

    pub fn refresh_lookups(&mut self) {
        let group_ticket = self.groups.begin_refresh();
        let category_ticket = self.categories.begin_refresh();
        let dispatcher = self.dispatcher.clone();
        let tx = self.task_tx.clone();

        tokio::spawn(async move {
            let (groups, categories) = dispatcher.fetch_lookups().await;
            Self::send_result(&tx, TaskResult::Groups(group_ticket, groups)).await;
            Self::send_result(&tx, TaskResult::Categories(category_ticket, categories)).await;
        });
    }

    pub fn refresh_items(&mut self) {
        let (ticket, query) = self.items.begin_refresh();
        self.spawn_fetch::<Item>(ticket, query, TaskResult::Items);
    }

    pub fn refresh_leaders(&mut self) {
        let (ticket, query) = self.leaders.begin_refresh();
        self.spawn_fetch::<Leader>(ticket, query, TaskResult::Leaders);
    }

    pub fn refresh_scouts(&mut self) {
        let (ticket, query) = self.scouts.begin_refresh();
        self.spawn_fetch::<Scout>(ticket, query, TaskResult::Scouts);
    }

    fn refresh_tab(&mut self, tab: Tab) {
        match tab {
            Tab::Items => self.refresh_items(),
            Tab::Leaders => self.refresh_leaders(),
            Tab::Scouts => self.refresh_scouts(),
            Tab::Summary => self.refresh_all(),
        }
    }

    fn spawn_fetch<T: Resource>(
        &self,
        ticket: RefreshTicket,
        query: T::Query,
        wrap: fn(RefreshTicket, Result<Vec<T>, ApiError>) -> TaskResult,
    ) {
        let dispatcher = self.dispatcher.clone();
        let tx = self.task_tx.clone();

        tokio::spawn(async move {
            let result = dispatcher.fetch::<T>(&query).await;
            Self::send_result(&tx, wrap(ticket, result)).await;
        });
    }

    /// Helper to send task results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<TaskResult>, result: TaskResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send task result - channel closed");
        }
    }

    // =========================================================================
    // Background results
    // =========================================================================

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        // Collect all pending results first to avoid borrow conflicts
        let results: Vec<TaskResult> = {
            if let Some(ref mut rx) = self.task_rx {
                let mut results = Vec::new();
                while let Ok(result) = rx.try_recv() {
                    results.push(result);
                }
                results
            } else {
                Vec::new()
            }
        };

        for result in results {
            self.process_task_result(result);
        }
    }

    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Items(ticket, rows) => {
                let outcome = self.items.apply_refresh(ticket, rows);
                self.note_refresh(Tab::Items, outcome);
            }
            TaskResult::Leaders(ticket, rows) => {
                let outcome = self.leaders.apply_refresh(ticket, rows);
                self.note_refresh(Tab::Leaders, outcome);
            }
            TaskResult::Scouts(ticket, rows) => {
                let outcome = self.scouts.apply_refresh(ticket, rows);
                self.note_refresh(Tab::Scouts, outcome);
            }
            TaskResult::Groups(ticket, rows) => {
                if let RefreshOutcome::Failed(e) = self.groups.apply(ticket, rows) {
                    self.status_message = Some(format!("Could not load groups: {}", e));
                }
            }
            TaskResult::Categories(ticket, rows) => {
                if let RefreshOutcome::Failed(e) = self.categories.apply(ticket, rows) {
                    self.status_message = Some(format!("Could not load categories: {}", e));
                }
            }
            TaskResult::Created(tab, result) => match result {
                Ok(()) => {
                    self.reset_form(tab);
                    self.status_message = Some(format!("Added to {}", tab.title()));
                    self.refresh_tab(tab);
                }
                Err(e) => {
                    warn!(tab = tab.title(), error = %e, "Create failed");
                    self.status_message = Some(format!("Save failed: {} (press n to resume)", e));
                }
            },
            TaskResult::Updated(tab, id, result) => match result {
                Ok(()) => {
                    self.finish_edit(tab, id);
                    self.status_message = Some("Changes saved".to_string());
                    self.refresh_tab(tab);
                }
                Err(e) => {
                    warn!(tab = tab.title(), id, error = %e, "Update failed");
                    self.status_message = Some(format!("Update failed: {} (press e to resume)", e));
                }
            },
            TaskResult::Deleted(id, result) => match result {
                Ok(()) => {
                    self.status_message = Some("Item deleted".to_string());
                    self.refresh_items();
                }
                Err(e) => {
                    warn!(id, error = %e, "Delete failed");
                    self.status_message = Some(format!("Delete failed: {}", e));
                }
            },
            TaskResult::Uploaded(result) => match result {
                Ok(report) => {
                    self.status_message = Some(report.message);
                    self.refresh_scouts();
                }
                Err(e) => {
                    warn!(error = %e, "CSV upload failed");
                    self.status_message = Some(format!("Upload failed: {}", e));
                }
            },
        }
    }

    fn note_refresh(&mut self, tab: Tab, outcome: RefreshOutcome) {
        match outcome {
            RefreshOutcome::Replaced(_) => {
                self.clamp_selection(tab);
                // The row being edited vanished under the overlay
                if self.state == AppState::Form
                    && self.form.mode == FormMode::Edit
                    && self.current_tab == tab
                    && !self.edit_active(tab)
                {
                    self.state = AppState::Normal;
                    self.status_message = Some("The row being edited no longer exists".to_string());
                }
            }
            RefreshOutcome::Superseded => {}
            RefreshOutcome::Failed(e) => {
                self.status_message = Some(format!("Could not load {}: {}", tab.title().to_lowercase(), e));
            }
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    pub fn visible_len(&self, tab: Tab) -> usize {
        match tab {
            Tab::Items => self.items.visible().len(),
            Tab::Leaders => self.leaders.visible().len(),
            Tab::Scouts => self.scouts.visible().len(),
            Tab::Summary => 0,
        }
    }

    fn selection_mut(&mut self, tab: Tab) -> Option<&mut usize> {
        match tab {
            Tab::Items => Some(&mut self.item_selection),
            Tab::Leaders => Some(&mut self.leader_selection),
            Tab::Scouts => Some(&mut self.scout_selection),
            Tab::Summary => None,
        }
    }

    /// Move the selection by `delta` rows, staying in bounds
    pub fn move_selection(&mut self, delta: isize) {
        let tab = self.current_tab;
        let len = self.visible_len(tab);
        if let Some(selection) = self.selection_mut(tab) {
            let max = len.saturating_sub(1);
            *selection = selection.saturating_add_signed(delta).min(max);
        }
    }

    pub fn select_first(&mut self) {
        if let Some(selection) = self.selection_mut(self.current_tab) {
            *selection = 0;
        }
    }

    pub fn select_last(&mut self) {
        let tab = self.current_tab;
        let last = self.visible_len(tab).saturating_sub(1);
        if let Some(selection) = self.selection_mut(tab) {
            *selection = last;
        }
    }

    fn clamp_selection(&mut self, tab: Tab) {
        let max = self.visible_len(tab).saturating_sub(1);
        if let Some(selection) = self.selection_mut(tab) {
            *selection = (*selection).min(max);
        }
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.items.visible().get(self.item_selection).copied()
    }

    pub fn selected_leader(&self) -> Option<&Leader> {
        self.leaders.visible().get(self.leader_selection).copied()
    }

    pub fn selected_scout(&self) -> Option<&Scout> {
        self.scouts.visible().get(self.scout_selection).copied()
    }

    // =========================================================================
    // Tabs and filters
    // =========================================================================

    pub fn switch_tab(&mut self, tab: Tab) {
        self.current_tab = tab;
        if tab == Tab::Scouts && !self.gate.is_open() {
            self.start_unlock();
        }
    }

    /// Search text of the current tab
    pub fn search_text(&self) -> &str {
        match self.current_tab {
            Tab::Items => &self.items.query.search,
            Tab::Leaders => &self.leaders.query.query,
            Tab::Scouts => &self.scouts.query.query,
            Tab::Summary => "",
        }
    }

    /// Replace the search text. Items refetch when the request changes;
    /// rosters filter in place.
    pub fn set_search_text(&mut self, text: String) {
        match self.current_tab {
            Tab::Items => {
                let mut query = self.items.query.clone();
                query.search = text;
                if self.items.set_query(query) {
                    self.refresh_items();
                }
            }
            Tab::Leaders => {
                let mut query = self.leaders.query.clone();
                query.query = text;
                self.leaders.set_query(query);
            }
            Tab::Scouts => {
                let mut query = self.scouts.query.clone();
                query.query = text;
                self.scouts.set_query(query);
            }
            Tab::Summary => return,
        }
        self.select_first();
    }

    pub fn cycle_status_filter(&mut self) {
        let mut query = self.items.query.clone();
        query.status = query.status.next();
        if self.items.set_query(query) {
            self.refresh_items();
        }
        self.item_selection = 0;
    }

    pub fn cycle_group_filter(&mut self) {
        let groups = self.groups.rows();
        match self.current_tab {
            Tab::Leaders => {
                let mut query = self.leaders.query.clone();
                query.group = query.group.next(groups);
                self.leaders.set_query(query);
            }
            Tab::Scouts => {
                let mut query = self.scouts.query.clone();
                query.group = query.group.next(groups);
                self.scouts.set_query(query);
            }
            Tab::Items | Tab::Summary => return,
        }
        self.select_first();
    }

    // =========================================================================
    // Create / edit forms
    // =========================================================================

    /// Open the create form for the current tab. A draft left over from an
    /// earlier attempt is kept.
    pub fn open_create_form(&mut self) {
        self.form = match self.current_tab {
            Tab::Items => FormState::open(FormMode::Create, &self.items.form),
            Tab::Leaders => FormState::open(FormMode::Create, &self.leaders.form),
            Tab::Scouts => FormState::open(FormMode::Create, &self.scouts.form),
            Tab::Summary => return,
        };
        self.state = AppState::Form;
    }

    /// Open the inline editor on the selected row, resuming an unsaved
    /// session for the same row.
    pub fn open_edit_form(&mut self) {
        let form = match self.current_tab {
            Tab::Items => {
                let Some(row) = self.selected_item().cloned() else { return };
                open_edit(&mut self.items, &row)
            }
            Tab::Leaders => {
                let Some(row) = self.selected_leader().cloned() else { return };
                open_edit(&mut self.leaders, &row)
            }
            Tab::Scouts => {
                let Some(row) = self.selected_scout().cloned() else { return };
                open_edit(&mut self.scouts, &row)
            }
            Tab::Summary => None,
        };
        if let Some(form) = form {
            self.form = form;
            self.state = AppState::Form;
        }
    }

    /// Feed one editing operation to the open form
    pub fn form_op(&mut self, op: FormOp) -> bool {
        let groups = self.groups.rows();
        let categories = self.categories.rows();
        let form = &mut self.form;

        match (self.current_tab, form.mode) {
            (Tab::Items, FormMode::Create) => form.apply(op, &mut self.items.form, groups, categories),
            (Tab::Leaders, FormMode::Create) => form.apply(op, &mut self.leaders.form, groups, categories),
            (Tab::Scouts, FormMode::Create) => form.apply(op, &mut self.scouts.form, groups, categories),
            (Tab::Items, FormMode::Edit) => match self.items.edit.draft_mut() {
                Some(draft) => form.apply(op, draft, groups, categories),
                None => false,
            },
            (Tab::Leaders, FormMode::Edit) => match self.leaders.edit.draft_mut() {
                Some(draft) => form.apply(op, draft, groups, categories),
                None => false,
            },
            (Tab::Scouts, FormMode::Edit) => match self.scouts.edit.draft_mut() {
                Some(draft) => form.apply(op, draft, groups, categories),
                None => false,
            },
            (Tab::Summary, _) => false,
        }
    }

    /// Kind of the focused field, for key handling
    pub fn focused_field_kind(&self) -> Option<FieldKind> {
        match (self.current_tab, self.form.mode) {
            (Tab::Items, FormMode::Create) => self.form.focused_kind::<ItemDraft>(),
            (Tab::Items, FormMode::Edit) => self.form.focused_kind::<ItemPatch>(),
            (Tab::Leaders, FormMode::Create) => self.form.focused_kind::<LeaderDraft>(),
            (Tab::Leaders, FormMode::Edit) => self.form.focused_kind::<LeaderPatch>(),
            (Tab::Scouts, FormMode::Create) => self.form.focused_kind::<ScoutDraft>(),
            (Tab::Scouts, FormMode::Edit) => self.form.focused_kind::<ScoutPatch>(),
            (Tab::Summary, _) => None,
        }
    }

    /// Validate and send the open form. The overlay closes once the request
    /// is on its way; the draft stays until the backend accepts it.
    pub fn submit_form(&mut self) {
        if !self.form_op(FormOp::Commit) {
            return;
        }
        let tab = self.current_tab;
        let mode = self.form.mode;
        match tab {
            Tab::Items => {
                let submission = prepare_submission(&self.items, mode);
                self.send_submission::<Item>(tab, submission);
            }
            Tab::Leaders => {
                let submission = prepare_submission(&self.leaders, mode);
                self.send_submission::<Leader>(tab, submission);
            }
            Tab::Scouts => {
                let submission = prepare_submission(&self.scouts, mode);
                self.send_submission::<Scout>(tab, submission);
            }
            Tab::Summary => {}
        }
    }

    fn send_submission<T: Resource>(&mut self, tab: Tab, submission: Result<Option<Submission<T>>, ValidationError>) {
        let submission = match submission {
            Ok(Some(submission)) => submission,
            Ok(None) => {
                self.state = AppState::Normal;
                return;
            }
            Err(e) => {
                self.form.error = Some(e.to_string());
                return;
            }
        };

        let dispatcher = self.dispatcher.clone();
        let tx = self.task_tx.clone();
        match submission {
            Submission::Create(draft) => {
                tokio::spawn(async move {
                    let result = dispatcher.create::<T>(&draft).await.map(|_| ());
                    Self::send_result(&tx, TaskResult::Created(tab, result)).await;
                });
            }
            Submission::Update(id, patch) => {
                tokio::spawn(async move {
                    let result = dispatcher.update::<T>(id, &patch).await;
                    Self::send_result(&tx, TaskResult::Updated(tab, id, result)).await;
                });
            }
        }
        self.state = AppState::Normal;
        self.status_message = Some("Saving...".to_string());
    }

    /// Close the overlay. An edit is discarded; a create draft is kept.
    pub fn cancel_form(&mut self) {
        if self.form.mode == FormMode::Edit {
            match self.current_tab {
                Tab::Items => self.items.edit.cancel(),
                Tab::Leaders => self.leaders.edit.cancel(),
                Tab::Scouts => self.scouts.edit.cancel(),
                Tab::Summary => {}
            }
        }
        self.state = AppState::Normal;
    }

    fn reset_form(&mut self, tab: Tab) {
        match tab {
            Tab::Items => self.items.reset_form(),
            Tab::Leaders => self.leaders.reset_form(),
            Tab::Scouts => self.scouts.reset_form(),
            Tab::Summary => {}
        }
    }

    fn finish_edit(&mut self, tab: Tab, id: i64) {
        match tab {
            Tab::Items => self.items.finish_edit(id),
            Tab::Leaders => self.leaders.finish_edit(id),
            Tab::Scouts => self.scouts.finish_edit(id),
            Tab::Summary => {}
        }
    }

    fn edit_active(&self, tab: Tab) -> bool {
        match tab {
            Tab::Items => self.items.edit.is_active(),
            Tab::Leaders => self.leaders.edit.is_active(),
            Tab::Scouts => self.scouts.edit.is_active(),
            Tab::Summary => false,
        }
    }

    // =========================================================================
    // Delete
    // =========================================================================

    /// Ask for confirmation before deleting the selected item
    pub fn request_delete(&mut self) {
        if self.current_tab != Tab::Items {
            return;
        }
        if let Some(id) = self.selected_item().map(|i| i.id) {
            self.items.request_delete(id);
            self.state = AppState::ConfirmingDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        self.state = AppState::Normal;
        let Some(confirmed) = self.items.confirm_delete() else {
            return;
        };
        let id = confirmed.id();
        let dispatcher = self.dispatcher.clone();
        let tx = self.task_tx.clone();

        tokio::spawn(async move {
            let result = dispatcher.delete(confirmed).await;
            Self::send_result(&tx, TaskResult::Deleted(id, result)).await;
        });
        self.status_message = Some("Deleting...".to_string());
    }

    pub fn cancel_delete(&mut self) {
        self.items.cancel_delete();
        self.state = AppState::Normal;
    }

    // =========================================================================
    // Scout gate and CSV import
    // =========================================================================

    pub fn start_unlock(&mut self) {
        self.unlock_input.clear();
        self.unlock_error = None;
        self.state = AppState::Unlocking;
    }

    pub fn attempt_unlock(&mut self) {
        let password = std::mem::take(&mut self.unlock_input);
        match self.gate.unlock(&password) {
            Ok(true) => {
                self.unlock_error = None;
                self.state = AppState::Normal;
                self.status_message = Some("Scout page unlocked".to_string());
                self.refresh_scouts();
            }
            Ok(false) => {
                self.unlock_error = Some("Incorrect password".to_string());
            }
            Err(e) => {
                error!(error = %e, "Scout gate check failed");
                self.unlock_error = Some(e.to_string());
            }
        }
    }

    pub fn lock_scouts(&mut self) {
        if !self.gate.requires_password() {
            return;
        }
        if let Err(e) = self.gate.lock() {
            warn!(error = %e, "Failed to remove gate file");
        }
        self.status_message = Some("Scout page locked".to_string());
    }

    pub fn start_import(&mut self) {
        if self.current_tab != Tab::Scouts || !self.gate.is_open() {
            return;
        }
        self.import_path.clear();
        self.state = AppState::ImportingCsv;
    }

    /// Upload the CSV at `import_path`
    pub fn submit_import(&mut self) {
        let path = PathBuf::from(self.import_path.trim());
        self.state = AppState::Normal;
        if path.as_os_str().is_empty() {
            return;
        }

        let dispatcher = self.dispatcher.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = dispatcher.upload_scout_csv_file(&path).await;
            Self::send_result(&tx, TaskResult::Uploaded(result)).await;
        });
        self.status_message = Some("Uploading...".to_string());
    }
}

fn open_edit<T: Resource>(page: &mut Page<T>, row: &T) -> Option<FormState> {
    if !page.edit.is_editing(row.id()) {
        page.begin_edit(row);
    }
    page.edit.draft().map(|draft| FormState::open(FormMode::Edit, draft))
}

// ============================================================================
// Input validation helpers (exported for use in input.rs)
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a character should be accepted into a text input
pub fn can_add_input_char(current_len: usize, c: char) -> bool {
    current_len < MAX_INPUT_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================
