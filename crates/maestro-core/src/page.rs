//! # Page State
//!
//! State held by a list page in the client: the open dialogs, the debounced
//! search box and the rows currently on screen.
//!
//! ## State Machines
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  FormDialog (create / edit)                                             │
//! │                                                                         │
//! │   Idle ──open──► Editing(draft) ──submit──► Submitting                  │
//! │    ▲                 ▲    │                   │     │                   │
//! │    │                 │    └──cancel──► Idle   │     │                   │
//! │    │                 └────── failed(errors) ──┘     │                   │
//! │    └─────────────────────── succeeded ──────────────┘                   │
//! │                                                                         │
//! │  DeleteFlow                                                             │
//! │                                                                         │
//! │   Idle ──request──► Confirming(target) ──confirm──► Deleting(target)    │
//! │    ▲                    ▲   │                          │      │         │
//! │    │                    │   └──cancel──► Idle          │      │         │
//! │    │                    └──────────── failed ──────────┘      │         │
//! │    └─────────────────────────────── succeeded ────────────────┘         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Search
//! A keystroke restarts a 500 ms quiet period ([`SearchDebouncer`]). When it
//! elapses the term is sent unless it equals what the server already
//! acknowledged; in that case the request still in flight, if any, is
//! cancelled ([`SearchStep`]). Each request carries a generation from
//! [`SearchTracker`]; a newer request cancels the older one and late
//! responses are dropped.
//! Applying a response swaps rows and filters but keeps the scroll offset and
//! any open dialog ([`ListPage::apply_search`]).

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{CoreError, FieldErrors};
use crate::money::Money;
use crate::types::{ListFilters, Product, Seller, Warehouse};
use crate::SEARCH_DEBOUNCE_MS;

// =============================================================================
// Form Dialog
// =============================================================================

/// Whether a dialog creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    Edit { id: i64 },
}

/// The create/edit dialog of a list page.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormDialog {
    #[default]
    Idle,
    Editing {
        mode: DialogMode,
        draft: Map<String, Value>,
        errors: FieldErrors,
    },
    Submitting {
        mode: DialogMode,
        draft: Map<String, Value>,
    },
}

/// What a submitted dialog sends to the server.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub mode: DialogMode,
    pub payload: Map<String, Value>,
}

impl FormDialog {
    pub fn state_name(&self) -> &'static str {
        match self {
            FormDialog::Idle => "idle",
            FormDialog::Editing { .. } => "editing",
            FormDialog::Submitting { .. } => "submitting",
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, FormDialog::Idle)
    }

    /// Opens the dialog with the form's blank defaults.
    pub fn open_create(&mut self, defaults: Map<String, Value>) -> Result<(), CoreError> {
        self.open(DialogMode::Create, defaults)
    }

    /// Opens the dialog pre-filled from an existing record.
    pub fn open_edit<T: Serialize>(&mut self, id: i64, record: &T) -> Result<(), CoreError> {
        let draft = match serde_json::to_value(record) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        self.open(DialogMode::Edit { id }, draft)
    }

    fn open(&mut self, mode: DialogMode, draft: Map<String, Value>) -> Result<(), CoreError> {
        if self.is_open() {
            return Err(CoreError::invalid_transition(self.state_name(), "open"));
        }
        *self = FormDialog::Editing {
            mode,
            draft,
            errors: FieldErrors::new(),
        };
        Ok(())
    }

    /// Updates one draft field and clears its error.
    pub fn set_field(&mut self, field: &str, value: Value) -> Result<(), CoreError> {
        match self {
            FormDialog::Editing { draft, errors, .. } => {
                draft.insert(field.to_string(), value);
                if errors.contains(field) {
                    let mut remaining = FieldErrors::new();
                    for (name, messages) in errors.iter().filter(|(name, _)| *name != field) {
                        for message in messages {
                            remaining.push(name, message.clone());
                        }
                    }
                    *errors = remaining;
                }
                Ok(())
            }
            _ => Err(CoreError::invalid_transition(self.state_name(), "edit")),
        }
    }

    /// Moves to `Submitting` and returns what to send.
    pub fn submit(&mut self) -> Result<Submission, CoreError> {
        match std::mem::take(self) {
            FormDialog::Editing { mode, draft, .. } => {
                let submission = Submission {
                    mode,
                    payload: draft.clone(),
                };
                *self = FormDialog::Submitting { mode, draft };
                Ok(submission)
            }
            other => {
                let state = other.state_name();
                *self = other;
                Err(CoreError::invalid_transition(state, "submit"))
            }
        }
    }

    /// The server accepted the submission; the dialog closes.
    pub fn succeeded(&mut self) -> Result<(), CoreError> {
        match self {
            FormDialog::Submitting { .. } => {
                *self = FormDialog::Idle;
                Ok(())
            }
            _ => Err(CoreError::invalid_transition(self.state_name(), "complete")),
        }
    }

    /// The server rejected the submission; the draft stays with the errors.
    pub fn failed(&mut self, errors: FieldErrors) -> Result<(), CoreError> {
        match std::mem::take(self) {
            FormDialog::Submitting { mode, draft } => {
                *self = FormDialog::Editing {
                    mode,
                    draft,
                    errors,
                };
                Ok(())
            }
            other => {
                let state = other.state_name();
                *self = other;
                Err(CoreError::invalid_transition(state, "fail"))
            }
        }
    }

    /// Closes the dialog, discarding the draft.
    pub fn cancel(&mut self) {
        *self = FormDialog::Idle;
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            FormDialog::Editing { errors, .. } => Some(errors),
            _ => None,
        }
    }

    pub fn draft(&self) -> Option<&Map<String, Value>> {
        match self {
            FormDialog::Editing { draft, .. } | FormDialog::Submitting { draft, .. } => Some(draft),
            FormDialog::Idle => None,
        }
    }
}

// =============================================================================
// Delete Flow
// =============================================================================

/// The delete confirmation dialog of a list page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteFlow<T> {
    Idle,
    Confirming(T),
    Deleting(T),
}

impl<T> Default for DeleteFlow<T> {
    fn default() -> Self {
        DeleteFlow::Idle
    }
}

impl<T> DeleteFlow<T> {
    pub fn state_name(&self) -> &'static str {
        match self {
            DeleteFlow::Idle => "idle",
            DeleteFlow::Confirming(_) => "confirming",
            DeleteFlow::Deleting(_) => "deleting",
        }
    }

    pub fn target(&self) -> Option<&T> {
        match self {
            DeleteFlow::Confirming(t) | DeleteFlow::Deleting(t) => Some(t),
            DeleteFlow::Idle => None,
        }
    }

    /// Asks for confirmation before deleting `target`.
    pub fn request(&mut self, target: T) -> Result<(), CoreError> {
        match self {
            DeleteFlow::Idle => {
                *self = DeleteFlow::Confirming(target);
                Ok(())
            }
            _ => Err(CoreError::invalid_transition(self.state_name(), "request delete")),
        }
    }

    /// User confirmed; returns the record to delete.
    pub fn confirm(&mut self) -> Result<&T, CoreError> {
        match std::mem::replace(self, DeleteFlow::Idle) {
            DeleteFlow::Confirming(t) => *self = DeleteFlow::Deleting(t),
            other => {
                let state = other.state_name();
                *self = other;
                return Err(CoreError::invalid_transition(state, "confirm delete"));
            }
        }
        match &*self {
            DeleteFlow::Deleting(t) => Ok(t),
            _ => Err(CoreError::invalid_transition("idle", "confirm delete")),
        }
    }

    /// Closes the dialog unless a delete is in flight.
    pub fn cancel(&mut self) -> Result<(), CoreError> {
        match self {
            DeleteFlow::Deleting(_) => Err(CoreError::invalid_transition("deleting", "cancel")),
            _ => {
                *self = DeleteFlow::Idle;
                Ok(())
            }
        }
    }

    pub fn succeeded(&mut self) -> Result<(), CoreError> {
        match self {
            DeleteFlow::Deleting(_) => {
                *self = DeleteFlow::Idle;
                Ok(())
            }
            _ => Err(CoreError::invalid_transition(self.state_name(), "complete delete")),
        }
    }

    /// The delete failed; the confirmation dialog comes back.
    pub fn failed(&mut self) -> Result<(), CoreError> {
        match std::mem::replace(self, DeleteFlow::Idle) {
            DeleteFlow::Deleting(t) => {
                *self = DeleteFlow::Confirming(t);
                Ok(())
            }
            other => {
                let state = other.state_name();
                *self = other;
                Err(CoreError::invalid_transition(state, "fail delete"))
            }
        }
    }
}

// =============================================================================
// Debounced Search
// =============================================================================

/// Delays a search until the user stops typing.
#[derive(Debug, Clone)]
pub struct SearchDebouncer {
    delay: Duration,
    pending: Option<(String, Instant)>,
    acknowledged: String,
}

impl SearchDebouncer {
    /// `acknowledged` is the term the server last answered for.
    pub fn new(acknowledged: impl Into<String>) -> Self {
        Self::with_delay(acknowledged, Duration::from_millis(SEARCH_DEBOUNCE_MS))
    }

    pub fn with_delay(acknowledged: impl Into<String>, delay: Duration) -> Self {
        SearchDebouncer {
            delay,
            pending: None,
            acknowledged: acknowledged.into(),
        }
    }

    /// Records a keystroke; restarts the quiet period.
    pub fn input(&mut self, text: impl Into<String>, now: Instant) {
        self.pending = Some((text.into(), now + self.delay));
    }

    /// When the pending term becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    /// Returns the typed term once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = matches!(&self.pending, Some((_, at)) if now >= *at);
        if !due {
            return None;
        }
        self.pending.take().map(|(text, _)| text)
    }

    /// The server answered for `term`.
    pub fn acknowledge(&mut self, term: impl Into<String>) {
        self.acknowledged = term.into();
    }

    pub fn acknowledged(&self) -> &str {
        &self.acknowledged
    }
}

/// A search request issued by [`SearchTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Issued {
    pub generation: u64,
    /// The in-flight request this one supersedes.
    pub cancelled: Option<u64>,
}

/// Latest-wins bookkeeping for in-flight search requests.
#[derive(Debug, Clone, Default)]
pub struct SearchTracker {
    latest: u64,
    in_flight: Option<u64>,
}

impl SearchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request, cancelling the one in flight.
    pub fn issue(&mut self) -> Issued {
        self.latest += 1;
        let cancelled = self.in_flight.replace(self.latest);
        Issued {
            generation: self.latest,
            cancelled,
        }
    }

    /// Returns true if a response for `generation` should be applied.
    pub fn accept(&mut self, generation: u64) -> bool {
        if self.in_flight == Some(generation) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// Cancels the request in flight without issuing a new one.
    pub fn cancel(&mut self) -> Option<u64> {
        self.in_flight.take()
    }

    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }
}

/// What a list page does once the search box settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStep {
    /// Request these filters.
    Fetch { filters: ListFilters, issued: Issued },
    /// The box is back to the term on screen; abort this request.
    Cancel { generation: u64 },
}

// =============================================================================
// List Page
// =============================================================================

/// Everything a list page keeps between server round trips.
#[derive(Debug, Clone)]
pub struct ListPage<T> {
    pub rows: Vec<T>,
    pub filters: ListFilters,
    pub scroll_offset: u32,
    pub form: FormDialog,
    pub delete: DeleteFlow<T>,
    pub debouncer: SearchDebouncer,
    pub tracker: SearchTracker,
}

impl<T> ListPage<T> {
    pub fn new(rows: Vec<T>, filters: ListFilters) -> Self {
        let debouncer = SearchDebouncer::new(filters.search_term());
        ListPage {
            rows,
            filters,
            scroll_offset: 0,
            form: FormDialog::Idle,
            delete: DeleteFlow::Idle,
            debouncer,
            tracker: SearchTracker::new(),
        }
    }

    /// Feeds a keystroke to the search box.
    pub fn type_search(&mut self, text: impl Into<String>, now: Instant) {
        self.debouncer.input(text, now);
    }

    /// Settles the debounced search if it is due.
    ///
    /// A term the server already answered for issues nothing, but cancels
    /// the request in flight so its response cannot replace the rows.
    pub fn poll_search(&mut self, now: Instant) -> Option<SearchStep> {
        let term = self.debouncer.poll(now)?;
        let search = crate::validation::normalize_search(&term);

        if search.as_deref().unwrap_or("") == self.debouncer.acknowledged() {
            return self
                .tracker
                .cancel()
                .map(|generation| SearchStep::Cancel { generation });
        }

        let filters = ListFilters {
            search,
            status: self.filters.status,
        };
        Some(SearchStep::Fetch {
            filters,
            issued: self.tracker.issue(),
        })
    }

    /// Applies a search response. Stale responses are ignored and return false.
    ///
    /// Rows and filters are replaced; scroll offset and dialogs are kept.
    pub fn apply_search(&mut self, generation: u64, rows: Vec<T>, filters: ListFilters) -> bool {
        if !self.tracker.accept(generation) {
            return false;
        }
        self.debouncer.acknowledge(filters.search_term());
        self.rows = rows;
        self.filters = filters;
        true
    }
}

// =============================================================================
// Client-Side Sorting & Filtering
// =============================================================================

/// A comparable cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKey {
    Int(i64),
    Text(String),
    Money(Money),
    Bool(bool),
}

impl SortKey {
    fn text(s: &str) -> Self {
        SortKey::Text(s.to_lowercase())
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Int(a), SortKey::Int(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Money(a), SortKey::Money(b)) => a.cmp(b),
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl SortKey {
    fn rank(&self) -> u8 {
        match self {
            SortKey::Int(_) => 0,
            SortKey::Money(_) => 1,
            SortKey::Bool(_) => 2,
            SortKey::Text(_) => 3,
        }
    }
}

/// A row that can be sorted by its wire column names.
pub trait SortableRow {
    /// `None` for unknown columns and empty cells.
    fn sort_key(&self, column: &str) -> Option<SortKey>;
}

impl SortableRow for Warehouse {
    fn sort_key(&self, column: &str) -> Option<SortKey> {
        match column {
            "id" => Some(SortKey::Int(self.id)),
            "codigo" => Some(SortKey::text(&self.code)),
            "descripcion" => Some(SortKey::text(&self.description)),
            "direccion" => self.address.as_deref().map(SortKey::text),
            "bodega_ecommerce" => Some(SortKey::Bool(self.ecommerce)),
            _ => None,
        }
    }
}

impl SortableRow for Product {
    fn sort_key(&self, column: &str) -> Option<SortKey> {
        match column {
            "id" => Some(SortKey::Int(self.id)),
            "codigo" => Some(SortKey::text(&self.code)),
            "descripcion" => Some(SortKey::text(&self.description)),
            "precio_neto" => Some(SortKey::Money(self.net_price)),
            "precio_bruto" => Some(SortKey::Money(self.gross_price)),
            "activo" => Some(SortKey::Bool(self.active)),
            _ => None,
        }
    }
}

impl SortableRow for Seller {
    fn sort_key(&self, column: &str) -> Option<SortKey> {
        match column {
            "id" => Some(SortKey::Int(self.id)),
            "descripcion" => Some(SortKey::text(&self.description)),
            "usuario" => Some(SortKey::text(&self.username)),
            "sucursal" => Some(SortKey::text(&self.branch)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Sorts the loaded rows in place. Only what is on screen is sorted.
///
/// The sort is stable; empty cells go last in either direction.
pub fn sort_rows<T: SortableRow>(rows: &mut [T], column: &str, direction: SortDirection) {
    rows.sort_by(|a, b| match (a.sort_key(column), b.sort_key(column)) {
        (Some(x), Some(y)) => match direction {
            SortDirection::Asc => x.cmp(&y),
            SortDirection::Desc => y.cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// The warehouse table's filter box: case-insensitive substring match on
/// code, description or address of the loaded rows.
pub fn global_filter<'a>(rows: &'a [Warehouse], term: &str) -> Vec<&'a Warehouse> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return rows.iter().collect();
    }

    rows.iter()
        .filter(|w| {
            [Some(w.code.as_str()), Some(w.description.as_str()), w.address.as_deref()]
                .into_iter()
                .flatten()
                .any(|cell| cell.to_lowercase().contains(&needle))
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn warehouse(id: i64, code: &str, description: &str, address: Option<&str>) -> Warehouse {
        Warehouse {
            id,
            code: code.into(),
            description: description.into(),
            address: address.map(Into::into),
            ecommerce: false,
        }
    }

    #[test]
    fn test_form_dialog_happy_path() {
        let mut dialog = FormDialog::default();
        dialog.open_create(Map::new()).unwrap();
        dialog.set_field("codigo", json!("BP1")).unwrap();

        let submission = dialog.submit().unwrap();
        assert_eq!(submission.mode, DialogMode::Create);
        assert_eq!(submission.payload["codigo"], "BP1");
        assert_eq!(dialog.state_name(), "submitting");

        dialog.succeeded().unwrap();
        assert_eq!(dialog, FormDialog::Idle);
    }

    #[test]
    fn test_form_dialog_validation_failure_keeps_draft() {
        let mut dialog = FormDialog::default();
        let record = warehouse(4, "BP1", "Principal", None);
        dialog.open_edit(4, &record).unwrap();
        assert_eq!(dialog.draft().unwrap()["codigo"], "BP1");

        dialog.submit().unwrap();
        let mut errors = FieldErrors::new();
        errors.push("codigo", "codigo 'BP1' already exists");
        dialog.failed(errors).unwrap();

        assert_eq!(dialog.state_name(), "editing");
        assert!(dialog.errors().unwrap().contains("codigo"));

        // Editing the field clears its error.
        dialog.set_field("codigo", json!("BP2")).unwrap();
        assert!(dialog.errors().unwrap().is_empty());
    }

    #[test]
    fn test_form_dialog_rejects_invalid_transitions() {
        let mut dialog = FormDialog::default();
        assert!(dialog.submit().is_err());
        assert!(dialog.succeeded().is_err());
        assert_eq!(dialog, FormDialog::Idle);

        dialog.open_create(Map::new()).unwrap();
        assert!(dialog.open_create(Map::new()).is_err());
        dialog.cancel();
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_delete_flow_failure_returns_to_confirming() {
        let mut flow = DeleteFlow::default();
        flow.request(7_i64).unwrap();
        assert_eq!(*flow.confirm().unwrap(), 7);
        assert!(flow.cancel().is_err());

        flow.failed().unwrap();
        assert_eq!(flow, DeleteFlow::Confirming(7));

        flow.confirm().unwrap();
        flow.succeeded().unwrap();
        assert_eq!(flow, DeleteFlow::Idle);
    }

    #[test]
    fn test_debouncer_waits_for_quiet_period() {
        let start = Instant::now();
        let mut debouncer = SearchDebouncer::new("");

        debouncer.input("wid", start);
        debouncer.input("widget", start + Duration::from_millis(300));
        assert_eq!(debouncer.poll(start + Duration::from_millis(600)), None);
        assert_eq!(
            debouncer.poll(start + Duration::from_millis(800)),
            Some("widget".to_string())
        );
        assert_eq!(debouncer.poll(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn test_list_page_skips_acknowledged_term() {
        let start = Instant::now();
        let mut page: ListPage<Warehouse> = ListPage::new(vec![], ListFilters::search("azul"));
        page.type_search(" azul ", start);
        assert_eq!(page.poll_search(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_clearing_the_box_cancels_the_search_in_flight() {
        let start = Instant::now();
        let original = vec![warehouse(1, "BP1", "Principal", None)];
        let mut page = ListPage::new(original.clone(), ListFilters::default());

        page.type_search("x", start);
        let Some(SearchStep::Fetch { filters, issued }) =
            page.poll_search(start + Duration::from_millis(600))
        else {
            panic!("expected a fetch");
        };

        page.type_search("", start + Duration::from_millis(700));
        assert_eq!(
            page.poll_search(start + Duration::from_millis(1300)),
            Some(SearchStep::Cancel {
                generation: issued.generation
            })
        );

        let late = vec![warehouse(9, "BX", "Bodega X", None)];
        assert!(!page.apply_search(issued.generation, late, filters));
        assert_eq!(page.rows, original);
        assert_eq!(page.filters.search, None);
        assert_eq!(page.tracker.in_flight(), None);
    }

    #[test]
    fn test_tracker_discards_stale_responses() {
        let mut tracker = SearchTracker::new();
        let first = tracker.issue();
        let second = tracker.issue();
        assert_eq!(second.cancelled, Some(first.generation));

        assert!(!tracker.accept(first.generation));
        assert!(tracker.accept(second.generation));
        assert!(!tracker.accept(second.generation));
    }

    #[test]
    fn test_list_page_keeps_scroll_and_dialogs() {
        let start = Instant::now();
        let mut page = ListPage::new(
            vec![warehouse(1, "BP1", "Principal", None)],
            ListFilters::default(),
        );
        page.scroll_offset = 240;
        page.form.open_create(Map::new()).unwrap();

        page.type_search("sur", start);
        let Some(SearchStep::Fetch { filters, issued }) =
            page.poll_search(start + Duration::from_secs(1))
        else {
            panic!("expected a fetch");
        };
        assert_eq!(filters.search.as_deref(), Some("sur"));

        let applied = page.apply_search(
            issued.generation,
            vec![warehouse(2, "BS", "Bodega Sur", None)],
            filters,
        );
        assert!(applied);
        assert_eq!(page.rows[0].code, "BS");
        assert_eq!(page.scroll_offset, 240);
        assert!(page.form.is_open());
        assert_eq!(page.debouncer.acknowledged(), "sur");
    }

    #[test]
    fn test_sort_rows_on_loaded_rows() {
        let mut rows = vec![
            warehouse(1, "b", "Beta", Some("Calle 2")),
            warehouse(2, "A", "Alfa", None),
            warehouse(3, "c", "Gamma", Some("Calle 1")),
        ];

        sort_rows(&mut rows, "codigo", SortDirection::Asc);
        let codes: Vec<_> = rows.iter().map(|w| w.code.as_str()).collect();
        assert_eq!(codes, ["A", "b", "c"]);

        sort_rows(&mut rows, "direccion", SortDirection::Desc);
        let ids: Vec<_> = rows.iter().map(|w| w.id).collect();
        assert_eq!(ids, [1, 3, 2]);
    }

    #[test]
    fn test_sort_products_by_price() {
        let product = |id: i64, cents: i64| Product {
            id,
            code: format!("P{id}"),
            description: "x".into(),
            net_price: Money::from_cents(cents),
            gross_price: Money::from_cents(cents),
            active: true,
        };
        let mut rows = vec![product(1, 500), product(2, 100), product(3, 300)];
        sort_rows(&mut rows, "precio_bruto", SortDirection::Asc);
        let ids: Vec<_> = rows.iter().map(|p| p.id).collect();
        assert_eq!(ids, [2, 3, 1]);
    }

    #[test]
    fn test_global_filter() {
        let rows = vec![
            warehouse(1, "BP1", "Bodega Principal", Some("Av. Matta 100")),
            warehouse(2, "BS", "Bodega Sur", None),
        ];
        assert_eq!(global_filter(&rows, "matta").len(), 1);
        assert_eq!(global_filter(&rows, "BODEGA").len(), 2);
        assert_eq!(global_filter(&rows, "bs")[0].id, 2);
        assert_eq!(global_filter(&rows, "  ").len(), 2);
    }
}
