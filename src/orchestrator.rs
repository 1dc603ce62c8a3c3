//! The resolver consumed by the parent form.
//!
//! All authoritative state lives in one [`ResolverState`] value, advanced by
//! the pure reducer [`ResolverState::apply`]. The [`Orchestrator`] owns that
//! value together with the search controller, merges record sources after
//! every change and notifies listeners synchronously.
//!
//! Time is passed in explicitly (`now`) so debounce behavior is
//! reproducible; a UI loop passes `Instant::now()`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;
use uuid::Uuid;

use crate::aggregate::merge;
use crate::binding::{bind, revert, BindingStatus, DivergenceDetector, StatusInput};
use crate::config::ResolverConfig;
use crate::error::{ContractError, ResolverResult};
use crate::record::{ContactField, ContactRecord, Draft, InitialValue, Provenance, Snapshot};
use crate::search::{ContactDirectory, SearchController, SearchDispatcher};
use crate::validation::{DefaultFormatRules, FormatRules, ValidationResult};

/// Input events accepted from the parent form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolverEvent {
    /// Free text typed into the name/search input.
    TextInput(String),
    /// The input gained focus.
    Focus,
    /// The input lost focus.
    Blur,
    /// A suggestion was chosen.
    SelectRecord(ContactRecord),
    /// The typed text is confirmed as a brand-new contact.
    AddAsNew,
    /// Reset everything.
    Clear,
    /// Restore the name of the bound record.
    Revert,
    /// A specific field was edited.
    FieldEdit(ContactField, String),
}

impl ResolverEvent {
    /// Short name for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::TextInput(_) => "text_input",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::SelectRecord(_) => "select_record",
            Self::AddAsNew => "add_as_new",
            Self::Clear => "clear",
            Self::Revert => "revert",
            Self::FieldEdit(..) => "field_edit",
        }
    }
}

/// Complete resolver state as one immutable value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolverState {
    draft: Draft,
    snapshot: Option<Snapshot>,
    status: BindingStatus,
    validation: ValidationResult,
    touched: bool,
    focused: bool,
    menu_open: bool,
}

impl ResolverState {
    /// Empty, unbound state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State seeded from an externally supplied value.
    ///
    /// A value with an id is treated as bound and gets a snapshot. A value
    /// without an id is a prefilled new entry.
    #[must_use]
    pub fn from_initial(
        initial: &InitialValue,
        candidates: &[ContactRecord],
        rules: &dyn FormatRules,
    ) -> Self {
        let draft = Draft::from_record(&initial.record, initial.provenance);
        let snapshot = initial
            .record
            .id
            .map(|_| Snapshot::capture(initial.record.clone()));
        let status = DivergenceDetector::new(candidates).classify(&draft, snapshot.as_ref());
        let validation = ValidationResult::of_draft(rules, &draft);
        Self {
            draft,
            snapshot,
            status,
            validation,
            ..Self::default()
        }
    }

    /// Computes the state after `event`.
    ///
    /// Every event has a defined outcome. The only failure is selecting a
    /// record without an id, which leaves `self` untouched.
    pub fn apply(
        &self,
        event: &ResolverEvent,
        candidates: &[ContactRecord],
        rules: &dyn FormatRules,
    ) -> Result<Self, ContractError> {
        let detector = DivergenceDetector::new(candidates);
        let mut next = self.clone();

        match event {
            ResolverEvent::TextInput(text) | ResolverEvent::FieldEdit(ContactField::Name, text) => {
                next.draft.set_manual(ContactField::Name, text.clone());
                next.touched = true;
                next.menu_open = true;
                next.status = detector.transition(
                    self.status,
                    StatusInput::NameEdit {
                        draft: &next.draft,
                        snapshot: next.snapshot.as_ref(),
                    },
                );
            }
            ResolverEvent::FieldEdit(field, value) => {
                next.draft.set_manual(*field, value.clone());
                next.touched = true;
                next.status = detector.transition(self.status, StatusInput::OtherFieldEdit);
            }
            ResolverEvent::Focus => {
                next.focused = true;
                next.menu_open = true;
                next.status = detector.transition(self.status, StatusInput::Focus);
            }
            ResolverEvent::Blur => {
                next.focused = false;
                next.menu_open = false;
                next.status = detector.transition(self.status, StatusInput::Blur { draft: &next.draft });
            }
            ResolverEvent::SelectRecord(record) => {
                let binding = bind(record, rules)?;
                next.draft = binding.draft;
                next.snapshot = Some(binding.snapshot);
                next.touched = true;
                next.menu_open = false;
                if let Some(id) = next.draft.id {
                    next.status = detector.transition(self.status, StatusInput::Select { id });
                }
            }
            ResolverEvent::AddAsNew => {
                next.draft.id = None;
                next.draft.origin_scope_name = None;
                next.draft.provenance = Provenance::default();
                next.snapshot = None;
                next.touched = true;
                next.menu_open = false;
                next.status = detector.transition(
                    self.status,
                    StatusInput::AddAsNew {
                        name: &next.draft.name,
                    },
                );
            }
            ResolverEvent::Clear => {
                next = Self {
                    focused: self.focused,
                    ..Self::default()
                };
                next.status = detector.transition(self.status, StatusInput::Clear);
            }
            ResolverEvent::Revert => {
                if let Some(snapshot) = &self.snapshot {
                    next.draft = revert(&self.draft, snapshot);
                }
                next.status = detector.transition(
                    self.status,
                    StatusInput::Revert {
                        snapshot: self.snapshot.as_ref(),
                    },
                );
            }
        }

        next.validation = ValidationResult::of_draft(rules, &next.draft);
        Ok(next)
    }

    /// Re-derives the bound scope after the candidate list changed.
    #[must_use]
    pub fn rescope(&self, candidates: &[ContactRecord]) -> Self {
        let status = DivergenceDetector::new(candidates)
            .transition(self.status, StatusInput::Rescope { id: self.draft.id });
        Self {
            status,
            ..self.clone()
        }
    }

    /// The live draft.
    #[must_use]
    pub const fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Snapshot of the last binding, if bound.
    #[must_use]
    pub const fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Current binding status.
    #[must_use]
    pub const fn status(&self) -> BindingStatus {
        self.status
    }

    /// Current phone/email validity.
    #[must_use]
    pub const fn validation(&self) -> ValidationResult {
        self.validation
    }

    /// True once the user has typed, selected, or confirmed anything.
    #[must_use]
    pub const fn touched(&self) -> bool {
        self.touched
    }

    /// True while the input has focus.
    #[must_use]
    pub const fn focused(&self) -> bool {
        self.focused
    }
}

/// Outputs handed to the parent form after every event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverView {
    /// The live draft.
    pub draft: Draft,
    /// Binding status of the draft.
    pub status: BindingStatus,
    /// Phone/email validity of the draft.
    pub validation: ValidationResult,
    /// Merged suggestion list: pinned, then current scope, then global.
    pub suggestions: Vec<ContactRecord>,
    /// Advisory, for layout collaborators.
    pub suggestions_open: bool,
}

/// Change notifications for the parent form.
///
/// Callbacks fire synchronously, only when the value actually changed.
pub trait ResolverListener: Send {
    /// The draft changed.
    fn on_draft_change(&mut self, _draft: &Draft) {}

    /// Phone/email validity changed.
    fn on_validation_change(&mut self, _validation: ValidationResult) {}

    /// The suggestion list opened or closed.
    fn on_suggestions_open_change(&mut self, _open: bool) {}
}

struct Outputs {
    draft: Draft,
    validation: ValidationResult,
    suggestions_open: bool,
}

/// One resolver per form instance.
pub struct Orchestrator<R: FormatRules = DefaultFormatRules> {
    instance_id: Uuid,
    rules: R,
    state: ResolverState,
    pinned: Option<ContactRecord>,
    candidates: Vec<ContactRecord>,
    search: SearchController,
    dispatcher: SearchDispatcher,
    suggestions: Vec<ContactRecord>,
    suggestions_open: bool,
    listeners: Vec<Box<dyn ResolverListener>>,
}

impl Orchestrator<DefaultFormatRules> {
    /// Creates a resolver with the built-in phone/email rules.
    pub fn new(config: ResolverConfig, directory: Arc<dyn ContactDirectory>) -> ResolverResult<Self> {
        Self::with_rules(config, directory, DefaultFormatRules)
    }
}

impl<R: FormatRules> Orchestrator<R> {
    /// Creates a resolver with custom format rules.
    pub fn with_rules(
        config: ResolverConfig,
        directory: Arc<dyn ContactDirectory>,
        rules: R,
    ) -> ResolverResult<Self> {
        config.validate()?;
        let dispatcher = SearchDispatcher::start(directory, config.search_queue_capacity);
        let mut orchestrator = Self {
            instance_id: Uuid::new_v4(),
            rules,
            state: ResolverState::new(),
            pinned: None,
            candidates: Vec::new(),
            search: SearchController::new(config),
            dispatcher,
            suggestions: Vec::new(),
            suggestions_open: false,
            listeners: Vec::new(),
        };
        orchestrator.remerge();
        Ok(orchestrator)
    }

    /// Seeds the draft from an existing relationship.
    ///
    /// A bound initial record is pinned first in every suggestion list for
    /// the lifetime of this instance.
    #[must_use]
    pub fn with_initial_value(mut self, initial: InitialValue) -> Self {
        self.state = ResolverState::from_initial(&initial, &self.candidates, &self.rules);
        self.pinned = initial.record.id.map(|_| initial.record);
        self.remerge();
        self
    }

    /// Registers a listener.
    pub fn subscribe(&mut self, listener: Box<dyn ResolverListener>) {
        self.listeners.push(listener);
    }

    /// Replaces the current-scope candidates supplied by the parent form.
    pub fn set_scope_candidates(&mut self, candidates: Vec<ContactRecord>) -> ResolverView {
        let before = self.outputs();
        self.candidates = candidates;
        self.state = self.state.rescope(&self.candidates);
        self.publish(&before)
    }

    /// Processes one event.
    ///
    /// # Errors
    ///
    /// Fails with a contract error when a record without an id is selected;
    /// the state is unchanged in that case.
    pub fn dispatch(&mut self, event: ResolverEvent, now: Instant) -> ResolverResult<ResolverView> {
        let before = self.outputs();
        let next = self.state.apply(&event, &self.candidates, &self.rules)?;

        match &event {
            ResolverEvent::TextInput(text) | ResolverEvent::FieldEdit(ContactField::Name, text) => {
                self.search.on_query_change(text, next.draft().is_bound(), now);
            }
            ResolverEvent::SelectRecord(_) | ResolverEvent::AddAsNew => self.search.invalidate(),
            ResolverEvent::Clear => self.search.reset(),
            ResolverEvent::Focus
            | ResolverEvent::Blur
            | ResolverEvent::Revert
            | ResolverEvent::FieldEdit(..) => {}
        }
        self.dispatcher.supersede(self.search.generation());

        self.state = next;
        debug!(
            instance = %self.instance_id,
            event = event.kind(),
            status = %self.state.status(),
            "resolver event applied"
        );
        Ok(self.publish(&before))
    }

    /// Applies every completion that has arrived, then issues a due search.
    ///
    /// A search issued here is picked up by a later `pump` or
    /// [`wait_for_search`](Self::wait_for_search).
    pub fn pump(&mut self, now: Instant) -> ResolverView {
        let before = self.outputs();
        for done in self.dispatcher.drain() {
            self.search.complete(&done.ticket, done.outcome);
        }
        if let Some(ticket) = self.search.poll(now) {
            if let Err(failed) = self.dispatcher.submit(ticket) {
                self.search.complete(&failed.ticket, failed.outcome);
            }
        }
        self.publish(&before)
    }

    /// Blocks for the next search completion and applies it if current.
    ///
    /// Returns true if the completion was applied. Stale and missing
    /// completions return false.
    pub fn wait_for_search(&mut self, timeout: Duration) -> bool {
        let before = self.outputs();
        let Some(done) = self.dispatcher.recv_timeout(timeout) else {
            return false;
        };
        let applied = self.search.complete(&done.ticket, done.outcome);
        self.publish(&before);
        applied
    }

    /// Current outputs.
    #[must_use]
    pub fn view(&self) -> ResolverView {
        ResolverView {
            draft: self.state.draft().clone(),
            status: self.state.status(),
            validation: self.state.validation(),
            suggestions: self.suggestions.clone(),
            suggestions_open: self.suggestions_open,
        }
    }

    /// The full reducer state.
    #[must_use]
    pub const fn state(&self) -> &ResolverState {
        &self.state
    }

    /// Merged suggestion list.
    #[must_use]
    pub fn suggestions(&self) -> &[ContactRecord] {
        &self.suggestions
    }

    /// The search controller, for inspection.
    #[must_use]
    pub const fn search(&self) -> &SearchController {
        &self.search
    }

    /// Identifier of this form instance, used in log fields.
    #[must_use]
    pub const fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    fn outputs(&self) -> Outputs {
        Outputs {
            draft: self.state.draft().clone(),
            validation: self.state.validation(),
            suggestions_open: self.suggestions_open,
        }
    }

    fn remerge(&mut self) {
        self.suggestions = merge(
            self.pinned.as_ref(),
            &self.candidates,
            &self.search.results().records,
            self.state.draft().id,
        );
        self.suggestions_open = self.state.menu_open && !self.suggestions.is_empty();
    }

    fn publish(&mut self, before: &Outputs) -> ResolverView {
        self.remerge();
        let draft_changed = &before.draft != self.state.draft();
        let validation_changed = before.validation != self.state.validation();
        let open_changed = before.suggestions_open != self.suggestions_open;

        for listener in &mut self.listeners {
            if draft_changed {
                listener.on_draft_change(self.state.draft());
            }
            if validation_changed {
                listener.on_validation_change(self.state.validation());
            }
            if open_changed {
                listener.on_suggestions_open_change(self.suggestions_open);
            }
        }
        self.view()
    }
}

impl<R: FormatRules> std::fmt::Debug for Orchestrator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("instance_id", &self.instance_id)
            .field("state", &self.state)
            .field("candidates", &self.candidates.len())
            .field("suggestions", &self.suggestions.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use crate::record::ContactId;
    use crate::search::InMemoryDirectory;

    fn scope() -> Vec<ContactRecord> {
        vec![
            ContactRecord::new(5, "John Tan").with_phone("+60123456789"),
            ContactRecord::new(6, "Siti Aminah").with_email("siti@example.com"),
        ]
    }

    fn apply(state: &ResolverState, event: ResolverEvent) -> ResolverState {
        state.apply(&event, &scope(), &DefaultFormatRules).unwrap()
    }

    fn orchestrator() -> Orchestrator {
        let directory = Arc::new(InMemoryDirectory::new(vec![
            ContactRecord::new(40, "Alice Wong").with_origin_scope("Globex"),
            ContactRecord::new(41, "Ali Hassan").with_origin_scope("Initech"),
        ]));
        let mut orchestrator = Orchestrator::new(ResolverConfig::default(), directory).unwrap();
        orchestrator.set_scope_candidates(scope());
        orchestrator
    }

    #[derive(Default)]
    struct Recorded {
        drafts: Vec<Draft>,
        validations: Vec<ValidationResult>,
        open: Vec<bool>,
    }

    struct Recorder(Arc<Mutex<Recorded>>);

    impl ResolverListener for Recorder {
        fn on_draft_change(&mut self, draft: &Draft) {
            self.0.lock().unwrap().drafts.push(draft.clone());
        }
        fn on_validation_change(&mut self, validation: ValidationResult) {
            self.0.lock().unwrap().validations.push(validation);
        }
        fn on_suggestions_open_change(&mut self, open: bool) {
            self.0.lock().unwrap().open.push(open);
        }
    }

    #[test]
    fn typing_without_binding_is_a_new_entry() {
        let state = apply(&ResolverState::new(), ResolverEvent::TextInput("Ali".to_string()));
        assert_eq!(state.status(), BindingStatus::NewEntry);
        assert_eq!(state.draft().name, "Ali");
        assert!(state.draft().id.is_none());
        assert!(state.draft().phone.is_empty());
    }

    #[test]
    fn select_binds_and_tags_provenance() {
        let state = apply(&ResolverState::new(), ResolverEvent::SelectRecord(scope()[0].clone()));
        assert_eq!(state.status(), BindingStatus::BoundCurrentScope);
        assert_eq!(state.draft().phone, "+60123456789");
        assert!(state.draft().provenance.phone);
        assert!(!state.draft().provenance.position);
        assert_eq!(state.snapshot().map(Snapshot::name), Some("John Tan"));
    }

    #[test]
    fn select_from_global_results_is_other_scope() {
        let global = ContactRecord::new(40, "Alice Wong").with_origin_scope("Globex");
        let state = apply(&ResolverState::new(), ResolverEvent::SelectRecord(global));
        assert_eq!(state.status(), BindingStatus::BoundOtherScope);
        assert_eq!(state.draft().origin_scope_name.as_deref(), Some("Globex"));
    }

    #[test]
    fn select_without_id_is_rejected() {
        let state = ResolverState::new();
        let err = state
            .apply(
                &ResolverEvent::SelectRecord(ContactRecord::unsaved("Ghost")),
                &scope(),
                &DefaultFormatRules,
            )
            .unwrap_err();
        assert!(matches!(err, ContractError::SelectWithoutId { .. }));
    }

    #[test]
    fn divergence_and_revert() {
        let bound = apply(&ResolverState::new(), ResolverEvent::SelectRecord(scope()[0].clone()));
        let edited = apply(&bound, ResolverEvent::TextInput("John T.".to_string()));
        assert_eq!(edited.status(), BindingStatus::DivergentEdit);
        assert_eq!(edited.draft().id, Some(ContactId::new(5)));

        let reverted = apply(&edited, ResolverEvent::Revert);
        assert_eq!(reverted.draft().name, "John Tan");
        assert_eq!(reverted.status(), BindingStatus::BoundCurrentScope);
    }

    #[test]
    fn typing_the_original_name_back_converges() {
        let bound = apply(&ResolverState::new(), ResolverEvent::SelectRecord(scope()[1].clone()));
        let edited = apply(&bound, ResolverEvent::FieldEdit(ContactField::Name, "Siti".to_string()));
        assert_eq!(edited.status(), BindingStatus::DivergentEdit);
        let back = apply(&edited, ResolverEvent::TextInput("Siti Aminah".to_string()));
        assert_eq!(back.status(), BindingStatus::BoundCurrentScope);
    }

    #[test]
    fn revert_keeps_other_manual_edits() {
        let bound = apply(&ResolverState::new(), ResolverEvent::SelectRecord(scope()[0].clone()));
        let phone = apply(&bound, ResolverEvent::FieldEdit(ContactField::Phone, "+60199999999".to_string()));
        let renamed = apply(&phone, ResolverEvent::TextInput("Johnny".to_string()));
        let reverted = apply(&renamed, ResolverEvent::Revert);
        assert_eq!(reverted.draft().name, "John Tan");
        assert_eq!(reverted.draft().phone, "+60199999999");
        assert!(!reverted.draft().provenance.phone);
    }

    #[test]
    fn bound_phone_edit_does_not_diverge() {
        // Documented, not assumed-correct: only the name drives divergence,
        // so a shared contact's phone can be changed without a signal.
        let bound = apply(&ResolverState::new(), ResolverEvent::SelectRecord(scope()[0].clone()));
        let edited = apply(&bound, ResolverEvent::FieldEdit(ContactField::Phone, "+60111111111".to_string()));
        assert_eq!(edited.status(), BindingStatus::BoundCurrentScope);
        assert!(!edited.draft().provenance.phone);
    }

    #[test]
    fn invalid_field_edit_is_flagged() {
        let state = apply(&ResolverState::new(), ResolverEvent::FieldEdit(ContactField::Email, "nope".to_string()));
        assert!(!state.validation().email_valid);
        assert!(state.validation().phone_valid);
        let fixed = apply(&state, ResolverEvent::FieldEdit(ContactField::Email, String::new()));
        assert!(fixed.validation().is_valid());
    }

    #[test]
    fn clear_resets_from_divergent_edit() {
        let bound = apply(&ResolverState::new(), ResolverEvent::SelectRecord(scope()[0].clone()));
        let edited = apply(&bound, ResolverEvent::TextInput("John T.".to_string()));
        let cleared = apply(&edited, ResolverEvent::Clear);
        assert_eq!(cleared.draft(), &Draft::empty());
        assert_eq!(cleared.status(), BindingStatus::Unbound);
        assert!(cleared.snapshot().is_none());
        assert!(!cleared.touched());
    }

    #[test]
    fn add_as_new_detaches_but_keeps_typed_values() {
        let bound = apply(&ResolverState::new(), ResolverEvent::SelectRecord(scope()[0].clone()));
        let renamed = apply(&bound, ResolverEvent::TextInput("Jonathan Tan".to_string()));
        let added = apply(&renamed, ResolverEvent::AddAsNew);
        assert_eq!(added.status(), BindingStatus::NewEntry);
        assert!(added.draft().id.is_none());
        assert!(added.snapshot().is_none());
        assert_eq!(added.draft().name, "Jonathan Tan");
        assert_eq!(added.draft().phone, "+60123456789");
        assert_eq!(added.draft().provenance, Provenance::default());
    }

    #[test]
    fn blur_on_untouched_field_is_unbound() {
        let focused = apply(&ResolverState::new(), ResolverEvent::Focus);
        let blurred = apply(&focused, ResolverEvent::Blur);
        assert_eq!(blurred.status(), BindingStatus::Unbound);
        assert!(!blurred.focused());
    }

    #[test]
    fn prefilled_unsaved_name_survives_focus_and_blur() {
        let initial = InitialValue::bound(ContactRecord::unsaved("Ali"));
        let state = ResolverState::from_initial(&initial, &scope(), &DefaultFormatRules);
        assert_eq!(state.status(), BindingStatus::NewEntry);
        assert!(!state.touched());

        let blurred = apply(&apply(&state, ResolverEvent::Focus), ResolverEvent::Blur);
        assert_eq!(blurred.status(), BindingStatus::NewEntry);
        assert_eq!(blurred.draft().name, "Ali");
    }

    #[test]
    fn blur_after_whitespace_keeps_the_typed_status() {
        let typed = apply(&ResolverState::new(), ResolverEvent::TextInput("  ".to_string()));
        let blurred = apply(&typed, ResolverEvent::Blur);
        assert_eq!(blurred.status(), typed.status());
        assert_eq!(blurred.draft().name, "  ");
    }

    #[test]
    fn unbound_status_always_has_no_id_and_no_text() {
        let events = [
            ResolverEvent::Focus,
            ResolverEvent::TextInput("Ali".to_string()),
            ResolverEvent::Blur,
            ResolverEvent::TextInput(String::new()),
            ResolverEvent::Blur,
            ResolverEvent::SelectRecord(scope()[0].clone()),
            ResolverEvent::TextInput(String::new()),
            ResolverEvent::Blur,
            ResolverEvent::AddAsNew,
            ResolverEvent::Focus,
            ResolverEvent::Blur,
            ResolverEvent::Clear,
        ];
        let initial = InitialValue::bound(ContactRecord::unsaved("Prefilled"));
        let mut state = ResolverState::from_initial(&initial, &scope(), &DefaultFormatRules);
        for event in events {
            state = apply(&state, event);
            if state.status() == BindingStatus::Unbound {
                assert!(state.draft().id.is_none());
                assert!(state.draft().name.is_empty());
            }
        }
    }

    #[test]
    fn initial_bound_value_gets_a_snapshot() {
        let initial = InitialValue::bound(ContactRecord::new(99, "Old Contact").with_origin_scope("Globex"));
        let state = ResolverState::from_initial(&initial, &scope(), &DefaultFormatRules);
        assert_eq!(state.status(), BindingStatus::BoundOtherScope);
        assert_eq!(state.snapshot().and_then(Snapshot::id), Some(ContactId::new(99)));
        assert!(!state.touched());
    }

    #[test]
    fn focus_with_empty_query_lists_scope_only() {
        let mut orchestrator = orchestrator();
        let view = orchestrator.dispatch(ResolverEvent::Focus, Instant::now()).unwrap();
        assert!(view.suggestions_open);
        assert_eq!(view.suggestions, scope());
        assert!(!orchestrator.search().has_pending());
    }

    #[test]
    fn candidate_change_rescopes_bound_record() {
        let mut orchestrator = orchestrator();
        let global = ContactRecord::new(40, "Alice Wong").with_origin_scope("Globex");
        let view = orchestrator
            .dispatch(ResolverEvent::SelectRecord(global.clone()), Instant::now())
            .unwrap();
        assert_eq!(view.status, BindingStatus::BoundOtherScope);

        let mut candidates = scope();
        candidates.push(ContactRecord::new(40, "Alice Wong"));
        let view = orchestrator.set_scope_candidates(candidates);
        assert_eq!(view.status, BindingStatus::BoundCurrentScope);
        assert_eq!(view.suggestions[0].id, Some(ContactId::new(40)));
    }

    #[test]
    fn failed_dispatch_leaves_state_untouched() {
        let mut orchestrator = orchestrator();
        let now = Instant::now();
        orchestrator.dispatch(ResolverEvent::TextInput("Ali".to_string()), now).unwrap();
        let before = orchestrator.state().clone();

        let err = orchestrator
            .dispatch(ResolverEvent::SelectRecord(ContactRecord::unsaved("Ghost")), now)
            .unwrap_err();
        assert!(err.is_contract());
        assert_eq!(orchestrator.state(), &before);
    }

    #[test]
    fn listeners_fire_only_on_change() {
        let recorded = Arc::new(Mutex::new(Recorded::default()));
        let mut orchestrator = orchestrator();
        orchestrator.subscribe(Box::new(Recorder(Arc::clone(&recorded))));
        let now = Instant::now();

        orchestrator.dispatch(ResolverEvent::Focus, now).unwrap();
        orchestrator
            .dispatch(ResolverEvent::FieldEdit(ContactField::Phone, "bad".to_string()), now)
            .unwrap();
        orchestrator
            .dispatch(ResolverEvent::FieldEdit(ContactField::Phone, "bad".to_string()), now)
            .unwrap();
        orchestrator.dispatch(ResolverEvent::Blur, now).unwrap();

        let recorded = recorded.lock().unwrap();
        assert_eq!(recorded.drafts.len(), 1);
        assert_eq!(recorded.drafts[0].phone, "bad");
        assert_eq!(
            recorded.validations,
            vec![ValidationResult {
                phone_valid: false,
                email_valid: true
            }]
        );
        assert_eq!(recorded.open, vec![true, false]);
    }
}
