use crate::api::{Alert, ApiError, StateApi};
use crate::config::EditorConfig;
use crate::model::{
    draft_state, ConditionalRule, EffectRule, Game, State, StatementRule, Transition,
};
use crate::validation::{validate_state, ValidationIssue};

use super::selection::{FormVisibility, RuleForm, Selection};
use super::{
    reject_busy, reject_invalid, report_remote_failure, store_saved, EditorContext, EditorError,
    SaveError, SaveTarget,
};

const RULE_ADDED: &str = "Rule added to state";

/// A validated state on its way to the API.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingState {
    pub draft: State,
    pub target: SaveTarget,
}

impl PendingState {
    pub async fn dispatch<A>(&self, api: &A) -> Result<State, ApiError>
    where
        A: StateApi + ?Sized,
    {
        match self.target {
            SaveTarget::Create => api.create_state(&self.draft).await,
            SaveTarget::Update { .. } => api.update_state(&self.draft).await,
        }
    }
}

/// Editing session over the states of a game.
#[derive(Debug, Clone)]
pub struct StateEditor {
    config: EditorConfig,
    draft: Option<State>,
    selection: Selection,
    forms: FormVisibility,
    pending_delete: Option<usize>,
    saving: bool,
}

impl StateEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            draft: None,
            selection: Selection::Idle,
            forms: FormVisibility::default(),
            pending_delete: None,
            saving: false,
        }
    }

    /// Binds the editor to a freshly loaded game. Refused while a save is outstanding.
    pub fn load(&mut self, game: &Game) -> Result<(), EditorError> {
        if self.saving {
            return Err(EditorError::SaveInProgress);
        }
        self.clear(game);
        Ok(())
    }

    pub fn draft(&self) -> Option<&State> {
        self.draft.as_ref()
    }

    /// Stores the form's current content as the draft.
    pub fn replace_draft(&mut self, state: State) {
        self.draft = Some(state);
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn forms(&self) -> FormVisibility {
        self.forms
    }

    pub fn pending_delete(&self) -> Option<usize> {
        self.pending_delete
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// Starts a new state, blank or copied from the state at `source`.
    pub fn create(&mut self, game: &Game, source: Option<usize>) {
        self.forms.hide_all_rules();
        self.draft = Some(draft_state(game, source, &self.config.draft));
        self.selection = Selection::Creating;
        self.forms.state_form = true;
    }

    pub fn edit(&mut self, game: &Game, index: usize) -> Result<(), EditorError> {
        let state = game
            .state(index)
            .ok_or(EditorError::IndexOutOfRange { kind: "state", index })?;

        self.forms.hide_all_rules();
        self.draft = Some(state.clone());
        self.selection = Selection::Editing { index };
        self.forms.state_form = true;
        Ok(())
    }

    pub fn request_delete(&mut self, game: &Game, index: usize) -> Result<(), EditorError> {
        let state = game
            .state(index)
            .ok_or(EditorError::IndexOutOfRange { kind: "state", index })?;

        self.draft = Some(state.clone());
        self.selection = Selection::Idle;
        self.pending_delete = Some(index);
        self.forms.delete_popup = true;
        Ok(())
    }

    /// Closes the delete popup and returns the index that was confirmed.
    ///
    /// The state endpoint has no delete operation; the graph itself is left
    /// untouched and the caller decides what to do with the index.
    pub fn confirm_delete(&mut self, game: &Game) -> Option<usize> {
        let index = self.pending_delete.take();
        self.forms.delete_popup = false;
        self.clear_request(game);
        index
    }

    /// Closes the delete popup without confirming.
    pub fn cancel(&mut self, game: &Game) {
        self.pending_delete = None;
        self.forms.delete_popup = false;
        self.clear_request(game);
    }

    pub fn show_form(&mut self, form: RuleForm) {
        self.forms.show_rule(form);
    }

    pub fn hide_all_rules(&mut self) {
        self.forms.hide_all_rules();
    }

    pub fn hide_all(&mut self) {
        self.forms.hide_all();
    }

    /// Drops the draft and selection, leaving panels as they are.
    pub fn clear_request(&mut self, game: &Game) {
        self.draft = Some(draft_state(game, None, &self.config.draft));
        self.selection = Selection::Idle;
    }

    pub fn clear(&mut self, game: &Game) {
        self.clear_request(game);
        self.pending_delete = None;
        self.hide_all();
    }

    fn draft_mut(&mut self) -> Result<&mut State, EditorError> {
        self.draft
            .as_mut()
            .ok_or(EditorError::NothingSelected { kind: "state" })
    }

    pub fn add_statement_rule(
        &mut self,
        rule: StatementRule,
        ctx: &EditorContext<'_>,
    ) -> Result<(), EditorError> {
        self.draft_mut()?.statement_rules.push(rule);
        ctx.app.set_app_alerts(vec![Alert::success(RULE_ADDED)]);
        Ok(())
    }

    pub fn remove_statement_rule(&mut self, index: usize) -> Result<StatementRule, EditorError> {
        let rules = &mut self.draft_mut()?.statement_rules;
        if index >= rules.len() {
            return Err(EditorError::IndexOutOfRange {
                kind: "statement rule",
                index,
            });
        }
        Ok(rules.remove(index))
    }

    /// Replaces the state's exit with a conditional branch.
    pub fn set_conditional_rule(
        &mut self,
        rule: ConditionalRule,
        ctx: &EditorContext<'_>,
    ) -> Result<(), EditorError> {
        self.draft_mut()?.set_conditional_rule(rule);
        ctx.app.set_app_alerts(vec![Alert::success(RULE_ADDED)]);
        Ok(())
    }

    /// Replaces the state's exit with a plain transition.
    pub fn set_transition(
        &mut self,
        transition: Transition,
        ctx: &EditorContext<'_>,
    ) -> Result<(), EditorError> {
        self.draft_mut()?.set_transition(transition);
        ctx.app.set_app_alerts(vec![Alert::success(RULE_ADDED)]);
        Ok(())
    }

    /// Effect rules have no slot on a state yet; the rule is only acknowledged.
    pub fn add_effect_rule(
        &mut self,
        rule: EffectRule,
        ctx: &EditorContext<'_>,
    ) -> Result<(), EditorError> {
        self.draft_mut()?;
        log::debug!("effect rule {:?} acknowledged, not attached", rule.effect);
        ctx.app.set_app_alerts(vec![Alert::success(RULE_ADDED)]);
        Ok(())
    }

    pub fn validate(&self) -> Vec<ValidationIssue> {
        validate_state(self.draft.as_ref(), &self.config)
    }

    pub fn prepare_save(&mut self, ctx: &EditorContext<'_>) -> Result<PendingState, SaveError> {
        if self.saving {
            return Err(reject_busy(ctx));
        }
        if self.pending_delete.is_some() {
            let error = EditorError::DeletePending;
            ctx.alert_all([error.to_string()]);
            return Err(error.into());
        }

        let issues = self.validate();
        if !issues.is_empty() {
            return Err(reject_invalid(ctx, issues));
        }

        let draft = self
            .draft
            .clone()
            .ok_or(EditorError::NothingSelected { kind: "state" })?;
        let target = SaveTarget::for_selection(self.selection);
        log::info!("saving state {:?} ({target:?})", draft.label);

        self.saving = true;
        ctx.app.set_global_loading(true);
        Ok(PendingState { draft, target })
    }

    pub fn settle_save(
        &mut self,
        game: &mut Game,
        pending: PendingState,
        result: Result<State, ApiError>,
        ctx: &EditorContext<'_>,
    ) -> Result<State, SaveError> {
        self.saving = false;
        let saved = result.map_err(|error| report_remote_failure(ctx, error))?;

        let message = match pending.target {
            SaveTarget::Create => "State Created",
            SaveTarget::Update { .. } => "State Updated",
        };
        let target_id = pending.draft.id.clone();
        store_saved(&mut game.states, pending.target, saved.clone(), |state| {
            state.id.is_some() && state.id == target_id
        });
        self.clear_request(game);

        ctx.app.set_global_loading(false);
        ctx.app.set_app_alerts(vec![Alert::success(message)]);
        ctx.games.set_game(game.clone());
        Ok(saved)
    }

    pub async fn save<A>(
        &mut self,
        game: &mut Game,
        api: &A,
        ctx: &EditorContext<'_>,
    ) -> Result<State, SaveError>
    where
        A: StateApi + ?Sized,
    {
        let pending = self.prepare_save(ctx)?;
        let result = pending.dispatch(api).await;
        self.settle_save(game, pending, result, ctx)
    }
}
