pub mod api;
pub mod config;
pub mod editor;
pub mod model;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod testing;

use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::{Function, Promise};

pub use api::{
    get_errors, Alert, AlertKind, ApiError, AppService, AppStatus, CardApi, FetchClient,
    GameService, GameStore, StateApi,
};
pub use config::{DraftDefaults, EditorConfig};
pub use editor::{
    CardEditor, EditorContext, EditorError, FormVisibility, PendingCard, PendingState, RuleForm,
    SaveError, SaveTarget, Selection, StateEditor,
};
pub use model::{
    draft_card, draft_state, Card, CardBack, CardFront, Comparator, ConditionalRule, Deck,
    EffectRule, EntityId, Game, Operation, State, StatementRule, Transition,
};
pub use validation::{validate_card, validate_state, ValidationIssue};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    utils::init(log::LevelFilter::Info);
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn to_js_error<E: Serialize + std::fmt::Display>(error: E) -> JsValue {
    to_value(&error).unwrap_or_else(|_| JsValue::from_str(&error.to_string()))
}

/// Rejections carry the list of messages already shown as alerts.
fn save_to_js_error(error: SaveError) -> JsValue {
    let messages = error.messages();
    to_value(&messages).unwrap_or_else(|_| JsValue::from_str(&error.to_string()))
}

fn api_to_js_error(error: ApiError) -> JsValue {
    save_to_js_error(SaveError::Remote(error))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(serde_to_js_error)
}

fn from_json<T: DeserializeOwned>(json: &str) -> Result<T, JsValue> {
    serde_json::from_str(json).map_err(serde_to_js_error)
}

fn index(value: u32) -> usize {
    value as usize
}

struct Session {
    game: Game,
    states: StateEditor,
    cards: CardEditor,
    app: AppStatus,
    store: GameStore,
    api: FetchClient,
}

impl Session {
    fn new(game: Game, config: EditorConfig) -> Result<Self, EditorError> {
        let mut session = Self {
            states: StateEditor::new(config.clone()),
            cards: CardEditor::new(config.clone()),
            app: AppStatus::new(),
            store: GameStore::with_game(game.clone()),
            api: FetchClient::new(config.api_base_url.clone()),
            game,
        };
        session.load_editors()?;
        Ok(session)
    }

    fn split(&mut self) -> (&mut Game, &mut StateEditor, &mut CardEditor, EditorContext<'_>) {
        let ctx = EditorContext::new(&self.app, &self.store);
        (&mut self.game, &mut self.states, &mut self.cards, ctx)
    }

    fn load_editors(&mut self) -> Result<(), EditorError> {
        let (game, states, cards, ctx) = self.split();
        states.load(game)?;
        cards.load(game, &ctx)
    }
}

/// Editor session exported to the host page.
///
/// Listeners registered with `on_game_change` run while the session is busy
/// and must not call back into it synchronously.
#[wasm_bindgen]
pub struct EditorSession {
    inner: Rc<RefCell<Session>>,
}

#[wasm_bindgen]
impl EditorSession {
    #[wasm_bindgen(constructor)]
    pub fn new(
        game_json: Option<String>,
        config_json: Option<String>,
    ) -> Result<EditorSession, JsValue> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json).map_err(serde_to_js_error)?,
            None => EditorConfig::default(),
        };
        let game = match game_json {
            Some(json) => from_json(&json)?,
            None => Game::sample(),
        };
        log::set_max_level(config.log_level());
        log::info!("opening game {:?} with {} decks", game.id, game.decks.len());
        let session = Session::new(game, config).map_err(to_js_error)?;
        Ok(EditorSession {
            inner: Rc::new(RefCell::new(session)),
        })
    }

    pub fn game_json(&self) -> Result<String, JsValue> {
        to_json(&self.inner.borrow().game)
    }

    /// Swaps in a different game and resets both editors. Refused mid-save.
    pub fn set_game_json(&mut self, json: &str) -> Result<(), JsValue> {
        let game: Game = from_json(json)?;
        let mut session = self.inner.borrow_mut();
        if session.states.is_saving() || session.cards.is_saving() {
            return Err(to_js_error(EditorError::SaveInProgress));
        }
        session.game = game;
        session.load_editors().map_err(to_js_error)?;
        let game = session.game.clone();
        session.store.set_game(game);
        Ok(())
    }

    pub fn on_game_change(&self, callback: Function) {
        let listener = move |game: &Game| match serde_json::to_string(game) {
            Ok(json) => {
                if let Err(error) = callback.call1(&JsValue::NULL, &JsValue::from_str(&json)) {
                    log::warn!("game listener failed: {error:?}");
                }
            }
            Err(error) => log::warn!("could not serialize game for listener: {error}"),
        };
        self.inner.borrow().store.subscribe(Box::new(listener));
    }

    pub fn is_loading(&self) -> bool {
        self.inner.borrow().app.is_loading()
    }

    /// Returns and clears the alerts raised since the last call.
    pub fn take_alerts_json(&self) -> Result<String, JsValue> {
        to_json(&self.inner.borrow().app.take_alerts())
    }

    pub fn state_draft_json(&self) -> Result<String, JsValue> {
        to_json(&self.inner.borrow().states.draft())
    }

    pub fn set_state_draft_json(&mut self, json: &str) -> Result<(), JsValue> {
        let state: State = from_json(json)?;
        self.inner.borrow_mut().states.replace_draft(state);
        Ok(())
    }

    pub fn state_selection_json(&self) -> Result<String, JsValue> {
        to_json(&self.inner.borrow().states.selection())
    }

    pub fn forms_json(&self) -> Result<String, JsValue> {
        to_json(&self.inner.borrow().states.forms())
    }

    pub fn create_state(&mut self, source: Option<u32>) {
        let mut session = self.inner.borrow_mut();
        let (game, states, _, _) = session.split();
        states.create(game, source.map(index));
    }

    pub fn edit_state(&mut self, state_index: u32) -> Result<(), JsValue> {
        let mut session = self.inner.borrow_mut();
        let (game, states, _, _) = session.split();
        states.edit(game, index(state_index)).map_err(to_js_error)
    }

    pub fn request_delete_state(&mut self, state_index: u32) -> Result<(), JsValue> {
        let mut session = self.inner.borrow_mut();
        let (game, states, _, _) = session.split();
        states
            .request_delete(game, index(state_index))
            .map_err(to_js_error)
    }

    pub fn confirm_delete_state(&mut self) -> Option<u32> {
        let mut session = self.inner.borrow_mut();
        let (game, states, _, _) = session.split();
        states
            .confirm_delete(game)
            .and_then(|confirmed| u32::try_from(confirmed).ok())
    }

    pub fn cancel_delete_state(&mut self) {
        let mut session = self.inner.borrow_mut();
        let (game, states, _, _) = session.split();
        states.cancel(game);
    }

    pub fn show_rule_form(&mut self, name: &str) -> Result<(), JsValue> {
        let form: RuleForm = name
            .parse()
            .map_err(|()| JsValue::from_str(&format!("unknown rule form: {name}")))?;
        self.inner.borrow_mut().states.show_form(form);
        Ok(())
    }

    pub fn hide_all_rules(&mut self) {
        self.inner.borrow_mut().states.hide_all_rules();
    }

    pub fn hide_all_forms(&mut self) {
        self.inner.borrow_mut().states.hide_all();
    }

    pub fn clear_state_request(&mut self) {
        let mut session = self.inner.borrow_mut();
        let (game, states, _, _) = session.split();
        states.clear_request(game);
    }

    pub fn clear_state(&mut self) {
        let mut session = self.inner.borrow_mut();
        let (game, states, _, _) = session.split();
        states.clear(game);
    }

    pub fn add_statement_rule_json(&mut self, json: &str) -> Result<(), JsValue> {
        let rule: StatementRule = from_json(json)?;
        let mut session = self.inner.borrow_mut();
        let (_, states, _, ctx) = session.split();
        states.add_statement_rule(rule, &ctx).map_err(to_js_error)
    }

    pub fn remove_statement_rule(&mut self, rule_index: u32) -> Result<String, JsValue> {
        let removed = self
            .inner
            .borrow_mut()
            .states
            .remove_statement_rule(index(rule_index))
            .map_err(to_js_error)?;
        to_json(&removed)
    }

    pub fn set_conditional_rule_json(&mut self, json: &str) -> Result<(), JsValue> {
        let rule: ConditionalRule = from_json(json)?;
        let mut session = self.inner.borrow_mut();
        let (_, states, _, ctx) = session.split();
        states.set_conditional_rule(rule, &ctx).map_err(to_js_error)
    }

    pub fn set_transition_json(&mut self, json: &str) -> Result<(), JsValue> {
        let transition: Transition = from_json(json)?;
        let mut session = self.inner.borrow_mut();
        let (_, states, _, ctx) = session.split();
        states.set_transition(transition, &ctx).map_err(to_js_error)
    }

    pub fn add_effect_rule_json(&mut self, json: &str) -> Result<(), JsValue> {
        let rule: EffectRule = from_json(json)?;
        let mut session = self.inner.borrow_mut();
        let (_, states, _, ctx) = session.split();
        states.add_effect_rule(rule, &ctx).map_err(to_js_error)
    }

    /// Validation messages for the state draft; empty when it can be saved.
    pub fn validate_state_json(&self) -> Result<String, JsValue> {
        let issues = self.inner.borrow().states.validate();
        to_json(&validation::messages(&issues))
    }

    /// Resolves with the saved state as JSON, rejects with the alert messages.
    pub fn save_state(&self) -> Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let (pending, api) = {
                let mut session = inner.borrow_mut();
                let (_, states, _, ctx) = session.split();
                let pending = states.prepare_save(&ctx).map_err(save_to_js_error)?;
                (pending, session.api.clone())
            };

            let result = pending.dispatch(&api).await;

            let mut session = inner.borrow_mut();
            let (game, states, _, ctx) = session.split();
            let saved = states
                .settle_save(game, pending, result, &ctx)
                .map_err(save_to_js_error)?;
            Ok(JsValue::from_str(&to_json(&saved)?))
        })
    }

    pub fn deck_index(&self) -> Option<u32> {
        self.inner
            .borrow()
            .cards
            .deck_index()
            .and_then(|deck| u32::try_from(deck).ok())
    }

    pub fn select_deck(&mut self, deck_index: u32) -> Result<(), JsValue> {
        let mut session = self.inner.borrow_mut();
        let (game, _, cards, ctx) = session.split();
        cards
            .select_deck(game, index(deck_index), &ctx)
            .map_err(to_js_error)
    }

    pub fn card_draft_json(&self) -> Result<String, JsValue> {
        to_json(self.inner.borrow().cards.draft())
    }

    pub fn set_card_draft_json(&mut self, json: &str) -> Result<(), JsValue> {
        let card: Card = from_json(json)?;
        self.inner.borrow_mut().cards.replace_draft(card);
        Ok(())
    }

    pub fn card_selection_json(&self) -> Result<String, JsValue> {
        to_json(&self.inner.borrow().cards.selection())
    }

    /// `undefined` starts a blank card.
    pub fn select_card(&mut self, card_index: Option<u32>) -> Result<(), JsValue> {
        let mut session = self.inner.borrow_mut();
        let (game, _, cards, _) = session.split();
        cards
            .select_card(game, card_index.map(index))
            .map_err(to_js_error)
    }

    pub fn create_card_from(&mut self, card_index: u32) -> Result<(), JsValue> {
        let mut session = self.inner.borrow_mut();
        let (game, _, cards, _) = session.split();
        cards
            .create_from(game, index(card_index))
            .map_err(to_js_error)
    }

    pub fn delete_card(&mut self, card_index: u32) -> Result<String, JsValue> {
        let mut session = self.inner.borrow_mut();
        let (game, _, cards, _) = session.split();
        let removed = cards
            .delete_card(game, index(card_index))
            .map_err(to_js_error)?;
        to_json(&removed)
    }

    /// Turns the card over and reports whether the back is now showing.
    pub fn flip_card(&mut self) -> bool {
        let mut session = self.inner.borrow_mut();
        session.cards.flip();
        session.cards.showing_back()
    }

    pub fn validate_card_json(&self) -> Result<String, JsValue> {
        let session = self.inner.borrow();
        let issues = session
            .cards
            .validate(&session.game)
            .map_err(to_js_error)?;
        to_json(&validation::messages(&issues))
    }

    /// Resolves with the saved card as JSON, rejects with the alert messages.
    pub fn save_card(&self) -> Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let (pending, api) = {
                let mut session = inner.borrow_mut();
                let (game, _, cards, ctx) = session.split();
                let pending = cards.prepare_save(game, &ctx).map_err(save_to_js_error)?;
                (pending, session.api.clone())
            };

            let result = pending.dispatch(&api).await;

            let mut session = inner.borrow_mut();
            let (game, _, cards, ctx) = session.split();
            let saved = cards
                .settle_save(game, pending, result, &ctx)
                .map_err(save_to_js_error)?;
            Ok(JsValue::from_str(&to_json(&saved)?))
        })
    }

    /// Pulls the cards of every deck from the API.
    pub fn init_cards(&self) -> Promise {
        let inner = Rc::clone(&self.inner);
        future_to_promise(async move {
            let (mut snapshot, api) = {
                let session = inner.borrow();
                let ctx = EditorContext::new(&session.app, &session.store);
                session.cards.begin_pull(&ctx);
                (session.game.clone(), session.api.clone())
            };

            let pulled = api.pull_cards(&mut snapshot).await.map(|()| snapshot);

            let mut session = inner.borrow_mut();
            let (game, _, cards, ctx) = session.split();
            cards
                .finish_pull(game, pulled, &ctx)
                .map_err(api_to_js_error)?;
            Ok(JsValue::UNDEFINED)
        })
    }
}

/// A sample game, handy for front-end bootstrapping.
#[wasm_bindgen(js_name = "createSampleGame")]
pub fn create_sample_game() -> Result<JsValue, JsValue> {
    to_value(&Game::sample()).map_err(JsValue::from)
}

/// Normalizes an API error payload into alert messages.
#[wasm_bindgen(js_name = "getErrors")]
pub fn get_errors_js(payload: JsValue) -> Result<JsValue, JsValue> {
    let payload: serde_json::Value = from_value(payload).map_err(JsValue::from)?;
    to_value(&get_errors(&payload)).map_err(JsValue::from)
}

/// Checks a card against its deck's schema and returns the messages found.
#[wasm_bindgen(js_name = "validateCard")]
pub fn validate_card_js(
    card: JsValue,
    deck: JsValue,
    config: JsValue,
) -> Result<JsValue, JsValue> {
    let card: Card = from_value(card).map_err(JsValue::from)?;
    let deck: Deck = from_value(deck).map_err(JsValue::from)?;
    let config = if config.is_undefined() || config.is_null() {
        EditorConfig::default()
    } else {
        from_value(config).map_err(JsValue::from)?
    };
    let issues = validate_card(&card, &deck, &config);
    to_value(&validation::messages(&issues)).map_err(JsValue::from)
}
