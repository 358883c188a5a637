//! `CardApi` / `StateApi` over the browser `fetch` API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_wasm_bindgen::from_value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use super::{ApiError, CardApi, StateApi};
use crate::model::{Card, Game, State};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
    Put,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchClient {
    base_url: String,
}

impl FetchClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        log::debug!("{} {}", method.as_str(), url);

        let init = RequestInit::new();
        init.set_method(method.as_str());
        init.set_mode(RequestMode::Cors);
        if let Some(body) = body {
            let json = serde_json::to_string(body).map_err(|err| ApiError::Decode(err.to_string()))?;
            init.set_body(&JsValue::from_str(&json));
        }

        let request = Request::new_with_str_and_init(&url, &init).map_err(transport_error)?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(transport_error)?;
        request
            .headers()
            .set("Accept", "application/json")
            .map_err(transport_error)?;

        let window = web_sys::window().ok_or_else(|| ApiError::Transport("no window".into()))?;
        let response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport_error)?;
        let response: Response = response.dyn_into().map_err(transport_error)?;

        let payload = match response.json() {
            Ok(promise) => JsFuture::from(promise).await.unwrap_or(JsValue::NULL),
            Err(_) => JsValue::NULL,
        };

        if !response.ok() {
            let payload: serde_json::Value = from_value(payload).unwrap_or(serde_json::Value::Null);
            log::warn!("{} {} failed with {}", method.as_str(), url, response.status());
            return Err(ApiError::rejected(response.status(), payload));
        }

        from_value(payload).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

fn transport_error(value: JsValue) -> ApiError {
    ApiError::Transport(
        value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}")),
    )
}

fn id_path(kind: &'static str, id: Option<&str>) -> Result<String, ApiError> {
    let id = id.ok_or(ApiError::MissingId(kind))?;
    Ok(format!("{kind}s/{id}"))
}

#[async_trait(?Send)]
impl CardApi for FetchClient {
    async fn pull_cards(&self, game: &mut Game) -> Result<(), ApiError> {
        for deck in &mut game.decks {
            let Some(deck_id) = deck.id.as_deref() else {
                continue;
            };
            let path = format!("decks/{deck_id}/cards");
            deck.cards = self.send::<(), Vec<Card>>(Method::Get, &path, None).await?;
        }
        Ok(())
    }

    async fn create_card(&self, card: &Card) -> Result<Card, ApiError> {
        self.send(Method::Post, "cards", Some(card)).await
    }

    async fn update_card(&self, card: &Card) -> Result<Card, ApiError> {
        let path = id_path("card", card.id.as_deref())?;
        self.send(Method::Put, &path, Some(card)).await
    }
}

#[async_trait(?Send)]
impl StateApi for FetchClient {
    async fn create_state(&self, state: &State) -> Result<State, ApiError> {
        self.send(Method::Post, "states", Some(state)).await
    }

    async fn update_state(&self, state: &State) -> Result<State, ApiError> {
        let path = id_path("state", state.id.as_deref())?;
        self.send(Method::Put, &path, Some(state)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_cleanly() {
        let client = FetchClient::new("https://rules.example/api/");
        assert_eq!(client.url("/states"), "https://rules.example/api/states");
        assert_eq!(client.url("cards/c1"), "https://rules.example/api/cards/c1");
    }

    #[test]
    fn updates_need_an_identity() {
        assert_eq!(id_path("state", Some("s1")).as_deref(), Ok("states/s1"));
        assert!(id_path("card", None).is_err());
    }
}
