//! Backend gateway: the three JSON-over-HTTP exchanges with the simulation server.
//!
//! Each call is one fetch with an abort timer; anything other than a 2xx
//! response carrying a valid body becomes a [`TransportError`], tagged with
//! the operation by [`ClientError`].

use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, Request, RequestInit, Response};

use crate::config::{COMPARE_PATH, ClientConfig, INIT_PATH, STEP_PATH};
use crate::error::{ClientError, TransportError};
use crate::model::{AgentType, ComparisonResult, InitRequest, SimulationSnapshot};

#[derive(Clone, Debug, PartialEq)]
pub struct HttpGateway {
    config: ClientConfig,
}

impl HttpGateway {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `POST /init` with the chosen agent type. The tag is passed through
    /// unvalidated; `hint` decodes a response that omits `agent_type`.
    pub async fn initialize(
        &self,
        agent_type: &str,
        hint: Option<AgentType>,
    ) -> Result<SimulationSnapshot, ClientError> {
        let body = serde_json::to_string(&InitRequest { agent_type })
            .map_err(|e| ClientError::Init(TransportError::Network(e.to_string())))?;
        let text = self
            .exchange("POST", INIT_PATH, Some(&body))
            .await
            .map_err(ClientError::Init)?;
        SimulationSnapshot::from_json(&text, hint).map_err(|e| ClientError::Init(e.into()))
    }

    /// `POST /step` with no body.
    pub async fn step(&self, hint: Option<AgentType>) -> Result<SimulationSnapshot, ClientError> {
        let text = self
            .exchange("POST", STEP_PATH, None)
            .await
            .map_err(ClientError::Step)?;
        SimulationSnapshot::from_json(&text, hint).map_err(|e| ClientError::Step(e.into()))
    }

    /// `POST /compare` with no body.
    pub async fn compare(&self) -> Result<ComparisonResult, ClientError> {
        let text = self
            .exchange("POST", COMPARE_PATH, None)
            .await
            .map_err(ClientError::Compare)?;
        ComparisonResult::from_json(&text).map_err(|e| ClientError::Compare(e.into()))
    }

    async fn exchange(
        &self,
        method: &str,
        path: &str,
        body: Option<&str>,
    ) -> Result<String, TransportError> {
        let window = web_sys::window().ok_or(TransportError::NoWindow)?;
        let url = self.config.endpoint(path);
        debug!(method, %url, "sending request");

        let controller = AbortController::new().map_err(js_message)?;
        let init = RequestInit::new();
        init.set_method(method);
        init.set_signal(Some(&controller.signal()));
        if let Some(body) = body {
            let headers = Headers::new().map_err(js_message)?;
            headers
                .set("Content-Type", "application/json")
                .map_err(js_message)?;
            init.set_headers(&headers);
            init.set_body(&wasm_bindgen::JsValue::from_str(body));
        }
        let request = Request::new_with_str_and_init(&url, &init).map_err(js_message)?;

        let abort = {
            let controller = controller.clone();
            Closure::<dyn FnMut()>::new(move || controller.abort())
        };
        let timeout_ms = self.config.request_timeout_ms;
        let timer = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                abort.as_ref().unchecked_ref(),
                i32::try_from(timeout_ms).unwrap_or(i32::MAX),
            )
            .ok();

        let result = Self::fetch_text(&window, &request).await;
        if let Some(id) = timer {
            window.clear_timeout_with_handle(id);
        }
        drop(abort);

        match result {
            Err(_) if controller.signal().aborted() => {
                warn!(method, %url, timeout_ms, "request timed out");
                Err(TransportError::Timeout(timeout_ms))
            }
            Err(e) => {
                warn!(method, %url, error = %e, "request failed");
                Err(e)
            }
            Ok(text) => Ok(text),
        }
    }

    async fn fetch_text(window: &web_sys::Window, request: &Request) -> Result<String, TransportError> {
        let value = JsFuture::from(window.fetch_with_request(request))
            .await
            .map_err(js_message)?;
        let response: Response = value.dyn_into().map_err(js_message)?;
        if !response.ok() {
            return Err(TransportError::Status(response.status()));
        }
        let text = JsFuture::from(response.text().map_err(js_message)?)
            .await
            .map_err(js_message)?;
        text.as_string()
            .ok_or_else(|| TransportError::Network("response body is not text".into()))
    }
}

fn js_message(value: wasm_bindgen::JsValue) -> TransportError {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    TransportError::Network(message)
}
