//! HTTP Handlers

use crate::application::clear_activation::ClearActivationUseCase;
use crate::application::config::ActivationConfig;
use crate::application::ledger::ActivationLedger;
use crate::domain::code_table::CodeTable;
use crate::domain::repository::KeyValueStore;
use crate::domain::value_objects::DeviceFingerprint;
use crate::error::{ActivationError, ActivationResult};
use crate::infra::scoped::DeviceScopedStore;
use crate::presentation::dto::{ActivateRequest, StatusResponse, UseResponse};
use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use kernel::clock::Clock;
use kernel::id::DeviceId;
use platform::client::{extract_client_ip, extract_device_traits};
use platform::cookie::read_cookie;
use std::sync::Arc;

/// Shared state for activation handlers and middleware
pub struct ActivationAppState<S, C>
where
    S: KeyValueStore + ?Sized + 'static,
    C: Clock + ?Sized + 'static,
{
    pub store: Arc<S>,
    pub clock: Arc<C>,
    pub config: Arc<ActivationConfig>,
    pub codes: Arc<CodeTable>,
}

impl<S, C> Clone for ActivationAppState<S, C>
where
    S: KeyValueStore + ?Sized + 'static,
    C: Clock + ?Sized + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            clock: self.clock.clone(),
            config: self.config.clone(),
            codes: self.codes.clone(),
        }
    }
}

impl<S, C> ActivationAppState<S, C>
where
    S: KeyValueStore + ?Sized + 'static,
    C: Clock + ?Sized + 'static,
{
    /// State using the built-in code table
    pub fn new(store: Arc<S>, clock: Arc<C>, config: ActivationConfig) -> Self {
        Self {
            store,
            clock,
            config: Arc::new(config),
            codes: CodeTable::builtin(),
        }
    }

    /// Device id from the cookie, or a fresh one (`true` when fresh)
    pub fn resolve_device(&self, headers: &HeaderMap) -> (DeviceId, bool) {
        read_cookie(headers, &self.config.device_cookie_name)
            .and_then(|raw| raw.parse::<DeviceId>().ok())
            .map(|id| (id, false))
            .unwrap_or_else(|| (DeviceId::new(), true))
    }

    /// Ledger bound to one device and its current fingerprint
    pub fn ledger(
        &self,
        device_id: DeviceId,
        headers: &HeaderMap,
    ) -> ActivationResult<ActivationLedger<DeviceScopedStore<S>, C>> {
        let traits = extract_device_traits(headers)?;
        Ok(ActivationLedger::new(
            Arc::new(DeviceScopedStore::new(self.store.clone(), device_id)),
            self.clock.clone(),
            self.config.clone(),
            self.codes.clone(),
            DeviceFingerprint::from_traits(&traits),
        ))
    }
}

/// POST /api/activation/activate
pub async fn activate<S, C>(
    State(state): State<ActivationAppState<S, C>>,
    headers: HeaderMap,
    Json(req): Json<ActivateRequest>,
) -> ActivationResult<Response>
where
    S: KeyValueStore + ?Sized + 'static,
    C: Clock + ?Sized + 'static,
{
    let (device_id, is_new) = state.resolve_device(&headers);
    let ledger = state.ledger(device_id, &headers)?;

    let outcome = ledger.activate_code(&req.code);

    tracing::info!(
        device_id = %device_id,
        client_ip = ?extract_client_ip(&headers, None),
        success = outcome.success,
        "Activation attempt"
    );

    let mut response = Json(outcome).into_response();
    if is_new {
        let cookie = state
            .config
            .device_cookie()
            .header_value(&device_id.to_string())
            .map_err(|e| ActivationError::Internal(e.to_string()))?;
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    Ok(response)
}

/// GET /api/activation/status
pub async fn status<S, C>(
    State(state): State<ActivationAppState<S, C>>,
    headers: HeaderMap,
) -> ActivationResult<Json<StatusResponse>>
where
    S: KeyValueStore + ?Sized + 'static,
    C: Clock + ?Sized + 'static,
{
    let (device_id, _) = state.resolve_device(&headers);
    let info = state.ledger(device_id, &headers)?.current_code_info();

    Ok(Json(StatusResponse {
        activated: info.is_some(),
        remaining_uses: info.as_ref().map_or(0, |i| i.remaining_uses),
        code: info.map(|i| i.code),
    }))
}

/// POST /api/activation/use
pub async fn use_once<S, C>(
    State(state): State<ActivationAppState<S, C>>,
    headers: HeaderMap,
) -> ActivationResult<Json<UseResponse>>
where
    S: KeyValueStore + ?Sized + 'static,
    C: Clock + ?Sized + 'static,
{
    let (device_id, _) = state.resolve_device(&headers);
    let ledger = state.ledger(device_id, &headers)?;

    let consumed = ledger.use_once();

    Ok(Json(UseResponse {
        consumed,
        remaining_uses: ledger.remaining_uses(),
    }))
}

/// POST /api/activation/clear
pub async fn clear<S, C>(
    State(state): State<ActivationAppState<S, C>>,
    headers: HeaderMap,
) -> ActivationResult<StatusCode>
where
    S: KeyValueStore + ?Sized + 'static,
    C: Clock + ?Sized + 'static,
{
    let (device_id, is_new) = state.resolve_device(&headers);
    if !is_new {
        // Clearing does not depend on the fingerprint
        ClearActivationUseCase::new(Arc::new(DeviceScopedStore::new(
            state.store.clone(),
            device_id,
        )))
        .execute();
    }
    Ok(StatusCode::NO_CONTENT)
}
