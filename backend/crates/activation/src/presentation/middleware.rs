//! Activation Middleware
//!
//! Gates routes behind a valid activation with uses left.
//! `consume_activation` reserves one use before the wrapped route runs and
//! gives it back when the route answers with anything but a 2xx status, so
//! concurrent requests can never run more generations than there are uses.

use crate::application::ledger::ActivationLedger;
use crate::domain::repository::KeyValueStore;
use crate::error::{ActivationError, ActivationResult};
use crate::infra::scoped::DeviceScopedStore;
use crate::presentation::handlers::ActivationAppState;
use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use kernel::clock::Clock;

/// Middleware that requires a valid activation with uses left
pub async fn require_activation<S, C>(
    State(state): State<ActivationAppState<S, C>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
    C: Clock + ?Sized + 'static,
{
    if let Err(e) = gate(&state, &req) {
        return e.into_response();
    }
    next.run(req).await
}

/// Middleware that spends one use up front and refunds it on failure
pub async fn consume_activation<S, C>(
    State(state): State<ActivationAppState<S, C>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    S: KeyValueStore + ?Sized + 'static,
    C: Clock + ?Sized + 'static,
{
    let ledger = match gate(&state, &req) {
        Ok(ledger) => ledger,
        Err(e) => return e.into_response(),
    };

    if !ledger.use_once() {
        // Another request took the last use since the gate check
        return denial(&ledger).into_response();
    }

    let response = next.run(req).await;

    if !response.status().is_success() && !ledger.refund_use() {
        tracing::warn!(
            status = %response.status(),
            "Generation failed but the reserved activation use could not be refunded"
        );
    }

    response
}

fn gate<S, C>(
    state: &ActivationAppState<S, C>,
    req: &Request<Body>,
) -> ActivationResult<ActivationLedger<DeviceScopedStore<S>, C>>
where
    S: KeyValueStore + ?Sized + 'static,
    C: Clock + ?Sized + 'static,
{
    let headers = req.headers();
    let (device_id, is_new) = state.resolve_device(headers);
    if is_new {
        tracing::debug!("No device cookie on gated route");
        return Err(ActivationError::NotActivated);
    }

    let ledger = state.ledger(device_id, headers)?;
    match ledger.current_code_info() {
        Some(info) if info.remaining_uses > 0 => Ok(ledger),
        _ => Err(denial(&ledger)),
    }
}

fn denial<S, C>(ledger: &ActivationLedger<S, C>) -> ActivationError
where
    S: KeyValueStore + ?Sized,
    C: Clock + ?Sized,
{
    match ledger.current_code_info() {
        None => ActivationError::NotActivated,
        Some(_) => ActivationError::Exhausted,
    }
}
