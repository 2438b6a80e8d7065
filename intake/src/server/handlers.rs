//! HTTP handlers for the order-session API.
//!
//! Every action handler dispatches one [`SessionAction`] through the
//! session's store and answers with the post-action [`SessionView`], so
//! clients always render exactly what the session holds. Because the store
//! runs effects to completion per action, the returned view already reflects
//! lookup and commit outcomes.

use crate::catalog::{Catalog, ProductKind};
use crate::server::error::AppError;
use crate::server::state::AppState;
use crate::session::types::{
    ConfirmState, InputState, ItemDetails, LineItem, OrderDraft, SessionPhase,
};
use crate::session::SessionAction;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

// ===== Request DTOs =====

/// Login request body
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Entered user id
    pub user_id: String,
    /// Entered password
    pub password: String,
}

/// Address lookup request body
#[derive(Debug, Clone, Deserialize)]
pub struct LookupRequest {
    /// Postal code as typed
    pub postal_code: String,
}

/// Submit request body
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    /// The candidate form
    pub form: OrderFormDto,
}

/// Candidate form as posted by the client
#[derive(Debug, Clone, Deserialize)]
pub struct OrderFormDto {
    /// Customer name
    pub name: String,
    /// Postal code as typed
    pub postal_code: String,
    /// Street address
    pub address: String,
    /// Phone number
    #[serde(default)]
    pub phone: String,
    /// E-mail address
    #[serde(default)]
    pub email: String,
    /// Line items keyed by product key; omitted products default to zero
    #[serde(default)]
    pub items: HashMap<String, LineItemDto>,
}

/// One line item as posted by the client
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineItemDto {
    /// Ordered quantity
    #[serde(default)]
    pub quantity: u8,
    /// Size (simple products)
    pub size: Option<String>,
    /// Waist in centimetres (trousers)
    pub waist: Option<u8>,
    /// Inseam length (trousers)
    pub length: Option<String>,
    /// Free-text note
    pub memo: Option<String>,
}

impl OrderFormDto {
    /// Convert to a domain draft against the catalog.
    ///
    /// The catalog decides each item's variant shape; quantities are clamped
    /// by the domain constructor. Items for products the catalog does not
    /// know are rejected.
    fn into_draft(self, catalog: &Catalog) -> Result<OrderDraft, AppError> {
        if let Some(unknown) = self.items.keys().find(|key| catalog.get(key).is_none()) {
            return Err(AppError::bad_request(format!(
                "unknown product key: {unknown}"
            )));
        }

        let mut dtos = self.items;
        let items = catalog
            .iter()
            .map(|(key, spec)| {
                let dto = dtos.remove(key).unwrap_or_default();
                let details = match &spec.kind {
                    ProductKind::Simple { .. } => ItemDetails::Simple {
                        size: dto.size.unwrap_or_default(),
                        memo: dto.memo.unwrap_or_default(),
                    },
                    ProductKind::Trousers { .. } => ItemDetails::Trousers {
                        waist: dto.waist,
                        length: dto.length.unwrap_or_default(),
                        memo: dto.memo.unwrap_or_default(),
                    },
                };
                (key.to_string(), LineItem::new(dto.quantity, details))
            })
            .collect();

        Ok(OrderDraft {
            name: self.name,
            postal_code: self.postal_code,
            address: self.address,
            phone: self.phone,
            email: self.email,
            items,
        })
    }
}

// ===== View DTOs =====

/// One validation failure anchored to a field
#[derive(Debug, Clone, Serialize)]
pub struct FieldErrorView {
    /// Machine-readable field name
    pub field: &'static str,
    /// User-facing message
    pub message: String,
}

/// Lookup outcome notice
#[derive(Debug, Clone, Serialize)]
pub struct NoticeView {
    /// Display severity
    pub level: &'static str,
    /// User-facing message
    pub message: String,
}

/// One confirmed line item, label resolved through the catalog
#[derive(Debug, Clone, Serialize)]
pub struct LineView {
    /// Product key
    pub key: String,
    /// Display label
    pub label: String,
    /// Ordered quantity
    pub quantity: u8,
    /// Size (simple products)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// Waist (trousers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waist: Option<u8>,
    /// Inseam length (trousers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<String>,
    /// Free-text note
    pub memo: String,
}

/// Serializable rendering of the session phase
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionView {
    /// Awaiting credentials
    Login {
        /// Whether the last attempt was rejected
        failed: bool,
    },
    /// Collecting order fields
    Input {
        /// Current field values
        form: OrderDraft,
        /// Failures from the last rejected submit
        errors: Vec<FieldErrorView>,
        /// Outcome of the last lookup attempt
        lookup_notice: Option<NoticeView>,
        /// Whether a lookup is outstanding
        lookup_pending: bool,
        /// Derived total in yen
        total_yen: u64,
        /// Derived total, formatted
        total_display: String,
    },
    /// Reviewing the frozen draft
    Confirm {
        /// The frozen draft
        draft: OrderDraft,
        /// Items with quantity > 0, in catalog order
        lines: Vec<LineView>,
        /// Derived total in yen
        total_yen: u64,
        /// Derived total, formatted
        total_display: String,
        /// Message from the last failed persistence attempt
        store_error: Option<String>,
        /// Whether an insert is outstanding
        commit_pending: bool,
    },
    /// Order persisted
    Complete {
        /// Assigned receipt identifier
        receipt_id: String,
        /// When the store accepted the order (RFC 3339)
        completed_at: String,
    },
}

impl SessionView {
    /// Render a phase for clients
    #[must_use]
    pub fn from_phase(phase: &SessionPhase, catalog: &Catalog) -> Self {
        match phase {
            SessionPhase::Login { failed } => Self::Login { failed: *failed },
            SessionPhase::Input(input) => Self::input_view(input, catalog),
            SessionPhase::Confirm(confirm) => Self::confirm_view(confirm, catalog),
            SessionPhase::Complete {
                receipt_id,
                completed_at,
            } => Self::Complete {
                receipt_id: receipt_id.to_string(),
                completed_at: completed_at.to_rfc3339(),
            },
        }
    }

    fn input_view(input: &InputState, catalog: &Catalog) -> Self {
        let total = input.form.total_price(catalog);
        Self::Input {
            form: input.form.clone(),
            errors: input
                .errors
                .iter()
                .map(|failure| FieldErrorView {
                    field: failure.field(),
                    message: failure.to_string(),
                })
                .collect(),
            lookup_notice: input.lookup.notice.map(|notice| NoticeView {
                level: notice.level(),
                message: notice.to_string(),
            }),
            lookup_pending: input.lookup.in_flight,
            total_yen: total.yen(),
            total_display: total.to_string(),
        }
    }

    fn confirm_view(confirm: &ConfirmState, catalog: &Catalog) -> Self {
        let total = confirm.draft.total_price(catalog);
        let lines = catalog
            .iter()
            .filter_map(|(key, spec)| {
                confirm
                    .draft
                    .items
                    .get(key)
                    .filter(|item| item.quantity > 0)
                    .map(|item| {
                        let (size, waist, length) = match &item.details {
                            ItemDetails::Simple { size, .. } => (Some(size.clone()), None, None),
                            ItemDetails::Trousers { waist, length, .. } => {
                                (None, *waist, Some(length.clone()))
                            }
                        };
                        LineView {
                            key: key.to_string(),
                            label: spec.label.to_string(),
                            quantity: item.quantity,
                            size,
                            waist,
                            length,
                            memo: item.details.memo().to_string(),
                        }
                    })
            })
            .collect();

        Self::Confirm {
            draft: confirm.draft.clone(),
            lines,
            total_yen: total.yen(),
            total_display: total.to_string(),
            store_error: confirm.store_error.clone(),
            commit_pending: confirm.commit_in_flight,
        }
    }
}

/// Response wrapping a session id and its current view
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Session identifier for subsequent calls
    pub session_id: Uuid,
    /// Current session view
    pub view: SessionView,
}

// ===== Handlers =====

async fn dispatch(
    state: &AppState,
    id: Uuid,
    action: SessionAction,
) -> Result<Json<SessionResponse>, AppError> {
    let store = state
        .session(id)
        .await
        .ok_or_else(|| AppError::not_found("Session", id))?;

    store.send(action).await;

    let view = store
        .state(|phase| SessionView::from_phase(phase, state.catalog()))
        .await;
    Ok(Json(SessionResponse {
        session_id: id,
        view,
    }))
}

/// Create a new session.
///
/// # Endpoint
///
/// ```text
/// POST /api/sessions
/// ```
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<SessionResponse>) {
    let (id, store) = state.create_session().await;
    let view = store
        .state(|phase| SessionView::from_phase(phase, state.catalog()))
        .await;
    (
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id: id,
            view,
        }),
    )
}

/// Get the current session view.
///
/// # Endpoint
///
/// ```text
/// GET /api/sessions/:id
/// ```
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let store = state
        .session(id)
        .await
        .ok_or_else(|| AppError::not_found("Session", id))?;
    let view = store
        .state(|phase| SessionView::from_phase(phase, state.catalog()))
        .await;
    Ok(Json(SessionResponse {
        session_id: id,
        view,
    }))
}

/// Present the fixed credential pair.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    dispatch(
        &state,
        id,
        SessionAction::LogIn {
            user_id: request.user_id,
            password: request.password,
        },
    )
    .await
}

/// Resolve an address for a postal code.
pub async fn lookup_address(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<LookupRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    dispatch(
        &state,
        id,
        SessionAction::LookupAddress {
            postal_code: request.postal_code,
        },
    )
    .await
}

/// Validate the candidate form and freeze it for confirmation.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let form = request.form.into_draft(state.catalog())?;
    dispatch(&state, id, SessionAction::Submit { form }).await
}

/// Return from confirmation to input with every field re-seeded.
pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    dispatch(&state, id, SessionAction::Edit).await
}

/// Persist the frozen draft.
pub async fn confirm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    dispatch(&state, id, SessionAction::Commit).await
}

/// Discard the completed order and start a fresh one.
pub async fn new_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    dispatch(&state, id, SessionAction::StartNewOrder).await
}

/// Discard a session entirely.
///
/// # Endpoint
///
/// ```text
/// DELETE /api/sessions/:id
/// ```
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.remove_session(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Session", id))
    }
}

/// Liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
