//! HTTP handlers
//!
//! `POST /find_customer` answers with JSON when the client asks for it via
//! `Accept`, and with an HTML page otherwise.

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use maud::Markup;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

use super::pages;
use super::service::{AddressQuery, CustomerFinder, CustomerMatch, FindError};

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct FindCustomerForm {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address: Option<String>,
}

impl From<FindCustomerForm> for AddressQuery {
    fn from(f: FindCustomerForm) -> Self {
        Self {
            address: f.address,
            street: f.street,
            city: f.city,
            state: f.state,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub customer_id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub region: String,
    pub distance: f64,
    pub link: String,
}

impl From<CustomerMatch> for CustomerResponse {
    fn from(m: CustomerMatch) -> Self {
        Self {
            customer_id: m.customer.customer_id,
            name: m.customer.name,
            address: m.customer.address,
            city: m.customer.city,
            state: m.customer.state,
            region: m.customer.region,
            distance: (m.distance_miles * 100.0).round() / 100.0,
            link: m.link,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub customers: usize,
    pub eligible: usize,
}

/// Status code and user-facing message for a failed lookup. Upstream
/// details are logged, never shown.
pub fn error_status(err: &FindError) -> (StatusCode, String) {
    match err {
        FindError::MissingAddress => (StatusCode::BAD_REQUEST, "Please enter an address.".to_string()),
        FindError::GeocodeFailed(address) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("Could not geocode the address: {}", address),
        ),
        FindError::NoEligibleCustomers => (
            StatusCode::NOT_FOUND,
            "No customers with known coordinates are available.".to_string(),
        ),
        FindError::Upstream(_) => (
            StatusCode::BAD_GATEWAY,
            "An unexpected error occurred while finding the nearest customer.".to_string(),
        ),
    }
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false)
}

// ============================================================================
// Handlers
// ============================================================================

pub type AppState = Arc<CustomerFinder>;

/// GET /
pub async fn index() -> Markup {
    pages::index()
}

/// GET /health
pub async fn health(State(finder): State<AppState>) -> Json<HealthResponse> {
    let customers = finder.customers();
    Json(HealthResponse {
        status: "ok",
        customers: customers.len(),
        eligible: customers.eligible_count(),
    })
}

fn error_response(json: bool, status: StatusCode, message: String) -> Response {
    if json {
        (status, Json(ErrorResponse { error: message })).into_response()
    } else {
        (status, pages::error(&message)).into_response()
    }
}

/// POST /find_customer
pub async fn find_customer(
    State(finder): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<FindCustomerForm>, FormRejection>,
) -> Response {
    let json = wants_json(&headers);

    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            warn!("Rejected lookup request: {}", rejection.body_text());
            return error_response(
                json,
                rejection.status(),
                "Please submit the address as a form with street, city and state or a single address field.".to_string(),
            );
        }
    };

    match finder.find_nearest(&form.into()).await {
        Ok(found) if json => Json(CustomerResponse::from(found)).into_response(),
        Ok(found) => pages::result(&found).into_response(),
        Err(e) => {
            match &e {
                FindError::Upstream(inner) => error!("Customer lookup failed: {:#}", inner),
                other => warn!("Customer lookup rejected: {}", other),
            }
            let (status, message) = error_status(&e);
            error_response(json, status, message)
        }
    }
}
