use actix_web::{web, HttpRequest, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::application::invoice_service::{InvoiceService, INVOICES_PATH};
use crate::domain::invoice::Invoice;
use crate::domain::ports::InvoiceRepository;
use crate::domain::validation::FormData;
use crate::errors::AppError;
use crate::infrastructure::page_cache::{PageCache, PageKey};

use super::navigation::{Redirect, SeeOtherNavigator};

pub type DashboardService<R> = InvoiceService<R, PageCache, SeeOtherNavigator>;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// Form fields accepted by the create and update endpoints. Values arrive as
/// strings and are validated server-side.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFormBody {
    pub customer_id: String,
    /// Major units, e.g. "45.00"
    pub amount: String,
    /// "pending" or "paid"
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    pub id: Uuid,
    pub customer_id: String,
    /// Cents
    pub amount: i32,
    pub status: String,
    pub date: NaiveDate,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            customer_id: invoice.customer_id,
            amount: invoice.amount,
            status: invoice.status.to_string(),
            date: invoice.date,
        }
    }
}

// ── Pagination ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListInvoicesParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListInvoicesResponse {
    pub items: Vec<InvoiceResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /dashboard/invoices
///
/// Paginated listing, newest first. Rendered bodies are kept in the page
/// cache until the next mutation invalidates them.
#[utoipa::path(
    get,
    path = "/dashboard/invoices",
    params(ListInvoicesParams),
    responses(
        (status = 200, description = "Paginated list of invoices", body = ListInvoicesResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "invoices"
)]
pub async fn list_invoices<R: InvoiceRepository>(
    service: web::Data<DashboardService<R>>,
    cache: web::Data<PageCache>,
    req: HttpRequest,
    query: web::Query<ListInvoicesParams>,
) -> Result<HttpResponse, AppError> {
    let key = PageKey::new(INVOICES_PATH, req.query_string());
    if let Some(body) = cache.get(&key) {
        return Ok(HttpResponse::Ok()
            .content_type("application/json")
            .insert_header(("x-cache", "HIT"))
            .body(body));
    }

    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);
    let generation = cache.generation(INVOICES_PATH);

    let result = web::block(move || service.list_invoices(page, limit))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body = serde_json::to_string(&ListInvoicesResponse {
        items: result.items.into_iter().map(InvoiceResponse::from).collect(),
        total: result.total,
        page,
        limit,
    })
    .map_err(|e| AppError::Internal(e.to_string()))?;
    cache.store(key, body.clone(), generation);

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .insert_header(("x-cache", "MISS"))
        .body(body))
}

/// POST /dashboard/invoices
///
/// Creates an invoice from a urlencoded form, stamped with today's date, then
/// redirects back to the listing.
#[utoipa::path(
    post,
    path = "/dashboard/invoices",
    request_body(content = InvoiceFormBody, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Invoice created, redirect to the listing"),
        (status = 422, description = "Form failed validation"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "invoices"
)]
pub async fn create_invoice<R: InvoiceRepository>(
    service: web::Data<DashboardService<R>>,
    form: web::Form<FormData>,
) -> Result<Redirect, AppError> {
    let form = form.into_inner();

    let redirect = web::block(move || service.create_invoice(&form))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(redirect)
}

/// GET /dashboard/invoices/{id}
#[utoipa::path(
    get,
    path = "/dashboard/invoices/{id}",
    params(
        ("id" = Uuid, Path, description = "Invoice UUID"),
    ),
    responses(
        (status = 200, description = "Invoice found", body = InvoiceResponse),
        (status = 404, description = "Invoice not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "invoices"
)]
pub async fn get_invoice<R: InvoiceRepository>(
    service: web::Data<DashboardService<R>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let invoice = web::block(move || service.get_invoice(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    match invoice {
        Some(invoice) => Ok(HttpResponse::Ok().json(InvoiceResponse::from(invoice))),
        None => Err(AppError::NotFound),
    }
}

/// POST /dashboard/invoices/{id}
///
/// Replaces customer, amount and status. The creation date is kept.
#[utoipa::path(
    post,
    path = "/dashboard/invoices/{id}",
    params(
        ("id" = Uuid, Path, description = "Invoice UUID"),
    ),
    request_body(content = InvoiceFormBody, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Invoice updated, redirect to the listing"),
        (status = 404, description = "Invoice not found"),
        (status = 422, description = "Form failed validation"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "invoices"
)]
pub async fn update_invoice<R: InvoiceRepository>(
    service: web::Data<DashboardService<R>>,
    path: web::Path<Uuid>,
    form: web::Form<FormData>,
) -> Result<Redirect, AppError> {
    let id = path.into_inner();
    let form = form.into_inner();

    let redirect = web::block(move || service.update_invoice(id, &form))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(redirect)
}

/// DELETE /dashboard/invoices/{id}
///
/// Idempotent: deleting an unknown id also answers 204.
#[utoipa::path(
    delete,
    path = "/dashboard/invoices/{id}",
    params(
        ("id" = Uuid, Path, description = "Invoice UUID"),
    ),
    responses(
        (status = 204, description = "Invoice deleted"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "invoices"
)]
pub async fn delete_invoice<R: InvoiceRepository>(
    service: web::Data<DashboardService<R>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    web::block(move || service.delete_invoice(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}
