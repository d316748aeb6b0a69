pub mod application;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::invoice_service::{InvoiceService, INVOICES_PATH};
use domain::ports::InvoiceRepository;
use handlers::invoices::{self, DashboardService};
use handlers::navigation::SeeOtherNavigator;
use infrastructure::invoice_repo::DieselInvoiceRepository;
use infrastructure::page_cache::PageCache;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::invoices::list_invoices,
        handlers::invoices::create_invoice,
        handlers::invoices::get_invoice,
        handlers::invoices::update_invoice,
        handlers::invoices::delete_invoice,
    ),
    components(schemas(
        handlers::invoices::InvoiceFormBody,
        handlers::invoices::InvoiceResponse,
        handlers::invoices::ListInvoicesResponse,
    )),
    tags((name = "invoices", description = "Invoice dashboard actions"))
)]
pub struct ApiDoc;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    log::info!("Applied {} pending migration(s)", applied.len());
    Ok(())
}

/// Shared state for the dashboard routes: the service and the page cache it
/// invalidates, both wrapped for `App::app_data`.
pub fn dashboard_state<R: InvoiceRepository>(
    repo: R,
) -> (web::Data<DashboardService<R>>, web::Data<PageCache>) {
    let cache = Arc::new(PageCache::new());
    let service = InvoiceService::new(repo, cache.clone(), SeeOtherNavigator);
    (web::Data::new(service), web::Data::from(cache))
}

/// Invoice routes, mounted under the listing path.
pub fn dashboard_scope<R: InvoiceRepository>() -> actix_web::Scope {
    web::scope(INVOICES_PATH)
        .route("", web::get().to(invoices::list_invoices::<R>))
        .route("", web::post().to(invoices::create_invoice::<R>))
        .route("/{id}", web::get().to(invoices::get_invoice::<R>))
        .route("/{id}", web::post().to(invoices::update_invoice::<R>))
        .route("/{id}", web::delete().to(invoices::delete_invoice::<R>))
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let (service, cache) = dashboard_state(DieselInvoiceRepository::new(pool));

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(service.clone())
            .app_data(cache.clone())
            .wrap(Logger::default())
            .service(dashboard_scope::<DieselInvoiceRepository>())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
