use crate::entities::Invoice;
use crate::middlewares::AuthenticatedUser;
use crate::models::*;
use crate::services::{AuthService, InvoiceService};
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/invoices",
    tag = "invoices",
    params(InvoiceQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Invoices, newest first", body = [Invoice])
    )
)]
pub async fn list_invoices(
    auth_service: web::Data<AuthService>,
    invoice_service: web::Data<InvoiceService>,
    user: AuthenticatedUser,
    query: web::Query<InvoiceQuery>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::FRONT_DESK).await?;
    match invoice_service.list_invoices(query.into_inner()).await {
        Ok(invoices) => Ok(HttpResponse::Ok().json(ApiResponse::success(invoices))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/invoices/{id}",
    tag = "invoices",
    params(("id" = i64, Path, description = "Invoice id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Invoice", body = Invoice),
        (status = 404, description = "Invoice not found", body = ApiError)
    )
)]
pub async fn get_invoice(
    auth_service: web::Data<AuthService>,
    invoice_service: web::Data<InvoiceService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::FRONT_DESK).await?;
    match invoice_service.get_invoice(path.into_inner()).await {
        Ok(invoice) => Ok(HttpResponse::Ok().json(ApiResponse::success(invoice))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/invoices",
    tag = "invoices",
    request_body = CreateInvoiceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Invoice issued", body = Invoice),
        (status = 400, description = "Amount must be positive", body = ApiError),
        (status = 404, description = "Member not found", body = ApiError)
    )
)]
pub async fn create_invoice(
    auth_service: web::Data<AuthService>,
    invoice_service: web::Data<InvoiceService>,
    user: AuthenticatedUser,
    request: web::Json<CreateInvoiceRequest>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::FRONT_DESK).await?;
    match invoice_service.create_invoice(request.into_inner()).await {
        Ok(invoice) => Ok(HttpResponse::Created()
            .json(ApiResponse::success_with_message(invoice, "Invoice created"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/invoices/{id}",
    tag = "invoices",
    params(("id" = i64, Path, description = "Invoice id")),
    request_body = UpdateInvoiceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Invoice updated", body = Invoice),
        (status = 404, description = "Invoice not found", body = ApiError)
    )
)]
pub async fn update_invoice(
    auth_service: web::Data<AuthService>,
    invoice_service: web::Data<InvoiceService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    request: web::Json<UpdateInvoiceRequest>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::FRONT_DESK).await?;
    match invoice_service
        .update_invoice(path.into_inner(), request.into_inner())
        .await
    {
        Ok(invoice) => Ok(HttpResponse::Ok().json(ApiResponse::success(invoice))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/invoices/{id}",
    tag = "invoices",
    params(("id" = i64, Path, description = "Invoice id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Invoice deleted"),
        (status = 404, description = "Invoice not found", body = ApiError)
    )
)]
pub async fn delete_invoice(
    auth_service: web::Data<AuthService>,
    invoice_service: web::Data<InvoiceService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::FRONT_DESK).await?;
    match invoice_service.delete_invoice(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Invoice deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn invoice_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invoices")
            .route("", web::get().to(list_invoices))
            .route("", web::post().to(create_invoice))
            .route("/{id}", web::get().to(get_invoice))
            .route("/{id}", web::put().to(update_invoice))
            .route("/{id}", web::delete().to(delete_invoice)),
    );
}
