use crate::middlewares::AuthenticatedUser;
use crate::models::*;
use crate::services::{AuthService, ReportService};
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/reports/dashboard",
    tag = "reports",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard counters", body = DashboardStats),
        (status = 403, description = "Admin or receptionist only", body = ApiError)
    )
)]
pub async fn dashboard(
    auth_service: web::Data<AuthService>,
    report_service: web::Data<ReportService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::FRONT_DESK).await?;
    match report_service.dashboard().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(stats))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/reports/income",
    tag = "reports",
    params(DateRangeQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paid invoice totals for the range", body = IncomeReport),
        (status = 400, description = "End precedes start", body = ApiError)
    )
)]
pub async fn income(
    auth_service: web::Data<AuthService>,
    report_service: web::Data<ReportService>,
    user: AuthenticatedUser,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::FRONT_DESK).await?;
    match report_service.income(query.into_inner()).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(report))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/reports/attendance",
    tag = "reports",
    params(DateRangeQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Entries per day", body = [DailyAttendance])
    )
)]
pub async fn attendance(
    auth_service: web::Data<AuthService>,
    report_service: web::Data<ReportService>,
    user: AuthenticatedUser,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::FRONT_DESK).await?;
    match report_service.daily_attendance(query.into_inner()).await {
        Ok(days) => Ok(HttpResponse::Ok().json(ApiResponse::success(days))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn report_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/dashboard", web::get().to(dashboard))
            .route("/income", web::get().to(income))
            .route("/attendance", web::get().to(attendance)),
    );
}
