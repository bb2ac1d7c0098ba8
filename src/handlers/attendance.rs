use crate::error::AppError;
use crate::middlewares::AuthenticatedUser;
use crate::models::*;
use crate::services::{AttendanceService, AuthService};
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/attendance",
    tag = "attendance",
    params(AttendanceQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated attendance records", body = AttendanceResponse)
    )
)]
pub async fn list_attendance(
    auth_service: web::Data<AuthService>,
    attendance_service: web::Data<AttendanceService>,
    user: AuthenticatedUser,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::STAFF).await?;
    match attendance_service.list_attendance(query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/attendance/member/{id}",
    tag = "attendance",
    params(("id" = i64, Path, description = "Member id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Attendance history of a member", body = [AttendanceResponse]),
        (status = 403, description = "Clients may only read their own history", body = ApiError)
    )
)]
pub async fn member_attendance(
    auth_service: web::Data<AuthService>,
    attendance_service: web::Data<AttendanceService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let member_id = path.into_inner();
    let actor = auth_service.require_role(&user, &Role::ALL).await?;
    if actor.role_id == Role::Client.id() && actor.id != member_id {
        return Ok(AppError::Forbidden.error_response());
    }
    match attendance_service.member_attendance(member_id).await {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(records))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/attendance/check-in",
    tag = "attendance",
    request_body = CheckInRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Entry recorded", body = AttendanceResponse),
        (status = 400, description = "Member inactive or already checked in", body = ApiError),
        (status = 404, description = "Member or class not found", body = ApiError)
    )
)]
pub async fn check_in(
    auth_service: web::Data<AuthService>,
    attendance_service: web::Data<AttendanceService>,
    user: AuthenticatedUser,
    request: web::Json<CheckInRequest>,
) -> Result<HttpResponse> {
    let actor = auth_service.require_role(&user, &Role::STAFF).await?;
    match attendance_service
        .check_in(request.into_inner(), Some(actor.id))
        .await
    {
        Ok(record) => Ok(HttpResponse::Created()
            .json(ApiResponse::success_with_message(record, "Entry recorded"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/attendance/{id}/check-out",
    tag = "attendance",
    params(("id" = i64, Path, description = "Attendance record id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Exit recorded", body = AttendanceResponse),
        (status = 400, description = "Exit already recorded", body = ApiError),
        (status = 404, description = "Record not found", body = ApiError)
    )
)]
pub async fn check_out(
    auth_service: web::Data<AuthService>,
    attendance_service: web::Data<AttendanceService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::STAFF).await?;
    match attendance_service.check_out(path.into_inner()).await {
        Ok(record) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success_with_message(record, "Exit recorded"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/attendance/{id}",
    tag = "attendance",
    params(("id" = i64, Path, description = "Attendance record id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Record deleted"),
        (status = 404, description = "Record not found", body = ApiError)
    )
)]
pub async fn delete_attendance(
    auth_service: web::Data<AuthService>,
    attendance_service: web::Data<AttendanceService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::STAFF).await?;
    match attendance_service.delete_attendance(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Attendance record deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn attendance_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/attendance")
            .route("", web::get().to(list_attendance))
            .route("/check-in", web::post().to(check_in))
            .route("/member/{id}", web::get().to(member_attendance))
            .route("/{id}/check-out", web::put().to(check_out))
            .route("/{id}", web::delete().to(delete_attendance)),
    );
}
