use crate::entities::{Routine, RoutineAssignment, member_entity as members};
use crate::error::AppError;
use crate::middlewares::AuthenticatedUser;
use crate::models::*;
use crate::services::{AuthService, RoutineService};
use actix_web::{HttpResponse, ResponseError, Result, web};

/// Routines record their author only when a trainer creates them.
fn authoring_trainer(actor: &members::Model) -> Option<i64> {
    (actor.role_id == Role::Trainer.id()).then_some(actor.id)
}

#[utoipa::path(
    get,
    path = "/routines",
    tag = "routines",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Routines", body = [Routine])
    )
)]
pub async fn list_routines(
    routine_service: web::Data<RoutineService>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse> {
    match routine_service.list_routines().await {
        Ok(routines) => Ok(HttpResponse::Ok().json(ApiResponse::success(routines))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/routines/stats",
    tag = "routines",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Routine and assignment counts", body = RoutineStats)
    )
)]
pub async fn routine_stats(
    routine_service: web::Data<RoutineService>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse> {
    match routine_service.routine_stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(stats))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/routines/{id}",
    tag = "routines",
    params(("id" = i64, Path, description = "Routine id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Routine with ordered days and exercises", body = RoutineDetail),
        (status = 404, description = "Routine not found", body = ApiError)
    )
)]
pub async fn get_routine(
    routine_service: web::Data<RoutineService>,
    _user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match routine_service.get_routine(path.into_inner()).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/routines",
    tag = "routines",
    request_body = CreateRoutineRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Routine created with its days", body = RoutineDetail),
        (status = 400, description = "Invalid routine", body = ApiError)
    )
)]
pub async fn create_routine(
    auth_service: web::Data<AuthService>,
    routine_service: web::Data<RoutineService>,
    user: AuthenticatedUser,
    request: web::Json<CreateRoutineRequest>,
) -> Result<HttpResponse> {
    let actor = auth_service.require_role(&user, &Role::COACHING).await?;
    match routine_service
        .create_routine(request.into_inner(), authoring_trainer(&actor))
        .await
    {
        Ok(detail) => Ok(HttpResponse::Created()
            .json(ApiResponse::success_with_message(detail, "Routine created"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/routines/{id}",
    tag = "routines",
    params(("id" = i64, Path, description = "Routine id")),
    request_body = UpdateRoutineRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Routine header updated", body = Routine),
        (status = 404, description = "Routine not found", body = ApiError)
    )
)]
pub async fn update_routine(
    auth_service: web::Data<AuthService>,
    routine_service: web::Data<RoutineService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    request: web::Json<UpdateRoutineRequest>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::COACHING).await?;
    match routine_service
        .update_routine(path.into_inner(), request.into_inner())
        .await
    {
        Ok(routine) => Ok(HttpResponse::Ok().json(ApiResponse::success(routine))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/routines/{id}",
    tag = "routines",
    params(("id" = i64, Path, description = "Routine id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Routine, days, entries and assignments deleted"),
        (status = 404, description = "Routine not found", body = ApiError)
    )
)]
pub async fn delete_routine(
    auth_service: web::Data<AuthService>,
    routine_service: web::Data<RoutineService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::COACHING).await?;
    match routine_service.delete_routine(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Routine deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/routines/{id}/days",
    tag = "routines",
    params(("id" = i64, Path, description = "Routine id")),
    request_body = RoutineDayInput,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Day added", body = RoutineDetail),
        (status = 404, description = "Routine not found", body = ApiError)
    )
)]
pub async fn add_day(
    auth_service: web::Data<AuthService>,
    routine_service: web::Data<RoutineService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    request: web::Json<RoutineDayInput>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::COACHING).await?;
    match routine_service
        .add_day(path.into_inner(), request.into_inner())
        .await
    {
        Ok(detail) => Ok(HttpResponse::Created()
            .json(ApiResponse::success_with_message(detail, "Day added"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/routines/{id}/duplicate",
    tag = "routines",
    params(("id" = i64, Path, description = "Routine id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Copy created", body = RoutineDetail),
        (status = 404, description = "Routine not found", body = ApiError)
    )
)]
pub async fn duplicate_routine(
    auth_service: web::Data<AuthService>,
    routine_service: web::Data<RoutineService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let actor = auth_service.require_role(&user, &Role::COACHING).await?;
    match routine_service
        .duplicate_routine(path.into_inner(), authoring_trainer(&actor))
        .await
    {
        Ok(detail) => Ok(HttpResponse::Created()
            .json(ApiResponse::success_with_message(detail, "Routine duplicated"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/routines/{id}/assign",
    tag = "routines",
    params(("id" = i64, Path, description = "Routine id")),
    request_body = AssignRoutineRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Routine assigned", body = RoutineAssignment),
        (status = 400, description = "Already actively assigned, or not a client", body = ApiError),
        (status = 404, description = "Routine or client not found", body = ApiError)
    )
)]
pub async fn assign_routine(
    auth_service: web::Data<AuthService>,
    routine_service: web::Data<RoutineService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    request: web::Json<AssignRoutineRequest>,
) -> Result<HttpResponse> {
    let actor = auth_service.require_role(&user, &Role::COACHING).await?;
    match routine_service
        .assign_routine(path.into_inner(), request.into_inner(), Some(actor.id))
        .await
    {
        Ok(assignment) => Ok(HttpResponse::Created()
            .json(ApiResponse::success_with_message(assignment, "Routine assigned"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/routines/assignments/client/{id}",
    tag = "routines",
    params(("id" = i64, Path, description = "Client id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Assignments of a client", body = [AssignmentResponse]),
        (status = 403, description = "Clients may only list their own assignments", body = ApiError)
    )
)]
pub async fn client_assignments(
    auth_service: web::Data<AuthService>,
    routine_service: web::Data<RoutineService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let client_id = path.into_inner();
    let actor = auth_service.require_role(&user, &Role::ALL).await?;
    if actor.role_id == Role::Client.id() && actor.id != client_id {
        return Ok(AppError::Forbidden.error_response());
    }
    match routine_service.client_assignments(client_id).await {
        Ok(assignments) => Ok(HttpResponse::Ok().json(ApiResponse::success(assignments))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/routine-assignments/{id}/pause",
    tag = "routines",
    params(("id" = i64, Path, description = "Assignment id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Assignment paused", body = RoutineAssignment),
        (status = 400, description = "Assignment is not active", body = ApiError)
    )
)]
pub async fn pause_assignment(
    auth_service: web::Data<AuthService>,
    routine_service: web::Data<RoutineService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::COACHING).await?;
    match routine_service.pause_assignment(path.into_inner()).await {
        Ok(assignment) => Ok(HttpResponse::Ok().json(ApiResponse::success(assignment))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/routine-assignments/{id}/resume",
    tag = "routines",
    params(("id" = i64, Path, description = "Assignment id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Assignment resumed", body = RoutineAssignment),
        (status = 400, description = "Not paused, or another assignment is active", body = ApiError)
    )
)]
pub async fn resume_assignment(
    auth_service: web::Data<AuthService>,
    routine_service: web::Data<RoutineService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::COACHING).await?;
    match routine_service.resume_assignment(path.into_inner()).await {
        Ok(assignment) => Ok(HttpResponse::Ok().json(ApiResponse::success(assignment))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn routine_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/routines")
            .route("", web::get().to(list_routines))
            .route("", web::post().to(create_routine))
            .route("/stats", web::get().to(routine_stats))
            .route("/assignments/client/{id}", web::get().to(client_assignments))
            .route("/{id}", web::get().to(get_routine))
            .route("/{id}", web::put().to(update_routine))
            .route("/{id}", web::delete().to(delete_routine))
            .route("/{id}/days", web::post().to(add_day))
            .route("/{id}/duplicate", web::post().to(duplicate_routine))
            .route("/{id}/assign", web::post().to(assign_routine)),
    )
    .service(
        web::scope("/routine-assignments")
            .route("/{id}/pause", web::put().to(pause_assignment))
            .route("/{id}/resume", web::put().to(resume_assignment)),
    );
}
