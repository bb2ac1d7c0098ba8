use crate::entities::GymClass;
use crate::middlewares::AuthenticatedUser;
use crate::models::*;
use crate::services::{AuthService, ClassService};
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/classes",
    tag = "classes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Classes", body = [GymClass])
    )
)]
pub async fn list_classes(
    class_service: web::Data<ClassService>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse> {
    match class_service.list_classes().await {
        Ok(classes) => Ok(HttpResponse::Ok().json(ApiResponse::success(classes))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/classes/count",
    tag = "classes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Number of active classes", body = CountResponse)
    )
)]
pub async fn count_classes(
    class_service: web::Data<ClassService>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse> {
    match class_service.count_active_classes().await {
        Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(CountResponse { count }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/classes/{id}",
    tag = "classes",
    params(("id" = i64, Path, description = "Class id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Class", body = GymClass),
        (status = 404, description = "Class not found", body = ApiError)
    )
)]
pub async fn get_class(
    class_service: web::Data<ClassService>,
    _user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match class_service.get_class(path.into_inner()).await {
        Ok(class) => Ok(HttpResponse::Ok().json(ApiResponse::success(class))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/classes",
    tag = "classes",
    request_body = CreateClassRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Class created", body = GymClass),
        (status = 400, description = "Invalid capacity or trainer", body = ApiError)
    )
)]
pub async fn create_class(
    auth_service: web::Data<AuthService>,
    class_service: web::Data<ClassService>,
    user: AuthenticatedUser,
    request: web::Json<CreateClassRequest>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::COACHING).await?;
    match class_service.create_class(request.into_inner()).await {
        Ok(class) => Ok(HttpResponse::Created()
            .json(ApiResponse::success_with_message(class, "Class created"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/classes/{id}",
    tag = "classes",
    params(("id" = i64, Path, description = "Class id")),
    request_body = UpdateClassRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Class updated", body = GymClass),
        (status = 404, description = "Class not found", body = ApiError)
    )
)]
pub async fn update_class(
    auth_service: web::Data<AuthService>,
    class_service: web::Data<ClassService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    request: web::Json<UpdateClassRequest>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::COACHING).await?;
    match class_service
        .update_class(path.into_inner(), request.into_inner())
        .await
    {
        Ok(class) => Ok(HttpResponse::Ok().json(ApiResponse::success(class))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/classes/{id}",
    tag = "classes",
    params(("id" = i64, Path, description = "Class id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Class deleted"),
        (status = 404, description = "Class not found", body = ApiError)
    )
)]
pub async fn delete_class(
    auth_service: web::Data<AuthService>,
    class_service: web::Data<ClassService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::COACHING).await?;
    match class_service.delete_class(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Class deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn class_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/classes")
            .route("", web::get().to(list_classes))
            .route("", web::post().to(create_class))
            .route("/count", web::get().to(count_classes))
            .route("/{id}", web::get().to(get_class))
            .route("/{id}", web::put().to(update_class))
            .route("/{id}", web::delete().to(delete_class)),
    );
}
