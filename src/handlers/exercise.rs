use crate::entities::{Exercise, ExerciseCategory};
use crate::middlewares::AuthenticatedUser;
use crate::models::*;
use crate::services::{AuthService, ExerciseService};
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/exercise-categories",
    tag = "exercises",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Exercise categories", body = [ExerciseCategory])
    )
)]
pub async fn list_categories(
    exercise_service: web::Data<ExerciseService>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse> {
    match exercise_service.list_categories().await {
        Ok(categories) => Ok(HttpResponse::Ok().json(ApiResponse::success(categories))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/exercises",
    tag = "exercises",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Exercise catalog", body = [Exercise])
    )
)]
pub async fn list_exercises(
    exercise_service: web::Data<ExerciseService>,
    _user: AuthenticatedUser,
) -> Result<HttpResponse> {
    match exercise_service.list_exercises().await {
        Ok(exercises) => Ok(HttpResponse::Ok().json(ApiResponse::success(exercises))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/exercises/category/{id}",
    tag = "exercises",
    params(("id" = i64, Path, description = "Category id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Exercises in the category", body = [Exercise])
    )
)]
pub async fn exercises_by_category(
    exercise_service: web::Data<ExerciseService>,
    _user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match exercise_service.exercises_by_category(path.into_inner()).await {
        Ok(exercises) => Ok(HttpResponse::Ok().json(ApiResponse::success(exercises))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/exercises",
    tag = "exercises",
    request_body = CreateExerciseRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Exercise created", body = Exercise),
        (status = 404, description = "Category not found", body = ApiError)
    )
)]
pub async fn create_exercise(
    auth_service: web::Data<AuthService>,
    exercise_service: web::Data<ExerciseService>,
    user: AuthenticatedUser,
    request: web::Json<CreateExerciseRequest>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::COACHING).await?;
    match exercise_service.create_exercise(request.into_inner()).await {
        Ok(exercise) => Ok(HttpResponse::Created()
            .json(ApiResponse::success_with_message(exercise, "Exercise created"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn exercise_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/exercise-categories", web::get().to(list_categories))
        .service(
            web::scope("/exercises")
                .route("", web::get().to(list_exercises))
                .route("", web::post().to(create_exercise))
                .route("/category/{id}", web::get().to(exercises_by_category)),
        );
}
