use crate::middlewares::AuthenticatedUser;
use crate::models::*;
use crate::services::{AuthService, MemberService};
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/members",
    tag = "members",
    params(MemberQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Paginated members", body = MemberResponse),
        (status = 400, description = "Unknown role filter", body = ApiError),
        (status = 403, description = "Staff only", body = ApiError)
    )
)]
pub async fn list_members(
    auth_service: web::Data<AuthService>,
    member_service: web::Data<MemberService>,
    user: AuthenticatedUser,
    query: web::Query<MemberQuery>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::STAFF).await?;
    match member_service.list_members(query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/members/count",
    tag = "members",
    params(RoleFilter),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Member count", body = CountResponse)
    )
)]
pub async fn count_members(
    auth_service: web::Data<AuthService>,
    member_service: web::Data<MemberService>,
    user: AuthenticatedUser,
    query: web::Query<RoleFilter>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::STAFF).await?;
    match member_service.count_members(query.role.as_deref()).await {
        Ok(count) => Ok(HttpResponse::Ok().json(ApiResponse::success(CountResponse { count }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/members/active",
    tag = "members",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active members", body = [MemberResponse])
    )
)]
pub async fn active_members(
    auth_service: web::Data<AuthService>,
    member_service: web::Data<MemberService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::STAFF).await?;
    match member_service.active_members().await {
        Ok(members) => Ok(HttpResponse::Ok().json(ApiResponse::success(members))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/members/expiring",
    tag = "members",
    params(ExpiringQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Memberships ending soon", body = [MemberResponse])
    )
)]
pub async fn expiring_members(
    auth_service: web::Data<AuthService>,
    member_service: web::Data<MemberService>,
    user: AuthenticatedUser,
    query: web::Query<ExpiringQuery>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::STAFF).await?;
    match member_service.expiring_members(query.days.unwrap_or(7)).await {
        Ok(members) => Ok(HttpResponse::Ok().json(ApiResponse::success(members))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/members/stats",
    tag = "members",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Totals by role and status", body = MemberStats)
    )
)]
pub async fn member_stats(
    auth_service: web::Data<AuthService>,
    member_service: web::Data<MemberService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::STAFF).await?;
    match member_service.member_stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(stats))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/members/{id}",
    tag = "members",
    params(("id" = i64, Path, description = "Member id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Member", body = MemberResponse),
        (status = 404, description = "Member not found", body = ApiError)
    )
)]
pub async fn get_member(
    auth_service: web::Data<AuthService>,
    member_service: web::Data<MemberService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::STAFF).await?;
    match member_service.get_member(path.into_inner()).await {
        Ok(member) => Ok(HttpResponse::Ok().json(ApiResponse::success(member))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/members",
    tag = "members",
    request_body = CreateMemberRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Member created", body = MemberResponse),
        (status = 400, description = "Invalid input or email already registered", body = ApiError)
    )
)]
pub async fn create_member(
    auth_service: web::Data<AuthService>,
    member_service: web::Data<MemberService>,
    user: AuthenticatedUser,
    request: web::Json<CreateMemberRequest>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::STAFF).await?;
    match member_service.create_member(request.into_inner()).await {
        Ok(member) => Ok(HttpResponse::Created()
            .json(ApiResponse::success_with_message(member, "Member created"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/members/{id}",
    tag = "members",
    params(("id" = i64, Path, description = "Member id")),
    request_body = UpdateMemberRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Member updated", body = MemberResponse),
        (status = 400, description = "Invalid input or email already registered", body = ApiError),
        (status = 404, description = "Member not found", body = ApiError)
    )
)]
pub async fn update_member(
    auth_service: web::Data<AuthService>,
    member_service: web::Data<MemberService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    request: web::Json<UpdateMemberRequest>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::STAFF).await?;
    match member_service
        .update_member(path.into_inner(), request.into_inner())
        .await
    {
        Ok(member) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success_with_message(member, "Member updated"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/members/{id}",
    tag = "members",
    params(("id" = i64, Path, description = "Member id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Member deleted"),
        (status = 403, description = "Admin only", body = ApiError),
        (status = 404, description = "Member not found", body = ApiError)
    )
)]
pub async fn delete_member(
    auth_service: web::Data<AuthService>,
    member_service: web::Data<MemberService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &[Role::Admin]).await?;
    match member_service.delete_member(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Member deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn member_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/members")
            .route("", web::get().to(list_members))
            .route("", web::post().to(create_member))
            .route("/count", web::get().to(count_members))
            .route("/active", web::get().to(active_members))
            .route("/expiring", web::get().to(expiring_members))
            .route("/stats", web::get().to(member_stats))
            .route("/{id}", web::get().to(get_member))
            .route("/{id}", web::put().to(update_member))
            .route("/{id}", web::delete().to(delete_member)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::JwtService;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[actix_web::test]
    async fn test_malformed_authorization_rejected_before_database() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let jwt = JwtService::new("secret", 3600);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(jwt.clone()))
                .app_data(web::Data::new(AuthService::new(pool.clone(), jwt)))
                .app_data(web::Data::new(MemberService::new(pool.clone())))
                .configure(member_config),
        )
        .await;

        for header in ["Basic YWRtaW46YWRtaW4=", "Bearer not-a-jwt"] {
            let req = test::TestRequest::get()
                .uri("/members")
                .insert_header(("Authorization", header))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
        assert!(pool.into_transaction_log().is_empty());
    }
}
