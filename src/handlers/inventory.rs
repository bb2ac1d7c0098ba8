use crate::entities::InventoryItem;
use crate::middlewares::AuthenticatedUser;
use crate::models::*;
use crate::services::{AuthService, InventoryService};
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/inventory",
    tag = "inventory",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Inventory items", body = [InventoryItem])
    )
)]
pub async fn list_items(
    auth_service: web::Data<AuthService>,
    inventory_service: web::Data<InventoryService>,
    user: AuthenticatedUser,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::STAFF).await?;
    match inventory_service.list_items().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(items))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/inventory/{id}",
    tag = "inventory",
    params(("id" = i64, Path, description = "Inventory item id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Inventory item", body = InventoryItem),
        (status = 404, description = "Item not found", body = ApiError)
    )
)]
pub async fn get_item(
    auth_service: web::Data<AuthService>,
    inventory_service: web::Data<InventoryService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::STAFF).await?;
    match inventory_service.get_item(path.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/inventory",
    tag = "inventory",
    request_body = CreateInventoryItemRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Item created", body = InventoryItem),
        (status = 400, description = "Missing name or negative quantity/price", body = ApiError)
    )
)]
pub async fn create_item(
    auth_service: web::Data<AuthService>,
    inventory_service: web::Data<InventoryService>,
    user: AuthenticatedUser,
    request: web::Json<CreateInventoryItemRequest>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::FRONT_DESK).await?;
    match inventory_service.create_item(request.into_inner()).await {
        Ok(item) => Ok(HttpResponse::Created()
            .json(ApiResponse::success_with_message(item, "Item created"))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/inventory/{id}",
    tag = "inventory",
    params(("id" = i64, Path, description = "Inventory item id")),
    request_body = UpdateInventoryItemRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Item updated", body = InventoryItem),
        (status = 404, description = "Item not found", body = ApiError)
    )
)]
pub async fn update_item(
    auth_service: web::Data<AuthService>,
    inventory_service: web::Data<InventoryService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    request: web::Json<UpdateInventoryItemRequest>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::FRONT_DESK).await?;
    match inventory_service
        .update_item(path.into_inner(), request.into_inner())
        .await
    {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/inventory/{id}",
    tag = "inventory",
    params(("id" = i64, Path, description = "Inventory item id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Item deleted"),
        (status = 404, description = "Item not found", body = ApiError)
    )
)]
pub async fn delete_item(
    auth_service: web::Data<AuthService>,
    inventory_service: web::Data<InventoryService>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    auth_service.require_role(&user, &Role::FRONT_DESK).await?;
    match inventory_service.delete_item(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::message("Item deleted"))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn inventory_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/inventory")
            .route("", web::get().to(list_items))
            .route("", web::post().to(create_item))
            .route("/{id}", web::get().to(get_item))
            .route("/{id}", web::put().to(update_item))
            .route("/{id}", web::delete().to(delete_item)),
    );
}
