use crate::entities::inventory_item_entity as inventory;
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder, Set};

const DEFAULT_STATUS: &str = "available";

#[derive(Clone)]
pub struct InventoryService {
    pool: DatabaseConnection,
}

fn non_negative(field: &str, value: i64) -> AppResult<()> {
    if value < 0 {
        return Err(AppError::ValidationError(format!("{field} must not be negative")));
    }
    Ok(())
}

fn non_blank(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    Ok(value.to_string())
}

impl InventoryService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_items(&self) -> AppResult<Vec<inventory::Model>> {
        Ok(inventory::Entity::find()
            .order_by_asc(inventory::Column::Name)
            .all(&self.pool)
            .await?)
    }

    pub async fn get_item(&self, id: i64) -> AppResult<inventory::Model> {
        inventory::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Inventory item not found".to_string()))
    }

    pub async fn create_item(&self, request: CreateInventoryItemRequest) -> AppResult<inventory::Model> {
        let name = non_blank("Name", &request.name)?;
        let category = non_blank("Category", &request.category)?;
        non_negative("Quantity", request.quantity.into())?;
        non_negative("Unit price", request.unit_price)?;

        let item = inventory::ActiveModel {
            name: Set(name),
            category: Set(category),
            quantity: Set(request.quantity),
            status: Set(request
                .status
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STATUS.to_string())),
            supplier: Set(request.supplier),
            location: Set(request.location),
            unit_price: Set(request.unit_price),
            description: Set(request.description),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        Ok(item)
    }

    pub async fn update_item(
        &self,
        id: i64,
        request: UpdateInventoryItemRequest,
    ) -> AppResult<inventory::Model> {
        let mut item = self.get_item(id).await?.into_active_model();

        if let Some(name) = request.name {
            item.name = Set(non_blank("Name", &name)?);
        }
        if let Some(category) = request.category {
            item.category = Set(non_blank("Category", &category)?);
        }
        if let Some(quantity) = request.quantity {
            non_negative("Quantity", quantity.into())?;
            item.quantity = Set(quantity);
        }
        if let Some(unit_price) = request.unit_price {
            non_negative("Unit price", unit_price)?;
            item.unit_price = Set(unit_price);
        }
        if let Some(status) = request.status {
            item.status = Set(non_blank("Status", &status)?);
        }
        if request.supplier.is_some() {
            item.supplier = Set(request.supplier);
        }
        if request.location.is_some() {
            item.location = Set(request.location);
        }
        if request.description.is_some() {
            item.description = Set(request.description);
        }

        Ok(item.update(&self.pool).await?)
    }

    pub async fn delete_item(&self, id: i64) -> AppResult<()> {
        let result = inventory::Entity::delete_by_id(id).exec(&self.pool).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Inventory item not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn request() -> CreateInventoryItemRequest {
        CreateInventoryItemRequest {
            name: "Kettlebell 16kg".into(),
            category: "weights".into(),
            quantity: 4,
            status: None,
            supplier: None,
            location: Some("Room A".into()),
            unit_price: 4500,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_negative_quantity_rejected() {
        let svc = InventoryService::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let mut req = request();
        req.quantity = -1;
        assert!(matches!(
            svc.create_item(req).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let svc = InventoryService::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let mut req = request();
        req.name = " ".into();
        assert!(matches!(
            svc.create_item(req).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(svc.pool.into_transaction_log().is_empty());
    }
}
