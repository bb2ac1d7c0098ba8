use crate::entities::{InvoiceStatus, invoice_entity as invoices, member_entity as members};
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::{Local, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

#[derive(Clone)]
pub struct InvoiceService {
    pool: DatabaseConnection,
}

fn validate_amount(amount: i64) -> AppResult<()> {
    if amount <= 0 {
        return Err(AppError::ValidationError(
            "Amount must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

impl InvoiceService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_invoices(&self, query: InvoiceQuery) -> AppResult<Vec<invoices::Model>> {
        let mut select = invoices::Entity::find();
        if let Some(member_id) = query.member_id {
            select = select.filter(invoices::Column::MemberId.eq(member_id));
        }
        if let Some(status) = query.status {
            select = select.filter(invoices::Column::Status.eq(status));
        }
        Ok(select
            .order_by_desc(invoices::Column::IssuedOn)
            .order_by_desc(invoices::Column::Id)
            .all(&self.pool)
            .await?)
    }

    pub async fn get_invoice(&self, id: i64) -> AppResult<invoices::Model> {
        invoices::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))
    }

    pub async fn create_invoice(&self, request: CreateInvoiceRequest) -> AppResult<invoices::Model> {
        validate_amount(request.amount)?;
        let category = request.category.trim().to_string();
        if category.is_empty() {
            return Err(AppError::ValidationError("Category is required".to_string()));
        }

        if members::Entity::find_by_id(request.member_id)
            .one(&self.pool)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("Member not found".to_string()));
        }

        let invoice = invoices::ActiveModel {
            member_id: Set(request.member_id),
            issued_on: Set(request.issued_on.unwrap_or_else(|| Local::now().date_naive())),
            amount: Set(request.amount),
            category: Set(category),
            status: Set(request.status.unwrap_or(InvoiceStatus::Pending)),
            payment_method: Set(request.payment_method),
            notes: Set(request.notes),
            created_at: Set(Some(Utc::now())),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Invoice {} issued to member {} ({} cents, {})",
            invoice.id,
            invoice.member_id,
            invoice.amount,
            invoice.status
        );
        Ok(invoice)
    }

    pub async fn update_invoice(
        &self,
        id: i64,
        request: UpdateInvoiceRequest,
    ) -> AppResult<invoices::Model> {
        let mut invoice = self.get_invoice(id).await?.into_active_model();

        if let Some(amount) = request.amount {
            validate_amount(amount)?;
            invoice.amount = Set(amount);
        }
        if let Some(category) = request.category {
            let category = category.trim().to_string();
            if category.is_empty() {
                return Err(AppError::ValidationError("Category is required".to_string()));
            }
            invoice.category = Set(category);
        }
        if let Some(issued_on) = request.issued_on {
            invoice.issued_on = Set(issued_on);
        }
        if let Some(status) = request.status {
            invoice.status = Set(status);
        }
        if request.payment_method.is_some() {
            invoice.payment_method = Set(request.payment_method);
        }
        if request.notes.is_some() {
            invoice.notes = Set(request.notes);
        }

        Ok(invoice.update(&self.pool).await?)
    }

    pub async fn delete_invoice(&self, id: i64) -> AppResult<()> {
        let result = invoices::Entity::delete_by_id(id).exec(&self.pool).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Invoice not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_non_positive_amount_rejected_before_lookup() {
        let svc = InvoiceService::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let err = svc
            .create_invoice(CreateInvoiceRequest {
                member_id: 1,
                issued_on: None,
                amount: 0,
                category: "membership".into(),
                status: None,
                payment_method: None,
                notes: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert!(svc.pool.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_invoice_for_unknown_member_is_not_found() {
        let pool = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<members::Model>::new()])
            .into_connection();
        let svc = InvoiceService::new(pool);
        let err = svc
            .create_invoice(CreateInvoiceRequest {
                member_id: 42,
                issued_on: None,
                amount: 3500,
                category: "membership".into(),
                status: Some(InvoiceStatus::Paid),
                payment_method: Some("cash".into()),
                notes: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
