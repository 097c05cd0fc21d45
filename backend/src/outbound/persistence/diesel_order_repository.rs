//! PostgreSQL-backed `OrderRepository` implementation using Diesel ORM.
//!
//! Order lines are stored as a JSONB array of product snapshots.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{OrderRepository, OrderRepositoryError};
use crate::domain::{Order, OrderId, OrderLine, OrderStatus, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{OrderRow, OrderUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::orders;

/// Diesel-backed implementation of the [`OrderRepository`] port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OrderRepositoryError {
    map_basic_pool_error(error, OrderRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> OrderRepositoryError {
    map_basic_diesel_error(
        error,
        OrderRepositoryError::query,
        OrderRepositoryError::connection,
    )
}

fn row_to_order(row: OrderRow) -> Result<Order, OrderRepositoryError> {
    let items: Vec<OrderLine> = serde_json::from_value(row.items).map_err(|err| {
        OrderRepositoryError::query(format!("corrupted items for order {}: {err}", row.id))
    })?;
    let status = row.status.parse::<OrderStatus>().map_err(|err| {
        OrderRepositoryError::query(format!("invalid status for order {}: {err}", row.id))
    })?;
    Ok(Order {
        id: OrderId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        items,
        tax: row.tax,
        shipping_fee: row.shipping_fee,
        subtotal: row.subtotal,
        total: row.total,
        status,
        client_secret: row.client_secret,
        payment_intent_id: row.payment_intent_id,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn order_to_row(order: &Order) -> Result<OrderRow, OrderRepositoryError> {
    let items = serde_json::to_value(&order.items)
        .map_err(|err| OrderRepositoryError::query(format!("failed to encode items: {err}")))?;
    Ok(OrderRow {
        id: *order.id.as_uuid(),
        user_id: *order.user_id.as_uuid(),
        items,
        tax: order.tax,
        shipping_fee: order.shipping_fee,
        subtotal: order.subtotal,
        total: order.total,
        status: order.status.as_str().to_owned(),
        client_secret: order.client_secret.clone(),
        payment_intent_id: order.payment_intent_id.clone(),
        created_at: order.created_at,
        updated_at: order.updated_at,
    })
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn list(&self) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OrderRow> = orders::table
            .order(orders::created_at.asc())
            .select(OrderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_order).collect()
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OrderRow> = orders::table
            .filter(orders::user_id.eq(user_id.as_uuid()))
            .order(orders::created_at.asc())
            .select(OrderRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_order).collect()
    }

    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = orders::table
            .find(id.as_uuid())
            .select(OrderRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_order).transpose()
    }

    async fn create(&self, order: &Order) -> Result<(), OrderRepositoryError> {
        let row = order_to_row(order)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(orders::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn update(&self, order: &Order) -> Result<bool, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = OrderUpdate {
            status: order.status.as_str(),
            payment_intent_id: order.payment_intent_id.as_deref(),
            updated_at: order.updated_at,
        };
        let updated = diesel::update(orders::table.find(order.id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }
}
