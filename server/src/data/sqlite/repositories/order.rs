//! Order repository for SQLite operations

use sqlx::SqlitePool;

use crate::data::sqlite::SqliteError;
use crate::data::types::{NewOrder, OrderRow, OrderStatus, OrderStatusUpdate};
use crate::domain::orders::{OrderTransitionError, apply_status};

const ORDER_COLUMNS: &str = "id, user_id, items, shipping_info, payment_info, items_price, tax_price, shipping_price, total_price, order_status, paid_at, delivered_at, created_at";

type OrderTuple = (
    String,
    String,
    String,
    String,
    String,
    f64,
    f64,
    f64,
    f64,
    String,
    i64,
    Option<i64>,
    i64,
);

fn row_to_order(row: OrderTuple) -> Result<OrderRow, SqliteError> {
    let (
        id,
        user_id,
        items,
        shipping_info,
        payment_info,
        items_price,
        tax_price,
        shipping_price,
        total_price,
        order_status,
        paid_at,
        delivered_at,
        created_at,
    ) = row;

    let order_status = OrderStatus::parse(&order_status)
        .ok_or_else(|| SqliteError::Decode(format!("unknown order status: {}", order_status)))?;

    Ok(OrderRow {
        id,
        user_id,
        items: serde_json::from_str(&items)?,
        shipping_info: serde_json::from_str(&shipping_info)?,
        payment_info: serde_json::from_str(&payment_info)?,
        items_price,
        tax_price,
        shipping_price,
        total_price,
        order_status,
        paid_at,
        delivered_at,
        created_at,
    })
}

/// Create an order for a user. Payment is recorded as of now.
pub async fn create_order(
    pool: &SqlitePool,
    user_id: &str,
    input: &NewOrder,
) -> Result<OrderRow, SqliteError> {
    let id = cuid2::create_id();
    let now = chrono::Utc::now().timestamp();
    let status = OrderStatus::default();

    sqlx::query(
        "INSERT INTO orders (id, user_id, items, shipping_info, payment_info, items_price, tax_price, shipping_price, total_price, order_status, paid_at, delivered_at, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, NULL, ?)",
    )
    .bind(&id)
    .bind(user_id)
    .bind(serde_json::to_string(&input.items)?)
    .bind(serde_json::to_string(&input.shipping_info)?)
    .bind(serde_json::to_string(&input.payment_info)?)
    .bind(input.items_price)
    .bind(input.tax_price)
    .bind(input.shipping_price)
    .bind(input.total_price)
    .bind(status.as_str())
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    tracing::debug!(order_id = %id, %user_id, items = input.items.len(), "Order created");

    Ok(OrderRow {
        id,
        user_id: user_id.to_string(),
        items: input.items.clone(),
        shipping_info: input.shipping_info.clone(),
        payment_info: input.payment_info.clone(),
        items_price: input.items_price,
        tax_price: input.tax_price,
        shipping_price: input.shipping_price,
        total_price: input.total_price,
        order_status: status,
        paid_at: now,
        delivered_at: None,
        created_at: now,
    })
}

/// Get an order by ID
pub async fn get_order(pool: &SqlitePool, id: &str) -> Result<Option<OrderRow>, SqliteError> {
    let sql = format!("SELECT {} FROM orders WHERE id = ?", ORDER_COLUMNS);
    let row = sqlx::query_as::<_, OrderTuple>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(row_to_order).transpose()
}

/// List a user's orders, newest first
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<OrderRow>, SqliteError> {
    let sql = format!(
        "SELECT {} FROM orders WHERE user_id = ? ORDER BY created_at DESC, id",
        ORDER_COLUMNS
    );
    sqlx::query_as::<_, OrderTuple>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(row_to_order)
        .collect()
}

/// List all orders, newest first
pub async fn list_orders(pool: &SqlitePool) -> Result<Vec<OrderRow>, SqliteError> {
    let sql = format!(
        "SELECT {} FROM orders ORDER BY created_at DESC, id",
        ORDER_COLUMNS
    );
    sqlx::query_as::<_, OrderTuple>(&sql)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(row_to_order)
        .collect()
}

/// Atomically move an order to a new status.
///
/// Delivered orders are final; the read and the write share a transaction so
/// a concurrent delivery cannot be overwritten.
pub async fn update_order_status(
    pool: &SqlitePool,
    id: &str,
    requested: OrderStatus,
) -> Result<OrderStatusUpdate, SqliteError> {
    let mut tx = pool.begin().await?;

    let sql = format!("SELECT {} FROM orders WHERE id = ?", ORDER_COLUMNS);
    let row = sqlx::query_as::<_, OrderTuple>(&sql)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

    let Some(row) = row else {
        return Ok(OrderStatusUpdate::NotFound);
    };
    let mut order = row_to_order(row)?;

    let now = chrono::Utc::now().timestamp();
    let change = match apply_status(order.order_status, requested, now) {
        Ok(change) => change,
        Err(OrderTransitionError::AlreadyDelivered) => {
            return Ok(OrderStatusUpdate::AlreadyDelivered);
        }
    };

    sqlx::query("UPDATE orders SET order_status = ?, delivered_at = ? WHERE id = ?")
        .bind(change.status.as_str())
        .bind(change.delivered_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    order.order_status = change.status;
    order.delivered_at = change.delivered_at;

    tracing::debug!(order_id = %id, status = %change.status, "Order status updated");
    Ok(OrderStatusUpdate::Updated(order))
}

/// Delete an order by ID. Returns true if an order was deleted.
pub async fn delete_order(pool: &SqlitePool, id: &str) -> Result<bool, SqliteError> {
    let result = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::super::product::tests::setup_test_pool;
    use super::*;
    use crate::data::types::{OrderItem, PaymentInfo, ShippingInfo};

    fn new_order(total: f64) -> NewOrder {
        NewOrder {
            items: vec![OrderItem {
                product_id: "p1".to_string(),
                name: "Phone".to_string(),
                price: total,
                quantity: 1,
                image: "https://img.example.com/p1.png".to_string(),
            }],
            shipping_info: ShippingInfo {
                address: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                phone_no: "5550100".to_string(),
                postal_code: "12345".to_string(),
                country: "US".to_string(),
            },
            payment_info: PaymentInfo {
                id: "pay_1".to_string(),
                status: "succeeded".to_string(),
            },
            items_price: total,
            tax_price: 0.0,
            shipping_price: 0.0,
            total_price: total,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_order() {
        let pool = setup_test_pool().await;
        let order = create_order(&pool, "u1", &new_order(99.0)).await.unwrap();

        assert_eq!(order.order_status, OrderStatus::Processing);
        assert!(order.delivered_at.is_none());
        assert_eq!(order.paid_at, order.created_at);

        let stored = get_order(&pool, &order.id).await.unwrap().unwrap();
        assert_eq!(stored.user_id, "u1");
        assert_eq!(stored.items, order.items);
        assert_eq!(stored.shipping_info, order.shipping_info);
        assert_eq!(stored.payment_info, order.payment_info);
    }

    #[tokio::test]
    async fn test_list_for_user_only_returns_own_orders() {
        let pool = setup_test_pool().await;
        create_order(&pool, "u1", &new_order(10.0)).await.unwrap();
        create_order(&pool, "u1", &new_order(20.0)).await.unwrap();
        create_order(&pool, "u2", &new_order(30.0)).await.unwrap();

        assert_eq!(list_for_user(&pool, "u1").await.unwrap().len(), 2);
        assert_eq!(list_for_user(&pool, "u3").await.unwrap().len(), 0);
        assert_eq!(list_orders(&pool).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_status_to_delivered_stamps_time() {
        let pool = setup_test_pool().await;
        let order = create_order(&pool, "u1", &new_order(10.0)).await.unwrap();

        let result = update_order_status(&pool, &order.id, OrderStatus::Delivered)
            .await
            .unwrap();
        let OrderStatusUpdate::Updated(updated) = result else {
            panic!("expected update, got {:?}", result);
        };
        assert_eq!(updated.order_status, OrderStatus::Delivered);
        assert!(updated.delivered_at.is_some());

        let stored = get_order(&pool, &order.id).await.unwrap().unwrap();
        assert_eq!(stored.delivered_at, updated.delivered_at);
    }

    #[tokio::test]
    async fn test_delivered_order_cannot_change() {
        let pool = setup_test_pool().await;
        let order = create_order(&pool, "u1", &new_order(10.0)).await.unwrap();
        update_order_status(&pool, &order.id, OrderStatus::Delivered)
            .await
            .unwrap();

        let result = update_order_status(&pool, &order.id, OrderStatus::Shipped)
            .await
            .unwrap();
        assert!(matches!(result, OrderStatusUpdate::AlreadyDelivered));

        let stored = get_order(&pool, &order.id).await.unwrap().unwrap();
        assert_eq!(stored.order_status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_update_status_not_found() {
        let pool = setup_test_pool().await;
        let result = update_order_status(&pool, "missing", OrderStatus::Shipped)
            .await
            .unwrap();
        assert!(matches!(result, OrderStatusUpdate::NotFound));
    }

    #[tokio::test]
    async fn test_delete_order() {
        let pool = setup_test_pool().await;
        let order = create_order(&pool, "u1", &new_order(10.0)).await.unwrap();

        assert!(delete_order(&pool, &order.id).await.unwrap());
        assert!(!delete_order(&pool, &order.id).await.unwrap());
        assert!(get_order(&pool, &order.id).await.unwrap().is_none());
    }
}
