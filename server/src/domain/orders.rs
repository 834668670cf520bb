//! Order status transitions

use thiserror::Error;

use crate::data::types::OrderStatus;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OrderTransitionError {
    #[error("This order has already been delivered")]
    AlreadyDelivered,
}

/// Result of applying a status change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub status: OrderStatus,
    pub delivered_at: Option<i64>,
}

/// Apply a requested status to an order currently in `current`.
///
/// Delivered orders are final. Moving to Delivered stamps `now` as the
/// delivery time; any other status clears it.
pub fn apply_status(
    current: OrderStatus,
    requested: OrderStatus,
    now: i64,
) -> Result<StatusChange, OrderTransitionError> {
    if current == OrderStatus::Delivered {
        return Err(OrderTransitionError::AlreadyDelivered);
    }

    let delivered_at = (requested == OrderStatus::Delivered).then_some(now);
    Ok(StatusChange {
        status: requested,
        delivered_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivered_is_final() {
        for requested in [
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            assert_eq!(
                apply_status(OrderStatus::Delivered, requested, 10),
                Err(OrderTransitionError::AlreadyDelivered)
            );
        }
    }

    #[test]
    fn test_delivery_stamps_time() {
        let change = apply_status(OrderStatus::Shipped, OrderStatus::Delivered, 42).unwrap();
        assert_eq!(change.status, OrderStatus::Delivered);
        assert_eq!(change.delivered_at, Some(42));
    }

    #[test]
    fn test_other_status_clears_delivery_time() {
        let change = apply_status(OrderStatus::Processing, OrderStatus::Shipped, 42).unwrap();
        assert_eq!(change.status, OrderStatus::Shipped);
        assert_eq!(change.delivered_at, None);
    }
}
