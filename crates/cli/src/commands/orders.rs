//! Order commands. All of these need a signed-in session.

use tastebud_core::{OrderId, OrderStatus};
use tastebud_storefront::error::{AppError, Result};
use tastebud_storefront::state::AppState;

use super::authorized;
use crate::output;

pub async fn mine(state: &AppState) -> Result<()> {
    let orders = authorized(state, |token| async move {
        state.api().list_user_orders(&token).await
    })
    .await?;
    output::orders(&orders);
    Ok(())
}

pub async fn restaurant(state: &AppState) -> Result<()> {
    let orders = authorized(state, |token| async move {
        state.api().list_restaurant_orders(&token).await
    })
    .await?;
    output::orders(&orders);
    Ok(())
}

/// Update an order's status. Delivered and cancelled orders are final.
pub async fn set_status(state: &AppState, id: &OrderId, status: OrderStatus) -> Result<()> {
    let orders = authorized(state, |token| async move {
        state.api().list_restaurant_orders(&token).await
    })
    .await?;
    let current = orders.iter().find(|order| &order.id == id).map(|order| order.status);
    ensure_open(id, current)?;

    let order = authorized(state, |token| async move {
        state.api().update_order_status(id, status, &token).await
    })
    .await?;
    output::line(format!("Order {} is now {}", order.id, order.status.label()));
    Ok(())
}

/// Reject changes to a closed order. Orders missing from the restaurant's
/// list are left for the backend to judge.
fn ensure_open(id: &OrderId, current: Option<OrderStatus>) -> Result<()> {
    match current {
        Some(status) if !status.is_open() => Err(AppError::BadRequest(format!(
            "order {id} is {} and can no longer change",
            status.as_str()
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_orders_are_final() {
        let id = OrderId::new("42");
        for status in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            let err = ensure_open(&id, Some(status)).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
        assert_eq!(
            ensure_open(&id, Some(OrderStatus::Delivered))
                .unwrap_err()
                .to_string(),
            "Bad request: order 42 is delivered and can no longer change"
        );
    }

    #[test]
    fn test_open_or_unknown_orders_pass() {
        let id = OrderId::new("42");
        assert!(ensure_open(&id, Some(OrderStatus::Preparing)).is_ok());
        assert!(ensure_open(&id, None).is_ok());
    }
}
