//! Checkout readiness.
//!
//! Checkout does not place orders. The gate only reports whether the
//! current cart and session would allow it.

use tastebud_core::{CartState, CartSummary};

use crate::models::session::SessionState;

/// Whether checkout can proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutGate {
    /// Nothing in the cart.
    EmptyCart,
    /// The cart has items but no one is signed in.
    SignInRequired,
    /// Ready, with the figures that would be charged.
    Ready(CartSummary),
}

impl CheckoutGate {
    /// Evaluate the gate for a cart and session.
    #[must_use]
    pub fn evaluate(cart: &CartState, session: &SessionState) -> Self {
        if cart.is_empty() {
            Self::EmptyCart
        } else if !session.is_authenticated() {
            Self::SignInRequired
        } else {
            Self::Ready(CartSummary::from(cart))
        }
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Short message for display.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyCart => "Your cart is empty",
            Self::SignInRequired => "Sign in to check out",
            Self::Ready(_) => "Ready to check out",
        }
    }
}
