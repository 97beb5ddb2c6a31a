//! Terminal output.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fmt::Display;

use tastebud_core::{CartState, CartSummary};
use tastebud_storefront::gateway::{MenuItem, Order, Restaurant};
use tastebud_storefront::models::User;
use tastebud_storefront::services::CheckoutGate;

pub fn line(message: impl Display) {
    println!("{message}");
}

/// Print to stderr and exit. Used before logging is set up.
pub fn fatal(message: &str) -> ! {
    eprintln!("{message}");
    std::process::exit(2);
}

pub fn restaurants(restaurants: &[Restaurant]) {
    if restaurants.is_empty() {
        println!("No restaurants found");
        return;
    }
    for r in restaurants {
        println!(
            "{:>4}  {:<28} {:<12} {:.1}*  {:<10} {}",
            r.id,
            r.name,
            r.cuisine,
            r.rating,
            r.delivery_time,
            delivery_fee(r)
        );
    }
}

pub fn restaurant_detail(r: &Restaurant) {
    println!("{} ({})", r.name, r.cuisine);
    if !r.description.is_empty() {
        println!("  {}", r.description);
    }
    if !r.address.is_empty() {
        println!("  {}", r.address);
    }
    println!(
        "  Rating {:.1}  |  {}  |  {}",
        r.rating,
        r.delivery_time,
        delivery_fee(r)
    );
}

pub fn menu(items: &[MenuItem]) {
    if items.is_empty() {
        println!("No menu items");
        return;
    }

    let mut category: Option<&str> = None;
    for item in items {
        if category != Some(item.category.as_str()) {
            category = Some(item.category.as_str());
            if !item.category.is_empty() {
                println!("\n[{}]", item.category);
            }
        }
        let availability = if item.is_available { "" } else { "  (unavailable)" };
        println!("{:>4}  {:<32} {:>8}{availability}", item.id, item.name, item.price.to_string());
    }
}

pub fn orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("No orders yet");
        return;
    }
    for order in orders {
        let placed = order
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "#{:<6} {:<12} {:>9}  {placed}",
            order.id,
            order.status.label(),
            order.total.to_string()
        );
        for item in &order.items {
            println!("         {} x {} @ {}", item.quantity, item.name, item.price);
        }
    }
}

pub fn user(user: &User) {
    println!("{} <{}>", user.full_name, user.email);
    println!("  id:   {}", user.id);
    println!("  role: {}", user.role.label());
}

pub fn cart(cart: &CartState, gate: &CheckoutGate) {
    for item in cart.items() {
        println!(
            "{:>3} x {:<28} {:>9}  ({})",
            item.quantity,
            item.name,
            item.line_total().to_string(),
            item.restaurant_name
        );
    }

    let summary = CartSummary::from(cart);
    println!();
    println!("Subtotal ({} items) {:>9}", summary.item_count, summary.subtotal.to_string());
    println!("Delivery            {:>9}", summary.delivery_fee.to_string());
    println!("Tax                 {:>9}", summary.tax.to_string());
    println!("Total               {:>9}", summary.grand_total.to_string());
    if let Some(remaining) = summary.free_delivery_remaining() {
        println!("Add {remaining} more for free delivery");
    }
    println!("\n{}", gate.message());
}

fn delivery_fee(r: &Restaurant) -> String {
    if r.has_free_delivery() {
        "free delivery".to_string()
    } else {
        format!("{} delivery", r.delivery_fee)
    }
}
