//! Rows for the static order-list table shown beside the charts.
//!
//! These are display fixtures only. Nothing here places or matches orders.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Open,
    PartiallyFilled,
    Filled,
    Cancelled,
}

/// One row of the order table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u32,
    pub pair: String,
    pub side: Side,
    pub price: f64,
    pub amount: f64,
    pub filled: f64,
    pub status: OrderStatus,
}

impl Order {
    /// Quote-currency value of the full order.
    pub fn total(&self) -> f64 {
        self.price * self.amount
    }

    /// Filled share in `[0, 1]`.
    pub fn fill_ratio(&self) -> f64 {
        if self.amount <= 0.0 {
            return 0.0;
        }
        (self.filled / self.amount).clamp(0.0, 1.0)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => f.write_str("BUY"),
            Side::Sell => f.write_str("SELL"),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Open => "Open",
            OrderStatus::PartiallyFilled => "Partial",
            OrderStatus::Filled => "Filled",
            OrderStatus::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

fn row(
    id: u32,
    pair: &str,
    side: Side,
    price: f64,
    amount: f64,
    filled: f64,
    status: OrderStatus,
) -> Order {
    Order {
        id,
        pair: pair.to_string(),
        side,
        price,
        amount,
        filled,
        status,
    }
}

/// The fixed order list rendered by the dashboard.
pub fn sample_orders() -> Vec<Order> {
    use OrderStatus::*;
    use Side::*;

    vec![
        row(1001, "ETH/USDT", Buy, 1702.50, 1.25, 1.25, Filled),
        row(1002, "ETH/USDT", Sell, 1715.00, 0.80, 0.00, Open),
        row(1003, "BTC/USDT", Buy, 42_150.00, 0.05, 0.02, PartiallyFilled),
        row(1004, "SOL/USDT", Sell, 98.40, 12.00, 12.00, Filled),
        row(1005, "ETH/USDT", Buy, 1690.25, 2.00, 0.00, Cancelled),
        row(1006, "BTC/USDT", Sell, 42_480.00, 0.10, 0.00, Open),
    ]
}

/// Renders `orders` as a fixed-width text table.
pub fn format_table(orders: &[Order]) -> String {
    let mut out = format!(
        "{:<6} {:<9} {:<4} {:>11} {:>9} {:>12} {:<9}\n",
        "ID", "PAIR", "SIDE", "PRICE", "AMOUNT", "TOTAL", "STATUS"
    );
    for o in orders {
        out.push_str(&format!(
            "{:<6} {:<9} {:<4} {:>11.2} {:>9.4} {:>12.2} {:<9}\n",
            o.id,
            o.pair,
            o.side.to_string(),
            o.price,
            o.amount,
            o.total(),
            o.status.to_string()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn sample_ids_are_unique() {
        let orders = sample_orders();
        let ids: HashSet<u32> = orders.iter().map(|o| o.id).collect();
        assert_eq!(ids.len(), orders.len());
    }

    #[test]
    fn filled_orders_are_fully_filled() {
        for o in sample_orders().iter().filter(|o| o.status == OrderStatus::Filled) {
            assert_eq!(o.fill_ratio(), 1.0, "order {}", o.id);
        }
    }

    #[test]
    fn table_has_header_and_one_line_per_order() {
        let orders = sample_orders();
        let table = format_table(&orders);
        assert!(table.starts_with("ID"));
        assert_eq!(table.lines().count(), orders.len() + 1);
        assert!(table.contains("BTC/USDT"));
    }
}
