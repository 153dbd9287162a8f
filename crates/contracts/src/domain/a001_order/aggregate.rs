use crate::aggregate_id;
use crate::domain::a002_client::ClientId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

aggregate_id!(
    /// Order identifier
    OrderId
);

/// Payment state of an order. The three states are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Partially paid (`ABONO`)
    Abono,
    /// Fully settled (`LIQUIDADO`)
    Liquidado,
    /// Nothing paid yet (`NO_PAGADO`)
    NoPagado,
}

impl OrderStatus {
    /// Fixed display order used by every status breakdown.
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Liquidado,
        OrderStatus::Abono,
        OrderStatus::NoPagado,
    ];

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "abono" => Ok(OrderStatus::Abono),
            "liquidado" => Ok(OrderStatus::Liquidado),
            "no_pagado" => Ok(OrderStatus::NoPagado),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Abono => "abono",
            OrderStatus::Liquidado => "liquidado",
            OrderStatus::NoPagado => "no_pagado",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Abono => "Abono",
            OrderStatus::Liquidado => "Liquidado",
            OrderStatus::NoPagado => "No pagado",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

/// Sales order as stored by the CRUD layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub client_id: ClientId,
    /// Client name captured when the order was placed
    pub client_name: Option<String>,
    /// Local wall-clock time of the order
    pub date: NaiveDateTime,
    pub total: f64,
    pub status: OrderStatus,
    pub is_credit: bool,
    pub remaining_debt: Option<f64>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub discount: Option<f64>,
    pub tax: Option<f64>,
    pub notes: Option<String>,
}

impl Order {
    /// Debt still owed on this order, clamped into `[0, total]`.
    ///
    /// Settled orders never carry debt, whatever `remaining_debt` says.
    pub fn outstanding_debt(&self) -> f64 {
        if self.status == OrderStatus::Liquidado {
            return 0.0;
        }
        match self.remaining_debt {
            Some(debt) if debt > 0.0 => debt.min(self.total.max(0.0)),
            _ => 0.0,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.status == OrderStatus::Liquidado
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.total < 0.0 {
            return Err(format!("Order {}: total must not be negative", self.id));
        }
        if let Some(debt) = self.remaining_debt {
            if debt < 0.0 || debt > self.total {
                return Err(format!(
                    "Order {}: remaining debt {} outside [0, {}]",
                    self.id, debt, self.total
                ));
            }
            if !self.is_credit && debt > 0.0 {
                return Err(format!("Order {}: debt on a non-credit order", self.id));
            }
        }
        if self.status == OrderStatus::Liquidado && self.remaining_debt.unwrap_or(0.0) > 0.0 {
            return Err(format!("Order {}: settled order still owes debt", self.id));
        }
        Ok(())
    }
}
