use crate::aggregate_id;
use crate::domain::a001_order::Order;
use crate::domain::a001_order::OrderId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

aggregate_id!(
    /// Payment identifier
    PaymentId
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    Card,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub amount: f64,
    pub method: Option<PaymentMethod>,
    pub date: NaiveDateTime,
}

impl Payment {
    /// A payment must be positive and may not exceed what the order still owes.
    pub fn validate_against(&self, order: &Order) -> Result<(), String> {
        if self.order_id != order.id {
            return Err(format!(
                "Payment {} belongs to order {}, not {}",
                self.id, self.order_id, order.id
            ));
        }
        if self.amount <= 0.0 {
            return Err(format!("Payment {}: amount must be positive", self.id));
        }
        let outstanding = order.outstanding_debt();
        if self.amount > outstanding {
            return Err(format!(
                "Payment {}: amount {:.2} exceeds outstanding debt {:.2}",
                self.id, self.amount, outstanding
            ));
        }
        Ok(())
    }
}
