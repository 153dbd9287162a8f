pub mod aggregate;

pub use aggregate::{Payment, PaymentId, PaymentMethod};
