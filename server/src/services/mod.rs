// restoration-server/src/services/mod.rs

pub mod payment;
pub mod payment_mock;

pub use payment::{PaymentGateway, PaymentIntent, PaymentIntentRequest};
pub use payment_mock::MockPaymentGateway;
