// restoration-server/src/web/handlers/mod.rs

pub mod order_handlers;
pub mod payment_handlers;
pub mod system_handlers;
pub mod upload_handlers;
