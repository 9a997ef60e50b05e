//! Database Models

pub mod menu_item;
pub mod order;
pub mod store;

// Re-exports
pub use menu_item::{MenuItem, MenuItemCreate};
pub use order::{
    Order, OrderCreate, OrderItem, OrderItemSnapshot, OrderStatus, PaymentStatus,
};
pub use store::{Store, StoreCreate};
