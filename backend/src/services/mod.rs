//! Business logic services for the order intake server

pub mod customer;
pub mod liff_order;
pub mod order_intake;
pub mod product;

pub use customer::CustomerService;
pub use liff_order::LiffOrderService;
pub use order_intake::OrderIntakeService;
pub use product::ProductService;
