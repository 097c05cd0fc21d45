//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the driving
//! ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountService, OrderService, ProductService, ReviewService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub products: Arc<dyn ProductService>,
    pub reviews: Arc<dyn ReviewService>,
    pub orders: Arc<dyn OrderService>,
}

impl HttpState {
    pub fn new(
        accounts: Arc<dyn AccountService>,
        products: Arc<dyn ProductService>,
        reviews: Arc<dyn ReviewService>,
        orders: Arc<dyn OrderService>,
    ) -> Self {
        Self {
            accounts,
            products,
            reviews,
            orders,
        }
    }
}
