use std::sync::Arc;

use crate::service::TokenService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TokenService>,
}

impl AppState {
    pub fn new(service: TokenService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
