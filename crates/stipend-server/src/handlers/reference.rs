//! Reference table handlers

use axum::Json;
use stipend_core::reference::{self, CategoryInfo, MetroInfo, ServiceInfo};

/// GET /api/reference/metros
pub async fn list_metros() -> Json<Vec<MetroInfo>> {
    Json(reference::metros())
}

/// GET /api/reference/services
pub async fn list_services() -> Json<Vec<ServiceInfo>> {
    Json(reference::services())
}

/// GET /api/reference/categories
pub async fn list_categories() -> Json<Vec<CategoryInfo>> {
    Json(reference::categories())
}
