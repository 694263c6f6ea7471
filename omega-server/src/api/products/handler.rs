//! Product catalog API handlers

use axum::extract::{Extension, Path, State};
use axum::Json;

use shared::models::Product;
use shared::util::new_id;
use shared::{AppError, AppResult};

use crate::api::auth::{CurrentUser, require_admin};
use crate::core::ServerState;
use crate::money;

/// GET /api/products
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let mut products: Vec<Product> = state.ledger.list().await?;
    products.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(products))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let product: Product = state
        .ledger
        .get(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id}")))?;
    Ok(Json(product))
}

/// POST /api/products - admin upsert; a blank id creates a new product
pub async fn upsert(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Json(mut product): Json<Product>,
) -> AppResult<Json<Product>> {
    require_admin(&user)?;
    money::require_finite(product.price_list, "list price")?;
    money::require_finite(product.price_reseller, "reseller price")?;
    if product.price_list < 0.0 || product.price_reseller < 0.0 {
        return Err(AppError::validation("prices must be non-negative"));
    }
    if product.id.is_empty() {
        product.id = new_id();
    }
    state.ledger.put(&product).await?;
    Ok(Json(product))
}
