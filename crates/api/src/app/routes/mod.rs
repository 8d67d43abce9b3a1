use axum::{
    routing::{get, post, put},
    Router,
};

pub mod products;
pub mod system;
pub mod tokens;
pub mod users;

/// Routes that carry their own credentials (or none).
///
/// Sign-out and renew read the bearer token themselves: renew must accept an
/// access token that has already expired.
pub fn public_router() -> Router {
    Router::new()
        .route("/user/sign/up", post(users::sign_up))
        .route("/user/sign/in", post(users::sign_in))
        .route("/user/sign/out", post(users::sign_out))
        .route("/token/renew", post(tokens::renew))
        .route("/products", get(products::list_products))
        .route("/product/:id", get(products::get_product))
}

/// Routes behind the bearer middleware.
pub fn protected_router() -> Router {
    Router::new()
        .route("/product", post(products::create_product))
        .route(
            "/product/:id",
            put(products::update_product).delete(products::delete_product),
        )
}
