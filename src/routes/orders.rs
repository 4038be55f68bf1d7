use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};

use crate::{
    dto::orders::{
        CheckoutRequest, CheckoutResponse, OwnershipQuery, OwnershipResponse, PurchasedCourses,
        TransactionList,
    },
    error::AppResult,
    middleware::auth::{AuthUser, MaybeAuthUser},
    response::{ApiResponse, Meta},
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_my_orders))
        .route("/checkout", post(checkout))
        .route("/purchased", get(purchased))
        .route("/owned", get(owned))
}

#[utoipa::path(
    post,
    path = "/api/orders/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Transaction recorded", body = ApiResponse<CheckoutResponse>),
        (status = 400, description = "Invalid checkout payload"),
        (status = 409, description = "Payment reference already used"),
    ),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutResponse>>> {
    let resp = order_service::checkout(&state, user.as_ref(), payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Current user's transactions, newest first", body = ApiResponse<TransactionList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_my_orders(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<TransactionList>>> {
    let resp = order_service::list_user_transactions(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/purchased",
    responses(
        (status = 200, description = "Courses the current user owns", body = ApiResponse<PurchasedCourses>)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn purchased(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<PurchasedCourses>>> {
    let items = order_service::purchased_courses(&state, user.user_id).await?;
    Ok(Json(ApiResponse::success(
        "Purchased courses",
        PurchasedCourses { items },
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/orders/owned",
    params(
        ("course" = String, Query, description = "Course name, matched exactly")
    ),
    responses(
        (status = 200, description = "Whether the current user purchased the course", body = ApiResponse<OwnershipResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn owned(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OwnershipQuery>,
) -> AppResult<Json<ApiResponse<OwnershipResponse>>> {
    let purchased = order_service::has_purchased(&state, user.user_id, &query.course).await?;
    Ok(Json(ApiResponse::success(
        "Ok",
        OwnershipResponse { purchased },
        Some(Meta::empty()),
    )))
}
