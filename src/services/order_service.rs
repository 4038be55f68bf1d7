use std::collections::HashMap;

use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, SqlErr,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{CheckoutRequest, CheckoutResponse, TransactionList},
    entity::{
        transaction_courses::{
            ActiveModel as TransactionCourseActive, Column as TxCourseCol,
            Entity as TransactionCourses,
        },
        transactions::{
            ActiveModel as TransactionActive, Column as TxCol, Entity as Transactions,
            Model as TransactionModel,
        },
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Course, STATUS_CONFIRMED, Transaction},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn validate_checkout(payload: &CheckoutRequest) -> Result<(), AppError> {
    if payload.reference.trim().is_empty() {
        return Err(AppError::BadRequest("Payment reference is required".into()));
    }
    if payload.course_names.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }
    if payload.total_amount < 0 {
        return Err(AppError::BadRequest("Total must not be negative".into()));
    }
    Ok(())
}

/// Persist one checkout attempt. The payment reference carries a unique
/// index, so a duplicate surfaces as a constraint violation and the whole
/// write (transaction row plus course rows) rolls back.
pub async fn create_transaction(
    state: &AppState,
    user_id: Option<Uuid>,
    payload: &CheckoutRequest,
) -> AppResult<Transaction> {
    validate_checkout(payload)?;

    let txn = state.orm.begin().await?;
    let now = Utc::now();

    let stored = TransactionActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        customer_name: Set(payload.customer_name.clone()),
        payer_email: Set(payload.payer_email.clone()),
        reference: Set(payload.reference.clone()),
        total_amount: Set(payload.total_amount),
        // The creation path never produces a pending transaction; the
        // reference is taken at face value and the order auto-confirms.
        status: Set(STATUS_CONFIRMED.to_string()),
        created_at: Set(now.into()),
    }
    .insert(&txn)
    .await
    .map_err(map_reference_conflict)?;

    for name in &payload.course_names {
        TransactionCourseActive {
            id: Set(Uuid::new_v4()),
            transaction_id: Set(stored.id),
            course_name: Set(name.clone()),
            created_at: Set(now.into()),
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    Ok(transaction_from_entity(
        stored,
        payload.course_names.clone(),
    ))
}

fn map_reference_conflict(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateReference,
        _ => AppError::OrmError(err),
    }
}

/// Full checkout flow: persist the transaction, then hand the receipt to
/// the dispatcher. Delivery is best-effort and never unwinds the already
/// committed transaction.
pub async fn checkout(
    state: &AppState,
    user: Option<&AuthUser>,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<CheckoutResponse>> {
    let transaction = create_transaction(state, user.map(|u| u.user_id), &payload).await?;

    let receipt_emailed = state.notifier.send_receipt(&transaction).await;

    if let Err(err) = log_audit(
        &state.pool,
        transaction.user_id,
        "checkout",
        Some("transactions"),
        Some(serde_json::json!({
            "transaction_id": transaction.id,
            "reference": transaction.reference,
            "receipt_emailed": receipt_emailed,
        })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Checkout success",
        CheckoutResponse {
            transaction,
            receipt_emailed,
        },
        Some(Meta::empty()),
    ))
}

/// Every transaction, newest first, with its course-name list. Pagination
/// is left to callers; the admin dashboard and the purchase-fact helpers
/// both consume the full sequence.
pub async fn list_transactions(state: &AppState) -> AppResult<Vec<Transaction>> {
    let rows = Transactions::find()
        .order_by_desc(TxCol::CreatedAt)
        .all(&state.orm)
        .await?;

    assemble_with_courses(state, rows).await
}

pub async fn list_user_transactions(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<TransactionList>> {
    let rows = Transactions::find()
        .filter(TxCol::UserId.eq(user.user_id))
        .order_by_desc(TxCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let items = assemble_with_courses(state, rows).await?;
    Ok(ApiResponse::success(
        "Ok",
        TransactionList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_transaction(state: &AppState, id: Uuid) -> AppResult<Transaction> {
    let row = Transactions::find_by_id(id).one(&state.orm).await?;
    let row = match row {
        Some(t) => t,
        None => return Err(AppError::NotFound),
    };
    let courses = course_names_for(state, row.id).await?;
    Ok(transaction_from_entity(row, courses))
}

/// Unconditionally promotes the transaction to confirmed. Confirming an
/// already-confirmed transaction changes nothing; there is no transition
/// away from confirmed.
pub async fn confirm_transaction(state: &AppState, id: Uuid) -> AppResult<Transaction> {
    let existing = Transactions::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(t) => t,
        None => return Err(AppError::NotFound),
    };

    let stored = if existing.status == STATUS_CONFIRMED {
        existing
    } else {
        let mut active: TransactionActive = existing.into();
        active.status = Set(STATUS_CONFIRMED.to_string());
        active.update(&state.orm).await?
    };

    let courses = course_names_for(state, stored.id).await?;
    Ok(transaction_from_entity(stored, courses))
}

/// True iff some confirmed transaction of this user lists the course by
/// exactly this name. Pending transactions never count.
pub async fn has_purchased(
    state: &AppState,
    user_id: Uuid,
    course_name: &str,
) -> AppResult<bool> {
    let (purchased,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM transactions t
            JOIN transaction_courses tc ON tc.transaction_id = t.id
            WHERE t.user_id = $1 AND t.status = $2 AND tc.course_name = $3
        )
        "#,
    )
    .bind(user_id)
    .bind(STATUS_CONFIRMED)
    .bind(course_name)
    .fetch_one(&state.pool)
    .await?;

    Ok(purchased)
}

/// The user's confirmed purchases resolved against the current catalog.
/// The join is by course name, so a course renamed after purchase drops
/// out of the result.
pub async fn purchased_courses(state: &AppState, user_id: Uuid) -> AppResult<Vec<Course>> {
    let courses = sqlx::query_as::<_, Course>(
        r#"
        SELECT c.*
        FROM courses c
        WHERE c.name IN (
            SELECT tc.course_name
            FROM transactions t
            JOIN transaction_courses tc ON tc.transaction_id = t.id
            WHERE t.user_id = $1 AND t.status = $2
        )
        ORDER BY c.id
        "#,
    )
    .bind(user_id)
    .bind(STATUS_CONFIRMED)
    .fetch_all(&state.pool)
    .await?;

    Ok(courses)
}

async fn assemble_with_courses(
    state: &AppState,
    rows: Vec<TransactionModel>,
) -> AppResult<Vec<Transaction>> {
    let ids: Vec<Uuid> = rows.iter().map(|t| t.id).collect();
    let mut by_transaction: HashMap<Uuid, Vec<String>> = HashMap::new();

    if !ids.is_empty() {
        let children = TransactionCourses::find()
            .filter(TxCourseCol::TransactionId.is_in(ids))
            .order_by_asc(TxCourseCol::CreatedAt)
            .all(&state.orm)
            .await?;
        for child in children {
            by_transaction
                .entry(child.transaction_id)
                .or_default()
                .push(child.course_name);
        }
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let courses = by_transaction.remove(&row.id).unwrap_or_default();
            transaction_from_entity(row, courses)
        })
        .collect())
}

async fn course_names_for(state: &AppState, transaction_id: Uuid) -> AppResult<Vec<String>> {
    let names = TransactionCourses::find()
        .filter(TxCourseCol::TransactionId.eq(transaction_id))
        .order_by_asc(TxCourseCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|c| c.course_name)
        .collect();
    Ok(names)
}

fn transaction_from_entity(model: TransactionModel, courses: Vec<String>) -> Transaction {
    Transaction {
        id: model.id,
        user_id: model.user_id,
        customer_name: model.customer_name,
        payer_email: model.payer_email,
        reference: model.reference,
        courses,
        total_amount: model.total_amount,
        status: model.status,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::validate_checkout;
    use crate::dto::orders::CheckoutRequest;
    use crate::error::AppError;

    fn draft() -> CheckoutRequest {
        CheckoutRequest {
            customer_name: "Ada".into(),
            payer_email: "ada@example.com".into(),
            course_names: vec!["Intro to Go".into()],
            total_amount: 999,
            reference: "TXN-001".into(),
        }
    }

    #[test]
    fn accepts_a_complete_draft() {
        assert!(validate_checkout(&draft()).is_ok());
    }

    #[test]
    fn rejects_blank_reference() {
        let mut payload = draft();
        payload.reference = "   ".into();
        assert!(matches!(
            validate_checkout(&payload),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn rejects_empty_cart_and_negative_total() {
        let mut payload = draft();
        payload.course_names.clear();
        assert!(validate_checkout(&payload).is_err());

        let mut payload = draft();
        payload.total_amount = -1;
        assert!(validate_checkout(&payload).is_err());
    }
}
