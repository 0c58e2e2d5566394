use actix_web::{
    web::{self, Data, Json, Path, Query},
    HttpResponse,
};
use log::info;

use crate::{
    endpoints::handlers::{
        configs::{admin_guard::AdminSession, context::GeneralContext},
        rest::dashboard_page::{render_dashboard, DashboardView},
    },
    error::{ApiError, RepoResult},
    models::payment::{
        DashboardData, DashboardFilter, DashboardQuery, DashboardRow, PaymentDetail,
        ToggleRequest, ToggleResponse,
    },
    repos::payment::LATEST_PAYMENTS_LIMIT,
};

/// GET /admin/
pub async fn dashboard_view(
    _admin: AdminSession,
    context: Data<GeneralContext>,
    query: Query<DashboardQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let filter = DashboardFilter::from_query(&query);

    let repo = context.payment_repo();
    let page_filter = filter.clone();
    let (page, stats) = web::block(move || -> RepoResult<_> {
        let page = repo.get_dashboard_page(&page_filter, query.page.as_deref())?;
        Ok((page, repo.get_stats()?))
    })
    .await??;

    let html = render_dashboard(&DashboardView {
        page: &page,
        stats: &stats,
        filter: &filter,
        receipts: &context.receipts,
    });

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

/// POST /admin/toggle-confirmation/
pub async fn toggle_confirmation(
    admin: AdminSession,
    context: Data<GeneralContext>,
    body: Json<ToggleRequest>,
) -> Result<HttpResponse, ApiError> {
    let ToggleRequest {
        payment_id,
        confirmed,
    } = body.into_inner();

    let repo = context.payment_repo();
    let payment = web::block(move || repo.set_confirmed(payment_id, confirmed))
        .await??
        .ok_or(ApiError::NotFound)?;

    info!(
        "{} set payment {} confirmed={}",
        admin.user, payment.id, payment.confirmed
    );

    Ok(HttpResponse::Ok().json(ToggleResponse::from_payment(&payment)))
}

/// GET /admin/payment/{id}/
pub async fn payment_detail(
    _admin: AdminSession,
    context: Data<GeneralContext>,
    payment_id: Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let payment_id = payment_id.into_inner();
    let repo = context.payment_repo();
    let payment = web::block(move || repo.get_payment(payment_id))
        .await??
        .ok_or(ApiError::NotFound)?;

    Ok(HttpResponse::Ok().json(PaymentDetail::from_payment(payment, &context.receipts)))
}

/// GET /admin/api/dashboard-data/
pub async fn dashboard_data(
    _admin: AdminSession,
    context: Data<GeneralContext>,
) -> Result<HttpResponse, ApiError> {
    let repo = context.payment_repo();
    let (latest, stats) = web::block(move || -> RepoResult<_> {
        Ok((
            repo.get_latest_payments(LATEST_PAYMENTS_LIMIT)?,
            repo.get_stats()?,
        ))
    })
    .await??;

    Ok(HttpResponse::Ok().json(DashboardData {
        payments: latest
            .into_iter()
            .map(|payment| DashboardRow::from_payment(payment, &context.receipts))
            .collect(),
        stats,
    }))
}
