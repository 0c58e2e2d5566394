pub mod utils;

use diesel::{
    dsl::{sql, sum},
    prelude::*,
    sql_types::{Bool, Text},
    sqlite::Sqlite,
};
use log::debug;

use crate::{
    endpoints::handlers::configs::connection_pool::{DbConn, DbPool},
    error::RepoResult,
    models::payment::{
        DashboardFilter, NewPayment, Payment, PaymentPage, PaymentStats, StatusFilter,
    },
    schema::payments,
};

use utils::{escape_like, resolve_page};

pub const DASHBOARD_PAGE_SIZE: i64 = 20;
pub const LATEST_PAYMENTS_LIMIT: i64 = 20;

#[derive(Clone)]
pub struct PaymentRepo {
    pub pool: DbPool,
}

// search + status, never ordered or paginated here
fn filtered_payments(filter: &DashboardFilter) -> payments::BoxedQuery<'static, Sqlite> {
    let mut query = payments::table.into_boxed();

    if !filter.search.is_empty() {
        let pattern = format!("%{}%", escape_like(&filter.search));
        let matric_matches = sql::<Bool>("CAST(matric_number AS TEXT) LIKE ")
            .bind::<Text, _>(pattern.clone())
            .sql(" ESCAPE '\\'");

        query = query.filter(
            payments::name
                .like(pattern)
                .escape('\\')
                .or(matric_matches),
        );
    }

    match filter.status {
        StatusFilter::All => query,
        StatusFilter::Confirmed => query.filter(payments::confirmed.eq(true)),
        StatusFilter::Pending => query.filter(payments::confirmed.eq(false)),
    }
}

impl PaymentRepo {
    pub fn init(pool: DbPool) -> PaymentRepo {
        PaymentRepo { pool }
    }

    fn conn(&self) -> RepoResult<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Every payment, newest first
    pub fn get_all_payments(&self) -> RepoResult<Vec<Payment>> {
        let mut conn = self.conn()?;

        Ok(payments::table
            .order((payments::timestamp.desc(), payments::id.desc()))
            .select(Payment::as_select())
            .load(&mut conn)?)
    }

    pub fn get_payments_by_matric_number(&self, matric_number: i64) -> RepoResult<Vec<Payment>> {
        let mut conn = self.conn()?;

        Ok(payments::table
            .filter(payments::matric_number.eq(matric_number))
            .order((payments::timestamp.desc(), payments::id.desc()))
            .select(Payment::as_select())
            .load(&mut conn)?)
    }

    pub fn create_payment(&self, new_payment: NewPayment) -> RepoResult<Payment> {
        let mut conn = self.conn()?;

        let payment = diesel::insert_into(payments::table)
            .values(&new_payment)
            .returning(Payment::as_returning())
            .get_result(&mut conn)?;

        debug!("Inserted payment row {}", payment.id);
        Ok(payment)
    }

    pub fn get_payment(&self, payment_id: i32) -> RepoResult<Option<Payment>> {
        let mut conn = self.conn()?;

        Ok(payments::table
            .find(payment_id)
            .select(Payment::as_select())
            .first(&mut conn)
            .optional()?)
    }

    /// Sets the confirmation flag, `None` when there is no such payment
    pub fn set_confirmed(&self, payment_id: i32, confirmed: bool) -> RepoResult<Option<Payment>> {
        let mut conn = self.conn()?;

        Ok(diesel::update(payments::table.find(payment_id))
            .set(payments::confirmed.eq(confirmed))
            .returning(Payment::as_returning())
            .get_result(&mut conn)
            .optional()?)
    }

    /// One page of the dashboard listing after search and status filtering.
    ///
    /// The requested page is clamped into range, so this never fails on a bad page number.
    pub fn get_dashboard_page(
        &self,
        filter: &DashboardFilter,
        requested_page: Option<&str>,
    ) -> RepoResult<PaymentPage> {
        let mut conn = self.conn()?;

        let total_count: i64 = filtered_payments(filter).count().get_result(&mut conn)?;
        let window = resolve_page(requested_page, total_count, DASHBOARD_PAGE_SIZE);

        let page_payments = filtered_payments(filter)
            .order((payments::timestamp.desc(), payments::id.desc()))
            .limit(DASHBOARD_PAGE_SIZE)
            .offset(window.offset)
            .select(Payment::as_select())
            .load(&mut conn)?;

        Ok(PaymentPage {
            payments: page_payments,
            number: window.number,
            num_pages: window.num_pages,
            total_count,
            per_page: DASHBOARD_PAGE_SIZE,
        })
    }

    pub fn get_latest_payments(&self, limit: i64) -> RepoResult<Vec<Payment>> {
        let mut conn = self.conn()?;

        Ok(payments::table
            .order((payments::timestamp.desc(), payments::id.desc()))
            .limit(limit)
            .select(Payment::as_select())
            .load(&mut conn)?)
    }

    /// Counts and confirmed total over the whole table, filters never apply here
    pub fn get_stats(&self) -> RepoResult<PaymentStats> {
        let mut conn = self.conn()?;

        let total: i64 = payments::table.count().get_result(&mut conn)?;
        let confirmed: i64 = payments::table
            .filter(payments::confirmed.eq(true))
            .count()
            .get_result(&mut conn)?;
        let pending: i64 = payments::table
            .filter(payments::confirmed.eq(false))
            .count()
            .get_result(&mut conn)?;
        let total_amount: Option<i64> = payments::table
            .filter(payments::confirmed.eq(true))
            .select(sum(payments::amount))
            .get_result(&mut conn)?;

        Ok(PaymentStats {
            total,
            confirmed,
            pending,
            total_amount: total_amount.unwrap_or(0),
        })
    }
}
