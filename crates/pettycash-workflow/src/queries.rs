use std::collections::BTreeMap;

use chrono::NaiveDate;
use pettycash_core::{Breakdown, CashRequest, EventEnvelope, Float, FloatStatus, Result};
use pettycash_finance::FloatBalances;
use serde::Serialize;
use uuid::Uuid;

use crate::FloatDesk;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentSummary {
    pub name: String,
    pub float_managers: Vec<String>,
    pub active_float_count: usize,
}

/// A float with its derived figures, as shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct FloatOverview {
    pub float: Float,
    pub balances: FloatBalances,
    pub stock: Option<Breakdown>,
}

/// Everything a printed float statement needs for one date window.
#[derive(Debug, Clone, Serialize)]
pub struct FloatStatement {
    pub float: Float,
    pub balances: FloatBalances,
    pub stock: Option<Breakdown>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub requests: Vec<CashRequest>,
    /// Audit entries of the float and its records inside the window.
    pub activity: Vec<EventEnvelope>,
}

fn in_window(date: NaiveDate, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    from.is_none_or(|from| date >= from) && to.is_none_or(|to| date <= to)
}

impl FloatDesk {
    /// Registered departments plus any named only on a float.
    pub async fn departments(&self) -> Vec<DepartmentSummary> {
        let books = self.books.read().await;
        let mut summaries: BTreeMap<String, DepartmentSummary> = books
            .departments
            .values()
            .map(|department| {
                (
                    department.name.clone(),
                    DepartmentSummary {
                        name: department.name.clone(),
                        float_managers: department.float_managers.clone(),
                        active_float_count: 0,
                    },
                )
            })
            .collect();

        for float in books.floats.values() {
            let summary = summaries
                .entry(float.department.clone())
                .or_insert_with(|| DepartmentSummary {
                    name: float.department.clone(),
                    float_managers: Vec::new(),
                    active_float_count: 0,
                });
            if float.status == FloatStatus::Approved {
                summary.active_float_count += 1;
            }
        }
        summaries.into_values().collect()
    }

    /// Approved floats managed by `user`.
    pub async fn managed_float_count(&self, user: &str) -> usize {
        self.books
            .read()
            .await
            .floats
            .values()
            .filter(|float| float.float_manager == user && float.status == FloatStatus::Approved)
            .count()
    }

    pub async fn float_overviews(&self) -> Vec<FloatOverview> {
        let books = self.books.read().await;
        let mut overviews: Vec<FloatOverview> = books
            .floats
            .values()
            .map(|float| FloatOverview {
                float: float.clone(),
                balances: books.balances(float),
                stock: books.tallies.get(&float.id).map(|tally| tally.counts),
            })
            .collect();
        overviews.sort_by(|a, b| a.float.name.cmp(&b.float.name));
        overviews
    }

    pub async fn statement(
        &self,
        float_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<FloatStatement> {
        let books = self.books.read().await;
        let float = books.float(float_id)?;

        let mut requests: Vec<CashRequest> = books
            .requests
            .values()
            .filter(|request| {
                request.float_id == float_id
                    && in_window(request.request_date.date_naive(), from, to)
            })
            .cloned()
            .collect();
        requests.sort_by_key(|request| request.request_date);

        let mut record_ids = vec![float_id];
        record_ids.extend(requests.iter().map(|request| request.id));
        record_ids.extend(
            books
                .reimbursements
                .values()
                .filter(|reimbursement| reimbursement.float_id == float_id)
                .map(|reimbursement| reimbursement.id),
        );
        record_ids.extend(
            books
                .customizations
                .values()
                .filter(|customization| customization.float_id == float_id)
                .map(|customization| customization.id),
        );

        let float = float.clone();
        let balances = books.balances(&float);
        let stock = books.tallies.get(&float_id).map(|tally| tally.counts);
        drop(books);

        let activity = self
            .events
            .streams(&record_ids)
            .await?
            .into_iter()
            .filter(|envelope| in_window(envelope.event.occurred_at.date_naive(), from, to))
            .collect();

        Ok(FloatStatement {
            float,
            balances,
            stock,
            from,
            to,
            requests,
            activity,
        })
    }

    /// Statement over a reimbursement's reporting window.
    pub async fn reimbursement_statement(&self, reimbursement_id: Uuid) -> Result<FloatStatement> {
        let reimbursement = self.reimbursement(reimbursement_id).await?;
        self.statement(
            reimbursement.float_id,
            reimbursement.report_from,
            reimbursement.report_to,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{DEPARTMENT, admin_float, approved_float, petty_cash};
    use chrono::{Duration, Utc};
    use pettycash_core::{Department, DomainEventKind};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn department_counts_only_approved_floats() {
        let desk = FloatDesk::in_memory();
        desk.save_department(Department {
            name: "Finance".to_string(),
            float_managers: vec!["sunil".to_string()],
        })
        .await
        .unwrap();
        approved_float(&desk).await;
        desk.create_float(admin_float(dec!(1000)), "nimal").await.unwrap();

        let departments = desk.departments().await;
        assert_eq!(departments.len(), 2);
        let admin = departments
            .iter()
            .find(|department| department.name == DEPARTMENT)
            .unwrap();
        assert_eq!(admin.active_float_count, 1);
        assert_eq!(departments[1].active_float_count, 0);

        assert_eq!(desk.managed_float_count("nimal").await, 1);
        assert_eq!(desk.managed_float_count("sunil").await, 0);
    }

    #[tokio::test]
    async fn statement_filters_requests_by_window() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let today = Utc::now();

        let mut old = petty_cash(&float, dec!(100));
        old.request_date = Some(today - Duration::days(40));
        desk.create_request(old, "kasun").await.unwrap();
        desk.create_request(petty_cash(&float, dec!(200)), "kasun")
            .await
            .unwrap();

        let from = (today - Duration::days(7)).date_naive();
        let statement = desk.statement(float.id, Some(from), None).await.unwrap();
        assert_eq!(statement.requests.len(), 1);
        assert_eq!(statement.requests[0].amount, dec!(200));
        assert!(statement.stock.is_some());

        let everything = desk.statement(float.id, None, None).await.unwrap();
        assert_eq!(everything.requests.len(), 2);
    }

    #[tokio::test]
    async fn statement_gathers_activity_of_the_float_and_its_requests() {
        let desk = FloatDesk::in_memory();
        let float = approved_float(&desk).await;
        let other = approved_float(&desk).await;
        let request = desk
            .create_request(petty_cash(&float, dec!(200)), "kasun")
            .await
            .unwrap();
        desk.submit_request(request.id, "kasun").await.unwrap();

        let statement = desk.statement(float.id, None, None).await.unwrap();
        let kinds: Vec<DomainEventKind> = statement
            .activity
            .iter()
            .map(|envelope| envelope.event.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                DomainEventKind::FloatSubmitted,
                DomainEventKind::DenominationInitialized,
                DomainEventKind::FloatApproved,
                DomainEventKind::RequestCreated,
                DomainEventKind::RequestSubmitted,
            ]
        );
        assert!(
            statement
                .activity
                .iter()
                .all(|envelope| envelope.stream_id != other.id)
        );

        let tomorrow = (Utc::now() + Duration::days(1)).date_naive();
        let later = desk.statement(float.id, Some(tomorrow), None).await.unwrap();
        assert!(later.activity.is_empty());
    }
}
