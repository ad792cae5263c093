//! In-memory bill store.
//!
//! Bills live only in process memory; the Vec's insertion order is the
//! canonical ordering for listings and expense serialization.

use crate::models::{Bill, BillCategory, BillSummary, CreateBill, UpdateBill};
use anyhow::anyhow;
use chrono::NaiveDate;
use service_core::error::AppError;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct BillStore {
    bills: Arc<RwLock<Vec<Bill>>>,
}

impl BillStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All bills in insertion order.
    pub async fn list(&self) -> Vec<Bill> {
        self.bills.read().await.clone()
    }

    pub async fn get(&self, bill_id: Uuid) -> Result<Bill, AppError> {
        self.bills
            .read()
            .await
            .iter()
            .find(|b| b.bill_id == bill_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(anyhow!("Bill {} not found", bill_id)))
    }

    pub async fn create(&self, input: CreateBill) -> Bill {
        let bill = Bill {
            bill_id: Uuid::new_v4(),
            description: input.description,
            amount: input.amount,
            due_date: input.due_date,
            category: input.category,
            is_paid: input.is_paid,
            reminders: input.reminders,
        };
        self.bills.write().await.push(bill.clone());
        bill
    }

    pub async fn update(&self, bill_id: Uuid, input: UpdateBill) -> Result<Bill, AppError> {
        let mut bills = self.bills.write().await;
        let bill = bills
            .iter_mut()
            .find(|b| b.bill_id == bill_id)
            .ok_or_else(|| AppError::NotFound(anyhow!("Bill {} not found", bill_id)))?;

        if let Some(description) = input.description {
            bill.description = description;
        }
        if let Some(amount) = input.amount {
            bill.amount = amount;
        }
        if let Some(due_date) = input.due_date {
            bill.due_date = due_date;
        }
        if let Some(category) = input.category {
            bill.category = category;
        }
        if let Some(is_paid) = input.is_paid {
            bill.is_paid = is_paid;
        }
        if let Some(reminders) = input.reminders {
            bill.reminders = reminders;
        }

        Ok(bill.clone())
    }

    pub async fn delete(&self, bill_id: Uuid) -> Result<(), AppError> {
        let mut bills = self.bills.write().await;
        let before = bills.len();
        bills.retain(|b| b.bill_id != bill_id);
        if bills.len() == before {
            return Err(AppError::NotFound(anyhow!("Bill {} not found", bill_id)));
        }
        Ok(())
    }

    pub async fn toggle_paid(&self, bill_id: Uuid) -> Result<Bill, AppError> {
        let mut bills = self.bills.write().await;
        let bill = bills
            .iter_mut()
            .find(|b| b.bill_id == bill_id)
            .ok_or_else(|| AppError::NotFound(anyhow!("Bill {} not found", bill_id)))?;
        bill.is_paid = !bill.is_paid;
        Ok(bill.clone())
    }

    pub async fn set_reminders(&self, bill_id: Uuid, reminders: bool) -> Result<Bill, AppError> {
        let mut bills = self.bills.write().await;
        let bill = bills
            .iter_mut()
            .find(|b| b.bill_id == bill_id)
            .ok_or_else(|| AppError::NotFound(anyhow!("Bill {} not found", bill_id)))?;
        bill.reminders = reminders;
        Ok(bill.clone())
    }

    /// Unpaid totals and due-date buckets relative to `today`.
    pub async fn summary(&self, today: NaiveDate) -> BillSummary {
        let bills = self.bills.read().await;

        let total_outstanding = bills
            .iter()
            .filter(|b| !b.is_paid)
            .map(|b| b.amount)
            .sum();
        let upcoming_count = bills
            .iter()
            .filter(|b| !b.is_paid && b.due_date > today)
            .count();
        let overdue_count = bills
            .iter()
            .filter(|b| !b.is_paid && b.due_date < today)
            .count();

        BillSummary {
            total_outstanding,
            upcoming_count,
            overdue_count,
        }
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        let _ = self.bills.read().await;
        Ok(())
    }

    /// Preload the starter bills shown on a fresh dashboard.
    pub async fn seed_demo(&self) {
        let demo = [
            ("Netflix Subscription", 15.49, demo_date(2024, 7, 20), BillCategory::Entertainment, true, true),
            ("Electricity Bill", 75.20, demo_date(2024, 7, 25), BillCategory::Utilities, false, true),
            ("Car Payment", 350.00, demo_date(2024, 8, 1), BillCategory::Transportation, false, true),
            ("Groceries", 120.55, demo_date(2024, 7, 15), BillCategory::Groceries, true, false),
            ("Internet Bill", 60.00, demo_date(2024, 7, 28), BillCategory::Housing, false, true),
        ];

        let mut bills = self.bills.write().await;
        for (description, amount, due_date, category, is_paid, reminders) in demo {
            bills.push(Bill {
                bill_id: Uuid::new_v4(),
                description: description.to_string(),
                amount,
                due_date,
                category,
                is_paid,
                reminders,
            });
        }
    }
}

fn demo_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid demo date")
}
