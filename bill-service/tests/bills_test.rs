//! Bill CRUD integration tests.
//!
//! Run with: cargo test -p bill-service --test bills_test

mod common;

use common::{sample_bill, TestApp};

#[tokio::test]
async fn create_bill_returns_created_record() {
    let app = TestApp::spawn().await;

    let response = app
        .create_bill(&sample_bill("Electricity Bill", 75.20, "utilities", false))
        .await;

    assert_eq!(response.status(), 201);

    let bill: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(bill["description"], "Electricity Bill");
    assert_eq!(bill["amount"], 75.20);
    assert_eq!(bill["category"], "utilities");
    assert_eq!(bill["is_paid"], false);
    assert!(bill["bill_id"].as_str().is_some());
}

#[tokio::test]
async fn list_preserves_insertion_order() {
    let app = TestApp::spawn().await;

    for (description, amount) in [("Rent", 900.0), ("Bus Pass", 40.0), ("Gym", 25.0)] {
        let response = app
            .create_bill(&sample_bill(description, amount, "other", false))
            .await;
        assert_eq!(response.status(), 201);
    }

    let bills = app.list_bills().await;

    assert_eq!(bills.len(), 3);
    assert_eq!(bills[0]["description"], "Rent");
    assert_eq!(bills[1]["description"], "Bus Pass");
    assert_eq!(bills[2]["description"], "Gym");
}

#[tokio::test]
async fn create_rejects_nonpositive_amount() {
    let app = TestApp::spawn().await;

    let response = app.create_bill(&sample_bill("Free Lunch", 0.0, "groceries", false)).await;
    assert_eq!(response.status(), 422);

    let response = app.create_bill(&sample_bill("Refund", -5.0, "other", false)).await;
    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn create_rejects_empty_description() {
    let app = TestApp::spawn().await;

    let response = app.create_bill(&sample_bill("", 10.0, "other", false)).await;
    assert_eq!(response.status(), 422);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Validation error");
}

#[tokio::test]
async fn get_unknown_bill_returns_404() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!(
            "{}/api/bills/00000000-0000-0000-0000-000000000000",
            app.address
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn update_bill_changes_only_supplied_fields() {
    let app = TestApp::spawn().await;

    let response = app
        .create_bill(&sample_bill("Netflix Subscription", 15.49, "entertainment", false))
        .await;
    let bill: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let bill_id = bill["bill_id"].as_str().expect("bill_id should be a string");

    let response = app
        .client
        .put(format!("{}/api/bills/{}", app.address, bill_id))
        .json(&serde_json::json!({ "amount": 17.99 }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let updated: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(updated["amount"], 17.99);
    assert_eq!(updated["description"], "Netflix Subscription");
    assert_eq!(updated["category"], "entertainment");
}

#[tokio::test]
async fn delete_bill_removes_it() {
    let app = TestApp::spawn().await;

    let response = app
        .create_bill(&sample_bill("Car Payment", 350.0, "transportation", false))
        .await;
    let bill: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let bill_id = bill["bill_id"].as_str().expect("bill_id should be a string");

    let response = app
        .client
        .delete(format!("{}/api/bills/{}", app.address, bill_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 204);

    assert!(app.list_bills().await.is_empty());

    let response = app
        .client
        .delete(format!("{}/api/bills/{}", app.address, bill_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn toggle_paid_flips_the_flag() {
    let app = TestApp::spawn().await;

    let response = app
        .create_bill(&sample_bill("Internet Bill", 60.0, "housing", false))
        .await;
    let bill: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let bill_id = bill["bill_id"].as_str().expect("bill_id should be a string");

    let toggle_url = format!("{}/api/bills/{}/paid", app.address, bill_id);

    let response = app
        .client
        .post(&toggle_url)
        .send()
        .await
        .expect("Failed to send request");
    let toggled: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(toggled["is_paid"], true);

    let response = app
        .client
        .post(&toggle_url)
        .send()
        .await
        .expect("Failed to send request");
    let toggled: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(toggled["is_paid"], false);
}

#[tokio::test]
async fn set_reminders_updates_the_flag() {
    let app = TestApp::spawn().await;

    let response = app
        .create_bill(&sample_bill("Gym", 25.0, "health", false))
        .await;
    let bill: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let bill_id = bill["bill_id"].as_str().expect("bill_id should be a string");

    let response = app
        .client
        .post(format!("{}/api/bills/{}/reminders", app.address, bill_id))
        .json(&serde_json::json!({ "reminders": false }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let updated: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(updated["reminders"], false);
}

#[tokio::test]
async fn summary_counts_unpaid_buckets() {
    let app = TestApp::spawn().await;
    let today = chrono::Utc::now().date_naive();

    let overdue = serde_json::json!({
        "description": "Old Electricity Bill",
        "amount": 75.20,
        "due_date": "2000-01-01",
        "category": "utilities",
        "is_paid": false
    });
    let upcoming = serde_json::json!({
        "description": "Car Payment",
        "amount": 350.00,
        "due_date": "2099-01-01",
        "category": "transportation",
        "is_paid": false
    });
    let due_today = serde_json::json!({
        "description": "Streaming",
        "amount": 15.49,
        "due_date": today.to_string(),
        "category": "entertainment",
        "is_paid": false
    });
    let paid = serde_json::json!({
        "description": "Groceries",
        "amount": 120.55,
        "due_date": "2099-06-01",
        "category": "groceries",
        "is_paid": true
    });

    for bill in [&overdue, &upcoming, &due_today, &paid] {
        let response = app.create_bill(bill).await;
        assert_eq!(response.status(), 201);
    }

    let summary: serde_json::Value = app
        .client
        .get(format!("{}/api/bills/summary", app.address))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");

    // Paid bills never contribute; the bill due today sits in neither bucket.
    assert_eq!(summary["total_outstanding"], 75.20 + 350.00 + 15.49);
    assert_eq!(summary["upcoming_count"], 1);
    assert_eq!(summary["overdue_count"], 1);
}
