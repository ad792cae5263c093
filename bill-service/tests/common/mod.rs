//! Test helper module for bill-service integration tests.

#![allow(dead_code)]

use bill_service::config::BillConfig;
use bill_service::startup::Application;
use reqwest::Client;
use std::time::Duration;

/// Test application wrapper for integration tests.
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: Client,
}

impl TestApp {
    /// Spawn a new test application on a random port, wired to the mock
    /// provider in answering mode.
    pub async fn spawn() -> Self {
        Self::spawn_with_mock(true).await
    }

    /// Spawn with explicit control over whether the mock provider answers
    /// or fails with NotConfigured.
    pub async fn spawn_with_mock(mock_enabled: bool) -> Self {
        // Set test environment variables
        std::env::set_var("ENVIRONMENT", "test");
        std::env::set_var("APP__PORT", "0"); // Random port
        std::env::set_var("GOOGLE_API_KEY", "test-api-key");
        std::env::set_var("ADVISOR_PROVIDER", "mock");
        std::env::set_var("ADVISOR_TEXT_MODEL", "gemini-2.0-flash");
        std::env::set_var(
            "ADVISOR_MOCK_ENABLED",
            if mock_enabled { "true" } else { "false" },
        );
        std::env::set_var("SEED_DEMO_BILLS", "false");

        let config = BillConfig::load().expect("Failed to load config");
        let app = Application::build(config)
            .await
            .expect("Failed to build application");

        let port = app.port();

        // Spawn the server in the background
        tokio::spawn(async move {
            let _ = app.run_until_stopped().await;
        });

        let client = Client::new();
        let address = format!("http://127.0.0.1:{}", port);

        // Wait for the HTTP server to answer health checks
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if let Ok(response) = client.get(&health_url).send().await {
                if response.status().is_success() {
                    break;
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        Self {
            address,
            port,
            client,
        }
    }

    pub async fn create_bill(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/bills", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to send request")
    }

    pub async fn list_bills(&self) -> Vec<serde_json::Value> {
        self.client
            .get(format!("{}/api/bills", self.address))
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse JSON")
    }

    pub async fn get_tips(&self, spending_limit: f64) -> reqwest::Response {
        self.client
            .post(format!("{}/api/tips", self.address))
            .json(&serde_json::json!({ "spending_limit": spending_limit }))
            .send()
            .await
            .expect("Failed to send request")
    }
}

/// A well-formed bill creation body.
pub fn sample_bill(description: &str, amount: f64, category: &str, is_paid: bool) -> serde_json::Value {
    serde_json::json!({
        "description": description,
        "amount": amount,
        "due_date": "2024-07-25",
        "category": category,
        "is_paid": is_paid,
        "reminders": true
    })
}
