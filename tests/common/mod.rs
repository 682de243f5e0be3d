#![allow(dead_code)]

use chrono::NaiveDate;
use pos_terminal::application::controller::TransactionController;
use pos_terminal::config::{GatewaySettings, NotificationSettings, PollingSettings, Settings};
use pos_terminal::domain::draft::Field;
use pos_terminal::domain::payment::Cardholder;
use pos_terminal::infrastructure::clock::FixedClock;
use pos_terminal::infrastructure::in_memory::ScriptedGateway;
use std::sync::Arc;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

pub fn settings() -> Settings {
    Settings {
        gateway: GatewaySettings {
            base_url: "http://localhost:8080".to_string(),
            request_timeout_ms: 1000,
        },
        polling: PollingSettings::default(),
        notification: NotificationSettings::default(),
        cardholder: Cardholder {
            name: "JUAN PEREZ".to_string(),
            address: "Av. Principal 123".to_string(),
        },
    }
}

pub fn controller(gateway: &ScriptedGateway) -> TransactionController {
    controller_with(gateway, settings())
}

pub fn controller_with(gateway: &ScriptedGateway, settings: Settings) -> TransactionController {
    TransactionController::new(
        Arc::new(gateway.clone()),
        Arc::new(FixedClock(today())),
        &settings,
    )
}

/// Types a complete, valid single-payment draft.
pub async fn fill_valid(controller: &TransactionController) {
    controller.input(Field::CardNumber, "4111111111111111").await;
    controller.input(Field::Expiry, "1299").await;
    controller.input(Field::Cvv, "123").await;
    controller.input(Field::Amount, "100.50").await;
}
