//! End-to-end availability scenarios through the built-in agent wiring

use chrono::NaiveDate;
use cs_agents::{builtin_agents, AgentRegistry, AgentServices};
use cs_core::{AgentKind, AvailabilitySnapshot, Cell, Court, RequestContext};
use cs_llm::{ChatManager, ScriptedProvider};
use cs_tools::{DryRunBookingGateway, StaticAvailabilitySource, StaticBoxLeague};
use std::sync::Arc;

fn ctx() -> RequestContext {
    RequestContext::new(NaiveDate::from_ymd_opt(2026, 10, 20).unwrap())
}

async fn agents(snapshot: AvailabilitySnapshot, chat: Option<Arc<ChatManager>>, deterministic: bool) -> AgentRegistry {
    let services = AgentServices {
        availability: Arc::new(StaticAvailabilitySource::single(snapshot)),
        booking: Arc::new(DryRunBookingGateway),
        boxes: Arc::new(StaticBoxLeague::default()),
        chat,
        deterministic,
    };
    builtin_agents(&services).await
}

async fn ask(registry: &AgentRegistry, prompt: &str) -> String {
    registry
        .get(AgentKind::CourtAvailability)
        .await
        .unwrap()
        .handle(prompt, &ctx())
        .await
}

fn tonight() -> AvailabilitySnapshot {
    AvailabilitySnapshot::new(
        "20 Oct 26",
        vec![Court::new(
            "Court 1",
            vec![
                Cell::booked("17:45 - 18:30", "Alice vs Bob"),
                Cell::available("18:30 - 19:15"),
            ],
        )],
    )
}

fn evening_bookings() -> AvailabilitySnapshot {
    AvailabilitySnapshot::new(
        "20 Oct 26",
        vec![
            Court::new(
                "Court 1",
                vec![
                    Cell::booked("17:30 - 18:15", "Carol White"),
                    Cell::booked("18:15 - 19:00", "Dan Brown vs Eve Black"),
                ],
            ),
            Court::new(
                "Court 2",
                vec![
                    Cell::booked("17:30 - 18:15", "Gus Grey"),
                    Cell::available("18:15 - 19:00"),
                ],
            ),
        ],
    )
}

#[tokio::test]
async fn who_is_playing_tonight() {
    let registry = agents(tonight(), None, true).await;
    let text = ask(&registry, "Who is playing tonight?").await;

    assert!(text.contains("Alice"));
    assert!(text.contains("Bob"));
    assert!(!text.contains("Available"));
}

#[tokio::test]
async fn bookings_at_a_specific_time() {
    let registry = agents(evening_bookings(), None, true).await;
    let text = ask(&registry, "I'm looking for bookings at 18:45").await;

    assert!(text.contains("Court 1"));
    assert!(text.contains("18:15 - 19:00"));
    assert!(!text.contains("Court 2"));
}

#[tokio::test]
async fn deterministic_registry_ignores_model() {
    let provider = Arc::new(ScriptedProvider::new().reply_text("Everyone is playing!"));
    let chat = Arc::new(ChatManager::new(provider.clone(), "m"));
    let registry = agents(tonight(), Some(chat), true).await;

    let text = ask(&registry, "Who is playing tonight?").await;
    assert_eq!(text, "- **Court 1:**\n  - **17:45 - 18:30**: Alice vs Bob");
    assert!(provider.requests().is_empty());
}

#[tokio::test]
async fn model_rewording_without_courts_falls_back() {
    let provider = Arc::new(ScriptedProvider::new().reply_text("Alice and Bob, from quarter to six."));
    let chat = Arc::new(ChatManager::new(provider, "m"));
    let registry = agents(tonight(), Some(chat), false).await;

    let text = ask(&registry, "Who is playing tonight?").await;
    assert_eq!(text, "- **Court 1:**\n  - **17:45 - 18:30**: Alice vs Bob");
}
