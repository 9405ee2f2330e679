use super::*;
use std::sync::Arc;

use crate::state::test_helpers::{self, MockLlm};

#[tokio::test]
async fn blank_prompt_rejected_before_model() {
    let llm = Arc::new(MockLlm::replying("halo"));
    let state = test_helpers::test_app_state_with_llm(llm.clone());

    let err = handle_prompt(&state, Uuid::new_v4(), "   \n").await.unwrap_err();
    assert!(matches!(err, ConsultError::EmptyPrompt));
    assert_eq!(err.to_string(), "Prompt is required");
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn missing_model_rejected() {
    let state = test_helpers::test_app_state();
    let err = handle_prompt(&state, Uuid::new_v4(), "ada kopi?").await.unwrap_err();
    assert!(matches!(err, ConsultError::LlmNotConfigured));
}

#[tokio::test]
async fn storage_failure_aborts_before_model() {
    let llm = Arc::new(MockLlm::replying("halo"));
    let state = test_helpers::test_app_state_with_llm(llm.clone());

    let err = handle_prompt(&state, Uuid::new_v4(), "ada kopi?").await.unwrap_err();
    assert!(matches!(err, ConsultError::Persistence(_)));
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn failed_assistant_save_keeps_reply() {
    let catalog = test_helpers::sample_catalog();
    let parsed = directive::parse_reply("Baik! [CART_ACTION]\nADD|64f1|Iced Coffee|2\n[/CART_ACTION]", &catalog);

    let reply = record_reply(Uuid::new_v4(), Uuid::new_v4(), parsed.clone(), async {
        Err::<(), _>(sqlx::Error::PoolTimedOut)
    })
    .await;

    assert_eq!(reply, parsed);
    assert_eq!(reply.display_text, "Baik!");
    assert_eq!(reply.actions.len(), 1);
    assert_eq!(reply.actions[0].item_id, "64f1");
    assert_eq!(reply.actions[0].quantity, 2);
}

#[tokio::test]
async fn successful_assistant_save_keeps_reply() {
    let parsed = directive::parse_reply("Halo!", &test_helpers::sample_catalog());
    let reply = record_reply(Uuid::new_v4(), Uuid::new_v4(), parsed.clone(), async { Ok::<_, sqlx::Error>(()) }).await;
    assert_eq!(reply, parsed);
}

#[test]
fn upstream_errors_convert() {
    let err: ConsultError = LlmError::Timeout { secs: 30 }.into();
    assert!(matches!(err, ConsultError::Upstream(LlmError::Timeout { secs: 30 })));
}

// =========================================================================
// Live database
// =========================================================================

#[cfg(feature = "live-db-tests")]
async fn live_state(llm: Arc<MockLlm>) -> (AppState, Uuid) {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required for live-db-tests");
    let mut state = test_helpers::test_app_state_with_llm(llm);
    state.pool = crate::db::init_pool(&url).await.unwrap();
    let name = format!("consult_{}", Uuid::new_v4().simple());
    let user = crate::services::auth::create_user(&state.pool, &name, &format!("{name}@example.test"), "hash")
        .await
        .unwrap();
    (state, user.id)
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
async fn full_turn_persists_and_parses() {
    let menu = {
        let url = std::env::var("DATABASE_URL").unwrap();
        let pool = crate::db::init_pool(&url).await.unwrap();
        catalog::list_items(&pool).await.unwrap()
    };
    let coffee = menu.iter().find(|i| i.name == "Iced Coffee").unwrap();
    let reply = format!("Baik! [CART_ACTION]\nADD|{}|Iced Coffee|2\n[/CART_ACTION]", coffee.id);
    let llm = Arc::new(MockLlm::new(vec![Ok(test_helpers::generation(&reply)), Ok(test_helpers::generation("Sama-sama."))]));
    let (state, user_id) = live_state(llm.clone()).await;

    let first = handle_prompt(&state, user_id, "tambah 2 kopi").await.unwrap();
    assert_eq!(first.display_text, "Baik!");
    assert_eq!(first.actions.len(), 1);
    assert_eq!(first.actions[0].quantity, 2);

    handle_prompt(&state, user_id, "terima kasih").await.unwrap();
    let prompts = llm.prompts.lock().unwrap().clone();
    assert!(!prompts[0].contains("continuation"));
    assert!(prompts[1].contains("Human: tambah 2 kopi\n\nAssistant: Baik!"));

    let session = conversation::current_session(&state.pool, user_id).await.unwrap().unwrap();
    let stored = conversation::recent_messages(&state.pool, session.id, 50).await.unwrap();
    let roles: Vec<Role> = stored.iter().map(|m| m.role).collect();
    assert_eq!(roles, [Role::User, Role::Ai, Role::User, Role::Ai]);
}
