use std::time::Duration;

use growthdeck_common::types::{Decision, Invitation, InvitationSender};
use growthdeck_growth::invitations::{InvitationConfig, InvitationProcessor, WELCOME_MESSAGES};
use growthdeck_growth::testing::{
    accept_verdict, decline_verdict, MemoryInvitationLog, MemoryThreadStore, MockClassifier,
    MockSocialGraph,
};

fn config() -> InvitationConfig {
    InvitationConfig {
        max_per_run: 25,
        message_pause: Duration::ZERO,
        opener_retry_backoff: Duration::ZERO,
    }
}

fn invitation(id: &str, name: &str, location: &str, locale: Option<&str>) -> Invitation {
    Invitation {
        external_id: id.to_string(),
        message: None,
        sender: InvitationSender {
            name: name.to_string(),
            headline: "Founder".to_string(),
            location: location.to_string(),
            locale: locale.map(String::from),
            provider_id: format!("provider-{id}"),
            profile_url: format!("https://li.com/in/{id}"),
        },
    }
}

#[tokio::test]
async fn accepted_founder_gets_the_full_welcome_sequence() {
    let social = MockSocialGraph::new().with_invitations(vec![invitation(
        "inv-1",
        "Jane Doe",
        "Austin, Texas, United States",
        Some("US"),
    )]);
    let classifier =
        MockClassifier::new().with_verdict("Jane Doe", accept_verdict("Agency founder", "agency"));
    let log = MemoryInvitationLog::new();
    let threads = MemoryThreadStore::new();

    let results = InvitationProcessor::new(&social, &classifier, &log, &threads, config())
        .run()
        .await
        .unwrap();

    assert_eq!(results.processed, 1);
    assert_eq!(results.accepted, 1);
    assert_eq!(*social.accepts.lock().unwrap(), vec!["inv-1".to_string()]);

    // Opener + two follow-ups, personalized and in order.
    let conversations = social.conversations.lock().unwrap();
    assert_eq!(conversations.len(), 1);
    assert_eq!(conversations[0].0, "provider-inv-1");
    assert!(conversations[0].1.starts_with("Hi Jane,"));
    let messages = social.messages.lock().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].1, WELCOME_MESSAGES[2].replace("{first_name}", "Jane"));

    let records = log.all();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].decision, Decision::Accepted);
    assert_eq!(records[0].thread_id.as_deref(), Some("chat-1"));
    assert_eq!(records[0].messages_sent, 3);
    assert_eq!(records[0].icp_match.as_deref(), Some("agency"));

    let stored_threads = threads.all();
    assert_eq!(stored_threads.len(), 1);
    assert_eq!(
        stored_threads[0].last_message_preview,
        WELCOME_MESSAGES[2].replace("{first_name}", "Jane")
    );
}

#[tokio::test]
async fn disallowed_country_declines_without_spending_on_the_llm() {
    let social = MockSocialGraph::new().with_invitations(vec![invitation(
        "inv-1",
        "Hans Gruber",
        "Berlin, Germany",
        None,
    )]);
    let classifier = MockClassifier::new();
    let log = MemoryInvitationLog::new();
    let threads = MemoryThreadStore::new();

    let results = InvitationProcessor::new(&social, &classifier, &log, &threads, config())
        .run()
        .await
        .unwrap();

    assert_eq!(results.declined, 1);
    assert_eq!(classifier.call_count(), 0);
    assert_eq!(*social.declines.lock().unwrap(), vec!["inv-1".to_string()]);

    let records = log.all();
    assert_eq!(records[0].decision, Decision::Declined);
    assert!(records[0].reason.starts_with("Country not in allowlist"));
    assert!(records[0].reason.contains("Berlin, Germany"));
    assert!(threads.all().is_empty());
}

#[tokio::test]
async fn failed_decline_call_still_records_the_decision() {
    let social = MockSocialGraph::new()
        .with_invitations(vec![invitation("inv-1", "Hans Gruber", "Berlin, Germany", None)])
        .failing_decline();
    let classifier = MockClassifier::new();
    let log = MemoryInvitationLog::new();
    let threads = MemoryThreadStore::new();

    let results = InvitationProcessor::new(&social, &classifier, &log, &threads, config())
        .run()
        .await
        .unwrap();

    assert_eq!(results.declined, 1);
    let records = log.all();
    assert_eq!(records[0].decision, Decision::Declined);
    assert!(records[0].reason.contains("(decline call failed:"));
}

#[tokio::test]
async fn classifier_decline_uses_the_verdict_reason() {
    let social = MockSocialGraph::new().with_invitations(vec![invitation(
        "inv-1",
        "R Ecruiter",
        "New York, United States",
        Some("US"),
    )]);
    let classifier =
        MockClassifier::new().with_verdict("R Ecruiter", decline_verdict("Recruiter, no business"));
    let log = MemoryInvitationLog::new();
    let threads = MemoryThreadStore::new();

    let results = InvitationProcessor::new(&social, &classifier, &log, &threads, config())
        .run()
        .await
        .unwrap();

    assert_eq!(results.declined, 1);
    let records = log.all();
    assert_eq!(records[0].reason, "Recruiter, no business");
    assert_eq!(records[0].icp_match.as_deref(), Some("none"));
    assert_eq!(*social.declines.lock().unwrap(), vec!["inv-1".to_string()]);
}

#[tokio::test]
async fn processed_invitations_are_never_reprocessed() {
    let social = MockSocialGraph::new().with_invitations(vec![
        invitation("inv-1", "Jane Doe", "Austin, Texas, United States", Some("US")),
        invitation("inv-2", "Sam Lee", "Toronto, Canada", Some("CA")),
    ]);
    let classifier = MockClassifier::new()
        .with_verdict("Jane Doe", accept_verdict("Agency founder", "agency"))
        .with_verdict("Sam Lee", accept_verdict("Coach", "coaching"));
    let log = MemoryInvitationLog::new();
    let threads = MemoryThreadStore::new();

    let first = InvitationProcessor::new(&social, &classifier, &log, &threads, config())
        .run()
        .await
        .unwrap();
    assert_eq!(first.processed, 2);

    let second = InvitationProcessor::new(&social, &classifier, &log, &threads, config())
        .run()
        .await
        .unwrap();
    assert_eq!(second.processed, 0);
    assert_eq!(log.all().len(), 2);
    // No second round of accept calls either.
    assert_eq!(social.accepts.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn run_cap_limits_the_batch() {
    let social = MockSocialGraph::new().with_invitations(vec![
        invitation("inv-1", "Jane Doe", "Austin, Texas, United States", Some("US")),
        invitation("inv-2", "Sam Lee", "Toronto, Canada", Some("CA")),
    ]);
    let classifier =
        MockClassifier::new().with_verdict("Jane Doe", accept_verdict("Agency founder", "agency"));
    let log = MemoryInvitationLog::new();
    let threads = MemoryThreadStore::new();
    let cfg = InvitationConfig {
        max_per_run: 1,
        ..config()
    };

    let results = InvitationProcessor::new(&social, &classifier, &log, &threads, cfg)
        .run()
        .await
        .unwrap();

    // Oldest first: only inv-1 is touched.
    assert_eq!(results.processed, 1);
    assert_eq!(log.all()[0].external_invitation_id, "inv-1");
}

#[tokio::test]
async fn opener_is_retried_once_and_recovers() {
    let social = MockSocialGraph::new()
        .with_invitations(vec![invitation(
            "inv-1",
            "Jane Doe",
            "Austin, Texas, United States",
            Some("US"),
        )])
        .failing_opener(1);
    let classifier =
        MockClassifier::new().with_verdict("Jane Doe", accept_verdict("Agency founder", "agency"));
    let log = MemoryInvitationLog::new();
    let threads = MemoryThreadStore::new();

    let results = InvitationProcessor::new(&social, &classifier, &log, &threads, config())
        .run()
        .await
        .unwrap();

    assert_eq!(results.accepted, 1);
    let records = log.all();
    assert_eq!(records[0].messages_sent, 3);
    assert!(records[0].thread_id.is_some());
}

#[tokio::test(start_paused = true)]
async fn retried_opener_still_paces_before_the_next_message() {
    let social = MockSocialGraph::new()
        .with_invitations(vec![invitation(
            "inv-1",
            "Jane Doe",
            "Austin, Texas, United States",
            Some("US"),
        )])
        .failing_opener(1);
    let classifier =
        MockClassifier::new().with_verdict("Jane Doe", accept_verdict("Agency founder", "agency"));
    let log = MemoryInvitationLog::new();
    let threads = MemoryThreadStore::new();
    let cfg = InvitationConfig {
        max_per_run: 25,
        message_pause: Duration::from_secs(4),
        opener_retry_backoff: Duration::from_secs(5),
    };

    let start = tokio::time::Instant::now();
    let results = InvitationProcessor::new(&social, &classifier, &log, &threads, cfg)
        .run()
        .await
        .unwrap();

    assert_eq!(results.accepted, 1);
    assert_eq!(log.all()[0].messages_sent, 3);
    // Failed opener (4s pace) + 5s backoff + paced retry, message 2, and
    // message 3 at 4s each.
    assert!(start.elapsed() >= Duration::from_secs(21));
}

#[tokio::test]
async fn double_opener_failure_keeps_the_accept_but_sends_nothing() {
    let social = MockSocialGraph::new()
        .with_invitations(vec![invitation(
            "inv-1",
            "Jane Doe",
            "Austin, Texas, United States",
            Some("US"),
        )])
        .failing_opener(2);
    let classifier =
        MockClassifier::new().with_verdict("Jane Doe", accept_verdict("Agency founder", "agency"));
    let log = MemoryInvitationLog::new();
    let threads = MemoryThreadStore::new();

    let results = InvitationProcessor::new(&social, &classifier, &log, &threads, config())
        .run()
        .await
        .unwrap();

    assert_eq!(results.accepted, 1);
    let records = log.all();
    assert_eq!(records[0].decision, Decision::Accepted);
    assert_eq!(records[0].messages_sent, 0);
    assert!(records[0].thread_id.is_none());
    assert!(threads.all().is_empty());
    assert!(social.messages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn follow_up_failure_stops_the_sequence_without_retry() {
    // Opener succeeds; the first follow-up send succeeds; the second fails.
    let social = MockSocialGraph::new()
        .with_invitations(vec![invitation(
            "inv-1",
            "Jane Doe",
            "Austin, Texas, United States",
            Some("US"),
        )])
        .failing_sends_after(1);
    let classifier =
        MockClassifier::new().with_verdict("Jane Doe", accept_verdict("Agency founder", "agency"));
    let log = MemoryInvitationLog::new();
    let threads = MemoryThreadStore::new();

    let results = InvitationProcessor::new(&social, &classifier, &log, &threads, config())
        .run()
        .await
        .unwrap();

    assert_eq!(results.accepted, 1);
    let records = log.all();
    assert_eq!(records[0].messages_sent, 2);
    assert_eq!(records[0].thread_id.as_deref(), Some("chat-1"));

    // The thread preview reflects the last message actually sent.
    let stored_threads = threads.all();
    assert_eq!(
        stored_threads[0].last_message_preview,
        WELCOME_MESSAGES[1].replace("{first_name}", "Jane")
    );
}

#[tokio::test]
async fn one_bad_invitation_does_not_stop_the_batch() {
    // inv-1 has no configured verdict, so classification errors out.
    let social = MockSocialGraph::new().with_invitations(vec![
        invitation("inv-1", "Mystery Person", "Austin, Texas, United States", Some("US")),
        invitation("inv-2", "Jane Doe", "Austin, Texas, United States", Some("US")),
    ]);
    let classifier =
        MockClassifier::new().with_verdict("Jane Doe", accept_verdict("Agency founder", "agency"));
    let log = MemoryInvitationLog::new();
    let threads = MemoryThreadStore::new();

    let results = InvitationProcessor::new(&social, &classifier, &log, &threads, config())
        .run()
        .await
        .unwrap();

    assert_eq!(results.processed, 2);
    assert_eq!(results.errors, 1);
    assert_eq!(results.accepted, 1);

    let records = log.all();
    assert_eq!(records.len(), 2);
    let error_record = records
        .iter()
        .find(|r| r.external_invitation_id == "inv-1")
        .unwrap();
    assert_eq!(error_record.decision, Decision::Error);
}

#[tokio::test]
async fn failed_accept_call_becomes_an_error_record() {
    let social = MockSocialGraph::new()
        .with_invitations(vec![invitation(
            "inv-1",
            "Jane Doe",
            "Austin, Texas, United States",
            Some("US"),
        )])
        .failing_accept();
    let classifier =
        MockClassifier::new().with_verdict("Jane Doe", accept_verdict("Agency founder", "agency"));
    let log = MemoryInvitationLog::new();
    let threads = MemoryThreadStore::new();

    let results = InvitationProcessor::new(&social, &classifier, &log, &threads, config())
        .run()
        .await
        .unwrap();

    assert_eq!(results.errors, 1);
    let records = log.all();
    assert_eq!(records[0].decision, Decision::Error);
    assert!(records[0].reason.contains("Accept call failed"));
    // No welcome sequence was attempted.
    assert!(social.conversations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn invitation_fetch_failure_aborts_the_run() {
    let social = MockSocialGraph::new().failing_invitations();
    let classifier = MockClassifier::new();
    let log = MemoryInvitationLog::new();
    let threads = MemoryThreadStore::new();

    let result = InvitationProcessor::new(&social, &classifier, &log, &threads, config())
        .run()
        .await;
    assert!(result.is_err());
    assert!(log.all().is_empty());
}
