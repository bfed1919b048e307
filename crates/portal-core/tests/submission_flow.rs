mod common;

use std::sync::Arc;

use common::{employee, session, AuditSink, Directory, MessageLedger};
use portal_core::services::protocol::{compute_content_hash, CountingSequencer, ProtocolGenerator};
use portal_core::services::SubmissionService;
use portal_core::{DepartmentCatalogue, DomainError, MessageDraft, MessageType, SubmissionState};

fn service(directory: Arc<Directory>, ledger: Arc<MessageLedger>, audit: Arc<AuditSink>) -> SubmissionService {
    let generator = ProtocolGenerator::new(Arc::new(CountingSequencer::new(ledger.clone())));
    SubmissionService::new(
        directory,
        ledger,
        generator,
        portal_core::services::AuditTrail::new(audit),
        DepartmentCatalogue::default(),
    )
}

fn draft(body: &str) -> MessageDraft {
    MessageDraft {
        message_type: MessageType::Suggestion,
        target_department: "RH".into(),
        body: body.into(),
    }
}

#[tokio::test]
async fn concurrent_submissions_can_share_a_protocol() {
    let directory = Arc::new(Directory::with(vec![employee("ana@x.com"), employee("bia@x.com")]));
    let ledger = Arc::new(MessageLedger::with_barrier(5, 2));
    let svc = service(directory, ledger.clone(), Arc::new(AuditSink::default()));

    let ana = session("ana@x.com");
    let bia = session("bia@x.com");
    let (a, b) = tokio::join!(
        svc.submit(&ana, draft("first"), None),
        svc.submit(&bia, draft("second"), None)
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert!(a.message.protocol.ends_with("-0006"));
    assert_eq!(a.message.protocol, b.message.protocol);
    assert_ne!(a.message.content_hash, b.message.content_hash);
    assert_eq!(ledger.saved.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn sequential_submissions_advance_the_day_sequence() {
    let directory = Arc::new(Directory::with(vec![employee("ana@x.com")]));
    let ledger = Arc::new(MessageLedger::new(0));
    let svc = service(directory, ledger, Arc::new(AuditSink::default()));
    let ana = session("ana@x.com");

    let first = svc.submit(&ana, draft("one"), None).await.unwrap();
    let second = svc.submit(&ana, draft("two"), None).await.unwrap();

    assert!(first.message.protocol.ends_with("-0001"));
    assert!(second.message.protocol.ends_with("-0002"));
    assert_eq!(second.receipt.protocol, second.message.protocol);
    assert_eq!(second.message.content_hash, compute_content_hash("two"));
}

#[tokio::test]
async fn unregistered_sender_writes_nothing() {
    let directory = Arc::new(Directory::default());
    let ledger = Arc::new(MessageLedger::new(0));
    let audit = Arc::new(AuditSink::default());
    let svc = service(directory.clone(), ledger.clone(), audit.clone());

    let failure = svc
        .submit(&session("ana@x.com"), draft("hello"), None)
        .await
        .unwrap_err();

    assert!(matches!(&failure.error, DomainError::EmployeeNotRegistered(email) if email == "ana@x.com"));
    assert_eq!(failure.draft.body, "hello");
    assert!(ledger.saved.lock().unwrap().is_empty());
    assert!(audit.entries.lock().unwrap().is_empty());
    assert_eq!(*directory.writes.lock().unwrap(), 0);
}

#[tokio::test]
async fn failed_insert_leaves_submission_in_draft() {
    let directory = Arc::new(Directory::with(vec![employee("ana@x.com")]));
    let mut ledger = MessageLedger::new(0);
    ledger.fail_inserts = true;
    let svc = service(directory, Arc::new(ledger), Arc::new(AuditSink::default()));

    let failure = svc
        .submit(&session("ana@x.com"), draft("hello"), None)
        .await
        .unwrap_err();
    let state = SubmissionState::Draft(failure.draft);

    assert!(!state.is_sent());
    assert!(state.protocol().is_none());
    assert_eq!(failure.error.to_string(), "Database error: insert rejected");
}
