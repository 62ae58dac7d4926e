// tests/dispatch_tests.rs

mod common;

use std::{collections::HashMap, sync::Arc, time::Duration};

use common::{EchoVerses, MemoryProgress};
use scripture_quiz::{
    models::{
        book::{BookId, Library},
        progress::AnswerRecord,
        user::UserIdentity,
    },
    quiz::{
        dispatch::{EventDispatcher, report_answer},
        registry::SessionRegistry,
        session::{QuizSession, SessionEvent},
    },
};

fn identity(user_id: i64) -> UserIdentity {
    UserIdentity {
        user_id,
        email: Some("hannah@example.com".to_string()),
        metadata: HashMap::new(),
    }
}

async fn setup(
    progress: MemoryProgress,
) -> (EventDispatcher, Arc<MemoryProgress>, Arc<EchoVerses>, uuid::Uuid) {
    let progress = Arc::new(progress);
    let verses = Arc::new(EchoVerses::default());
    let sessions = SessionRegistry::new(Duration::from_secs(60));

    let library = Library::embedded().unwrap();
    let mut session = QuizSession::new(BookId::Ezekiel);
    session
        .start(library.bank(BookId::Ezekiel).unwrap().questions().to_vec())
        .unwrap();
    let session_id = sessions.insert(session, None).await;

    let dispatcher = EventDispatcher {
        progress: progress.clone(),
        verses: verses.clone(),
        sessions,
    };
    (dispatcher, progress, verses, session_id)
}

#[tokio::test]
async fn answer_and_verse_events_reach_their_adapters() {
    let (dispatcher, progress, verses, session_id) = setup(MemoryProgress::default()).await;
    let events = vec![
        SessionEvent::AnswerSubmitted {
            book: BookId::Ezekiel,
            question_id: 7,
            is_correct: false,
        },
        SessionEvent::VerseRequested {
            question_id: 7,
            reference: "Ezekiel 10, 43".to_string(),
        },
    ];

    let handles = dispatcher.dispatch(session_id, Some(&identity(3)), events);
    assert_eq!(handles.len(), 2);
    for handle in handles {
        handle.await.unwrap();
    }

    let records = progress.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].username, "hannah");
    assert!(!records[0].is_correct);
    assert_eq!(progress.counter(3), 1);

    assert_eq!(*verses.requested.lock().unwrap(), vec!["Ezekiel 10"]);
    let cached = dispatcher
        .sessions
        .view(session_id, |a| {
            a.session
                .questions()
                .iter()
                .find(|q| q.id == 7)
                .and_then(|q| q.verse_text.clone())
        })
        .await
        .unwrap();
    assert_eq!(cached.as_deref(), Some("Text of Ezekiel 10"));
}

#[tokio::test]
async fn anonymous_answers_are_not_reported() {
    let (dispatcher, progress, _verses, session_id) = setup(MemoryProgress::default()).await;
    let events = vec![SessionEvent::AnswerSubmitted {
        book: BookId::Ezekiel,
        question_id: 1,
        is_correct: true,
    }];

    let handles = dispatcher.dispatch(session_id, None, events);
    assert!(handles.is_empty());
    assert!(progress.records().is_empty());
}

#[tokio::test]
async fn verse_for_a_discarded_session_is_dropped() {
    let (dispatcher, _progress, verses, session_id) = setup(MemoryProgress::default()).await;
    dispatcher.sessions.remove(session_id).await;

    let handles = dispatcher.dispatch(
        session_id,
        None,
        vec![SessionEvent::VerseRequested {
            question_id: 2,
            reference: "Ezekiel 1:5-10".to_string(),
        }],
    );
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(verses.requested.lock().unwrap().len(), 1);
    assert!(dispatcher.sessions.is_empty().await);
}

#[tokio::test]
async fn failed_writes_are_swallowed() {
    let progress = MemoryProgress::failing();
    let record = AnswerRecord {
        user_id: 4,
        question_id: 2,
        username: "Lydia".to_string(),
        is_correct: true,
        book: BookId::Psalms,
    };

    // Must return normally even though both writes fail.
    report_answer(&progress, record).await;
    assert!(progress.records().is_empty());
    assert_eq!(progress.counter(4), 0);
}
