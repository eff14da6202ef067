//! Driving a session through the channel oracle, as the TUI does

use rankwise_engine::{Item, ItemList, Outcome, Reply, UndoPolicy, channel, rank};

fn list(raw: &str) -> ItemList {
    ItemList::parse(raw).unwrap()
}

fn pair(first: &Item, second: &Item) -> (String, String) {
    (first.as_str().to_string(), second.as_str().to_string())
}

#[tokio::test]
async fn front_end_answers_one_question_at_a_time() {
    let (mut oracle, mut handle) = channel();
    let input = list("C\nB\nA");
    let session = tokio::spawn(async move {
        rank(&input, &mut oracle, UndoPolicy::RetryStep).await
    });

    let mut asked = Vec::new();
    while let Some(pending) = handle.next().await {
        asked.push(pair(pending.first(), pending.second()));
        // Only one question is ever outstanding.
        assert!(handle.try_next().is_none());
        assert!(pending.resolve(Outcome::Superior));
    }

    let result = session.await.unwrap().unwrap();
    assert!(result.is_sorted());
    assert_eq!(asked.len(), 2);
}

#[tokio::test]
async fn undo_then_answer_again() {
    let (mut oracle, mut handle) = channel();
    let input = list("C\nB\nA");
    let session = tokio::spawn(async move {
        rank(&input, &mut oracle, UndoPolicy::Replay).await
    });

    let first = handle.next().await.unwrap();
    let retracted = pair(first.first(), first.second());
    first.resolve(Outcome::Superior);

    let second = handle.next().await.unwrap();
    second.resolve(Reply::Undo);

    // Replay re-asks the answer that was taken back.
    let again = handle.next().await.unwrap();
    assert_eq!(pair(again.first(), again.second()), retracted);
    again.resolve(Outcome::Superior);

    while let Some(pending) = handle.next().await {
        pending.resolve(Outcome::Superior);
    }

    let result = session.await.unwrap().unwrap();
    assert!(result.is_sorted());
    assert_eq!(result.stats().undos, 1);
}

#[tokio::test]
async fn dropping_the_front_end_fails_the_session() {
    let (mut oracle, handle) = channel();
    let input = list("x\ny");
    drop(handle);

    let err = rank(&input, &mut oracle, UndoPolicy::RetryStep)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("shut down"));
}
