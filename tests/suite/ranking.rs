//! Sorting behaviour through the public API

use std::sync::{Arc, Mutex};

use rankwise_engine::{
    FnOracle, Item, ItemList, Outcome, Reply, SortResult, UndoPolicy, max_questions, rank, sort,
};

fn list(raw: &str) -> ItemList {
    ItemList::parse(raw).unwrap()
}

fn texts(result: &SortResult) -> Vec<&str> {
    result.items().iter().map(Item::as_str).collect()
}

/// Ranks by a fixed score table; higher score is superior.
fn by_score(scores: &'static [(&'static str, i32)]) -> impl FnMut(&Item, &Item) -> Reply + Send {
    let score = move |item: &Item| {
        scores
            .iter()
            .find(|(name, _)| *name == item.as_str())
            .map(|(_, score)| *score)
            .unwrap()
    };
    move |first: &Item, second: &Item| Reply::Answer(Outcome::from(score(first).cmp(&score(second))))
}

const SCORES: &[(&str, i32)] = &[
    ("bronze", 1),
    ("silver", 2),
    ("gold", 3),
    ("platinum", 4),
    ("diamond", 5),
    ("iron", 0),
];

#[tokio::test]
async fn ranking_follows_the_oracle() {
    let mut oracle = FnOracle::new(by_score(SCORES));
    let result = rank(
        &list("silver\niron\ndiamond\nbronze\nplatinum\ngold"),
        &mut oracle,
        UndoPolicy::RetryStep,
    )
    .await
    .unwrap();

    assert!(result.is_sorted());
    assert_eq!(
        texts(&result),
        ["diamond", "platinum", "gold", "silver", "bronze", "iron"]
    );
    assert!(result.stats().questions <= max_questions(6));
    assert_eq!(result.stats().undos, 0);
}

#[tokio::test]
async fn native_order_puts_the_best_last() {
    let mut oracle = FnOracle::new(by_score(SCORES));
    let result = sort(list("gold\nbronze\nsilver"), &mut oracle).await.unwrap();
    assert_eq!(texts(&result), ["bronze", "silver", "gold"]);
}

#[tokio::test]
async fn alphabetical_example_takes_two_questions() {
    let mut oracle = FnOracle::new(|first: &Item, second: &Item| {
        Reply::Answer(Outcome::from(second.as_str().cmp(first.as_str())))
    });
    let result = rank(&list("C\nB\nA"), &mut oracle, UndoPolicy::RetryStep)
        .await
        .unwrap();

    assert_eq!(texts(&result), ["A", "B", "C"]);
    assert_eq!(result.stats().questions, 2);
    assert_eq!(result.stats().cache_hits, 0);
}

#[tokio::test]
async fn stopping_hands_back_the_input() {
    let input = list("gold\nbronze\nsilver\niron");
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    let mut score = by_score(SCORES);
    let mut oracle = FnOracle::new(move |first: &Item, second: &Item| {
        let mut calls = counter.lock().unwrap();
        *calls += 1;
        if *calls == 3 {
            Reply::Stop
        } else {
            score(first, second)
        }
    });

    let result = rank(&input, &mut oracle, UndoPolicy::RetryStep)
        .await
        .unwrap();

    assert!(!result.is_sorted());
    assert_eq!(result.items(), input.as_slice());
    assert_eq!(*calls.lock().unwrap(), 3);
}

#[tokio::test]
async fn every_undo_policy_still_sorts() {
    for policy in [UndoPolicy::RetryStep, UndoPolicy::Replay] {
        let mut undone = false;
        let mut score = by_score(SCORES);
        let mut oracle = FnOracle::new(move |first: &Item, second: &Item| {
            if undone {
                score(first, second)
            } else {
                undone = true;
                Reply::Undo
            }
        });

        let result = rank(&list("bronze\ngold\nsilver"), &mut oracle, policy)
            .await
            .unwrap();
        assert_eq!(texts(&result), ["gold", "silver", "bronze"], "{policy:?}");
        assert_eq!(result.stats().undos, 1);
    }
}
