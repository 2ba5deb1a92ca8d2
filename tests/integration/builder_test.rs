//! Todo Builder Integration Tests
//!
//! Complexity bounds, mode derivation, item generation, and criteria
//! enhancement over realistic request corpora. No LLM calls: the heuristic
//! scorer is the default path.

use taskweave::services::todo::{BuildOptions, ItemDraft, TodoBuilder};
use taskweave::{ItemStatus, TodoMode};

#[tokio::test]
async fn test_complexity_stays_in_bounds_across_corpus() {
    let builder = TodoBuilder::new();
    let heavy = format!(
        "Refactor the pipeline. Optimize the cache. Debug the flaky test. {}",
        "```rust\nfn main() {}\n```".repeat(4)
    );
    let corpus = [
        "",
        "hi",
        "Create feature X",
        "watch the launch video in fullscreen",
        heavy.as_str(),
    ];

    for message in corpus {
        let todo = builder
            .build(message, &BuildOptions::default())
            .await
            .unwrap();
        assert!(
            (1..=10).contains(&todo.complexity),
            "complexity {} out of bounds for {message:?}",
            todo.complexity
        );
    }
}

#[tokio::test]
async fn test_mode_matches_complexity_threshold() {
    let builder = TodoBuilder::new();
    let simple = builder
        .build("Create feature X", &BuildOptions::default())
        .await
        .unwrap();
    assert_eq!(simple.mode, TodoMode::Standard);
    assert!(simple.complexity <= 6);

    let heavy = format!(
        "Create the schema. Modify the loader. Delete stale rows. Refactor the API. \
         Optimize queries. Debug the sync path. Test everything. {}",
        "```sql\nselect 1;\n```".repeat(3)
    );
    let complex = builder.build(&heavy, &BuildOptions::default()).await.unwrap();
    assert_eq!(
        complex.mode == TodoMode::Extended,
        complex.complexity > 6,
        "mode must track the >6 threshold (complexity {})",
        complex.complexity
    );
}

#[tokio::test]
async fn test_short_request_yields_single_pending_item() {
    let builder = TodoBuilder::new();
    let todo = builder
        .build("Create feature X", &BuildOptions::default())
        .await
        .unwrap();

    assert!(todo.complexity <= 3);
    assert_eq!(todo.mode, TodoMode::Standard);
    assert_eq!(todo.items.len(), 1);
    assert_eq!(todo.items[0].status, ItemStatus::Pending);
    assert_eq!(todo.items[0].attempt, 1);
    assert!(!todo.items[0].success_criteria.is_empty());
}

#[tokio::test]
async fn test_video_request_gets_playback_criteria() {
    let builder = TodoBuilder::new();
    let todo = builder
        .build("watch the keynote video", &BuildOptions::default())
        .await
        .unwrap();
    assert!(todo.items[0].success_criteria.contains("Playback"));
}

#[tokio::test]
async fn test_fullscreen_request_gets_fullscreen_criteria() {
    let builder = TodoBuilder::new();
    let options = BuildOptions {
        items: vec![ItemDraft::new("put the video into fullscreen")
            .with_success_criteria("Video fills the display")],
        ..BuildOptions::default()
    };
    let todo = builder
        .build("put the video into fullscreen", &options)
        .await
        .unwrap();
    assert!(todo.items[0].success_criteria.contains("Fullscreen"));
}

#[tokio::test]
async fn test_drafts_produce_sequential_ids() {
    let builder = TodoBuilder::new();
    let options = BuildOptions {
        items: vec![
            ItemDraft::new("search for the video"),
            ItemDraft::new("play the result").with_dependencies(vec![1]),
            ItemDraft::new("confirm playback").with_dependencies(vec![2]),
        ],
        ..BuildOptions::default()
    };
    let todo = builder.build("watch the video", &options).await.unwrap();

    let ids: Vec<u32> = todo.items.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(todo.items[2].dependencies, vec![2]);
}
