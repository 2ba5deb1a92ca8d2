//! Dependency Resolver Integration Tests
//!
//! Ordering soundness, cycle reporting, and determinism over item sets.

use std::collections::{HashMap, HashSet};

use taskweave::services::todo::WorkItem;
use taskweave::{DependencyResolver, Resolution};

fn item(id: u32, deps: Vec<u32>) -> WorkItem {
    WorkItem::new(id, format!("item {id}")).with_dependencies(deps)
}

fn assert_topological(resolution: &Resolution, items: &[WorkItem]) {
    assert!(resolution.success);
    assert_eq!(resolution.order.len(), items.len());

    let unique: HashSet<u32> = resolution.order.iter().copied().collect();
    assert_eq!(unique.len(), items.len(), "every id appears exactly once");

    let position: HashMap<u32, usize> = resolution
        .order
        .iter()
        .enumerate()
        .map(|(index, &id)| (id, index))
        .collect();
    for it in items {
        for dep in &it.dependencies {
            assert!(
                position[dep] < position[&it.id],
                "{dep} must precede {}",
                it.id
            );
        }
    }
}

#[test]
fn test_chain_resolves_in_declared_order() {
    let items = vec![item(1, vec![]), item(2, vec![1]), item(3, vec![1, 2])];
    let resolution = DependencyResolver::resolve(&items);
    assert_eq!(resolution.order, vec![1, 2, 3]);
    assert_topological(&resolution, &items);
}

#[test]
fn test_two_item_cycle_is_reported_not_ordered() {
    let items = vec![item(1, vec![2]), item(2, vec![1])];
    let resolution = DependencyResolver::resolve(&items);

    assert!(!resolution.success);
    assert!(resolution.order.is_empty());
    assert!(!resolution.cycles.is_empty());
    let edge = resolution.cycles[0];
    assert!(edge == (1, 2) || edge == (2, 1), "unexpected edge {edge:?}");
}

#[test]
fn test_acyclic_sets_always_order_fully() {
    let cases: Vec<Vec<WorkItem>> = vec![
        vec![item(1, vec![])],
        vec![item(1, vec![]), item(2, vec![]), item(3, vec![])],
        vec![
            item(1, vec![]),
            item(2, vec![1]),
            item(3, vec![1]),
            item(4, vec![2, 3]),
        ],
        vec![
            item(10, vec![30]),
            item(20, vec![]),
            item(30, vec![20]),
            item(40, vec![10, 20]),
        ],
    ];

    for items in cases {
        let resolution = DependencyResolver::resolve(&items);
        assert_topological(&resolution, &items);
    }
}

#[test]
fn test_larger_cycle_inside_mixed_graph() {
    let items = vec![
        item(1, vec![]),
        item(2, vec![1, 4]),
        item(3, vec![2]),
        item(4, vec![3]),
    ];
    let resolution = DependencyResolver::resolve(&items);
    assert!(!resolution.success);
    assert!(!resolution.cycles.is_empty());
}

#[test]
fn test_resolution_is_reproducible() {
    let items = vec![
        item(5, vec![]),
        item(1, vec![5]),
        item(9, vec![5]),
        item(3, vec![1, 9]),
    ];
    let baseline = DependencyResolver::resolve(&items).order;
    for _ in 0..20 {
        assert_eq!(DependencyResolver::resolve(&items).order, baseline);
    }
}

#[test]
fn test_batches_respect_dependencies() {
    let items = vec![
        item(1, vec![]),
        item(2, vec![]),
        item(3, vec![1]),
        item(4, vec![1, 2]),
        item(5, vec![3, 4]),
    ];
    let batches = DependencyResolver::parallel_batches(&items);

    assert_eq!(batches[0], vec![1, 2]);
    assert_eq!(batches[1], vec![3, 4]);
    assert_eq!(batches[2], vec![5]);
}

#[test]
fn test_readiness_check_matches_resolution() {
    let items = vec![item(1, vec![]), item(2, vec![1])];
    let mut completed = HashSet::new();

    assert!(DependencyResolver::can_execute(&items[0], &completed));
    assert!(!DependencyResolver::can_execute(&items[1], &completed));

    completed.insert(1);
    assert!(DependencyResolver::can_execute(&items[1], &completed));
}
