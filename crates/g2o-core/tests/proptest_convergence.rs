use g2o_core::model::{Item, Task};
use g2o_core::reconcile::{
    IgnoreTags, Keyed, KeyedMap, Operation, OperationKind, delta, equivalent, keyed,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

use generators::*;

fn ignore() -> IgnoreTags {
    LOCAL_TAGS.iter().collect()
}

/// Executor stand-in: Remove drops the task, Add creates one from the item.
fn apply(mut current: KeyedMap<Task>, ops: Vec<Operation<Item, Task>>) -> KeyedMap<Task> {
    for op in ops {
        match op {
            Operation::Remove(task) => {
                current.remove(task.key());
            }
            Operation::Add(item) => {
                let task = Task {
                    id: format!("new-{}", item.key),
                    name: item.task_name(),
                    completed: false,
                    tags: item.tags(),
                };
                current.insert(item.key.clone(), task);
            }
        }
    }
    current
}

fn summary(ops: &[Operation<Item, Task>]) -> Vec<(OperationKind, String)> {
    ops.iter()
        .map(|op| (op.kind(), op.key().to_string()))
        .collect()
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(2000))]

    #[test]
    fn applying_delta_converges(items in arb_items(), tasks in arb_tasks()) {
        let ignore = ignore();
        let desired = keyed(items);
        let current = keyed(tasks);

        let ops = delta(desired.clone(), current.clone(), &ignore);
        let next = apply(current, ops);

        prop_assert_eq!(
            next.keys().collect::<Vec<_>>(),
            desired.keys().collect::<Vec<_>>()
        );
        prop_assert!(delta(desired, next, &ignore).is_empty());
    }

    #[test]
    fn every_missing_key_is_added(items in arb_items(), tasks in arb_tasks()) {
        let desired = keyed(items);
        let current = keyed(tasks);
        let ops = delta(desired.clone(), current.clone(), &ignore());

        let added: BTreeSet<&str> = ops.iter().filter(|op| op.is_add()).map(|op| op.key()).collect();
        for key in desired.keys().filter(|key| !current.contains_key(*key)) {
            prop_assert!(added.contains(key.as_str()), "missing add for {}", key);
        }
    }

    #[test]
    fn every_stale_key_is_removed(items in arb_items(), tasks in arb_tasks()) {
        let desired = keyed(items);
        let current = keyed(tasks);
        let ops = delta(desired.clone(), current.clone(), &ignore());

        for key in current.keys().filter(|key| !desired.contains_key(*key)) {
            let for_key: Vec<_> = ops.iter().filter(|op| op.key() == key).collect();
            prop_assert_eq!(for_key.len(), 1);
            prop_assert!(for_key[0].is_remove());
        }
    }

    #[test]
    fn matching_state_yields_nothing(items in arb_items(), extra in arb_local_tags()) {
        let ignore = ignore();
        let tasks: Vec<Task> = items
            .iter()
            .map(|item| {
                let mut tags = item.tags();
                tags.extend(extra.iter().cloned());
                Task {
                    id: item.key.clone(),
                    name: item.task_name(),
                    completed: false,
                    tags,
                }
            })
            .collect();

        prop_assert!(delta(keyed(items), keyed(tasks), &ignore).is_empty());
    }

    #[test]
    fn only_changed_keys_get_operations(items in arb_items(), tasks in arb_tasks()) {
        let ignore = ignore();
        let desired = keyed(items);
        let current = keyed(tasks);
        let ops = delta(desired.clone(), current.clone(), &ignore);

        for op in &ops {
            if let (Some(d), Some(c)) = (desired.get(op.key()), current.get(op.key())) {
                prop_assert!(!equivalent(d, c, &ignore));
            }
        }
    }

    #[test]
    fn refresh_is_remove_then_add(items in arb_items(), tasks in arb_tasks()) {
        let ignore = ignore();
        let desired = keyed(items);
        let current = keyed(tasks);
        let ops = delta(desired.clone(), current.clone(), &ignore);

        for key in desired.keys().filter(|key| current.contains_key(*key)) {
            let kinds: Vec<_> = ops.iter().filter(|op| op.key() == key).map(Operation::kind).collect();
            if kinds.is_empty() {
                continue;
            }
            prop_assert_eq!(kinds, vec![OperationKind::Remove, OperationKind::Add]);
        }
    }

    #[test]
    fn ignored_tags_never_cause_operations(items in arb_items(), tasks in arb_tasks(), extra in arb_local_tags()) {
        let ignore = ignore();
        let padded: Vec<Task> = tasks
            .iter()
            .cloned()
            .map(|mut task| {
                task.tags.extend(extra.iter().cloned());
                task
            })
            .collect();

        let plain = delta(keyed(items.clone()), keyed(tasks), &ignore);
        let with_extra = delta(keyed(items), keyed(padded), &ignore);
        prop_assert_eq!(summary(&plain), summary(&with_extra));
    }

    #[test]
    fn tag_case_is_irrelevant(items in arb_items(), tasks in arb_tasks()) {
        let ignore = ignore();
        let shouted: Vec<Item> = items
            .iter()
            .cloned()
            .map(|mut item| {
                item.labels = item.labels.iter().map(|l| l.to_uppercase()).collect();
                item.repo = item.repo.to_uppercase();
                item
            })
            .collect();

        let plain = delta(keyed(items), keyed(tasks.clone()), &ignore);
        let upper = delta(keyed(shouted), keyed(tasks), &ignore);
        prop_assert_eq!(summary(&plain), summary(&upper));
    }

    #[test]
    fn keyed_keeps_last_duplicate(items in arb_items()) {
        let map = keyed(items.clone());
        for (key, item) in &map {
            let last = items.iter().rev().find(|i| &i.key == key);
            prop_assert_eq!(Some(item), last);
        }
        let distinct: BTreeSet<_> = items.iter().map(|i| i.key.as_str()).collect();
        prop_assert_eq!(map.len(), distinct.len());
    }
}
