use std::ops::ControlFlow;

use omap::OrderedMap;
use omap::UninitializedError;
use omap::nullable;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn forward<K: Clone, V: Clone>(map: &OrderedMap<K, V>) -> Vec<(K, V)> {
    let mut out = Vec::new();
    map.iterate(|key, value| {
        out.push((key.clone(), value.clone()));
        ControlFlow::Continue(())
    });
    out
}

fn backward<K: Clone, V: Clone>(map: &OrderedMap<K, V>) -> Vec<(K, V)> {
    let mut out = Vec::new();
    map.iterate_backward(|key, value| {
        out.push((key.clone(), value.clone()));
        ControlFlow::Continue(())
    });
    out
}

fn forward_keys<K: Clone, V>(map: &OrderedMap<K, V>) -> Vec<K> {
    let mut out = Vec::new();
    map.iterate(|key, _| {
        out.push(key.clone());
        ControlFlow::Continue(())
    });
    out
}

#[test]
fn test_scenario_set_get_delete() {
    let mut map = OrderedMap::with_capacity(10);

    map.set("test", 1);
    assert_eq!(map.get("test"), Some(&1));
    assert_eq!(map.get("test1"), None);
    assert_eq!(map.len(), 1);

    assert!(map.delete("test"));
    assert_eq!(map.len(), 0);

    assert!(!map.delete("test"));
    assert_eq!(map.len(), 0);
}

#[test]
fn test_scenario_forward_and_backward() {
    let mut map = OrderedMap::new();
    let cases = [("test", 1), ("test2", 10), ("test3", 20), ("test77", 1000)];
    for (key, value) in cases {
        map.set(key, value);
    }
    assert_eq!(map.len(), 4);

    assert_eq!(forward(&map), cases);

    let mut reversed = cases;
    reversed.reverse();
    assert_eq!(backward(&map), reversed);
}

#[test]
fn test_scenario_reset_middle() {
    let mut map = OrderedMap::with_capacity(10);
    map.set("test", 1);
    map.set("test2", 10);
    map.set("test3", 12);
    assert_eq!(map.len(), 3);

    map.set("test2", 100);

    assert_eq!(map.get("test2"), Some(&100));
    assert_eq!(map.len(), 3);
    assert_eq!(
        forward(&map),
        [("test", 1), ("test3", 12), ("test2", 100)]
    );
    assert_eq!(
        backward(&map),
        [("test2", 100), ("test3", 12), ("test", 1)]
    );
}

#[test]
fn test_scenario_replace_middle() {
    let mut map = OrderedMap::with_capacity(10);
    map.set("test", 1);
    map.set("test2", 10);
    map.set("test3", 12);

    assert!(map.replace("test2", 100));

    assert_eq!(map.get("test2"), Some(&100));
    assert_eq!(map.len(), 3);
    assert_eq!(
        forward(&map),
        [("test", 1), ("test2", 100), ("test3", 12)]
    );
    assert_eq!(
        backward(&map),
        [("test3", 12), ("test2", 100), ("test", 1)]
    );
}

#[test]
fn test_scenario_delete_corners() {
    let mut map = OrderedMap::with_capacity(10);
    map.set("test", 1);
    map.set("test2", 10);
    map.set("test3", 12);
    map.set("test4", 123);

    assert!(map.delete("test"));
    assert!(map.delete("test4"));

    assert_eq!(map.len(), 2);
    assert_eq!(forward(&map), [("test2", 10), ("test3", 12)]);
    assert_eq!(backward(&map), [("test3", 12), ("test2", 10)]);
}

#[test]
fn test_scenario_uninitialized_reads() {
    init_logging();
    let mut map: Option<OrderedMap<String, String>> = None;

    assert_eq!(nullable::get(map.as_ref(), "test"), None);
    assert!(!nullable::delete(map.as_mut(), "test"));
    assert_eq!(nullable::len(map.as_ref()), 0);
    assert!(map.is_none());
}

#[test]
#[should_panic(expected = "ordered map is not initialized")]
fn test_scenario_uninitialized_set() {
    init_logging();
    let mut map: Option<OrderedMap<String, String>> = None;
    nullable::set(map.as_mut(), "test".to_string(), "test".to_string());
}

#[test]
#[should_panic(expected = "ordered map is not initialized")]
fn test_scenario_uninitialized_replace() {
    init_logging();
    let mut map: Option<OrderedMap<String, String>> = None;
    nullable::replace(map.as_mut(), "test", "test".to_string());
}

#[test]
#[should_panic(expected = "ordered map is not initialized")]
fn test_scenario_uninitialized_iterate() {
    init_logging();
    let map: Option<OrderedMap<String, String>> = None;
    nullable::iterate(map.as_ref(), |_, _| ControlFlow::Continue(()));
}

#[test]
#[should_panic(expected = "ordered map is not initialized")]
fn test_scenario_uninitialized_iterate_backward() {
    init_logging();
    let map: Option<OrderedMap<String, String>> = None;
    nullable::iterate_backward(map.as_ref(), |_, _| ControlFlow::Continue(()));
}

#[test]
fn test_uninitialized_error_is_not_a_miss() {
    let mut present: Option<OrderedMap<&str, i32>> = Some(OrderedMap::new());
    let mut absent: Option<OrderedMap<&str, i32>> = None;

    assert_eq!(nullable::try_replace(present.as_mut(), "k", 1), Ok(false));

    let err: UninitializedError = nullable::try_replace(absent.as_mut(), "k", 1).unwrap_err();
    assert_eq!(err.operation(), "replace");
    assert_eq!(
        err.to_string(),
        "cannot replace: ordered map is not initialized"
    );
}

#[test]
fn test_reinsertion_moves_to_tail() {
    let mut map = OrderedMap::new();
    map.set('k', 1);
    for c in 'a'..='e' {
        map.set(c, 0);
    }
    map.set('k', 2);

    assert_eq!(map.last(), Some((&'k', &2)));
    assert_eq!(forward_keys(&map), ['a', 'b', 'c', 'd', 'e', 'k']);
}

#[test]
fn test_replace_changes_no_position() {
    let mut map: OrderedMap<u32, u32> = (0..8).map(|i| (i, i)).collect();
    let before = forward_keys(&map);

    for key in [0, 4, 7] {
        assert!(map.replace(&key, key * 100));
        assert_eq!(forward_keys(&map), before);
    }
    assert_eq!(map.get(&4), Some(&400));
}

#[test]
fn test_delete_boundaries_keep_relative_order() {
    let base: OrderedMap<char, u8> = [('a', 1), ('b', 2), ('c', 3), ('d', 4)]
        .into_iter()
        .collect();

    for (victim, expected) in [
        ('a', vec!['b', 'c', 'd']),
        ('d', vec!['a', 'b', 'c']),
        ('b', vec!['a', 'c', 'd']),
        ('c', vec!['a', 'b', 'd']),
    ] {
        let mut map = base.clone();
        assert!(map.delete(&victim));
        assert_eq!(forward_keys(&map), expected);

        let mut reversed = expected.clone();
        reversed.reverse();
        let backward_keys: Vec<char> = backward(&map).into_iter().map(|(k, _)| k).collect();
        assert_eq!(backward_keys, reversed);
    }
}

#[test]
fn test_delete_sole_entry_empties_everything() {
    let mut map = OrderedMap::new();
    map.set(1, "one");
    assert!(map.delete(&1));

    assert_eq!(map.len(), 0);
    assert!(forward(&map).is_empty());
    assert!(backward(&map).is_empty());
    assert_eq!(map.first(), None);
    assert_eq!(map.last(), None);
}

#[test]
fn test_early_stop_counts_exactly() {
    let map: OrderedMap<usize, usize> = (0..50).map(|i| (i, i)).collect();

    for stop_after in [1, 7, 50] {
        let mut calls = 0;
        map.iterate(|_, _| {
            calls += 1;
            if calls == stop_after {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(calls, stop_after);

        let mut calls = 0;
        map.iterate_backward(|_, _| {
            calls += 1;
            if calls == stop_after {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(calls, stop_after);
    }
}

#[test]
fn test_reset_with_capacity_is_destructive() {
    init_logging();
    let mut map: OrderedMap<i32, i32> = (0..4).map(|i| (i, i)).collect();

    map.reset_with_capacity(64);

    assert_eq!(map.len(), 0);
    assert!(forward(&map).is_empty());
    map.set(9, 9);
    assert_eq!(forward(&map), [(9, 9)]);
}

#[test]
fn test_string_keys_borrowed_lookup() {
    let mut map: OrderedMap<String, Vec<u8>> = OrderedMap::new();
    map.set("alpha".to_string(), vec![1]);
    map.set("beta".to_string(), vec![2]);

    assert_eq!(map.get("alpha"), Some(&vec![1]));
    assert!(map.replace("beta", vec![3]));
    assert_eq!(map["beta"], vec![3]);
    assert_eq!(map.get_or_default("gamma"), Vec::<u8>::new());
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Set(u8, u32),
    Delete(u8),
    Replace(u8, u32),
    PopFirst,
    PopLast,
}

/// Applies `op` to both the map and a plain vector model, then checks that
/// they agree on contents, order and size.
fn apply(map: &mut OrderedMap<u8, u32>, model: &mut Vec<(u8, u32)>, op: Op) {
    match op {
        Op::Set(key, value) => {
            let previous = model
                .iter()
                .position(|(k, _)| *k == key)
                .map(|index| model.remove(index).1);
            model.push((key, value));
            assert_eq!(map.set(key, value), previous);
        }
        Op::Delete(key) => {
            let index = model.iter().position(|(k, _)| *k == key);
            if let Some(index) = index {
                model.remove(index);
            }
            assert_eq!(map.delete(&key), index.is_some());
        }
        Op::Replace(key, value) => {
            let slot = model.iter_mut().find(|(k, _)| *k == key);
            let found = slot.is_some();
            if let Some(slot) = slot {
                slot.1 = value;
            }
            assert_eq!(map.replace(&key, value), found);
        }
        Op::PopFirst => {
            let expected = (!model.is_empty()).then(|| model.remove(0));
            assert_eq!(map.pop_first(), expected);
        }
        Op::PopLast => {
            assert_eq!(map.pop_last(), model.pop());
        }
    }

    assert_eq!(map.len(), model.len());
    assert_eq!(forward(map), *model);

    let mut reversed = model.clone();
    reversed.reverse();
    assert_eq!(backward(map), reversed);

    for key in 0..=u8::MAX {
        let expected = model.iter().find(|(k, _)| *k == key).map(|(_, v)| v);
        assert_eq!(map.get(&key), expected);
    }
}

#[test]
fn test_randomized_against_model() {
    let mut rng = StdRng::seed_from_u64(0x5eed_0f_0a7a);

    for _ in 0..20 {
        let mut map = OrderedMap::new();
        let mut model = Vec::new();
        let key_space = rng.gen_range(1..=32u8);

        for _ in 0..300 {
            let key = rng.gen_range(0..key_space);
            let value = rng.r#gen::<u32>();
            let op = match rng.gen_range(0..10) {
                0..=3 => Op::Set(key, value),
                4..=5 => Op::Delete(key),
                6..=7 => Op::Replace(key, value),
                8 => Op::PopFirst,
                _ => Op::PopLast,
            };
            apply(&mut map, &mut model, op);
        }
    }
}

#[test]
fn test_mutex_wrapped_map_across_threads() {
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::thread;

    let shared = Arc::new(Mutex::new(OrderedMap::new()));
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for i in 0..25 {
                    shared.lock().unwrap().set(worker * 100 + i, worker);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let map = shared.lock().unwrap();
    assert_eq!(map.len(), 100);
    assert_eq!(map.iter().count(), 100);
}
