#![no_main]

use std::ops::ControlFlow;

use libfuzzer_sys::fuzz_target;
use omap::OrderedMap;

#[derive(Debug)]
enum MapOperation {
    Set(u8, u16),
    Get(u8),
    Delete(u8),
    Replace(u8, u16),
    PopFirst,
    PopLast,
    Clear,
    Reset(u8),
    IterateUntil(u8),
}

impl<'a> arbitrary::Arbitrary<'a> for MapOperation {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        match u.int_in_range(0..=8)? {
            0 => Ok(MapOperation::Set(u.arbitrary()?, u.arbitrary()?)),
            1 => Ok(MapOperation::Get(u.arbitrary()?)),
            2 => Ok(MapOperation::Delete(u.arbitrary()?)),
            3 => Ok(MapOperation::Replace(u.arbitrary()?, u.arbitrary()?)),
            4 => Ok(MapOperation::PopFirst),
            5 => Ok(MapOperation::PopLast),
            6 => Ok(MapOperation::Clear),
            7 => Ok(MapOperation::Reset(u.arbitrary()?)),
            8 => Ok(MapOperation::IterateUntil(u.arbitrary()?)),
            _ => unreachable!(),
        }
    }
}

fuzz_target!(|ops: Vec<MapOperation>| {
    let mut map = OrderedMap::new();
    let mut model: Vec<(u8, u16)> = Vec::new();

    for op in ops {
        match op {
            MapOperation::Set(key, value) => {
                let previous = model
                    .iter()
                    .position(|(k, _)| *k == key)
                    .map(|index| model.remove(index).1);
                model.push((key, value));
                assert_eq!(map.set(key, value), previous);
            }
            MapOperation::Get(key) => {
                let expected = model.iter().find(|(k, _)| *k == key).map(|(_, v)| v);
                assert_eq!(map.get(&key), expected);
            }
            MapOperation::Delete(key) => {
                let index = model.iter().position(|(k, _)| *k == key);
                if let Some(index) = index {
                    model.remove(index);
                }
                assert_eq!(map.delete(&key), index.is_some());
            }
            MapOperation::Replace(key, value) => {
                let slot = model.iter_mut().find(|(k, _)| *k == key);
                let found = slot.is_some();
                if let Some(slot) = slot {
                    slot.1 = value;
                }
                assert_eq!(map.replace(&key, value), found);
            }
            MapOperation::PopFirst => {
                let expected = (!model.is_empty()).then(|| model.remove(0));
                assert_eq!(map.pop_first(), expected);
            }
            MapOperation::PopLast => {
                assert_eq!(map.pop_last(), model.pop());
            }
            MapOperation::Clear => {
                map.clear();
                model.clear();
            }
            MapOperation::Reset(capacity) => {
                map.reset_with_capacity(capacity as usize);
                model.clear();
            }
            MapOperation::IterateUntil(limit) => {
                let limit = limit as usize;
                let mut visited = Vec::new();
                map.iterate(|key, value| {
                    if visited.len() == limit {
                        return ControlFlow::Break(());
                    }
                    visited.push((*key, *value));
                    ControlFlow::Continue(())
                });
                assert_eq!(visited, model[..limit.min(model.len())]);
            }
        }

        assert_eq!(map.len(), model.len());
        assert!(map.iter().eq(model.iter().map(|(k, v)| (k, v))));
        assert!(map.iter().rev().eq(model.iter().rev().map(|(k, v)| (k, v))));
    }
});
