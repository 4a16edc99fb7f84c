use alloc::vec::Vec;
use core::ops::Index;
use core::ops::IndexMut;

use crate::Ptr;

#[cold]
#[inline(never)]
fn assert_occupied() -> ! {
    panic!("Attempted to access data of free slot");
}

/// One stored entry together with its links in the order list.
#[derive(Debug, Clone)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
    pub(crate) prev: Ptr,
    pub(crate) next: Ptr,
}

#[derive(Debug, Clone)]
enum Slot<K, V> {
    Free { next_free: Ptr },
    Occupied(Node<K, V>),
}

/// Backing storage for the order list. Freed slots are threaded into a free
/// list and handed out again before the vector grows.
#[derive(Debug, Clone)]
pub(crate) struct Arena<K, V> {
    slots: Vec<Slot<K, V>>,
    free_head: Ptr,
}

impl<K, V> Arena<K, V> {
    #[cfg(test)]
    pub(crate) fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free_head: Ptr::null(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Arena {
            slots: Vec::with_capacity(capacity),
            free_head: Ptr::null(),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = Ptr::null();
    }

    pub(crate) fn alloc(&mut self, key: K, value: V, hash: u64, prev: Ptr, next: Ptr) -> Ptr {
        let node = Node {
            key,
            value,
            hash,
            prev,
            next,
        };

        if self.free_head.is_null() {
            let ptr = Ptr::unchecked_from(self.slots.len());
            self.slots.push(Slot::Occupied(node));
            return ptr;
        }

        let ptr = self.free_head;
        match core::mem::replace(&mut self.slots[ptr.unchecked_get()], Slot::Occupied(node)) {
            Slot::Free { next_free } => self.free_head = next_free,
            Slot::Occupied(_) => {
                #[cold]
                #[inline(never)]
                fn die() -> ! {
                    panic!("Free list points at an occupied slot");
                }
                die()
            }
        }
        ptr
    }

    pub(crate) fn is_occupied(&self, ptr: Ptr) -> bool {
        if ptr.is_null() {
            return false;
        }
        matches!(
            self.slots.get(ptr.unchecked_get()),
            Some(Slot::Occupied(_))
        )
    }

    /// Releases the slot at `ptr` and returns its node. The node's links are
    /// returned untouched; relinking its neighbors is the caller's job.
    pub(crate) fn free(&mut self, ptr: Ptr) -> Node<K, V> {
        assert!(self.is_occupied(ptr), "Pointer to free must be occupied");
        let slot = core::mem::replace(
            &mut self.slots[ptr.unchecked_get()],
            Slot::Free {
                next_free: self.free_head,
            },
        );
        self.free_head = ptr;

        match slot {
            Slot::Occupied(node) => node,
            Slot::Free { .. } => assert_occupied(),
        }
    }
}

impl<K, V> Index<Ptr> for Arena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, index: Ptr) -> &Self::Output {
        match &self.slots[index.unchecked_get()] {
            Slot::Occupied(node) => node,
            Slot::Free { .. } => assert_occupied(),
        }
    }
}

impl<K, V> IndexMut<Ptr> for Arena<K, V> {
    fn index_mut(&mut self, index: Ptr) -> &mut Self::Output {
        match &mut self.slots[index.unchecked_get()] {
            Slot::Occupied(node) => node,
            Slot::Free { .. } => assert_occupied(),
        }
    }
}
