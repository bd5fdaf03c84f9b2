use crate::types::NIL;

/// Arena of circular doubly-linked lists over the integers `0..capacity`.
///
/// Each integer is a member of at most one list at a time, and a list is
/// named by its first element. All operations are O(1); nothing is ever
/// allocated after construction. This is the backing structure for the
/// separated-DFS-child lists (sorted by lowpoint, consumed front-first by
/// the embedder) and for the per-vertex work lists of the drawing stage.
#[derive(Clone, Debug)]
pub struct ListCollection {
    next: Vec<usize>,
    prev: Vec<usize>,
}

impl ListCollection {
    pub fn new(capacity: usize) -> Self {
        ListCollection {
            next: vec![NIL; capacity],
            prev: vec![NIL; capacity],
        }
    }

    /// Detaches every element; all lists become empty.
    pub fn reinit(&mut self) {
        self.next.fill(NIL);
        self.prev.fill(NIL);
    }

    pub fn capacity(&self) -> usize {
        self.next.len()
    }

    /// First element of the list, or `NIL` for the empty list.
    pub fn front(&self, head: usize) -> usize {
        head
    }

    /// Successor of `item` within its list, or `NIL` once the walk has
    /// wrapped back to `head`.
    pub fn successor(&self, head: usize, item: usize) -> usize {
        let nxt = self.next[item];
        if nxt == head { NIL } else { nxt }
    }

    /// Last element of the list, or `NIL` for the empty list.
    pub fn back(&self, head: usize) -> usize {
        if head == NIL { NIL } else { self.prev[head] }
    }

    /// Appends `item` at the tail. Returns the (unchanged unless the list
    /// was empty) head.
    pub fn append(&mut self, head: usize, item: usize) -> usize {
        if head == NIL {
            self.next[item] = item;
            self.prev[item] = item;
            return item;
        }
        let tail = self.prev[head];
        self.next[tail] = item;
        self.prev[item] = tail;
        self.next[item] = head;
        self.prev[head] = item;
        head
    }

    /// Prepends `item`; it becomes the new head.
    pub fn prepend(&mut self, head: usize, item: usize) -> usize {
        let head = self.append(head, item);
        self.prev[head]
    }

    /// Unlinks `item` from the list it belongs to. Returns the new head.
    pub fn delete(&mut self, head: usize, item: usize) -> usize {
        let new_head = if self.next[item] == item {
            NIL
        } else if item == head {
            self.next[item]
        } else {
            head
        };
        let (prv, nxt) = (self.prev[item], self.next[item]);
        self.next[prv] = nxt;
        self.prev[nxt] = prv;
        self.next[item] = NIL;
        self.prev[item] = NIL;
        new_head
    }

    /// Removes and returns the head element. Returns `(item, new_head)`.
    pub fn pop_front(&mut self, head: usize) -> (usize, usize) {
        if head == NIL {
            return (NIL, NIL);
        }
        let new_head = self.delete(head, head);
        (head, new_head)
    }

    /// True if `item` currently belongs to some list.
    pub fn contains(&self, item: usize) -> bool {
        self.next[item] != NIL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_keeps_order() {
        let mut lc = ListCollection::new(8);
        let mut head = NIL;
        for x in [3, 1, 4, 5] {
            head = lc.append(head, x);
        }
        assert_eq!(head, 3);
        let mut walk = vec![];
        let mut it = lc.front(head);
        while it != NIL {
            walk.push(it);
            it = lc.successor(head, it);
        }
        assert_eq!(walk, vec![3, 1, 4, 5]);
        assert_eq!(lc.back(head), 5);
    }

    #[test]
    fn prepend_becomes_head() {
        let mut lc = ListCollection::new(4);
        let mut head = NIL;
        head = lc.append(head, 0);
        head = lc.prepend(head, 2);
        assert_eq!(head, 2);
        assert_eq!(lc.successor(head, 2), 0);
    }

    #[test]
    fn delete_middle_head_and_last() {
        let mut lc = ListCollection::new(8);
        let mut head = NIL;
        for x in [0, 1, 2] {
            head = lc.append(head, x);
        }
        head = lc.delete(head, 1);
        assert_eq!(head, 0);
        assert!(!lc.contains(1));
        head = lc.delete(head, 0);
        assert_eq!(head, 2);
        head = lc.delete(head, 2);
        assert_eq!(head, NIL);
    }

    #[test]
    fn pop_front_drains() {
        let mut lc = ListCollection::new(4);
        let mut head = NIL;
        for x in [2, 3, 1] {
            head = lc.append(head, x);
        }
        let mut out = vec![];
        loop {
            let (item, new_head) = lc.pop_front(head);
            if item == NIL {
                break;
            }
            out.push(item);
            head = new_head;
        }
        assert_eq!(out, vec![2, 3, 1]);
    }
}
