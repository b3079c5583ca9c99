#[derive(Clone, Debug)]
struct QueueEntry<T> {
    priority: f32,
    element: T,
}

/// An array-backed binary min-heap keyed by an [f32] priority, used as the
/// frontier of the cost propagation. The slots encode the usual implicit
/// tree: the parent of slot `i` sits at `(i - 1) / 2` and its children at
/// `2i + 1` and `2i + 2`. Priorities are compared with [f32::total_cmp] and
/// must not be NaN; ties are broken arbitrarily by heap structure.
#[derive(Clone, Debug)]
pub struct PriorityQueue<T> {
    tree: Vec<QueueEntry<T>>,
}

impl<T> PriorityQueue<T> {
    pub fn new() -> PriorityQueue<T> {
        PriorityQueue { tree: Vec::new() }
    }

    /// Number of queued elements.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// The minimum-priority element without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.tree.first().map(|entry| &entry.element)
    }

    /// Inserts `element` at the given `priority`. O(log n).
    pub fn enqueue(&mut self, element: T, priority: f32) {
        self.tree.push(QueueEntry { priority, element });
        self.sift_up(self.tree.len() - 1);
    }

    /// Removes and returns the minimum-priority element, or [None] when the
    /// queue is empty. O(log n).
    pub fn dequeue(&mut self) -> Option<T> {
        let last = self.tree.pop()?;
        if self.tree.is_empty() {
            return Some(last.element);
        }
        let top = std::mem::replace(&mut self.tree[0], last);
        self.sift_down(0);
        Some(top.element)
    }

    fn sift_up(&mut self, index: usize) {
        let mut i = index;
        while i > 0 {
            let parent = (i - 1) >> 1;
            if self.tree[i]
                .priority
                .total_cmp(&self.tree[parent].priority)
                .is_lt()
            {
                self.tree.swap(i, parent);
                i = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, index: usize) {
        let mut i = index;
        while let Some(child) = self.smaller_child(i) {
            if self.tree[child]
                .priority
                .total_cmp(&self.tree[i].priority)
                .is_lt()
            {
                self.tree.swap(i, child);
                i = child;
            } else {
                break;
            }
        }
    }

    /// The child of `i` with the smaller priority, if `i` has any children.
    fn smaller_child(&self, i: usize) -> Option<usize> {
        let left = (i << 1) | 1;
        let right = left + 1;
        if left >= self.tree.len() {
            None
        } else if right < self.tree.len()
            && self.tree[right]
                .priority
                .total_cmp(&self.tree[left].priority)
                .is_lt()
        {
            Some(right)
        } else {
            Some(left)
        }
    }
}

impl<T> Default for PriorityQueue<T> {
    fn default() -> PriorityQueue<T> {
        PriorityQueue::new()
    }
}
