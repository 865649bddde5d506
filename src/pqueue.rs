//! A min-heap priority queue.
//!
//! Array-backed binary heap used to drive Huffman tree construction.

/// An entry in the priority queue.
#[derive(Debug, Clone)]
struct HeapEntry<K, T> {
    priority: K,
    data: T,
}

/// A min-heap priority queue that pops the lowest-priority element first.
///
/// Uses 0-indexed storage with parent = (i-1)/2, children = 2i+1, 2i+2.
/// Push and pop are O(log n).
#[derive(Debug, Clone)]
pub struct MinHeap<K, T> {
    nodes: Vec<HeapEntry<K, T>>,
}

impl<K: Ord, T> MinHeap<K, T> {
    /// Create a new, empty min-heap.
    pub fn new() -> Self {
        MinHeap { nodes: Vec::new() }
    }

    /// Create an empty min-heap with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        MinHeap {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of elements in the heap.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the heap is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Push an element onto the heap with the given priority.
    pub fn push(&mut self, priority: K, data: T) {
        self.nodes.push(HeapEntry { priority, data });
        self.sift_up(self.nodes.len() - 1);
    }

    #[cfg(test)]
    fn peek_priority(&self) -> Option<&K> {
        self.nodes.first().map(|entry| &entry.priority)
    }

    /// Pop the minimum-priority element from the heap.
    ///
    /// Returns `None` if the heap is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.nodes.is_empty() {
            return None;
        }
        // Swap root with last, remove last, sift down root
        let last = self.nodes.len() - 1;
        self.nodes.swap(0, last);
        let result = self.nodes.pop()?;
        if !self.nodes.is_empty() {
            self.sift_down(0);
        }
        Some(result.data)
    }

    /// Sift element at `index` up to maintain heap property.
    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.nodes[index].priority < self.nodes[parent].priority {
                self.nodes.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    /// Sift element at `index` down to maintain heap property.
    fn sift_down(&mut self, mut index: usize) {
        let len = self.nodes.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut smallest = index;

            if left < len && self.nodes[left].priority < self.nodes[smallest].priority {
                smallest = left;
            }
            if right < len && self.nodes[right].priority < self.nodes[smallest].priority {
                smallest = right;
            }

            if smallest == index {
                break;
            }

            self.nodes.swap(index, smallest);
            index = smallest;
        }
    }
}

impl<K: Ord, T> Default for MinHeap<K, T> {
    fn default() -> Self {
        Self::new()
    }
}
