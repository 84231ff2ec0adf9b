//! Array-backed binary max-heap over a derived score
//!
//! The score of an element is computed by a function supplied at
//! construction, so the same container serves as a max-heap (`|x| *x`) or a
//! min-heap (`|x| -*x`) without wrapping payloads in ordering newtypes.

use core::fmt;
use core::marker::PhantomData;

/// Binary heap ordered by a scoring function
///
/// For every non-root position, `score(parent) >= score(child)`, so
/// [`first`](Self::first) always returns a highest-scoring element. Ties are
/// not ordered.
///
/// # Example
///
/// ```
/// use flowmetrics::heap::PriorityHeap;
///
/// let mut heap = PriorityHeap::by_value();
/// heap.add_all([5, 1, 3, 8, 2]);
///
/// assert_eq!(heap.first(), Some(&8));
/// assert_eq!(heap.to_sorted_vec(), vec![8, 5, 3, 2, 1]);
/// assert_eq!(heap.len(), 5);
/// ```
pub struct PriorityHeap<T, S, F = fn(&T) -> S> {
    /// Heap-ordered backing storage
    elements: Vec<T>,
    /// Scoring function
    score: F,
    _score: PhantomData<fn() -> S>,
}

fn identity_score<T: Clone>(element: &T) -> T {
    element.clone()
}

impl<T: PartialOrd + Clone> PriorityHeap<T, T> {
    /// Max-heap scoring each element by its own value
    pub fn by_value() -> Self {
        Self::new(identity_score::<T>)
    }
}

impl<T, S, F> PriorityHeap<T, S, F>
where
    F: Fn(&T) -> S,
    S: PartialOrd,
{
    /// Create an empty heap with the given scoring function
    pub fn new(score: F) -> Self {
        Self {
            elements: Vec::new(),
            score,
            _score: PhantomData,
        }
    }

    /// Create an empty heap with room for `capacity` elements
    pub fn with_capacity(capacity: usize, score: F) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
            score,
            _score: PhantomData,
        }
    }

    /// Build a heap from unordered elements in O(n)
    pub fn from_vec(elements: Vec<T>, score: F) -> Self {
        let mut heap = Self {
            elements,
            score,
            _score: PhantomData,
        };
        heap.heapify();
        heap
    }

    /// Insert an element, O(log n)
    pub fn add(&mut self, element: T) {
        self.elements.push(element);
        self.bubble_up(self.elements.len() - 1);
    }

    /// Insert several elements, each with its own bubble-up
    pub fn add_all<I: IntoIterator<Item = T>>(&mut self, elements: I) {
        for element in elements {
            self.add(element);
        }
    }

    /// Remove and return the highest-scoring element
    pub fn remove_first(&mut self) -> Option<T> {
        let last = self.elements.pop()?;
        if self.elements.is_empty() {
            return Some(last);
        }
        let root = core::mem::replace(&mut self.elements[0], last);
        self.sink_down(0);
        Some(root)
    }

    /// Mutate every element in place, then restore heap order in O(n)
    pub fn update_all<M: FnMut(&mut T)>(&mut self, mut f: M) {
        for element in self.elements.iter_mut() {
            f(element);
        }
        self.heapify();
    }

    /// Score of the root element
    pub fn first_score(&self) -> Option<S> {
        self.elements.first().map(|e| (self.score)(e))
    }

    fn bubble_up(&mut self, mut index: usize) {
        let score = (self.score)(&self.elements[index]);
        while index > 0 {
            let parent = (index - 1) / 2;
            if score <= (self.score)(&self.elements[parent]) {
                break;
            }
            self.elements.swap(parent, index);
            index = parent;
        }
    }

    fn sink_down(&mut self, mut index: usize) {
        let len = self.elements.len();
        let score = (self.score)(&self.elements[index]);

        loop {
            let mut swap: Option<(usize, S)> = None;

            for child in [2 * index + 1, 2 * index + 2] {
                if child >= len {
                    break;
                }
                let child_score = (self.score)(&self.elements[child]);
                if child_score > score {
                    let better = match &swap {
                        Some((_, best)) => *best < child_score,
                        None => true,
                    };
                    if better {
                        swap = Some((child, child_score));
                    }
                }
            }

            match swap {
                Some((child, _)) => {
                    self.elements.swap(index, child);
                    index = child;
                }
                None => break,
            }
        }
    }

    fn heapify(&mut self) {
        for index in (0..self.elements.len() / 2).rev() {
            self.sink_down(index);
        }
    }
}

impl<T, S, F> PriorityHeap<T, S, F>
where
    T: Clone,
    F: Fn(&T) -> S + Clone,
    S: PartialOrd,
{
    /// All elements in descending score order
    ///
    /// Drains a clone, so this is O(n log n) and leaves `self` untouched.
    pub fn to_sorted_vec(&self) -> Vec<T> {
        let mut clone = self.clone();
        let mut sorted = Vec::with_capacity(clone.len());
        while let Some(element) = clone.remove_first() {
            sorted.push(element);
        }
        sorted
    }
}

impl<T, S, F> PriorityHeap<T, S, F> {
    /// Highest-scoring element, without removing it
    pub fn first(&self) -> Option<&T> {
        self.elements.first()
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the heap holds no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Remove all elements, keeping the scoring function
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    /// Elements in heap-internal order
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.elements.iter()
    }

    /// Snapshot of the elements in heap-internal order
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.elements.clone()
    }

    /// Consume the heap, returning the backing vector in heap order
    pub fn into_vec(self) -> Vec<T> {
        self.elements
    }
}

impl<T: Clone, S, F: Clone> Clone for PriorityHeap<T, S, F> {
    fn clone(&self) -> Self {
        Self {
            elements: self.elements.clone(),
            score: self.score.clone(),
            _score: PhantomData,
        }
    }
}

impl<T: fmt::Debug, S, F> fmt::Debug for PriorityHeap<T, S, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityHeap")
            .field("elements", &self.elements)
            .finish_non_exhaustive()
    }
}

impl<T, S, F> Extend<T> for PriorityHeap<T, S, F>
where
    F: Fn(&T) -> S,
    S: PartialOrd,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}
