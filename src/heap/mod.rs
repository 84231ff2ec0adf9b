//! Priority containers
//!
//! [`PriorityHeap`] is a binary heap whose order comes from a scoring
//! function chosen at construction. The decaying reservoir keeps its samples
//! in one, scored by negated priority, so the eviction candidate is always
//! at the root.
//!
//! # Example
//!
//! ```
//! use flowmetrics::heap::PriorityHeap;
//!
//! // Min-heap on the first tuple field
//! let mut heap = PriorityHeap::new(|job: &(f64, u32)| -job.0);
//! heap.add((3.0, 7));
//! heap.add((1.0, 9));
//!
//! assert_eq!(heap.remove_first(), Some((1.0, 9)));
//! ```

mod binary;

pub use binary::PriorityHeap;
