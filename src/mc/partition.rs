//! Contiguous work partitioning for the parallel strategy
//!
//! The path index range `[0, paths)` is cut into `workers` equal, disjoint,
//! contiguous chunks. Each worker writes only the payoff slots of its own
//! chunk, so the shared output vector needs no locking.

use crate::error::{validation::validate_workers, SdeResult};
use std::ops::Range;

/// Length of each worker's chunk
pub fn chunk_len(paths: usize, workers: usize) -> SdeResult<usize> {
    validate_workers(paths, workers)?;
    Ok(paths / workers)
}

/// Index ranges owned by each worker, in order
pub fn partition(paths: usize, workers: usize) -> SdeResult<Vec<Range<usize>>> {
    let len = chunk_len(paths, workers)?;
    Ok((0..workers).map(|w| w * len..(w + 1) * len).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_partition_example() {
        let ranges = partition(12, 3).unwrap();
        assert_eq!(ranges, vec![0..4, 4..8, 8..12]);
    }

    #[test]
    fn test_single_worker_owns_everything() {
        assert_eq!(partition(7, 1).unwrap(), vec![0..7]);
    }

    #[test]
    fn test_uneven_split_rejected() {
        assert!(partition(10, 3).is_err());
        assert!(partition(10, 0).is_err());
    }

    proptest! {
        #[test]
        fn prop_ranges_cover_each_index_once(chunk in 1usize..200, workers in 1usize..32) {
            let paths = chunk * workers;
            let ranges = partition(paths, workers).unwrap();
            prop_assert_eq!(ranges.len(), workers);

            let mut hits = vec![0u32; paths];
            for range in &ranges {
                prop_assert_eq!(range.len(), chunk);
                for i in range.clone() {
                    hits[i] += 1;
                }
            }
            prop_assert!(hits.iter().all(|&h| h == 1));
        }

        #[test]
        fn prop_ranges_are_contiguous(chunk in 1usize..200, workers in 1usize..32) {
            let ranges = partition(chunk * workers, workers).unwrap();
            prop_assert_eq!(ranges[0].start, 0);
            for pair in ranges.windows(2) {
                prop_assert_eq!(pair[0].end, pair[1].start);
            }
            prop_assert_eq!(ranges[workers - 1].end, chunk * workers);
        }
    }
}
