use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Routes intermediate keys to reduce partitions.
#[derive(Debug, Clone, Copy)]
pub struct HashPartitioner {
    num_partitions: u32,
}

impl HashPartitioner {
    /// `num_partitions` is clamped to at least one.
    pub fn new(num_partitions: u32) -> Self {
        Self {
            num_partitions: num_partitions.max(1),
        }
    }

    pub fn num_partitions(&self) -> u32 {
        self.num_partitions
    }

    pub fn get_partition(&self, key: &str) -> u32 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let hash = hasher.finish() as u32;
        hash % self.num_partitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_deterministic() {
        let partitioner = HashPartitioner::new(8);

        let p1 = partitioner.get_partition("Electronics");
        let p2 = partitioner.get_partition("Electronics");
        assert_eq!(p1, p2);
        assert!(p1 < 8);
    }

    #[test]
    fn test_single_partition_takes_everything() {
        let partitioner = HashPartitioner::new(1);
        for key in ["a", "b", "Books", ""] {
            assert_eq!(partitioner.get_partition(key), 0);
        }
    }

    #[test]
    fn test_zero_partitions_clamped() {
        assert_eq!(HashPartitioner::new(0).num_partitions(), 1);
    }
}
