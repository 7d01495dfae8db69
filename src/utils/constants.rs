/// Two coordinates closer than this are considered equal.
///
/// Also the relative dead band of the predicates, see [`predicates`](super::predicates).
pub const EPSILON: f64 = 1e-9;

/// Number of buckets of the angular hull hash for `n` input points, i.e. `ceil(sqrt(n))`.
pub fn hash_size(n: usize) -> usize {
    ((n as f64).sqrt().ceil() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_size() {
        assert_eq!(hash_size(0), 1);
        assert_eq!(hash_size(3), 2);
        assert_eq!(hash_size(4), 2);
        assert_eq!(hash_size(5), 3);
        assert_eq!(hash_size(100), 10);
    }
}
