use num_traits::Float;

pub(crate) fn squared_euclidean_distance<T: Float>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| ((*x) - (*y)) * ((*x) - (*y)))
        .fold(T::zero(), std::ops::Add::add)
}

pub(crate) fn euclidean_distance<T: Float>(a: &[T], b: &[T]) -> T {
    squared_euclidean_distance(a, b).sqrt()
}

/// Index of the closest candidate row to `point`. Ties go to the lowest index.
pub(crate) fn nearest_row<T: Float>(point: &[T], candidates: &[&[T]]) -> usize {
    let mut nearest = 0;
    let mut min_dist = T::infinity();
    for (i, candidate) in candidates.iter().enumerate() {
        let dist = squared_euclidean_distance(point, candidate);
        if dist < min_dist {
            min_dist = dist;
            nearest = i;
        }
    }
    nearest
}
