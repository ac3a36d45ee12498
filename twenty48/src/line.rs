/// Compact the present values of a line toward its front and merge equal neighbours.
///
/// Absent entries are dropped first, so gaps never prevent a merge. The dense
/// sequence is then scanned once: an element equal to its successor is replaced
/// by `merge(element)` and the pair is consumed; anything else is kept as is.
/// A merged value is never merged again in the same pass, so `[a, a, a]`
/// becomes `[merge(a), a]`.
///
/// The compactor knows nothing about grids or directions; how two equal values
/// combine is entirely up to `merge`.
pub fn compact_and_merge<T, I, F>(values: I, mut merge: F) -> Vec<T>
where
    T: PartialEq,
    I: IntoIterator<Item = Option<T>>,
    F: FnMut(T) -> T,
{
    let mut dense = values.into_iter().flatten().peekable();
    let mut result = Vec::new();
    while let Some(value) = dense.next() {
        if dense.peek() == Some(&value) {
            dense.next();
            result.push(merge(value));
        } else {
            result.push(value);
        }
    }
    result
}
