//! Extremum selection over aggregate totals.

/// Return the entry with the greatest value.
///
/// Ties keep the entry seen first: a later value only wins when it is strictly
/// greater. `NaN` never beats a real number. Returns `None` only for an empty
/// iterator, so callers that must report "no data" should check emptiness
/// before calling.
pub fn max_entry<K, I>(entries: I) -> Option<(K, f64)>
where
    I: IntoIterator<Item = (K, f64)>,
{
    let mut best: Option<(K, f64)> = None;
    for (key, value) in entries {
        let replace = match &best {
            None => true,
            Some((_, current)) => value > *current || (current.is_nan() && !value.is_nan()),
        };
        if replace {
            best = Some((key, value));
        }
    }
    best
}
