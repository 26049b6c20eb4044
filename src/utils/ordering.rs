//! Canonical question ordering
//!
//! Question ids come from a leading numeral in the source document
//! ("3", "[3]", "3)"). Keys are iterated by that number ascending;
//! ids without a number go last, in their original relative order.

/// Sort key for a question id: the first run of ASCII digits, if any
pub fn numeric_id(id: &str) -> Option<u64> {
    let digits: String = id
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    digits.parse().ok()
}

/// Stable sort by numeric id; non-numeric ids last
pub fn sort_canonical<T, F>(items: &mut [T], id_of: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_key(|item| match numeric_id(id_of(item)) {
        Some(n) => (0u8, n),
        None => (1u8, 0),
    });
}
