//! Ordered sequence matching over the event-name history.

/// Yields every index `k` of `haystack` where `haystack[k..k + needle.len()]`
/// equals `needle`, in ascending order.
///
/// An empty needle never matches. Occurrences may overlap; the caller decides
/// how much history a match consumes.
pub fn occurrences<'a, N, H>(needle: &'a [N], haystack: &'a [H]) -> impl Iterator<Item = usize> + 'a
where
    N: AsRef<str>,
    H: AsRef<str>,
{
    let first: Option<&str> = needle.first().map(AsRef::as_ref);

    haystack
        .iter()
        .enumerate()
        .filter(move |(_, name)| {
            let name: &str = (*name).as_ref();
            first == Some(name)
        })
        .map(|(index, _)| index)
        .filter(move |&index| matches_at(needle, haystack, index))
}

fn matches_at<N, H>(needle: &[N], haystack: &[H], index: usize) -> bool
where
    N: AsRef<str>,
    H: AsRef<str>,
{
    needle.iter().enumerate().all(|(offset, expected)| {
        haystack.get(index + offset).is_some_and(|name| {
            let name: &str = name.as_ref();
            let expected: &str = expected.as_ref();
            name == expected
        })
    })
}

/// Collects all starting indices of `needle` in `haystack`.
///
/// # Examples
///
/// ```
/// use detectr::matcher::find_occurrences;
///
/// let history = ["login", "logout", "login", "logout"];
/// assert_eq!(find_occurrences(&["login", "logout"], &history), vec![0, 2]);
/// ```
#[must_use]
pub fn find_occurrences<N, H>(needle: &[N], haystack: &[H]) -> Vec<usize>
where
    N: AsRef<str>,
    H: AsRef<str>,
{
    occurrences(needle, haystack).collect()
}
