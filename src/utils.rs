use std::collections::HashSet;

/// Positions of the identifiers in `haystack` that are absent from `present`
pub fn missing_indices(haystack: &[String], present: &HashSet<&str>) -> Vec<usize> {
    haystack
        .iter()
        .enumerate()
        .filter(|(_, id)| !present.contains(id.as_str()))
        .map(|(i, _)| i)
        .collect()
}

pub fn select_indices<T: Clone>(indices: &[usize], data: &[T]) -> Vec<T> {
    indices.iter().map(|i| data[*i].clone()).collect()
}

/// Everything in `data` except the entries at `indices`
///
/// `indices` must be sorted ascending.
pub fn exclude_indices<T: Clone>(indices: &[usize], data: &[T]) -> Vec<T> {
    let mut excluded = indices.iter().peekable();
    data.iter()
        .enumerate()
        .filter(|(i, _)| {
            if excluded.peek() == Some(&i) {
                excluded.next();
                false
            } else {
                true
            }
        })
        .map(|(_, v)| v.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_missing_indices() {
        let haystack = ids(&["g1", "g2", "g3", "g4"]);
        let present: HashSet<&str> = ["g2", "g4", "g9"].into_iter().collect();
        assert_eq!(missing_indices(&haystack, &present), vec![0, 2]);
    }

    #[test]
    fn test_missing_indices_none_missing() {
        let haystack = ids(&["g1"]);
        let present: HashSet<&str> = ["g1"].into_iter().collect();
        assert!(missing_indices(&haystack, &present).is_empty());
    }

    #[test]
    fn test_select_indices() {
        let data = ids(&["a", "b", "c"]);
        assert_eq!(select_indices(&[2, 0], &data), ids(&["c", "a"]));
    }

    #[test]
    fn test_exclude_indices() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(exclude_indices(&[0, 3], &data), vec![2.0, 3.0, 5.0]);
        assert_eq!(exclude_indices(&[], &data), data);
    }
}
