/// One fixed-size page of a sequence. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub number: usize,
    pub total_pages: usize,
}

/// Total page count, never less than 1 so an empty table still has a page 1.
pub fn page_count(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Slice `[(page-1)*size, page*size)` of `items`, clipped to its length.
///
/// A page size of 0 is treated as 1 and page 0 as page 1. Pages past the end
/// yield an empty slice.
pub fn paginate<T>(items: &[T], page_size: usize, page: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let number = page.max(1);
    let start = ((number - 1).saturating_mul(page_size)).min(items.len());
    let end = number.saturating_mul(page_size).min(items.len());

    Page {
        items: &items[start..end],
        number,
        total_pages: page_count(items.len(), page_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_laws() {
        for n in 0..40usize {
            for p in 1..12usize {
                let expected = if n == 0 { 1 } else { (n + p - 1) / p };
                assert_eq!(page_count(n, p), expected, "n={n} p={p}");
            }
        }
    }

    #[test]
    fn test_pages_concatenate_to_whole() {
        for n in 0..30usize {
            let items: Vec<usize> = (0..n).collect();
            for p in 1..8usize {
                let pages = page_count(n, p);
                let mut joined = Vec::new();
                for number in 1..=pages {
                    joined.extend_from_slice(paginate(&items, p, number).items);
                }
                assert_eq!(joined, items, "n={n} p={p}");

                let last = paginate(&items, p, pages);
                let expected_last = if n == 0 { 0 } else { n - (pages - 1) * p };
                assert_eq!(last.items.len(), expected_last, "n={n} p={p}");
            }
        }
    }

    #[test]
    fn test_empty_sequence_has_one_empty_page() {
        let items: Vec<u8> = Vec::new();
        let page = paginate(&items, 10, 1);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.number, 1);
    }

    #[test]
    fn test_out_of_range_inputs() {
        let items = [1, 2, 3, 4, 5];
        assert_eq!(paginate(&items, 2, 0).items, &[1, 2]);
        assert_eq!(paginate(&items, 0, 3).items, &[3]);
        assert!(paginate(&items, 2, 9).items.is_empty());
        assert_eq!(paginate(&items, 2, usize::MAX).items.len(), 0);
    }

    #[test]
    fn test_middle_page() {
        let items: Vec<u32> = (0..25).collect();
        let page = paginate(&items, 10, 2);
        assert_eq!(page.items.first(), Some(&10));
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_pages, 3);
    }
}
