//! Segmentation: split page text into chunks small enough for one
//! translation call.
//!
//! Remote translators cap the payload of a single request (5 000 characters
//! for the Google web endpoint), so every page is cut into ordered chunks
//! before translation. Cuts prefer the last line break inside the size
//! window and fall back to a hard cut at the limit, which may split a word.
//!
//! Splitting is a partition: concatenating the chunks reproduces the input
//! byte for byte. A line break used as a cut point stays at the start of the
//! next chunk.
//!
//! Lengths are counted in `char`s, so cuts always land on UTF-8 boundaries.

/// Split `text` into chunks of at most `max_chars` characters.
///
/// While the remainder is too long, cut before the last `'\n'` found in its
/// first `max_chars` characters, or exactly at `max_chars` when the window
/// holds no usable line break. Whatever remains is the final chunk, even if
/// empty.
///
/// A line break at position 0 of the remainder is never a cut point, since
/// cutting there would produce an empty chunk and never advance. Such a
/// carried line break is also not counted when deciding whether the
/// remainder fits, so the final chunk may hold `max_chars + 1` characters;
/// every other chunk holds at most `max_chars`.
///
/// `max_chars` values of 0 are treated as 1.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while let Some(cut) = next_cut(rest, max_chars) {
        chunks.push(rest[..cut].to_string());
        rest = &rest[cut..];
    }
    chunks.push(rest.to_string());
    chunks
}

/// Number of chunks [`split_text`] would produce, without allocating them.
pub fn chunk_count(text: &str, max_chars: usize) -> usize {
    let max_chars = max_chars.max(1);
    let mut count = 1;
    let mut rest = text;

    while let Some(cut) = next_cut(rest, max_chars) {
        rest = &rest[cut..];
        count += 1;
    }
    count
}

/// Byte index at which `rest` must be cut, or `None` when it fits whole.
///
/// The returned index is always greater than 0.
fn next_cut(rest: &str, max_chars: usize) -> Option<usize> {
    let measured = rest.strip_prefix('\n').unwrap_or(rest);
    measured.char_indices().nth(max_chars)?;

    let window_end = byte_offset(rest, max_chars);
    let cut = rest[..window_end]
        .rfind('\n')
        .filter(|&i| i > 0)
        .unwrap_or(window_end);
    Some(cut)
}

/// Byte offset of the `n`-th char of `s`, or `s.len()` when `s` is shorter.
fn byte_offset(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lengths(chunks: &[String]) -> Vec<usize> {
        chunks.iter().map(|c| c.chars().count()).collect()
    }

    fn assert_partition(text: &str, max: usize) {
        let chunks = split_text(text, max);
        assert_eq!(chunks.concat(), text, "chunks must rebuild {text:?}");
        let (last, init) = chunks.split_last().expect("at least one chunk");
        for c in init {
            assert!(c.chars().count() <= max, "chunk {c:?} exceeds {max}");
            assert!(!c.is_empty(), "only the final chunk may be empty");
        }
        assert!(last.chars().count() <= max + 1, "final chunk {last:?} too long");
        assert_eq!(chunks.len(), chunk_count(text, max));
    }

    #[test]
    fn cuts_before_newline() {
        assert_eq!(split_text("hello\nworld", 5), vec!["hello", "\nworld"]);
    }

    #[test]
    fn hard_cut_without_newline() {
        let chunks = split_text("abcdefghijkl", 5);
        assert_eq!(lengths(&chunks), vec![5, 5, 2]);
        assert_eq!(chunks, vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn short_text_is_single_chunk() {
        assert_eq!(split_text("short", 5000), vec!["short"]);
    }

    #[test]
    fn empty_text_yields_one_empty_chunk() {
        assert_eq!(split_text("", 10), vec![""]);
        assert_eq!(chunk_count("", 10), 1);
    }

    #[test]
    fn prefers_last_newline_in_window() {
        let chunks = split_text("ab\ncd\nefghij", 7);
        assert_eq!(chunks, vec!["ab\ncd", "\nefghij"]);
    }

    #[test]
    fn newline_carried_into_next_chunk() {
        let chunks = split_text("one\ntwo\nthree\nfour", 8);
        assert_eq!(chunks.concat(), "one\ntwo\nthree\nfour");
        assert_eq!(chunks[0], "one\ntwo");
        assert!(chunks[1].starts_with('\n'));
    }

    #[test]
    fn leading_newline_is_not_a_cut_point() {
        // Only line break in the window sits at position 0: hard cut instead.
        let chunks = split_text("\nabcdefgh", 4);
        assert_eq!(chunks, vec!["\nabc", "defg", "h"]);
    }

    #[test]
    fn only_newlines_terminates() {
        assert_partition("\n\n\n\n\n", 1);
        assert_partition("\n\n\n", 2);
    }

    #[test]
    fn multibyte_text_cuts_on_char_boundaries() {
        let text = "çàéîõüñßøå".repeat(3);
        let chunks = split_text(&text, 4);
        assert_eq!(chunks.concat(), text);
        assert!(chunks.iter().all(|c| c.chars().count() <= 4));
    }

    #[test]
    fn zero_max_is_treated_as_one() {
        assert_eq!(split_text("abc", 0), vec!["a", "b", "c"]);
    }

    #[test]
    fn partition_holds_across_shapes() {
        let samples = [
            "",
            "a",
            "\n",
            "plain text without breaks at all",
            "line one\nline two\nline three\n",
            "\n\nleading breaks then text",
            "trailing breaks\n\n\n",
            "mixed\r\nline\r\nendings",
            "Bonjour à tous,\nvoici le compte rendu.\n\nÀ bientôt.",
        ];
        for text in samples {
            for max in [1, 2, 3, 5, 8, 13, 100] {
                assert_partition(text, max);
            }
        }
    }

    #[test]
    fn default_limit_on_long_page() {
        let line = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.\n";
        let page = line.repeat(300);
        let chunks = split_text(&page, 5000);
        assert!(chunks.len() >= 4);
        assert_eq!(chunks.concat(), page);
        for c in &chunks[1..] {
            assert!(c.starts_with('\n'), "cuts land on line breaks");
        }
    }

    mod partition_properties {
        use super::*;
        use proptest::prelude::*;

        /// Text mixing runs of line breaks, spaces and multi-byte characters.
        fn page_text() -> impl Strategy<Value = String> {
            prop::collection::vec(
                prop_oneof![
                    3 => "\\PC{1,12}",
                    2 => "\n{1,5}",
                    1 => "[ é\n]{1,6}",
                ],
                0..40,
            )
            .prop_map(|parts| parts.concat())
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(2000))]

            #[test]
            fn chunks_rebuild_the_input(text in page_text(), max in 1usize..64) {
                prop_assert_eq!(split_text(&text, max).concat(), text);
            }

            #[test]
            fn only_the_last_chunk_may_exceed_max(text in page_text(), max in 1usize..64) {
                let chunks = split_text(&text, max);
                let (last, init) = chunks.split_last().expect("at least one chunk");
                for c in init {
                    prop_assert!(!c.is_empty());
                    prop_assert!(c.chars().count() <= max, "chunk {:?} exceeds {}", c, max);
                }
                prop_assert!(last.chars().count() <= max + 1);
            }

            #[test]
            fn count_matches_split(text in page_text(), max in 1usize..64) {
                prop_assert_eq!(chunk_count(&text, max), split_text(&text, max).len());
            }
        }
    }
}
