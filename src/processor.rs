// Typo-Suggest Input Processors
// Rewrite raw input before it is matched

/// Rewrites an input before matching
pub trait Processor: Send + Sync {
    fn process(&self, input: &str) -> String;
}

impl<F> Processor for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn process(&self, input: &str) -> String {
        self(input)
    }
}

const MARKER: char = '^';

/// Applies terminal-style erase markings typed into the input
///
/// - `^H` erases the character before the marker
/// - `^W` erases the word (run of letters) before the marker
///
/// Other markings are left alone. Markings are applied left to right; after
/// an erase, scanning resumes where the erased text started.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkingTypoProcessor;

impl Processor for MarkingTypoProcessor {
    fn process(&self, input: &str) -> String {
        apply_markings(input)
    }
}

fn apply_markings(input: &str) -> String {
    let mut text = input.to_string();
    let mut offset = 0;

    while offset < text.len() {
        let Some(found) = text[offset..].find(MARKER) else {
            break;
        };
        let marker_at = offset + found;
        let after = marker_at + MARKER.len_utf8();
        // A trailing marker has nothing to apply
        let Some(marking) = text[after..].chars().next() else {
            break;
        };
        let end = after + marking.len_utf8();

        match marking {
            'H' => {
                let start = text[..marker_at]
                    .chars()
                    .next_back()
                    .map_or(marker_at, |c| marker_at - c.len_utf8());
                text.replace_range(start..end, "");
                offset = start;
            }
            'W' => {
                let start = text[..marker_at]
                    .char_indices()
                    .rev()
                    .find(|(_, c)| !c.is_alphabetic())
                    .map_or(0, |(i, c)| i + c.len_utf8());
                text.replace_range(start..end, "");
                offset = start;
            }
            _ => offset = after,
        }
    }

    text
}
