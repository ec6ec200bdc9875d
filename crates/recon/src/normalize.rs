//! Cyrillic ё-normalization.
//!
//! Participant names come from free-form survey exports where ё and е are
//! used interchangeably; reconciliation treats names as opaque strings, so
//! both files are folded to the е spelling before parsing. Pure transform —
//! persisting the result is the caller's decision.

use std::borrow::Cow;

/// Replace every ё/Ё with е/Е. Borrows when there is nothing to replace.
pub fn normalize_yo(input: &str) -> Cow<'_, str> {
    if !input.contains(['ё', 'Ё']) {
        return Cow::Borrowed(input);
    }
    Cow::Owned(
        input
            .chars()
            .map(|c| match c {
                'ё' => 'е',
                'Ё' => 'Е',
                other => other,
            })
            .collect(),
    )
}
