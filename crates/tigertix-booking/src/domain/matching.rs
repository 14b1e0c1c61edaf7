//! Event lookup by free-form name.

use tigertix_core::event::Event;

/// Picks the event the user most likely meant by `query`.
///
/// A case-insensitive exact match wins; otherwise the first event whose name
/// contains the query, or is contained in it. Blank queries match nothing.
#[must_use]
pub fn best_match<'a>(events: &'a [Event], query: &str) -> Option<&'a Event> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    events
        .iter()
        .find(|event| event.name.to_lowercase() == needle)
        .or_else(|| {
            events.iter().find(|event| {
                let name = event.name.to_lowercase();
                name.contains(&needle) || needle.contains(&name)
            })
        })
}
