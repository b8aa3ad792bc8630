//! The "All Users" exclusivity rule for the announcement audience selector.

use std::collections::BTreeSet;

use crate::content::Audience;

/// Resolves a multi-select audience change against the exclusivity rule.
///
/// "All Users" and the specific tags are mutually exclusive in the stored
/// selection. `current` is the selection before the change and `requested`
/// is what the control now reports:
///
/// - `requested` holds "All Users" plus other tags, and "All Users" was
///   already selected: the user is implicitly deselecting it by picking
///   specifics, so "All Users" is removed.
/// - `requested` holds "All Users" plus other tags, and "All Users" was
///   newly added: it wins and clears everything else.
/// - Anything else passes through unchanged.
///
/// Pure function with no knowledge of validation or persistence; any
/// control bound to the audience field can reuse it.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
///
/// use atrium_forms::{resolve_audience, Audience};
///
/// let current = BTreeSet::from([Audience::AllUsers]);
/// let requested = BTreeSet::from([Audience::AllUsers, Audience::Students]);
/// assert_eq!(
/// 	resolve_audience(&current, &requested),
/// 	BTreeSet::from([Audience::Students])
/// );
///
/// let current = BTreeSet::from([Audience::Students]);
/// assert_eq!(
/// 	resolve_audience(&current, &requested),
/// 	BTreeSet::from([Audience::AllUsers])
/// );
/// ```
pub fn resolve_audience(
	current: &BTreeSet<Audience>,
	requested: &BTreeSet<Audience>,
) -> BTreeSet<Audience> {
	if requested.contains(&Audience::AllUsers) && requested.len() > 1 {
		if current.contains(&Audience::AllUsers) {
			requested
				.iter()
				.copied()
				.filter(|tag| *tag != Audience::AllUsers)
				.collect()
		} else {
			BTreeSet::from([Audience::AllUsers])
		}
	} else {
		requested.clone()
	}
}
