//! Shared inputs for the per-file rules

use std::collections::BTreeSet;
use topo_store::{View, ViewVocabulary};

/// What every rule may consult besides the file itself
#[derive(Debug, Clone)]
pub struct ValidationContext<'a> {
    pub view: View,
    /// File name (with extension) of the file under check
    pub file_name: &'a str,
    pub vocabulary: &'a ViewVocabulary,
    /// Display names and `team_id`s of every team in the corpus
    pub known_teams: &'a BTreeSet<String>,
}

impl<'a> ValidationContext<'a> {
    #[must_use]
    pub fn new(
        view: View,
        file_name: &'a str,
        vocabulary: &'a ViewVocabulary,
        known_teams: &'a BTreeSet<String>,
    ) -> Self {
        Self {
            view,
            file_name,
            vocabulary,
            known_teams,
        }
    }

    /// Whether `team` names a team of the corpus, by display name or id
    #[inline]
    #[must_use]
    pub fn knows(&self, team: &str) -> bool {
        self.known_teams.contains(team)
    }

    /// File name without its extension
    #[must_use]
    pub fn file_stem(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map_or(self.file_name, |(stem, _)| stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_strips_extension() {
        let vocabulary = ViewVocabulary::default();
        let known = BTreeSet::new();
        let ctx = ValidationContext::new(View::Tt, "platform-a.md", &vocabulary, &known);
        assert_eq!(ctx.file_stem(), "platform-a");

        let ctx = ValidationContext::new(View::Tt, "noext", &vocabulary, &known);
        assert_eq!(ctx.file_stem(), "noext");
    }
}
