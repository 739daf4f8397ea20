//! Round records: standard boards and the final round
//!
//! A standard round is a grid of categories, each holding clues ordered by
//! ascending value tier. The final round holds exactly one category and one
//! clue. Both are built from the rows of a round table file.

use heck::ToTitleCase;
use itertools::Itertools;

use super::clue::{Clue, ClueKey};
use crate::{
    config::Options,
    constants::{
        final_round::{DEFAULT_CATEGORY, DEFAULT_QUESTION},
        game::{DOUBLE_ROUND_NAME, FINAL_ROUND_NAME},
    },
};

/// A category column on a standard board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category title shown above the column
    pub name: String,
    /// Clues by row tier; `None` where the tier has no clue
    pub clues: Vec<Option<Clue>>,
}

/// A standard round: categories of clues addressed by [`ClueKey`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StandardRound {
    categories: Vec<Category>,
}

impl StandardRound {
    /// Creates a round from its category columns
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Builds a round from a table: a header of category names followed by
    /// one row per value tier
    ///
    /// Missing cells in short rows are treated as empty, cells beyond the
    /// header are ignored and trailing empty tiers are dropped.
    pub fn from_rows(header: &[String], rows: &[Vec<String>]) -> Self {
        let categories = header
            .iter()
            .enumerate()
            .map(|(column, name)| {
                let mut clues = rows
                    .iter()
                    .map(|row| row.get(column).and_then(|cell| Clue::parse_cell(cell)))
                    .collect_vec();
                while matches!(clues.last(), Some(None)) {
                    clues.pop();
                }
                Category {
                    name: name.trim().to_owned(),
                    clues,
                }
            })
            .collect_vec();

        Self { categories }
    }

    /// Returns the category columns
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Returns the number of value tiers shown on the board
    pub fn row_count(&self) -> usize {
        self.categories
            .iter()
            .map(|category| category.clues.len())
            .max()
            .unwrap_or_default()
    }

    /// Returns the clue at `key`, if there is one
    pub fn clue(&self, key: ClueKey) -> Option<&Clue> {
        self.categories
            .get(key.category)?
            .clues
            .get(key.row)?
            .as_ref()
    }

    /// Iterates over the keys of every clue in the round
    pub fn keys(&self) -> impl Iterator<Item = ClueKey> + '_ {
        self.categories
            .iter()
            .enumerate()
            .flat_map(|(category, column)| {
                column
                    .clues
                    .iter()
                    .enumerate()
                    .filter(|(_, clue)| clue.is_some())
                    .map(move |(row, _)| ClueKey::new(category, row))
            })
    }

    /// Returns the number of clues in the round
    pub fn total_clues(&self) -> usize {
        self.categories
            .iter()
            .map(|category| category.clues.iter().flatten().count())
            .sum()
    }
}

/// The final round: a single category and clue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalRound {
    /// The sole category name
    pub category: String,
    /// The sole clue
    pub clue: Clue,
}

impl FinalRound {
    /// Builds the final round from a two-row table: category, then question
    ///
    /// Missing or empty rows fall back to default texts.
    pub fn from_rows(rows: &[Vec<String>]) -> Self {
        let first_cell = |index: usize| {
            rows.get(index)
                .and_then(|row| row.first())
                .map(|cell| cell.trim())
                .filter(|cell| !cell.is_empty())
        };

        Self {
            category: first_cell(0).unwrap_or(DEFAULT_CATEGORY).to_owned(),
            clue: first_cell(1)
                .and_then(Clue::parse_cell)
                .unwrap_or_else(|| Clue::new(DEFAULT_QUESTION)),
        }
    }
}

/// The clue catalog of one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundRecord {
    /// A board of categories and clues
    Standard(StandardRound),
    /// The single-clue final round
    Final(FinalRound),
}

impl RoundRecord {
    /// Returns the number of clues in the round
    pub fn total_clues(&self) -> usize {
        match self {
            Self::Standard(round) => round.total_clues(),
            Self::Final(_) => 1,
        }
    }
}

/// A named round as listed in the game manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    /// Manifest name, also the name of the round's media folder
    pub name: String,
    /// The round's clues
    pub record: RoundRecord,
}

impl Round {
    /// Whether a round with this name is the final round
    pub fn is_final_name(name: &str) -> bool {
        name.eq_ignore_ascii_case(FINAL_ROUND_NAME)
    }

    /// Whether this round's values are multiplied
    pub fn is_double(&self) -> bool {
        self.name.eq_ignore_ascii_case(DOUBLE_ROUND_NAME)
    }

    /// Returns the round name for display, e.g. `double` becomes `Double`
    pub fn display_name(&self) -> String {
        self.name.to_title_case()
    }

    /// Returns the value of a clue in `row` of this round
    pub fn value(&self, row: usize, options: &Options) -> u64 {
        let multiplier = if self.is_double() {
            options.double_multiplier
        } else {
            1
        };
        (row as u64 + 1) * options.base_value * multiplier
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|&cell| cell.to_owned()).collect()
    }

    fn sample_round() -> StandardRound {
        StandardRound::from_rows(
            &strings(&["Science", "History", "Art"]),
            &[
                strings(&["s1", "h1", "a1"]),
                strings(&["s2", "", "a2"]),
                strings(&["s3", "h3"]),
                strings(&["", "", ""]),
            ],
        )
    }

    #[test]
    fn test_from_rows_builds_columns() {
        let round = sample_round();
        let names = round.categories().iter().map(|c| c.name.as_str()).collect_vec();
        assert_eq!(names, ["Science", "History", "Art"]);
        assert_eq!(round.row_count(), 3);
        assert_eq!(round.total_clues(), 7);
    }

    #[test]
    fn test_empty_cells_are_not_clues() {
        let round = sample_round();
        assert!(round.clue(ClueKey::new(1, 1)).is_none());
        assert!(round.clue(ClueKey::new(2, 2)).is_none());
        assert_eq!(round.clue(ClueKey::new(1, 2)).unwrap().raw_text(), "h3");
        assert!(round.clue(ClueKey::new(5, 0)).is_none());
        assert!(round.clue(ClueKey::new(0, 9)).is_none());
    }

    #[test]
    fn test_keys_match_total() {
        let round = sample_round();
        let keys = round.keys().collect_vec();
        assert_eq!(keys.len(), round.total_clues());
        assert!(keys.contains(&ClueKey::new(1, 2)));
        assert!(!keys.contains(&ClueKey::new(1, 1)));
    }

    #[test]
    fn test_extra_cells_ignored() {
        let round = StandardRound::from_rows(&strings(&["Only"]), &[strings(&["a", "b", "c"])]);
        assert_eq!(round.total_clues(), 1);
    }

    #[test]
    fn test_empty_table() {
        let round = StandardRound::from_rows(&[], &[]);
        assert_eq!(round.total_clues(), 0);
        assert_eq!(round.row_count(), 0);
    }

    #[test]
    fn test_final_round_from_rows() {
        let round = FinalRound::from_rows(&[strings(&["Rivers"]), strings(&["Longest river?"])]);
        assert_eq!(round.category, "Rivers");
        assert_eq!(round.clue.raw_text(), "Longest river?");
    }

    #[test]
    fn test_final_round_defaults() {
        let round = FinalRound::from_rows(&[]);
        assert_eq!(round.category, DEFAULT_CATEGORY);
        assert_eq!(round.clue.raw_text(), DEFAULT_QUESTION);

        let round = FinalRound::from_rows(&[strings(&[""]), strings(&["  "])]);
        assert_eq!(round.category, DEFAULT_CATEGORY);
        assert_eq!(round.clue.raw_text(), DEFAULT_QUESTION);
    }

    #[test]
    fn test_round_values() {
        let options = Options::default();
        let first = Round {
            name: "jeopardy".to_owned(),
            record: RoundRecord::Standard(StandardRound::default()),
        };
        let double = Round {
            name: "Double".to_owned(),
            record: RoundRecord::Standard(StandardRound::default()),
        };

        assert_eq!(first.value(0, &options), 200);
        assert_eq!(first.value(4, &options), 1000);
        assert_eq!(double.value(0, &options), 400);
        assert_eq!(double.value(4, &options), 2000);
    }

    #[test]
    fn test_round_names() {
        assert!(Round::is_final_name("FINAL"));
        assert!(!Round::is_final_name("finale"));

        let round = Round {
            name: "double".to_owned(),
            record: RoundRecord::Standard(StandardRound::default()),
        };
        assert!(round.is_double());
        assert_eq!(round.display_name(), "Double");
    }

    #[test]
    fn test_record_total_clues() {
        let round = RoundRecord::Final(FinalRound::from_rows(&[]));
        assert_eq!(round.total_clues(), 1);
        assert_eq!(RoundRecord::Standard(sample_round()).total_clues(), 7);
    }
}
