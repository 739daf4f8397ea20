//! Loading game folders into a round catalog
//!
//! A game folder holds a manifest (`order.csv`, one round file per line in
//! play order), one table file per round and one media folder per round.
//! Loading is permissive: only a missing manifest fails the load. Missing or
//! unreadable round files are skipped and malformed cells become plain text.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use itertools::Itertools;
use thiserror::Error;
use tracing::{info, warn};

use super::{
    media,
    round::{FinalRound, Round, RoundRecord, StandardRound},
};
use crate::constants::game::{MANIFEST_FILE, ROUND_EXTENSION};

/// Errors that can occur while loading games
#[derive(Error, Debug)]
pub enum Error {
    /// The game folder has no manifest
    #[error("missing manifest {}", .0.display())]
    MissingManifest(PathBuf),
    /// The manifest exists but could not be read
    #[error("failed to read manifest {}: {source}", .path.display())]
    Manifest {
        /// Location of the manifest
        path: PathBuf,
        /// Underlying read error
        #[source]
        source: csv::Error,
    },
    /// The directory to list games from does not exist
    #[error("games directory not found: {}", .0.display())]
    MissingGamesDirectory(PathBuf),
    /// Listing the games directory failed
    #[error("failed to list games: {0}")]
    Io(#[from] io::Error),
}

/// Ordered list of round names making up a game
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameManifest {
    rounds: Vec<String>,
}

impl GameManifest {
    /// Creates a manifest from round names in play order
    pub fn new(rounds: Vec<String>) -> Self {
        Self { rounds }
    }

    /// Parses manifest rows: the first cell of each row names a round file
    ///
    /// The `.csv` extension is stripped and blank rows are ignored.
    ///
    /// # Errors
    ///
    /// Returns the underlying `csv::Error` if a row cannot be read.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, csv::Error> {
        let rounds = table_reader()
            .from_reader(reader)
            .records()
            .map_ok(|record| {
                let entry = record.get(0).unwrap_or_default().trim();
                entry
                    .strip_suffix(&format!(".{ROUND_EXTENSION}"))
                    .unwrap_or(entry)
                    .to_owned()
            })
            .filter_ok(|name| !name.is_empty())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rounds })
    }

    /// Returns the round names in play order
    pub fn rounds(&self) -> &[String] {
        &self.rounds
    }
}

/// A loaded game: its manifest and the rounds that could be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameCatalog {
    folder: PathBuf,
    manifest: GameManifest,
    rounds: Vec<Round>,
}

impl GameCatalog {
    /// Creates a catalog from already loaded rounds
    pub fn new(folder: impl Into<PathBuf>, manifest: GameManifest, rounds: Vec<Round>) -> Self {
        Self {
            folder: folder.into(),
            manifest,
            rounds,
        }
    }

    /// Returns the game folder
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Returns the manifest as read from disk
    pub fn manifest(&self) -> &GameManifest {
        &self.manifest
    }

    /// Returns the playable rounds in manifest order
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Returns the playable round at `index`
    pub fn round(&self, index: usize) -> Option<&Round> {
        self.rounds.get(index)
    }

    /// Returns the number of playable rounds
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    /// Whether no round could be loaded
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Returns the playable rounds listed after the first final round
    ///
    /// A session ends with its final clue, so these rounds are never reached.
    pub fn rounds_after_final(&self) -> &[Round] {
        let last = self
            .rounds
            .iter()
            .position(|round| matches!(round.record, RoundRecord::Final(_)));
        match last {
            Some(index) => &self.rounds[index + 1..],
            None => &[],
        }
    }

    /// Returns the media folder of the playable round at `index`
    pub fn media_folder(&self, index: usize) -> Option<PathBuf> {
        self.round(index)
            .map(|round| media::round_folder(&self.folder, &round.name))
    }
}

/// A game folder available to play
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEntry {
    /// Folder name, shown as the game's title
    pub name: String,
    /// Location of the game folder
    pub path: PathBuf,
}

fn table_reader() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.has_headers(false).flexible(true);
    builder
}

/// Reads every row of a table file
///
/// # Errors
///
/// Returns the underlying `csv::Error` if the file cannot be opened or read.
pub fn read_table(path: &Path) -> Result<Vec<Vec<String>>, csv::Error> {
    table_reader()
        .from_path(path)?
        .records()
        .map_ok(|record| record.iter().map(str::to_owned).collect_vec())
        .collect()
}

/// Loads one round from its table file in `game_folder`
///
/// Returns `None` if the file is missing or unreadable.
pub fn load_round(game_folder: &Path, name: &str) -> Option<Round> {
    let path = game_folder.join(format!("{name}.{ROUND_EXTENSION}"));
    if !path.is_file() {
        warn!(round = name, path = %path.display(), "round file missing, skipping round");
        return None;
    }

    let rows = match read_table(&path) {
        Ok(rows) => rows,
        Err(e) => {
            warn!(round = name, error = %e, "round file unreadable, skipping round");
            return None;
        }
    };

    let record = if Round::is_final_name(name) {
        RoundRecord::Final(FinalRound::from_rows(&rows))
    } else {
        match rows.split_first() {
            Some((header, rows)) => RoundRecord::Standard(StandardRound::from_rows(header, rows)),
            None => RoundRecord::Standard(StandardRound::default()),
        }
    };

    Some(Round {
        name: name.to_owned(),
        record,
    })
}

/// Loads a game folder into a catalog of playable rounds
///
/// # Arguments
///
/// * `folder` - The game folder holding the manifest and round files
///
/// # Returns
///
/// The manifest as read and every round that could be loaded, in manifest
/// order. Rounds listed after the final round are kept but logged, since
/// play never reaches them.
///
/// # Errors
///
/// * [`Error::MissingManifest`] if the folder has no manifest
/// * [`Error::Manifest`] if the manifest cannot be read
pub fn load_game_catalog(folder: &Path) -> Result<GameCatalog, Error> {
    let manifest_path = folder.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        return Err(Error::MissingManifest(manifest_path));
    }

    let manifest = fs::File::open(&manifest_path)
        .map_err(csv::Error::from)
        .and_then(GameManifest::from_reader)
        .map_err(|source| Error::Manifest {
            path: manifest_path,
            source,
        })?;

    let rounds = manifest
        .rounds()
        .iter()
        .filter_map(|name| load_round(folder, name))
        .collect_vec();

    info!(
        folder = %folder.display(),
        listed = manifest.rounds().len(),
        loaded = rounds.len(),
        "game loaded"
    );

    let catalog = GameCatalog::new(folder, manifest, rounds);
    let unreachable = catalog.rounds_after_final();
    if !unreachable.is_empty() {
        warn!(
            rounds = ?unreachable.iter().map(|round| &round.name).collect_vec(),
            "rounds listed after the final round will not be played"
        );
    }

    Ok(catalog)
}

/// Lists the game folders inside `dir`, sorted by name
///
/// # Errors
///
/// * [`Error::MissingGamesDirectory`] if `dir` does not exist
/// * [`Error::Io`] if the directory cannot be read
pub fn list_games(dir: &Path) -> Result<Vec<GameEntry>, Error> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::MissingGamesDirectory(dir.to_owned()));
        }
        Err(e) => return Err(e.into()),
    };

    let mut games = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            games.push(GameEntry {
                name: name.to_owned(),
                path: path.clone(),
            });
        }
    }

    Ok(games.into_iter().sorted_by(|a, b| a.name.cmp(&b.name)).collect())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::board::clue::ClueKey;

    const BOARD: &str = "\
A,B,C,D,E,F
a1,b1,c1,d1,e1,f1
a2,b2,c2,d2,e2,f2
a3,b3,c3,d3,e3,f3
a4,b4,c4,d4,e4,f4
a5,b5,c5,d5,e5 [media:e5.png],\"{\"\"text\"\": \"\"f5\"\", \"\"media\"\": \"\"f5.mp3\"\"}\"
";

    const FINAL: &str = "Geography\nWhat is the longest river?\n";

    fn write_game(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        dir
    }

    #[test]
    fn test_manifest_strips_extension_and_blank_rows() {
        let manifest =
            GameManifest::from_reader("jeopardy.csv\n\ndouble.csv\nfinal\n".as_bytes()).unwrap();
        assert_eq!(manifest.rounds(), ["jeopardy", "double", "final"]);
    }

    #[test]
    fn test_load_full_game() {
        let dir = write_game(&[
            (MANIFEST_FILE, "jeopardy.csv\ndouble.csv\nfinal.csv\n"),
            ("jeopardy.csv", BOARD),
            ("double.csv", BOARD),
            ("final.csv", FINAL),
        ]);

        let catalog = load_game_catalog(dir.path()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.manifest().rounds().len(), 3);

        let RoundRecord::Standard(board) = &catalog.rounds()[0].record else {
            panic!("expected a standard round");
        };
        assert_eq!(board.total_clues(), 30);
        assert_eq!(board.categories()[0].name, "A");
        assert_eq!(
            board.clue(ClueKey::new(4, 4)).unwrap().presentation(),
            ("e5", Some("e5.png"))
        );
        assert_eq!(
            board.clue(ClueKey::new(5, 4)).unwrap().presentation(),
            ("f5", Some("f5.mp3"))
        );

        let RoundRecord::Final(last) = &catalog.rounds()[2].record else {
            panic!("expected the final round");
        };
        assert_eq!(last.category, "Geography");
        assert_eq!(last.clue.raw_text(), "What is the longest river?");
    }

    #[test]
    fn test_missing_round_file_is_skipped() {
        let dir = write_game(&[
            (MANIFEST_FILE, "jeopardy.csv\ndouble.csv\nfinal.csv\n"),
            ("jeopardy.csv", BOARD),
            ("final.csv", FINAL),
        ]);

        let catalog = load_game_catalog(dir.path()).unwrap();
        let names = catalog.rounds().iter().map(|r| r.name.as_str()).collect_vec();
        assert_eq!(names, ["jeopardy", "final"]);
        assert_eq!(catalog.manifest().rounds(), ["jeopardy", "double", "final"]);
    }

    #[test]
    fn test_missing_manifest_fails() {
        let dir = write_game(&[("jeopardy.csv", BOARD)]);
        let err = load_game_catalog(dir.path()).unwrap_err();
        assert!(matches!(err, Error::MissingManifest(path) if path.ends_with(MANIFEST_FILE)));
    }

    #[test]
    fn test_media_folder_is_named_after_round() {
        let dir = write_game(&[(MANIFEST_FILE, "jeopardy.csv\n"), ("jeopardy.csv", BOARD)]);
        let catalog = load_game_catalog(dir.path()).unwrap();
        assert_eq!(catalog.media_folder(0), Some(dir.path().join("jeopardy")));
        assert_eq!(catalog.media_folder(1), None);
    }

    #[test]
    fn test_empty_round_file() {
        let dir = write_game(&[(MANIFEST_FILE, "jeopardy.csv\n"), ("jeopardy.csv", "")]);
        let catalog = load_game_catalog(dir.path()).unwrap();
        assert_eq!(catalog.rounds()[0].record.total_clues(), 0);
    }

    #[test]
    fn test_rounds_after_final_are_loaded_but_unreachable() {
        let dir = write_game(&[
            (MANIFEST_FILE, "jeopardy.csv\nfinal.csv\ndouble.csv\n"),
            ("jeopardy.csv", BOARD),
            ("double.csv", BOARD),
            ("final.csv", FINAL),
        ]);

        let catalog = load_game_catalog(dir.path()).unwrap();
        assert_eq!(catalog.len(), 3);
        let names = catalog
            .rounds_after_final()
            .iter()
            .map(|r| r.name.as_str())
            .collect_vec();
        assert_eq!(names, ["double"]);
    }

    #[test]
    fn test_no_rounds_after_trailing_final() {
        let dir = write_game(&[
            (MANIFEST_FILE, "jeopardy.csv\nfinal.csv\n"),
            ("jeopardy.csv", BOARD),
            ("final.csv", FINAL),
        ]);
        let catalog = load_game_catalog(dir.path()).unwrap();
        assert!(catalog.rounds_after_final().is_empty());

        let empty = GameCatalog::new(dir.path(), GameManifest::default(), Vec::new());
        assert!(empty.is_empty());
        assert!(empty.rounds_after_final().is_empty());
    }

    #[test]
    fn test_list_games() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("trivia night")).unwrap();
        fs::create_dir(dir.path().join("birthday")).unwrap();
        fs::write(dir.path().join("stray.csv"), "").unwrap();

        let games = list_games(dir.path()).unwrap();
        let names = games.iter().map(|g| g.name.as_str()).collect_vec();
        assert_eq!(names, ["birthday", "trivia night"]);
        assert_eq!(games[0].path, dir.path().join("birthday"));
    }

    #[test]
    fn test_list_games_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            list_games(&missing),
            Err(Error::MissingGamesDirectory(path)) if path == missing
        ));
    }
}
