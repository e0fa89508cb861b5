//! CLI argument definitions using clap
//!
//! Commands:
//! - mediadex add <title> [--artist ..] [--genre ..] [--region ..] [--year ..]
//! - mediadex remove <id>
//! - mediadex search <value> [--field ..] [--prefix] [--hash]
//! - mediadex list [--via ordered|hash]
//! - mediadex dump
//! - mediadex compare <title>
//! - mediadex count

use clap::{Parser, Subcommand, ValueEnum};
use mediadex_core::{Field, RecordId};
use mediadex_index::DEFAULT_ORDER;
use mediadex_storage::IndexKind;
use std::path::PathBuf;

/// mediadex - a media catalog with B+Tree and hash indexes
#[derive(Parser, Debug)]
#[command(name = "mediadex")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON catalog snapshot
    #[arg(long, global = true, env = "MEDIADEX_DATA", default_value = "mediadex.json")]
    pub data: PathBuf,

    /// Maximum number of keys per B+Tree node
    #[arg(long, global = true, env = "MEDIADEX_ORDER", default_value_t = DEFAULT_ORDER)]
    pub order: usize,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a record to the catalog
    Add {
        /// Title of the record
        title: String,

        #[arg(long, default_value = "")]
        artist: String,

        #[arg(long, default_value = "")]
        genre: String,

        #[arg(long, default_value = "")]
        region: String,

        /// Release year; an unparsable value is ignored
        #[arg(long)]
        year: Option<String>,
    },

    /// Remove a record by id
    Remove {
        id: RecordId,
    },

    /// Search one field by exact value or prefix
    Search {
        /// Value or prefix to look for
        value: String,

        /// Field to search (title, artist, genre, region)
        #[arg(long, default_value = "title")]
        field: Field,

        /// Match every value starting with the given text
        #[arg(long)]
        prefix: bool,

        /// Use the title hash index instead of the B+Tree
        #[arg(long)]
        hash: bool,
    },

    /// List every record ordered by title
    List {
        /// Index that produces the ordering
        #[arg(long, value_enum, default_value_t = Via::Ordered)]
        via: Via,
    },

    /// Print the level layout of every B+Tree index
    Dump,

    /// Time an exact title lookup on both title indexes
    Compare {
        title: String,

        /// Lookups per index
        #[arg(long, default_value_t = 1000)]
        iterations: usize,
    },

    /// Print record and index counts
    Count,
}

/// Index choice for `list`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Via {
    Ordered,
    Hash,
}

impl From<Via> for IndexKind {
    fn from(via: Via) -> Self {
        match via {
            Via::Ordered => IndexKind::Ordered,
            Via::Hash => IndexKind::Hash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "mediadex", "--data", "x.json", "add", "Apple", "--artist", "Ann", "--year", "1999",
        ])
        .unwrap();

        assert_eq!(cli.data, PathBuf::from("x.json"));
        match cli.command {
            Command::Add {
                title,
                artist,
                genre,
                year,
                ..
            } => {
                assert_eq!(title, "Apple");
                assert_eq!(artist, "Ann");
                assert_eq!(genre, "");
                assert_eq!(year.as_deref(), Some("1999"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_accepts_spanish_field() {
        let cli = Cli::try_parse_from(["mediadex", "search", "Ro", "--field", "genero", "--prefix"]).unwrap();
        match cli.command {
            Command::Search {
                field, prefix, hash, ..
            } => {
                assert_eq!(field, Field::Genre);
                assert!(prefix);
                assert!(!hash);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_field() {
        assert!(Cli::try_parse_from(["mediadex", "search", "x", "--field", "tempo"]).is_err());
    }

    #[test]
    fn test_parse_list_via() {
        let cli = Cli::try_parse_from(["mediadex", "list", "--via", "hash"]).unwrap();
        assert!(matches!(cli.command, Command::List { via: Via::Hash }));
        assert_eq!(IndexKind::from(Via::Hash), IndexKind::Hash);
    }

    #[test]
    fn test_global_order_after_subcommand() {
        let cli = Cli::try_parse_from(["mediadex", "dump", "--order", "3"]).unwrap();
        assert_eq!(cli.order, 3);
    }
}
