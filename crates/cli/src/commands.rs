//! Command execution.
//!
//! Every invocation loads the snapshot into a fresh repository, runs one
//! command against it and, for `add` and `remove`, writes the snapshot back.

use std::collections::BTreeSet;
use std::io::Write;

use mediadex_core::{parse_year, Field, NewRecord, Record, RecordId};
use mediadex_storage::{JsonFileStore, Repository, RepositoryConfig};
use tracing::warn;

use crate::args::{Cli, Command};
use crate::errors::CliError;
use crate::timing::{format_duration, mean_duration};

/// Runs the parsed command line, writing results to `out`.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<(), CliError> {
    let store = JsonFileStore::new(&cli.data);
    let mut repo = Repository::new(RepositoryConfig::with_order(cli.order))?;
    repo.load_from(&store)?;

    match cli.command {
        Command::Add {
            title,
            artist,
            genre,
            region,
            year,
        } => {
            let fields = NewRecord::new(title)
                .artist(artist)
                .genre(genre)
                .region(region)
                .year(year.as_deref().and_then(lenient_year));
            let record = repo.add(fields);
            repo.save_to(&store)?;
            writeln!(out, "Added {}", record)?;
        }
        Command::Remove { id } => {
            let record = repo.remove(id)?;
            repo.save_to(&store)?;
            writeln!(out, "Removed {}", record)?;
        }
        Command::Search {
            value,
            field,
            prefix,
            hash,
        } => {
            let results = search(&repo, field, &value, prefix, hash)?;
            print_records(out, &results)?;
        }
        Command::List { via } => {
            print_records(out, &repo.list_all_by_title(via.into()))?;
        }
        Command::Dump => {
            write!(out, "{}", repo.dump_index_levels())?;
        }
        Command::Compare { title, iterations } => {
            compare(&repo, &title, iterations, out)?;
        }
        Command::Count => {
            count(&repo, out)?;
        }
    }
    Ok(())
}

/// Parses a year, dropping it with a warning when malformed.
fn lenient_year(raw: &str) -> Option<i32> {
    match parse_year(raw) {
        Ok(year) => year,
        Err(e) => {
            warn!("{}; adding the record without a year", e);
            None
        }
    }
}

fn search<'a>(
    repo: &'a Repository,
    field: Field,
    value: &str,
    prefix: bool,
    hash: bool,
) -> Result<Vec<&'a Record>, CliError> {
    if hash && field != Field::Title {
        return Err(CliError::HashFieldUnsupported(field));
    }
    Ok(match (hash, prefix) {
        (true, true) => repo.search_prefix_title_hash(value),
        (true, false) => repo.search_exact_title_hash(value),
        (false, true) => repo.search_prefix(field, value),
        (false, false) => repo.search_exact(field, value),
    })
}

fn print_records(out: &mut impl Write, records: &[&Record]) -> Result<(), CliError> {
    if records.is_empty() {
        writeln!(out, "No records found.")?;
    }
    for record in records {
        writeln!(out, "{}", record)?;
    }
    Ok(())
}

fn compare(repo: &Repository, title: &str, iterations: usize, out: &mut impl Write) -> Result<(), CliError> {
    let ordered = mean_duration(iterations, || repo.search_exact(Field::Title, title));
    let hashed = mean_duration(iterations, || repo.search_exact_title_hash(title));

    let ordered_ids: BTreeSet<RecordId> = repo.search_exact(Field::Title, title).iter().map(|r| r.id()).collect();
    let hashed_ids: BTreeSet<RecordId> = repo.search_exact_title_hash(title).iter().map(|r| r.id()).collect();

    writeln!(
        out,
        "B+Tree: {} result(s), {} per lookup",
        ordered_ids.len(),
        format_duration(ordered)
    )?;
    writeln!(
        out,
        "Hash:   {} result(s), {} per lookup",
        hashed_ids.len(),
        format_duration(hashed)
    )?;
    if ordered_ids == hashed_ids {
        writeln!(out, "Result sets match.")?;
    } else {
        warn!(?ordered_ids, ?hashed_ids, "title indexes disagree");
        writeln!(out, "Result sets differ.")?;
    }
    Ok(())
}

fn count(repo: &Repository, out: &mut impl Write) -> Result<(), CliError> {
    writeln!(out, "records: {}", repo.len())?;
    writeln!(out, "next id: {}", repo.next_id())?;
    for field in Field::ALL {
        let index = repo.field_index(field);
        writeln!(
            out,
            "{} b+tree: {} keys, {} ids, height {}, {} splits",
            field,
            index.key_count(),
            index.len(),
            index.height(),
            index.stats().splits()
        )?;
    }
    let hash = repo.title_hash();
    writeln!(out, "title hash: {} buckets, {} ids", hash.bucket_count(), hash.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;

    fn exec(data: &Path, args: &[&str]) -> Result<String, CliError> {
        let data = data.to_string_lossy().into_owned();
        let mut argv = vec!["mediadex", "--data", data.as_str()];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();

        let mut out = Vec::new();
        run(cli, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn seed(data: &Path) {
        exec(data, &["add", "Apple", "--artist", "Ann", "--genre", "Pop"]).unwrap();
        exec(data, &["add", "Apricot", "--artist", "Bob"]).unwrap();
        exec(data, &["add", "Banana", "--year", "2001"]).unwrap();
    }

    #[test]
    fn test_add_persists_between_runs() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("catalog.json");

        let added = exec(&data, &["add", "Apple", "--artist", "Ann", "--year", "1999"]).unwrap();
        assert_eq!(added, "Added [1] Apple - Ann | - | - | 1999\n");

        let added = exec(&data, &["add", "Banana"]).unwrap();
        assert!(added.starts_with("Added [2] Banana"));

        assert_eq!(exec(&data, &["count"]).unwrap().lines().next(), Some("records: 2"));
    }

    #[test]
    fn test_add_with_malformed_year_drops_year() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("catalog.json");

        let added = exec(&data, &["add", "Kiwi", "--year", "soon"]).unwrap();
        assert_eq!(added, "Added [1] Kiwi - - | - | -\n");
    }

    #[test]
    fn test_search_variants() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("catalog.json");
        seed(&data);

        let hits = exec(&data, &["search", "ap", "--prefix"]).unwrap();
        assert_eq!(hits.lines().count(), 2);
        assert_eq!(exec(&data, &["search", "ap", "--prefix", "--hash"]).unwrap(), hits);

        let hits = exec(&data, &["search", "ANN", "--field", "artista"]).unwrap();
        assert!(hits.starts_with("[1] Apple"));

        assert_eq!(exec(&data, &["search", "cherry"]).unwrap(), "No records found.\n");
    }

    #[test]
    fn test_hash_search_rejects_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("catalog.json");

        let err = exec(&data, &["search", "x", "--field", "genre", "--hash"]).unwrap_err();
        assert!(matches!(err, CliError::HashFieldUnsupported(Field::Genre)));
    }

    #[test]
    fn test_remove_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("catalog.json");
        seed(&data);

        assert!(exec(&data, &["remove", "2"]).unwrap().starts_with("Removed [2] Apricot"));

        let ordered = exec(&data, &["list"]).unwrap();
        let titles: Vec<&str> = ordered
            .lines()
            .filter_map(|l| l.split(' ').nth(1))
            .collect();
        assert_eq!(titles, vec!["Apple", "Banana"]);
        assert_eq!(exec(&data, &["list", "--via", "hash"]).unwrap(), ordered);

        let err = exec(&data, &["remove", "2"]).unwrap_err();
        assert!(matches!(err, CliError::Core(mediadex_core::Error::NotFound { id: 2 })));
    }

    #[test]
    fn test_compare_reports_match() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("catalog.json");
        seed(&data);

        let report = exec(&data, &["compare", "apple", "--iterations", "5"]).unwrap();
        assert!(report.contains("B+Tree: 1 result(s)"));
        assert!(report.contains("Hash:   1 result(s)"));
        assert!(report.ends_with("Result sets match.\n"));
    }

    #[test]
    fn test_dump_and_count() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("catalog.json");
        seed(&data);

        let dump = exec(&data, &["--order", "3", "dump"]).unwrap();
        assert!(dump.contains("== title (order 3"));

        let counts = exec(&data, &["count"]).unwrap();
        assert!(counts.contains("next id: 4"));
        assert!(counts.contains("title hash: 3 buckets, 3 ids"));
    }

    #[test]
    fn test_invalid_order_fails() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("catalog.json");

        let err = exec(&data, &["--order", "2", "count"]).unwrap_err();
        assert!(matches!(err, CliError::Core(mediadex_core::Error::InvalidConfiguration { .. })));
    }
}
