//! Record structure for mediadex.
//!
//! A `Record` is one catalog entry. Its identifier is assigned by the record store
//! at creation time and never changes; the descriptive fields are fixed once the
//! record exists.

use crate::error::{Error, Result};
use alloc::string::{String, ToString};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Unique identifier for a record.
pub type RecordId = u64;

/// Descriptive fields of a record that has not been assigned an identifier yet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub year: Option<i32>,
}

impl NewRecord {
    /// Creates a new record description with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Sets the artist.
    pub fn artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    /// Sets the genre.
    pub fn genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = genre.into();
        self
    }

    /// Sets the region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Sets the year.
    pub fn year(mut self, year: Option<i32>) -> Self {
        self.year = year;
        self
    }
}

/// A catalog record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    title: String,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    genre: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    year: Option<i32>,
}

impl Record {
    /// Creates a record from an identifier and its descriptive fields.
    pub fn new(id: RecordId, fields: NewRecord) -> Self {
        let NewRecord {
            title,
            artist,
            genre,
            region,
            year,
        } = fields;
        Self {
            id,
            title,
            artist,
            genre,
            region,
            year,
        }
    }

    #[inline]
    pub fn id(&self) -> RecordId {
        self.id
    }

    #[inline]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[inline]
    pub fn artist(&self) -> &str {
        &self.artist
    }

    #[inline]
    pub fn genre(&self) -> &str {
        &self.genre
    }

    #[inline]
    pub fn region(&self) -> &str {
        &self.region
    }

    #[inline]
    pub fn year(&self) -> Option<i32> {
        self.year
    }
}

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        "-"
    } else {
        s
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} - {} | {} | {}",
            self.id,
            self.title,
            or_dash(&self.artist),
            or_dash(&self.genre),
            or_dash(&self.region)
        )?;
        if let Some(year) = self.year {
            write!(f, " | {}", year)?;
        }
        Ok(())
    }
}

/// Parses an optional year supplied as free text.
///
/// Blank input means "no year". Anything else must be an integer, otherwise
/// `Error::MalformedInput` is returned so the caller can drop just this field.
pub fn parse_year(raw: &str) -> Result<Option<i32>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i32>()
        .map(Some)
        .map_err(|_| Error::malformed_input("year", raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_record_new() {
        let record = Record::new(
            7,
            NewRecord::new("La Luz").artist("Juanes").genre("Pop Latino").region("CO").year(Some(2014)),
        );
        assert_eq!(record.id(), 7);
        assert_eq!(record.title(), "La Luz");
        assert_eq!(record.artist(), "Juanes");
        assert_eq!(record.genre(), "Pop Latino");
        assert_eq!(record.region(), "CO");
        assert_eq!(record.year(), Some(2014));
    }

    #[test]
    fn test_record_display() {
        let record = Record::new(1, NewRecord::new("Oye Mi Amor").artist("Mana").region("MX").year(Some(1992)));
        assert_eq!(record.to_string(), "[1] Oye Mi Amor - Mana | - | MX | 1992");

        let record = Record::new(2, NewRecord::new("Untitled"));
        assert_eq!(record.to_string(), "[2] Untitled - - | - | -");
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("1984"), Ok(Some(1984)));
        assert_eq!(parse_year("  2005 "), Ok(Some(2005)));
        assert_eq!(parse_year(""), Ok(None));
        assert_eq!(parse_year("   "), Ok(None));
        assert!(matches!(parse_year("19x4"), Err(Error::MalformedInput { .. })));
    }
}
