//! Indexed field definitions.

use crate::error::Error;
use crate::record::Record;
use alloc::string::String;
use core::fmt;
use core::str::FromStr;

/// The text fields a repository keeps an ordered index for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Title,
    Artist,
    Genre,
    Region,
}

impl Field {
    /// All indexed fields, in index slot order.
    pub const ALL: [Field; 4] = [Field::Title, Field::Artist, Field::Genre, Field::Region];

    /// Slot of this field's index in a per-field index array.
    #[inline]
    pub fn position(self) -> usize {
        match self {
            Field::Title => 0,
            Field::Artist => 1,
            Field::Genre => 2,
            Field::Region => 3,
        }
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Artist => "artist",
            Field::Genre => "genre",
            Field::Region => "region",
        }
    }

    /// Returns the raw (non-normalized) value of this field on a record.
    pub fn value_of(self, record: &Record) -> &str {
        match self {
            Field::Title => record.title(),
            Field::Artist => record.artist(),
            Field::Genre => record.genre(),
            Field::Region => record.region(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = Error;

    /// Accepts English names and the Spanish spellings used by older catalogs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match crate::text::normalize(s).as_str() {
            "title" | "titulo" | "título" => Ok(Field::Title),
            "artist" | "artista" => Ok(Field::Artist),
            "genre" | "genero" | "género" => Ok(Field::Genre),
            "region" | "región" => Ok(Field::Region),
            _ => Err(Error::malformed_input("field", String::from(s))),
        }
    }
}
