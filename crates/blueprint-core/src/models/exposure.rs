use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Visibility tier of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exposure {
    Public,
    Unlisted,
    Private,
}

impl Exposure {
    pub const ALL: [Exposure; 3] = [Exposure::Public, Exposure::Unlisted, Exposure::Private];

    /// Stored representation in the `artifacts.exposure` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Exposure::Public => "public",
            Exposure::Unlisted => "unlisted",
            Exposure::Private => "private",
        }
    }

    /// Usage aggregates bucket `unlisted` together with `private`.
    pub fn counts_as_private(self) -> bool {
        !matches!(self, Exposure::Public)
    }
}

impl fmt::Display for Exposure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exposure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Exposure::Public),
            "unlisted" => Ok(Exposure::Unlisted),
            "private" => Ok(Exposure::Private),
            other => Err(format!("unknown exposure: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_stored_value() {
        for exposure in Exposure::ALL {
            assert_eq!(exposure.as_str().parse::<Exposure>().unwrap(), exposure);
        }
        assert!("hidden".parse::<Exposure>().is_err());
    }

    #[test]
    fn unlisted_shares_the_private_bucket() {
        assert!(!Exposure::Public.counts_as_private());
        assert!(Exposure::Unlisted.counts_as_private());
        assert!(Exposure::Private.counts_as_private());
    }
}
