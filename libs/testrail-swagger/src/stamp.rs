// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Integrity stamp for generated documents
//!
//! The generator prints two comment lines ahead of the document:
//!
//! ```text
//! # dynamically generated by generate-testrail-swagger on 2026-10-19
//! # checksum sha256:9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08
//! ```
//!
//! The digest covers every byte after the second line, i.e. exactly the
//! document text. It is lowercase hex. SHA-256 is the default; SHA-1 is
//! available to match checksums produced by the earlier Ruby generator,
//! whose checksum line has no algorithm prefix.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::document::Document;

/// Program name written into the first stamp line
pub const GENERATOR_NAME: &str = "generate-testrail-swagger";

const CHECKSUM_PREFIX: &str = "# checksum ";

/// Errors reading the stamp of a generated file
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StampError {
    #[error("missing generation comment on line 1")]
    MissingGeneratedLine,

    #[error("missing checksum comment on line 2")]
    MissingChecksumLine,

    #[error("unknown digest algorithm {0:?}")]
    UnknownAlgorithm(String),

    #[error("malformed {algorithm} digest {digest:?}")]
    MalformedDigest {
        algorithm: DigestAlgorithm,
        digest: String,
    },
}

/// Digest function used for the checksum line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    #[default]
    Sha256,
    Sha1,
}

impl DigestAlgorithm {
    pub fn name(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha256 => "sha256",
            DigestAlgorithm::Sha1 => "sha1",
        }
    }

    /// Number of hex characters in a digest
    pub fn hex_len(self) -> usize {
        match self {
            DigestAlgorithm::Sha256 => 64,
            DigestAlgorithm::Sha1 => 40,
        }
    }

    /// Lowercase hex digest of `bytes`.
    pub fn hex_digest(self, bytes: &[u8]) -> String {
        match self {
            DigestAlgorithm::Sha256 => format!("{:x}", Sha256::digest(bytes)),
            DigestAlgorithm::Sha1 => format!("{:x}", Sha1::digest(bytes)),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = StampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha256" => Ok(DigestAlgorithm::Sha256),
            "sha1" => Ok(DigestAlgorithm::Sha1),
            _ => Err(StampError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Generation date and content digest of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    date: NaiveDate,
    algorithm: DigestAlgorithm,
    digest: String,
}

impl Stamp {
    pub fn new(document: &Document, algorithm: DigestAlgorithm, date: NaiveDate) -> Self {
        Self {
            date,
            algorithm,
            digest: algorithm.hex_digest(document.as_bytes()),
        }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// The two comment lines, each newline-terminated.
    pub fn header(&self) -> String {
        format!(
            "# dynamically generated by {} on {}\n{}{}:{}\n",
            GENERATOR_NAME,
            self.date.format("%Y-%m-%d"),
            CHECKSUM_PREFIX,
            self.algorithm,
            self.digest
        )
    }

    /// Header followed by the document: the generator's complete output.
    pub fn apply(&self, document: &Document) -> String {
        let mut out = self.header();
        out.push_str(document.as_str());
        out
    }
}

/// Result of checking a generated file against its own stamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub algorithm: DigestAlgorithm,
    /// Digest recorded on the checksum line
    pub recorded: String,
    /// Digest of the document text as it is now
    pub computed: String,
}

impl Verification {
    pub fn is_match(&self) -> bool {
        self.recorded == self.computed
    }
}

/// Recompute the digest of a generated file and compare it with the
/// recorded one.
///
/// Accepts both `# checksum <algorithm>:<hex>` and the older
/// `# checksum <hex>` form, which is SHA-1.
pub fn verify(text: &str) -> Result<Verification, StampError> {
    let (generated, rest) = text.split_once('\n').ok_or(StampError::MissingGeneratedLine)?;
    if !generated.starts_with('#') {
        return Err(StampError::MissingGeneratedLine);
    }

    let (checksum, body) = rest.split_once('\n').ok_or(StampError::MissingChecksumLine)?;
    let recorded = checksum
        .strip_prefix(CHECKSUM_PREFIX)
        .ok_or(StampError::MissingChecksumLine)?
        .trim();

    let (algorithm, recorded) = match recorded.split_once(':') {
        Some((name, digest)) => (name.parse::<DigestAlgorithm>()?, digest),
        None => (DigestAlgorithm::Sha1, recorded),
    };

    if recorded.len() != algorithm.hex_len()
        || !recorded
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    {
        return Err(StampError::MalformedDigest {
            algorithm,
            digest: recorded.to_string(),
        });
    }

    Ok(Verification {
        algorithm,
        recorded: recorded.to_string(),
        computed: algorithm.hex_digest(body.as_bytes()),
    })
}
