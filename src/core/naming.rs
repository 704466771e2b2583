//! Key file naming scheme.
//!
//! Derives canonical file names from (algorithm, label) pairs and back.
//! The unlabeled canonical file for an algorithm is `id_<algo>`; a labeled
//! key is `id_<algo>.<label>`. Labels compare case-insensitively and the
//! lowercased form is canonical everywhere (lookups, state keys, file names).

use std::fmt;
use std::str::FromStr;

use crate::core::constants::{DEFAULT_LABEL, KEY_FILE_PREFIX};
use crate::error::KeyError;

/// Supported key algorithms, in detection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, clap::ValueEnum)]
pub enum Algorithm {
    Ed25519,
    Rsa,
    Ecdsa,
    Dsa,
}

impl Algorithm {
    /// All supported algorithms, in the fixed probe order.
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Ed25519,
        Algorithm::Rsa,
        Algorithm::Ecdsa,
        Algorithm::Dsa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Ed25519 => "ed25519",
            Algorithm::Rsa => "rsa",
            Algorithm::Ecdsa => "ecdsa",
            Algorithm::Dsa => "dsa",
        }
    }

    /// File name of the unlabeled canonical key (`id_<algo>`).
    pub fn canonical_file_name(&self) -> String {
        format!("{}{}", KEY_FILE_PREFIX, self.as_str())
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ed25519" => Ok(Algorithm::Ed25519),
            "rsa" => Ok(Algorithm::Rsa),
            "ecdsa" => Ok(Algorithm::Ecdsa),
            "dsa" => Ok(Algorithm::Dsa),
            other => Err(KeyError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// Canonical (lowercased) form of a label.
pub fn canonical_label(label: &str) -> String {
    label.to_lowercase()
}

/// Derive the private-key file name for an (algorithm, label) pair.
///
/// The `default` label maps to the unlabeled canonical name.
pub fn file_name_for(algorithm: Algorithm, label: &str) -> String {
    let label = canonical_label(label);
    if label == DEFAULT_LABEL {
        algorithm.canonical_file_name()
    } else {
        format!("{}{}.{}", KEY_FILE_PREFIX, algorithm.as_str(), label)
    }
}

/// Parse a private-key file name back into (algorithm, label).
///
/// Returns `None` for names outside the scheme; `.pub` companions are
/// rejected here because their suffix contains a dot. The returned label is
/// canonical (lowercased); an unlabeled name yields `default`.
pub fn parse_file_name(name: &str) -> Option<(Algorithm, String)> {
    let rest = name.strip_prefix(KEY_FILE_PREFIX)?;
    let (algo, label) = match rest.split_once('.') {
        Some((algo, suffix)) => (algo, suffix),
        None => (rest, DEFAULT_LABEL),
    };

    if label.is_empty() || !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    let algorithm = algo.parse().ok()?;
    Some((algorithm, canonical_label(label)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_all_algorithms() {
        for algorithm in Algorithm::ALL {
            for label in ["default", "github", "work_1", "GitLab"] {
                let name = file_name_for(algorithm, label);
                let (parsed_algo, parsed_label) =
                    parse_file_name(&name).expect("generated name must parse");
                assert_eq!(parsed_algo, algorithm);
                assert_eq!(parsed_label, canonical_label(label));
            }
        }
    }

    #[test]
    fn default_label_maps_to_canonical_name() {
        assert_eq!(file_name_for(Algorithm::Ed25519, "default"), "id_ed25519");
        assert_eq!(file_name_for(Algorithm::Rsa, "DEFAULT"), "id_rsa");
    }

    #[test]
    fn labeled_name_carries_suffix() {
        assert_eq!(
            file_name_for(Algorithm::Ed25519, "github"),
            "id_ed25519.github"
        );
    }

    #[test]
    fn parse_rejects_foreign_names() {
        assert!(parse_file_name("known_hosts").is_none());
        assert!(parse_file_name("id_ed448").is_none());
        assert!(parse_file_name("id_ed25519.github.pub").is_none());
        assert!(parse_file_name("id_rsa.").is_none());
        assert!(parse_file_name("authorized_keys").is_none());
    }

    #[test]
    fn parse_unlabeled_yields_default() {
        assert_eq!(
            parse_file_name("id_rsa"),
            Some((Algorithm::Rsa, "default".to_string()))
        );
    }

    #[test]
    fn labels_are_case_insensitive() {
        assert_eq!(
            parse_file_name("id_ed25519.GitHub"),
            Some((Algorithm::Ed25519, "github".to_string()))
        );
    }
}
