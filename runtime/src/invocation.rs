//! Context handed to handlers.

use std::collections::BTreeMap;

use clap::ArgMatches;
use clap::parser::{MatchesError, ValueSource};
use command_tree_core::FlagKind;
use thiserror::Error;

/// Errors reading a flag value from an [`Invocation`].
#[derive(Debug, Error)]
pub enum FlagError {
    /// The command neither declares nor inherits the flag.
    #[error("command \"{path}\" has no flag \"{flag}\"")]
    Unknown { path: String, flag: String },

    /// The flag exists with a different type.
    #[error("flag \"{flag}\" is of type {declared}, not {requested}")]
    TypeMismatch {
        flag: String,
        declared: FlagKind,
        requested: FlagKind,
    },

    /// clap rejected the lookup.
    #[error("flag \"{flag}\": {source}")]
    Lookup {
        flag: String,
        #[source]
        source: MatchesError,
    },
}

/// The matched command, its flags and their parsed values.
///
/// Flags that were not given on the command line and carry no default read
/// as the zero value of their type.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    path: &'a str,
    flags: &'a BTreeMap<String, FlagKind>,
    matches: &'a ArgMatches,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(
        path: &'a str,
        flags: &'a BTreeMap<String, FlagKind>,
        matches: &'a ArgMatches,
    ) -> Self {
        Self {
            path,
            flags,
            matches,
        }
    }

    /// Space-separated command path, starting with the root name.
    pub fn path(&self) -> &str {
        self.path
    }

    /// Name of the matched command.
    pub fn command_name(&self) -> &str {
        self.path.rsplit(' ').next().unwrap_or(self.path)
    }

    /// Names of the flags visible on this command, inherited ones included.
    pub fn flag_names(&self) -> impl Iterator<Item = &str> {
        self.flags.keys().map(String::as_str)
    }

    pub fn get_string(&self, name: &str) -> Result<String, FlagError> {
        self.expect_kind(name, FlagKind::String)?;
        let value = self
            .matches
            .try_get_one::<String>(name)
            .map_err(|source| lookup(name, source))?;
        Ok(value.cloned().unwrap_or_default())
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, FlagError> {
        self.expect_kind(name, FlagKind::Bool)?;
        let value = self
            .matches
            .try_get_one::<bool>(name)
            .map_err(|source| lookup(name, source))?;
        Ok(value.copied().unwrap_or(false))
    }

    pub fn get_int(&self, name: &str) -> Result<i64, FlagError> {
        self.expect_kind(name, FlagKind::Int)?;
        let value = self
            .matches
            .try_get_one::<i64>(name)
            .map_err(|source| lookup(name, source))?;
        Ok(value.copied().unwrap_or(0))
    }

    pub fn get_string_slice(&self, name: &str) -> Result<Vec<String>, FlagError> {
        self.expect_kind(name, FlagKind::StringSlice)?;
        let values = self
            .matches
            .try_get_many::<String>(name)
            .map_err(|source| lookup(name, source))?;
        Ok(values.map(|v| v.cloned().collect()).unwrap_or_default())
    }

    /// Whether the flag was given explicitly on the command line.
    pub fn is_set(&self, name: &str) -> Result<bool, FlagError> {
        self.kind_of(name)?;
        Ok(self.matches.value_source(name) == Some(ValueSource::CommandLine))
    }

    fn kind_of(&self, name: &str) -> Result<FlagKind, FlagError> {
        self.flags
            .get(name)
            .copied()
            .ok_or_else(|| FlagError::Unknown {
                path: self.path.to_string(),
                flag: name.to_string(),
            })
    }

    fn expect_kind(&self, name: &str, requested: FlagKind) -> Result<(), FlagError> {
        let declared = self.kind_of(name)?;
        if declared != requested {
            return Err(FlagError::TypeMismatch {
                flag: name.to_string(),
                declared,
                requested,
            });
        }
        Ok(())
    }
}

fn lookup(flag: &str, source: MatchesError) -> FlagError {
    FlagError::Lookup {
        flag: flag.to_string(),
        source,
    }
}
