//! Ordered flag values for a single verb

use super::Verb;
use crate::error::{KubectlError, Result};

/// Flags set on a command, in the order they were first set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSet {
    verb: Verb,
    values: Vec<(&'static str, String)>,
}

impl FlagSet {
    pub fn new(verb: Verb) -> Self {
        Self {
            verb,
            values: Vec::new(),
        }
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Set a flag, replacing an earlier value for the same name
    ///
    /// Fails for names the verb does not define.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let known = self
            .verb
            .known_flags()
            .iter()
            .copied()
            .find(|known| *known == name)
            .ok_or_else(|| KubectlError::UnknownFlag {
                verb: self.verb,
                flag: name.to_string(),
            })?;

        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| *n == known) {
            Some((_, existing)) => *existing = value,
            None => self.values.push((known, value)),
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(n, v)| (*n, v.as_str()))
    }

    /// `--name=value` arguments
    pub fn to_args(&self) -> Vec<String> {
        self.iter()
            .map(|(name, value)| format!("--{}={}", name, value))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_keeps_first_position() {
        let mut flags = FlagSet::new(Verb::Apply);
        flags.set("recursive", "true").unwrap();
        flags.set("filename", "a.yaml").unwrap();
        flags.set("recursive", "false").unwrap();

        assert_eq!(
            flags.to_args(),
            vec!["--recursive=false", "--filename=a.yaml"]
        );
        assert_eq!(flags.len(), 2);
    }

    #[test]
    fn test_unknown_flag_rejected() {
        let mut flags = FlagSet::new(Verb::Delete);
        let err = flags.set("server-side", "true").unwrap_err();

        assert!(matches!(
            err,
            KubectlError::UnknownFlag { verb: Verb::Delete, ref flag } if flag == "server-side"
        ));
        assert!(flags.is_empty());
    }

    #[test]
    fn test_get_and_contains() {
        let mut flags = FlagSet::new(Verb::Delete);
        flags.set("kustomize", "/tmp/overlay").unwrap();

        assert_eq!(flags.get("kustomize"), Some("/tmp/overlay"));
        assert!(!flags.contains("filename"));
    }
}
