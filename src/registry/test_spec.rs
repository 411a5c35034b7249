use std::collections::BTreeSet;
use std::time::Duration;

use regex::Regex;

use crate::constants::DEFAULT_TEST_TAG;
use crate::ClusterSpec;
use crate::RegistryError;
use crate::Result;

/// A test declaration: who owns it and which cluster it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct TestSpec {
    pub name: String,
    pub owner: String,
    pub cluster: ClusterSpec,
    pub tags: BTreeSet<String>,
    pub timeout: Option<Duration>,
    /// Reason the test is skipped, if it is
    pub skip: Option<String>,
}

impl TestSpec {
    pub fn new(
        name: impl Into<String>,
        owner: impl Into<String>,
        cluster: ClusterSpec,
    ) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            cluster,
            tags: BTreeSet::from([DEFAULT_TEST_TAG.to_string()]),
            timeout: None,
            skip: None,
        }
    }

    /// Replaces the default tag set
    pub fn tags<I, S>(
        mut self,
        tags: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn timeout(
        mut self,
        timeout: Duration,
    ) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn skip(
        mut self,
        reason: impl Into<String>,
    ) -> Self {
        self.skip = Some(reason.into());
        self
    }

    pub(crate) fn validate(&self) -> std::result::Result<(), RegistryError> {
        if self.name.trim().is_empty() {
            return Err(RegistryError::EmptyTestName);
        }
        if self.owner.trim().is_empty() {
            return Err(RegistryError::MissingOwner(self.name.clone()));
        }
        Ok(())
    }
}

/// Selects registered tests by name pattern and tags.
#[derive(Debug, Clone)]
pub struct TestFilter {
    name: Option<Regex>,
    tags: BTreeSet<String>,
    include_skipped: bool,
}

impl TestFilter {
    /// # Errors
    /// `RegistryError::InvalidFilter` if `pattern` is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self> {
        let name = Regex::new(pattern).map_err(|e| RegistryError::InvalidFilter {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            name: Some(name),
            tags: BTreeSet::new(),
            include_skipped: false,
        })
    }

    /// Matches every test that is not skipped.
    pub fn all() -> Self {
        Self {
            name: None,
            tags: BTreeSet::new(),
            include_skipped: false,
        }
    }

    /// Requires at least one of `tags` when non-empty
    pub fn with_tags<I, S>(
        mut self,
        tags: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn include_skipped(
        mut self,
        include: bool,
    ) -> Self {
        self.include_skipped = include;
        self
    }

    pub fn matches(
        &self,
        test: &TestSpec,
    ) -> bool {
        if test.skip.is_some() && !self.include_skipped {
            return false;
        }
        if !self.tags.is_empty() && self.tags.is_disjoint(&test.tags) {
            return false;
        }
        self.name.as_ref().map_or(true, |re| re.is_match(&test.name))
    }
}
