//! Per-method status allow-lists.
//!
//! A [`StatusPolicy`] maps request methods to the [`StatusSet`] of status codes
//! accepted for them. Methods without an entry are not checked at all.
//!
//! # Example
//!
//! ```
//! use tollgate_core::{Method, StatusCode, StatusPolicy};
//!
//! // Default table: GET accepts 200, 202 and 204
//! let policy = StatusPolicy::default();
//! assert!(policy.allows(&Method::Get, 204));
//! assert!(!policy.allows(&Method::Get, 201));
//!
//! // Custom policy derived from the defaults
//! let policy = StatusPolicy::default_builder()
//!     .allow(Method::Get, [StatusCode::OK, StatusCode::NOT_MODIFIED])
//!     .build();
//! assert!(policy.allows(&Method::Get, 304));
//! ```

use std::collections::{BTreeSet, HashMap};

use http::StatusCode;

use crate::{Error, Method, Response, Result, StatusError};

// ============================================================================
// Status Set
// ============================================================================

/// Set of status codes accepted for a method.
///
/// Membership is exact: there is no range matching such as "any 2xx".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSet {
    codes: BTreeSet<u16>,
}

impl StatusSet {
    /// Returns `true` if `status` is in the set.
    #[must_use]
    pub fn contains(&self, status: u16) -> bool {
        self.codes.contains(&status)
    }

    /// Returns `true` if the set is empty (every status is rejected).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.codes.iter().copied()
    }
}

impl<T: Into<u16>> FromIterator<T> for StatusSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<T: Into<u16>, const N: usize> From<[T; N]> for StatusSet {
    fn from(codes: [T; N]) -> Self {
        codes.into_iter().collect()
    }
}

// ============================================================================
// Status Policy
// ============================================================================

/// Immutable mapping from request method to accepted status codes.
///
/// Build one with [`StatusPolicy::default`], [`StatusPolicy::builder`] or
/// [`StatusPolicy::default_builder`]; it cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPolicy {
    rules: HashMap<Method, StatusSet>,
}

impl Default for StatusPolicy {
    /// Conventional success codes for every standard method except `OPTIONS`.
    fn default() -> Self {
        let read = || {
            StatusSet::from([StatusCode::OK, StatusCode::ACCEPTED, StatusCode::NO_CONTENT])
        };
        let write = || {
            StatusSet::from([
                StatusCode::OK,
                StatusCode::CREATED,
                StatusCode::ACCEPTED,
                StatusCode::NO_CONTENT,
            ])
        };

        let rules = HashMap::from([
            (Method::Get, read()),
            (
                Method::Head,
                StatusSet::from([StatusCode::OK, StatusCode::NO_CONTENT]),
            ),
            (Method::Post, write()),
            (Method::Put, write()),
            (Method::Patch, write()),
            (Method::Delete, read()),
            (Method::Connect, read()),
            (Method::Trace, read()),
        ]);

        Self { rules }
    }
}

impl StatusPolicy {
    /// Builder starting from an empty policy (nothing is checked).
    #[must_use]
    pub fn builder() -> StatusPolicyBuilder {
        StatusPolicyBuilder::default()
    }

    /// Builder starting from the default table.
    #[must_use]
    pub fn default_builder() -> StatusPolicyBuilder {
        StatusPolicyBuilder {
            rules: Self::default().rules,
        }
    }

    /// Accepted codes for `method`, or `None` when the method is unchecked.
    #[must_use]
    pub fn allowed(&self, method: &Method) -> Option<&StatusSet> {
        self.rules.get(method)
    }

    /// Returns `true` if `method` has an entry in this policy.
    #[must_use]
    pub fn covers(&self, method: &Method) -> bool {
        self.rules.contains_key(method)
    }

    /// Returns `true` if `status` is acceptable for `method`.
    ///
    /// Unchecked methods accept every status.
    #[must_use]
    pub fn allows(&self, method: &Method, status: u16) -> bool {
        self.allowed(method).is_none_or(|set| set.contains(status))
    }

    /// Methods with an entry, in no particular order.
    pub fn methods(&self) -> impl Iterator<Item = &Method> {
        self.rules.keys()
    }

    /// Validate the outcome of an exchange made with `method`.
    ///
    /// - unchecked method: `result` is returned as is
    /// - transport failure: wrapped in [`Error::Transport`]
    /// - allowed status: the response is returned unchanged
    /// - any other status: [`Error::Status`] holding the response
    pub fn verify(
        &self,
        method: &Method,
        result: Result<Response>,
    ) -> Result<Response> {
        let Some(allowed) = self.allowed(method) else {
            return result;
        };

        let response = result.map_err(Error::transport)?;
        if allowed.contains(response.status()) {
            Ok(response)
        } else {
            Err(StatusError::new(method.clone(), response).into())
        }
    }
}

/// Builder for [`StatusPolicy`].
#[derive(Debug, Clone, Default)]
pub struct StatusPolicyBuilder {
    rules: HashMap<Method, StatusSet>,
}

impl StatusPolicyBuilder {
    /// Set the accepted codes for `method`, replacing any previous entry.
    #[must_use]
    pub fn allow(mut self, method: Method, codes: impl Into<StatusSet>) -> Self {
        self.rules.insert(method, codes.into());
        self
    }

    /// Add codes to the entry for `method`, creating it if needed.
    #[must_use]
    pub fn extend(
        mut self,
        method: Method,
        codes: impl IntoIterator<Item = impl Into<u16>>,
    ) -> Self {
        self.rules
            .entry(method)
            .or_default()
            .codes
            .extend(codes.into_iter().map(Into::into));
        self
    }

    /// Remove the entry for `method` so it passes through unchecked.
    #[must_use]
    pub fn unchecked(mut self, method: &Method) -> Self {
        self.rules.remove(method);
        self
    }

    /// Build the policy.
    #[must_use]
    pub fn build(self) -> StatusPolicy {
        StatusPolicy { rules: self.rules }
    }
}
