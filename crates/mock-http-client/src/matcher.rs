//! Rule matching.
//!
//! A rule applies to a request when all three parts agree:
//! - URL: exact match against the base-stripped request path
//! - Method: equal when the rule sets one, otherwise any method
//! - Headers: every header the rule names is present with an equal value
//!
//! Header names are compared case-sensitively.

use crate::method::Method;
use crate::request::{Headers, RequestDescriptor};
use crate::rule::MockRule;

/// Check whether `rule` applies to `request`.
pub fn matches(rule: &MockRule, request: &RequestDescriptor) -> bool {
    rule.url() == request.url
        && method_matches(rule.method_filter(), request.method)
        && headers_match(rule.header_filter(), &request.headers)
}

#[inline]
fn method_matches(expected: Option<Method>, actual: Method) -> bool {
    expected.map_or(true, |method| method == actual)
}

/// Subset containment: extra request headers never prevent a match.
fn headers_match(expected: Option<&Headers>, actual: &Headers) -> bool {
    let Some(expected) = expected else {
        return true;
    };
    expected
        .iter()
        .all(|(name, value)| actual.get(name) == Some(value))
}
