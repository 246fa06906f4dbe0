//! Ordered rule storage for one client.

use crate::matcher::matches;
use crate::request::RequestDescriptor;
use crate::rule::MockRule;
use parking_lot::RwLock;

/// Rules in registration order. The first matching rule wins; a later rule
/// never overrides an earlier one for overlapping requests.
#[derive(Debug, Default)]
pub struct MockRegistry {
    rules: RwLock<Vec<MockRule>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule and return its index.
    pub fn add(&self, rule: MockRule) -> usize {
        let mut rules = self.rules.write();
        rules.push(rule);
        rules.len() - 1
    }

    /// Find the first rule that applies to `request`, with its index.
    pub fn find_match(&self, request: &RequestDescriptor) -> Option<(usize, MockRule)> {
        self.rules
            .read()
            .iter()
            .enumerate()
            .find(|(_, rule)| matches(rule, request))
            .map(|(index, rule)| (index, rule.clone()))
    }

    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }

    pub fn clear(&self) {
        self.rules.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::response::ResponseSpec;
    use serde_json::json;

    fn get(url: &str) -> RequestDescriptor {
        RequestDescriptor {
            url: url.to_string(),
            method: Method::Get,
            headers: Default::default(),
            data: None,
        }
    }

    #[test]
    fn test_empty_registry_has_no_match() {
        let registry = MockRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.find_match(&get("/api/data")).is_none());
    }

    #[test]
    fn test_first_registered_wins() {
        let registry = MockRegistry::new();
        assert_eq!(registry.add(MockRule::fixed("/api/data", ResponseSpec::ok(1))), 0);
        assert_eq!(registry.add(MockRule::fixed("/api/data", ResponseSpec::ok(2))), 1);

        let (index, _) = registry.find_match(&get("/api/data")).unwrap();
        assert_eq!(index, 0);
    }

    #[test]
    fn test_skips_non_matching_rules() {
        let registry = MockRegistry::new();
        registry.add(MockRule::fixed("/api/v1/data", ResponseSpec::ok(json!(1))));
        registry.add(
            MockRule::fixed("/api/v2/data", ResponseSpec::ok(json!(2))).method(Method::Post),
        );
        registry.add(MockRule::fixed("/api/v2/data", ResponseSpec::ok(json!(3))));

        let (index, rule) = registry.find_match(&get("/api/v2/data")).unwrap();
        assert_eq!(index, 2);
        assert_eq!(rule.url(), "/api/v2/data");
        assert_eq!(rule.method_filter(), None);
    }

    #[test]
    fn test_find_match_has_no_side_effects() {
        let registry = MockRegistry::new();
        registry.add(MockRule::fixed("/a", ResponseSpec::ok(1)));
        for _ in 0..3 {
            assert_eq!(registry.find_match(&get("/a")).map(|(i, _)| i), Some(0));
        }
        assert_eq!(registry.len(), 1);

        registry.clear();
        assert!(registry.find_match(&get("/a")).is_none());
    }
}
