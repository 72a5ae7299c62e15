//
//  sourcecraft-cli
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! First-page list envelopes.
//!
//! SourceCraft wraps every list in an object whose array field name depends
//! on the resource (`repositories`, `pull_requests`, `items`, ...) next to an
//! optional `next_page_token`. Each resource declares its envelope and
//! implements [`Envelope`] so callers get a uniform [`Page`]. The token is
//! surfaced but never followed.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// One page of a list response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_page_token: Option<String>) -> Self {
        // An empty token means there is no further page.
        let next_page_token = next_page_token.filter(|t| !t.is_empty());
        Self {
            items,
            next_page_token,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next_page_token.is_some()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// A resource-specific list wrapper that can be flattened into a [`Page`].
pub trait Envelope: DeserializeOwned {
    type Item;

    fn into_page(self) -> Page<Self::Item>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Numbers {
        #[serde(default)]
        numbers: Vec<u32>,
        next_page_token: Option<String>,
    }

    impl Envelope for Numbers {
        type Item = u32;

        fn into_page(self) -> Page<u32> {
            Page::new(self.numbers, self.next_page_token)
        }
    }

    #[test]
    fn test_envelope_surfaces_token() {
        let env: Numbers =
            serde_json::from_str(r#"{"numbers":[1,2],"next_page_token":"abc"}"#).unwrap();
        let page = env.into_page();
        assert_eq!(page.items, vec![1, 2]);
        assert!(page.has_next());
        assert_eq!(page.next_page_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_empty_token_means_last_page() {
        let page = Page::new(vec![1u8], Some(String::new()));
        assert!(!page.has_next());
    }

    #[test]
    fn test_missing_list_is_empty() {
        let env: Numbers = serde_json::from_str("{}").unwrap();
        assert!(env.into_page().is_empty());
    }
}
