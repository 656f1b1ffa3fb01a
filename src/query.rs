// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query handle.
//!
//! A `Query` is immutable once parsed. Its display string for the searched
//! field is what gets echoed to the user and written into the report header,
//! and its first whitespace-delimited token is the query ID in the run file.

use crate::error::{Error, Result};

/// A parsed query against one default field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    field: String,
    terms: Vec<String>,
    /// First token of the display string, computed once at parse time.
    id_token: String,
}

impl Query {
    /// Parse a line of query text against `field`.
    ///
    /// Text is lowercased and split on anything that is not alphanumeric, so
    /// `"Cats, Dogs!"` becomes the terms `["cats", "dogs"]`.
    pub fn parse(text: &str, field: &str) -> Result<Self> {
        let terms = tokenize(text);
        if terms.is_empty() {
            return Err(Error::Query(format!("no searchable terms in {:?}", text)));
        }
        let id_token = leading_token(&terms.join(" ")).to_string();
        Ok(Query {
            field: field.to_string(),
            terms,
            id_token,
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Display string for the query's own field: the normalized terms,
    /// space separated.
    pub fn primary_display(&self) -> String {
        self.terms.join(" ")
    }

    /// Query ID used in run lines and the `<num>` header.
    pub fn id_token(&self) -> &str {
        &self.id_token
    }
}

/// First whitespace-delimited token of `display`, or "" if there is none.
fn leading_token(display: &str) -> &str {
    display.split_whitespace().next().unwrap_or("")
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_terms() {
        let q = Query::parse("  Cats, DOGS!  ", "contents").unwrap();
        assert_eq!(q.terms(), &["cats".to_string(), "dogs".to_string()]);
        assert_eq!(q.primary_display(), "cats dogs");
    }

    #[test]
    fn test_id_token_is_first_display_token() {
        let q = Query::parse("301 international organized crime", "contents").unwrap();
        assert_eq!(q.id_token(), "301");
        assert_eq!(q.id_token(), leading_token(&q.primary_display()));
    }

    #[test]
    fn test_single_term_query_token_is_whole_query() {
        let q = Query::parse("cats", "contents").unwrap();
        assert_eq!(q.id_token(), "cats");
    }

    #[test]
    fn test_field_is_kept() {
        let q = Query::parse("cats dogs", "title").unwrap();
        assert_eq!(q.field(), "title");
    }

    #[test]
    fn test_punctuation_only_is_an_error() {
        assert!(matches!(Query::parse("?!", "contents"), Err(Error::Query(_))));
    }

    #[test]
    fn test_leading_token_of_empty() {
        assert_eq!(leading_token(""), "");
        assert_eq!(leading_token("  a b"), "a");
    }
}
