/// Typed query vocabulary for document listings
///
/// The document store accepts only this closed set of filters; building
/// them as values (instead of accumulating untyped strings) keeps every
/// listing site checked at compile time.
use serde_json::json;

/// A single list-query clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// Equality filter on a named field
    Equal { attribute: String, value: String },
    /// Descending order by a named field
    OrderDesc { attribute: String },
    /// Maximum number of documents to return
    Limit(u32),
    /// Forward cursor: return documents after the one with this id
    CursorAfter(String),
    /// Full-text search on a named field
    Search { attribute: String, term: String },
}

impl Query {
    pub fn equal(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Query::Equal {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    pub fn order_desc(attribute: impl Into<String>) -> Self {
        Query::OrderDesc {
            attribute: attribute.into(),
        }
    }

    pub fn limit(limit: u32) -> Self {
        Query::Limit(limit)
    }

    pub fn cursor_after(document_id: impl Into<String>) -> Self {
        Query::CursorAfter(document_id.into())
    }

    pub fn search(attribute: impl Into<String>, term: impl Into<String>) -> Self {
        Query::Search {
            attribute: attribute.into(),
            term: term.into(),
        }
    }

    /// Encode the clause in the remote store's JSON query format.
    pub fn to_wire(&self) -> String {
        let value = match self {
            Query::Equal { attribute, value } => json!({
                "method": "equal",
                "attribute": attribute,
                "values": [value],
            }),
            Query::OrderDesc { attribute } => json!({
                "method": "orderDesc",
                "attribute": attribute,
            }),
            Query::Limit(limit) => json!({
                "method": "limit",
                "values": [limit],
            }),
            Query::CursorAfter(document_id) => json!({
                "method": "cursorAfter",
                "values": [document_id],
            }),
            Query::Search { attribute, term } => json!({
                "method": "search",
                "attribute": attribute,
                "values": [term],
            }),
        };
        value.to_string()
    }
}
