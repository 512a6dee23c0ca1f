//! Minimal SPARQL SELECT builder.
//!
//! User-supplied text only ever enters a query through [`SelectQuery::bind`],
//! which emits it as an escaped string literal inside a `VALUES` block.
//! IRIs are checked for characters that would break out of `<...>`.

use crate::utils::error::{AgrError, Result};

const QB: &str = "http://purl.org/linked-data/cube#";
const SDMX_DIMENSION: &str = "http://purl.org/linked-data/sdmx/2009/dimension#";
const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";

/// 將字串轉為安全的 SPARQL 字串常值 (含雙引號)
pub fn string_literal(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() + 2);
    escaped.push('"');
    for ch in input.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            _ => escaped.push(ch),
        }
    }
    escaped.push('"');
    escaped
}

pub fn iri(input: &str) -> Result<String> {
    let forbidden = |ch: char| {
        ch.is_whitespace() || matches!(ch, '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`')
    };

    if input.is_empty() || input.chars().any(forbidden) {
        return Err(AgrError::InvalidConfigValueError {
            field: "sparql.iri".to_string(),
            value: input.to_string(),
            reason: "IRI is empty or contains characters not allowed inside <...>".to_string(),
        });
    }

    Ok(format!("<{}>", input))
}

#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    prefixes: Vec<(String, String)>,
    variables: Vec<String>,
    bindings: Vec<(String, String)>,
    patterns: Vec<String>,
    filters: Vec<String>,
    order_by_desc: Option<String>,
    limit: Option<usize>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, name: &str, namespace: &str) -> Self {
        self.prefixes.push((name.to_string(), namespace.to_string()));
        self
    }

    pub fn variable(mut self, name: &str) -> Self {
        self.variables.push(name.to_string());
        self
    }

    /// `VALUES ?name { "value" }`
    pub fn bind(mut self, name: &str, value: &str) -> Self {
        self.bindings.push((name.to_string(), string_literal(value)));
        self
    }

    pub fn pattern(mut self, triple: impl Into<String>) -> Self {
        self.patterns.push(triple.into());
        self
    }

    pub fn filter(mut self, expression: impl Into<String>) -> Self {
        self.filters.push(expression.into());
        self
    }

    pub fn order_by_desc(mut self, name: &str) -> Self {
        self.order_by_desc = Some(name.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(&self) -> Result<String> {
        if self.variables.is_empty() {
            return Err(AgrError::ConfigValidationError {
                field: "sparql.select".to_string(),
                message: "SELECT needs at least one variable".to_string(),
            });
        }

        let mut lines = Vec::new();
        for (name, namespace) in &self.prefixes {
            lines.push(format!("PREFIX {}: {}", name, iri(namespace)?));
        }

        let projection: Vec<String> = self.variables.iter().map(|v| format!("?{}", v)).collect();
        lines.push(format!("SELECT {}", projection.join(" ")));
        lines.push("WHERE {".to_string());
        for (name, literal) in &self.bindings {
            lines.push(format!("  VALUES ?{} {{ {} }}", name, literal));
        }
        for pattern in &self.patterns {
            lines.push(format!("  {} .", pattern));
        }
        for filter in &self.filters {
            lines.push(format!("  FILTER({})", filter));
        }
        lines.push("}".to_string());

        if let Some(name) = &self.order_by_desc {
            lines.push(format!("ORDER BY DESC(?{})", name));
        }
        if let Some(limit) = self.limit {
            lines.push(format!("LIMIT {}", limit));
        }

        Ok(lines.join("\n"))
    }
}

/// Latest observation of `measure` in `dataset` whose area label contains `region`.
///
/// "Latest" is the greatest period label in string order. statistics.gov.scot
/// labels periods year-first (`2019`, `2019/2020`, `2021-Q1`), so this holds
/// across years; within one year the ordering between mixed label styles
/// (e.g. `2021` vs `2021-Q1`) is lexical, not chronological.
pub fn latest_observation_query(dataset: &str, measure: &str, region: &str) -> Result<String> {
    SelectQuery::new()
        .prefix("qb", QB)
        .prefix("sdmx", SDMX_DIMENSION)
        .prefix("rdfs", RDFS)
        .variable("areaname")
        .variable("period")
        .variable("value")
        .bind("needle", region)
        .pattern(format!("?obs qb:dataSet {}", iri(dataset)?))
        .pattern("?obs sdmx:refArea ?area")
        .pattern("?obs sdmx:refPeriod ?periodRef")
        .pattern(format!("?obs {} ?value", iri(measure)?))
        .pattern("?area rdfs:label ?areaname")
        .pattern("?periodRef rdfs:label ?period")
        .filter("CONTAINS(LCASE(STR(?areaname)), LCASE(?needle))")
        .order_by_desc("period")
        .limit(1)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATASET: &str = "http://statistics.gov.scot/data/vacant-and-derelict-land";
    const MEASURE: &str = "http://statistics.gov.scot/def/measure-properties/count";

    #[test]
    fn test_string_literal_escapes_quotes() {
        assert_eq!(string_literal("Edinburgh"), "\"Edinburgh\"");
        assert_eq!(string_literal("O'Neil"), "\"O\\'Neil\"");
        assert_eq!(string_literal("a\"b"), "\"a\\\"b\"");
        assert_eq!(string_literal("x\\y\n"), "\"x\\\\y\\n\"");
    }

    #[test]
    fn test_iri_rejects_breakout() {
        assert_eq!(iri(DATASET).unwrap(), format!("<{}>", DATASET));
        assert!(iri("http://x> } DROP ALL {").is_err());
        assert!(iri("").is_err());
    }

    #[test]
    fn test_latest_observation_query_shape() {
        let query = latest_observation_query(DATASET, MEASURE, "Edinburgh").unwrap();

        assert!(query.contains("SELECT ?areaname ?period ?value"));
        assert!(query.contains("VALUES ?needle { \"Edinburgh\" }"));
        assert!(query.contains(&format!("?obs qb:dataSet <{}> .", DATASET)));
        assert!(query.contains("FILTER(CONTAINS(LCASE(STR(?areaname)), LCASE(?needle)))"));
        assert!(query.ends_with("ORDER BY DESC(?period)\nLIMIT 1"));
    }

    #[test]
    fn test_region_cannot_inject() {
        let hostile = "x\" } } DELETE WHERE { ?s ?p ?o } #";
        let query = latest_observation_query(DATASET, MEASURE, hostile).unwrap();

        assert!(query.contains("VALUES ?needle { \"x\\\" } } DELETE WHERE { ?s ?p ?o } #\" }"));
        assert_eq!(query.matches("WHERE {\n").count(), 1);
    }

    #[test]
    fn test_latest_period_sorts_year_first_labels() {
        let query = latest_observation_query(DATASET, MEASURE, "Edinburgh").unwrap();
        assert!(query.contains("ORDER BY DESC(?period)"));

        let mut labels = vec!["2019", "2021-Q1", "2018/2019", "2020/2021"];
        labels.sort_by(|a, b| b.cmp(a));
        assert_eq!(labels[0], "2021-Q1");
        assert_eq!(labels[3], "2018/2019");
    }

    #[test]
    fn test_same_region_gives_same_text() {
        let a = latest_observation_query(DATASET, MEASURE, "Highlands").unwrap();
        let b = latest_observation_query(DATASET, MEASURE, "Highlands").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_select_without_variables_fails() {
        assert!(SelectQuery::new().pattern("?s ?p ?o").build().is_err());
    }
}
