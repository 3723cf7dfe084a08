use std::fmt;

/// Sort direction of a single Solr sort clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `/select` request under construction: the main query, the ordered
/// filter queries, the field list, the pagination window, the sort
/// clauses and any extra engine parameters (edismax weights etc.).
#[derive(Debug, Clone)]
pub struct SelectQuery {
    query: String,
    filter_queries: Vec<String>,
    fields: Option<String>,
    start: usize,
    rows: usize,
    sorts: Vec<(String, SortOrder)>,
    params: Vec<(String, String)>,
}

impl SelectQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filter_queries: Vec::new(),
            fields: None,
            start: 0,
            rows: 10,
            sorts: Vec::new(),
            params: Vec::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn add_filter_query(&mut self, fq: impl Into<String>) -> &mut Self {
        self.filter_queries.push(fq.into());
        self
    }

    pub fn filter_queries(&self) -> &[String] {
        &self.filter_queries
    }

    pub fn set_fields(&mut self, fl: impl Into<String>) -> &mut Self {
        self.fields = Some(fl.into());
        self
    }

    pub fn set_start(&mut self, start: usize) -> &mut Self {
        self.start = start;
        self
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn set_rows(&mut self, rows: usize) -> &mut Self {
        self.rows = rows;
        self
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn add_sort(&mut self, field: impl Into<String>, order: SortOrder) -> &mut Self {
        self.sorts.push((field.into(), order));
        self
    }

    pub fn sorts(&self) -> &[(String, SortOrder)] {
        &self.sorts
    }

    /// Sets an arbitrary engine parameter (e.g. `defType`, `qf`, `ps`).
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// Renders the query as the `/select` endpoint's parameter list.
    /// Filter queries repeat the `fq` parameter; sort clauses join into
    /// a single comma-separated `sort` parameter.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("q".to_string(), self.query.clone())];
        for fq in &self.filter_queries {
            params.push(("fq".to_string(), fq.clone()));
        }
        if let Some(fl) = &self.fields {
            params.push(("fl".to_string(), fl.clone()));
        }
        params.push(("start".to_string(), self.start.to_string()));
        params.push(("rows".to_string(), self.rows.to_string()));
        if !self.sorts.is_empty() {
            let sort = self
                .sorts
                .iter()
                .map(|(field, order)| format!("{} {}", field, order))
                .collect::<Vec<_>>()
                .join(",");
            params.push(("sort".to_string(), sort));
        }
        for (name, value) in &self.params {
            params.push((name.clone(), value.clone()));
        }
        params.push(("wt".to_string(), "json".to_string()));
        params
    }
}
