/// One backend filter predicate, tagged with the field prefix it
/// constrains so later operators can override it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause {
    prefix: String,
    query: String,
}

impl FilterClause {
    fn new(query: String) -> Self {
        let prefix = match query.find(':') {
            Some(idx) => query[..idx].to_string(),
            None => query.clone(),
        };
        Self { prefix, query }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Ordered collection of filter clauses with last-write-wins override
/// by field prefix. Insertion order is preserved; evicting a prefix
/// removes every clause tagged with it.
#[derive(Debug, Default)]
pub struct FilterSet {
    clauses: Vec<FilterClause>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, query: impl Into<String>) {
        self.clauses.push(FilterClause::new(query.into()));
    }

    pub fn evict(&mut self, prefix: &str) {
        self.clauses.retain(|clause| clause.prefix != prefix);
    }

    /// Evicts any clause sharing the new clause's prefix, then appends.
    pub fn replace(&mut self, query: impl Into<String>) {
        let clause = FilterClause::new(query.into());
        self.evict(&clause.prefix);
        self.clauses.push(clause);
    }

    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    pub fn into_queries(self) -> Vec<String> {
        self.clauses.into_iter().map(|c| c.query).collect()
    }
}
