//! Enumerator expanding one section into multiple dynamic URL branches.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

type ProducerFn = Arc<dyn Fn(&[String]) -> Vec<String> + Send + Sync>;
type EachFn = Arc<dyn Fn(&[String], &str) -> (String, String) + Send + Sync>;
type CompareFn = Arc<dyn Fn(&str, &str) -> Ordering + Send + Sync>;

#[derive(Clone, Default)]
enum Source {
    #[default]
    Empty,
    Static(Vec<String>),
    /// Produced per request path; the producer must bound its own output.
    Dynamic(ProducerFn),
}

#[derive(Clone, Default)]
enum Sorter {
    #[default]
    Unsorted,
    Natural,
    By(CompareFn),
}

/// Possible values for a section, each becoming its own URL branch.
///
/// Materialized fresh on every call - path-dependent producers can change
/// between requests, so nothing here is cached.
#[derive(Clone)]
pub struct Values {
    source: Source,
    each: Option<EachFn>,
    as_set: bool,
    sorter: Sorter,
    sort_with_alias: bool,
}

impl Default for Values {
    fn default() -> Self {
        Self {
            source: Source::Empty,
            each: None,
            as_set: false,
            sorter: Sorter::Unsorted,
            sort_with_alias: true,
        }
    }
}

impl Values {
    /// Fixed values.
    #[must_use]
    pub fn of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            source: Source::Static(values.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Values produced from the current request path.
    #[must_use]
    pub fn dynamic<F>(producer: F) -> Self
    where
        F: Fn(&[String]) -> Vec<String> + Send + Sync + 'static,
    {
        Self {
            source: Source::Dynamic(Arc::new(producer)),
            ..Self::default()
        }
    }

    /// Transform each value into an `(alias, url_fragment)` pair. The default
    /// transform uses the value for both.
    #[must_use]
    pub fn each<F>(mut self, transform: F) -> Self
    where
        F: Fn(&[String], &str) -> (String, String) + Send + Sync + 'static,
    {
        self.each = Some(Arc::new(transform));
        self
    }

    /// Remove duplicate pairs, keeping the first occurrence.
    #[must_use]
    pub fn as_set(mut self) -> Self {
        self.as_set = true;
        self
    }

    /// Sort naturally (lexicographic).
    #[must_use]
    pub fn sorted(mut self) -> Self {
        self.sorter = Sorter::Natural;
        self
    }

    /// Sort with a comparator. Compares aliases after the transform, or the
    /// raw values when [`Values::sort_values_first`] is set.
    #[must_use]
    pub fn sorted_by<F>(mut self, compare: F) -> Self
    where
        F: Fn(&str, &str) -> Ordering + Send + Sync + 'static,
    {
        self.sorter = Sorter::By(Arc::new(compare));
        self
    }

    /// Sort the raw values before the `each` transform instead of the
    /// transformed aliases after it.
    #[must_use]
    pub fn sort_values_first(mut self) -> Self {
        self.sort_with_alias = false;
        self
    }

    fn sort_raw(&self, values: &mut [String]) {
        match &self.sorter {
            Sorter::Unsorted => {}
            Sorter::Natural => values.sort(),
            Sorter::By(cmp) => values.sort_by(|a, b| (**cmp)(a, b)),
        }
    }

    fn sort_pairs(&self, pairs: &mut [(String, String)]) {
        match &self.sorter {
            Sorter::Unsorted => {}
            Sorter::Natural => pairs.sort(),
            Sorter::By(cmp) => pairs.sort_by(|a, b| (**cmp)(&a.0, &b.0)),
        }
    }

    /// Materialize transformed, sorted `(alias, url_fragment)` pairs for the
    /// given request path.
    #[must_use]
    pub fn get_values(&self, path: &[String], sort_with_alias: Option<bool>) -> Vec<(String, String)> {
        let sort_with_alias = sort_with_alias.unwrap_or(self.sort_with_alias);

        let mut raw = match &self.source {
            Source::Empty => Vec::new(),
            Source::Static(values) => values.clone(),
            Source::Dynamic(producer) => (**producer)(path),
        };

        if !sort_with_alias {
            self.sort_raw(&mut raw);
        }

        let mut pairs: Vec<(String, String)> = raw
            .iter()
            .map(|value| match &self.each {
                Some(transform) => (**transform)(path, value),
                None => (value.clone(), value.clone()),
            })
            .collect();

        if sort_with_alias {
            self.sort_pairs(&mut pairs);
        }

        if self.as_set {
            let mut seen = HashSet::new();
            pairs.retain(|pair| seen.insert(pair.clone()));
        }

        pairs
    }

    /// `(alias, url_fragment)` pairs for the given path; yields nothing when
    /// there are no values. Recomputed on every call.
    pub fn get_info(&self, path: &[String]) -> impl Iterator<Item = (String, String)> {
        self.get_values(path, None).into_iter()
    }
}

impl fmt::Debug for Values {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            Source::Empty => "Empty",
            Source::Static(_) => "Static(..)",
            Source::Dynamic(_) => "Dynamic(..)",
        };
        f.debug_struct("Values")
            .field("source", &source)
            .field("as_set", &self.as_set)
            .field("sort_with_alias", &self.sort_with_alias)
            .finish()
    }
}
