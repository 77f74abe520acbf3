/// Settings threaded through parser construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParserConfig {
    /// When false, items carry no feature structures and deduction is purely
    /// context-free.
    pub unification: bool,
    /// When true, tags that come with a feature structure are reduced to
    /// their category.
    pub list_of_categories: bool,
    /// Path from a tag's feature structure to the string naming its category.
    pub lexical_category_path: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            unification: true,
            list_of_categories: false,
            lexical_category_path: vec!["category".to_string()],
        }
    }
}

impl ParserConfig {
    pub fn context_free() -> Self {
        ParserConfig { unification: false, ..Self::default() }
    }

    pub fn with_unification(mut self, unification: bool) -> Self {
        self.unification = unification;
        self
    }

    pub fn with_list_of_categories(mut self, list_of_categories: bool) -> Self {
        self.list_of_categories = list_of_categories;
        self
    }

    pub fn with_lexical_category_path<S: Into<String>>(mut self, path: impl IntoIterator<Item = S>) -> Self {
        self.lexical_category_path = path.into_iter().map(Into::into).collect();
        self
    }
}
