//! Keyword matching.

/// A thing that can be searched for keywords.
pub trait Searchable {
    /// The title of the thing.
    fn title(&self) -> &str;

    /// The body text of the thing.
    fn body(&self) -> &str;
}

/// A set of keywords, any one of which is enough to make a match.
///
/// Keywords are trimmed and compared case-insensitively as fixed
/// substrings; regular expressions are not supported. An empty set
/// matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeywordSet {
    keywords: Vec<String>,
}

impl KeywordSet {
    /// Creates a keyword set, ignoring keywords that are blank once trimmed.
    ///
    /// # Examples
    ///
    /// ```
    /// use subscout::filter::KeywordSet;
    /// let keywords = KeywordSet::new(["  Seating Chart ", "", "table layout"]);
    /// assert_eq!(keywords.len(), 2);
    /// assert!(keywords.matches_text("Help with my SEATING CHART", ""));
    /// ```
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// The normalized (trimmed, lowercased) keywords.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// True if the set is empty or any keyword occurs in `title` or `body`.
    pub fn matches_text(&self, title: &str, body: &str) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let title = title.to_lowercase();
        let body = body.to_lowercase();
        self.keywords
            .iter()
            .any(|k| title.contains(k.as_str()) || body.contains(k.as_str()))
    }

    /// True if the set is empty or any keyword occurs in the item's title
    /// or body.
    pub fn matches<S: Searchable + ?Sized>(&self, item: &S) -> bool {
        self.matches_text(item.title(), item.body())
    }
}
