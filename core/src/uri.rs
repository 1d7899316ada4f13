//! URL composition from a path template, positional path values and query pairs.

use std::fmt::Display;

const PLACEHOLDER: &str = "{}";

/// Builds a URL from a template such as `/movieservice/v1/movie/{}`.
///
/// Path values fill `{}` placeholders left to right; query pairs are appended
/// in insertion order. Both are percent-encoded as URI components, so a space
/// becomes `%20`. Surplus placeholders are left untouched and surplus path
/// values are ignored.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    template: String,
    path_params: Vec<String>,
    query_params: Vec<(String, String)>,
}

impl UrlBuilder {
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
            path_params: Vec::new(),
            query_params: Vec::new(),
        }
    }

    #[must_use]
    pub fn path_param(mut self, value: impl Display) -> Self {
        self.path_params.push(value.to_string());
        self
    }

    #[must_use]
    pub fn query_param(mut self, key: &str, value: impl Display) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn build(&self) -> String {
        let mut url = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();
        let mut values = self.path_params.iter();

        while let Some(pos) = rest.find(PLACEHOLDER) {
            let Some(value) = values.next() else {
                break;
            };
            url.push_str(&rest[..pos]);
            url.push_str(&url_escape::encode_component(value));
            rest = &rest[pos + PLACEHOLDER.len()..];
        }
        url.push_str(rest);

        for (i, (key, value)) in self.query_params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(&url_escape::encode_component(key));
            url.push('=');
            url.push_str(&url_escape::encode_component(value));
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_without_params_is_unchanged() {
        let url = UrlBuilder::new("/movieservice/v1/allMovies").build();
        assert_eq!(url, "/movieservice/v1/allMovies");
    }

    #[test]
    fn substitutes_path_params_in_order() {
        let url = UrlBuilder::new("/a/{}/b/{}")
            .path_param(7)
            .path_param("x")
            .build();
        assert_eq!(url, "/a/7/b/x");
    }

    #[test]
    fn encodes_query_values() {
        let url = UrlBuilder::new("/movieservice/v1/movieName")
            .query_param("movie_name", "Toy Story")
            .build();
        assert_eq!(url, "/movieservice/v1/movieName?movie_name=Toy%20Story");
    }

    #[test]
    fn keeps_query_param_order() {
        let url = UrlBuilder::new("/search")
            .query_param("b", 2)
            .query_param("a", "x&y=z")
            .build();
        assert_eq!(url, "/search?b=2&a=x%26y%3Dz");
    }

    #[test]
    fn surplus_placeholders_and_values() {
        assert_eq!(UrlBuilder::new("/a/{}/{}").path_param(1).build(), "/a/1/{}");
        assert_eq!(
            UrlBuilder::new("/a/{}").path_param(1).path_param(2).build(),
            "/a/1"
        );
    }

    #[test]
    fn encodes_path_values() {
        let url = UrlBuilder::new("/movie/{}").path_param("a b/c").build();
        assert_eq!(url, "/movie/a%20b%2Fc");
    }
}
