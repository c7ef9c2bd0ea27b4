//! Embedded static resources.
//!
//! - `serve` - preview server pages (listing, 404, 500) and the live-reload
//!   client script, rendered with typed variable injection
//! - `init` - scaffold files written by `bloggy init`

/// Trait for template variable sets.
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// Embedded template with typed variable injection.
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: std::marker::PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}

pub mod serve {
    use super::{Template, TemplateVars};

    /// Variables for the synthesized listing page.
    pub struct HomeVars<'a> {
        pub port: u16,
        /// Pre-rendered `<li>` entries for available pages.
        pub page_links: &'a str,
    }

    impl TemplateVars for HomeVars<'_> {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__SERVER_PORT__", &self.port.to_string())
                .replace("__PAGE_LINKS__", self.page_links)
        }
    }

    /// Listing page served for `/`.
    pub const HOME_HTML: Template<HomeVars<'static>> =
        Template::new(include_str!("serve/home.html"));

    /// Variables for the themed 404 page.
    pub struct NotFoundVars<'a> {
        pub request_path: &'a str,
        pub time: &'a str,
    }

    impl TemplateVars for NotFoundVars<'_> {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__REQUEST_PATH__", self.request_path)
                .replace("__ERROR_TIME__", self.time)
        }
    }

    pub const NOT_FOUND_HTML: Template<NotFoundVars<'static>> =
        Template::new(include_str!("serve/not_found.html"));

    /// Variables for the themed 500 page.
    pub struct ErrorVars<'a> {
        pub message: &'a str,
        pub request_path: &'a str,
        pub time: &'a str,
    }

    impl TemplateVars for ErrorVars<'_> {
        fn apply(&self, content: &str) -> String {
            content
                .replace("__ERROR_MESSAGE__", self.message)
                .replace("__REQUEST_PATH__", self.request_path)
                .replace("__ERROR_TIME__", self.time)
        }
    }

    pub const ERROR_HTML: Template<ErrorVars<'static>> =
        Template::new(include_str!("serve/error.html"));

    /// Variables for the live-reload client script.
    pub struct LiveReloadVars {
        pub ws_port: u16,
    }

    impl TemplateVars for LiveReloadVars {
        fn apply(&self, content: &str) -> String {
            content.replace("__WS_PORT__", &self.ws_port.to_string())
        }
    }

    pub const LIVERELOAD_JS: Template<LiveReloadVars> =
        Template::new(include_str!("serve/livereload.js"));

    /// URL the reload client bootstrap is served from.
    pub const LIVERELOAD_PATH: &str = "/livereload.js";

    /// Tag injected into served HTML pages, immediately before `</body>`.
    pub const LIVERELOAD_SNIPPET: &str = "<script src=\"/livereload.js\"></script>";
}

pub mod init {
    /// Default page template, demonstrating both placeholder spellings,
    /// include directives and time macros.
    pub const TEMPLATE_HTML: &str = include_str!("init/template.html");
    pub const HEADER_HTML: &str = include_str!("init/header.html");
    pub const FOOTER_HTML: &str = include_str!("init/footer.html");
    pub const SAMPLE_POST_MD: &str = include_str!("init/hello-world.md");
    pub const CONFIG_TOML: &str = include_str!("init/bloggy.toml");
}

#[cfg(test)]
mod tests {
    use super::serve::*;

    #[test]
    fn test_home_vars_applied() {
        let html = HOME_HTML.render(&HomeVars {
            port: 3000,
            page_links: "<li><a href=\"/a.html\">a</a></li>",
        });
        assert!(html.contains("3000"));
        assert!(html.contains("/a.html"));
        assert!(!html.contains("__SERVER_PORT__"));
        assert!(!html.contains("__PAGE_LINKS__"));
    }

    #[test]
    fn test_livereload_port_substituted() {
        let js = LIVERELOAD_JS.render(&LiveReloadVars { ws_port: 35729 });
        assert!(js.contains("35729"));
        assert!(!js.contains("__WS_PORT__"));
    }

    #[test]
    fn test_not_found_vars_applied() {
        let html = NOT_FOUND_HTML.render(&NotFoundVars {
            request_path: "/missing",
            time: "12:00:00",
        });
        assert!(html.contains("/missing"));
        assert!(html.contains("12:00:00"));
    }
}
