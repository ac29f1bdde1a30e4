//! Layout/theme rendering for tenant sites.
//!
//! Given a tenant's appearance settings and a page or post body, this module
//! produces a complete, self-contained HTML document as a string. Rendering
//! is deterministic and side-effect free; callers decide whether the result
//! becomes an HTTP response body or a preview iframe document.
//!
//! Missing data is defaulted rather than failed: an absent header text falls
//! back to the username, an unrecognized layout or theme name falls back to
//! the default variant, and invalid color overrides fall back to the theme
//! preset.

mod document;
mod styles;

pub use document::{escape_html, render_document};

use serde::{Deserialize, Serialize};

use crate::types::HexColor;

/// A named structural template for a tenant site.
///
/// The string forms are stored in the database and arrive from query
/// parameters, so parsing is lenient: the legacy layout names that predate
/// the current scheme are accepted as aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutId {
    /// Card grid for portfolio-style sites.
    PortfolioGrid,
    /// Single centered column, the default.
    PersonalBlog,
    /// Hero header with centered content.
    LandingPage,
    /// Fixed intro column beside the content.
    SplitIntro,
    /// Dense, note-taking oriented column.
    NotesZettelkasten,
    /// One narrow column of links.
    LinkInBio,
}

impl LayoutId {
    /// All layouts, in the order they appear in pickers.
    pub const ALL: [Self; 6] = [
        Self::PersonalBlog,
        Self::PortfolioGrid,
        Self::LandingPage,
        Self::SplitIntro,
        Self::NotesZettelkasten,
        Self::LinkInBio,
    ];

    /// The canonical identifier stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PortfolioGrid => "portfolio-grid",
            Self::PersonalBlog => "personal-blog",
            Self::LandingPage => "landing-page",
            Self::SplitIntro => "split-intro",
            Self::NotesZettelkasten => "notes-zettelkasten",
            Self::LinkInBio => "link-in-bio",
        }
    }

    /// Human-readable name for pickers.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::PortfolioGrid => "Portfolio grid",
            Self::PersonalBlog => "Personal blog",
            Self::LandingPage => "Landing page",
            Self::SplitIntro => "Split intro",
            Self::NotesZettelkasten => "Notes",
            Self::LinkInBio => "Link in bio",
        }
    }

    /// Parse a layout identifier, accepting the legacy aliases
    /// (`classic-columnist`, `modern-card-deck`, `minimalist-focus`).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "portfolio-grid" | "modern-card-deck" => Some(Self::PortfolioGrid),
            "personal-blog" | "classic-columnist" => Some(Self::PersonalBlog),
            "landing-page" | "minimalist-focus" => Some(Self::LandingPage),
            "split-intro" => Some(Self::SplitIntro),
            "notes-zettelkasten" => Some(Self::NotesZettelkasten),
            "link-in-bio" => Some(Self::LinkInBio),
            _ => None,
        }
    }

    /// Parse a layout identifier, falling back to the default.
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl Default for LayoutId {
    fn default() -> Self {
        Self::PersonalBlog
    }
}

impl std::fmt::Display for LayoutId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named color preset applied under a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeId {
    /// Light background, dark ink.
    Classic,
    /// Dark background, light ink.
    Midnight,
    /// Warm paper tones.
    Sepia,
    /// Dark green with bright accent.
    Forest,
}

impl ThemeId {
    /// All themes, in picker order.
    pub const ALL: [Self; 4] = [Self::Classic, Self::Midnight, Self::Sepia, Self::Forest];

    /// The canonical identifier stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Midnight => "midnight",
            Self::Sepia => "sepia",
            Self::Forest => "forest",
        }
    }

    /// Parse a theme identifier, falling back to [`ThemeId::Classic`].
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "midnight" | "dark" => Self::Midnight,
            "sepia" => Self::Sepia,
            "forest" => Self::Forest,
            _ => Self::Classic,
        }
    }

    /// The theme's color preset.
    #[must_use]
    pub const fn palette(self) -> Palette {
        match self {
            Self::Classic => Palette {
                background: HexColor::from_rgb(0xff, 0xff, 0xff),
                surface: HexColor::from_rgb(0xf6, 0xf6, 0xf4),
                text: HexColor::from_rgb(0x1c, 0x1c, 0x1c),
                muted: HexColor::from_rgb(0x6b, 0x6b, 0x6b),
                accent: HexColor::from_rgb(0x25, 0x57, 0xd6),
            },
            Self::Midnight => Palette {
                background: HexColor::from_rgb(0x10, 0x12, 0x16),
                surface: HexColor::from_rgb(0x1a, 0x1d, 0x23),
                text: HexColor::from_rgb(0xe8, 0xe8, 0xe6),
                muted: HexColor::from_rgb(0x9a, 0x9a, 0x98),
                accent: HexColor::from_rgb(0x6e, 0xa8, 0xfe),
            },
            Self::Sepia => Palette {
                background: HexColor::from_rgb(0xf7, 0xf1, 0xe3),
                surface: HexColor::from_rgb(0xef, 0xe6, 0xd2),
                text: HexColor::from_rgb(0x3e, 0x35, 0x28),
                muted: HexColor::from_rgb(0x85, 0x7a, 0x64),
                accent: HexColor::from_rgb(0xb4, 0x56, 0x2e),
            },
            Self::Forest => Palette {
                background: HexColor::from_rgb(0x0f, 0x17, 0x13),
                surface: HexColor::from_rgb(0x18, 0x24, 0x1d),
                text: HexColor::from_rgb(0xe3, 0xec, 0xe6),
                muted: HexColor::from_rgb(0x8f, 0xa3, 0x96),
                accent: HexColor::from_rgb(0x5b, 0xd1, 0x8a),
            },
        }
    }
}

impl Default for ThemeId {
    fn default() -> Self {
        Self::Classic
    }
}

impl std::fmt::Display for ThemeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typography preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontFamily {
    /// System sans-serif stack.
    Sans,
    /// Serif stack.
    Serif,
    /// Monospace stack.
    Mono,
}

impl FontFamily {
    /// All font presets, in picker order.
    pub const ALL: [Self; 3] = [Self::Sans, Self::Serif, Self::Mono];

    /// The canonical identifier stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sans => "sans",
            Self::Serif => "serif",
            Self::Mono => "mono",
        }
    }

    /// The CSS `font-family` stack.
    #[must_use]
    pub const fn css_stack(self) -> &'static str {
        match self {
            Self::Sans => {
                "system-ui, -apple-system, 'Segoe UI', Roboto, 'Helvetica Neue', sans-serif"
            }
            Self::Serif => "Georgia, 'Iowan Old Style', 'Times New Roman', serif",
            Self::Mono => "'SF Mono', 'Cascadia Code', Consolas, 'Liberation Mono', monospace",
        }
    }

    /// Parse a font identifier, falling back to [`FontFamily::Sans`].
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "serif" | "georgia" => Self::Serif,
            "mono" | "monospace" => Self::Mono,
            _ => Self::Sans,
        }
    }
}

impl Default for FontFamily {
    fn default() -> Self {
        Self::Sans
    }
}

impl std::fmt::Display for FontFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a blog index lists its posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlogStyle {
    /// One post summary per row.
    Stacked,
    /// Summaries in a card grid.
    Cards,
}

impl BlogStyle {
    /// The canonical identifier stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stacked => "stacked",
            Self::Cards => "cards",
        }
    }

    /// Parse a blog style identifier, falling back to [`BlogStyle::Stacked`].
    #[must_use]
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "cards" | "grid" => Self::Cards,
            _ => Self::Stacked,
        }
    }
}

impl Default for BlogStyle {
    fn default() -> Self {
        Self::Stacked
    }
}

/// Resolved colors used by the stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Page background.
    pub background: HexColor,
    /// Card/panel background.
    pub surface: HexColor,
    /// Body text.
    pub text: HexColor,
    /// De-emphasized text (dates, tags).
    pub muted: HexColor,
    /// Links and highlights.
    pub accent: HexColor,
}

/// The resolved rendering input for a tenant site: who the tenant is and how
/// their site should look.
#[derive(Debug, Clone)]
pub struct SiteChrome {
    /// Tenant username (subdomain label).
    pub username: String,
    /// Site title shown in the header; `None` falls back to the username.
    pub header_text: Option<String>,
    /// Footer line; `None` renders a bare footer.
    pub footer_text: Option<String>,
    /// Structural layout.
    pub layout: LayoutId,
    /// Color preset.
    pub theme: ThemeId,
    /// Typography preset.
    pub font: FontFamily,
    /// Explicit accent color override.
    pub accent_color: Option<HexColor>,
    /// Explicit background color override.
    pub background_color: Option<HexColor>,
    /// Explicit text color override.
    pub text_color: Option<HexColor>,
    /// Whether the tenant's blog is enabled (controls the nav link).
    pub blog_enabled: bool,
    /// Path prefix for generated links. Empty when the site is served from
    /// its own host; `/u/{username}` in the path-based fallback.
    pub base_path: String,
}

impl SiteChrome {
    /// A minimal chrome for a tenant with default settings.
    #[must_use]
    pub fn for_username(username: &str) -> Self {
        Self {
            username: username.to_owned(),
            header_text: None,
            footer_text: None,
            layout: LayoutId::default(),
            theme: ThemeId::default(),
            font: FontFamily::default(),
            accent_color: None,
            background_color: None,
            text_color: None,
            blog_enabled: true,
            base_path: String::new(),
        }
    }

    /// The href of the site's root, honoring the base path.
    #[must_use]
    pub fn home_href(&self) -> String {
        if self.base_path.is_empty() {
            "/".to_owned()
        } else {
            self.base_path.clone()
        }
    }

    /// The title shown in the header and the `<title>` element.
    #[must_use]
    pub fn site_title(&self) -> &str {
        self.header_text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.username)
    }

    /// The theme preset with explicit color overrides applied.
    #[must_use]
    pub fn palette(&self) -> Palette {
        let mut palette = self.theme.palette();
        if let Some(accent) = self.accent_color {
            palette.accent = accent;
        }
        if let Some(background) = self.background_color {
            palette.background = background;
        }
        if let Some(text) = self.text_color {
            palette.text = text;
        }
        palette
    }
}

/// A post summary as rendered on index pages and post headers.
#[derive(Debug, Clone)]
pub struct PostCard {
    /// Post title.
    pub title: String,
    /// Post slug, linked as `/blog/{slug}`.
    pub slug: String,
    /// Short excerpt (already clamped by the post service).
    pub excerpt: String,
    /// Human-readable publish date, when published.
    pub published_label: Option<String>,
    /// Estimated reading time in minutes.
    pub reading_minutes: u32,
    /// Post tags (at most three).
    pub tags: Vec<String>,
}

/// Document `<head>` metadata.
#[derive(Debug, Clone, Default)]
pub struct DocumentMeta {
    /// Meta description.
    pub description: Option<String>,
    /// Canonical URL.
    pub canonical_url: Option<String>,
    /// `lang` attribute; defaults to `en`.
    pub language: Option<String>,
}

/// The body content to render inside the chrome.
#[derive(Debug, Clone)]
pub enum Body {
    /// A static page. `content_html` is trusted, already-rendered HTML.
    Page {
        /// Page title.
        title: String,
        /// Rendered content blocks.
        content_html: String,
    },
    /// A blog index or search result listing.
    PostList {
        /// Listing heading (e.g. "Blog" or "Search: rust").
        heading: String,
        /// Post summaries, newest first.
        posts: Vec<PostCard>,
        /// Listing style from the tenant's blog settings.
        style: BlogStyle,
        /// Whether to render the search form.
        show_search: bool,
        /// Echoed search query, if this is a search result page.
        search_query: Option<String>,
        /// Opaque cursor for the next page, if any.
        next_cursor: Option<String>,
    },
    /// A single blog post. `content_html` is trusted, already-rendered HTML.
    Post {
        /// Post summary (title, date, tags, reading time).
        card: PostCard,
        /// Rendered post body.
        content_html: String,
    },
}
