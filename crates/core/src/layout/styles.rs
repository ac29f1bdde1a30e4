//! Per-layout stylesheet generation.
//!
//! Every document carries one inline `<style>` block: shared base rules
//! driven by the palette, then a section specific to the layout. Output is
//! plain CSS text; nothing here is user-controlled except validated colors.

use std::fmt::Write;

use super::{FontFamily, LayoutId, Palette};

/// Build the full stylesheet for a document.
#[must_use]
pub(crate) fn stylesheet(layout: LayoutId, palette: &Palette, font: FontFamily) -> String {
    let mut css = base_css(palette, font);
    css.push_str(layout_css(layout));
    css
}

fn base_css(palette: &Palette, font: FontFamily) -> String {
    let mut css = String::with_capacity(2048);
    // Palette variables first so layout sections can reference them.
    let _ = write!(
        css,
        ":root{{--bg:{bg};--surface:{surface};--text:{text};--muted:{muted};--accent:{accent};}}",
        bg = palette.background,
        surface = palette.surface,
        text = palette.text,
        muted = palette.muted,
        accent = palette.accent,
    );
    let _ = write!(
        css,
        "*{{box-sizing:border-box;}}\
         body{{margin:0;background:var(--bg);color:var(--text);\
         font-family:{font};line-height:1.6;}}",
        font = font.css_stack(),
    );
    css.push_str(
        "a{color:var(--accent);text-decoration:none;}\
         a:hover{text-decoration:underline;}\
         h1,h2,h3{line-height:1.25;}\
         img{max-width:100%;height:auto;}\
         pre{background:var(--surface);padding:1rem;overflow-x:auto;border-radius:6px;}\
         code{background:var(--surface);padding:.1em .3em;border-radius:4px;}\
         pre code{padding:0;background:none;}\
         blockquote{margin:0;padding-left:1rem;border-left:3px solid var(--accent);color:var(--muted);}\
         .site-header nav a{margin-right:1rem;color:var(--text);}\
         .site-header nav a:hover{color:var(--accent);}\
         .site-footer{color:var(--muted);font-size:.85rem;margin-top:3rem;\
         padding-top:1rem;border-top:1px solid var(--surface);}\
         .post-meta{color:var(--muted);font-size:.85rem;}\
         .tag{display:inline-block;background:var(--surface);color:var(--muted);\
         border-radius:999px;padding:.05rem .6rem;margin-right:.35rem;font-size:.75rem;}\
         .post-list{list-style:none;margin:0;padding:0;}\
         .post-list li{margin-bottom:1.75rem;}\
         .post-list.cards{display:grid;grid-template-columns:repeat(auto-fill,minmax(240px,1fr));gap:1rem;}\
         .post-list.cards li{background:var(--surface);border-radius:8px;padding:1rem;margin:0;}\
         .search-form input{background:var(--surface);color:var(--text);border:1px solid var(--muted);\
         border-radius:6px;padding:.4rem .7rem;width:60%;max-width:20rem;}\
         .pager{margin-top:2rem;}",
    );
    css
}

/// The layout-specific CSS section.
const fn layout_css(layout: LayoutId) -> &'static str {
    match layout {
        LayoutId::PersonalBlog => {
            ".wrap{max-width:680px;margin:0 auto;padding:2rem 1.25rem;}\
             .site-header{margin-bottom:2.5rem;}\
             .site-header h1{font-size:1.6rem;margin:0 0 .5rem;}"
        }
        LayoutId::PortfolioGrid => {
            ".wrap{max-width:1040px;margin:0 auto;padding:2rem 1.5rem;}\
             .site-header{display:flex;align-items:baseline;justify-content:space-between;\
             flex-wrap:wrap;margin-bottom:2.5rem;}\
             .site-header h1{font-size:1.5rem;margin:0;}\
             main.page-content{background:var(--surface);border-radius:10px;padding:2rem;}"
        }
        LayoutId::LandingPage => {
            ".wrap{max-width:720px;margin:0 auto;padding:2rem 1.25rem;text-align:center;}\
             .site-header{padding:3rem 0 2rem;}\
             .site-header h1{font-size:2.6rem;margin:0 0 .75rem;}\
             .site-header nav a{margin:0 .5rem;}\
             main{text-align:left;}"
        }
        LayoutId::SplitIntro => {
            ".wrap{max-width:960px;margin:0 auto;padding:2rem 1.25rem;\
             display:grid;grid-template-columns:240px 1fr;gap:3rem;}\
             .site-header h1{font-size:1.4rem;margin:0 0 1rem;}\
             .site-header nav a{display:block;margin:0 0 .5rem;}\
             @media(max-width:720px){.wrap{display:block;}}\
             .site-footer{border-top:none;}"
        }
        LayoutId::NotesZettelkasten => {
            ".wrap{max-width:600px;margin:0 auto;padding:1.5rem 1rem;}\
             body{font-size:.95rem;}\
             .site-header{margin-bottom:1.5rem;}\
             .site-header h1{font-size:1.15rem;margin:0 0 .4rem;}\
             .post-list li{margin-bottom:.9rem;padding-bottom:.9rem;\
             border-bottom:1px dashed var(--surface);}"
        }
        LayoutId::LinkInBio => {
            ".wrap{max-width:420px;margin:0 auto;padding:2.5rem 1rem;text-align:center;}\
             .site-header h1{font-size:1.5rem;margin:0 0 1.5rem;}\
             .site-header nav a{display:block;margin:0 0 .75rem;background:var(--surface);\
             color:var(--text);border-radius:8px;padding:.7rem 1rem;}\
             .site-header nav a:hover{color:var(--accent);text-decoration:none;}\
             main{text-align:left;}"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ThemeId;

    #[test]
    fn test_stylesheet_embeds_palette() {
        let palette = ThemeId::Midnight.palette();
        let css = stylesheet(LayoutId::PersonalBlog, &palette, FontFamily::Serif);
        assert!(css.contains("--bg:#101216"));
        assert!(css.contains("--accent:#6ea8fe"));
        assert!(css.contains("Georgia"));
    }

    #[test]
    fn test_every_layout_has_a_wrap_rule() {
        let palette = ThemeId::Classic.palette();
        for layout in LayoutId::ALL {
            let css = stylesheet(layout, &palette, FontFamily::Sans);
            assert!(css.contains(".wrap{"), "no wrap rule for {layout}");
        }
    }

    #[test]
    fn test_layout_sections_differ() {
        assert_ne!(
            layout_css(LayoutId::PersonalBlog),
            layout_css(LayoutId::LinkInBio)
        );
    }
}
