#![forbid(unsafe_code)]

//! `nagrik` bundles the civic-learning building blocks behind one dependency.
//!
//! # Features
//!
//! - `render`: headless mind-map layout, connector geometry and SVG output (`nagrik::render`)
//! - `portal`: best-effort scheme fetching from the myScheme portal (`nagrik::portal`)
//! - `raster`: PNG output via pure-Rust SVG rasterization

pub use nagrik_core::*;

#[cfg(feature = "portal")]
pub mod portal {
    pub use nagrik_portal::*;
}

#[cfg(feature = "render")]
pub mod render {
    pub use nagrik_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use nagrik_render::{
        Connector, LayoutSnapshot, LayoutStyle, MindMapOptions, MindMapView, SvgRenderOptions,
        render_mindmap_svg, snapshot_json,
    };

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Core(#[from] nagrik_core::Error),
        #[error(transparent)]
        Render(#[from] nagrik_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Turns an arbitrary string into an SVG `id` token, so several mind maps can share one
    /// document without their gradient ids colliding.
    ///
    /// Unsupported characters become `-`, runs of `-` collapse, and ids that do not start
    /// with an ASCII letter get an `mm-` prefix.
    pub fn sanitize_svg_id(raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty() {
            return "mm-untitled".to_string();
        }

        let mut out = String::with_capacity(raw.len() + 4);
        for ch in raw.chars() {
            let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.';
            out.push(if ok { ch } else { '-' });
        }
        if !out.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
            out.insert_str(0, "mm-");
        }
        while out.contains("--") {
            out = out.replace("--", "-");
        }
        let out = out.trim_matches('-');
        if out.is_empty() || out == "mm" {
            return "mm-untitled".to_string();
        }
        out.to_string()
    }

    /// Bundles view and SVG options for one-shot rendering of a tree with deep-link overrides.
    #[derive(Clone, Default)]
    pub struct MindMapRenderer {
        pub view: MindMapOptions,
        pub svg: SvgRenderOptions,
    }

    impl MindMapRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
            self.view = self.view.with_viewport(width, height);
            self
        }

        /// A view of `tree` with the given expansion overrides applied.
        pub fn view<'a>(
            &self,
            tree: crate::TreeNode,
            overrides: impl IntoIterator<Item = (&'a str, bool)>,
        ) -> Result<MindMapView> {
            let mut view = MindMapView::new(tree, self.view.clone())?;
            view.apply(overrides);
            Ok(view)
        }

        pub fn render_svg<'a>(
            &self,
            tree: crate::TreeNode,
            overrides: impl IntoIterator<Item = (&'a str, bool)>,
        ) -> Result<String> {
            let view = self.view(tree, overrides)?;
            Ok(render_mindmap_svg(&view, &self.svg))
        }

        /// Renders a bundled chapter, titled and id'd after it.
        pub fn render_chapter_svg<'a>(
            &self,
            catalog: &crate::Catalog,
            chapter_id: &str,
            overrides: impl IntoIterator<Item = (&'a str, bool)>,
        ) -> Result<String> {
            let chapter = catalog.require(chapter_id)?;
            let view = self.view(chapter.mind_map.clone(), overrides)?;
            let svg = SvgRenderOptions {
                diagram_id: sanitize_svg_id(&chapter.id),
                title: Some(chapter.display_title()),
                ..self.svg.clone()
            };
            Ok(render_mindmap_svg(&view, &svg))
        }

        #[cfg(feature = "raster")]
        pub fn render_chapter_png<'a>(
            &self,
            catalog: &crate::Catalog,
            chapter_id: &str,
            overrides: impl IntoIterator<Item = (&'a str, bool)>,
            raster: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            let svg = self.render_chapter_svg(catalog, chapter_id, overrides)?;
            raster::svg_to_png(&svg, raster)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn svg_ids_are_sanitized() {
            assert_eq!(sanitize_svg_id("federal-system"), "federal-system");
            assert_eq!(sanitize_svg_id("  "), "mm-untitled");
            assert_eq!(sanitize_svg_id("1 union & territory"), "mm-1-union-territory");
            assert_eq!(sanitize_svg_id("a//b"), "a-b");
        }

        #[test]
        fn chapter_render_is_titled() {
            let catalog = crate::Catalog::builtin().unwrap();
            let chapter = catalog.default_chapter().unwrap();
            let svg = MindMapRenderer::new()
                .render_chapter_svg(&catalog, &chapter.id, [])
                .unwrap();
            assert!(svg.contains(&format!("<title>{}</title>", chapter.display_title())));
            assert!(
                MindMapRenderer::new()
                    .render_chapter_svg(&catalog, "missing", [])
                    .is_err()
            );
        }
    }
}
