//! Typed print options forwarded to the PDF engine
//!
//! Field names mirror the wire request (camelCase); dimensions are in inches.
//! Everything is optional so untouched knobs fall through to the engine's
//! defaults.

use headless_chrome::types::PrintToPdfOptions;
use serde::Deserialize;

/// Layout options for the produced PDF
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PdfOptions {
    /// Named paper size; overridden by explicit `width`/`height`
    pub format: Option<PaperFormat>,
    /// Paper width in inches
    pub width: Option<f64>,
    /// Paper height in inches
    pub height: Option<f64>,
    /// Landscape orientation
    pub landscape: Option<bool>,
    /// Scale of the page rendering (1.0 = 100%)
    pub scale: Option<f64>,
    /// Print background graphics
    pub print_background: Option<bool>,
    /// Show the header and footer templates
    pub display_header_footer: Option<bool>,
    /// HTML template for the page header
    pub header_template: Option<String>,
    /// HTML template for the page footer
    pub footer_template: Option<String>,
    /// Page ranges to print, e.g. "1-5, 8"
    pub page_ranges: Option<String>,
    /// Honor any CSS `@page` size over `format`/`width`/`height`
    #[serde(rename = "preferCSSPageSize")]
    pub prefer_css_page_size: Option<bool>,
    /// Page margins in inches
    pub margin: Option<PageMargins>,
}

/// Per-side page margins in inches
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct PageMargins {
    pub top: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
    pub right: Option<f64>,
}

/// Named paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperFormat {
    #[serde(alias = "Letter")]
    Letter,
    #[serde(alias = "Legal")]
    Legal,
    #[serde(alias = "Tabloid")]
    Tabloid,
    #[serde(alias = "Ledger")]
    Ledger,
    #[serde(alias = "A0")]
    A0,
    #[serde(alias = "A1")]
    A1,
    #[serde(alias = "A2")]
    A2,
    #[serde(alias = "A3")]
    A3,
    #[serde(alias = "A4")]
    A4,
    #[serde(alias = "A5")]
    A5,
    #[serde(alias = "A6")]
    A6,
}

impl PaperFormat {
    /// Paper dimensions as (width, height) in inches, portrait
    pub fn dimensions(self) -> (f64, f64) {
        match self {
            PaperFormat::Letter => (8.5, 11.0),
            PaperFormat::Legal => (8.5, 14.0),
            PaperFormat::Tabloid => (11.0, 17.0),
            PaperFormat::Ledger => (17.0, 11.0),
            PaperFormat::A0 => (33.1, 46.8),
            PaperFormat::A1 => (23.4, 33.1),
            PaperFormat::A2 => (16.54, 23.4),
            PaperFormat::A3 => (11.7, 16.54),
            PaperFormat::A4 => (8.27, 11.7),
            PaperFormat::A5 => (5.83, 8.27),
            PaperFormat::A6 => (4.13, 5.83),
        }
    }
}

impl PdfOptions {
    /// Lower the caller's options into the backend's print parameters.
    pub fn to_print_options(&self) -> PrintToPdfOptions {
        let (format_width, format_height) = match self.format {
            Some(format) => {
                let (w, h) = format.dimensions();
                (Some(w), Some(h))
            }
            None => (None, None),
        };
        let margin = self.margin.unwrap_or_default();

        PrintToPdfOptions {
            landscape: self.landscape,
            display_header_footer: self.display_header_footer,
            print_background: self.print_background,
            scale: self.scale,
            paper_width: self.width.or(format_width),
            paper_height: self.height.or(format_height),
            margin_top: margin.top,
            margin_bottom: margin.bottom,
            margin_left: margin.left,
            margin_right: margin.right,
            page_ranges: self.page_ranges.clone(),
            header_template: self.header_template.clone(),
            footer_template: self.footer_template.clone(),
            prefer_css_page_size: self.prefer_css_page_size,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_maps_to_paper_size() {
        let options: PdfOptions = serde_json::from_str(r#"{"format": "a4"}"#).unwrap();
        let print = options.to_print_options();
        assert_eq!(print.paper_width, Some(8.27));
        assert_eq!(print.paper_height, Some(11.7));
    }

    #[test]
    fn test_format_accepts_uppercase() {
        let options: PdfOptions = serde_json::from_str(r#"{"format": "A5"}"#).unwrap();
        assert_eq!(options.format, Some(PaperFormat::A5));
    }

    #[test]
    fn test_explicit_dimensions_override_format() {
        let options: PdfOptions =
            serde_json::from_str(r#"{"format": "letter", "width": 4.0, "height": 6.0}"#).unwrap();
        let print = options.to_print_options();
        assert_eq!(print.paper_width, Some(4.0));
        assert_eq!(print.paper_height, Some(6.0));
    }

    #[test]
    fn test_margins_are_forwarded_per_side() {
        let options: PdfOptions =
            serde_json::from_str(r#"{"margin": {"top": 0.5, "left": 1.0}}"#).unwrap();
        let print = options.to_print_options();
        assert_eq!(print.margin_top, Some(0.5));
        assert_eq!(print.margin_left, Some(1.0));
        assert_eq!(print.margin_bottom, None);
        assert_eq!(print.margin_right, None);
    }

    #[test]
    fn test_untouched_options_stay_unset() {
        let print = PdfOptions::default().to_print_options();
        assert_eq!(print.paper_width, None);
        assert_eq!(print.landscape, None);
        assert_eq!(print.print_background, None);
        assert_eq!(print.page_ranges, None);
    }

    #[test]
    fn test_passthrough_fields() {
        let options: PdfOptions = serde_json::from_str(
            r#"{
                "landscape": true,
                "scale": 0.8,
                "printBackground": true,
                "displayHeaderFooter": true,
                "headerTemplate": "<span class='title'></span>",
                "pageRanges": "1-3",
                "preferCSSPageSize": true
            }"#,
        )
        .unwrap();
        let print = options.to_print_options();
        assert_eq!(print.landscape, Some(true));
        assert_eq!(print.scale, Some(0.8));
        assert_eq!(print.print_background, Some(true));
        assert_eq!(print.display_header_footer, Some(true));
        assert_eq!(print.page_ranges.as_deref(), Some("1-3"));
        assert_eq!(print.prefer_css_page_size, Some(true));
        assert!(print.header_template.is_some());
    }
}
