use crate::error::ExportError;
use crate::format::{format_money, format_ratio};
use analytics::{CampaignSummary, InfluencerRoas};
use printpdf::{BuiltinFont, Mm, PdfDocument};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const LINE_HEIGHT_MM: f32 = 10.0;
const FONT_SIZE_PT: f32 = 12.0;
/// Average Helvetica glyph width as a fraction of the font size, for centering.
const AVG_GLYPH_EM: f32 = 0.5;
const PT_TO_MM: f32 = 0.3528;

/// One laid-out line of the insights page.
#[derive(Debug, Clone, PartialEq)]
pub enum PdfLine {
    Centered(String),
    Left(String),
    /// Vertical space in millimetres.
    Gap(f32),
}

/// The one-page campaign insights summary.
#[derive(Debug, Clone)]
pub struct InsightsPdf {
    pub title: String,
    pub currency_label: String,
    /// How many influencers are listed.
    pub top_n: usize,
}

impl InsightsPdf {
    pub fn new(title: impl Into<String>, currency_label: impl Into<String>, top_n: usize) -> Self {
        Self {
            title: title.into(),
            currency_label: currency_label.into(),
            top_n,
        }
    }

    /// The page content, top to bottom. `top` is expected in descending ROAS order.
    pub fn lines(&self, summary: &CampaignSummary, top: &[InfluencerRoas]) -> Vec<PdfLine> {
        let mut lines = vec![
            PdfLine::Centered(self.title.clone()),
            PdfLine::Gap(LINE_HEIGHT_MM),
            PdfLine::Left(format!(
                "Total Revenue: {}",
                format_money(summary.total_revenue, &self.currency_label)
            )),
            PdfLine::Left(format!(
                "Total Spend: {}",
                format_money(summary.total_spend, &self.currency_label)
            )),
            PdfLine::Left(format!("Overall ROAS: {}", format_ratio(summary.roas))),
            PdfLine::Left(format!(
                "Incremental ROAS vs Baseline (1.0): {}",
                format_ratio(summary.incremental_roas)
            )),
            PdfLine::Gap(5.0),
            PdfLine::Left(format!("Top {} Influencers by ROAS:", self.top_n)),
        ];

        lines.extend(top.iter().take(self.top_n).enumerate().map(|(i, row)| {
            PdfLine::Left(format!(
                "{}. {} - ROAS: {}",
                i + 1,
                row.display_name(),
                format_ratio(row.roas)
            ))
        }));
        lines
    }

    /// Renders the page to PDF bytes.
    pub fn render(&self, summary: &CampaignSummary, top: &[InfluencerRoas]) -> Result<Vec<u8>, ExportError> {
        let (doc, page, layer) = PdfDocument::new(
            self.title.as_str(),
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Insights",
        );
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Pdf(format!("{:?}", e)))?;
        let layer = doc.get_page(page).get_layer(layer);

        let mut y = PAGE_HEIGHT_MM - MARGIN_MM - LINE_HEIGHT_MM;
        for line in self.lines(summary, top) {
            match line {
                PdfLine::Centered(text) => {
                    let x = centered_x(&text);
                    layer.use_text(text, FONT_SIZE_PT, Mm(x), Mm(y), &font);
                    y -= LINE_HEIGHT_MM;
                }
                PdfLine::Left(text) => {
                    layer.use_text(text, FONT_SIZE_PT, Mm(MARGIN_MM), Mm(y), &font);
                    y -= LINE_HEIGHT_MM;
                }
                PdfLine::Gap(mm) => y -= mm,
            }
        }

        doc.save_to_bytes()
            .map_err(|e| ExportError::Pdf(format!("{:?}", e)))
    }
}

fn centered_x(text: &str) -> f32 {
    let width = text.chars().count() as f32 * FONT_SIZE_PT * AVG_GLYPH_EM * PT_TO_MM;
    ((PAGE_WIDTH_MM - width) / 2.0).max(MARGIN_MM)
}
