//! Printable bill for a client receipt (A4, builtin Helvetica).

use std::io::BufWriter;

use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point,
};

use crate::error::AppError;
use crate::models::receipt::ReceiptItem;
use crate::models::Receipt;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const LEFT: f32 = 15.0;
const RIGHT: f32 = 195.0;
const BOTTOM: f32 = 30.0;
const ROW_HEIGHT: f32 = 6.0;
const ITEM_NAME_WIDTH: usize = 22;
const TAG_WIDTH: usize = 11;

const COLUMNS: [(&str, f32); 8] = [
    ("Item", 15.0),
    ("Tag", 55.0),
    ("Gross", 78.0),
    ("Stone", 98.0),
    ("Net", 118.0),
    ("Touch %", 136.0),
    ("Final", 156.0),
    ("Stone Amt", 174.0),
];

struct BillWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl BillWriter {
    fn new(title: &str) -> Result<Self, AppError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| AppError::internal(format!("PDF font error: {e}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| AppError::internal(format!("PDF font error: {e}")))?;

        Ok(Self { doc, layer, font, bold, y: PAGE_HEIGHT - 15.0 })
    }

    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.font };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn rule(&self) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(LEFT), Mm(self.y)), false),
                (Point::new(Mm(RIGHT), Mm(self.y)), false),
            ],
            is_closed: false,
        });
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - 15.0;
    }

    fn table_header(&mut self) {
        for (label, x) in COLUMNS {
            self.text(label, 9.0, x, true);
        }
        self.y -= 3.0;
        self.rule();
        self.y -= ROW_HEIGHT;
    }

    fn row(&mut self, cells: &[String; 8], bold: bool) {
        if self.y < BOTTOM {
            self.new_page();
            self.table_header();
        }
        for (cell, (_, x)) in cells.iter().zip(COLUMNS) {
            self.text(cell, 9.0, x, bold);
        }
        self.y -= ROW_HEIGHT;
    }

    fn finish(self) -> Result<Vec<u8>, AppError> {
        let mut writer = BufWriter::new(Vec::<u8>::new());
        self.doc
            .save(&mut writer)
            .map_err(|e| AppError::internal(format!("PDF write error: {e}")))?;
        writer
            .into_inner()
            .map_err(|e| AppError::internal(format!("PDF buffer error: {e}")))
    }
}

/// First `width` characters, so text stays inside its column.
fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

fn item_cells(item: &ReceiptItem) -> [String; 8] {
    [
        clip(&item.item_name, ITEM_NAME_WIDTH),
        clip(&item.tag, TAG_WIDTH),
        format!("{:.3}", item.gross_weight),
        format!("{:.3}", item.stone_weight),
        format!("{:.3}", item.net_weight),
        format!("{:.2}", item.melting_touch),
        format!("{:.3}", item.final_weight),
        format!("{:.2}", item.stone_amount),
    ]
}

/// Title, client block, item table, totals row and footer.
pub fn render_receipt(receipt: &Receipt, business_name: &str) -> Result<Vec<u8>, AppError> {
    let mut w = BillWriter::new(&format!("{business_name} - Receipt"))?;

    w.text(business_name, 18.0, LEFT, true);
    w.text("RECEIPT", 14.0, 160.0, true);
    w.y -= 8.0;
    w.rule();

    w.y -= 9.0;
    w.text(&format!("Client: {}", receipt.client_name), 11.0, LEFT, true);
    w.text(&format!("Date: {}", receipt.issue_date.format("%d-%m-%Y")), 10.0, 130.0, false);
    w.y -= 6.0;
    if !receipt.shop_name.is_empty() {
        w.text(&format!("Shop: {}", receipt.shop_name), 10.0, LEFT, false);
    }
    w.text(&format!("Metal: {}", receipt.metal_type), 10.0, 130.0, false);
    w.y -= 6.0;
    if !receipt.phone_number.is_empty() {
        w.text(&format!("Phone: {}", receipt.phone_number), 10.0, LEFT, false);
    }
    w.text(&format!("Bill no: {}", receipt.id.simple()), 8.0, 130.0, false);

    w.y -= 12.0;
    w.table_header();
    for item in &receipt.items {
        w.row(&item_cells(item), false);
    }

    w.y += ROW_HEIGHT - 2.0;
    w.rule();
    w.y -= ROW_HEIGHT;
    let t = &receipt.totals;
    w.row(
        &[
            "Total".to_string(),
            String::new(),
            format!("{:.3}", t.gross_weight),
            format!("{:.3}", t.stone_weight),
            format!("{:.3}", t.net_weight),
            String::new(),
            format!("{:.3}", t.final_weight),
            format!("{:.2}", t.stone_amount),
        ],
        true,
    );

    w.y = 12.0;
    w.text(
        &format!("Generated on {}", chrono::Utc::now().format("%d-%m-%Y %H:%M UTC")),
        8.0,
        LEFT,
        false,
    );

    w.finish()
}

fn sanitize_filename(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        let ok = ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.';
        out.push(if ok { ch } else { '_' });
    }
    let trimmed = out.trim_matches('_').to_string();
    if trimmed.is_empty() { "client".to_string() } else { trimmed }
}

/// `receipt-<client>-<issue date>.pdf`
pub fn file_name(receipt: &Receipt) -> String {
    format!(
        "receipt-{}-{}.pdf",
        sanitize_filename(&receipt.client_name),
        receipt.issue_date.format("%Y-%m-%d")
    )
}
