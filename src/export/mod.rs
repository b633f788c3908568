pub mod csv_export;
pub mod workbook;

use rust_xlsxwriter::{Format, FormatBorder};

/// En-tête vert foncé (palette du tableau de bord), texte blanc, gras.
pub fn create_header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color("006400")
        .set_font_color("FFFFFF")
        .set_font_size(11)
        .set_border(FormatBorder::Thin)
        .set_text_wrap()
}

/// Format date yyyy-mm-dd.
pub fn create_date_format() -> Format {
    Format::new().set_num_format("yyyy-mm-dd")
}

/// Format montant #,##0.00.
pub fn create_amount_format() -> Format {
    Format::new().set_num_format("#,##0.00")
}

/// Format entier #,##0.
pub fn create_integer_format() -> Format {
    Format::new().set_num_format("#,##0")
}
