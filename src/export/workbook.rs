//! Export classeur Excel — la table courante sur une feuille unique.

use rust_xlsxwriter::{Workbook, Worksheet};

use crate::error::DashboardError;
use crate::export::{
    create_amount_format, create_date_format, create_header_format, create_integer_format,
};
use crate::parser::SalesRecord;

/// Génère un classeur XLSX à une feuille contenant toutes les colonnes
/// d'origine, et retourne les octets du fichier.
pub fn generate_sales_workbook(records: &[SalesRecord]) -> Result<Vec<u8>, DashboardError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Ventes")?;

    write_sales_sheet(worksheet, records)?;

    let bytes = workbook.save_to_buffer()?;
    Ok(bytes)
}

fn write_sales_sheet(
    worksheet: &mut Worksheet,
    records: &[SalesRecord],
) -> Result<(), DashboardError> {
    let header = create_header_format();
    let date_fmt = create_date_format();
    let amount_fmt = create_amount_format();
    let int_fmt = create_integer_format();

    let headers = [
        "Customer ID",
        "Date",
        "Region",
        "Product",
        "Sales",
        "Profit",
        "Customer Age",
        "Customer Gender",
    ];
    for (col, title) in headers.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *title, &header)?;
    }
    worksheet.set_column_width(1, 12)?;
    worksheet.set_column_width(2, 12)?;
    worksheet.set_column_width(3, 16)?;

    for (i, r) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_with_format(row, 0, r.customer_id as f64, &int_fmt)?;
        worksheet.write_with_format(row, 1, &r.date, &date_fmt)?;
        worksheet.write(row, 2, &r.region)?;
        worksheet.write(row, 3, &r.product)?;
        worksheet.write_with_format(row, 4, r.sales, &amount_fmt)?;
        worksheet.write_with_format(row, 5, r.profit, &amount_fmt)?;
        worksheet.write_with_format(row, 6, r.customer_age as f64, &int_fmt)?;
        worksheet.write(row, 7, &r.customer_gender)?;
    }

    Ok(())
}
