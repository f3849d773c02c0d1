//! CSV bill import
//!
//! Parses a header + rows CSV document into validated [`NewBill`] records.
//!
//! # Format
//!
//! The header must name the five bill columns exactly once each, in any
//! order. Every column accepts its English or its Portuguese name:
//!
//! | Column         | Alias             | Required | Format                  |
//! |----------------|-------------------|----------|-------------------------|
//! | `due_date`     | `data_vencimento` | yes      | `YYYY-MM-DD`            |
//! | `payment_date` | `data_pagamento`  | no       | `YYYY-MM-DD`            |
//! | `amount`       | `valor`           | yes      | decimal, `.`, 2 places  |
//! | `description`  | `descricao`       | yes      | non-blank text          |
//! | `situation`    | `situacao`        | no       | `PAID` / `UNPAID`       |
//!
//! Parsing is fail-fast: the first malformed row aborts the whole import.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::Read;
use std::str::FromStr;

use crate::bill::{AmountError, NewBill, Situation, AMOUNT_INTEGER_DIGITS, AMOUNT_SCALE};
use crate::error::ImportError;
use crate::validation::fields;

/// Date format accepted for both date columns
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Logical columns of the import format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    DueDate,
    PaymentDate,
    Amount,
    Description,
    Situation,
}

impl Column {
    const ALL: [Column; 5] = [
        Column::DueDate,
        Column::PaymentDate,
        Column::Amount,
        Column::Description,
        Column::Situation,
    ];

    fn english(&self) -> &'static str {
        match self {
            Column::DueDate => "due_date",
            Column::PaymentDate => "payment_date",
            Column::Amount => "amount",
            Column::Description => "description",
            Column::Situation => "situation",
        }
    }

    /// Wire name used in error reports, matching the JSON field names
    fn wire_name(&self) -> &'static str {
        match self {
            Column::DueDate => fields::DUE_DATE,
            Column::PaymentDate => fields::PAYMENT_DATE,
            Column::Amount => fields::AMOUNT,
            Column::Description => fields::DESCRIPTION,
            Column::Situation => fields::SITUATION,
        }
    }

    fn from_header(name: &str) -> Option<Column> {
        let name = name.trim().to_lowercase();
        Column::ALL
            .into_iter()
            .find(|column| column.english() == name || column.wire_name() == name)
    }
}

/// Position of every logical column within a record
#[derive(Debug, Clone, Copy)]
struct HeaderLayout {
    positions: [usize; 5],
}

impl HeaderLayout {
    fn from_record(header: &csv::StringRecord) -> Result<Self, ImportError> {
        if header.iter().all(|name| name.trim().is_empty()) {
            return Err(ImportError::MissingHeader);
        }

        let mut positions: [Option<usize>; 5] = [None; 5];
        for (index, name) in header.iter().enumerate() {
            let column = Column::from_header(name)
                .ok_or_else(|| ImportError::UnknownColumn(name.trim().to_string()))?;
            let slot = &mut positions[column as usize];
            if slot.is_some() {
                return Err(ImportError::DuplicateColumn(name.trim().to_string()));
            }
            *slot = Some(index);
        }

        let mut resolved = [0usize; 5];
        for column in Column::ALL {
            resolved[column as usize] = positions[column as usize]
                .ok_or(ImportError::MissingColumn(column.english()))?;
        }
        Ok(Self { positions: resolved })
    }

    fn field<'r>(&self, record: &'r csv::StringRecord, column: Column) -> &'r str {
        record
            .get(self.positions[column as usize])
            .unwrap_or_default()
            .trim()
    }
}

/// Parser for the bill import format
pub struct BillCsvParser;

impl BillCsvParser {
    /// Parses every row of the document, in order
    ///
    /// # Errors
    ///
    /// Returns the first header problem, structural CSV error or malformed
    /// row encountered; no partial result is produced.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<NewBill>, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::None)
            .from_reader(reader);

        let layout = HeaderLayout::from_record(csv_reader.headers()?)?;

        let mut bills = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let row = record.position().map(|p| p.line()).unwrap_or_default();
            bills.push(Self::parse_record(&layout, &record, row)?);
        }
        Ok(bills)
    }

    fn parse_record(
        layout: &HeaderLayout,
        record: &csv::StringRecord,
        row: u64,
    ) -> Result<NewBill, ImportError> {
        let malformed = |column: Column, value: &str, reason: &str| ImportError::MalformedRow {
            row,
            field: column.wire_name(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let due_raw = layout.field(record, Column::DueDate);
        if due_raw.is_empty() {
            return Err(malformed(Column::DueDate, due_raw, "due date is required"));
        }
        let due_date = parse_date(due_raw)
            .ok_or_else(|| malformed(Column::DueDate, due_raw, "expected a YYYY-MM-DD date"))?;

        let payment_raw = layout.field(record, Column::PaymentDate);
        let payment_date = if payment_raw.is_empty() {
            None
        } else {
            Some(parse_date(payment_raw).ok_or_else(|| {
                malformed(Column::PaymentDate, payment_raw, "expected a YYYY-MM-DD date")
            })?)
        };

        let amount_raw = layout.field(record, Column::Amount);
        if amount_raw.is_empty() {
            return Err(malformed(Column::Amount, amount_raw, "amount is required"));
        }
        let amount = parse_amount(amount_raw)
            .map_err(|reason| malformed(Column::Amount, amount_raw, &reason))?;

        let description = layout.field(record, Column::Description);
        if description.is_empty() {
            return Err(malformed(Column::Description, description, "description is required"));
        }

        let situation_raw = layout.field(record, Column::Situation);
        let situation = if situation_raw.is_empty() {
            Situation::Unpaid
        } else {
            Situation::from_str(situation_raw)
                .map_err(|e| malformed(Column::Situation, situation_raw, &e.to_string()))?
        };

        Ok(NewBill {
            payment_date,
            due_date,
            amount,
            description: description.to_string(),
            situation,
        })
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

/// Accepts an optional sign, digits and at most one `.` separator
///
/// Digit counts are checked on the text so that nothing is rounded on the
/// way to a [`Decimal`].
fn parse_amount(value: &str) -> Result<Decimal, String> {
    let not_a_number = || "expected a decimal number".to_string();
    let (negative, unsigned) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let (integral, fractional) = unsigned.split_once('.').unwrap_or((unsigned, ""));

    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if integral.is_empty() && fractional.is_empty() {
        return Err(not_a_number());
    }
    if !digits_only(integral) || !digits_only(fractional) {
        return Err(not_a_number());
    }

    let scale = AMOUNT_SCALE as usize;
    if fractional.trim_end_matches('0').len() > scale {
        return Err(AmountError::TooPrecise.to_string());
    }
    let fractional = &fractional[..fractional.len().min(scale)];
    let integral = integral.trim_start_matches('0');
    if integral.len() > AMOUNT_INTEGER_DIGITS {
        return Err(AmountError::OutOfRange.to_string());
    }

    let integral = if integral.is_empty() { "0" } else { integral };
    let normalized = if fractional.is_empty() {
        integral.to_string()
    } else {
        format!("{integral}.{fractional}")
    };
    let amount = Decimal::from_str(&normalized).map_err(|_| not_a_number())?;
    Ok(if negative { -amount } else { amount })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const HEADER: &str = "data_vencimento,data_pagamento,valor,descricao,situacao\n";

    fn parse(body: &str) -> Result<Vec<NewBill>, ImportError> {
        BillCsvParser::parse(body.as_bytes())
    }

    #[test]
    fn test_parses_reference_row() {
        let csv = format!("{HEADER}2024-01-05,2024-01-04,284.25,\"Bill description test 01\",PAID\n");
        let bills = parse(&csv).unwrap();

        assert_eq!(bills.len(), 1);
        let bill = &bills[0];
        assert_eq!(bill.due_date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(bill.payment_date, NaiveDate::from_ymd_opt(2024, 1, 4));
        assert_eq!(bill.amount, dec!(284.25));
        assert_eq!(bill.description, "Bill description test 01");
        assert_eq!(bill.situation, Situation::Paid);
    }

    #[test]
    fn test_blank_optional_fields() {
        let csv = format!("{HEADER}2024-03-01,,10.00,Water,\n");
        let bills = parse(&csv).unwrap();

        assert!(bills[0].payment_date.is_none());
        assert_eq!(bills[0].situation, Situation::Unpaid);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let csv = format!("{HEADER} 2024-03-01 , , 10.5 ,  Gas bill  , UNPAID \n");
        let bills = parse(&csv).unwrap();

        assert_eq!(bills[0].amount, dec!(10.5));
        assert_eq!(bills[0].description, "Gas bill");
    }

    #[test]
    fn test_header_order_and_aliases() {
        let csv = "Situation, Description ,AMOUNT,payment_date,due_date\nPAID,Rent,1500,2024-02-01,2024-02-05\n";
        let bills = parse(csv).unwrap();

        assert_eq!(bills[0].description, "Rent");
        assert_eq!(bills[0].amount, dec!(1500));
        assert_eq!(bills[0].situation, Situation::Paid);
        assert_eq!(bills[0].due_date, NaiveDate::from_ymd_opt(2024, 2, 5).unwrap());
    }

    #[test]
    fn test_header_only_yields_nothing() {
        assert!(parse(HEADER).unwrap().is_empty());
    }

    #[test]
    fn test_empty_document_rejected() {
        assert!(matches!(parse(""), Err(ImportError::MissingHeader)));
    }

    #[test]
    fn test_header_problems() {
        let missing = parse("data_vencimento,valor,descricao,situacao\n");
        assert!(matches!(missing, Err(ImportError::MissingColumn("payment_date"))));

        let duplicate = parse("due_date,data_vencimento,payment_date,amount,description,situation\n");
        assert!(matches!(duplicate, Err(ImportError::DuplicateColumn(_))));

        let unknown = parse("due_date,payment_date,amount,description,situation,notes\n");
        assert!(matches!(unknown, Err(ImportError::UnknownColumn(name)) if name == "notes"));
    }

    #[test]
    fn test_malformed_amount_reports_row_and_value() {
        let csv = format!("{HEADER}2024-01-05,,1.00,First,\n2024-01-06,,abc,Second,\n");
        let error = parse(&csv).unwrap_err();

        match error {
            ImportError::MalformedRow { row, field, value, .. } => {
                assert_eq!(row, 3);
                assert_eq!(field, fields::AMOUNT);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_amount_format_is_strict() {
        assert_eq!(parse_amount("-12.50"), Ok(dec!(-12.50)));
        assert_eq!(parse_amount("+3"), Ok(dec!(3)));
        assert_eq!(parse_amount(".5"), Ok(dec!(0.5)));
        assert!(parse_amount("1,50").is_err());
        assert!(parse_amount("1e3").is_err());
        assert!(parse_amount("1_000").is_err());
        assert!(parse_amount(".").is_err());
        assert!(parse_amount("-").is_err());
        assert!(parse_amount("1.2.3").is_err());
    }

    #[test]
    fn test_amount_digits_are_never_rounded() {
        assert_eq!(parse_amount("007.100").unwrap().to_string(), "7.10");
        assert_eq!(parse_amount("99999999999999999.99"), Ok(dec!(99999999999999999.99)));

        let too_precise = AmountError::TooPrecise.to_string();
        assert_eq!(parse_amount("10.555"), Err(too_precise.clone()));
        assert_eq!(parse_amount("1.000000000000000000000000000019"), Err(too_precise));
        assert_eq!(
            parse_amount("100000000000000000"),
            Err(AmountError::OutOfRange.to_string())
        );
    }

    #[test]
    fn test_overly_precise_amount_aborts_import() {
        let csv = format!("{HEADER}2024-01-05,,1.00,First,\n2024-01-06,,10.555,Second,\n");

        match parse(&csv).unwrap_err() {
            ImportError::MalformedRow { row, field, value, reason } => {
                assert_eq!(row, 3);
                assert_eq!(field, fields::AMOUNT);
                assert_eq!(value, "10.555");
                assert_eq!(reason, AmountError::TooPrecise.to_string());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_dates_and_situations() {
        let bad_due = format!("{HEADER}05/01/2024,,1.00,Desc,\n");
        assert!(matches!(
            parse(&bad_due),
            Err(ImportError::MalformedRow { field: fields::DUE_DATE, .. })
        ));

        let bad_payment = format!("{HEADER}2024-01-05,2024-13-01,1.00,Desc,\n");
        assert!(matches!(
            parse(&bad_payment),
            Err(ImportError::MalformedRow { field: fields::PAYMENT_DATE, .. })
        ));

        let lowercase_situation = format!("{HEADER}2024-01-05,,1.00,Desc,paid\n");
        assert!(matches!(
            parse(&lowercase_situation),
            Err(ImportError::MalformedRow { field: fields::SITUATION, .. })
        ));

        let blank_description = format!("{HEADER}2024-01-05,,1.00,  ,\n");
        assert!(matches!(
            parse(&blank_description),
            Err(ImportError::MalformedRow { field: fields::DESCRIPTION, .. })
        ));
    }

    #[test]
    fn test_wrong_field_count_is_malformed() {
        let csv = format!("{HEADER}2024-01-05,,1.00\n");
        let error = parse(&csv).unwrap_err();

        assert!(matches!(error, ImportError::Csv(_)));
        assert!(error.is_malformed_input());
    }

    #[test]
    fn test_rows_keep_input_order() {
        let csv = format!("{HEADER}2024-01-01,,1,A,\n2024-01-02,,2,B,\n2024-01-03,,3,C,\n");
        let descriptions: Vec<_> = parse(&csv).unwrap().into_iter().map(|b| b.description).collect();

        assert_eq!(descriptions, vec!["A", "B", "C"]);
    }
}
